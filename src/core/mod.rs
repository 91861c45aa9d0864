// Core algorithm exports
pub mod constraints;
pub mod describe;
pub mod history;
pub mod matcher;
pub mod preference;
pub mod similarity;

pub use constraints::{check_hard_constraints, HardConstraintCheck};
pub use describe::{adopter_profile_to_text, pet_profile_to_text};
pub use history::historical_score;
pub use matcher::Matcher;
pub use preference::score_soft_preferences;
pub use similarity::{cosine_similarity, similarity_to_score};
