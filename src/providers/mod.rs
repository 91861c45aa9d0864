// Provider client exports
pub mod embedding;
pub mod generation;

pub use embedding::{EmbeddingClient, EmbeddingError};
pub use generation::{GenerationClient, GenerationError, PromptMessage, ResponseFormat};
