// Route exports
pub mod matches;
pub mod precheck;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(precheck::configure),
    );
}
