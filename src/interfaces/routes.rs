use actix_web::web;

use crate::handlers::home::home;

mod consultation;
mod system;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.configure(system::config_routes)
        .configure(consultation::config_routes);
}
