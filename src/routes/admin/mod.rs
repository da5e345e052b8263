use actix_web::web;

pub mod dashboard;
pub mod inventory;
pub mod manage;

pub fn init(cfg: &mut web::ServiceConfig) {
    dashboard::init(cfg);
    inventory::init(cfg);
    manage::init(cfg);
}
