use actix_web::web::*;

mod group;
mod health;
mod user;

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.configure(health::configure)
        .configure(user::configure)
        .configure(group::configure);
}
