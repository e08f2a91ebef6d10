use actix_web::web;

use crate::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::post().to(handlers::user::create))
            .route("/{user_id}", web::get().to(handlers::user::get))
            .route("/{user_id}", web::put().to(handlers::user::update))
            .route("/{user_id}", web::delete().to(handlers::user::delete)),
    );
}
