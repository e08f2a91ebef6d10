use actix_web::web;

use crate::handlers;

// Expense routes live under the group scope since expenses are always
// addressed through their owning group
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/groups")
            .route("", web::post().to(handlers::group::create))
            .route("/{group_id}", web::get().to(handlers::group::get))
            .route("/{group_id}", web::put().to(handlers::group::update))
            .route("/{group_id}", web::delete().to(handlers::group::delete))
            .route(
                "/{group_id}/members",
                web::post().to(handlers::group::add_member),
            )
            .route(
                "/{group_id}/members/{user_id}",
                web::delete().to(handlers::group::remove_member),
            )
            .route(
                "/{group_id}/expenses",
                web::post().to(handlers::expense::create),
            )
            .route(
                "/{group_id}/expenses/{expense_id}",
                web::get().to(handlers::expense::get),
            )
            .route(
                "/{group_id}/expenses/{expense_id}",
                web::put().to(handlers::expense::update),
            )
            .route(
                "/{group_id}/expenses/{expense_id}",
                web::delete().to(handlers::expense::delete),
            ),
    );
}
