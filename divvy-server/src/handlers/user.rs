use actix_web::{web, HttpResponse};
use divvy_common::db::{self, DaoError, DbAsyncPool};
use serde_json::json;

use crate::handlers::error::HttpErrorResponse;
use crate::handlers::request_io::{InputEditUser, InputUser, OutputUser};

pub async fn create(
    db_async_pool: web::Data<DbAsyncPool>,
    user_data: web::Json<InputUser>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_dao = db::user::Dao::new(&db_async_pool);
    match user_dao
        .create_user(
            &user_data.user_id,
            &user_data.name,
            &user_data.email,
            user_data.created_by.as_deref(),
        )
        .await
    {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::ConflictWithExisting(
                "A user with the given id or email already exists".into(),
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in create_user".into(),
                e.to_string(),
            ));
        }
    }

    log::info!("User created: {}", user_data.user_id);

    Ok(HttpResponse::Created().json(json!({
        "message": "User created successfully",
        "user": user_data.user_id,
    })))
}

pub async fn get(
    db_async_pool: web::Data<DbAsyncPool>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_dao = db::user::Dao::new(&db_async_pool);
    let user = match user_dao.get_user(&user_id).await {
        Ok(u) => u,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist("User not found".into()));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in get_user".into(),
                e.to_string(),
            ));
        }
    };

    Ok(HttpResponse::Ok().json(OutputUser {
        user_id: user.id,
        name: user.name,
        email: user.email,
        created_time: user.created_time,
        updated_time: user.updated_time,
        created_by: user.created_by,
        updated_by: user.updated_by,
    }))
}

pub async fn update(
    db_async_pool: web::Data<DbAsyncPool>,
    user_id: web::Path<String>,
    user_data: web::Json<InputEditUser>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_dao = db::user::Dao::new(&db_async_pool);
    match user_dao
        .update_user(
            &user_id,
            user_data.name.as_deref(),
            user_data.email.as_deref(),
            user_data.updated_by.as_deref(),
        )
        .await
    {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist("User not found".into()));
        }
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::ConflictWithExisting(
                "A user with the given email already exists".into(),
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in update_user".into(),
                e.to_string(),
            ));
        }
    }

    log::info!("User updated: {}", user_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "User updated successfully" })))
}

pub async fn delete(
    db_async_pool: web::Data<DbAsyncPool>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let user_dao = db::user::Dao::new(&db_async_pool);
    match user_dao.delete_user(&user_id).await {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist("User not found".into()));
        }
        Err(DaoError::CannotRunQuery(msg)) => {
            return Err(HttpErrorResponse::ConflictWithExisting(msg.into()));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in delete_user".into(),
                e.to_string(),
            ));
        }
    }

    log::info!("User deleted: {}", user_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted successfully" })))
}
