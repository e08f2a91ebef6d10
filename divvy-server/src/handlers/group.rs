use actix_web::{web, HttpResponse};
use divvy_common::db::{self, DaoError, DbAsyncPool};
use serde_json::json;

use crate::handlers::error::HttpErrorResponse;
use crate::handlers::request_io::{InputEditGroup, InputGroup, InputGroupMember, OutputGroup};

pub async fn create(
    db_async_pool: web::Data<DbAsyncPool>,
    group_data: web::Json<InputGroup>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let group_dao = db::group::Dao::new(&db_async_pool);
    match group_dao
        .create_group(
            &group_data.group_id,
            &group_data.name,
            group_data.created_by.as_deref(),
        )
        .await
    {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::ConflictWithExisting(
                "A group with the given id already exists".into(),
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in create_group".into(),
                e.to_string(),
            ));
        }
    }

    log::info!("Group created: {}", group_data.group_id);

    Ok(HttpResponse::Created().json(json!({
        "message": "Group created successfully",
        "group": group_data.group_id,
    })))
}

pub async fn get(
    db_async_pool: web::Data<DbAsyncPool>,
    group_id: web::Path<String>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let group_dao = db::group::Dao::new(&db_async_pool);
    let (group, member_ids) = match group_dao.get_group(&group_id).await {
        Ok(g) => g,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist("Group not found".into()));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in get_group".into(),
                e.to_string(),
            ));
        }
    };

    Ok(HttpResponse::Ok().json(OutputGroup {
        group_id: group.id,
        name: group.name,
        created_time: group.created_time,
        updated_time: group.updated_time,
        created_by: group.created_by,
        updated_by: group.updated_by,
        members: member_ids,
    }))
}

pub async fn update(
    db_async_pool: web::Data<DbAsyncPool>,
    group_id: web::Path<String>,
    group_data: web::Json<InputEditGroup>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let group_dao = db::group::Dao::new(&db_async_pool);
    match group_dao
        .update_group(
            &group_id,
            group_data.name.as_deref(),
            group_data.updated_by.as_deref(),
        )
        .await
    {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist("Group not found".into()));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in update_group".into(),
                e.to_string(),
            ));
        }
    }

    log::info!("Group updated: {}", group_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Group updated successfully" })))
}

pub async fn delete(
    db_async_pool: web::Data<DbAsyncPool>,
    group_id: web::Path<String>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let group_dao = db::group::Dao::new(&db_async_pool);
    match group_dao.delete_group(&group_id).await {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist("Group not found".into()));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in delete_group".into(),
                e.to_string(),
            ));
        }
    }

    log::info!("Group deleted: {}", group_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Group deleted successfully" })))
}

pub async fn add_member(
    db_async_pool: web::Data<DbAsyncPool>,
    group_id: web::Path<String>,
    member_data: web::Json<InputGroupMember>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let group_dao = db::group::Dao::new(&db_async_pool);
    let user_dao = db::user::Dao::new(&db_async_pool);

    if !exists_or_internal_error(group_dao.group_exists(&group_id).await, "group")? {
        return Err(HttpErrorResponse::DoesNotExist("Group not found".into()));
    }

    if !exists_or_internal_error(user_dao.user_exists(&member_data.user_id).await, "user")? {
        return Err(HttpErrorResponse::DoesNotExist("User not found".into()));
    }

    match group_dao.add_member(&group_id, &member_data.user_id).await {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::ConflictWithExisting(
                "User is already a member of the group".into(),
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in add_member".into(),
                e.to_string(),
            ));
        }
    }

    log::info!(
        "Member added to group: {} -> {}",
        member_data.user_id,
        group_id
    );

    Ok(HttpResponse::Ok().json(json!({ "message": "Member added to group successfully" })))
}

pub async fn remove_member(
    db_async_pool: web::Data<DbAsyncPool>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let (group_id, user_id) = path.into_inner();

    let group_dao = db::group::Dao::new(&db_async_pool);

    if !exists_or_internal_error(group_dao.group_exists(&group_id).await, "group")? {
        return Err(HttpErrorResponse::DoesNotExist("Group not found".into()));
    }

    match group_dao.remove_member(&group_id, &user_id).await {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist(
                "User not found in group".into(),
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in remove_member".into(),
                e.to_string(),
            ));
        }
    }

    log::info!("Member removed from group: {} -> {}", user_id, group_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Member removed from group successfully" })))
}

fn exists_or_internal_error(
    result: Result<bool, DaoError>,
    entity: &'static str,
) -> Result<bool, HttpErrorResponse> {
    match result {
        Ok(exists) => Ok(exists),
        Err(e) => {
            log::error!("{e}");
            Err(HttpErrorResponse::InternalError(
                format!("Failed to check whether {entity} exists").into(),
                e.to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::{self, TestRequest};
    use actix_web::web::Data;
    use actix_web::{web, App};
    use serde_json::json;

    use crate::env;
    use crate::handlers::error;
    use crate::handlers::request_io::OutputGroup;
    use crate::handlers::test_utils;

    #[actix_web::test]
    async fn test_create_and_get_group() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(env::testing::DB_ASYNC_POOL.clone()))
                .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
                .configure(crate::services::api::configure),
        )
        .await;

        let group_id = test_utils::unique_id("group");

        let req = TestRequest::post()
            .uri("/groups")
            .set_json(json!({
                "group_id": group_id,
                "name": "Trip to Lisbon",
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp_body = test::read_body(resp).await;
        let resp_json: serde_json::Value = serde_json::from_slice(&resp_body).unwrap();
        assert_eq!(resp_json["message"], "Group created successfully");
        assert_eq!(resp_json["group"], group_id.as_str());

        let req = TestRequest::get()
            .uri(&format!("/groups/{group_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);

        let resp_body = test::read_body(resp).await;
        let group: OutputGroup = serde_json::from_slice(&resp_body).unwrap();
        assert_eq!(group.group_id, group_id);
        assert_eq!(group.name, "Trip to Lisbon");
        assert!(group.members.is_empty());

        test_utils::delete_test_rows(&[], &[&group_id]).await;
    }

    #[actix_web::test]
    async fn test_add_member_and_get_group_members() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(env::testing::DB_ASYNC_POOL.clone()))
                .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
                .configure(crate::services::api::configure),
        )
        .await;

        let group_id = test_utils::create_group().await;
        let user_id = test_utils::create_user().await;

        let req = TestRequest::post()
            .uri(&format!("/groups/{group_id}/members"))
            .set_json(json!({ "user_id": user_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);

        let resp_body = test::read_body(resp).await;
        let resp_json: serde_json::Value = serde_json::from_slice(&resp_body).unwrap();
        assert_eq!(resp_json["message"], "Member added to group successfully");

        let req = TestRequest::get()
            .uri(&format!("/groups/{group_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let resp_body = test::read_body(resp).await;
        let group: OutputGroup = serde_json::from_slice(&resp_body).unwrap();

        assert_eq!(group.members, vec![user_id.clone()]);

        test_utils::delete_test_rows(&[&user_id], &[&group_id]).await;
    }

    #[actix_web::test]
    async fn test_add_member_twice_conflicts() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(env::testing::DB_ASYNC_POOL.clone()))
                .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
                .configure(crate::services::api::configure),
        )
        .await;

        let group_id = test_utils::create_group().await;
        let user_id = test_utils::create_user().await;

        let req = TestRequest::post()
            .uri(&format!("/groups/{group_id}/members"))
            .set_json(json!({ "user_id": user_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::post()
            .uri(&format!("/groups/{group_id}/members"))
            .set_json(json!({ "user_id": user_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        test_utils::delete_test_rows(&[&user_id], &[&group_id]).await;
    }

    #[actix_web::test]
    async fn test_add_member_with_missing_group_or_user() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(env::testing::DB_ASYNC_POOL.clone()))
                .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
                .configure(crate::services::api::configure),
        )
        .await;

        let group_id = test_utils::create_group().await;
        let user_id = test_utils::create_user().await;

        let req = TestRequest::post()
            .uri(&format!(
                "/groups/{}/members",
                test_utils::unique_id("missing")
            ))
            .set_json(json!({ "user_id": user_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp_body = test::read_body(resp).await;
        let resp_json: serde_json::Value = serde_json::from_slice(&resp_body).unwrap();
        assert_eq!(resp_json["message"], "Group not found");

        let req = TestRequest::post()
            .uri(&format!("/groups/{group_id}/members"))
            .set_json(json!({ "user_id": test_utils::unique_id("missing") }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp_body = test::read_body(resp).await;
        let resp_json: serde_json::Value = serde_json::from_slice(&resp_body).unwrap();
        assert_eq!(resp_json["message"], "User not found");

        test_utils::delete_test_rows(&[&user_id], &[&group_id]).await;
    }

    #[actix_web::test]
    async fn test_remove_member() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(env::testing::DB_ASYNC_POOL.clone()))
                .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
                .configure(crate::services::api::configure),
        )
        .await;

        let group_id = test_utils::create_group().await;
        let user_id = test_utils::create_user().await;

        let req = TestRequest::post()
            .uri(&format!("/groups/{group_id}/members"))
            .set_json(json!({ "user_id": user_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::delete()
            .uri(&format!("/groups/{group_id}/members/{user_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);

        let resp_body = test::read_body(resp).await;
        let resp_json: serde_json::Value = serde_json::from_slice(&resp_body).unwrap();
        assert_eq!(
            resp_json["message"],
            "Member removed from group successfully"
        );

        // Removing again reports the membership as missing
        let req = TestRequest::delete()
            .uri(&format!("/groups/{group_id}/members/{user_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp_body = test::read_body(resp).await;
        let resp_json: serde_json::Value = serde_json::from_slice(&resp_body).unwrap();
        assert_eq!(resp_json["message"], "User not found in group");

        test_utils::delete_test_rows(&[&user_id], &[&group_id]).await;
    }

    #[actix_web::test]
    async fn test_update_group() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(env::testing::DB_ASYNC_POOL.clone()))
                .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
                .configure(crate::services::api::configure),
        )
        .await;

        let group_id = test_utils::create_group().await;

        let req = TestRequest::put()
            .uri(&format!("/groups/{group_id}"))
            .set_json(json!({ "name": "Renamed Group" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);

        let req = TestRequest::get()
            .uri(&format!("/groups/{group_id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let resp_body = test::read_body(resp).await;
        let group: OutputGroup = serde_json::from_slice(&resp_body).unwrap();

        assert_eq!(group.name, "Renamed Group");

        test_utils::delete_test_rows(&[], &[&group_id]).await;
    }

    #[actix_web::test]
    async fn test_delete_missing_group() {
        let app = test::init_service(
            App::new()
                .app_data(Data::new(env::testing::DB_ASYNC_POOL.clone()))
                .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
                .configure(crate::services::api::configure),
        )
        .await;

        let req = TestRequest::delete()
            .uri(&format!("/groups/{}", test_utils::unique_id("missing")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp_body = test::read_body(resp).await;
        let resp_json: serde_json::Value = serde_json::from_slice(&resp_body).unwrap();
        assert_eq!(resp_json["message"], "Group not found");
    }
}
