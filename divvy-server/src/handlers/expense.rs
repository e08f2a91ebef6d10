use actix_web::{web, HttpResponse};
use divvy_common::db::expense::ExpenseSplitData;
use divvy_common::db::{self, DaoError, DbAsyncPool};
use serde_json::json;

use crate::handlers::error::HttpErrorResponse;
use crate::handlers::request_io::{
    InputEditExpense, InputExpense, OutputExpense, OutputExpenseSplit,
};

pub async fn create(
    db_async_pool: web::Data<DbAsyncPool>,
    group_id: web::Path<String>,
    expense_data: web::Json<InputExpense>,
) -> Result<HttpResponse, HttpErrorResponse> {
    if expense_data.splits.is_empty() {
        return Err(HttpErrorResponse::IncorrectlyFormed(
            "An expense must have at least one split".into(),
        ));
    }

    let group_dao = db::group::Dao::new(&db_async_pool);
    let group_exists = match group_dao.group_exists(&group_id).await {
        Ok(exists) => exists,
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in create_expense".into(),
                e.to_string(),
            ));
        }
    };

    if !group_exists {
        return Err(HttpErrorResponse::DoesNotExist("Group not found".into()));
    }

    let splits: Vec<ExpenseSplitData> = expense_data
        .splits
        .iter()
        .map(|split| ExpenseSplitData {
            split_id: &split.split_id,
            user_id: &split.user_id,
            amount: split.amount,
            split_type: split.split_type,
        })
        .collect();

    let expense_dao = db::expense::Dao::new(&db_async_pool);
    match expense_dao
        .create_expense(
            &group_id,
            &expense_data.expense_id,
            expense_data.amount,
            &expense_data.description,
            expense_data.created_by.as_deref(),
            &splits,
        )
        .await
    {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::ConflictWithExisting(
                "An expense or split with the given id already exists".into(),
            ));
        }
        Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ForeignKeyViolation,
            _,
        ))) => {
            return Err(HttpErrorResponse::DoesNotExist(
                "A user referenced by a split was not found".into(),
            ));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in create_expense".into(),
                e.to_string(),
            ));
        }
    }

    log::info!("Expense created: {}", expense_data.expense_id);

    Ok(HttpResponse::Created().json(json!({
        "message": "Expense created successfully",
        "expense": expense_data.expense_id,
    })))
}

pub async fn get(
    db_async_pool: web::Data<DbAsyncPool>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let (group_id, expense_id) = path.into_inner();

    let expense_dao = db::expense::Dao::new(&db_async_pool);
    let (expense, splits) = match expense_dao.get_expense(&group_id, &expense_id).await {
        Ok(e) => e,
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist("Expense not found".into()));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in get_expense".into(),
                e.to_string(),
            ));
        }
    };

    let split_details = splits
        .into_iter()
        .map(|split| OutputExpenseSplit {
            split_id: split.id,
            user_id: split.user_id,
            amount: split.amount,
            split_type: split.split_type,
        })
        .collect();

    Ok(HttpResponse::Ok().json(OutputExpense {
        expense_id: expense.id,
        group_id: expense.group_id,
        amount: expense.amount,
        description: expense.description,
        created_time: expense.created_time,
        updated_time: expense.updated_time,
        created_by: expense.created_by,
        updated_by: expense.updated_by,
        splits: split_details,
    }))
}

pub async fn update(
    db_async_pool: web::Data<DbAsyncPool>,
    path: web::Path<(String, String)>,
    expense_data: web::Json<InputEditExpense>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let (group_id, expense_id) = path.into_inner();

    let expense_dao = db::expense::Dao::new(&db_async_pool);
    match expense_dao
        .update_expense(
            &group_id,
            &expense_id,
            expense_data.amount,
            expense_data.description.as_deref(),
            expense_data.updated_by.as_deref(),
        )
        .await
    {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist("Expense not found".into()));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in update_expense".into(),
                e.to_string(),
            ));
        }
    }

    log::info!("Expense updated: {}", expense_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Expense updated successfully" })))
}

pub async fn delete(
    db_async_pool: web::Data<DbAsyncPool>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, HttpErrorResponse> {
    let (group_id, expense_id) = path.into_inner();

    let expense_dao = db::expense::Dao::new(&db_async_pool);
    match expense_dao.delete_expense(&group_id, &expense_id).await {
        Ok(_) => (),
        Err(DaoError::QueryFailure(diesel::result::Error::NotFound)) => {
            return Err(HttpErrorResponse::DoesNotExist("Expense not found".into()));
        }
        Err(e) => {
            log::error!("{e}");
            return Err(HttpErrorResponse::InternalError(
                "Error in delete_expense".into(),
                e.to_string(),
            ));
        }
    }

    log::info!("Expense deleted: {}", expense_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Expense deleted successfully" })))
}
