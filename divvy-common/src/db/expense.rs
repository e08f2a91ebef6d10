use chrono::Utc;
use diesel::{dsl, ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;
use rust_decimal::Decimal;

use crate::db::{DaoError, DbAsyncPool};
use crate::models::expense::{Expense, ExpenseChangeset, NewExpense};
use crate::models::expense_split::{ExpenseSplit, NewExpenseSplit, SplitType};

use crate::schema::expense_splits as expense_split_fields;
use crate::schema::expense_splits::dsl::expense_splits;
use crate::schema::expenses as expense_fields;
use crate::schema::expenses::dsl::expenses;

/// One participant's share of an expense being recorded.
#[derive(Debug)]
pub struct ExpenseSplitData<'a> {
    pub split_id: &'a str,
    pub user_id: &'a str,
    pub amount: Decimal,
    pub split_type: SplitType,
}

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    /// Inserts the expense together with all of its splits in one
    /// transaction. Either every row lands or none do.
    pub async fn create_expense(
        &self,
        group_id: &str,
        expense_id: &str,
        amount: Decimal,
        description: &str,
        created_by: Option<&str>,
        splits: &[ExpenseSplitData<'_>],
    ) -> Result<(), DaoError> {
        let mut db_connection = self.db_async_pool.get().await?;

        let group_id = group_id.to_owned();
        let expense_id = expense_id.to_owned();
        let description = description.to_owned();
        let created_by = created_by.map(String::from);
        let split_rows: Vec<(String, String, Decimal, SplitType)> = splits
            .iter()
            .map(|split| {
                (
                    split.split_id.to_owned(),
                    split.user_id.to_owned(),
                    split.amount,
                    split.split_type,
                )
            })
            .collect();

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                Box::pin(async move {
                    let current_time = Utc::now().naive_utc();

                    let new_expense = NewExpense {
                        id: expense_id.as_str(),
                        group_id: group_id.as_str(),
                        amount,
                        description: description.as_str(),
                        created_time: current_time,
                        updated_time: current_time,
                        created_by: created_by.as_deref(),
                    };

                    dsl::insert_into(expenses)
                        .values(&new_expense)
                        .execute(conn)
                        .await?;

                    let new_splits: Vec<NewExpenseSplit> = split_rows
                        .iter()
                        .map(|(split_id, user_id, split_amount, split_type)| NewExpenseSplit {
                            id: split_id.as_str(),
                            expense_id: expense_id.as_str(),
                            user_id: user_id.as_str(),
                            amount: *split_amount,
                            split_type: *split_type,
                        })
                        .collect();

                    dsl::insert_into(expense_splits)
                        .values(&new_splits)
                        .execute(conn)
                        .await?;

                    Ok(())
                })
            })
            .await
    }

    /// Fetches the expense and its splits, scoped to the given group so an
    /// expense cannot be read through the wrong group's path.
    pub async fn get_expense(
        &self,
        group_id: &str,
        expense_id: &str,
    ) -> Result<(Expense, Vec<ExpenseSplit>), DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let expense = expenses
            .find(expense_id)
            .filter(expense_fields::group_id.eq(group_id))
            .first::<Expense>(&mut conn)
            .await?;

        let splits = expense_splits
            .filter(expense_split_fields::expense_id.eq(expense_id))
            .order(expense_split_fields::id.asc())
            .load::<ExpenseSplit>(&mut conn)
            .await?;

        Ok((expense, splits))
    }

    pub async fn update_expense(
        &self,
        group_id: &str,
        expense_id: &str,
        amount: Option<Decimal>,
        description: Option<&str>,
        updated_by: Option<&str>,
    ) -> Result<(), DaoError> {
        let changes = ExpenseChangeset {
            amount,
            description,
            updated_by,
            updated_time: Utc::now().naive_utc(),
        };

        let mut conn = self.db_async_pool.get().await?;
        let affected_row_count = dsl::update(
            expenses
                .find(expense_id)
                .filter(expense_fields::group_id.eq(group_id)),
        )
        .set(&changes)
        .execute(&mut conn)
        .await?;

        if affected_row_count == 0 {
            return Err(DaoError::QueryFailure(diesel::result::Error::NotFound));
        }

        Ok(())
    }

    /// Removes the expense and its splits in one transaction.
    pub async fn delete_expense(&self, group_id: &str, expense_id: &str) -> Result<(), DaoError> {
        let mut db_connection = self.db_async_pool.get().await?;

        let group_id = group_id.to_owned();
        let expense_id = expense_id.to_owned();

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                Box::pin(async move {
                    diesel::delete(
                        expense_splits
                            .filter(expense_split_fields::expense_id.eq(expense_id.as_str())),
                    )
                    .execute(conn)
                    .await?;

                    let affected_row_count = diesel::delete(
                        expenses
                            .find(expense_id.as_str())
                            .filter(expense_fields::group_id.eq(group_id.as_str())),
                    )
                    .execute(conn)
                    .await?;

                    if affected_row_count == 0 {
                        return Err(DaoError::QueryFailure(diesel::result::Error::NotFound));
                    }

                    Ok(())
                })
            })
            .await
    }
}
