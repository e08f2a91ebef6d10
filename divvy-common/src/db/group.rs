use chrono::Utc;
use diesel::{dsl, ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;

use crate::db::{DaoError, DbAsyncPool};
use crate::models::group::{Group, GroupChangeset, NewGroup};
use crate::models::group_member::NewGroupMember;

use crate::schema::expense_splits as expense_split_fields;
use crate::schema::expense_splits::dsl::expense_splits;
use crate::schema::expenses as expense_fields;
use crate::schema::expenses::dsl::expenses;
use crate::schema::group_members as group_member_fields;
use crate::schema::group_members::dsl::group_members;
use crate::schema::groups::dsl::groups;

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    pub async fn create_group(
        &self,
        group_id: &str,
        name: &str,
        created_by: Option<&str>,
    ) -> Result<(), DaoError> {
        let current_time = Utc::now().naive_utc();

        let new_group = NewGroup {
            id: group_id,
            name,
            created_time: current_time,
            updated_time: current_time,
            created_by,
        };

        let mut conn = self.db_async_pool.get().await?;
        dsl::insert_into(groups)
            .values(&new_group)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    /// Fetches the group and the ids of its members.
    pub async fn get_group(&self, group_id: &str) -> Result<(Group, Vec<String>), DaoError> {
        let mut conn = self.db_async_pool.get().await?;

        let group = groups.find(group_id).first::<Group>(&mut conn).await?;

        let member_ids = group_members
            .filter(group_member_fields::group_id.eq(group_id))
            .select(group_member_fields::user_id)
            .order(group_member_fields::user_id.asc())
            .load::<String>(&mut conn)
            .await?;

        Ok((group, member_ids))
    }

    pub async fn group_exists(&self, group_id: &str) -> Result<bool, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        Ok(dsl::select(dsl::exists(groups.find(group_id)))
            .get_result(&mut conn)
            .await?)
    }

    pub async fn update_group(
        &self,
        group_id: &str,
        name: Option<&str>,
        updated_by: Option<&str>,
    ) -> Result<(), DaoError> {
        let changes = GroupChangeset {
            name,
            updated_by,
            updated_time: Utc::now().naive_utc(),
        };

        let mut conn = self.db_async_pool.get().await?;
        let affected_row_count = dsl::update(groups.find(group_id))
            .set(&changes)
            .execute(&mut conn)
            .await?;

        if affected_row_count == 0 {
            return Err(DaoError::QueryFailure(diesel::result::Error::NotFound));
        }

        Ok(())
    }

    /// Removes the group along with its expenses, their splits, and its
    /// membership rows, all in one transaction.
    pub async fn delete_group(&self, group_id: &str) -> Result<(), DaoError> {
        let mut db_connection = self.db_async_pool.get().await?;
        let group_id = group_id.to_owned();

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                Box::pin(async move {
                    let expense_ids = expenses
                        .filter(expense_fields::group_id.eq(group_id.as_str()))
                        .select(expense_fields::id)
                        .load::<String>(conn)
                        .await?;

                    diesel::delete(
                        expense_splits
                            .filter(expense_split_fields::expense_id.eq_any(&expense_ids)),
                    )
                    .execute(conn)
                    .await?;

                    diesel::delete(
                        expenses.filter(expense_fields::group_id.eq(group_id.as_str())),
                    )
                    .execute(conn)
                    .await?;

                    diesel::delete(
                        group_members.filter(group_member_fields::group_id.eq(group_id.as_str())),
                    )
                    .execute(conn)
                    .await?;

                    let affected_row_count = diesel::delete(groups.find(group_id.as_str()))
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

    /// Fails with a unique violation if the user is already a member.
    pub async fn add_member(&self, group_id: &str, user_id: &str) -> Result<(), DaoError> {
        let new_member = NewGroupMember { user_id, group_id };

        let mut conn = self.db_async_pool.get().await?;
        dsl::insert_into(group_members)
            .values(&new_member)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    pub async fn remove_member(&self, group_id: &str, user_id: &str) -> Result<(), DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        let affected_row_count = diesel::delete(
            group_members
                .filter(group_member_fields::group_id.eq(group_id))
                .filter(group_member_fields::user_id.eq(user_id)),
        )
        .execute(&mut conn)
        .await?;

        if affected_row_count == 0 {
            return Err(DaoError::QueryFailure(diesel::result::Error::NotFound));
        }

        Ok(())
    }
}
