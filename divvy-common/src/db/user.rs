use chrono::Utc;
use diesel::{dsl, ExpressionMethods, QueryDsl};
use diesel_async::RunQueryDsl;

use crate::db::{DaoError, DbAsyncPool};
use crate::models::user::{NewUser, User, UserChangeset};

use crate::schema::expense_splits as expense_split_fields;
use crate::schema::expense_splits::dsl::expense_splits;
use crate::schema::group_members as group_member_fields;
use crate::schema::group_members::dsl::group_members;
use crate::schema::users::dsl::users;

pub struct Dao {
    db_async_pool: DbAsyncPool,
}

impl Dao {
    pub fn new(db_async_pool: &DbAsyncPool) -> Self {
        Self {
            db_async_pool: db_async_pool.clone(),
        }
    }

    pub async fn create_user(
        &self,
        user_id: &str,
        name: &str,
        email: &str,
        created_by: Option<&str>,
    ) -> Result<(), DaoError> {
        let current_time = Utc::now().naive_utc();

        let new_user = NewUser {
            id: user_id,
            name,
            email,
            created_time: current_time,
            updated_time: current_time,
            created_by,
        };

        let mut conn = self.db_async_pool.get().await?;
        dsl::insert_into(users)
            .values(&new_user)
            .execute(&mut conn)
            .await?;

        Ok(())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        Ok(users.find(user_id).first::<User>(&mut conn).await?)
    }

    pub async fn user_exists(&self, user_id: &str) -> Result<bool, DaoError> {
        let mut conn = self.db_async_pool.get().await?;
        Ok(dsl::select(dsl::exists(users.find(user_id)))
            .get_result(&mut conn)
            .await?)
    }

    pub async fn update_user(
        &self,
        user_id: &str,
        name: Option<&str>,
        email: Option<&str>,
        updated_by: Option<&str>,
    ) -> Result<(), DaoError> {
        let changes = UserChangeset {
            name,
            email,
            updated_by,
            updated_time: Utc::now().naive_utc(),
        };

        let mut conn = self.db_async_pool.get().await?;
        let affected_row_count = dsl::update(users.find(user_id))
            .set(&changes)
            .execute(&mut conn)
            .await?;

        if affected_row_count == 0 {
            return Err(DaoError::QueryFailure(diesel::result::Error::NotFound));
        }

        Ok(())
    }

    /// Removes the user and their group memberships. Refuses to run while
    /// any expense split still references the user.
    pub async fn delete_user(&self, user_id: &str) -> Result<(), DaoError> {
        let mut db_connection = self.db_async_pool.get().await?;
        let user_id = user_id.to_owned();

        db_connection
            .build_transaction()
            .run::<_, DaoError, _>(|conn| {
                Box::pin(async move {
                    let referencing_split_count = expense_splits
                        .filter(expense_split_fields::user_id.eq(user_id.as_str()))
                        .count()
                        .get_result::<i64>(conn)
                        .await?;

                    if referencing_split_count != 0 {
                        return Err(DaoError::CannotRunQuery(
                            "User is still referenced by expense splits",
                        ));
                    }

                    diesel::delete(
                        group_members.filter(group_member_fields::user_id.eq(user_id.as_str())),
                    )
                    .execute(conn)
                    .await?;

                    let affected_row_count = diesel::delete(users.find(user_id.as_str()))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils;
    use crate::db::{expense, group};
    use rust_decimal::Decimal;

    fn dao() -> Dao {
        Dao::new(test_utils::db_async_pool())
    }

    #[tokio::test]
    async fn create_and_get_user_round_trips() {
        let dao = dao();
        let user_id = test_utils::unique_id("user");
        let email = test_utils::unique_email();

        dao.create_user(&user_id, "Ada Lovelace", &email, Some("admin"))
            .await
            .unwrap();

        let user = dao.get_user(&user_id).await.unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.email, email);
        assert_eq!(user.created_by.as_deref(), Some("admin"));
        assert_eq!(user.updated_by, None);
        assert_eq!(user.created_time, user.updated_time);

        test_utils::delete_user_row(&user_id).await;
    }

    #[tokio::test]
    async fn create_user_with_duplicate_email_fails() {
        let dao = dao();
        let first_id = test_utils::unique_id("user");
        let email = test_utils::unique_email();

        dao.create_user(&first_id, "First", &email, None)
            .await
            .unwrap();

        let second_id = test_utils::unique_id("user");
        let result = dao.create_user(&second_id, "Second", &email, None).await;

        assert!(matches!(
            result,
            Err(DaoError::QueryFailure(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            )))
        ));

        // The existing record is untouched
        let user = dao.get_user(&first_id).await.unwrap();
        assert_eq!(user.name, "First");
        assert!(dao.get_user(&second_id).await.is_err());

        test_utils::delete_user_row(&first_id).await;
    }

    #[tokio::test]
    async fn update_user_merges_partial_fields() {
        let dao = dao();
        let user_id = test_utils::unique_id("user");
        let email = test_utils::unique_email();

        dao.create_user(&user_id, "Before", &email, None)
            .await
            .unwrap();

        dao.update_user(&user_id, Some("After"), None, Some("editor"))
            .await
            .unwrap();

        let user = dao.get_user(&user_id).await.unwrap();
        assert_eq!(user.name, "After");
        assert_eq!(user.email, email);
        assert_eq!(user.updated_by.as_deref(), Some("editor"));

        test_utils::delete_user_row(&user_id).await;
    }

    #[tokio::test]
    async fn update_user_with_no_fields_stamps_timestamp_only() {
        let dao = dao();
        let user_id = test_utils::unique_id("user");
        let email = test_utils::unique_email();

        dao.create_user(&user_id, "Unchanged", &email, None)
            .await
            .unwrap();
        let before = dao.get_user(&user_id).await.unwrap();

        dao.update_user(&user_id, None, None, None).await.unwrap();

        let after = dao.get_user(&user_id).await.unwrap();
        assert_eq!(after.name, before.name);
        assert_eq!(after.email, before.email);
        assert_eq!(after.updated_by, before.updated_by);
        assert!(after.updated_time >= before.updated_time);

        test_utils::delete_user_row(&user_id).await;
    }

    #[tokio::test]
    async fn update_missing_user_reports_not_found() {
        let dao = dao();
        let result = dao
            .update_user(&test_utils::unique_id("missing"), Some("x"), None, None)
            .await;

        assert!(matches!(
            result,
            Err(DaoError::QueryFailure(diesel::result::Error::NotFound))
        ));
    }

    #[tokio::test]
    async fn delete_missing_user_reports_not_found() {
        let dao = dao();
        let result = dao.delete_user(&test_utils::unique_id("missing")).await;

        assert!(matches!(
            result,
            Err(DaoError::QueryFailure(diesel::result::Error::NotFound))
        ));
    }

    #[tokio::test]
    async fn delete_user_removes_group_memberships() {
        let user_dao = dao();
        let group_dao = group::Dao::new(test_utils::db_async_pool());

        let user_id = test_utils::insert_user(&user_dao).await;
        let group_id = test_utils::insert_group(&group_dao).await;
        group_dao.add_member(&group_id, &user_id).await.unwrap();

        user_dao.delete_user(&user_id).await.unwrap();

        let (_, member_ids) = group_dao.get_group(&group_id).await.unwrap();
        assert!(member_ids.is_empty());
        assert!(user_dao.get_user(&user_id).await.is_err());

        test_utils::delete_group_row(&group_id).await;
    }

    #[tokio::test]
    async fn delete_user_blocked_while_splits_reference_them() {
        let user_dao = dao();
        let group_dao = group::Dao::new(test_utils::db_async_pool());
        let expense_dao = expense::Dao::new(test_utils::db_async_pool());

        let user_id = test_utils::insert_user(&user_dao).await;
        let group_id = test_utils::insert_group(&group_dao).await;
        let (expense_id, _) = test_utils::insert_expense_with_split(
            &expense_dao,
            &group_id,
            &user_id,
            Decimal::new(2500, 2),
        )
        .await;

        let result = user_dao.delete_user(&user_id).await;
        assert!(matches!(result, Err(DaoError::CannotRunQuery(_))));

        // Still present
        assert!(user_dao.get_user(&user_id).await.is_ok());

        expense_dao
            .delete_expense(&group_id, &expense_id)
            .await
            .unwrap();
        user_dao.delete_user(&user_id).await.unwrap();
        test_utils::delete_group_row(&group_id).await;
    }
}
