use chrono::NaiveDateTime;
use diesel::{AsChangeset, Insertable, Queryable, QueryableByName};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schema::expenses;

#[derive(Debug, Serialize, Deserialize, Identifiable, Queryable, QueryableByName)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Expense {
    pub id: String,
    pub group_id: String,
    pub amount: Decimal,
    pub description: String,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewExpense<'a> {
    pub id: &'a str,
    pub group_id: &'a str,
    pub amount: Decimal,
    pub description: &'a str,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
    pub created_by: Option<&'a str>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = expenses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExpenseChangeset<'a> {
    pub amount: Option<Decimal>,
    pub description: Option<&'a str>,
    pub updated_by: Option<&'a str>,
    pub updated_time: NaiveDateTime,
}
