use diesel::deserialize::{self, FromSql};
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types;
use diesel::{Insertable, Queryable, QueryableByName};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

use crate::schema::expense_splits;

/// Whether the user paid this share of the expense or still owes it.
/// Persisted as its uppercase name in a `TEXT` column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[diesel(sql_type = sql_types::Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitType {
    Paid,
    Owes,
}

impl SplitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitType::Paid => "PAID",
            SplitType::Owes => "OWES",
        }
    }
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql<sql_types::Text, Pg> for SplitType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<sql_types::Text, Pg> for SplitType {
    fn from_sql(value: PgValue) -> deserialize::Result<Self> {
        match value.as_bytes() {
            b"PAID" => Ok(SplitType::Paid),
            b"OWES" => Ok(SplitType::Owes),
            other => Err(format!(
                "Unrecognized split type: {}",
                String::from_utf8_lossy(other)
            )
            .into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Identifiable, Queryable, QueryableByName)]
#[diesel(table_name = expense_splits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ExpenseSplit {
    pub id: String,
    pub expense_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub split_type: SplitType,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = expense_splits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewExpenseSplit<'a> {
    pub id: &'a str,
    pub expense_id: &'a str,
    pub user_id: &'a str,
    pub amount: Decimal,
    pub split_type: SplitType,
}
