use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use divvy_common::models::expense_split::SplitType;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputGroup {
    pub group_id: String,
    pub name: String,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub members: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputExpenseSplit {
    pub split_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub split_type: SplitType,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputExpense {
    pub expense_id: String,
    pub group_id: String,
    pub amount: Decimal,
    pub description: String,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub splits: Vec<OutputExpenseSplit>,
}
