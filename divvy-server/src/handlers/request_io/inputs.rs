use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use divvy_common::models::expense_split::SplitType;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub created_by: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputEditUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputGroup {
    pub group_id: String,
    pub name: String,
    pub created_by: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputEditGroup {
    pub name: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputGroupMember {
    pub user_id: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputExpenseSplit {
    pub split_id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub split_type: SplitType,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputExpense {
    pub expense_id: String,
    pub amount: Decimal,
    pub description: String,
    pub created_by: Option<String>,
    pub splits: Vec<InputExpenseSplit>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct InputEditExpense {
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub updated_by: Option<String>,
}
