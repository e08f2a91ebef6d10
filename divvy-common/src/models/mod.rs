pub mod expense;
pub mod expense_split;
pub mod group;
pub mod group_member;
pub mod user;
