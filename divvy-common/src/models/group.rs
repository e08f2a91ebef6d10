use chrono::NaiveDateTime;
use diesel::{AsChangeset, Insertable, Queryable, QueryableByName};
use serde::{Deserialize, Serialize};

use crate::schema::groups;

#[derive(Debug, Serialize, Deserialize, Identifiable, Queryable, QueryableByName)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Group {
    pub id: String,
    pub name: String,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewGroup<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub created_time: NaiveDateTime,
    pub updated_time: NaiveDateTime,
    pub created_by: Option<&'a str>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GroupChangeset<'a> {
    pub name: Option<&'a str>,
    pub updated_by: Option<&'a str>,
    pub updated_time: NaiveDateTime,
}
