use diesel::{Insertable, Queryable};

use crate::schema::group_members;

#[derive(Debug, Queryable)]
pub struct GroupMember {
    pub user_id: String,
    pub group_id: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = group_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewGroupMember<'a> {
    pub user_id: &'a str,
    pub group_id: &'a str,
}
