use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Diesel model representing the `users` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::users)]
pub struct User {
    pub id: String,
    pub app_id: String,
    pub token: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`User`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub id: String,
    pub app_id: &'a str,
    pub token: Option<&'a str>,
    pub created_at: NaiveDateTime,
}
