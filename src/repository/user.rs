use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::types::{AppId, UserId};
use crate::models::user::NewUser;
use crate::repository::{DieselRepository, RepositoryResult, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn get_user_by_token(&self, app_id: &AppId, token: &str) -> RepositoryResult<Option<UserId>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let id = users::table
            .filter(users::app_id.eq(app_id.as_str()))
            .filter(users::token.eq(token))
            .select(users::id)
            .first::<String>(&mut conn)
            .optional()?;

        Ok(id.map(UserId::new).transpose()?)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, app_id: &AppId, token: Option<&str>) -> RepositoryResult<UserId> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = NewUser {
            id: Uuid::new_v4().to_string(),
            app_id: app_id.as_str(),
            token,
            created_at: Utc::now().naive_utc(),
        };

        diesel::insert_into(users::table)
            .values(&user)
            .execute(&mut conn)?;

        Ok(UserId::new(user.id)?)
    }
}
