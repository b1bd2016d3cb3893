use crate::domain::types::{AppId, UserId};
use crate::repository::{UserReader, UserWriter};
use crate::store::StoreError;

/// How a remote session identifies itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Token issued to the client out of band.
    CustomToken(String),
    /// A fresh identity is created for this session.
    Anonymous,
}

impl Credentials {
    /// Custom-token sign-in when a non-blank token is configured, anonymous otherwise.
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some(token) if !token.is_empty() => Credentials::CustomToken(token.to_string()),
            _ => Credentials::Anonymous,
        }
    }
}

/// Resolves the user the session acts as.
pub fn sign_in<R>(repo: &R, app_id: &AppId, credentials: &Credentials) -> Result<UserId, StoreError>
where
    R: UserReader + UserWriter,
{
    match credentials {
        Credentials::CustomToken(token) => match repo.get_user_by_token(app_id, token) {
            Ok(Some(user_id)) => Ok(user_id),
            Ok(None) => Err(StoreError::Authentication(
                "sign-in token is not recognized".to_string(),
            )),
            Err(e) => Err(StoreError::Authentication(e.to_string())),
        },
        Credentials::Anonymous => repo
            .create_user(app_id, None)
            .map_err(|e| StoreError::Authentication(e.to_string())),
    }
}
