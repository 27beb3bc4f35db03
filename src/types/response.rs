use serde::Serialize;

use crate::types::user::AuthorizedUser;

#[derive(Debug, Serialize)]
pub(crate) struct User {
    pub(crate) id: i32,
    pub(crate) username: String,
    pub(crate) email: String,
}

impl User {
    pub(crate) fn new(user: &AuthorizedUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Token {
    pub(crate) token: String,
}

impl Token {
    pub(crate) fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}
