use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

use crate::core::error::Error;
use crate::types::AuthorizedUser;

/// Read/write contract the identity service depends on. Kept narrow so the
/// relational backend can be swapped without touching the service logic.
#[async_trait]
pub(crate) trait UserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthorizedUser>, Error>;
    async fn find_by_username(&self, username: &str) -> Result<Option<AuthorizedUser>, Error>;
    async fn find_by_id(&self, id: i32) -> Result<Option<AuthorizedUser>, Error>;
    async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<AuthorizedUser, Error>;
}

#[derive(Clone, Debug)]
pub(crate) struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthorizedUser>, Error> {
        match sqlx::query(
            "SELECT id, username, email, password_hash FROM users WHERE email = $1;",
        )
        .bind(email)
        .map(map_user)
        .fetch_one(&self.pool)
        .await
        {
            Ok(user) => Ok(Some(user)),
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AuthorizedUser>, Error> {
        match sqlx::query(
            "SELECT id, username, email, password_hash FROM users WHERE username = $1;",
        )
        .bind(username)
        .map(map_user)
        .fetch_one(&self.pool)
        .await
        {
            Ok(user) => Ok(Some(user)),
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<AuthorizedUser>, Error> {
        match sqlx::query("SELECT id, username, email, password_hash FROM users WHERE id = $1;")
            .bind(id)
            .map(map_user)
            .fetch_one(&self.pool)
            .await
        {
            Ok(user) => Ok(Some(user)),
            Err(sqlx::Error::RowNotFound) => Ok(None),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<AuthorizedUser, Error> {
        match sqlx::query(
            "INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash;",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .map(map_user)
        .fetch_one(&self.pool)
        .await
        {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(Error::UserAlreadyExists)
            }
            Err(e) => Err(Error::Sql(e)),
        }
    }
}

fn map_user(row: PgRow) -> AuthorizedUser {
    AuthorizedUser {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
    }
}
