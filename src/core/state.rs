use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::controllers::user::UserController;
use crate::core::error::ConfigError;
use crate::core::store::PgStore;

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pub(crate) pool: PgPool,
    pub(crate) secret: String,
    pub(crate) user_controller: UserController<PgStore>,
}

impl AppState {
    pub(crate) async fn new(database_url: &str, secret: String) -> Result<Self, ConfigError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(AppState {
            pool: pool.clone(),
            secret,
            user_controller: UserController::new(PgStore::new(pool))?,
        })
    }
}
