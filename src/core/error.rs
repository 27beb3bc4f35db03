use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Database migration error: {0}")]
    DatabaseMigration(#[from] sqlx::migrate::MigrateError),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("No credentials provided")]
    NoCredentials,
    #[error("Expired JWT")]
    ExpiredJWT,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("Invalid username")]
    InvalidUsername,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Invalid password: {0}")]
    InvalidPassword(String),
    #[error("Header decode error: {0}")]
    HeaderDecode(#[from] axum::http::header::ToStrError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("{:?}", self);

        let (status, message) = match self {
            Error::Sql(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SQL error"),
            Error::Jwt(_) => (StatusCode::UNAUTHORIZED, "Invalid token"),
            Error::NoCredentials => (StatusCode::UNAUTHORIZED, "No credentials provided"),
            Error::ExpiredJWT => (StatusCode::UNAUTHORIZED, "Expired JWT"),
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            Error::UserAlreadyExists => (StatusCode::CONFLICT, "User already exists"),
            Error::UserNotFound => (StatusCode::NOT_FOUND, "User not found"),
            Error::Bcrypt(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Bcrypt error"),
            Error::InvalidUsername => (StatusCode::BAD_REQUEST, "Invalid username"),
            Error::InvalidEmail => (StatusCode::BAD_REQUEST, "Invalid email"),
            Error::InvalidPassword(_) => (StatusCode::BAD_REQUEST, "Invalid password"),
            Error::HeaderDecode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Header decode error"),
        };

        (status, message).into_response()
    }
}
