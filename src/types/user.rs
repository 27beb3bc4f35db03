/// Full user row, including the password hash. Never serialized; outward
/// responses go through `response::User`.
#[derive(Clone, Debug, sqlx::FromRow)]
pub(crate) struct AuthorizedUser {
    pub(crate) id: i32,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
}
