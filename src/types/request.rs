use serde::Deserialize;

#[derive(Deserialize)]
pub(crate) struct RegisterData {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Deserialize)]
pub(crate) struct LoginData {
    pub(crate) email: String,
    pub(crate) password: String,
}
