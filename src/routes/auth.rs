use axum::Json;
use axum::extract::State;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{LoginData, RegisterData};
use crate::types::response;
use crate::utils::auth::encode_jwt;

pub(crate) async fn register(
    State(state): State<AppState>,
    Json(user_data): Json<RegisterData>,
) -> Result<Json<response::User>, Error> {
    let user = state
        .user_controller
        .register(&user_data.username, &user_data.email, &user_data.password)
        .await?;

    Ok(Json(response::User::new(&user)))
}

pub(crate) async fn sign_in(
    State(state): State<AppState>,
    Json(user_data): Json<LoginData>,
) -> Result<Json<response::Token>, Error> {
    let user = state
        .user_controller
        .login(&user_data.email, &user_data.password)
        .await?;

    let token = encode_jwt(&user.username, &state.secret)?;

    Ok(Json(response::Token::new(&token)))
}
