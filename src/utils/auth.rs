use axum::extract::State;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{self, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::state::AppState;

#[derive(Deserialize, Serialize, Debug)]
pub(crate) struct Claims {
    pub(crate) exp: usize,
    pub(crate) iat: usize,
    pub(crate) sub: String,
    pub(crate) iss: String,
}

pub(crate) fn encode_jwt(subject: &str, secret: &str) -> Result<String, Error> {
    let current_time = Utc::now();
    let expiration_time = current_time + Duration::hours(24);

    let claims = Claims {
        exp: expiration_time.timestamp() as usize,
        iat: current_time.timestamp() as usize,
        sub: subject.to_string(),
        iss: "authcore".into(),
    };

    Ok(jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

pub(crate) fn decode_jwt(token: &str, secret: &str) -> Result<TokenData<Claims>, Error> {
    match jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    ) {
        Ok(token_data) => Ok(token_data),
        Err(e) => match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(Error::ExpiredJWT),
            _ => Err(Error::Jwt(e)),
        },
    }
}

pub(crate) async fn authorize(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response<Body>, Error> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or(Error::NoCredentials)?;

    let mut header = auth_header.to_str()?.split_whitespace();

    let (_bearer, token) = (header.next(), header.next().unwrap_or_default());

    let token_data = decode_jwt(token, &state.secret)?;

    let user = state
        .user_controller
        .get_user_by_username(&token_data.claims.sub)
        .await?
        .ok_or(Error::Unauthorized)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
