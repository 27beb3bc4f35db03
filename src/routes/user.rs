use axum::Json;
use axum::extract::{Extension, State};

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::AuthorizedUser;
use crate::types::response;

pub(crate) async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthorizedUser>,
) -> Result<Json<response::User>, Error> {
    let user = state.user_controller.get_profile(user.id).await?;

    Ok(Json(response::User::new(&user)))
}
