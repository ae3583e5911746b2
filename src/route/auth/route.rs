use axum::extract::State;
use macros::route;

use crate::{extract::Json, openapi::tag, AppState};

use super::{hash_password, model, Error, RouteError};

/// Log in
/// Exchanges a username and password for a bearer token.
#[route(tag = tag::AUTH, response(status = 200, description = "Logged in successfully.", shape = "Json<model::Token>"))]
pub async fn login(
	State(state): State<AppState>,
	Json(input): Json<model::LoginInput>,
) -> Result<Json<model::Token>, RouteError> {
	let Some(user) = state.database.user_by_username(&input.username).await? else {
		return Err(Error::InvalidUsernameOrPassword.into());
	};

	let hashed = hash_password(&state.hasher, &input.password, &user.id).map_err(Error::Argon)?;

	if user.password != hashed {
		return Err(Error::InvalidUsernameOrPassword.into());
	}

	let token = state.tokens.issue(&user).map_err(Error::Token)?;

	tracing::info!(user = %user.id, "issued access token");

	Ok(Json(model::Token {
		token,
		username: user.username,
		name: user.name,
	}))
}
