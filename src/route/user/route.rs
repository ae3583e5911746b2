use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::Json,
	model::User,
	openapi::tag,
	route::auth::hash_password,
	store::{self, NewUser},
	AppState, Database,
};

use super::{model, Error, RouteError};

/// Get all users
/// Returns every registered user along with the ids of their posts.
#[route(tag = tag::USER)]
pub async fn list_users(State(database): State<Database>) -> Result<Json<Vec<User>>, RouteError> {
	Ok(Json(database.users().await?))
}

/// Register user
/// Creates a new account. Usernames must be unique.
#[route(tag = tag::USER, response(status = 201, description = "Registered successfully.", shape = "Json<User>"))]
pub async fn create_user(
	State(state): State<AppState>,
	Json(input): Json<model::RegisterInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let id = Uuid::new_v4();
	let password = hash_password(&state.hasher, &input.password, &id).map_err(Error::Argon)?;

	let user = state
		.database
		.insert_user(NewUser {
			id,
			username: input.username,
			name: input.name,
			password: password.to_vec(),
		})
		.await
		.map_err(|e| match e {
			store::Error::Conflict(ref key) if key == store::USERNAME_KEY => {
				Error::UsernameTaken.into()
			}
			e => RouteError::from(e),
		})?;

	tracing::info!(user = %user.id, username = %user.username, "registered user");

	Ok((StatusCode::CREATED, Json(user)).into_response())
}
