use aide::axum::{routing::post_with, ApiRouter};
use argon2::Argon2;
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, token, AppState};

pub mod model;
pub mod route;

pub const KEY_LENGTH: usize = 32;

/// An error that can occur during authentication.
///
/// Note that the messages are presented to the client, so they should not contain
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no bearer token")]
	MissingToken,
	#[error("invalid bearer token")]
	InvalidToken,
	#[error("invalid username or password")]
	InvalidUsernameOrPassword,
	#[error("password hashing error: {0}")]
	Argon(#[from] argon2::Error),
	#[error("token signing error: {0}")]
	Token(#[from] token::Error),
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route("/", post_with(login, login_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::MissingToken | Self::InvalidToken | Self::InvalidUsernameOrPassword => {
				StatusCode::UNAUTHORIZED
			}
			Self::Argon(..) | Self::Token(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		match self {
			Self::MissingToken => error::Message::new("missing_token")
				.content("a bearer token is required")
				.into_vec(),
			Self::InvalidToken => error::Message::new("invalid_token")
				.content("the bearer token is missing, invalid or expired")
				.into_vec(),
			Self::InvalidUsernameOrPassword => error::Message::new("invalid_username_or_password")
				.content("invalid username or password")
				.into_vec(),
			Self::Argon(..) | Self::Token(..) => error::Message::new("internal_error").into_vec(),
		}
	}
}

/// Hashes a password with Argon2, using the user's id as a salt.
///
/// Used when registering and when logging in.
pub fn hash_password(
	hasher: &Argon2,
	password: &str,
	id: &Uuid,
) -> Result<[u8; KEY_LENGTH], argon2::Error> {
	let mut hash = [0; KEY_LENGTH];

	hasher.hash_password_into(password.as_bytes(), id.as_bytes(), &mut hash)?;
	Ok(hash)
}
