use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Validate, JsonSchema)]
pub struct LoginInput {
	pub username: String,
	pub password: String,
}

/// An access token and the user it was issued to.
#[derive(Serialize, JsonSchema)]
pub struct Token {
	/// Send this as `Authorization: Bearer <token>`.
	pub token: String,
	pub username: String,
	pub name: String,
}
