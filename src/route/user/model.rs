use schemars::JsonSchema;
use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate, JsonSchema)]
pub struct RegisterInput {
	/// The unique name used to log in.
	#[validate(length(min = 3, message = "username must be at least 3 characters long"))]
	pub username: String,
	/// The name that is displayed to the public.
	pub name: String,
	#[validate(length(min = 3, message = "password must be at least 3 characters long"))]
	pub password: String,
}
