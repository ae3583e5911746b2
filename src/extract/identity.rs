use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::{header, request},
};
use uuid::Uuid;

use crate::{error::RouteError, openapi::SECURITY_SCHEME_BEARER, route::auth, token::Tokens};

pub const AUTHORIZATION_PREFIX: &str = "Bearer ";

/// The identity behind a verified bearer token.
///
/// If the `Authorization` header is absent, a [`auth::Error::MissingToken`] is returned.
/// If the token is malformed, forged, expired or has no user id as its subject,
/// a [`auth::Error::InvalidToken`] is returned.
///
/// Resolving an identity does not touch the store.
///
/// ```rust
/// async fn route(identity: Identity) {
///   println!("{}", identity.subject);
/// }
/// ```
#[derive(Debug)]
pub struct Identity {
	/// The id of the user the token was issued to.
	pub subject: Uuid,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Identity
where
	Tokens: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = RouteError<auth::Error>;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let header = parts
			.headers
			.get(header::AUTHORIZATION)
			.ok_or(auth::Error::MissingToken)?;

		let token = header
			.to_str()
			.ok()
			.and_then(|value| value.strip_prefix(AUTHORIZATION_PREFIX))
			.ok_or(auth::Error::InvalidToken)?;

		let subject = Tokens::from_ref(state).resolve(token).map_err(|error| {
			tracing::debug!(%error, "rejected bearer token");
			auth::Error::InvalidToken
		})?;

		Ok(Self { subject })
	}
}

impl OperationInput for Identity {
	/// Operation input for the identity extractor.
	///
	/// This adds a bearer token requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.push(
			[(SECURITY_SCHEME_BEARER.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		);
	}
}
