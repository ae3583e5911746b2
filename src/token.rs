use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::User;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid token: {0}")]
	Jwt(#[from] jsonwebtoken::errors::Error),
	#[error("token subject is not a user id")]
	Subject(#[from] uuid::Error),
	#[error("token expiry is out of range")]
	Expiry,
}

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
	/// The id of the user the token was issued to.
	pub sub: String,
	pub username: String,
	pub iat: i64,
	pub exp: i64,
}

/// Issues and verifies signed, stateless access tokens.
#[derive(Clone)]
pub struct Tokens {
	encoding: EncodingKey,
	decoding: DecodingKey,
	validation: Validation,
	ttl: Duration,
}

impl Tokens {
	pub fn new(secret: &[u8], ttl: Duration) -> Self {
		let mut validation = Validation::new(ALGORITHM);

		validation.leeway = 0;
		validation.set_required_spec_claims(&["exp", "sub"]);

		Self {
			encoding: EncodingKey::from_secret(secret),
			decoding: DecodingKey::from_secret(secret),
			validation,
			ttl,
		}
	}

	/// Issues a token for `user`, valid for the configured ttl.
	pub fn issue(&self, user: &User) -> Result<String, Error> {
		self.issue_at(user, Utc::now())
	}

	fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, Error> {
		self.sign(&Claims {
			sub: user.id.to_string(),
			username: user.username.clone(),
			iat: now.timestamp(),
			exp: now
				.checked_add_signed(self.ttl)
				.ok_or(Error::Expiry)?
				.timestamp(),
		})
	}

	fn sign(&self, claims: &Claims) -> Result<String, Error> {
		Ok(jsonwebtoken::encode(
			&Header::new(ALGORITHM),
			claims,
			&self.encoding,
		)?)
	}

	/// Verifies the signature and expiry of `token`, returning its subject.
	///
	/// Any textual form of the subject id is accepted, so ids compare equal
	/// regardless of how the issuer formatted them.
	pub fn resolve(&self, token: &str) -> Result<Uuid, Error> {
		let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;

		Ok(Uuid::parse_str(&data.claims.sub)?)
	}
}
