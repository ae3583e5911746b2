use chrono::{DateTime, Utc};
use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single blog post, linking to an article somewhere on the web.
///
/// `CreatePost` and `UpdatePost` are derived from this model and used as the
/// request bodies of the create and update endpoints.
#[model]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The title of the post.
	#[validate(length(min = 1, message = "title is required"))]
	pub title: String,
	/// Where the post can be read.
	#[validate(length(min = 1, message = "url is required"))]
	pub url: String,
	/// The author of the linked article.
	pub author: Option<String>,
	/// The number of likes, defaulting to zero.
	#[serde(default)]
	#[validate(range(min = 0, message = "likes must not be negative"))]
	pub likes: i64,
	/// The user that created the post. Posts created before authentication
	/// was introduced have no owner.
	#[serde(skip_deserializing)]
	pub user: Option<Uuid>,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: DateTime<Utc>,
}

impl Post {
	/// Applies a partial update, leaving fields absent from `input` unchanged.
	pub fn apply(&mut self, input: UpdatePost) {
		if let Some(title) = input.title {
			self.title = title;
		}

		if let Some(url) = input.url {
			self.url = url;
		}

		if input.author.is_some() {
			self.author = input.author;
		}

		if let Some(likes) = input.likes {
			self.likes = likes;
		}
	}
}

/// A single user.
///
/// The password hash is never serialized.
#[derive(Debug, Clone, Serialize, JsonSchema, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	pub id: Uuid,
	/// The unique name used to log in.
	pub username: String,
	/// The name that is displayed to the public.
	pub name: String,
	/// Argon2 hash of the password, salted with `id`.
	#[serde(skip)]
	pub password: Vec<u8>,
	/// The posts created by this user, oldest first.
	pub blogs: Vec<Uuid>,
	/// The creation time of the user.
	pub created_at: DateTime<Utc>,
}
