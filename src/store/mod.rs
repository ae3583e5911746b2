//! Persistence for posts and users.
//!
//! Handlers talk to a [`Store`] through the [`crate::Database`] handle. The
//! PostgreSQL implementation is used whenever a database url is configured,
//! the in-memory one otherwise (and in tests).

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use uuid::Uuid;

use crate::model::{CreatePost, Post, UpdatePost, User};

/// Name of the uniqueness constraint on `user.username`.
pub const USERNAME_KEY: &str = "user_username_key";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A uniqueness constraint was violated.
	#[error("constraint {0} violated")]
	Conflict(String),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
	#[error("migration error: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A user about to be inserted. The id is chosen up front since it salts
/// the password hash.
#[derive(Debug)]
pub struct NewUser {
	pub id: Uuid,
	pub username: String,
	pub name: String,
	pub password: Vec<u8>,
}

#[async_trait::async_trait]
pub trait Store: Send + Sync + 'static {
	/// Returns every post, oldest first.
	async fn posts(&self) -> Result<Vec<Post>>;

	async fn post(&self, id: Uuid) -> Result<Option<Post>>;

	async fn insert_post(&self, owner: Option<Uuid>, input: CreatePost) -> Result<Post>;

	/// Applies a partial update, returning `None` if the post does not exist.
	async fn update_post(&self, id: Uuid, input: UpdatePost) -> Result<Option<Post>>;

	/// Deletes a post, returning whether it existed.
	async fn delete_post(&self, id: Uuid) -> Result<bool>;

	/// Returns every user, oldest first.
	async fn users(&self) -> Result<Vec<User>>;

	async fn user(&self, id: Uuid) -> Result<Option<User>>;

	async fn user_by_username(&self, username: &str) -> Result<Option<User>>;

	/// Inserts a user, failing with [`Error::Conflict`] on a duplicate username.
	async fn insert_user(&self, user: NewUser) -> Result<User>;
}
