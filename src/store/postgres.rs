use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{Error, NewUser, Result, Store};
use crate::model::{CreatePost, Post, UpdatePost, User};

/// A [`Store`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgStore {
	pool: PgPool,
}

impl PgStore {
	/// Connects to the database and brings the schema up to date.
	pub async fn connect(url: &str) -> Result<Self> {
		let pool = PgPoolOptions::new().connect(url).await?;

		sqlx::migrate!().run(&pool).await?;

		Ok(Self { pool })
	}
}

/// Maps uniqueness violations to [`Error::Conflict`], keyed by constraint name.
fn conflict(error: sqlx::Error) -> Error {
	match error {
		sqlx::Error::Database(ref d) if d.is_unique_violation() => match d.constraint() {
			Some(constraint) => Error::Conflict(constraint.to_owned()),
			None => Error::Database(error),
		},
		error => Error::Database(error),
	}
}

#[async_trait::async_trait]
impl Store for PgStore {
	async fn posts(&self) -> Result<Vec<Post>> {
		let posts = sqlx::query_as::<_, Post>(
			r#"
				SELECT id, title, url, author, likes, user_id AS "user", created_at
				FROM post
				ORDER BY created_at
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		Ok(posts)
	}

	async fn post(&self, id: Uuid) -> Result<Option<Post>> {
		let post = sqlx::query_as::<_, Post>(
			r#"
				SELECT id, title, url, author, likes, user_id AS "user", created_at
				FROM post
				WHERE id = $1
			"#,
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		Ok(post)
	}

	async fn insert_post(&self, owner: Option<Uuid>, input: CreatePost) -> Result<Post> {
		let post = sqlx::query_as::<_, Post>(
			r#"
				INSERT INTO post (id, user_id, title, url, author, likes)
				VALUES (DEFAULT, $1, $2, $3, $4, $5)
				RETURNING id, title, url, author, likes, user_id AS "user", created_at
			"#,
		)
		.bind(owner)
		.bind(input.title)
		.bind(input.url)
		.bind(input.author)
		.bind(input.likes)
		.fetch_one(&self.pool)
		.await?;

		Ok(post)
	}

	async fn update_post(&self, id: Uuid, input: UpdatePost) -> Result<Option<Post>> {
		let post = sqlx::query_as::<_, Post>(
			r#"
				UPDATE post
				SET
					title = COALESCE($1, title),
					url = COALESCE($2, url),
					author = COALESCE($3, author),
					likes = COALESCE($4, likes)
				WHERE id = $5
				RETURNING id, title, url, author, likes, user_id AS "user", created_at
			"#,
		)
		.bind(input.title)
		.bind(input.url)
		.bind(input.author)
		.bind(input.likes)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		Ok(post)
	}

	async fn delete_post(&self, id: Uuid) -> Result<bool> {
		let status = sqlx::query("DELETE FROM post WHERE id = $1")
			.bind(id)
			.execute(&self.pool)
			.await?;

		Ok(status.rows_affected() > 0)
	}

	async fn users(&self) -> Result<Vec<User>> {
		let users = sqlx::query_as::<_, User>(
			r#"
				SELECT
					u.id, u.username, u.name, u.password, u.created_at,
					ARRAY(SELECT p.id FROM post p WHERE p.user_id = u.id ORDER BY p.created_at) AS blogs
				FROM "user" u
				ORDER BY u.created_at
			"#,
		)
		.fetch_all(&self.pool)
		.await?;

		Ok(users)
	}

	async fn user(&self, id: Uuid) -> Result<Option<User>> {
		let user = sqlx::query_as::<_, User>(
			r#"
				SELECT
					u.id, u.username, u.name, u.password, u.created_at,
					ARRAY(SELECT p.id FROM post p WHERE p.user_id = u.id ORDER BY p.created_at) AS blogs
				FROM "user" u
				WHERE u.id = $1
			"#,
		)
		.bind(id)
		.fetch_optional(&self.pool)
		.await?;

		Ok(user)
	}

	async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
		let user = sqlx::query_as::<_, User>(
			r#"
				SELECT
					u.id, u.username, u.name, u.password, u.created_at,
					ARRAY(SELECT p.id FROM post p WHERE p.user_id = u.id ORDER BY p.created_at) AS blogs
				FROM "user" u
				WHERE u.username = $1
			"#,
		)
		.bind(username)
		.fetch_optional(&self.pool)
		.await?;

		Ok(user)
	}

	async fn insert_user(&self, user: NewUser) -> Result<User> {
		let user = sqlx::query_as::<_, User>(
			r#"
				INSERT INTO "user" (id, username, name, password)
				VALUES ($1, $2, $3, $4)
				RETURNING id, username, name, password, created_at, ARRAY[]::uuid[] AS blogs
			"#,
		)
		.bind(user.id)
		.bind(user.username)
		.bind(user.name)
		.bind(user.password)
		.fetch_one(&self.pool)
		.await
		.map_err(conflict)?;

		Ok(user)
	}
}
