use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Error, NewUser, Result, Store, USERNAME_KEY};
use crate::model::{CreatePost, Post, UpdatePost, User};

#[derive(Debug, Default)]
struct Tables {
	posts: Vec<Post>,
	users: Vec<User>,
}

/// A [`Store`] that keeps everything in process memory.
///
/// Rows are kept in insertion order, which doubles as creation order.
#[derive(Debug, Default)]
pub struct MemoryStore {
	tables: RwLock<Tables>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait::async_trait]
impl Store for MemoryStore {
	async fn posts(&self) -> Result<Vec<Post>> {
		Ok(self.tables.read().await.posts.clone())
	}

	async fn post(&self, id: Uuid) -> Result<Option<Post>> {
		let tables = self.tables.read().await;

		Ok(tables.posts.iter().find(|post| post.id == id).cloned())
	}

	async fn insert_post(&self, owner: Option<Uuid>, input: CreatePost) -> Result<Post> {
		let mut tables = self.tables.write().await;
		let post = Post {
			id: Uuid::new_v4(),
			title: input.title,
			url: input.url,
			author: input.author,
			likes: input.likes,
			user: owner,
			created_at: Utc::now(),
		};

		if let Some(user) = owner.and_then(|id| tables.users.iter_mut().find(|u| u.id == id)) {
			user.blogs.push(post.id);
		}

		tables.posts.push(post.clone());

		Ok(post)
	}

	async fn update_post(&self, id: Uuid, input: UpdatePost) -> Result<Option<Post>> {
		let mut tables = self.tables.write().await;
		let Some(post) = tables.posts.iter_mut().find(|post| post.id == id) else {
			return Ok(None);
		};

		post.apply(input);

		Ok(Some(post.clone()))
	}

	async fn delete_post(&self, id: Uuid) -> Result<bool> {
		let mut tables = self.tables.write().await;
		let Some(index) = tables.posts.iter().position(|post| post.id == id) else {
			return Ok(false);
		};

		tables.posts.remove(index);

		for user in &mut tables.users {
			user.blogs.retain(|blog| *blog != id);
		}

		Ok(true)
	}

	async fn users(&self) -> Result<Vec<User>> {
		Ok(self.tables.read().await.users.clone())
	}

	async fn user(&self, id: Uuid) -> Result<Option<User>> {
		let tables = self.tables.read().await;

		Ok(tables.users.iter().find(|user| user.id == id).cloned())
	}

	async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
		let tables = self.tables.read().await;

		Ok(tables
			.users
			.iter()
			.find(|user| user.username == username)
			.cloned())
	}

	async fn insert_user(&self, user: NewUser) -> Result<User> {
		let mut tables = self.tables.write().await;

		if tables.users.iter().any(|u| u.username == user.username) {
			return Err(Error::Conflict(USERNAME_KEY.into()));
		}

		let user = User {
			id: user.id,
			username: user.username,
			name: user.name,
			password: user.password,
			blogs: Vec::new(),
			created_at: Utc::now(),
		};

		tables.users.push(user.clone());

		Ok(user)
	}
}
