use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, ownership::Denied, AppState};

pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("unknown user {0}")]
	UnknownUser(Uuid),
	#[error("post {0} belongs to another user")]
	NotOwner(Uuid),
	#[error("post {0} has no owner")]
	UnownedPost(Uuid),
}

impl Error {
	pub fn denied(post: Uuid, denied: Denied) -> Self {
		match denied {
			Denied::NotOwner => Self::NotOwner(post),
			Denied::Unowned => Self::UnownedPost(post),
		}
	}
}

pub type RouteError = error::RouteError<Error>;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(get_blogs, get_blogs_docs).post_with(create_blog, create_blog_docs),
		)
		.api_route("/stats", get_with(get_stats, get_stats_docs))
		.api_route(
			"/:id",
			get_with(get_blog, get_blog_docs)
				.put_with(update_blog, update_blog_docs)
				.delete_with(delete_blog, delete_blog_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::UnknownUser(..) | Self::NotOwner(..) | Self::UnownedPost(..) => {
				StatusCode::UNAUTHORIZED
			}
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		match self {
			Self::UnknownPost(post) => error::Message::new("unknown_post")
				.content("the post does not exist")
				.detail("post", post.to_string())
				.into_vec(),
			Self::UnknownUser(..) => error::Message::new("unknown_user")
				.content("the token belongs to a user that no longer exists")
				.into_vec(),
			Self::NotOwner(post) => error::Message::new("not_owner")
				.content("only the creator of a post can modify it")
				.detail("post", post.to_string())
				.into_vec(),
			Self::UnownedPost(post) => error::Message::new("unowned_post")
				.content("posts without a creator cannot be modified")
				.detail("post", post.to_string())
				.into_vec(),
		}
	}
}

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use crate::{model::CreatePost, test::*};

	async fn create(
		app: &TestApp,
		token: &HeaderValue,
		body: serde_json::Value,
	) -> serde_json::Value {
		let response = app
			.server
			.post("/api/blogs")
			.add_header(AUTHORIZATION, token.clone())
			.json(&body)
			.await;

		response.assert_status(StatusCode::CREATED);
		response.json()
	}

	#[tokio::test]
	async fn test_posts_are_returned_as_json_with_ids() {
		let app = TestApp::new();
		let token = app.user_token("mluukkai").await;

		create(
			&app,
			&token,
			json!({ "title": "React patterns", "author": "Michael Chan", "url": "https://reactpatterns.com/", "likes": 7 }),
		)
		.await;
		create(
			&app,
			&token,
			json!({ "title": "Go To Statement Considered Harmful", "author": "Edsger W. Dijkstra", "url": "http://www.u.arizona.edu/", "likes": 5 }),
		)
		.await;

		let response = app.server.get("/api/blogs").await;

		response.assert_status_ok();
		assert!(response
			.header("content-type")
			.to_str()
			.unwrap()
			.starts_with("application/json"));

		let posts = response.json::<serde_json::Value>();
		let posts = posts.as_array().unwrap();
		assert_eq!(posts.len(), 2);
		assert!(posts.iter().all(|post| post["id"].is_string()));
		assert!(posts.iter().all(|post| post.get("_id").is_none()));
	}

	#[tokio::test]
	async fn test_create_records_owner_and_defaults_likes() {
		let app = TestApp::new();
		let token = app.user_token("mluukkai").await;

		let post = create(
			&app,
			&token,
			json!({ "title": "Type wars", "author": "Robert C. Martin", "url": "http://blog.cleancoder.com" }),
		)
		.await;

		assert_eq!(post["likes"], 0);
		assert_eq!(post["title"], "Type wars");

		let users = app.server.get("/api/users").await.json::<serde_json::Value>();
		assert_eq!(post["user"], users[0]["id"]);

		let posts = app.server.get("/api/blogs").await.json::<serde_json::Value>();
		let posts = posts.as_array().unwrap();
		assert_eq!(posts.len(), 1);
		assert_eq!(posts[0]["title"], "Type wars");
		assert_eq!(posts[0]["likes"], 0);
	}

	#[tokio::test]
	async fn test_create_requires_title_and_url() {
		let app = TestApp::new();
		let token = app.user_token("mluukkai").await;

		for body in [
			json!({ "author": "Robert C. Martin", "url": "http://blog.cleancoder.com" }),
			json!({ "title": "Type wars", "author": "Robert C. Martin" }),
			json!({ "title": "", "url": "http://blog.cleancoder.com" }),
			json!({ "title": "Type wars", "url": "http://blog.cleancoder.com", "likes": -1 }),
		] {
			app.server
				.post("/api/blogs")
				.add_header(AUTHORIZATION, token.clone())
				.json(&body)
				.expect_failure()
				.await
				.assert_status(StatusCode::BAD_REQUEST);
		}

		assert!(app.state.database.posts().await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn test_create_rejects_deleted_user() {
		let app = TestApp::new();
		let token = app
			.state
			.tokens
			.issue(&crate::model::User {
				id: Uuid::new_v4(),
				username: "ghost".into(),
				name: "Ghost".into(),
				password: Vec::new(),
				blogs: Vec::new(),
				created_at: chrono::Utc::now(),
			})
			.unwrap();

		let response = app
			.server
			.post("/api/blogs")
			.add_header(AUTHORIZATION, bearer(&token))
			.json(&json!({ "title": "t", "url": "u" }))
			.expect_failure()
			.await;

		response.assert_status(StatusCode::UNAUTHORIZED);
		assert_eq!(
			response.json::<serde_json::Value>()["errors"][0]["code"],
			"unknown_user"
		);
	}

	#[tokio::test]
	async fn test_get_single_post() {
		let app = TestApp::new();
		let token = app.user_token("mluukkai").await;
		let post = create(&app, &token, json!({ "title": "t", "url": "u" })).await;

		let response = app
			.server
			.get(&format!("/api/blogs/{}", post["id"].as_str().unwrap()))
			.await;

		response.assert_status_ok();
		assert_eq!(response.json::<serde_json::Value>(), post);

		app.server
			.get(&format!("/api/blogs/{}", Uuid::new_v4()))
			.expect_failure()
			.await
			.assert_status(StatusCode::NOT_FOUND);

		app.server
			.get("/api/blogs/12345")
			.expect_failure()
			.await
			.assert_status(StatusCode::BAD_REQUEST);
	}

	#[tokio::test]
	async fn test_update_is_partial_and_idempotent() {
		let app = TestApp::new();
		let token = app.user_token("mluukkai").await;
		let post = create(&app, &token, json!({ "title": "t", "url": "u", "likes": 3 })).await;
		let path = format!("/api/blogs/{}", post["id"].as_str().unwrap());

		let first = app
			.server
			.put(&path)
			.add_header(AUTHORIZATION, token.clone())
			.json(&json!({ "likes": 10 }))
			.await;

		first.assert_status_ok();

		let first = first.json::<serde_json::Value>();
		assert_eq!(first["likes"], 10);
		assert_eq!(first["title"], "t");
		assert_eq!(first["url"], "u");

		let second = app
			.server
			.put(&path)
			.add_header(AUTHORIZATION, token.clone())
			.json(&json!({ "likes": 10 }))
			.await
			.json::<serde_json::Value>();

		assert_eq!(first, second);
	}

	#[tokio::test]
	async fn test_update_and_delete_report_bad_ids() {
		let app = TestApp::new();
		let token = app.user_token("mluukkai").await;

		app.server
			.put(&format!("/api/blogs/{}", Uuid::new_v4()))
			.add_header(AUTHORIZATION, token.clone())
			.json(&json!({ "likes": 1 }))
			.expect_failure()
			.await
			.assert_status(StatusCode::NOT_FOUND);

		app.server
			.delete(&format!("/api/blogs/{}", Uuid::new_v4()))
			.add_header(AUTHORIZATION, token.clone())
			.expect_failure()
			.await
			.assert_status(StatusCode::NOT_FOUND);

		app.server
			.delete("/api/blogs/not-an-id")
			.add_header(AUTHORIZATION, token.clone())
			.expect_failure()
			.await
			.assert_status(StatusCode::BAD_REQUEST);

		app.server
			.put("/api/blogs/not-an-id")
			.add_header(AUTHORIZATION, token.clone())
			.json(&json!({ "likes": 1 }))
			.expect_failure()
			.await
			.assert_status(StatusCode::BAD_REQUEST);

		// identity is checked before the id
		app.server
			.delete("/api/blogs/not-an-id")
			.expect_failure()
			.await
			.assert_status(StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn test_owner_can_delete() {
		let app = TestApp::new();
		let token = app.user_token("mluukkai").await;
		let post = create(&app, &token, json!({ "title": "t", "url": "u" })).await;

		app.server
			.delete(&format!("/api/blogs/{}", post["id"].as_str().unwrap()))
			.add_header(AUTHORIZATION, token)
			.await
			.assert_status(StatusCode::NO_CONTENT);

		assert!(app.state.database.posts().await.unwrap().is_empty());

		let users = app.server.get("/api/users").await.json::<serde_json::Value>();
		assert_eq!(users[0]["blogs"], json!([]));
	}

	#[tokio::test]
	async fn test_other_users_cannot_modify() {
		let app = TestApp::new();
		let owner = app.user_token("mluukkai").await;
		let other = app.user_token("hellas").await;
		let post = create(&app, &owner, json!({ "title": "t", "url": "u" })).await;
		let path = format!("/api/blogs/{}", post["id"].as_str().unwrap());

		let response = app
			.server
			.delete(&path)
			.add_header(AUTHORIZATION, other.clone())
			.expect_failure()
			.await;

		response.assert_status(StatusCode::UNAUTHORIZED);
		assert_eq!(
			response.json::<serde_json::Value>()["errors"][0]["code"],
			"not_owner"
		);

		app.server
			.put(&path)
			.add_header(AUTHORIZATION, other)
			.json(&json!({ "likes": 100 }))
			.expect_failure()
			.await
			.assert_status(StatusCode::UNAUTHORIZED);

		let stored = app.server.get(&path).await.json::<serde_json::Value>();
		assert_eq!(stored, post);
	}

	#[tokio::test]
	async fn test_unowned_posts_cannot_be_modified() {
		let app = TestApp::new();
		let token = app.user_token("mluukkai").await;
		let post = app
			.state
			.database
			.insert_post(
				None,
				CreatePost {
					title: "Legacy".into(),
					url: "http://example.com".into(),
					author: None,
					likes: 2,
				},
			)
			.await
			.unwrap();

		let response = app
			.server
			.delete(&format!("/api/blogs/{}", post.id))
			.add_header(AUTHORIZATION, token)
			.expect_failure()
			.await;

		response.assert_status(StatusCode::UNAUTHORIZED);
		assert_eq!(
			response.json::<serde_json::Value>()["errors"][0]["code"],
			"unowned_post"
		);
		assert!(app.state.database.post(post.id).await.unwrap().is_some());
	}

	#[tokio::test]
	async fn test_stats() {
		let app = TestApp::new();
		let token = app.user_token("mluukkai").await;

		let empty = app.server.get("/api/blogs/stats").await.json::<serde_json::Value>();
		assert_eq!(empty["total_likes"], 0);
		assert!(empty["favorite_blog"].is_null());

		for (title, author, likes) in [("X", "A", 5), ("Y", "B", 10), ("Z", "A", 3)] {
			create(
				&app,
				&token,
				json!({ "title": title, "author": author, "url": "u", "likes": likes }),
			)
			.await;
		}

		let stats = app.server.get("/api/blogs/stats").await.json::<serde_json::Value>();

		assert_eq!(stats["total_likes"], 18);
		assert_eq!(
			stats["favorite_blog"],
			json!({ "title": "Y", "author": "B", "likes": 10 })
		);
		assert_eq!(stats["most_blogs"], json!({ "author": "A", "blogs": 2 }));
		assert_eq!(stats["most_likes"], json!({ "author": "B", "likes": 10 }));
	}

	#[tokio::test]
	async fn test_stats_with_huge_like_counts() {
		let app = TestApp::new();
		let token = app.user_token("mluukkai").await;

		for title in ["X", "Y"] {
			create(
				&app,
				&token,
				json!({ "title": title, "author": "A", "url": "u", "likes": i64::MAX }),
			)
			.await;
		}

		let response = app.server.get("/api/blogs/stats").await;
		response.assert_status_ok();

		let stats = response.json::<serde_json::Value>();
		assert_eq!(stats["total_likes"], i64::MAX);
		assert_eq!(stats["most_likes"], json!({ "author": "A", "likes": i64::MAX }));
	}
}
