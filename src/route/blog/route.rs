use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;
use uuid::Uuid;

use crate::{
	extract::{Identity, Json, Path},
	model::{CreatePost, Post, UpdatePost},
	openapi::tag,
	ownership,
	route::model::IdInput,
	stats, Database,
};

use super::{Error, RouteError};

/// Loads a post and checks that `identity` may modify it.
async fn owned_post(
	database: &Database,
	identity: &Identity,
	id: Uuid,
) -> Result<Post, RouteError> {
	let post = database.post(id).await?.ok_or(Error::UnknownPost(id))?;

	ownership::authorize(identity.subject, &post).map_err(|denied| {
		tracing::debug!(post = %id, subject = %identity.subject, ?denied, "mutation refused");
		Error::denied(id, denied)
	})?;

	Ok(post)
}

/// Get all posts
/// Returns every post, oldest first.
#[route(tag = tag::BLOG)]
pub async fn get_blogs(State(database): State<Database>) -> Result<Json<Vec<Post>>, RouteError> {
	Ok(Json(database.posts().await?))
}

/// Get statistics
/// Summarizes all posts: the total number of likes, the most liked post, and the
/// authors with the most posts and the most likes.
#[route(tag = tag::BLOG)]
pub async fn get_stats(
	State(database): State<Database>,
) -> Result<Json<stats::Summary>, RouteError> {
	let posts = database.posts().await?;

	Ok(Json(stats::summarize(&posts)))
}

/// Get single post
/// Returns a single post by its unique id.
#[route(tag = tag::BLOG)]
pub async fn get_blog(
	State(database): State<Database>,
	Path(IdInput { id }): Path<IdInput>,
) -> Result<Json<Post>, RouteError> {
	let post = database.post(id).await?;

	Ok(Json(post.ok_or(Error::UnknownPost(id))?))
}

/// Create post
/// Creates a new post owned by the authenticated user.
#[route(tag = tag::BLOG, response(status = 201, description = "Created successfully.", shape = "Json<Post>"))]
pub async fn create_blog(
	State(database): State<Database>,
	identity: Identity,
	Json(input): Json<CreatePost>,
) -> Result<impl IntoApiResponse, RouteError> {
	let user = database
		.user(identity.subject)
		.await?
		.ok_or(Error::UnknownUser(identity.subject))?;

	let post = database.insert_post(Some(user.id), input).await?;

	tracing::info!(post = %post.id, user = %user.id, "created post");

	Ok((StatusCode::CREATED, Json(post)).into_response())
}

/// Update post
/// Updates the given fields of a post. Only the creator of a post can update it.
#[route(tag = tag::BLOG)]
pub async fn update_blog(
	State(database): State<Database>,
	identity: Identity,
	Path(IdInput { id }): Path<IdInput>,
	Json(input): Json<UpdatePost>,
) -> Result<Json<Post>, RouteError> {
	owned_post(&database, &identity, id).await?;

	let post = database.update_post(id, input).await?;

	Ok(Json(post.ok_or(Error::UnknownPost(id))?))
}

/// Delete post
/// Deletes a post. Only the creator of a post can delete it.
#[route(tag = tag::BLOG, response(status = 204, description = "Deleted successfully."))]
pub async fn delete_blog(
	State(database): State<Database>,
	identity: Identity,
	Path(IdInput { id }): Path<IdInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	owned_post(&database, &identity, id).await?;

	if !database.delete_post(id).await? {
		return Err(Error::UnknownPost(id).into());
	}

	tracing::info!(post = %id, "deleted post");

	Ok(StatusCode::NO_CONTENT.into_response())
}
