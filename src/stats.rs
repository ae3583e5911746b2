//! Summary statistics over a collection of posts.
//!
//! Every function here is pure. Author rankings are computed in a single
//! left-to-right scan, and the leader only changes when another author's
//! running total strictly exceeds it, so ties go to the author who reached
//! the maximum first. Posts without an author are left out of author rankings.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::Serialize;

use crate::model::Post;

/// The most liked post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Favorite {
	pub title: String,
	pub author: Option<String>,
	pub likes: i64,
}

/// The author with the most posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AuthorBlogs {
	pub author: String,
	pub blogs: u64,
}

/// The author whose posts have the most likes in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct AuthorLikes {
	pub author: String,
	pub likes: i64,
}

/// Every statistic at once.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Summary {
	pub total_likes: i64,
	pub favorite_blog: Option<Favorite>,
	pub most_blogs: Option<AuthorBlogs>,
	pub most_likes: Option<AuthorLikes>,
}

/// Always returns one.
#[allow(dead_code)]
pub fn dummy(_posts: &[Post]) -> u8 {
	1
}

/// Sums the likes of every post, saturating at [`i64::MAX`].
pub fn total_likes(posts: &[Post]) -> i64 {
	posts
		.iter()
		.fold(0, |total: i64, post| total.saturating_add(post.likes))
}

pub fn favorite_blog(posts: &[Post]) -> Option<Favorite> {
	let favorite = posts
		.iter()
		.reduce(|best, post| if post.likes > best.likes { post } else { best })?;

	Some(Favorite {
		title: favorite.title.clone(),
		author: favorite.author.clone(),
		likes: favorite.likes,
	})
}

/// Scans `posts` once, accumulating `weight` per author with `add` and
/// returning the first author to reach the highest total.
fn leader<T>(
	posts: &[Post],
	weight: impl Fn(&Post) -> T,
	add: impl Fn(T, T) -> T,
) -> Option<(&str, T)>
where
	T: Copy + Default + PartialOrd,
{
	let mut totals = HashMap::<&str, T>::new();
	let mut leader = None;

	for post in posts {
		let Some(author) = post.author.as_deref() else {
			continue;
		};

		let total = totals.entry(author).or_default();
		*total = add(*total, weight(post));

		let total = *total;
		if leader.map_or(true, |(_, best)| total > best) {
			leader = Some((author, total));
		}
	}

	leader
}

pub fn most_blogs(posts: &[Post]) -> Option<AuthorBlogs> {
	leader(posts, |_| 1, u64::saturating_add).map(|(author, blogs)| AuthorBlogs {
		author: author.to_owned(),
		blogs,
	})
}

pub fn most_likes(posts: &[Post]) -> Option<AuthorLikes> {
	leader(posts, |post| post.likes, i64::saturating_add).map(|(author, likes)| AuthorLikes {
		author: author.to_owned(),
		likes,
	})
}

pub fn summarize(posts: &[Post]) -> Summary {
	Summary {
		total_likes: total_likes(posts),
		favorite_blog: favorite_blog(posts),
		most_blogs: most_blogs(posts),
		most_likes: most_likes(posts),
	}
}

#[cfg(test)]
mod test {
	use chrono::Utc;
	use uuid::Uuid;

	use super::*;

	fn post(title: &str, author: Option<&str>, likes: i64) -> Post {
		Post {
			id: Uuid::new_v4(),
			title: title.into(),
			url: format!("https://example.com/{title}"),
			author: author.map(Into::into),
			likes,
			user: None,
			created_at: Utc::now(),
		}
	}

	fn scenario() -> Vec<Post> {
		vec![
			post("a1", Some("A"), 5),
			post("a2", Some("A"), 3),
			post("b1", Some("B"), 10),
		]
	}

	#[test]
	fn test_like_totals_saturate() {
		let posts = vec![
			post("a1", Some("A"), i64::MAX),
			post("a2", Some("A"), i64::MAX),
			post("b1", Some("B"), 1),
		];

		assert_eq!(total_likes(&posts), i64::MAX);
		assert_eq!(
			most_likes(&posts),
			Some(AuthorLikes {
				author: "A".into(),
				likes: i64::MAX,
			})
		);
		assert_eq!(favorite_blog(&posts).unwrap().title, "a1");
	}

	#[test]
	fn test_dummy() {
		assert_eq!(dummy(&[]), 1);
		assert_eq!(dummy(&scenario()), 1);
	}

	#[test]
	fn test_empty() {
		assert_eq!(total_likes(&[]), 0);
		assert_eq!(favorite_blog(&[]), None);
		assert_eq!(most_blogs(&[]), None);
		assert_eq!(most_likes(&[]), None);
	}

	#[test]
	fn test_scenario() {
		let posts = scenario();

		assert_eq!(total_likes(&posts), 18);
		assert_eq!(
			favorite_blog(&posts),
			Some(Favorite {
				title: "b1".into(),
				author: Some("B".into()),
				likes: 10,
			})
		);
		assert_eq!(
			most_blogs(&posts),
			Some(AuthorBlogs {
				author: "A".into(),
				blogs: 2,
			})
		);
		assert_eq!(
			most_likes(&posts),
			Some(AuthorLikes {
				author: "B".into(),
				likes: 10,
			})
		);
	}

	#[test]
	fn test_total_likes_ignores_order() {
		let mut posts = scenario();
		let total = total_likes(&posts);

		posts.reverse();
		assert_eq!(total_likes(&posts), total);

		posts.rotate_left(1);
		assert_eq!(total_likes(&posts), total);
	}

	#[test]
	fn test_favorite_single_post() {
		let posts = vec![post("only", None, 7)];

		assert_eq!(
			favorite_blog(&posts),
			Some(Favorite {
				title: "only".into(),
				author: None,
				likes: 7,
			})
		);
	}

	#[test]
	fn test_favorite_keeps_first_maximum() {
		let posts = vec![
			post("first", Some("A"), 4),
			post("second", Some("B"), 9),
			post("third", Some("C"), 9),
		];

		assert_eq!(favorite_blog(&posts).unwrap().title, "second");
	}

	#[test]
	fn test_ties_go_to_first_author_reaching_maximum() {
		// B reaches two posts before A does.
		let posts = vec![
			post("a1", Some("A"), 1),
			post("b1", Some("B"), 1),
			post("b2", Some("B"), 1),
			post("a2", Some("A"), 1),
		];

		assert_eq!(most_blogs(&posts).unwrap().author, "B");
		assert_eq!(most_likes(&posts).unwrap().author, "B");

		let posts = vec![post("a", Some("A"), 0), post("b", Some("B"), 0)];
		assert_eq!(most_likes(&posts).unwrap(), AuthorLikes {
			author: "A".into(),
			likes: 0,
		});
	}

	#[test]
	fn test_dominant_author() {
		let mut posts = (0..5)
			.map(|i| post(&format!("c{i}"), Some("C"), 2))
			.collect::<Vec<_>>();
		posts.push(post("d", Some("D"), 9));
		posts.push(post("anonymous", None, 100));

		assert_eq!(most_blogs(&posts).unwrap(), AuthorBlogs {
			author: "C".into(),
			blogs: 5,
		});
		assert_eq!(most_likes(&posts).unwrap(), AuthorLikes {
			author: "C".into(),
			likes: 10,
		});
	}

	#[test]
	fn test_without_authors() {
		let posts = vec![post("x", None, 3)];

		assert_eq!(most_blogs(&posts), None);
		assert_eq!(most_likes(&posts), None);
		assert_eq!(total_likes(&posts), 3);
	}
}
