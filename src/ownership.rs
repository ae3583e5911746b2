//! Decides whether a resolved identity may modify a post.
//!
//! Posts without an owner predate authentication and cannot be modified by
//! anyone. The same rule applies to updates and deletes.

use uuid::Uuid;

use crate::model::Post;

/// Why a mutation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denied {
	/// The post belongs to another user.
	NotOwner,
	/// The post has no owner.
	Unowned,
}

pub fn authorize(subject: Uuid, post: &Post) -> Result<(), Denied> {
	match post.user {
		Some(owner) if owner == subject => Ok(()),
		Some(_) => Err(Denied::NotOwner),
		None => Err(Denied::Unowned),
	}
}
