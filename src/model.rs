//! Client-side entities, decoded from backend JSON at the network boundary.
//!
//! All counts and flags are authoritative only immediately after a fetch or a
//! reconciled mutation; optional wire fields decode as defaults so rendering
//! code never deals with partially-formed data.

use serde::Deserialize;

/// A viewer's reaction direction, as carried on the wire (`vote=1`/`vote=-1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
	Like,
	Dislike,
}

impl Vote {
	#[must_use]
	pub fn wire_value(self) -> i8 {
		match self {
			Vote::Like => 1,
			Vote::Dislike => -1,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
	pub id: u64,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub author: String,
	#[serde(default)]
	pub excerpt: String,
	#[serde(default)]
	pub content: String,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default)]
	pub time_ago: String,
	#[serde(default)]
	pub likes: u32,
	#[serde(default)]
	pub dislikes: u32,
	#[serde(default)]
	pub comments: u32,
	/// `-1`, `0` or `1`; at most one reaction per viewer.
	#[serde(default)]
	pub user_vote: i8,
	#[serde(default)]
	pub image_url: Option<String>,
	#[serde(default)]
	pub thumbnail_url: Option<String>,
	#[serde(default)]
	pub is_author: bool,
}

impl Post {
	/// Thumbnail first, full image as fallback.
	#[must_use]
	pub fn display_image(&self) -> Option<&str> {
		self.thumbnail_url.as_deref().or_else(|| self.image_url.as_deref())
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	pub id: u64,
	#[serde(default)]
	pub post_id: u64,
	#[serde(default)]
	pub author: String,
	#[serde(default)]
	pub content: String,
	#[serde(default)]
	pub time_ago: String,
	#[serde(default)]
	pub like_count: u32,
	#[serde(default)]
	pub dislike_count: u32,
	#[serde(default)]
	pub user_vote: i8,
	#[serde(default)]
	pub is_author: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
	Like,
	Dislike,
	Comment,
	#[serde(other)]
	System,
}

impl NotificationKind {
	/// Icon-font class used by the notification list.
	#[must_use]
	pub fn icon(self) -> &'static str {
		match self {
			NotificationKind::Like => "bi-heart-fill",
			NotificationKind::Dislike => "bi-heartbreak-fill",
			NotificationKind::Comment => "bi-chat-fill",
			NotificationKind::System => "bi-info-circle-fill",
		}
	}

	#[must_use]
	pub fn css_class(self) -> &'static str {
		match self {
			NotificationKind::Like => "like",
			NotificationKind::Dislike => "dislike",
			NotificationKind::Comment => "comment",
			NotificationKind::System => "system",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
	pub id: u64,
	#[serde(rename = "type", default = "NotificationKind::system")]
	pub kind: NotificationKind,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub message: String,
	#[serde(default)]
	pub time_ago: String,
	#[serde(default)]
	pub is_read: bool,
	#[serde(default)]
	pub related_post_id: Option<u64>,
	#[serde(default)]
	pub related_comment_id: Option<u64>,
}

impl NotificationKind {
	fn system() -> Self {
		NotificationKind::System
	}
}

/// The two buckets of the notifications page. The client only ever moves
/// entries from `unread` to `read`, never deletes them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NotificationFeed {
	#[serde(default)]
	pub unread: Vec<Notification>,
	#[serde(default)]
	pub read: Vec<Notification>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Category {
	pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
	#[serde(default)]
	pub logged_in: bool,
	#[serde(rename = "userID", default)]
	pub user_id: Option<u64>,
}

/// Authoritative vote state returned by the like endpoints. The UI overwrites
/// its local counts and highlight from these fields, never increments them.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
	#[serde(default = "default_true")]
	pub success: bool,
	#[serde(default)]
	pub like_count: u32,
	#[serde(default)]
	pub dislike_count: u32,
	#[serde(default)]
	pub user_vote: i8,
}

fn default_true() -> bool {
	true
}

/// Bare application-level acknowledgement (`{"success": bool}`).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Ack {
	#[serde(default)]
	pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
	#[serde(default)]
	pub success: bool,
	#[serde(default)]
	pub filename: Option<String>,
	#[serde(default)]
	pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub join_date: String,
	#[serde(default)]
	pub post_count: u32,
	#[serde(default)]
	pub comment_count: u32,
	#[serde(default)]
	pub likes_given: u32,
	#[serde(default)]
	pub likes_received: u32,
	#[serde(default)]
	pub dislikes_given: u32,
	#[serde(default)]
	pub dislikes_received: u32,
	#[serde(default)]
	pub bio: String,
	#[serde(default)]
	pub profile_image: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn post_defaults_fill_missing_counts() {
		let post: Post = serde_json::from_str(r#"{"id": 7, "title": "Repotting", "author": "fern"}"#).unwrap();
		assert_eq!(post.likes, 0);
		assert_eq!(post.dislikes, 0);
		assert_eq!(post.comments, 0);
		assert_eq!(post.user_vote, 0);
		assert!(post.tags.is_empty());
		assert_eq!(post.display_image(), None);
	}

	#[test]
	fn thumbnail_takes_precedence() {
		let post: Post = serde_json::from_str(
			r#"{"id": 1, "thumbnailUrl": "/thumb/1.jpg", "imageUrl": "/img/1.jpg"}"#,
		)
		.unwrap();
		assert_eq!(post.display_image(), Some("/thumb/1.jpg"));
	}

	#[test]
	fn unknown_notification_kind_is_system() {
		let n: Notification = serde_json::from_str(
			r#"{"id": 3, "type": "moderation", "title": "t", "message": "m"}"#,
		)
		.unwrap();
		assert_eq!(n.kind, NotificationKind::System);
	}

	#[test]
	fn feed_buckets_default_to_empty() {
		let feed: NotificationFeed = serde_json::from_str("{}").unwrap();
		assert!(feed.unread.is_empty());
		assert!(feed.read.is_empty());
	}
}
