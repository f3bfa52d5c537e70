//! The notifications page: unread/read buckets, badges and the background
//! refresh.
//!
//! Buckets are replaced wholesale on every fetch, so the 30-second refresh
//! and a user-triggered load can overlap safely (last write wins, both are
//! full authoritative reads). Mark-as-read moves entries between the
//! in-memory buckets and re-renders only the affected lists; the tab badge
//! and the header dot are synchronized in the same dispatch step, so badge
//! and list can never disagree.

use crate::api::{self, ApiError};
use crate::browser::{self, Notice};
use crate::model::{Notification, NotificationFeed};
use crate::runtime::{Dispatch, Page, Region, Step};
use crate::vdom::{el, Node};
use tracing::warn;

pub const UNREAD: Region = Region(0);
pub const READ: Region = Region(1);

const REFRESH_MILLIS: i32 = 30_000;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
	Loaded(Result<NotificationFeed, ApiError>),
	MarkRead(u64),
	Marked(u64, Result<(), ApiError>),
	MarkAll,
	MarkedAll(Result<(), ApiError>),
	Open(u64, u64),
	Tick,
}

#[derive(Debug, PartialEq)]
pub enum Effect {
	Load,
	MarkRead(u64),
	MarkAll,
	/// Mark read, then navigate to the related post — navigating even when
	/// the mark fails.
	OpenPost(u64, u64),
	SyncBadges(usize),
	LoadFailedNotice,
	MarkFailedNotice,
}

#[derive(Debug, Default)]
pub struct Notifications {
	unread: Vec<Notification>,
	read: Vec<Notification>,
	loading: bool,
	failed: bool,
}

impl Notifications {
	#[must_use]
	pub fn new() -> Self {
		Self { loading: true, ..Self::default() }
	}
}

impl Page for Notifications {
	type Msg = Msg;
	type Effect = Effect;

	const REGIONS: &'static [(Region, &'static str)] = &[(UNREAD, "unreadList"), (READ, "readList")];

	fn update(&mut self, message: Msg) -> Step<Effect> {
		match message {
			Msg::Loaded(Ok(feed)) => {
				// Replace, never append: safe under overlapping refreshes.
				self.unread = feed.unread;
				self.read = feed.read;
				self.loading = false;
				self.failed = false;
				Step::render(UNREAD)
					.and_render(READ)
					.and_effect(Effect::SyncBadges(self.unread.len()))
			}
			Msg::Loaded(Err(_)) => {
				self.loading = false;
				self.failed = true;
				Step::render(UNREAD).and_render(READ).and_effect(Effect::LoadFailedNotice)
			}
			Msg::MarkRead(id) => Step::effect(Effect::MarkRead(id)),
			Msg::Marked(id, Ok(())) => self.move_to_read(id),
			Msg::Marked(_, Err(_)) => Step::effect(Effect::MarkFailedNotice),
			Msg::MarkAll => {
				if self.unread.is_empty() {
					Step::idle()
				} else {
					Step::effect(Effect::MarkAll)
				}
			}
			Msg::MarkedAll(Ok(())) => {
				// Previously-unread entries precede previously-read ones.
				let mut merged = core::mem::take(&mut self.unread);
				for notification in &mut merged {
					notification.is_read = true;
				}
				merged.append(&mut self.read);
				self.read = merged;
				Step::render(UNREAD).and_render(READ).and_effect(Effect::SyncBadges(0))
			}
			Msg::MarkedAll(Err(_)) => Step::effect(Effect::MarkFailedNotice),
			Msg::Open(id, post_id) => Step::effect(Effect::OpenPost(id, post_id)),
			Msg::Tick => Step::effect(Effect::Load),
		}
	}

	fn view(&self, region: Region) -> Vec<Node<Msg>> {
		match region {
			UNREAD => self.view_bucket(&self.unread, true),
			READ => self.view_bucket(&self.read, false),
			_ => Vec::new(),
		}
	}

	fn perform(effect: Effect, dispatch: &Dispatch<Self>) {
		match effect {
			Effect::Load => dispatch.spawn(async { Some(Msg::Loaded(api::notifications().await)) }),
			Effect::MarkRead(id) => dispatch.spawn(async move { Some(Msg::Marked(id, api::mark_read(id).await)) }),
			Effect::MarkAll => dispatch.spawn(async { Some(Msg::MarkedAll(api::mark_all_read().await)) }),
			Effect::OpenPost(id, post_id) => dispatch.spawn(async move {
				if let Err(error) = api::mark_read(id).await {
					warn!("Marking notification {} read before navigation failed: {}", id, error);
				}
				browser::redirect(&format!("/view-post?id={}", post_id));
				None
			}),
			Effect::SyncBadges(count) => sync_badges(count),
			Effect::LoadFailedNotice => browser::toast(Notice::Error, "Failed to load notifications. Please try again."),
			Effect::MarkFailedNotice => browser::toast(Notice::Error, "Failed to mark notification as read."),
		}
	}
}

impl Notifications {
	/// Removes the entry from `unread` and prepends it to `read`
	/// (most-recent-first), keeping the badges in step.
	fn move_to_read(&mut self, id: u64) -> Step<Effect> {
		match self.unread.iter().position(|notification| notification.id == id) {
			Some(index) => {
				let mut notification = self.unread.remove(index);
				notification.is_read = true;
				self.read.insert(0, notification);
				Step::render(UNREAD)
					.and_render(READ)
					.and_effect(Effect::SyncBadges(self.unread.len()))
			}
			None => {
				warn!("Notification {} is not in the unread bucket.", id);
				Step::idle()
			}
		}
	}

	fn view_bucket(&self, bucket: &[Notification], unread: bool) -> Vec<Node<Msg>> {
		if self.loading {
			return vec![el("div").class("text-muted p-3").text("Loading…").into()];
		}
		if self.failed {
			return vec![el("div").class("text-muted p-3").text("Failed to load notifications.").into()];
		}
		if bucket.is_empty() {
			let placeholder = if unread { "No unread notifications" } else { "Nothing here yet" };
			return vec![el("div").class("text-muted text-center p-4").text(placeholder).into()];
		}
		bucket.iter().map(|notification| view_item(notification, unread)).collect()
	}
}

fn view_item(notification: &Notification, unread: bool) -> Node<Msg> {
	let mut content = el("div")
		.class("notification-content")
		.child(el("div").class("notification-title").text(notification.title.clone()))
		.child(el("div").class("notification-message").text(notification.message.clone()))
		.child(el("div").class("notification-time").text(notification.time_ago.clone()));

	if unread {
		content = content.child(
			el("div").class("notification-actions").child(
				el("button")
					.class("btn btn-outline-light mark-read-btn")
					// Capturing: marking read must not also open the item.
					.on_capture("click", Msg::MarkRead(notification.id))
					.text("Mark as read"),
			),
		);
	}

	let mut item = el("div")
		.class(format!("notification-item {} p-3", if unread { "unread" } else { "read" }))
		.attr("data-notification-id", notification.id.to_string())
		.child(
			el("div")
				.class(format!("notification-icon {}", notification.kind.css_class()))
				.child(el("i").class(format!("bi {}", notification.kind.icon()))),
		)
		.child(content);

	if let Some(post_id) = notification.related_post_id {
		item = item.on("click", Msg::Open(notification.id, post_id));
	}

	item.into()
}

fn sync_badges(count: usize) {
	browser::set_text("unread-badge", &count.to_string());
	browser::set_visible("unread-badge", count > 0);
	browser::set_visible("notification-dot", count > 0);
}

/// Mounts the page, loads the buckets, binds the "mark all" control and
/// starts the periodic refresh.
pub fn boot() {
	let dispatch = Dispatch::mount(Notifications::new(), None);
	Notifications::perform(Effect::Load, &dispatch);
	dispatch.every(REFRESH_MILLIS, Msg::Tick);

	browser::listen("mark-all-read-btn", "click", move |_| dispatch.send(Msg::MarkAll));
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::NotificationKind;

	fn notification(id: u64) -> Notification {
		Notification {
			id,
			kind: NotificationKind::Like,
			title: format!("Notification {}", id),
			message: "Someone liked your post".to_owned(),
			time_ago: "2m ago".to_owned(),
			is_read: false,
			related_post_id: Some(10),
			related_comment_id: None,
		}
	}

	/// Entries the server already placed in the read bucket arrive with the
	/// flag set.
	fn seen(id: u64) -> Notification {
		Notification { is_read: true, ..notification(id) }
	}

	fn loaded(unread: Vec<Notification>, read: Vec<Notification>) -> Notifications {
		let mut page = Notifications::new();
		page.update(Msg::Loaded(Ok(NotificationFeed { unread, read })));
		page
	}

	#[test]
	fn marking_one_read_moves_it_to_the_head() {
		let mut page = loaded(vec![notification(1), notification(2)], vec![seen(9)]);
		let step = page.update(Msg::Marked(2, Ok(())));
		assert_eq!(page.unread.len(), 1);
		assert_eq!(page.read.len(), 2);
		assert_eq!(page.read[0].id, 2);
		assert!(page.read[0].is_read);
		// Badge equals the new unread length, in the same step.
		assert!(step.effects.contains(&Effect::SyncBadges(1)));
		assert!(step.dirty.contains(UNREAD));
		assert!(step.dirty.contains(READ));
	}

	#[test]
	fn mark_all_concatenates_unread_before_read() {
		let mut page = loaded(vec![notification(1), notification(2)], vec![seen(9)]);
		let step = page.update(Msg::MarkedAll(Ok(())));
		assert!(page.unread.is_empty());
		assert_eq!(page.read.iter().map(|n| n.id).collect::<Vec<_>>(), vec![1, 2, 9]);
		assert!(page.read.iter().all(|n| n.is_read));
		assert!(step.effects.contains(&Effect::SyncBadges(0)));
	}

	#[test]
	fn mark_all_with_nothing_unread_is_a_no_op() {
		let mut page = loaded(Vec::new(), vec![seen(9)]);
		let step = page.update(Msg::MarkAll);
		assert_eq!(step, Step::idle());
	}

	#[test]
	fn refresh_replaces_the_buckets() {
		let mut page = loaded(vec![notification(1)], Vec::new());
		page.update(Msg::Loaded(Ok(NotificationFeed {
			unread: vec![notification(1), notification(2)],
			read: Vec::new(),
		})));
		assert_eq!(page.unread.len(), 2);
	}

	#[test]
	fn marking_an_unknown_id_changes_nothing() {
		let mut page = loaded(vec![notification(1)], Vec::new());
		let step = page.update(Msg::Marked(42, Ok(())));
		assert_eq!(step, Step::idle());
		assert_eq!(page.unread.len(), 1);
	}

	#[test]
	fn failed_mark_only_notifies() {
		let mut page = loaded(vec![notification(1)], Vec::new());
		let step = page.update(Msg::Marked(1, Err(ApiError::Status(500))));
		assert_eq!(step.effects, vec![Effect::MarkFailedNotice]);
		assert_eq!(page.unread.len(), 1);
	}

	#[test]
	fn empty_bucket_renders_a_placeholder() {
		let page = loaded(Vec::new(), Vec::new());
		let unread = page.view(UNREAD);
		assert!(unread[0].text_content().contains("No unread notifications"));
	}
}
