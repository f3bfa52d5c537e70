//! The profile page: stats, identity editing and the lazily loaded activity
//! sections.
//!
//! Each activity tab (posts, comments, liked, disliked) fetches on first
//! visit and is cached for the page's lifetime afterwards; switching back to
//! a visited tab re-renders from the cache without a request.

use crate::api::{self, ApiError, ProfileAck};
use crate::browser::{self, Notice};
use crate::model::{Comment, Post, Profile, UploadOutcome};
use crate::runtime::{Dispatch, Page, Region, Step};
use crate::vdom::{el, Node};

pub const STATS: Region = Region(0);
pub const IDENTITY: Region = Region(1);
pub const SECTION: Region = Region(2);

const PHOTO_INPUT: &str = "profileImageUpload";
const MAX_PHOTO_BYTES: f64 = 20.0 * 1024.0 * 1024.0;
const ACCEPTED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];
const DEFAULT_AVATAR: &str = "/static/images/default-avatar.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
	Posts,
	Comments,
	Liked,
	Disliked,
}

impl Section {
	fn endpoint(self) -> &'static str {
		match self {
			Section::Posts => "posts",
			Section::Liked => "likes",
			Section::Disliked => "dislikes",
			Section::Comments => "comments",
		}
	}

	fn empty_text(self) -> &'static str {
		match self {
			Section::Posts => "No posts yet",
			Section::Comments => "No comments yet",
			Section::Liked => "No liked posts yet",
			Section::Disliked => "No disliked posts yet",
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
	Loaded(Result<Profile, ApiError>),
	EditBio,
	BioDraft(String),
	SaveBio,
	CancelBio,
	BioSaved(Result<ProfileAck, ApiError>),
	EditName,
	NameDraft(String),
	SaveName,
	CancelName,
	NameSaved(Result<ProfileAck, ApiError>),
	PhotoSelected,
	PhotoUploadStarted,
	PhotoUploaded(Result<UploadOutcome, ApiError>),
	PhotoSaved(String, Result<ProfileAck, ApiError>),
	Show(Section),
	PostsLoaded(Section, Result<Vec<Post>, ApiError>),
	CommentsLoaded(Result<Vec<Comment>, ApiError>),
	Open(u64),
}

#[derive(Debug, PartialEq)]
pub enum Effect {
	Load,
	SaveBio(String),
	SaveName(String),
	ReadPhoto,
	SavePhoto(String),
	LoadSection(Section),
	OpenPost(u64),
	RedirectLogin,
	Success(&'static str),
	Failure(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
enum Editing {
	None,
	Bio(String),
	Name(String),
}

#[derive(Debug)]
pub struct ProfilePage {
	profile: Option<Profile>,
	failed: bool,
	editing: Editing,
	uploading_photo: bool,
	active: Section,
	posts: Option<Vec<Post>>,
	comments: Option<Vec<Comment>>,
	liked: Option<Vec<Post>>,
	disliked: Option<Vec<Post>>,
}

impl ProfilePage {
	#[must_use]
	pub fn new() -> Self {
		Self {
			profile: None,
			failed: false,
			editing: Editing::None,
			uploading_photo: false,
			active: Section::Posts,
			posts: None,
			comments: None,
			liked: None,
			disliked: None,
		}
	}

	fn cache_loaded(&self, section: Section) -> bool {
		match section {
			Section::Posts => self.posts.is_some(),
			Section::Comments => self.comments.is_some(),
			Section::Liked => self.liked.is_some(),
			Section::Disliked => self.disliked.is_some(),
		}
	}
}

impl Default for ProfilePage {
	fn default() -> Self {
		Self::new()
	}
}

impl Page for ProfilePage {
	type Msg = Msg;
	type Effect = Effect;

	const REGIONS: &'static [(Region, &'static str)] = &[
		(STATS, "profileStats"),
		(IDENTITY, "profileIdentity"),
		(SECTION, "profileSection"),
	];

	#[allow(clippy::too_many_lines)]
	fn update(&mut self, message: Msg) -> Step<Effect> {
		match message {
			Msg::Loaded(Ok(profile)) => {
				self.profile = Some(profile);
				self.failed = false;
				Step::render(STATS).and_render(IDENTITY)
			}
			Msg::Loaded(Err(ApiError::Unauthorized)) => Step::effect(Effect::RedirectLogin),
			Msg::Loaded(Err(_)) => {
				self.failed = true;
				Step::render(STATS).and_render(IDENTITY)
			}
			Msg::EditBio => match &self.profile {
				Some(profile) => {
					self.editing = Editing::Bio(profile.bio.clone());
					Step::render(IDENTITY)
				}
				None => Step::idle(),
			},
			Msg::BioDraft(draft) => {
				if let Editing::Bio(bio) = &mut self.editing {
					*bio = draft;
				}
				Step::idle()
			}
			Msg::SaveBio => match &self.editing {
				Editing::Bio(bio) => Step::effect(Effect::SaveBio(bio.trim().to_owned())),
				_ => Step::idle(),
			},
			Msg::CancelBio | Msg::CancelName => {
				self.editing = Editing::None;
				Step::render(IDENTITY)
			}
			Msg::BioSaved(Ok(_)) => {
				if let Editing::Bio(bio) = &self.editing {
					if let Some(profile) = &mut self.profile {
						profile.bio = bio.trim().to_owned();
					}
				}
				self.editing = Editing::None;
				Step::render(IDENTITY).and_effect(Effect::Success("Profile updated successfully!"))
			}
			Msg::BioSaved(Err(_)) => Step::effect(Effect::Failure("Failed to update profile")),
			Msg::EditName => match &self.profile {
				Some(profile) => {
					self.editing = Editing::Name(profile.username.clone());
					Step::render(IDENTITY)
				}
				None => Step::idle(),
			},
			Msg::NameDraft(draft) => {
				if let Editing::Name(name) = &mut self.editing {
					*name = draft;
				}
				Step::idle()
			}
			Msg::SaveName => match &self.editing {
				Editing::Name(name) if !name.trim().is_empty() => Step::effect(Effect::SaveName(name.trim().to_owned())),
				_ => Step::idle(),
			},
			Msg::NameSaved(Ok(ack)) => {
				// The server may normalize the name; prefer its echo.
				let accepted = match (&ack.username, &self.editing) {
					(Some(name), _) => Some(name.clone()),
					(None, Editing::Name(name)) => Some(name.trim().to_owned()),
					_ => None,
				};
				if let (Some(name), Some(profile)) = (accepted, self.profile.as_mut()) {
					profile.username = name;
				}
				self.editing = Editing::None;
				Step::render(IDENTITY).and_effect(Effect::Success("Profile updated successfully!"))
			}
			Msg::NameSaved(Err(_)) => Step::effect(Effect::Failure("Failed to update profile")),
			Msg::PhotoSelected => Step::effect(Effect::ReadPhoto),
			Msg::PhotoUploadStarted => {
				self.uploading_photo = true;
				Step::render(IDENTITY)
			}
			Msg::PhotoUploaded(Ok(outcome)) => match outcome.filename {
				Some(filename) => Step::effect(Effect::SavePhoto(filename)),
				None => {
					self.uploading_photo = false;
					Step::render(IDENTITY).and_effect(Effect::Failure("Failed to upload image. Please try again."))
				}
			},
			Msg::PhotoUploaded(Err(_)) => {
				self.uploading_photo = false;
				Step::render(IDENTITY).and_effect(Effect::Failure("Failed to upload image. Please try again."))
			}
			Msg::PhotoSaved(filename, Ok(_)) => {
				self.uploading_photo = false;
				if let Some(profile) = &mut self.profile {
					profile.profile_image = filename;
				}
				Step::render(IDENTITY).and_effect(Effect::Success("Profile photo updated!"))
			}
			Msg::PhotoSaved(_, Err(_)) => {
				self.uploading_photo = false;
				Step::render(IDENTITY).and_effect(Effect::Failure("Failed to update profile"))
			}
			Msg::Show(section) => {
				self.active = section;
				if self.cache_loaded(section) {
					Step::render(SECTION)
				} else {
					Step::render(SECTION).and_effect(Effect::LoadSection(section))
				}
			}
			Msg::PostsLoaded(section, Ok(posts)) => {
				match section {
					Section::Posts => self.posts = Some(posts),
					Section::Liked => self.liked = Some(posts),
					Section::Disliked => self.disliked = Some(posts),
					Section::Comments => return Step::idle(),
				}
				if self.active == section {
					Step::render(SECTION)
				} else {
					Step::idle()
				}
			}
			Msg::PostsLoaded(_, Err(_)) | Msg::CommentsLoaded(Err(_)) => {
				Step::effect(Effect::Failure("Failed to load activity. Please try again."))
			}
			Msg::CommentsLoaded(Ok(comments)) => {
				self.comments = Some(comments);
				if self.active == Section::Comments {
					Step::render(SECTION)
				} else {
					Step::idle()
				}
			}
			Msg::Open(post_id) => Step::effect(Effect::OpenPost(post_id)),
		}
	}

	fn view(&self, region: Region) -> Vec<Node<Msg>> {
		match region {
			STATS => self.view_stats(),
			IDENTITY => self.view_identity(),
			SECTION => self.view_section(),
			_ => Vec::new(),
		}
	}

	fn perform(effect: Effect, dispatch: &Dispatch<Self>) {
		match effect {
			Effect::Load => dispatch.spawn(async { Some(Msg::Loaded(api::profile().await)) }),
			Effect::SaveBio(bio) => dispatch.spawn(async move {
				Some(Msg::BioSaved(api::update_profile(&[("bio", &bio)]).await))
			}),
			Effect::SaveName(name) => dispatch.spawn(async move {
				Some(Msg::NameSaved(api::update_profile(&[("username", &name)]).await))
			}),
			Effect::ReadPhoto => {
				let file = match browser::selected_file(PHOTO_INPUT) {
					Some(file) => file,
					None => return,
				};
				if !ACCEPTED_TYPES.contains(&file.type_().as_str()) {
					browser::reset_file_input(PHOTO_INPUT);
					browser::toast(Notice::Error, "Only JPEG, PNG and GIF images can be used.");
					return;
				}
				if file.size() > MAX_PHOTO_BYTES {
					browser::reset_file_input(PHOTO_INPUT);
					browser::toast(Notice::Error, "Images can be at most 20 MB.");
					return;
				}
				dispatch.send(Msg::PhotoUploadStarted);
				dispatch.spawn(async move { Some(Msg::PhotoUploaded(api::upload_image(&file, Some("profile")).await)) });
			}
			Effect::SavePhoto(filename) => dispatch.spawn(async move {
				let result = api::update_profile(&[("profile_image", &filename)]).await;
				Some(Msg::PhotoSaved(filename, result))
			}),
			Effect::LoadSection(section) => match section {
				Section::Comments => dispatch.spawn(async { Some(Msg::CommentsLoaded(api::user_comments().await)) }),
				_ => dispatch.spawn(async move {
					Some(Msg::PostsLoaded(section, api::user_posts(section.endpoint()).await))
				}),
			},
			Effect::OpenPost(post_id) => browser::redirect(&format!("/view-post?id={}", post_id)),
			Effect::RedirectLogin => browser::redirect("/login"),
			Effect::Success(message) => browser::toast(Notice::Success, message),
			Effect::Failure(message) => browser::toast(Notice::Error, message),
		}
	}
}

fn stat(value: u32, label: &str) -> Node<Msg> {
	el("div")
		.class("stat-item text-center")
		.child(el("div").class("stat-value text-white").text(value.to_string()))
		.child(el("div").class("stat-label text-muted").text(label.to_owned()))
		.into()
}

impl ProfilePage {
	fn view_stats(&self) -> Vec<Node<Msg>> {
		if self.failed {
			return vec![el("div").class("text-muted p-3").text("Failed to load profile.").into()];
		}
		let profile = match &self.profile {
			Some(profile) => profile,
			None => return vec![el("div").class("text-muted p-3").text("Loading…").into()],
		};
		vec![
			el("div")
				.class("profile-stats d-flex justify-content-around")
				.child(stat(profile.post_count, "Posts"))
				.child(stat(profile.comment_count, "Comments"))
				.child(stat(profile.likes_received, "Likes received"))
				.child(stat(profile.likes_given, "Likes given"))
				.child(stat(profile.dislikes_received, "Dislikes received"))
				.child(stat(profile.dislikes_given, "Dislikes given"))
				.into(),
			el("div")
				.class("text-muted text-center mt-2")
				.text(format!("Member since {}", profile.join_date))
				.into(),
		]
	}

	fn view_identity(&self) -> Vec<Node<Msg>> {
		let profile = match &self.profile {
			Some(profile) => profile,
			None => return Vec::new(),
		};

		let image = if profile.profile_image.is_empty() {
			DEFAULT_AVATAR.to_owned()
		} else {
			profile.profile_image.clone()
		};
		let mut photo = el("div")
			.class("profile-photo position-relative")
			.child(el("img").class("profile-avatar rounded-circle").attr("src", image).attr("alt", "Profile photo"));
		if self.uploading_photo {
			photo = photo.child(el("div").class("text-muted").text("Uploading…"));
		}

		let name: Node<Msg> = match &self.editing {
			Editing::Name(name) => el("div")
				.class("d-flex gap-2 align-items-center")
				.child(
					el("input")
						.class("form-control")
						.attr("type", "text")
						.attr("value", name.clone())
						.on_input(Msg::NameDraft),
				)
				.child(el("button").class("btn btn-sm btn-success").on("click", Msg::SaveName).text("Save"))
				.child(el("button").class("btn btn-sm btn-outline-light").on("click", Msg::CancelName).text("Cancel"))
				.into(),
			_ => el("div")
				.class("d-flex gap-2 align-items-center")
				.child(el("h3").class("text-white mb-0").text(profile.username.clone()))
				.child(
					el("button")
						.class("btn btn-sm btn-outline-light")
						.on("click", Msg::EditName)
						.child(el("i").class("bi bi-pencil")),
				)
				.into(),
		};

		let bio: Node<Msg> = match &self.editing {
			Editing::Bio(bio) => el("div")
				.child(
					el("textarea")
						.class("form-control mb-2")
						.attr("rows", "3")
						.on_input(Msg::BioDraft)
						.text(bio.clone()),
				)
				.child(el("button").class("btn btn-sm btn-success me-2").on("click", Msg::SaveBio).text("Save"))
				.child(el("button").class("btn btn-sm btn-outline-light").on("click", Msg::CancelBio).text("Cancel"))
				.into(),
			_ => {
				let content = if profile.bio.is_empty() { "No bio yet." } else { profile.bio.as_str() };
				el("div")
					.class("d-flex gap-2 align-items-start")
					.child(el("p").class("text-light mb-0").text(content.to_owned()))
					.child(
						el("button")
							.class("btn btn-sm btn-outline-light")
							.on("click", Msg::EditBio)
							.child(el("i").class("bi bi-pencil")),
					)
					.into()
			}
		};

		vec![photo.into(), name, bio]
	}

	fn view_section(&self) -> Vec<Node<Msg>> {
		let section = self.active;
		match section {
			Section::Comments => match &self.comments {
				None => vec![loading()],
				Some(comments) if comments.is_empty() => vec![empty(section.empty_text())],
				Some(comments) => comments.iter().map(view_comment).collect(),
			},
			_ => {
				let cache = match section {
					Section::Posts => &self.posts,
					Section::Liked => &self.liked,
					Section::Disliked => &self.disliked,
					Section::Comments => unreachable!(),
				};
				match cache {
					None => vec![loading()],
					Some(posts) if posts.is_empty() => vec![empty(section.empty_text())],
					Some(posts) => posts.iter().map(view_post).collect(),
				}
			}
		}
	}
}

fn loading() -> Node<Msg> {
	el("div").class("text-muted p-3").text("Loading…").into()
}

fn empty(message: &str) -> Node<Msg> {
	el("div").class("text-muted text-center p-4").text(message.to_owned()).into()
}

fn view_post(post: &Post) -> Node<Msg> {
	el("div")
		.class("activity-item p-3")
		.on("click", Msg::Open(post.id))
		.child(el("div").class("text-white").text(post.title.clone()))
		.child(
			el("small")
				.class("text-muted")
				.text(format!("{} · {} likes · {} comments", post.time_ago, post.likes, post.comments)),
		)
		.into()
}

fn view_comment(comment: &Comment) -> Node<Msg> {
	el("div")
		.class("activity-item p-3")
		.on("click", Msg::Open(comment.post_id))
		.child(el("div").class("text-light").text(comment.content.clone()))
		.child(el("small").class("text-muted").text(comment.time_ago.clone()))
		.into()
}

/// Mounts the page, loads the profile and the default activity tab, and
/// binds the static tab buttons and the photo input.
pub fn boot() {
	let dispatch = Dispatch::mount(ProfilePage::new(), None);
	ProfilePage::perform(Effect::Load, &dispatch);
	dispatch.send(Msg::Show(Section::Posts));

	let tabs = [
		("tab-posts", Section::Posts),
		("tab-comments", Section::Comments),
		("tab-liked", Section::Liked),
		("tab-disliked", Section::Disliked),
	];
	for (element_id, section) in tabs {
		let dispatch = dispatch.clone();
		browser::listen(element_id, "click", move |_| dispatch.send(Msg::Show(section)));
	}
	browser::listen(PHOTO_INPUT, "change", move |_| dispatch.send(Msg::PhotoSelected));
}

#[cfg(test)]
mod tests {
	use super::*;

	fn profile() -> Profile {
		Profile {
			username: "fern".to_owned(),
			join_date: "March 2025".to_owned(),
			post_count: 3,
			comment_count: 7,
			likes_given: 4,
			likes_received: 11,
			dislikes_given: 0,
			dislikes_received: 1,
			bio: "Chronic overwaterer.".to_owned(),
			profile_image: String::new(),
		}
	}

	fn post(id: u64) -> Post {
		Post {
			id,
			title: format!("Post {}", id),
			author: "fern".to_owned(),
			excerpt: String::new(),
			content: String::new(),
			tags: Vec::new(),
			time_ago: "1d ago".to_owned(),
			likes: 0,
			dislikes: 0,
			comments: 0,
			user_vote: 0,
			image_url: None,
			thumbnail_url: None,
			is_author: true,
		}
	}

	fn loaded() -> ProfilePage {
		let mut page = ProfilePage::new();
		page.update(Msg::Loaded(Ok(profile())));
		page
	}

	#[test]
	fn activity_tabs_hit_the_backend_routes() {
		// /api/user/{posts, comments, likes, dislikes}
		assert_eq!(Section::Posts.endpoint(), "posts");
		assert_eq!(Section::Comments.endpoint(), "comments");
		assert_eq!(Section::Liked.endpoint(), "likes");
		assert_eq!(Section::Disliked.endpoint(), "dislikes");
	}

	#[test]
	fn first_visit_loads_later_visits_hit_the_cache() {
		let mut page = loaded();
		let step = page.update(Msg::Show(Section::Liked));
		assert_eq!(step.effects, vec![Effect::LoadSection(Section::Liked)]);
		page.update(Msg::PostsLoaded(Section::Liked, Ok(vec![post(1)])));
		page.update(Msg::Show(Section::Posts));
		let step = page.update(Msg::Show(Section::Liked));
		assert!(step.effects.is_empty());
		assert!(step.dirty.contains(SECTION));
	}

	#[test]
	fn late_response_for_an_inactive_tab_fills_the_cache_silently() {
		let mut page = loaded();
		page.update(Msg::Show(Section::Liked));
		page.update(Msg::Show(Section::Posts));
		let step = page.update(Msg::PostsLoaded(Section::Liked, Ok(vec![post(1)])));
		assert_eq!(step, Step::idle());
		assert!(page.cache_loaded(Section::Liked));
	}

	#[test]
	fn saving_the_bio_applies_the_draft() {
		let mut page = loaded();
		page.update(Msg::EditBio);
		page.update(Msg::BioDraft("Now into cacti.".to_owned()));
		let step = page.update(Msg::SaveBio);
		assert_eq!(step.effects, vec![Effect::SaveBio("Now into cacti.".to_owned())]);
		page.update(Msg::BioSaved(Ok(ProfileAck { success: true, username: None })));
		assert_eq!(page.profile.as_ref().unwrap().bio, "Now into cacti.");
		assert_eq!(page.editing, Editing::None);
	}

	#[test]
	fn server_echo_wins_for_the_display_name() {
		let mut page = loaded();
		page.update(Msg::EditName);
		page.update(Msg::NameDraft("FERN".to_owned()));
		page.update(Msg::SaveName);
		page.update(Msg::NameSaved(Ok(ProfileAck { success: true, username: Some("fern2".to_owned()) })));
		assert_eq!(page.profile.as_ref().unwrap().username, "fern2");
	}

	#[test]
	fn empty_name_is_not_submitted() {
		let mut page = loaded();
		page.update(Msg::EditName);
		page.update(Msg::NameDraft("   ".to_owned()));
		assert_eq!(page.update(Msg::SaveName), Step::idle());
	}

	#[test]
	fn unauthorized_profile_load_redirects() {
		let mut page = ProfilePage::new();
		let step = page.update(Msg::Loaded(Err(ApiError::Unauthorized)));
		assert_eq!(step.effects, vec![Effect::RedirectLogin]);
	}

	#[test]
	fn cancelling_an_edit_discards_the_draft() {
		let mut page = loaded();
		page.update(Msg::EditBio);
		page.update(Msg::BioDraft("discarded".to_owned()));
		page.update(Msg::CancelBio);
		assert_eq!(page.profile.as_ref().unwrap().bio, "Chronic overwaterer.");
		assert_eq!(page.editing, Editing::None);
	}
}
