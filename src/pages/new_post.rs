//! The post composer: category bubbles, client-side validation and the
//! optional image attachment.
//!
//! The title and content inputs are server-rendered; their values flow into
//! the view model on every keystroke so the publish gate is recomputed
//! without touching the DOM. Attachments upload eagerly on selection and the
//! post form only carries the returned image id.

use crate::api::{self, ApiError};
use crate::browser::{self, Notice};
use crate::form::{self, CategoryPicker};
use crate::model::{Category, UploadOutcome};
use crate::runtime::{Dispatch, Page, Region, Step};
use crate::vdom::{el, Node};
use tracing::warn;

pub const CATEGORIES: Region = Region(0);
pub const SELECTED: Region = Region(1);
pub const PREVIEW: Region = Region(2);
pub const ACTIONS: Region = Region(3);

const FILE_INPUT: &str = "imageUpload";
const MAX_IMAGE_BYTES: f64 = 20.0 * 1024.0 * 1024.0;
const ACCEPTED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
	CategoriesLoaded(Result<Vec<Category>, ApiError>),
	TitleChanged(String),
	ContentChanged(String),
	Toggle(String),
	Remove(String),
	FileSelected,
	UploadStarted,
	Uploaded(Result<UploadOutcome, ApiError>),
	RemoveImage,
	ImageRemoved(Result<(), ApiError>),
	Submit,
	Submitted(Result<(), ApiError>),
}

#[derive(Debug, PartialEq)]
pub enum Effect {
	LoadCategories,
	/// Validate the selected file and start the upload; the `File` handle
	/// stays in the DOM, only its outcome enters the model.
	ReadFile,
	DeleteImage(String),
	ResetFileInput,
	Publish {
		title: String,
		content: String,
		categories: Vec<String>,
		image_id: Option<String>,
	},
	RedirectHome,
	RedirectLogin,
	Success(&'static str),
	Failure(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
enum Attachment {
	None,
	Uploading,
	Uploaded { filename: String, thumbnail_url: Option<String> },
}

#[derive(Debug)]
pub struct Composer {
	categories: Vec<Category>,
	picker: CategoryPicker,
	title: String,
	content: String,
	attachment: Attachment,
	submitting: bool,
}

impl Composer {
	#[must_use]
	pub fn new() -> Self {
		Self {
			categories: Vec::new(),
			picker: CategoryPicker::new(),
			title: String::new(),
			content: String::new(),
			attachment: Attachment::None,
			submitting: false,
		}
	}

	fn can_publish(&self) -> bool {
		form::required(&self.title).is_valid()
			&& form::required(&self.content).is_valid()
			&& !self.picker.is_empty()
			&& self.attachment != Attachment::Uploading
			&& !self.submitting
	}
}

impl Default for Composer {
	fn default() -> Self {
		Self::new()
	}
}

impl Page for Composer {
	type Msg = Msg;
	type Effect = Effect;

	const REGIONS: &'static [(Region, &'static str)] = &[
		(CATEGORIES, "categoriesContainer"),
		(SELECTED, "selectedCategories"),
		(PREVIEW, "imagePreview"),
		(ACTIONS, "composerActions"),
	];

	fn update(&mut self, message: Msg) -> Step<Effect> {
		match message {
			Msg::CategoriesLoaded(Ok(categories)) => {
				self.categories = categories;
				Step::render(CATEGORIES)
			}
			Msg::CategoriesLoaded(Err(_)) => Step::effect(Effect::Failure("Failed to load categories")),
			Msg::TitleChanged(title) => {
				self.title = title;
				Step::render(ACTIONS)
			}
			Msg::ContentChanged(content) => {
				self.content = content;
				Step::render(ACTIONS)
			}
			Msg::Toggle(name) => {
				self.picker.toggle(&name);
				Step::render(CATEGORIES).and_render(SELECTED).and_render(ACTIONS)
			}
			Msg::Remove(name) => {
				self.picker.remove(&name);
				Step::render(CATEGORIES).and_render(SELECTED).and_render(ACTIONS)
			}
			Msg::FileSelected => Step::effect(Effect::ReadFile),
			Msg::UploadStarted => {
				self.attachment = Attachment::Uploading;
				Step::render(PREVIEW).and_render(ACTIONS)
			}
			Msg::Uploaded(Ok(outcome)) => match outcome.filename {
				Some(filename) => {
					self.attachment = Attachment::Uploaded { filename, thumbnail_url: outcome.thumbnail_url };
					Step::render(PREVIEW).and_render(ACTIONS)
				}
				None => {
					self.attachment = Attachment::None;
					Step::render(PREVIEW)
						.and_render(ACTIONS)
						.and_effect(Effect::ResetFileInput)
						.and_effect(Effect::Failure("Failed to upload image. Please try again."))
				}
			},
			Msg::Uploaded(Err(_)) => {
				self.attachment = Attachment::None;
				Step::render(PREVIEW)
					.and_render(ACTIONS)
					.and_effect(Effect::ResetFileInput)
					.and_effect(Effect::Failure("Failed to upload image. Please try again."))
			}
			Msg::RemoveImage => match &self.attachment {
				Attachment::Uploaded { filename, .. } => Step::effect(Effect::DeleteImage(filename.clone())),
				_ => Step::idle(),
			},
			Msg::ImageRemoved(Ok(())) => {
				self.attachment = Attachment::None;
				Step::render(PREVIEW).and_render(ACTIONS).and_effect(Effect::ResetFileInput)
			}
			Msg::ImageRemoved(Err(_)) => Step::effect(Effect::Failure("Failed to remove image")),
			Msg::Submit => {
				if !self.can_publish() {
					return Step::idle();
				}
				self.submitting = true;
				let image_id = match &self.attachment {
					Attachment::Uploaded { filename, .. } => Some(filename.clone()),
					_ => None,
				};
				Step::render(ACTIONS).and_effect(Effect::Publish {
					title: self.title.trim().to_owned(),
					content: self.content.trim().to_owned(),
					categories: self.picker.names().to_vec(),
					image_id,
				})
			}
			Msg::Submitted(Ok(())) => Step::effect(Effect::Success("Post created successfully!"))
				.and_effect(Effect::RedirectHome),
			Msg::Submitted(Err(ApiError::Unauthorized)) => Step::effect(Effect::RedirectLogin),
			Msg::Submitted(Err(_)) => {
				self.submitting = false;
				Step::render(ACTIONS).and_effect(Effect::Failure("Failed to create post. Please try again."))
			}
		}
	}

	fn view(&self, region: Region) -> Vec<Node<Msg>> {
		match region {
			CATEGORIES => self.view_bubbles(),
			SELECTED => self.view_selected(),
			PREVIEW => self.view_preview(),
			ACTIONS => self.view_actions(),
			_ => Vec::new(),
		}
	}

	fn perform(effect: Effect, dispatch: &Dispatch<Self>) {
		match effect {
			Effect::LoadCategories => dispatch.spawn(async { Some(Msg::CategoriesLoaded(api::categories().await)) }),
			Effect::ReadFile => {
				let file = match browser::selected_file(FILE_INPUT) {
					Some(file) => file,
					None => return,
				};
				if !ACCEPTED_TYPES.contains(&file.type_().as_str()) {
					warn!("Rejected attachment of type {:?}.", file.type_());
					browser::reset_file_input(FILE_INPUT);
					browser::toast(Notice::Error, "Only JPEG, PNG and GIF images can be attached.");
					return;
				}
				if file.size() > MAX_IMAGE_BYTES {
					browser::reset_file_input(FILE_INPUT);
					browser::toast(Notice::Error, "Images can be at most 20 MB.");
					return;
				}
				dispatch.send(Msg::UploadStarted);
				dispatch.spawn(async move { Some(Msg::Uploaded(api::upload_image(&file, Some("post")).await)) });
			}
			Effect::DeleteImage(filename) => {
				dispatch.spawn(async move { Some(Msg::ImageRemoved(api::delete_image(&filename).await)) });
			}
			Effect::ResetFileInput => browser::reset_file_input(FILE_INPUT),
			Effect::Publish { title, content, categories, image_id } => dispatch.spawn(async move {
				Some(Msg::Submitted(
					api::submit_post(&title, &content, &categories, image_id.as_deref()).await,
				))
			}),
			Effect::RedirectHome => browser::redirect("/"),
			Effect::RedirectLogin => browser::redirect("/login"),
			Effect::Success(message) => browser::toast(Notice::Success, message),
			Effect::Failure(message) => browser::toast(Notice::Error, message),
		}
	}
}

impl Composer {
	fn view_bubbles(&self) -> Vec<Node<Msg>> {
		if self.categories.is_empty() {
			return vec![el("div").class("text-muted").text("Loading categories…").into()];
		}
		self.categories
			.iter()
			.map(|category| {
				el("div")
					.class_if("category-bubble", "selected", self.picker.contains(&category.name))
					.on("click", Msg::Toggle(category.name.clone()))
					.child(el("span").class("category-name").text(category.name.clone()))
					.into()
			})
			.collect()
	}

	fn view_selected(&self) -> Vec<Node<Msg>> {
		if self.picker.is_empty() {
			return vec![el("div")
				.class("category-help-text")
				.text("Select at least one category")
				.into()];
		}
		self.picker
			.names()
			.iter()
			.map(|name| {
				el("div")
					.class("selected-category-tag")
					.child(el("span").text(format!("#{}", name)))
					.child(el("i").class("bi bi-x remove-btn").on("click", Msg::Remove(name.clone())))
					.into()
			})
			.collect()
	}

	fn view_preview(&self) -> Vec<Node<Msg>> {
		match &self.attachment {
			Attachment::None => Vec::new(),
			Attachment::Uploading => vec![el("div").class("text-muted").text("Uploading image…").into()],
			Attachment::Uploaded { filename, thumbnail_url } => {
				let source = thumbnail_url.clone().unwrap_or_else(|| format!("/uploads/{}", filename));
				vec![el("div")
					.class("image-preview-container")
					.child(el("img").class("img-fluid").attr("src", source).attr("alt", "Attached image"))
					.child(
						el("button")
							.class("btn btn-sm btn-outline-light remove-image-btn")
							.attr("type", "button")
							.on("click", Msg::RemoveImage)
							.child(el("i").class("bi bi-x"))
							.text("Remove"),
					)
					.into()]
			}
		}
	}

	fn view_actions(&self) -> Vec<Node<Msg>> {
		let label = if self.submitting { "Publishing…" } else { "Publish Post" };
		let mut button = el("button")
			.class("btn btn-success")
			.attr("type", "button")
			.on("click", Msg::Submit)
			.text(label);
		if !self.can_publish() {
			button = button.attr("disabled", "disabled");
		}
		vec![button.into()]
	}
}

/// Wires the composer to the server-rendered form controls.
pub fn boot() {
	let dispatch = Dispatch::mount(Composer::new(), None);
	Composer::perform(Effect::LoadCategories, &dispatch);

	{
		let dispatch = dispatch.clone();
		browser::listen("postTitle", "input", move |_| {
			dispatch.send(Msg::TitleChanged(browser::input_value("postTitle")));
		});
	}
	{
		let dispatch = dispatch.clone();
		browser::listen("postContent", "input", move |_| {
			dispatch.send(Msg::ContentChanged(browser::input_value("postContent")));
		});
	}
	browser::listen(FILE_INPUT, "change", move |_| dispatch.send(Msg::FileSelected));
}

#[cfg(test)]
mod tests {
	use super::*;

	fn categories() -> Vec<Category> {
		["succulents", "ferns", "herbs"]
			.iter()
			.map(|name| Category { name: (*name).to_owned() })
			.collect()
	}

	fn filled() -> Composer {
		let mut page = Composer::new();
		page.update(Msg::CategoriesLoaded(Ok(categories())));
		page.update(Msg::TitleChanged("Repotting my monstera".to_owned()));
		page.update(Msg::ContentChanged("Roots are circling the pot.".to_owned()));
		page.update(Msg::Toggle("ferns".to_owned()));
		page
	}

	#[test]
	fn publish_requires_title_content_and_a_category() {
		let mut page = Composer::new();
		page.update(Msg::TitleChanged("Title".to_owned()));
		page.update(Msg::ContentChanged("Body".to_owned()));
		assert!(!page.can_publish());
		assert_eq!(page.update(Msg::Submit), Step::idle());
		page.update(Msg::Toggle("ferns".to_owned()));
		assert!(page.can_publish());
	}

	#[test]
	fn whitespace_only_fields_do_not_publish() {
		let mut page = filled();
		page.update(Msg::TitleChanged("   ".to_owned()));
		assert!(!page.can_publish());
	}

	#[test]
	fn submit_carries_the_attachment_id() {
		let mut page = filled();
		page.update(Msg::UploadStarted);
		page.update(Msg::Uploaded(Ok(UploadOutcome {
			success: true,
			filename: Some("abc123.jpg".to_owned()),
			thumbnail_url: Some("/thumbs/abc123.jpg".to_owned()),
		})));
		let step = page.update(Msg::Submit);
		assert_eq!(
			step.effects,
			vec![Effect::Publish {
				title: "Repotting my monstera".to_owned(),
				content: "Roots are circling the pot.".to_owned(),
				categories: vec!["ferns".to_owned()],
				image_id: Some("abc123.jpg".to_owned()),
			}]
		);
	}

	#[test]
	fn publishing_is_blocked_while_an_upload_is_in_flight() {
		let mut page = filled();
		page.update(Msg::UploadStarted);
		assert!(!page.can_publish());
		assert_eq!(page.update(Msg::Submit), Step::idle());
	}

	#[test]
	fn failed_upload_resets_the_attachment() {
		let mut page = filled();
		page.update(Msg::UploadStarted);
		let step = page.update(Msg::Uploaded(Err(ApiError::Status(500))));
		assert_eq!(page.attachment, Attachment::None);
		assert!(step.effects.contains(&Effect::ResetFileInput));
	}

	#[test]
	fn removing_the_image_waits_for_the_server() {
		let mut page = filled();
		page.update(Msg::Uploaded(Ok(UploadOutcome {
			success: true,
			filename: Some("abc.png".to_owned()),
			thumbnail_url: None,
		})));
		let step = page.update(Msg::RemoveImage);
		assert_eq!(step.effects, vec![Effect::DeleteImage("abc.png".to_owned())]);
		assert!(matches!(page.attachment, Attachment::Uploaded { .. }));
		page.update(Msg::ImageRemoved(Ok(())));
		assert_eq!(page.attachment, Attachment::None);
	}

	#[test]
	fn failed_submit_reenables_the_button() {
		let mut page = filled();
		page.update(Msg::Submit);
		assert!(page.submitting);
		page.update(Msg::Submitted(Err(ApiError::Status(500))));
		assert!(!page.submitting);
		assert!(page.can_publish());
	}

	#[test]
	fn toggling_a_bubble_twice_deselects_it() {
		let mut page = filled();
		page.update(Msg::Toggle("ferns".to_owned()));
		assert!(page.picker.is_empty());
		assert!(!page.can_publish());
	}
}
