//! The single-post page: post body, voting, comments and the author's
//! edit/delete flows.
//!
//! Everything renders from one view model. Comment edits replace only the
//! affected entry's text; comment deletion removes the entry and decrements
//! the visible count by exactly one (floored at zero) without refetching the
//! list.

use crate::api::{self, ApiError};
use crate::browser::{self, Notice};
use crate::form::{self, CategoryPicker};
use crate::model::{AuthStatus, Category, Comment, Post, Vote, VoteOutcome};
use crate::runtime::{Dispatch, Page, Region, Step};
use crate::vdom::{el, text, Node};
use tracing::warn;

pub const POST: Region = Region(0);
pub const COMMENTS: Region = Region(1);
pub const EDITOR: Region = Region(2);

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
	AuthChecked(Result<AuthStatus, ApiError>),
	PostLoaded(Result<Post, ApiError>),
	CommentsLoaded(Result<Vec<Comment>, ApiError>),
	VotePost(Vote),
	PostVoteSettled(Result<VoteOutcome, ApiError>),
	VoteComment(u64, Vote),
	CommentVoteSettled(u64, Result<VoteOutcome, ApiError>),
	DraftChanged(String),
	SubmitComment,
	CommentCreated(Result<(), ApiError>),
	OpenEditComment(u64),
	EditCommentDraft(String),
	SaveComment,
	CommentSaved(Result<(), ApiError>),
	OpenDeleteComment(u64),
	ConfirmDeleteComment,
	CommentDeleted(u64, Result<(), ApiError>),
	OpenEditPost,
	EditCategoriesLoaded(Result<Vec<Category>, ApiError>),
	EditTitle(String),
	EditContent(String),
	ToggleCategory(String),
	RemoveCategory(String),
	SavePost,
	PostSaved(Result<(), ApiError>),
	OpenDeletePost,
	ConfirmDeletePost,
	PostDeleted(Result<(), ApiError>),
	CloseEditor,
}

#[derive(Debug, PartialEq)]
pub enum Effect {
	CheckAuth,
	LoadPost,
	LoadComments,
	SubmitPostVote(Vote),
	SubmitCommentVote(u64, Vote),
	CreateComment(String),
	SaveComment { comment_id: u64, content: String },
	DeleteComment(u64),
	LoadEditCategories,
	SavePost { title: String, content: String, categories: Vec<String> },
	DeletePost,
	RedirectHome,
	SetTitle(String),
	LoginAlert(&'static str),
	Success(&'static str),
	Failure(&'static str),
}

/// Which modal the editor region currently shows.
#[derive(Debug, Clone, PartialEq)]
enum Editor {
	Closed,
	EditComment { id: u64, content: String },
	DeleteComment { id: u64 },
	EditPost { title: String, content: String, picker: CategoryPicker },
	DeletePost,
}

#[derive(Debug)]
pub struct PostView {
	post_id: u64,
	post: Option<Post>,
	comments: Vec<Comment>,
	logged_in: bool,
	failed: bool,
	draft: String,
	editor: Editor,
	all_categories: Vec<Category>,
}

impl PostView {
	#[must_use]
	pub fn new(post_id: u64) -> Self {
		Self {
			post_id,
			post: None,
			comments: Vec::new(),
			logged_in: false,
			failed: false,
			draft: String::new(),
			editor: Editor::Closed,
			all_categories: Vec::new(),
		}
	}

	fn editor_valid(&self) -> bool {
		match &self.editor {
			Editor::EditPost { title, content, picker } => {
				form::required(title).is_valid() && form::required(content).is_valid() && !picker.is_empty()
			}
			_ => false,
		}
	}
}

impl Page for PostView {
	type Msg = Msg;
	type Effect = Effect;

	const REGIONS: &'static [(Region, &'static str)] =
		&[(POST, "post-container"), (COMMENTS, "comments-section"), (EDITOR, "post-editor")];

	#[allow(clippy::too_many_lines)]
	fn update(&mut self, message: Msg) -> Step<Effect> {
		match message {
			Msg::AuthChecked(result) => {
				self.logged_in = result.map(|status| status.logged_in).unwrap_or(false);
				Step::render(POST).and_render(COMMENTS)
			}
			Msg::PostLoaded(Ok(post)) => {
				let title = format!("{} - Plant Talk", post.title);
				self.post = Some(post);
				self.failed = false;
				Step::render(POST).and_effect(Effect::SetTitle(title))
			}
			Msg::PostLoaded(Err(_)) => {
				self.failed = true;
				Step::render(POST)
			}
			Msg::CommentsLoaded(Ok(comments)) => {
				self.comments = comments;
				Step::render(COMMENTS)
			}
			Msg::CommentsLoaded(Err(_)) => {
				// An empty list view stands in; the post itself is unaffected.
				self.comments.clear();
				Step::render(COMMENTS)
			}
			Msg::VotePost(vote) => {
				if self.logged_in {
					Step::effect(Effect::SubmitPostVote(vote))
				} else {
					Step::effect(Effect::LoginAlert("Please login to like/dislike posts"))
				}
			}
			Msg::PostVoteSettled(Ok(outcome)) => match &mut self.post {
				Some(post) => {
					post.likes = outcome.like_count;
					post.dislikes = outcome.dislike_count;
					post.user_vote = outcome.user_vote;
					Step::render(POST)
				}
				None => Step::idle(),
			},
			Msg::PostVoteSettled(Err(ApiError::Unauthorized)) => {
				Step::effect(Effect::LoginAlert("Please login to like/dislike posts"))
			}
			Msg::PostVoteSettled(Err(_)) => Step::effect(Effect::Failure("Failed to like/dislike. Please try again.")),
			Msg::VoteComment(comment_id, vote) => {
				if self.logged_in {
					Step::effect(Effect::SubmitCommentVote(comment_id, vote))
				} else {
					Step::effect(Effect::LoginAlert("Please login to like/dislike comments"))
				}
			}
			Msg::CommentVoteSettled(comment_id, Ok(outcome)) => {
				match self.comments.iter_mut().find(|comment| comment.id == comment_id) {
					Some(comment) => {
						comment.like_count = outcome.like_count;
						comment.dislike_count = outcome.dislike_count;
						comment.user_vote = outcome.user_vote;
						Step::render(COMMENTS)
					}
					None => {
						warn!("Vote response for comment {} no longer in the list.", comment_id);
						Step::idle()
					}
				}
			}
			Msg::CommentVoteSettled(_, Err(ApiError::Unauthorized)) => {
				Step::effect(Effect::LoginAlert("Please login to like/dislike comments"))
			}
			Msg::CommentVoteSettled(_, Err(_)) => Step::effect(Effect::Failure("Failed to vote on the comment.")),
			Msg::DraftChanged(draft) => {
				// The textarea keeps its own cursor; no re-render here.
				self.draft = draft;
				Step::idle()
			}
			Msg::SubmitComment => {
				let content = self.draft.trim().to_owned();
				if content.is_empty() {
					Step::idle()
				} else {
					Step::effect(Effect::CreateComment(content))
				}
			}
			Msg::CommentCreated(Ok(())) => {
				self.draft.clear();
				if let Some(post) = &mut self.post {
					post.comments += 1;
				}
				Step::render(POST).and_render(COMMENTS).and_effect(Effect::LoadComments)
			}
			Msg::CommentCreated(Err(_)) => Step::effect(Effect::Failure("Error submitting comment. Please try again.")),
			Msg::OpenEditComment(comment_id) => {
				match self.comments.iter().find(|comment| comment.id == comment_id) {
					Some(comment) => {
						self.editor = Editor::EditComment { id: comment_id, content: comment.content.clone() };
						Step::render(EDITOR)
					}
					None => Step::idle(),
				}
			}
			Msg::EditCommentDraft(content) => {
				if let Editor::EditComment { content: draft, .. } = &mut self.editor {
					*draft = content;
				}
				Step::idle()
			}
			Msg::SaveComment => match &self.editor {
				Editor::EditComment { id, content } if !content.trim().is_empty() => Step::effect(Effect::SaveComment {
					comment_id: *id,
					content: content.trim().to_owned(),
				}),
				_ => Step::idle(),
			},
			Msg::CommentSaved(Ok(())) => {
				// In-place text replacement; no refetch.
				if let Editor::EditComment { id, content } = &self.editor {
					if let Some(comment) = self.comments.iter_mut().find(|comment| comment.id == *id) {
						comment.content = content.trim().to_owned();
					}
				}
				self.editor = Editor::Closed;
				Step::render(COMMENTS)
					.and_render(EDITOR)
					.and_effect(Effect::Success("Comment updated successfully!"))
			}
			Msg::CommentSaved(Err(_)) => Step::effect(Effect::Failure("Failed to edit comment")),
			Msg::OpenDeleteComment(comment_id) => {
				self.editor = Editor::DeleteComment { id: comment_id };
				Step::render(EDITOR)
			}
			Msg::ConfirmDeleteComment => match &self.editor {
				Editor::DeleteComment { id } => Step::effect(Effect::DeleteComment(*id)),
				_ => Step::idle(),
			},
			Msg::CommentDeleted(comment_id, Ok(())) => {
				self.comments.retain(|comment| comment.id != comment_id);
				if let Some(post) = &mut self.post {
					post.comments = post.comments.saturating_sub(1);
				}
				self.editor = Editor::Closed;
				Step::render(POST)
					.and_render(COMMENTS)
					.and_render(EDITOR)
					.and_effect(Effect::Success("Comment deleted successfully!"))
			}
			Msg::CommentDeleted(_, Err(_)) => Step::effect(Effect::Failure("Failed to delete comment")),
			Msg::OpenEditPost => match &self.post {
				Some(post) => {
					self.editor = Editor::EditPost {
						title: post.title.clone(),
						content: post.content.clone(),
						picker: CategoryPicker::preselected(post.tags.iter().cloned()),
					};
					Step::render(EDITOR).and_effect(Effect::LoadEditCategories)
				}
				None => Step::idle(),
			},
			Msg::EditCategoriesLoaded(Ok(categories)) => {
				self.all_categories = categories;
				Step::render(EDITOR)
			}
			Msg::EditCategoriesLoaded(Err(_)) => Step::effect(Effect::Failure("Failed to load categories")),
			// The modal's controls keep their own cursor; re-rendering here
			// would recreate the input mid-keystroke.
			Msg::EditTitle(title) => {
				if let Editor::EditPost { title: draft, .. } = &mut self.editor {
					*draft = title;
				}
				Step::idle()
			}
			Msg::EditContent(content) => {
				if let Editor::EditPost { content: draft, .. } = &mut self.editor {
					*draft = content;
				}
				Step::idle()
			}
			Msg::ToggleCategory(name) => {
				if let Editor::EditPost { picker, .. } = &mut self.editor {
					picker.toggle(&name);
				}
				Step::render(EDITOR)
			}
			Msg::RemoveCategory(name) => {
				if let Editor::EditPost { picker, .. } = &mut self.editor {
					picker.remove(&name);
				}
				Step::render(EDITOR)
			}
			Msg::SavePost => {
				if !self.editor_valid() {
					return Step::effect(Effect::Failure("Title, content and at least one category are required"));
				}
				match &self.editor {
					Editor::EditPost { title, content, picker } => Step::effect(Effect::SavePost {
						title: title.trim().to_owned(),
						content: content.trim().to_owned(),
						categories: picker.names().to_vec(),
					}),
					_ => Step::idle(),
				}
			}
			Msg::PostSaved(Ok(())) => {
				if let Editor::EditPost { title, content, picker } = &self.editor {
					if let Some(post) = &mut self.post {
						post.title = title.trim().to_owned();
						post.content = content.trim().to_owned();
						post.tags = picker.names().to_vec();
					}
				}
				self.editor = Editor::Closed;
				Step::render(POST)
					.and_render(EDITOR)
					.and_effect(Effect::Success("Post updated successfully!"))
			}
			Msg::PostSaved(Err(_)) => Step::effect(Effect::Failure("Failed to edit post")),
			Msg::OpenDeletePost => {
				self.editor = Editor::DeletePost;
				Step::render(EDITOR)
			}
			Msg::ConfirmDeletePost => Step::effect(Effect::DeletePost),
			Msg::PostDeleted(Ok(())) => Step::effect(Effect::Success("Post deleted successfully!"))
				.and_effect(Effect::RedirectHome),
			Msg::PostDeleted(Err(_)) => Step::effect(Effect::Failure("Failed to delete post")),
			Msg::CloseEditor => {
				self.editor = Editor::Closed;
				Step::render(EDITOR)
			}
		}
	}

	fn view(&self, region: Region) -> Vec<Node<Msg>> {
		match region {
			POST => self.view_post(),
			COMMENTS => self.view_comments(),
			EDITOR => self.view_editor(),
			_ => Vec::new(),
		}
	}

	fn perform(effect: Effect, dispatch: &Dispatch<Self>) {
		let post_id = dispatch.with(|page| page.post_id);
		match effect {
			Effect::CheckAuth => dispatch.spawn(async { Some(Msg::AuthChecked(api::auth_status().await)) }),
			Effect::LoadPost => dispatch.spawn(async move { Some(Msg::PostLoaded(api::post(post_id).await)) }),
			Effect::LoadComments => {
				dispatch.spawn(async move { Some(Msg::CommentsLoaded(api::comments(post_id).await)) });
			}
			Effect::SubmitPostVote(vote) => {
				dispatch.spawn(async move { Some(Msg::PostVoteSettled(api::vote_post(post_id, vote).await)) });
			}
			Effect::SubmitCommentVote(comment_id, vote) => dispatch.spawn(async move {
				Some(Msg::CommentVoteSettled(comment_id, api::vote_comment(comment_id, vote).await))
			}),
			Effect::CreateComment(content) => dispatch.spawn(async move {
				Some(Msg::CommentCreated(api::create_comment(post_id, &content).await))
			}),
			Effect::SaveComment { comment_id, content } => dispatch.spawn(async move {
				Some(Msg::CommentSaved(api::edit_comment(comment_id, &content).await))
			}),
			Effect::DeleteComment(comment_id) => dispatch.spawn(async move {
				Some(Msg::CommentDeleted(comment_id, api::delete_comment(comment_id).await))
			}),
			Effect::LoadEditCategories => {
				dispatch.spawn(async { Some(Msg::EditCategoriesLoaded(api::categories().await)) });
			}
			Effect::SavePost { title, content, categories } => dispatch.spawn(async move {
				Some(Msg::PostSaved(api::edit_post(post_id, &title, &content, &categories).await))
			}),
			Effect::DeletePost => dispatch.spawn(async move { Some(Msg::PostDeleted(api::delete_post(post_id).await)) }),
			Effect::RedirectHome => browser::redirect("/"),
			Effect::SetTitle(title) => browser::set_title(&title),
			Effect::LoginAlert(message) => browser::alert(message),
			Effect::Success(message) => browser::toast(Notice::Success, message),
			Effect::Failure(message) => browser::toast(Notice::Error, message),
		}
	}
}

/// Renders `content`, turning line breaks into `<br>` as the backend stores
/// plain text.
fn multiline<M>(content: &str) -> Vec<Node<M>> {
	let mut nodes = Vec::new();
	for (index, line) in content.split('\n').enumerate() {
		if index > 0 {
			nodes.push(el("br").into());
		}
		nodes.push(text(line));
	}
	nodes
}

impl PostView {
	fn view_post(&self) -> Vec<Node<Msg>> {
		if self.failed {
			return vec![el("div")
				.class("text-center py-5 text-muted")
				.child(el("h4").text("Post not found"))
				.child(el("a").attr("href", "/").class("btn btn-outline-light").text("Back to posts"))
				.into()];
		}
		let post = match &self.post {
			Some(post) => post,
			None => return vec![el("div").class("text-muted py-5 text-center").text("Loading…").into()],
		};

		let mut header = el("div")
			.class("d-flex justify-content-between align-items-start")
			.child(
				el("div")
					.child(el("h2").attr("id", "post-title").class("text-white").text(post.title.clone()))
					.child(
						el("small")
							.class("text-light")
							.text(format!("by {} · {}", post.author, post.time_ago)),
					),
			);
		if self.logged_in && post.is_author {
			header = header.child(
				el("div")
					.class("post-owner-actions")
					.child(
						el("button")
							.class("btn btn-outline-light btn-sm me-2")
							.on("click", Msg::OpenEditPost)
							.text("Edit Post"),
					)
					.child(
						el("button")
							.class("btn btn-outline-light btn-sm text-danger")
							.on("click", Msg::OpenDeletePost)
							.text("Delete Post"),
					),
			);
		}

		let mut article = el("article").class("post-content").child(header);

		if let Some(image) = post.image_url.as_deref() {
			article = article.child(
				el("div")
					.class("post-image-container my-3")
					.child(el("img").class("img-fluid").attr("src", image).attr("alt", "Post image")),
			);
		}

		article = article
			.child(el("p").class("text-light").children(multiline(&post.content)))
			.child(
				el("div").attr("id", "post-tags").children(
					post.tags
						.iter()
						.map(|tag| el("span").class("tag-badge me-1").text(format!("#{}", tag)).into()),
				),
			)
			.child(
				el("div")
					.class("d-flex align-items-center gap-2 mt-3")
					.child(
						el("button")
							.class_if("btn btn-outline-light", "active-like", post.user_vote == 1)
							.on("click", Msg::VotePost(Vote::Like))
							.child(el("i").class("bi bi-hand-thumbs-up")),
					)
					.child(el("span").class("vote-count like-count").text(post.likes.to_string()))
					.child(
						el("button")
							.class_if("btn btn-outline-light", "active-dislike", post.user_vote == -1)
							.on("click", Msg::VotePost(Vote::Dislike))
							.child(el("i").class("bi bi-hand-thumbs-down")),
					)
					.child(el("span").class("vote-count dislike-count").text(post.dislikes.to_string()))
					.child(
						el("span")
							.class("text-light ms-3")
							.text(format!("{} comments", post.comments)),
					),
			);

		vec![article.into()]
	}

	fn view_comments(&self) -> Vec<Node<Msg>> {
		let count = self.comments.len();
		let noun = if count == 1 { "Comment" } else { "Comments" };
		let mut nodes: Vec<Node<Msg>> =
			vec![el("h4").class("text-white").text(format!("{} {}", count, noun)).into()];

		if self.comments.is_empty() {
			nodes.push(
				el("div")
					.class("text-muted text-center py-3")
					.text("No comments yet. Be the first to reply!")
					.into(),
			);
		} else {
			nodes.extend(self.comments.iter().map(|comment| self.view_comment(comment)));
		}

		if self.logged_in {
			nodes.push(
				el("form")
					.class("comment-form mt-3")
					.on_submit(Msg::SubmitComment)
					.child(
						el("textarea")
							.class("form-control mb-2")
							.attr("rows", "3")
							.attr("placeholder", "Write a comment…")
							.on_input(Msg::DraftChanged)
							.text(self.draft.clone()),
					)
					.child(el("button").class("btn btn-success").attr("type", "submit").text("Post Comment"))
					.into(),
			);
		} else {
			nodes.push(
				el("div")
					.class("text-muted py-3")
					.child(text("Please "))
					.child(el("a").attr("href", "/login").text("login"))
					.child(text(" to join the discussion."))
					.into(),
			);
		}

		nodes
	}

	fn view_comment(&self, comment: &Comment) -> Node<Msg> {
		let mut item = el("div")
			.class("comment-item p-3")
			.attr("data-comment-id", comment.id.to_string())
			.child(
				el("div")
					.class("d-flex align-items-center mb-2")
					.child(el("strong").class("text-white").text(comment.author.clone()))
					.child(el("small").class("text-muted ms-2").text(comment.time_ago.clone())),
			)
			.child(el("p").class("text-white mb-2").children(multiline(&comment.content)))
			.child(
				el("div")
					.class("d-flex align-items-center gap-2")
					.child(
						el("button")
							.class_if("btn btn-sm btn-outline-light vote-comment-btn", "active-like", comment.user_vote == 1)
							.on("click", Msg::VoteComment(comment.id, Vote::Like))
							.child(el("i").class("bi bi-hand-thumbs-up")),
					)
					.child(el("span").class("vote-count like-count").text(comment.like_count.to_string()))
					.child(
						el("button")
							.class_if(
								"btn btn-sm btn-outline-light vote-comment-btn",
								"active-dislike",
								comment.user_vote == -1,
							)
							.on("click", Msg::VoteComment(comment.id, Vote::Dislike))
							.child(el("i").class("bi bi-hand-thumbs-down")),
					)
					.child(el("span").class("vote-count dislike-count").text(comment.dislike_count.to_string())),
			);

		if self.logged_in && comment.is_author {
			item = item.child(
				el("div")
					.class("comment-owner-actions mt-2")
					.child(
						el("button")
							.class("btn btn-sm btn-outline-light me-2")
							.on("click", Msg::OpenEditComment(comment.id))
							.text("Edit"),
					)
					.child(
						el("button")
							.class("btn btn-sm btn-outline-light text-danger")
							.on("click", Msg::OpenDeleteComment(comment.id))
							.text("Delete"),
					),
			);
		}

		item.into()
	}

	fn view_editor(&self) -> Vec<Node<Msg>> {
		match &self.editor {
			Editor::Closed => Vec::new(),
			Editor::EditComment { content, .. } => vec![modal(
				"Edit Comment",
				el("textarea")
					.class("form-control")
					.attr("rows", "4")
					.on_input(Msg::EditCommentDraft)
					.text(content.clone())
					.into(),
				el("button")
					.class("btn btn-success")
					.on("click", Msg::SaveComment)
					.text("Save")
					.into(),
			)],
			Editor::DeleteComment { .. } => vec![modal(
				"Delete Comment",
				text("This cannot be undone. Delete this comment?"),
				el("button")
					.class("btn btn-danger")
					.on("click", Msg::ConfirmDeleteComment)
					.text("Delete")
					.into(),
			)],
			Editor::DeletePost => vec![modal(
				"Delete Post",
				text("This removes the post and all of its comments. Delete it?"),
				el("button")
					.class("btn btn-danger")
					.on("click", Msg::ConfirmDeletePost)
					.text("Delete")
					.into(),
			)],
			Editor::EditPost { title, content, picker } => {
				let bubbles = el("div").class("category-bubbles").children(self.all_categories.iter().map(|category| {
					let selected = picker.contains(&category.name);
					el("div")
						.class_if("category-bubble", "selected", selected)
						.on("click", Msg::ToggleCategory(category.name.clone()))
						.child(el("span").class("category-name").text(category.name.clone()))
						.into()
				}));
				let selected_tags: Vec<Node<Msg>> = if picker.is_empty() {
					vec![el("div").class("category-help-text").text("No categories selected").into()]
				} else {
					picker
						.names()
						.iter()
						.map(|name| {
							el("div")
								.class("selected-category-tag")
								.child(el("span").text(format!("#{}", name)))
								.child(
									el("i")
										.class("bi bi-x remove-btn")
										.on("click", Msg::RemoveCategory(name.clone())),
								)
								.into()
						})
						.collect()
				};

				// Always clickable; the reducer rejects an incomplete form with
				// a notice, so typing never needs to re-render the modal.
				let save = el("button").class("btn btn-success").on("click", Msg::SavePost).text("Save Changes");

				let body = el("div")
					.child(
						el("input")
							.class("form-control mb-2")
							.attr("type", "text")
							.attr("value", title.clone())
							.on_input(Msg::EditTitle),
					)
					.child(
						el("textarea")
							.class("form-control mb-2")
							.attr("rows", "6")
							.on_input(Msg::EditContent)
							.text(content.clone()),
					)
					.child(bubbles)
					.child(el("div").class("selected-categories").children(selected_tags));

				vec![modal("Edit Post", body.into(), save.into())]
			}
		}
	}
}

fn modal(title: &str, body: Node<Msg>, action: Node<Msg>) -> Node<Msg> {
	el("div")
		.class("modal-backdrop-custom")
		.child(
			el("div")
				.class("modal-dialog-custom")
				.child(
					el("div")
						.class("modal-header d-flex justify-content-between")
						.child(el("h5").class("modal-title").text(title.to_owned()))
						.child(el("button").class("btn-close").on("click", Msg::CloseEditor)),
				)
				.child(el("div").class("modal-body").child(body))
				.child(
					el("div")
						.class("modal-footer")
						.child(el("button").class("btn btn-outline-light").on("click", Msg::CloseEditor).text("Cancel"))
						.child(action),
				),
		)
		.into()
}

/// Wires the page for the post id in the URL query; a missing or unparsable
/// id renders the error view immediately.
pub fn boot() {
	let post_id = browser::query_param("id").and_then(|id| id.parse::<u64>().ok());
	let post_id = match post_id {
		Some(post_id) => post_id,
		None => {
			warn!("view-post opened without a valid ?id=.");
			let dispatch = Dispatch::mount(PostView::new(0), None);
			dispatch.send(Msg::PostLoaded(Err(ApiError::Status(404))));
			return;
		}
	};
	let dispatch = Dispatch::mount(PostView::new(post_id), None);
	PostView::perform(Effect::CheckAuth, &dispatch);
	PostView::perform(Effect::LoadPost, &dispatch);
	PostView::perform(Effect::LoadComments, &dispatch);
}

#[cfg(test)]
mod tests {
	use super::*;

	fn post(comments: u32) -> Post {
		Post {
			id: 5,
			title: "Watering schedule".to_owned(),
			author: "fern".to_owned(),
			excerpt: String::new(),
			content: "Twice a week.".to_owned(),
			tags: vec!["succulents".to_owned()],
			time_ago: "1d ago".to_owned(),
			likes: 4,
			dislikes: 1,
			comments,
			user_vote: 0,
			image_url: None,
			thumbnail_url: None,
			is_author: true,
		}
	}

	fn comment(id: u64, content: &str) -> Comment {
		Comment {
			id,
			post_id: 5,
			author: "moss".to_owned(),
			content: content.to_owned(),
			time_ago: "2h ago".to_owned(),
			like_count: 0,
			dislike_count: 0,
			user_vote: 0,
			is_author: true,
		}
	}

	fn page_with(comments: Vec<Comment>, count: u32) -> PostView {
		let mut page = PostView::new(5);
		page.update(Msg::AuthChecked(Ok(AuthStatus { logged_in: true, user_id: Some(1) })));
		page.update(Msg::PostLoaded(Ok(post(count))));
		page.update(Msg::CommentsLoaded(Ok(comments)));
		page
	}

	#[test]
	fn deleting_a_comment_decrements_the_count_by_one() {
		let mut page = page_with(vec![comment(1, "a"), comment(2, "b"), comment(3, "c")], 3);
		let step = page.update(Msg::CommentDeleted(2, Ok(())));
		assert_eq!(page.comments.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1, 3]);
		assert_eq!(page.post.as_ref().unwrap().comments, 2);
		assert!(step.dirty.contains(POST));
		assert!(step.dirty.contains(COMMENTS));
	}

	#[test]
	fn comment_count_never_goes_negative() {
		let mut page = page_with(vec![comment(1, "a")], 0);
		page.update(Msg::CommentDeleted(1, Ok(())));
		assert_eq!(page.post.as_ref().unwrap().comments, 0);
	}

	#[test]
	fn editing_replaces_only_the_text_in_place() {
		let mut page = page_with(vec![comment(1, "old"), comment(2, "keep")], 2);
		page.update(Msg::OpenEditComment(1));
		page.update(Msg::EditCommentDraft("new words".to_owned()));
		let step = page.update(Msg::SaveComment);
		assert_eq!(
			step.effects,
			vec![Effect::SaveComment { comment_id: 1, content: "new words".to_owned() }]
		);
		let step = page.update(Msg::CommentSaved(Ok(())));
		assert_eq!(page.comments[0].content, "new words");
		assert_eq!(page.comments[1].content, "keep");
		// No refetch of the list.
		assert!(!step.effects.contains(&Effect::LoadComments));
	}

	#[test]
	fn comment_vote_overwrites_from_the_response() {
		let mut page = page_with(vec![comment(1, "a")], 1);
		let outcome = VoteOutcome { success: true, like_count: 7, dislike_count: 0, user_vote: 1 };
		page.update(Msg::CommentVoteSettled(1, Ok(outcome)));
		assert_eq!(page.comments[0].like_count, 7);
		assert_eq!(page.comments[0].user_vote, 1);
	}

	#[test]
	fn voting_while_signed_out_only_prompts() {
		let mut page = PostView::new(5);
		page.update(Msg::PostLoaded(Ok(post(0))));
		let step = page.update(Msg::VotePost(Vote::Like));
		assert_eq!(step.effects, vec![Effect::LoginAlert("Please login to like/dislike posts")]);
		assert_eq!(page.post.as_ref().unwrap().likes, 4);
	}

	#[test]
	fn empty_drafts_are_not_submitted() {
		let mut page = page_with(Vec::new(), 0);
		page.update(Msg::DraftChanged("   ".to_owned()));
		assert_eq!(page.update(Msg::SubmitComment), Step::idle());
	}

	#[test]
	fn successful_comment_bumps_count_and_refetches() {
		let mut page = page_with(Vec::new(), 0);
		page.update(Msg::DraftChanged("First!".to_owned()));
		page.update(Msg::SubmitComment);
		let step = page.update(Msg::CommentCreated(Ok(())));
		assert_eq!(page.post.as_ref().unwrap().comments, 1);
		assert!(page.draft.is_empty());
		assert!(step.effects.contains(&Effect::LoadComments));
	}

	#[test]
	fn post_editor_requires_title_content_and_a_category() {
		let mut page = page_with(Vec::new(), 0);
		page.update(Msg::OpenEditPost);
		page.update(Msg::RemoveCategory("succulents".to_owned()));
		let step = page.update(Msg::SavePost);
		assert_eq!(
			step.effects,
			vec![Effect::Failure("Title, content and at least one category are required")]
		);
		page.update(Msg::ToggleCategory("succulents".to_owned()));
		let step = page.update(Msg::SavePost);
		assert!(matches!(step.effects.as_slice(), [Effect::SavePost { .. }]));
	}

	#[test]
	fn typing_in_the_post_editor_does_not_rerender_the_modal() {
		let mut page = page_with(Vec::new(), 0);
		page.update(Msg::OpenEditPost);
		let step = page.update(Msg::EditTitle("Misting schedule".to_owned()));
		assert_eq!(step, Step::idle());
		let step = page.update(Msg::EditContent("Morning only.".to_owned()));
		assert_eq!(step, Step::idle());
		// The drafts still reach the save payload.
		let step = page.update(Msg::SavePost);
		match step.effects.as_slice() {
			[Effect::SavePost { title, content, .. }] => {
				assert_eq!(title, "Misting schedule");
				assert_eq!(content, "Morning only.");
			}
			other => panic!("expected a save effect, got {:?}", other),
		}
	}

	#[test]
	fn saving_the_post_updates_it_in_place() {
		let mut page = page_with(Vec::new(), 0);
		page.update(Msg::OpenEditPost);
		page.update(Msg::EditTitle("Misting schedule".to_owned()));
		page.update(Msg::PostSaved(Ok(())));
		let post = page.post.as_ref().unwrap();
		assert_eq!(post.title, "Misting schedule");
		assert_eq!(post.tags, vec!["succulents".to_owned()]);
		assert_eq!(page.editor, Editor::Closed);
	}
}
