//! The index page: category sidebar, filterable post feed and post voting.

use crate::api::{self, ApiError, PostFilter};
use crate::browser::{self, Notice};
use crate::model::{Category, Post, Vote, VoteOutcome};
use crate::runtime::{Dispatch, Page, Region, Step};
use crate::vdom::{el, Node};
use tracing::warn;

pub const CATEGORIES: Region = Region(0);
pub const POSTS: Region = Region(1);

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
	CategoriesLoaded(Result<Vec<Category>, ApiError>),
	PostsLoaded(Result<Vec<Post>, ApiError>),
	Select(PostFilter),
	Search(String),
	Vote(u64, Vote),
	VoteSettled(u64, Result<VoteOutcome, ApiError>),
	Open(u64),
}

#[derive(Debug, PartialEq)]
pub enum Effect {
	LoadCategories,
	LoadPosts(PostFilter),
	SubmitVote(u64, Vote),
	Redirect(String),
	LoginAlert,
	RetryAlert,
}

#[derive(Debug, Default)]
pub struct Feed {
	posts: Vec<Post>,
	categories: Vec<Category>,
	filter: Option<PostFilter>,
	search: String,
	posts_failed: bool,
	categories_failed: bool,
}

impl Feed {
	#[must_use]
	pub fn new() -> Self {
		Self { filter: Some(PostFilter::All), ..Self::default() }
	}

	fn filter(&self) -> &PostFilter {
		self.filter.as_ref().unwrap_or(&PostFilter::All)
	}

	/// The live text filter narrows what is rendered without refetching.
	fn visible_posts(&self) -> Vec<&Post> {
		let term = self.search.trim().to_lowercase();
		self.posts
			.iter()
			.filter(|post| {
				term.is_empty()
					|| post.title.to_lowercase().contains(&term)
					|| post.excerpt.to_lowercase().contains(&term)
					|| post.author.to_lowercase().contains(&term)
			})
			.collect()
	}
}

impl Page for Feed {
	type Msg = Msg;
	type Effect = Effect;

	const REGIONS: &'static [(Region, &'static str)] = &[(CATEGORIES, "categoriesList"), (POSTS, "postsContainer")];

	fn update(&mut self, message: Msg) -> Step<Effect> {
		match message {
			Msg::CategoriesLoaded(Ok(categories)) => {
				self.categories = categories;
				self.categories_failed = false;
				Step::render(CATEGORIES)
			}
			Msg::CategoriesLoaded(Err(_)) => {
				self.categories_failed = true;
				Step::render(CATEGORIES)
			}
			Msg::PostsLoaded(Ok(posts)) => {
				// A wholesale replacement: loading twice renders once's result.
				self.posts = posts;
				self.posts_failed = false;
				Step::render(POSTS)
			}
			Msg::PostsLoaded(Err(ApiError::Unauthorized)) if self.filter().requires_auth() => {
				Step::effect(Effect::Redirect("/login".to_owned()))
			}
			Msg::PostsLoaded(Err(_)) => {
				self.posts_failed = true;
				self.posts.clear();
				Step::render(POSTS)
			}
			Msg::Select(filter) => {
				self.filter = Some(filter.clone());
				Step::render(CATEGORIES).and_effect(Effect::LoadPosts(filter))
			}
			Msg::Search(term) => {
				self.search = term;
				Step::render(POSTS)
			}
			// Confirm-then-render: nothing changes until the server answers.
			Msg::Vote(post_id, vote) => Step::effect(Effect::SubmitVote(post_id, vote)),
			Msg::VoteSettled(post_id, Ok(outcome)) => match self.posts.iter_mut().find(|post| post.id == post_id) {
				Some(post) => {
					post.likes = outcome.like_count;
					post.dislikes = outcome.dislike_count;
					post.user_vote = outcome.user_vote;
					Step::render(POSTS)
				}
				None => {
					warn!("Vote response for post {} no longer in the list.", post_id);
					Step::idle()
				}
			},
			Msg::VoteSettled(_, Err(ApiError::Unauthorized)) => Step::effect(Effect::LoginAlert),
			Msg::VoteSettled(_, Err(_)) => Step::effect(Effect::RetryAlert),
			Msg::Open(post_id) => Step::effect(Effect::Redirect(format!("/view-post?id={}", post_id))),
		}
	}

	fn view(&self, region: Region) -> Vec<Node<Msg>> {
		match region {
			CATEGORIES => self.view_categories(),
			POSTS => self.view_posts(),
			_ => Vec::new(),
		}
	}

	fn perform(effect: Effect, dispatch: &Dispatch<Self>) {
		match effect {
			Effect::LoadCategories => dispatch.spawn(async { Some(Msg::CategoriesLoaded(api::categories().await)) }),
			Effect::LoadPosts(filter) => {
				dispatch.spawn(async move { Some(Msg::PostsLoaded(api::posts(&filter).await)) });
			}
			Effect::SubmitVote(post_id, vote) => {
				dispatch.spawn(async move { Some(Msg::VoteSettled(post_id, api::vote_post(post_id, vote).await)) });
			}
			Effect::Redirect(url) => browser::redirect(&url),
			Effect::LoginAlert => browser::alert("Please login to vote on posts"),
			Effect::RetryAlert => browser::toast(Notice::Error, "Failed to vote. Please try again."),
		}
	}
}

impl Feed {
	fn view_categories(&self) -> Vec<Node<Msg>> {
		if self.categories_failed {
			return vec![el("div").class("text-muted p-3").text("Failed to load categories").into()];
		}

		let mut items = vec![el("button")
			.class_if(
				"list-group-item list-group-item-action category-item",
				"active",
				*self.filter() == PostFilter::All,
			)
			.on("click", Msg::Select(PostFilter::All))
			.child(el("i").class("bi bi-collection me-2"))
			.child(el("span").text("All Posts"))
			.into()];
		items.extend(self.categories.iter().map(|category| {
			let selected = *self.filter() == PostFilter::Category(category.name.clone());
			el("button")
				.class_if("list-group-item list-group-item-action category-item", "active", selected)
				.on("click", Msg::Select(PostFilter::Category(category.name.clone())))
				.child(el("i").class("bi bi-tag me-2"))
				.child(el("span").text(category.name.clone()))
				.into()
		}));
		items
	}

	fn view_posts(&self) -> Vec<Node<Msg>> {
		if self.posts_failed {
			return vec![el("div")
				.class("col-12 text-center py-5 text-muted")
				.text("Failed to load posts. Please try again.")
				.into()];
		}

		let visible = self.visible_posts();
		if visible.is_empty() {
			return vec![el("div")
				.class("col-12 text-center py-5")
				.child(
					el("div")
						.class("text-muted")
						.child(el("h4").text("No posts found"))
						.child(el("p").class("mb-3").text("Be the first to start a discussion!"))
						.child(el("a").attr("href", "/new-post").class("btn btn-outline-light").text("Create Post")),
				)
				.into()];
		}

		visible.into_iter().map(|post| self.view_post_card(post)).collect()
	}

	fn view_post_card(&self, post: &Post) -> Node<Msg> {
		let mut body = el("div")
			.class("card-body")
			.child(
				el("div")
					.class("d-flex justify-content-between align-items-start mb-3")
					.child(
						el("div")
							.class("flex-grow-1")
							.child(el("h5").class("card-title mb-1 text-white").text(post.title.clone()))
							.child(
								el("small")
									.class("text-light")
									.text(format!("by {} · {}", post.author, post.time_ago)),
							),
					),
			);

		if let Some(image) = post.display_image() {
			body = body.child(
				el("div").class("post-thumbnail-container").child(
					el("img")
						.class("post-thumbnail")
						.attr("src", image)
						.attr("alt", "Post thumbnail")
						.attr("loading", "lazy"),
				),
			);
		}

		body = body
			.child(el("p").class("card-text text-light mb-3").text(post.excerpt.clone()))
			.child(
				el("div").class("mb-3").children(
					post.tags
						.iter()
						.map(|tag| el("span").class("badge tag-badge me-1").text(format!("#{}", tag)).into()),
				),
			)
			.child(
				el("div")
					.class("post-actions border-top border-light border-opacity-25")
					.child(
						el("div")
							.class("post-voting")
							// Capturing handlers: a vote click must never reach
							// the card's navigation listener.
							.child(
								el("button")
									.class_if("vote-btn-sm like-btn", "active-like", post.user_vote == 1)
									.on_capture("click", Msg::Vote(post.id, Vote::Like))
									.child(el("i").class("bi bi-hand-thumbs-up")),
							)
							.child(el("span").class("vote-count like-count").text(post.likes.to_string()))
							.child(
								el("button")
									.class_if("vote-btn-sm dislike-btn", "active-dislike", post.user_vote == -1)
									.on_capture("click", Msg::Vote(post.id, Vote::Dislike))
									.child(el("i").class("bi bi-hand-thumbs-down")),
							)
							.child(el("span").class("vote-count dislike-count").text(post.dislikes.to_string())),
					)
					.child(
						el("div")
							.class("post-stats")
							.child(el("small").class("text-light").text(format!("{} comments", post.comments)))
							.child(el("small").class("text-light").text("See more")),
					),
			);

		el("div")
			.class("col-12")
			.child(
				el("div")
					.class("card shadow-sm mb-3 post-card")
					.on("click", Msg::Open(post.id))
					.child(body),
			)
			.into()
	}
}

/// Wires the page: mounts the regions, kicks off the initial loads and binds
/// the topbar filter tabs and the live search box the template ships.
pub fn boot() {
	let dispatch = Dispatch::mount(Feed::new(), None);
	Feed::perform(Effect::LoadCategories, &dispatch);
	Feed::perform(Effect::LoadPosts(PostFilter::All), &dispatch);
	bind_static_controls(&dispatch);
}

fn bind_static_controls(dispatch: &Dispatch<Feed>) {
	for (id, filter) in [
		("tab-questions", PostFilter::All),
		("tab-my-posts", PostFilter::MyPosts),
		("tab-my-likes", PostFilter::MyLikes),
	] {
		let dispatch = dispatch.clone();
		browser::listen(id, "click", move |event| {
			event.prevent_default();
			dispatch.send(Msg::Select(filter.clone()));
		});
	}

	let dispatch = dispatch.clone();
	browser::listen("filterInput", "input", move |_| {
		dispatch.send(Msg::Search(browser::input_value("filterInput")));
	});
}

#[cfg(test)]
mod tests {
	use super::*;

	fn post(id: u64, title: &str, likes: u32) -> Post {
		Post {
			id,
			title: title.to_owned(),
			author: "fern".to_owned(),
			excerpt: String::new(),
			content: String::new(),
			tags: Vec::new(),
			time_ago: "1h ago".to_owned(),
			likes,
			dislikes: 0,
			comments: 0,
			user_vote: 0,
			image_url: None,
			thumbnail_url: None,
			is_author: false,
		}
	}

	fn loaded(posts: Vec<Post>) -> Feed {
		let mut feed = Feed::new();
		feed.update(Msg::PostsLoaded(Ok(posts)));
		feed
	}

	#[test]
	fn vote_renders_the_response_exactly() {
		let mut feed = loaded(vec![post(1, "Repotting", 3)]);
		let outcome = VoteOutcome { success: true, like_count: 10, dislike_count: 2, user_vote: 1 };
		let step = feed.update(Msg::VoteSettled(1, Ok(outcome)));
		assert!(step.dirty.contains(POSTS));
		// Overwritten from the payload, not incremented from 3.
		assert_eq!(feed.posts[0].likes, 10);
		assert_eq!(feed.posts[0].dislikes, 2);
		assert_eq!(feed.posts[0].user_vote, 1);
	}

	#[test]
	fn clicking_vote_changes_nothing_before_the_response() {
		let mut feed = loaded(vec![post(1, "Repotting", 3)]);
		let step = feed.update(Msg::Vote(1, Vote::Like));
		assert_eq!(step.effects, vec![Effect::SubmitVote(1, Vote::Like)]);
		assert_eq!(feed.posts[0].likes, 3);
		assert_eq!(feed.posts[0].user_vote, 0);
	}

	#[test]
	fn unauthorized_vote_leaves_state_and_prompts_login() {
		let mut feed = loaded(vec![post(1, "Repotting", 3)]);
		let step = feed.update(Msg::VoteSettled(1, Err(ApiError::Unauthorized)));
		assert_eq!(step.effects, vec![Effect::LoginAlert]);
		assert_eq!(step.dirty, crate::runtime::Dirty::NONE);
		assert_eq!(feed.posts[0].likes, 3);
	}

	#[test]
	fn failed_vote_prompts_retry_without_state_change() {
		let mut feed = loaded(vec![post(1, "Repotting", 3)]);
		let step = feed.update(Msg::VoteSettled(1, Err(ApiError::Status(500))));
		assert_eq!(step.effects, vec![Effect::RetryAlert]);
		assert_eq!(feed.posts[0].likes, 3);
	}

	#[test]
	fn reloading_replaces_instead_of_appending() {
		let mut feed = loaded(vec![post(1, "Repotting", 3), post(2, "Aphids", 0)]);
		feed.update(Msg::PostsLoaded(Ok(vec![post(1, "Repotting", 3), post(2, "Aphids", 0)])));
		assert_eq!(feed.posts.len(), 2);
	}

	#[test]
	fn empty_feed_renders_the_empty_state() {
		let feed = loaded(Vec::new());
		let rendered = feed.view(POSTS);
		assert_eq!(rendered.len(), 1);
		assert!(rendered[0].text_content().contains("No posts found"));
	}

	#[test]
	fn search_narrows_the_rendered_list() {
		let mut cactus = post(2, "Cactus soil", 0);
		cactus.author = "moss".to_owned();
		let mut feed = loaded(vec![post(1, "Fern care", 0), cactus]);
		feed.update(Msg::Search("cactus".to_owned()));
		assert_eq!(feed.visible_posts().len(), 1);
		// The author field matches too.
		feed.update(Msg::Search("moss".to_owned()));
		assert_eq!(feed.visible_posts()[0].id, 2);
		feed.update(Msg::Search(String::new()));
		assert_eq!(feed.visible_posts().len(), 2);
	}

	#[test]
	fn auth_filter_redirects_to_login_on_401() {
		let mut feed = Feed::new();
		feed.update(Msg::Select(PostFilter::MyPosts));
		let step = feed.update(Msg::PostsLoaded(Err(ApiError::Unauthorized)));
		assert_eq!(step.effects, vec![Effect::Redirect("/login".to_owned())]);
	}
}
