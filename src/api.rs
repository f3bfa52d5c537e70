//! Typed access to the Plant Talk REST backend.
//!
//! Every endpoint function performs one [***fetch***](https://developer.mozilla.org/en-US/docs/Web/API/fetch)
//! round trip and decodes the JSON body into a [`crate::model`] type, so the
//! rendering layer never touches loosely-typed response data. Failures map
//! onto [`ApiError`], which distinguishes the cases the UI reacts to
//! differently: transport trouble, `401`, non-`401` HTTP errors,
//! application-level rejection (`success: false`) and malformed payloads.

use crate::model::{
	Ack, AuthStatus, Category, Comment, NotificationFeed, Post, Profile, UploadOutcome, Vote, VoteOutcome,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::trace;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Request, RequestInit, Response};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
	#[error("network request failed: {0}")]
	Transport(String),
	#[error("not signed in")]
	Unauthorized,
	#[error("server responded with status {0}")]
	Status(u16),
	#[error("server rejected the request")]
	Rejected,
	#[error("malformed server response: {0}")]
	Decode(String),
}

impl ApiError {
	fn from_js(value: JsValue) -> Self {
		ApiError::Transport(format!("{:?}", value))
	}
}

/// The list filters the feed page can request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
	All,
	MyPosts,
	MyLikes,
	Category(String),
}

impl PostFilter {
	fn url(&self) -> String {
		match self {
			PostFilter::All => "/api/posts".to_owned(),
			PostFilter::MyPosts => "/api/posts/filtered?filter=my-posts".to_owned(),
			PostFilter::MyLikes => "/api/posts/filtered?filter=my-likes".to_owned(),
			PostFilter::Category(name) => format!("/api/posts?filter=categories&value={}", encode(name)),
		}
	}

	/// Filters that only make sense with a session; `401` on these redirects
	/// to the login page instead of surfacing an alert.
	#[must_use]
	pub fn requires_auth(&self) -> bool {
		matches!(self, PostFilter::MyPosts | PostFilter::MyLikes)
	}
}

fn encode(value: &str) -> String {
	String::from(js_sys::encode_uri_component(value))
}

fn form_body(pairs: &[(&str, &str)]) -> String {
	let mut body = String::new();
	for (name, value) in pairs {
		if !body.is_empty() {
			body.push('&');
		}
		body.push_str(name);
		body.push('=');
		body.push_str(&encode(value));
	}
	body
}

async fn send(request: &Request) -> Result<Response, ApiError> {
	let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".to_owned()))?;
	let response = JsFuture::from(window.fetch_with_request(request))
		.await
		.map_err(ApiError::from_js)?;
	response.dyn_into::<Response>().map_err(ApiError::from_js)
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
	match response.status() {
		401 => return Err(ApiError::Unauthorized),
		status if !response.ok() => return Err(ApiError::Status(status)),
		_ => (),
	}
	let text = JsFuture::from(response.text().map_err(ApiError::from_js)?)
		.await
		.map_err(ApiError::from_js)?;
	let text = text.as_string().unwrap_or_default();
	serde_json::from_str(&text).map_err(|error| ApiError::Decode(error.to_string()))
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, ApiError> {
	trace!("GET {}", url);
	let request = Request::new_with_str(url).map_err(ApiError::from_js)?;
	decode_json(send(&request).await?).await
}

async fn post_form<T: DeserializeOwned>(url: &str, pairs: &[(&str, &str)]) -> Result<T, ApiError> {
	trace!("POST {}", url);
	let mut init = RequestInit::new();
	init.method("POST").body(Some(&JsValue::from_str(&form_body(pairs))));
	let request = Request::new_with_str_and_init(url, &init).map_err(ApiError::from_js)?;
	request
		.headers()
		.set("Content-Type", "application/x-www-form-urlencoded")
		.map_err(ApiError::from_js)?;
	decode_json(send(&request).await?).await
}

async fn post_multipart<T: DeserializeOwned>(url: &str, form: &FormData) -> Result<T, ApiError> {
	trace!("POST {} (multipart)", url);
	let mut init = RequestInit::new();
	init.method("POST").body(Some(form.as_ref()));
	let request = Request::new_with_str_and_init(url, &init).map_err(ApiError::from_js)?;
	decode_json(send(&request).await?).await
}

/// Fetches a server-provided HTML fragment (the shared header and footer
/// templates) as text.
pub async fn fragment(url: &str) -> Result<String, ApiError> {
	trace!("GET {} (fragment)", url);
	let request = Request::new_with_str(url).map_err(ApiError::from_js)?;
	let response = send(&request).await?;
	if !response.ok() {
		return Err(ApiError::Status(response.status()));
	}
	let text = JsFuture::from(response.text().map_err(ApiError::from_js)?)
		.await
		.map_err(ApiError::from_js)?;
	Ok(text.as_string().unwrap_or_default())
}

fn checked(ack: Ack) -> Result<(), ApiError> {
	if ack.success {
		Ok(())
	} else {
		Err(ApiError::Rejected)
	}
}

pub async fn auth_status() -> Result<AuthStatus, ApiError> {
	get_json("/api/auth/status").await
}

pub async fn categories() -> Result<Vec<Category>, ApiError> {
	get_json("/api/categories").await
}

pub async fn posts(filter: &PostFilter) -> Result<Vec<Post>, ApiError> {
	get_json(&filter.url()).await
}

pub async fn post(id: u64) -> Result<Post, ApiError> {
	get_json(&format!("/api/post?id={}", id)).await
}

pub async fn comments(post_id: u64) -> Result<Vec<Comment>, ApiError> {
	get_json(&format!("/api/comments?post_id={}", post_id)).await
}

/// Casts or replaces the viewer's post vote. Whether voting the same direction
/// twice clears the vote is the server's decision; callers re-render from the
/// returned counts rather than inferring the new state.
pub async fn vote_post(post_id: u64, vote: Vote) -> Result<VoteOutcome, ApiError> {
	let outcome: VoteOutcome = post_form(
		"/api/posts/like",
		&[("post_id", &post_id.to_string()), ("vote", &vote.wire_value().to_string())],
	)
	.await?;
	if outcome.success {
		Ok(outcome)
	} else {
		Err(ApiError::Rejected)
	}
}

pub async fn vote_comment(comment_id: u64, vote: Vote) -> Result<VoteOutcome, ApiError> {
	let outcome: VoteOutcome = post_form(
		"/api/comments/like",
		&[("comment_id", &comment_id.to_string()), ("vote", &vote.wire_value().to_string())],
	)
	.await?;
	if outcome.success {
		Ok(outcome)
	} else {
		Err(ApiError::Rejected)
	}
}

pub async fn create_comment(post_id: u64, content: &str) -> Result<(), ApiError> {
	checked(post_form("/api/comments/create", &[("post_id", &post_id.to_string()), ("content", content)]).await?)
}

pub async fn edit_comment(comment_id: u64, content: &str) -> Result<(), ApiError> {
	checked(post_form("/api/comments/edit", &[("comment_id", &comment_id.to_string()), ("content", content)]).await?)
}

pub async fn delete_comment(comment_id: u64) -> Result<(), ApiError> {
	checked(post_form("/api/comments/delete", &[("comment_id", &comment_id.to_string())]).await?)
}

pub async fn edit_post(post_id: u64, title: &str, content: &str, categories: &[String]) -> Result<(), ApiError> {
	let form = FormData::new().map_err(ApiError::from_js)?;
	form.append_with_str("post_id", &post_id.to_string()).map_err(ApiError::from_js)?;
	form.append_with_str("title", title).map_err(ApiError::from_js)?;
	form.append_with_str("content", content).map_err(ApiError::from_js)?;
	for category in categories {
		form.append_with_str("categories[]", category).map_err(ApiError::from_js)?;
	}
	checked(post_multipart("/api/posts/edit", &form).await?)
}

pub async fn delete_post(post_id: u64) -> Result<(), ApiError> {
	checked(post_form("/api/posts/delete", &[("post_id", &post_id.to_string())]).await?)
}

/// Publishes a new post; the caller redirects home on success.
pub async fn submit_post(
	title: &str,
	content: &str,
	categories: &[String],
	image_id: Option<&str>,
) -> Result<(), ApiError> {
	let form = FormData::new().map_err(ApiError::from_js)?;
	form.append_with_str("title", title).map_err(ApiError::from_js)?;
	form.append_with_str("content", content).map_err(ApiError::from_js)?;
	for category in categories {
		form.append_with_str("categories[]", category).map_err(ApiError::from_js)?;
	}
	if let Some(image_id) = image_id {
		form.append_with_str("image_id", image_id).map_err(ApiError::from_js)?;
	}
	checked(post_multipart("/new-post", &form).await?)
}

pub async fn notifications() -> Result<NotificationFeed, ApiError> {
	get_json("/api/notifications").await
}

#[derive(Debug, Deserialize)]
struct CountPayload {
	#[serde(default)]
	count: u32,
}

pub async fn notification_count() -> Result<u32, ApiError> {
	let payload: CountPayload = get_json("/api/notifications/count").await?;
	Ok(payload.count)
}

pub async fn mark_read(notification_id: u64) -> Result<(), ApiError> {
	checked(
		post_form(
			"/api/notifications/mark-read",
			&[("notification_id", &notification_id.to_string())],
		)
		.await?,
	)
}

pub async fn mark_all_read() -> Result<(), ApiError> {
	checked(post_form("/api/notifications/mark-all-read", &[]).await?)
}

pub async fn profile() -> Result<Profile, ApiError> {
	get_json("/api/user/profile").await
}

/// Response of profile mutations (`POST /profile`); carries the new display
/// name when one was set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileAck {
	#[serde(default)]
	pub success: bool,
	#[serde(default)]
	pub username: Option<String>,
}

pub async fn update_profile(pairs: &[(&str, &str)]) -> Result<ProfileAck, ApiError> {
	let ack: ProfileAck = post_form("/profile", pairs).await?;
	if ack.success {
		Ok(ack)
	} else {
		Err(ApiError::Rejected)
	}
}

pub async fn user_posts(section: &str) -> Result<Vec<Post>, ApiError> {
	get_json(&format!("/api/user/{}", section)).await
}

pub async fn user_comments() -> Result<Vec<Comment>, ApiError> {
	get_json("/api/user/comments").await
}

pub async fn upload_image(file: &web_sys::File, image_type: Option<&str>) -> Result<UploadOutcome, ApiError> {
	let form = FormData::new().map_err(ApiError::from_js)?;
	form.append_with_blob("image", file).map_err(ApiError::from_js)?;
	if let Some(image_type) = image_type {
		form.append_with_str("image_type", image_type).map_err(ApiError::from_js)?;
	}
	let outcome: UploadOutcome = post_multipart("/api/upload-image", &form).await?;
	if outcome.success {
		Ok(outcome)
	} else {
		Err(ApiError::Rejected)
	}
}

pub async fn delete_image(filename: &str) -> Result<(), ApiError> {
	checked(post_form("/api/delete-image", &[("filename", filename)]).await?)
}
