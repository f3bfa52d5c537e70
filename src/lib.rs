//! Browser-side client for the Plant Talk forum.
//!
//! The server renders page shells and owns all data; this crate fills the
//! dynamic regions. Each page is a view model with a pure reducer
//! ([`runtime::Page`]): user actions and network results arrive as typed
//! messages, state transitions are ordinary testable functions, and the DOM
//! is only touched by [`dom::Renderer`] and the effect handlers.

#![warn(clippy::pedantic)]

pub mod api;
pub mod browser;
pub mod chrome;
pub mod dom;
pub mod form;
pub mod model;
pub mod pages;
pub mod runtime;
pub mod vdom;

use wasm_bindgen::prelude::wasm_bindgen;

/// Entry point; the server routes by path, so the path picks the page
/// controller. Pages without client-side behavior get chrome only.
#[wasm_bindgen(start)]
pub fn start() {
	tracing_wasm::set_as_global_default();

	chrome::boot();

	match browser::current_path().as_str() {
		"/" | "/index.html" => pages::feed::boot(),
		"/view-post" => pages::post::boot(),
		"/notifications" => pages::notifications::boot(),
		"/new-post" => pages::new_post::boot(),
		"/login" => pages::auth::boot_login(),
		"/register" => pages::auth::boot_register(),
		"/reset-password" => pages::auth::boot_reset(),
		"/profile" => pages::profile::boot(),
		other => tracing::debug!("No page controller for {:?}.", other),
	}
}
