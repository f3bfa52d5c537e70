//! Small browser shims: navigation, URL queries, titles and transient
//! notices. Everything here degrades to a log entry instead of panicking when
//! the document is not shaped as expected.

use tracing::{error, warn};
use wasm_bindgen::{closure::Closure, JsCast, UnwrapThrowExt};
use web_sys::UrlSearchParams;

pub fn window() -> web_sys::Window {
	web_sys::window().expect_throw("no window")
}

pub fn document() -> web_sys::Document {
	window().document().expect_throw("no document")
}

pub fn redirect(url: &str) {
	if let Err(error) = window().location().set_href(url) {
		error!("Failed to navigate to {:?}: {:?}", url, error);
	}
}

pub fn current_path() -> String {
	window().location().pathname().unwrap_or_default()
}

/// Reads one query parameter of the current page URL.
#[must_use]
pub fn query_param(name: &str) -> Option<String> {
	let search = window().location().search().ok()?;
	let params = UrlSearchParams::new_with_str(&search).ok()?;
	params.get(name)
}

pub fn set_title(title: &str) {
	document().set_title(title);
}

/// Replaces the text content of the element with the given id.
pub fn set_text(element_id: &str, text: &str) {
	match document().get_element_by_id(element_id) {
		Some(element) => element.set_text_content(Some(text)),
		None => warn!("Element #{} not found; cannot set text.", element_id),
	}
}

/// Shows or hides an element by toggling the `d-none` utility class.
pub fn set_visible(element_id: &str, visible: bool) {
	match document().get_element_by_id(element_id) {
		Some(element) => {
			if let Err(error) = element.class_list().toggle_with_force("d-none", !visible) {
				error!("Failed to toggle visibility of #{}: {:?}", element_id, error);
			}
		}
		None => warn!("Element #{} not found; cannot toggle visibility.", element_id),
	}
}

/// Injects a trusted, server-provided HTML fragment (header/footer
/// templates). Never used for user-authored content.
pub fn set_fragment(element_id: &str, html: &str) {
	match document().get_element_by_id(element_id) {
		Some(element) => element.set_inner_html(html),
		None => warn!("Element #{} not found; cannot inject fragment.", element_id),
	}
}

/// Blocking prompt, used for the login nudge on unauthenticated votes.
pub fn alert(message: &str) {
	if let Err(error) = window().alert_with_message(message) {
		error!("Failed to show alert: {:?}", error);
	}
}

/// Binds a listener to a server-rendered element. The closure is forgotten;
/// static controls live until navigation discards the Wasm instance anyway.
pub fn listen(element_id: &str, event: &str, callback: impl Fn(web_sys::Event) + 'static) {
	let target = match document().get_element_by_id(element_id) {
		Some(element) => element,
		None => return warn!("Element #{} not found; cannot bind {:?}.", element_id, event),
	};
	let callback = Closure::wrap(Box::new(callback) as Box<dyn Fn(web_sys::Event)>);
	if let Err(error) = target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
		error!("Failed to bind {:?} on #{}: {:?}", event, element_id, error);
	}
	callback.forget();
}

/// Current value of a static `<input>` or `<textarea>`.
#[must_use]
pub fn input_value(element_id: &str) -> String {
	let element = match document().get_element_by_id(element_id) {
		Some(element) => element,
		None => {
			warn!("Element #{} not found; reading empty value.", element_id);
			return String::new();
		}
	};
	if let Some(input) = element.dyn_ref::<web_sys::HtmlInputElement>() {
		input.value()
	} else if let Some(area) = element.dyn_ref::<web_sys::HtmlTextAreaElement>() {
		area.value()
	} else {
		warn!("Element #{} is not a form control.", element_id);
		String::new()
	}
}

/// First file selected in a static file input, if any.
#[must_use]
pub fn selected_file(element_id: &str) -> Option<web_sys::File> {
	document()
		.get_element_by_id(element_id)?
		.dyn_ref::<web_sys::HtmlInputElement>()?
		.files()?
		.get(0)
}

/// Clears a static file input so the same file can be re-selected.
pub fn reset_file_input(element_id: &str) {
	if let Some(input) = document()
		.get_element_by_id(element_id)
		.and_then(|element| element.dyn_into::<web_sys::HtmlInputElement>().ok())
	{
		input.set_value("");
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
	Success,
	Error,
}

/// Shows a transient toast in the page corner, auto-dismissed after a few
/// seconds.
pub fn toast(kind: Notice, message: &str) {
	let document = document();
	let body = match document.body() {
		Some(body) => body,
		None => return error!("No body; cannot show notice."),
	};
	let alert = match document.create_element("div") {
		Ok(alert) => alert,
		Err(error) => return error!("Failed to create notice element: {:?}", error),
	};
	let color = match kind {
		Notice::Success => "alert-success",
		Notice::Error => "alert-danger",
	};
	if let Err(error) = alert.set_attribute("class", &format!("alert {} alert-dismissible fade show position-fixed", color)) {
		error!("Failed to style notice: {:?}", error);
	}
	if let Err(error) = alert.set_attribute("style", "top: 80px; right: 20px; z-index: 9999; max-width: 400px;") {
		error!("Failed to style notice: {:?}", error);
	}
	alert.set_text_content(Some(message));
	if let Err(error) = body.append_child(&alert) {
		return error!("Failed to attach notice: {:?}", error);
	}

	let expire = Closure::once_into_js(move || alert.remove());
	if let Err(error) =
		window().set_timeout_with_callback_and_timeout_and_arguments_0(expire.unchecked_ref(), 3000)
	{
		error!("Failed to schedule notice dismissal: {:?}", error);
	}
}
