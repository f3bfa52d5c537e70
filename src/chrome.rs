//! The shared page chrome: header, footer and the header notification dot.
//!
//! Every page carries `#shared-header` and `#shared-footer` placeholders; the
//! header variant depends on whether the viewer is signed in, so it can only
//! be chosen after the auth check. A failed check or a missing signed
//! template falls back to the signed-out header so the page always has
//! navigation.

use crate::{api, browser};
use tracing::warn;
use wasm_bindgen_futures::spawn_local;

const HEADER_SIGNED: &str = "/frontend/templates/shared/header-signed.html";
const HEADER: &str = "/frontend/templates/shared/header.html";
const FOOTER: &str = "/frontend/templates/shared/footer.html";

async fn inject_header(signed_in: bool) {
	let fragment = if signed_in {
		match api::fragment(HEADER_SIGNED).await {
			Ok(fragment) => Ok(fragment),
			Err(error) => {
				warn!("Signed header unavailable ({}); falling back.", error);
				api::fragment(HEADER).await
			}
		}
	} else {
		api::fragment(HEADER).await
	};
	match fragment {
		Ok(fragment) => browser::set_fragment("shared-header", &fragment),
		Err(error) => warn!("Failed to load the shared header: {}", error),
	}
}

async fn sync_notification_dot() {
	match api::notification_count().await {
		Ok(count) => browser::set_visible("notification-dot", count > 0),
		Err(error) => warn!("Failed to read the notification count: {}", error),
	}
}

/// Loads the chrome for the current page. Independent of any page runtime;
/// fires once at start-up.
pub fn boot() {
	spawn_local(async {
		let signed_in = match api::auth_status().await {
			Ok(status) => status.logged_in,
			Err(error) => {
				warn!("Auth check failed ({}); rendering the signed-out header.", error);
				false
			}
		};
		inject_header(signed_in).await;
		if signed_in {
			sync_notification_dot().await;
		}
	});
	spawn_local(async {
		match api::fragment(FOOTER).await {
			Ok(fragment) => browser::set_fragment("shared-footer", &fragment),
			Err(error) => warn!("Failed to load the shared footer: {}", error),
		}
	});
}
