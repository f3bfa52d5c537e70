//! Login, registration and password-reset wiring.
//!
//! These forms are server-rendered and submit natively; the client only
//! validates. Invalid submissions are cancelled and the offending inputs get
//! the `is-invalid` marker. The password rules live in [`crate::form`] as
//! pure functions, so the gate itself is testable without a document; this
//! module is the DOM glue around them.

use crate::browser;
use crate::form::{self, Validity};
use tracing::warn;
use wasm_bindgen::JsCast;

/// The registration form's current input, read from the document on every
/// relevant event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registration {
	pub username: String,
	pub email: String,
	pub password: String,
	pub confirm: String,
}

impl Registration {
	/// Field ids paired with their validity, in document order.
	#[must_use]
	pub fn checks(&self) -> [(&'static str, Validity); 4] {
		[
			("registerUsername", form::required(&self.username)),
			("registerEmail", form::email(&self.email)),
			("registerPassword", form::password_strength(&self.password)),
			("confirmPassword", form::confirmation(&self.password, &self.confirm)),
		]
	}

	#[must_use]
	pub fn is_valid(&self) -> bool {
		self.checks().iter().all(|(_, validity)| validity.is_valid())
	}
}

/// The password-reset form: same strength and confirmation rules as
/// registration, applied to the new password.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordReset {
	pub password: String,
	pub confirm: String,
}

impl PasswordReset {
	#[must_use]
	pub fn checks(&self) -> [(&'static str, Validity); 2] {
		[
			("newPassword", form::password_strength(&self.password)),
			("confirmNewPassword", form::confirmation(&self.password, &self.confirm)),
		]
	}

	#[must_use]
	pub fn is_valid(&self) -> bool {
		self.checks().iter().all(|(_, validity)| validity.is_valid())
	}
}

fn read_registration() -> Registration {
	Registration {
		username: browser::input_value("registerUsername"),
		email: browser::input_value("registerEmail"),
		password: browser::input_value("registerPassword"),
		confirm: browser::input_value("confirmPassword"),
	}
}

fn read_reset() -> PasswordReset {
	PasswordReset {
		password: browser::input_value("newPassword"),
		confirm: browser::input_value("confirmNewPassword"),
	}
}

/// Applies the `is-invalid` marker. On live input only a definite mismatch is
/// marked; `on_submit` also flags fields left empty.
fn mark(element_id: &str, validity: Validity, on_submit: bool) {
	let invalid = match validity {
		Validity::Invalid => true,
		Validity::Empty => on_submit,
		Validity::Valid => false,
	};
	if let Some(element) = browser::document().get_element_by_id(element_id) {
		if let Err(error) = element.class_list().toggle_with_force("is-invalid", invalid) {
			warn!("Failed to mark #{}: {:?}", element_id, error);
		}
	}
}

/// Flips a password input between `password` and `text`.
fn bind_visibility_toggle(button_id: &'static str, input_id: &'static str) {
	browser::listen(button_id, "click", move |event| {
		event.prevent_default();
		let input = browser::document()
			.get_element_by_id(input_id)
			.and_then(|element| element.dyn_into::<web_sys::HtmlInputElement>().ok());
		match input {
			Some(input) => {
				let hidden = input.type_() == "password";
				input.set_type(if hidden { "text" } else { "password" });
			}
			None => warn!("Password input #{} not found.", input_id),
		}
	});
}

pub fn boot_login() {
	browser::listen("loginForm", "submit", |event| {
		let email = browser::input_value("loginEmail");
		let password = browser::input_value("loginPassword");
		mark("loginEmail", form::required(&email), true);
		mark("loginPassword", form::required(&password), true);
		if !(form::required(&email).is_valid() && form::required(&password).is_valid()) {
			event.prevent_default();
		}
	});
	bind_visibility_toggle("toggleLoginPassword", "loginPassword");
}

pub fn boot_register() {
	// Either password field edits re-check both: changing the primary must
	// re-invalidate an already-matching confirmation.
	for input_id in ["registerPassword", "confirmPassword"] {
		browser::listen(input_id, "input", |_| {
			let registration = read_registration();
			for (element_id, validity) in registration.checks().iter().skip(2) {
				mark(element_id, *validity, false);
			}
		});
	}
	browser::listen("registerForm", "submit", |event| {
		let registration = read_registration();
		for (element_id, validity) in registration.checks() {
			mark(element_id, validity, true);
		}
		if !registration.is_valid() {
			event.prevent_default();
		}
	});
	bind_visibility_toggle("toggleRegisterPassword", "registerPassword");
	bind_visibility_toggle("toggleConfirmPassword", "confirmPassword");
}

pub fn boot_reset() {
	for input_id in ["newPassword", "confirmNewPassword"] {
		browser::listen(input_id, "input", |_| {
			let reset = read_reset();
			for (element_id, validity) in reset.checks() {
				mark(element_id, validity, false);
			}
		});
	}
	browser::listen("resetPasswordForm", "submit", |event| {
		let reset = read_reset();
		for (element_id, validity) in reset.checks() {
			mark(element_id, validity, true);
		}
		if !reset.is_valid() {
			event.prevent_default();
		}
	});
	bind_visibility_toggle("toggleNewPassword", "newPassword");
}
