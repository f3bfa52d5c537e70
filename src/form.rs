//! Client-side form validation.
//!
//! Fields move `Empty → Invalid → Valid` as the user types; a form submits
//! only when every field is `Valid`, otherwise submission is cancelled and an
//! inline indicator shown. All checks are pure functions over the current
//! input values, so revalidating on every keystroke is just recomputation.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
	Empty,
	Invalid,
	Valid,
}

impl Validity {
	#[must_use]
	pub fn is_valid(self) -> bool {
		self == Validity::Valid
	}
}

/// Non-empty after trimming.
#[must_use]
pub fn required(value: &str) -> Validity {
	if value.trim().is_empty() {
		Validity::Empty
	} else {
		Validity::Valid
	}
}

/// Registration password rule: at least 8 characters with a lowercase letter,
/// an uppercase letter, a digit and a symbol.
#[must_use]
pub fn password_strength(value: &str) -> Validity {
	if value.is_empty() {
		return Validity::Empty;
	}
	let long_enough = value.chars().count() >= 8;
	let lower = value.chars().any(char::is_lowercase);
	let upper = value.chars().any(char::is_uppercase);
	let digit = value.chars().any(|c| c.is_ascii_digit());
	let symbol = value.chars().any(|c| !c.is_alphanumeric());
	if long_enough && lower && upper && digit && symbol {
		Validity::Valid
	} else {
		Validity::Invalid
	}
}

/// Loose email shape check; the server does the real validation.
#[must_use]
pub fn email(value: &str) -> Validity {
	if value.trim().is_empty() {
		return Validity::Empty;
	}
	let mut parts = value.splitn(2, '@');
	let local = parts.next().unwrap_or_default();
	match parts.next() {
		Some(domain) if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') => Validity::Valid,
		_ => Validity::Invalid,
	}
}

/// Confirmation field: must match the primary password. Recomputed on every
/// keystroke of either field.
#[must_use]
pub fn confirmation(password: &str, confirm: &str) -> Validity {
	if confirm.is_empty() {
		Validity::Empty
	} else if confirm == password {
		Validity::Valid
	} else {
		Validity::Invalid
	}
}

/// The selected-category set of the post composer and editor: membership only,
/// no duplicates, insertion order kept for stable display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPicker {
	selected: Vec<String>,
}

impl CategoryPicker {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn preselected(names: impl IntoIterator<Item = String>) -> Self {
		let mut picker = Self::new();
		for name in names {
			if !picker.contains(&name) {
				picker.selected.push(name);
			}
		}
		picker
	}

	pub fn toggle(&mut self, name: &str) {
		match self.selected.iter().position(|selected| selected == name) {
			Some(index) => {
				self.selected.remove(index);
			}
			None => self.selected.push(name.to_owned()),
		}
	}

	pub fn remove(&mut self, name: &str) {
		self.selected.retain(|selected| selected != name);
	}

	#[must_use]
	pub fn contains(&self, name: &str) -> bool {
		self.selected.iter().any(|selected| selected == name)
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.selected.is_empty()
	}

	#[must_use]
	pub fn names(&self) -> &[String] {
		&self.selected
	}

	pub fn clear(&mut self) {
		self.selected.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn password_rule_cases() {
		assert_eq!(password_strength(""), Validity::Empty);
		assert_eq!(password_strength("Short1!"), Validity::Invalid);
		assert_eq!(password_strength("alllower1!"), Validity::Invalid);
		assert_eq!(password_strength("NoSymbol11"), Validity::Invalid);
		assert_eq!(password_strength("Gr33nThumb!"), Validity::Valid);
	}

	#[test]
	fn email_shape() {
		assert_eq!(email(""), Validity::Empty);
		assert_eq!(email("fern"), Validity::Invalid);
		assert_eq!(email("fern@"), Validity::Invalid);
		assert_eq!(email("@plants.example"), Validity::Invalid);
		assert_eq!(email("fern@plants.example"), Validity::Valid);
	}

	#[test]
	fn confirmation_tracks_both_fields() {
		assert_eq!(confirmation("Gr33nThumb!", ""), Validity::Empty);
		assert_eq!(confirmation("Gr33nThumb!", "Gr33nThum"), Validity::Invalid);
		assert_eq!(confirmation("Gr33nThumb!", "Gr33nThumb!"), Validity::Valid);
		// Editing the primary field must re-invalidate an existing match.
		assert_eq!(confirmation("Gr33nThumb!x", "Gr33nThumb!"), Validity::Invalid);
	}

	#[test]
	fn toggle_twice_is_identity() {
		let mut picker = CategoryPicker::preselected(vec!["succulents".to_owned()]);
		let before = picker.clone();
		picker.toggle("ferns");
		picker.toggle("ferns");
		assert_eq!(picker, before);
	}

	#[test]
	fn preselect_deduplicates() {
		let picker = CategoryPicker::preselected(vec!["ferns".to_owned(), "ferns".to_owned()]);
		assert_eq!(picker.names(), ["ferns".to_owned()]);
	}

	#[test]
	fn remove_and_membership() {
		let mut picker = CategoryPicker::new();
		picker.toggle("cacti");
		picker.toggle("herbs");
		assert!(picker.contains("cacti"));
		picker.remove("cacti");
		assert!(!picker.contains("cacti"));
		assert_eq!(picker.names(), ["herbs".to_owned()]);
	}
}
