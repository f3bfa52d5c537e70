//! Owned DOM trees produced by view functions.
//!
//! Unlike the live document, these trees are plain data: they can be built,
//! compared and inspected without a browser, which keeps view output
//! assertable in ordinary unit tests. Event listeners carry the page's typed
//! message instead of a closure; [`crate::dom::Renderer`] translates them into
//! real listeners when the tree is written to the document.

/// One rendered node: an element or a text node. Text is always written via
/// [***createTextNode***](https://developer.mozilla.org/en-US/docs/Web/API/Document/createTextNode),
/// so user-provided content cannot smuggle markup into the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<M> {
	Element(Element<M>),
	Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element<M> {
	pub name: &'static str,
	pub attributes: Vec<Attribute>,
	pub listeners: Vec<Listener<M>>,
	pub children: Vec<Node<M>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
	pub name: &'static str,
	pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Listener<M> {
	pub event: &'static str,
	pub handler: Handler<M>,
}

/// What firing a listener means for the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Handler<M> {
	/// Dispatch the message as-is.
	Msg(M),
	/// Dispatch after `preventDefault` and `stopPropagation`, so an ancestor's
	/// navigation handler never observes the event (vote buttons inside
	/// clickable cards).
	MsgCapture(M),
	/// Dispatch with the target control's current value.
	Input(fn(String) -> M),
	/// Dispatch after `preventDefault`; used on `submit` so form gating stays
	/// in the reducer.
	Submit(M),
}

#[must_use]
pub fn el<M>(name: &'static str) -> Element<M> {
	Element {
		name,
		attributes: Vec::new(),
		listeners: Vec::new(),
		children: Vec::new(),
	}
}

#[must_use]
pub fn text<M>(content: impl Into<String>) -> Node<M> {
	Node::Text(content.into())
}

impl<M> Element<M> {
	#[must_use]
	pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
		self.attributes.push(Attribute { name, value: value.into() });
		self
	}

	#[must_use]
	pub fn class(self, value: impl Into<String>) -> Self {
		self.attr("class", value)
	}

	/// Adds `class` when `condition` holds, otherwise `base` alone.
	#[must_use]
	pub fn class_if(self, base: &str, class: &str, condition: bool) -> Self {
		if condition {
			self.class(format!("{} {}", base, class))
		} else {
			self.class(base.to_owned())
		}
	}

	#[must_use]
	pub fn on(mut self, event: &'static str, message: M) -> Self {
		self.listeners.push(Listener { event, handler: Handler::Msg(message) });
		self
	}

	#[must_use]
	pub fn on_capture(mut self, event: &'static str, message: M) -> Self {
		self.listeners.push(Listener { event, handler: Handler::MsgCapture(message) });
		self
	}

	#[must_use]
	pub fn on_input(mut self, make: fn(String) -> M) -> Self {
		self.listeners.push(Listener { event: "input", handler: Handler::Input(make) });
		self
	}

	#[must_use]
	pub fn on_submit(mut self, message: M) -> Self {
		self.listeners.push(Listener { event: "submit", handler: Handler::Submit(message) });
		self
	}

	#[must_use]
	pub fn child(mut self, child: impl Into<Node<M>>) -> Self {
		self.children.push(child.into());
		self
	}

	#[must_use]
	pub fn children(mut self, children: impl IntoIterator<Item = Node<M>>) -> Self {
		self.children.extend(children);
		self
	}

	#[must_use]
	pub fn text(self, content: impl Into<String>) -> Self {
		self.child(Node::Text(content.into()))
	}
}

impl<M> From<Element<M>> for Node<M> {
	fn from(element: Element<M>) -> Self {
		Node::Element(element)
	}
}

impl<M> Node<M> {
	/// Concatenated text content, for assertions on rendered trees.
	#[must_use]
	pub fn text_content(&self) -> String {
		match self {
			Node::Text(text) => text.clone(),
			Node::Element(element) => element.children.iter().map(Node::text_content).collect(),
		}
	}

	/// Whether any node in the tree satisfies `predicate`.
	pub fn any(&self, predicate: &mut impl FnMut(&Node<M>) -> bool) -> bool {
		if predicate(self) {
			return true;
		}
		match self {
			Node::Text(_) => false,
			Node::Element(element) => element.children.iter().any(|child| child.any(predicate)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn builder_produces_expected_tree() {
		let node: Node<u8> = el("button").class("vote-btn").on("click", 7).text("Like").into();
		match &node {
			Node::Element(element) => {
				assert_eq!(element.name, "button");
				assert_eq!(element.attributes, vec![Attribute { name: "class", value: "vote-btn".to_owned() }]);
				assert_eq!(element.listeners.len(), 1);
				assert_eq!(element.children, vec![Node::Text("Like".to_owned())]);
			}
			Node::Text(_) => panic!("expected an element"),
		}
		assert_eq!(node.text_content(), "Like");
	}

	#[test]
	fn class_if_appends_conditionally() {
		let active: Node<u8> = el("b").class_if("like-btn", "active-like", true).into();
		let inactive: Node<u8> = el("b").class_if("like-btn", "active-like", false).into();
		assert!(active.any(&mut |n| matches!(n, Node::Element(e) if e.attributes[0].value == "like-btn active-like")));
		assert!(inactive.any(&mut |n| matches!(n, Node::Element(e) if e.attributes[0].value == "like-btn")));
	}
}
