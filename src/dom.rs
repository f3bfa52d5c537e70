//! Writes [`crate::vdom`] trees into the live document.
//!
//! A [`Renderer`] owns one stable region (an element the server-rendered page
//! provides) and replaces that region's
//! [***childNodes***](https://developer.mozilla.org/en-US/docs/Web/API/Node/childNodes)
//! wholesale on every render. Replacing rather than patching keeps loads
//! idempotent: rendering the same state twice leaves the region identical,
//! never appended-to.
//!
//! Event wiring uses a single shared [`Closure`] per renderer. Each listener
//! is the shared handler [bound](https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Function/bind)
//! to a key into a handler table that is rebuilt on every render. Fresh nodes
//! get fresh bindings, so a handler can neither stop firing after a re-render
//! nor fire twice for one user action; an event that still reaches a key
//! evicted by a re-render is logged and dropped.
//!
//! DOM failures are logged and skipped, never propagated: a broken node leaves
//! a gap in the region instead of taking the page down.

use crate::vdom::{Handler, Node};
use core::cell::RefCell;
use hashbrown::HashMap;
use js_sys::Function;
use std::rc::Rc;
use tracing::{error, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue, UnwrapThrowExt};

struct HandlerTable<M> {
	entries: HashMap<u32, Handler<M>>,
	next_key: u32,
}

impl<M> HandlerTable<M> {
	fn insert(&mut self, handler: Handler<M>) -> u32 {
		let key = self.next_key;
		self.next_key += 1;
		self.entries.insert(key, handler);
		key
	}
}

pub struct Renderer<M> {
	root: web_sys::Element,
	handlers: Rc<RefCell<HandlerTable<M>>>,
	common_handler: Closure<dyn Fn(JsValue, web_sys::Event)>,
}

impl<M: Clone + 'static> Renderer<M> {
	/// Attaches to the element with the given id. A missing region is an
	/// error on the page template's side; it is logged and the renderer is
	/// simply absent, so the rest of the page keeps working.
	pub fn attach(region_id: &str, dispatch: Rc<dyn Fn(M)>) -> Option<Self> {
		let document = web_sys::window().expect_throw("no window").document().expect_throw("no document");
		match document.get_element_by_id(region_id) {
			Some(root) => Some(Self::new(root, dispatch)),
			None => {
				error!("Render region #{} not found in the document.", region_id);
				None
			}
		}
	}

	#[must_use]
	pub fn new(root: web_sys::Element, dispatch: Rc<dyn Fn(M)>) -> Self {
		let handlers = Rc::new(RefCell::new(HandlerTable {
			entries: HashMap::new(),
			next_key: 0,
		}));
		let table = Rc::clone(&handlers);
		let common_handler = Closure::wrap(Box::new(move |key: JsValue, event: web_sys::Event| {
			let handler = {
				// The clone releases the borrow before dispatch, which may
				// re-render and rebuild this very table.
				let table = table.borrow();
				key.as_f64().and_then(|key| table.entries.get(&(key as u32)).cloned())
			};
			let handler = match handler {
				Some(handler) => handler,
				None => {
					warn!("Dropping {:?} event for a handler key evicted by a re-render.", event.type_());
					return;
				}
			};
			match handler {
				Handler::Msg(message) => dispatch(message),
				Handler::MsgCapture(message) => {
					event.prevent_default();
					event.stop_propagation();
					dispatch(message);
				}
				Handler::Submit(message) => {
					event.prevent_default();
					dispatch(message);
				}
				Handler::Input(make) => match control_value(&event) {
					Some(value) => dispatch(make(value)),
					None => warn!("Input event without a readable target value."),
				},
			}
		}) as Box<dyn Fn(JsValue, web_sys::Event)>);

		Self { root, handlers, common_handler }
	}

	/// Replaces the region's content with `nodes`.
	pub fn render(&self, nodes: &[Node<M>]) {
		let document = self
			.root
			.owner_document()
			.expect_throw("render region has no owner document");

		{
			// Keys stay monotonic across renders; a cleared key must never
			// alias a binding created for the replacement nodes.
			let mut table = self.handlers.borrow_mut();
			table.entries.clear();
		}

		while let Some(child) = self.root.first_child() {
			if let Err(error) = self.root.remove_child(&child) {
				error!("Failed to clear render region: {:?}", error);
				break;
			}
		}

		for node in nodes {
			if let Some(created) = self.create_node(&document, node) {
				if let Err(error) = self.root.append_child(&created) {
					error!("Failed to insert node: {:?}", error);
				}
			}
		}
	}

	fn create_node(&self, document: &web_sys::Document, node: &Node<M>) -> Option<web_sys::Node> {
		match node {
			Node::Text(text) => Some(document.create_text_node(text).into()),
			Node::Element(element) => {
				let dom_element = match document.create_element(element.name) {
					Ok(dom_element) => dom_element,
					Err(error) => {
						error!("Failed to create <{}>: {:?}", element.name, error);
						return None;
					}
				};

				for attribute in &element.attributes {
					if let Err(error) = dom_element.set_attribute(attribute.name, &attribute.value) {
						error!("Failed to set attribute {:?}: {:?}", attribute.name, error);
					}
				}

				for listener in &element.listeners {
					let key = self.handlers.borrow_mut().insert(listener.handler.clone());
					let bound = self
						.common_handler
						.as_ref()
						.unchecked_ref::<Function>()
						.bind1(&JsValue::UNDEFINED, &JsValue::from_f64(f64::from(key)));
					if let Err(error) = dom_element.add_event_listener_with_callback(listener.event, bound.unchecked_ref()) {
						error!("Failed to add event listener {:?}: {:?}", listener.event, error);
					}
				}

				for child in &element.children {
					if let Some(created) = self.create_node(document, child) {
						if let Err(error) = dom_element.append_child(&created) {
							error!("Failed to append child node: {:?}", error);
						}
					}
				}

				Some(dom_element.into())
			}
		}
	}
}

fn control_value(event: &web_sys::Event) -> Option<String> {
	let target = event.target()?;
	if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
		Some(input.value())
	} else if let Some(area) = target.dyn_ref::<web_sys::HtmlTextAreaElement>() {
		Some(area.value())
	} else {
		None
	}
}
