//! The per-page command dispatch loop.
//!
//! Each page is a view model implementing [`Page`]: user actions and network
//! results arrive as typed messages, a pure [`Page::update`] folds them into
//! new state and returns data-described effects plus the set of regions whose
//! rendered content no longer matches the state. The loop is single-threaded
//! and cooperative: queued messages are processed to completion, dirty regions
//! re-render synchronously with the state change (badges and lists can never
//! disagree), and effects run as spawned futures whose results come back as
//! messages.

use crate::dom::Renderer;
use crate::vdom::Node;
use core::cell::{Cell, RefCell};
use core::future::Future;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::{error, trace};
use wasm_bindgen::{closure::Closure, JsCast};

/// One independently re-renderable DOM region of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region(pub u8);

/// Set of regions to re-render after an update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dirty(u32);

impl Dirty {
	pub const NONE: Self = Self(0);

	#[must_use]
	pub fn only(region: Region) -> Self {
		Self(1 << region.0)
	}

	#[must_use]
	pub fn and(self, region: Region) -> Self {
		Self(self.0 | 1 << region.0)
	}

	#[must_use]
	pub fn contains(self, region: Region) -> bool {
		self.0 & 1 << region.0 != 0
	}
}

/// Result of one reducer step.
#[derive(Debug, PartialEq)]
pub struct Step<E> {
	pub effects: Vec<E>,
	pub dirty: Dirty,
}

impl<E> Step<E> {
	#[must_use]
	pub fn idle() -> Self {
		Self { effects: Vec::new(), dirty: Dirty::NONE }
	}

	#[must_use]
	pub fn render(region: Region) -> Self {
		Self { effects: Vec::new(), dirty: Dirty::only(region) }
	}

	#[must_use]
	pub fn effect(effect: E) -> Self {
		Self { effects: vec![effect], dirty: Dirty::NONE }
	}

	#[must_use]
	pub fn and_render(mut self, region: Region) -> Self {
		self.dirty = self.dirty.and(region);
		self
	}

	#[must_use]
	pub fn and_effect(mut self, effect: E) -> Self {
		self.effects.push(effect);
		self
	}
}

pub trait Page: Sized + 'static {
	type Msg: Clone + 'static;
	type Effect: 'static;

	/// The page's render regions and the element ids they attach to.
	const REGIONS: &'static [(Region, &'static str)];

	/// Pure state transition; must not touch the DOM or the network.
	fn update(&mut self, message: Self::Msg) -> Step<Self::Effect>;

	/// Renders one region from the current state.
	fn view(&self, region: Region) -> Vec<Node<Self::Msg>>;

	/// Executes one effect, reporting results back through `dispatch`.
	fn perform(effect: Self::Effect, dispatch: &Dispatch<Self>);
}

struct Shared<P: Page> {
	page: RefCell<P>,
	renderers: RefCell<Vec<(Region, Renderer<P::Msg>)>>,
	queue: RefCell<VecDeque<P::Msg>>,
	draining: Cell<bool>,
}

pub struct Dispatch<P: Page>(Rc<Shared<P>>);

impl<P: Page> Clone for Dispatch<P> {
	fn clone(&self) -> Self {
		Self(Rc::clone(&self.0))
	}
}

impl<P: Page> Dispatch<P> {
	/// Attaches the page to its regions, renders every region once from the
	/// initial state and dispatches the start-up messages.
	pub fn mount(page: P, initial: impl IntoIterator<Item = P::Msg>) -> Self {
		let dispatch = Self(Rc::new(Shared {
			page: RefCell::new(page),
			renderers: RefCell::new(Vec::new()),
			queue: RefCell::new(VecDeque::new()),
			draining: Cell::new(false),
		}));

		let sender = {
			let dispatch = dispatch.clone();
			Rc::new(move |message: P::Msg| dispatch.send(message)) as Rc<dyn Fn(P::Msg)>
		};
		{
			let mut renderers = dispatch.0.renderers.borrow_mut();
			for &(region, element_id) in P::REGIONS {
				if let Some(renderer) = Renderer::attach(element_id, Rc::clone(&sender)) {
					renderers.push((region, renderer));
				}
			}
		}

		{
			let page = dispatch.0.page.borrow();
			for (region, renderer) in dispatch.0.renderers.borrow().iter() {
				renderer.render(&page.view(*region));
			}
		}

		for message in initial {
			dispatch.send(message);
		}
		dispatch
	}

	/// Queues a message; messages are processed to completion in order, so a
	/// handler firing mid-drain cannot interleave with a running update.
	pub fn send(&self, message: P::Msg) {
		self.0.queue.borrow_mut().push_back(message);
		if self.0.draining.get() {
			return;
		}
		self.0.draining.set(true);
		while let Some(message) = {
			let mut queue = self.0.queue.borrow_mut();
			queue.pop_front()
		} {
			let step = self.0.page.borrow_mut().update(message);
			self.render_dirty(step.dirty);
			for effect in step.effects {
				P::perform(effect, self);
			}
		}
		self.0.draining.set(false);
	}

	fn render_dirty(&self, dirty: Dirty) {
		if dirty == Dirty::NONE {
			return;
		}
		let page = self.0.page.borrow();
		for (region, renderer) in self.0.renderers.borrow().iter() {
			if dirty.contains(*region) {
				trace!("Re-rendering region {:?}.", region);
				renderer.render(&page.view(*region));
			}
		}
	}

	/// Reads the page state, for effect handlers that need request context
	/// such as the page's subject id.
	pub fn with<T>(&self, read: impl FnOnce(&P) -> T) -> T {
		read(&self.0.page.borrow())
	}

	/// Runs a future whose eventual output, if any, is dispatched as a
	/// message. Requests are fire-and-forget: there is no cancellation, and an
	/// overlapping response simply wins by arriving last, which is sound
	/// because every response carries full authoritative state.
	pub fn spawn(&self, future: impl Future<Output = Option<P::Msg>> + 'static) {
		let dispatch = self.clone();
		wasm_bindgen_futures::spawn_local(async move {
			if let Some(message) = future.await {
				dispatch.send(message);
			}
		});
	}

	/// Dispatches `message` on a fixed interval, for idempotent background
	/// refreshes. The interval lives as long as the page.
	pub fn every(&self, millis: i32, message: P::Msg) {
		let dispatch = self.clone();
		let tick = Closure::wrap(Box::new(move || dispatch.send(message.clone())) as Box<dyn Fn()>);
		let window = match web_sys::window() {
			Some(window) => window,
			None => return error!("No window; cannot schedule interval."),
		};
		if let Err(error) =
			window.set_interval_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), millis)
		{
			error!("Failed to schedule interval: {:?}", error);
		}
		// The page never tears down before navigation discards the whole
		// Wasm instance, so the callback may live until then.
		tick.forget();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dirty_set_membership() {
		let dirty = Dirty::only(Region(0)).and(Region(3));
		assert!(dirty.contains(Region(0)));
		assert!(dirty.contains(Region(3)));
		assert!(!dirty.contains(Region(1)));
		assert_eq!(Dirty::NONE, Dirty::default());
	}

	#[test]
	fn step_builders_accumulate() {
		let step: Step<&str> = Step::effect("load").and_effect("poll").and_render(Region(2));
		assert_eq!(step.effects, vec!["load", "poll"]);
		assert!(step.dirty.contains(Region(2)));
	}
}
