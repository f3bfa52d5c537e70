use plant_talk_web::dom::Renderer;
use plant_talk_web::vdom::{el, Node};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn region(id: &str) -> web_sys::Element {
	let document = window().unwrap().document().unwrap();
	let root = document.create_element("div").unwrap();
	root.set_id(id);
	document.body().unwrap().append_child(&root).unwrap();
	root
}

fn counting_dispatch(log: &Rc<RefCell<Vec<&'static str>>>) -> Rc<dyn Fn(&'static str)> {
	let log = Rc::clone(log);
	Rc::new(move |message| log.borrow_mut().push(message))
}

fn click(id: &str) {
	window()
		.unwrap()
		.document()
		.unwrap()
		.get_element_by_id(id)
		.unwrap()
		.dyn_into::<HtmlElement>()
		.unwrap()
		.click();
}

#[wasm_bindgen_test]
fn a_click_dispatches_exactly_once_even_after_rerenders() {
	let root = region("event-once");
	let log = Rc::new(RefCell::new(Vec::new()));
	let renderer = Renderer::new(root, counting_dispatch(&log));

	let tree: Vec<Node<&'static str>> =
		vec![el("button").attr("id", "event-once-button").on("click", "vote").text("Like").into()];

	renderer.render(&tree);
	click("event-once-button");
	assert_eq!(*log.borrow(), vec!["vote"]);

	// A re-render rebuilds both nodes and bindings; one click stays one message.
	renderer.render(&tree);
	click("event-once-button");
	assert_eq!(*log.borrow(), vec!["vote", "vote"]);
}

#[wasm_bindgen_test]
fn a_stale_node_from_before_a_rerender_dispatches_nothing() {
	let root = region("event-stale");
	let log = Rc::new(RefCell::new(Vec::new()));
	let renderer = Renderer::new(root, counting_dispatch(&log));

	let tree: Vec<Node<&'static str>> =
		vec![el("button").attr("id", "event-stale-button").on("click", "open").text("Open").into()];
	renderer.render(&tree);

	let stale = window()
		.unwrap()
		.document()
		.unwrap()
		.get_element_by_id("event-stale-button")
		.unwrap()
		.dyn_into::<HtmlElement>()
		.unwrap();

	renderer.render(&tree);
	// The detached button's listener still fires, but its handler key was
	// evicted by the re-render, so the event is dropped.
	stale.click();
	assert_eq!(log.borrow().len(), 0);
}

#[wasm_bindgen_test]
fn capturing_handlers_stop_the_event_at_the_button() {
	let root = region("event-capture");
	let log = Rc::new(RefCell::new(Vec::new()));
	let renderer = Renderer::new(root, counting_dispatch(&log));

	let tree: Vec<Node<&'static str>> = vec![el("div")
		.attr("id", "event-capture-card")
		.on("click", "open-post")
		.child(
			el("button")
				.attr("id", "event-capture-vote")
				.on_capture("click", "vote")
				.text("Like"),
		)
		.into()];
	renderer.render(&tree);

	click("event-capture-vote");
	assert_eq!(*log.borrow(), vec!["vote"]);

	click("event-capture-card");
	assert_eq!(*log.borrow(), vec!["vote", "open-post"]);
}

#[wasm_bindgen_test]
fn input_handlers_carry_the_control_value() {
	let root = region("event-input");
	let log = Rc::new(RefCell::new(Vec::new()));
	let dispatch: Rc<dyn Fn(String)> = {
		let log = Rc::clone(&log);
		Rc::new(move |message| log.borrow_mut().push(message))
	};
	let renderer = Renderer::new(root, dispatch);

	let tree: Vec<Node<String>> =
		vec![el("input").attr("id", "event-input-field").on_input(|value| value).into()];
	renderer.render(&tree);

	let field = window()
		.unwrap()
		.document()
		.unwrap()
		.get_element_by_id("event-input-field")
		.unwrap()
		.dyn_into::<web_sys::HtmlInputElement>()
		.unwrap();
	field.set_value("monstera");
	field
		.dispatch_event(&web_sys::Event::new("input").unwrap())
		.unwrap();

	assert_eq!(*log.borrow(), vec!["monstera".to_owned()]);
}
