use plant_talk_web::dom::Renderer;
use plant_talk_web::vdom::{el, text, Node};
use std::rc::Rc;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::window;

wasm_bindgen_test_configure!(run_in_browser);

fn region(id: &str) -> web_sys::Element {
	let document = window().unwrap().document().unwrap();
	let root = document.create_element("div").unwrap();
	root.set_id(id);
	document.body().unwrap().append_child(&root).unwrap();
	root
}

fn noop() -> Rc<dyn Fn(())> {
	Rc::new(|()| ())
}

#[wasm_bindgen_test]
fn rendering_twice_leaves_the_region_identical() {
	let root = region("render-idempotent");
	let renderer = Renderer::new(root.clone(), noop());

	let nodes: Vec<Node<()>> = vec![
		el("div").class("post-card").text("Watering schedule").into(),
		el("div").class("post-card").text("Repotting").into(),
	];

	renderer.render(&nodes);
	let first_count = root.child_nodes().length();
	let first_text = root.text_content().unwrap();

	renderer.render(&nodes);
	assert_eq!(root.child_nodes().length(), first_count);
	assert_eq!(root.text_content().unwrap(), first_text);
	assert_eq!(first_count, 2);
}

#[wasm_bindgen_test]
fn rendering_replaces_previous_content() {
	let root = region("render-replace");
	let renderer = Renderer::new(root.clone(), noop());

	renderer.render(&[el("div").text("before").into(), el("div").text("also before").into()]);
	renderer.render(&[el("div").text("after").into()]);

	assert_eq!(root.child_nodes().length(), 1);
	assert_eq!(root.text_content().unwrap(), "after");
}

#[wasm_bindgen_test]
fn text_content_is_never_parsed_as_markup() {
	let root = region("render-text");
	let renderer = Renderer::new(root.clone(), noop());

	renderer.render(&[text("<b>not bold</b>")]);

	assert_eq!(root.text_content().unwrap(), "<b>not bold</b>");
	assert!(root.query_selector("b").unwrap().is_none());
}

#[wasm_bindgen_test]
fn empty_render_clears_the_region() {
	let root = region("render-clear");
	let renderer = Renderer::new(root.clone(), noop());

	renderer.render(&[el("div").text("something").into()]);
	renderer.render(&[]);

	assert_eq!(root.child_nodes().length(), 0);
}
