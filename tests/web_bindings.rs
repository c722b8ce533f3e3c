#![cfg(target_arch = "wasm32")]

use ng_ajax::{
	bindings::{current_router, init, register_update_container, update},
	config::MissingContainerPolicy,
};
use std::{cell::Cell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Element, Event};

wasm_bindgen_test_configure!(run_in_browser);

use web_page_::{body, change, container, document, event_detail, next_event, remove};

fn observed_form(id: &str, action: &str) -> Element {
	web_log_::init();
	let root = document().create_element("div").unwrap();
	root.set_id(id);
	root.set_inner_html(&format!(
		"<form action=\"{}\" method=\"post\"><div class=\"ng-observe-descendant-fields\"><input name=\"f\" value=\"1\"></div></form>",
		action
	));
	body().append_child(&root).unwrap();
	root
}

#[wasm_bindgen_test]
async fn repeated_init_keeps_observed_fields_working() {
	let root = observed_form("bindings-reinit", "http://127.0.0.1:9/wo/reinit");
	init(None).unwrap();
	init(None).unwrap();

	let uncaught = Rc::new(Cell::new(0));
	let on_error = Closure::wrap(Box::new({
		let uncaught = Rc::clone(&uncaught);
		move |_: Event| uncaught.set(uncaught.get() + 1)
	}) as Box<dyn Fn(Event)>);
	let window = window().unwrap();
	window.add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref()).unwrap();

	let submission = next_event("ng-ajax-error");
	change(&root.query_selector("input").unwrap().unwrap());
	assert_eq!(uncaught.get(), 0);
	let detail = event_detail(submission.await.unwrap());

	assert!(detail.contains("/wo/reinit"), "unexpected detail: {}", detail);
	assert_eq!(uncaught.get(), 0);
	window.remove_event_listener_with_callback("error", on_error.as_ref().unchecked_ref()).unwrap();
	root.remove();
}

#[wasm_bindgen_test]
fn init_reconfigures_the_page_router() {
	web_log_::init();
	init(Some(true)).unwrap();
	assert_eq!(current_router().unwrap().config().missing_container, MissingContainerPolicy::Alert);

	init(None).unwrap();
	assert_eq!(current_router().unwrap().config().missing_container, MissingContainerPolicy::Log);
}

#[wasm_bindgen_test]
async fn registered_container_refreshes_after_init() {
	web_log_::init();
	let element = container("bindings-refresh", "old");
	element.set_attribute("data-updateUrl", "http://127.0.0.1:9/wo/1/2.3").unwrap();
	register_update_container("bindings-refresh").unwrap();
	init(None).unwrap();

	let request = next_event("ng-ajax-error");
	assert!(update("bindings-refresh", "2.5.1"));
	let detail = event_detail(request.await.unwrap());

	assert!(detail.contains("/wo/1/2.5.1?_u=bindings-refresh"), "unexpected detail: {}", detail);
	assert!(!update("bindings-unregistered", "2.5.1"));
	remove(&[element]);
}
