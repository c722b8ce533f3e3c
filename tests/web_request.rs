#![cfg(target_arch = "wasm32")]

use ng_ajax::{
	config::ContainerHeader,
	request::{Method, RequestDescriptor},
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Element, HtmlFormElement};

wasm_bindgen_test_configure!(run_in_browser);

use web_page_::{body, document};

fn form(id: &str, method: &str) -> HtmlFormElement {
	web_log_::init();
	let form = document().create_element("form").unwrap();
	form.set_id(id);
	form.set_attribute("action", "/wo/1/2.5").unwrap();
	form.set_attribute("method", method).unwrap();
	form.set_inner_html(
		"<input name=\"a\" value=\"1\">\
		<input name=\"b\" value=\"two words\">\
		<input value=\"unnamed\">\
		<input type=\"file\" name=\"upload\">\
		<input type=\"button\" id=\"submit-button\" name=\"2.5.7\" value=\"Go\">",
	);
	body().append_child(&form).unwrap();
	form.dyn_into().unwrap()
}

fn button(form: &HtmlFormElement) -> Element {
	form.query_selector("#submit-button").unwrap().unwrap()
}

#[wasm_bindgen_test]
fn submit_includes_fields_then_submitter() {
	let form = form("post-form", "post");

	let descriptor = RequestDescriptor::for_submit(&form, Some(&button(&form)), Some("results"), ContainerHeader::Current).unwrap();

	assert_eq!(descriptor.method(), Method::Post);
	assert!(descriptor.target_url().ends_with("/wo/1/2.5"));
	assert_eq!(
		descriptor.body(),
		&[
			("a".to_owned(), "1".to_owned()),
			("b".to_owned(), "two words".to_owned()),
			("2.5.7".to_owned(), "Go".to_owned()),
		]
	);
	assert_eq!(descriptor.header("ng-container-id"), Some("results"));
	assert_eq!(descriptor.fallback_target_id(), Some("results"));
	assert_eq!(descriptor.encoded_body().unwrap(), "a=1&b=two+words&2.5.7=Go");
	assert_eq!(descriptor.request_url().unwrap(), descriptor.target_url());
	form.remove();
}

#[wasm_bindgen_test]
fn get_form_moves_fields_into_query() {
	let form = form("get-form", "get");

	let descriptor = RequestDescriptor::for_submit(&form, None, None, ContainerHeader::Legacy).unwrap();

	assert_eq!(descriptor.method(), Method::Get);
	assert!(descriptor.request_url().unwrap().ends_with("/wo/1/2.5?a=1&b=two+words"));
	assert!(descriptor.headers().is_empty());
	assert_eq!(descriptor.fallback_target_id(), None);
	form.remove();
}

#[wasm_bindgen_test]
fn web_request_carries_container_header() {
	web_log_::init();
	let descriptor = RequestDescriptor::for_link("/wo/1/2.3", Some("results"), ContainerHeader::Both);

	let request = descriptor.to_web_request().unwrap();

	assert_eq!(request.method(), "GET");
	assert_eq!(request.headers().get("ng-container-id").unwrap().as_deref(), Some("results"));
	assert_eq!(request.headers().get("x-updatecontainerid").unwrap().as_deref(), Some("results"));
}
