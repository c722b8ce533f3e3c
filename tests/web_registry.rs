#![cfg(target_arch = "wasm32")]

use ng_ajax::{
	registry::{refresh_container, UpdateRegistry},
	Error, ResponseRouter, RouterConfig,
};
use std::rc::Rc;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

use web_page_::{container, event_detail, next_event, remove};

fn router(error_event: &str) -> Rc<ResponseRouter> {
	web_log_::init();
	Rc::new(ResponseRouter::new(RouterConfig::default().error_event(error_event)).unwrap())
}

#[wasm_bindgen_test]
async fn registered_container_refreshes_from_its_update_url() {
	let router = router("test-refresh");
	let element = container("refresh-results", "old");
	element.set_attribute("data-updateUrl", "http://127.0.0.1:9/wo/1/2.3").unwrap();

	let mut registry = UpdateRegistry::new();
	registry.register_container(&router, "refresh-results");

	let request = next_event("test-refresh");
	assert!(registry.invoke("refresh-results", "2.5.1"));
	let detail = event_detail(request.await.unwrap());

	assert!(detail.contains("/wo/1/2.5.1?_u=refresh-results"), "unexpected detail: {}", detail);
	assert_eq!(element.inner_html(), "old");
	remove(&[element]);
}

#[wasm_bindgen_test]
fn absent_container_is_not_refreshed() {
	let router = router("test-refresh-absent");

	assert_eq!(
		refresh_container(&router, "refresh-absent", "2.5.1"),
		Err(Error::MissingContainer { id: "refresh-absent".to_owned() })
	);

	let mut registry = UpdateRegistry::new();
	registry.register_container(&router, "refresh-absent");
	assert!(registry.invoke("refresh-absent", "2.5.1"));
}

#[wasm_bindgen_test]
fn container_without_update_url_is_not_refreshed() {
	let router = router("test-refresh-no-url");
	let element = container("refresh-no-url", "old");

	assert_eq!(
		refresh_container(&router, "refresh-no-url", "2.5.1"),
		Err(Error::MissingUpdateUrl { id: "refresh-no-url".to_owned() })
	);
	remove(&[element]);
}
