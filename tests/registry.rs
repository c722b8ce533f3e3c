#![cfg(not(target_arch = "wasm32"))]

use ng_ajax::registry::{container_update_url, with_page_registry, UpdateRegistry};
use std::{cell::RefCell, rc::Rc};

#[test]
fn registered_callbacks_receive_element_id() {
	let calls = Rc::new(RefCell::new(Vec::new()));
	let mut registry = UpdateRegistry::new();
	registry.register("results", {
		let calls = Rc::clone(&calls);
		move |element_id: &str| calls.borrow_mut().push(element_id.to_owned())
	});

	assert!(registry.contains("results"));
	assert!(registry.invoke("results", "2.5.1"));
	assert!(registry.invoke("results", "2.5.3"));
	assert_eq!(*calls.borrow(), ["2.5.1", "2.5.3"]);
}

#[test]
fn unknown_ids_are_not_invoked() {
	let registry = UpdateRegistry::new();

	assert!(registry.is_empty());
	assert!(!registry.invoke("results", "2.5.1"));
}

#[test]
fn registration_replaces_and_unregisters() {
	let mut registry = UpdateRegistry::new();

	assert!(registry.register("results", |_: &str| ()).is_none());
	assert!(registry.register("results", |_: &str| ()).is_some());
	assert_eq!(registry.len(), 1);
	assert!(registry.unregister("results").is_some());
	assert!(!registry.contains("results"));
}

#[test]
fn page_registry_is_shared() {
	with_page_registry(|registry| registry.register("shared", |_: &str| ()));

	assert!(with_page_registry(|registry| registry.contains("shared")));
	assert!(ng_ajax::registry::invoke_page_update("shared", "1"));
	assert!(!ng_ajax::registry::invoke_page_update("unregistered", "1"));
}

#[test]
fn update_url_replaces_last_segment() {
	assert_eq!(container_update_url("/wo/1/2.3", "2.5.1", "results"), "/wo/1/2.5.1?_u=results");
	assert_eq!(container_update_url("http://localhost:1200/wo/7/0.1", "0.4", "list"), "http://localhost:1200/wo/7/0.4?_u=list");
	assert_eq!(container_update_url("2.3", "2.5", "results"), "2.5?_u=results");
}
