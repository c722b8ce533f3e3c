//! Entry points called from the markup the server renders,
//! like `onclick="ajaxUpdateLinkClick('/wo/…', 'results');return false;"`.
//!
//! These share one [`ResponseRouter`] per page, created with the default [`RouterConfig`] on first use unless [`ngInit`](`init`) configured it first.

use crate::{
	config::{MissingContainerPolicy, RouterConfig},
	error::{Error, Result},
	observe::FieldObserver,
	registry::{invoke_page_update, refresh_container, with_page_registry},
	request::RequestDescriptor,
	router::ResponseRouter,
};
use core::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, trace, warn};
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
use web_sys::{Element, HtmlFormElement};

struct Page {
	router: Rc<ResponseRouter>,
	observer: Option<FieldObserver>,
}

thread_local! {
	static PAGE: RefCell<Option<Page>> = RefCell::new(None);
}

fn page_router() -> Result<Rc<ResponseRouter>> {
	PAGE.with(|page| -> Result<Rc<ResponseRouter>> {
		let mut page = page.borrow_mut();
		if let Some(page) = page.as_ref() {
			return Ok(Rc::clone(&page.router));
		}
		let router = Rc::new(ResponseRouter::new(RouterConfig::default())?);
		*page = Some(Page {
			router: Rc::clone(&router),
			observer: None,
		});
		Ok(router)
	})
}

/// Sets up the page: creates its router, binds observed fields and keeps them bound as the page changes.
///
/// `alert_missing` restores the blocking alert for updates whose container can't be found.
/// Calling this again reconfigures the page. Fields that are already bound keep their listener, which then submits through the new router.
#[wasm_bindgen(js_name = ngInit)]
pub fn init(alert_missing: Option<bool>) -> Result<(), JsValue> {
	trace!(?alert_missing, "ngInit");
	let mut config = RouterConfig::default();
	if alert_missing.unwrap_or(false) {
		config = config.missing_container(MissingContainerPolicy::Alert);
	}
	let router = Rc::new(ResponseRouter::new(config)?);
	let root = router.document().document_element().ok_or(Error::NoWindow)?;

	PAGE.with(|page| -> Result<(), JsValue> {
		let mut page = page.borrow_mut();
		let page = page.get_or_insert_with(|| Page {
			router: Rc::clone(&router),
			observer: None,
		});
		page.router = Rc::clone(&router);

		let observer = page.observer.get_or_insert_with(|| FieldObserver::new(Rc::clone(&router)));
		observer.set_router(Rc::clone(&router));
		let count = observer.attach(&root)?;
		observer.observe_mutations(&root)?;
		debug!("Observing {} field(s) initially.", count);
		Ok(())
	})
}

/// The router the page is currently configured with.
///
/// # Errors
///
/// [`Error::NoWindow`] outside of a document context.
pub fn current_router() -> Result<Rc<ResponseRouter>> {
	page_router()
}

/// Fires a `GET` of `url` and puts a plain response into the container `id`, if given.
#[wasm_bindgen(js_name = ajaxUpdateLinkClick)]
pub fn ajax_update_link_click(url: &str, id: Option<String>) -> Result<(), JsValue> {
	trace!(url, ?id, "ajaxUpdateLinkClick");
	let router = page_router()?;
	router.dispatch(RequestDescriptor::for_link(url, id.as_deref(), router.config().container_header));
	Ok(())
}

/// Submits `button`'s form, including `button` itself as the pressed control.
#[wasm_bindgen(js_name = ajaxSubmitButtonClick)]
pub fn ajax_submit_button_click(button: &Element, update_container_id: Option<String>) -> Result<(), JsValue> {
	trace!(?update_container_id, "ajaxSubmitButtonClick");
	let router = page_router()?;
	let form = button
		.closest("form")
		.map_err(Error::request)?
		.and_then(|form| form.dyn_into::<HtmlFormElement>().ok())
		.ok_or_else(|| Error::Request {
			message: "submit button is not inside a form".to_owned(),
		})?;

	let descriptor = RequestDescriptor::for_submit(&form, Some(button), update_container_id.as_deref(), router.config().container_header)?;
	router.dispatch(descriptor);
	Ok(())
}

/// Registers the standard refresh for the update container `id`, which can then be run with [`ngUpdate`](`update`).
#[wasm_bindgen(js_name = ngRegisterUpdateContainer)]
pub fn register_update_container(id: &str) -> Result<(), JsValue> {
	// Resolved on each refresh, so that a later `ngInit` applies to it.
	page_router()?;
	let container_id = id.to_owned();
	with_page_registry(|registry| {
		registry.register(id, move |element_id| match page_router() {
			Ok(router) => {
				if let Err(error) = refresh_container(&router, &container_id, element_id) {
					warn!("{}", error);
				}
			}
			Err(error) => error!("{}", error),
		})
	});
	Ok(())
}

/// Runs the update registered for `id`, retargeted at `element_id`.
///
/// Returns whether such an update was registered.
#[wasm_bindgen(js_name = ngUpdate)]
pub fn update(id: &str, element_id: &str) -> bool {
	invoke_page_update(id, element_id)
}

/// Binds observed fields that were added since the last pass.
///
/// Only needed for pages that didn't call [`ngInit`](`init`) or that swap out content outside of the observed root.
#[wasm_bindgen(js_name = activateObservation)]
pub fn activate_observation() -> Result<u32, JsValue> {
	let router = page_router()?;
	let root = router.document().document_element().ok_or(Error::NoWindow)?;
	PAGE.with(|page| -> Result<u32, JsValue> {
		let mut page = page.borrow_mut();
		let page = page.as_mut().ok_or(Error::NoWindow)?;
		let observer = page.observer.get_or_insert_with(|| FieldObserver::new(Rc::clone(&router)));
		let count = observer.attach(&root)?;
		Ok(count as u32)
	})
}
