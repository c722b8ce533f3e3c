//! Auto-submission of observed form fields.
//!
//! Fields inside an element with the marker class (rendered by `AjaxObserveField`) submit their form through the router whenever they change.
//! Binding is an explicit pass that can be repeated at any time, and [`FieldObserver::observe_mutations`] repeats it whenever the page's element tree changes.

use crate::{
	error::{Error, Result},
	request::RequestDescriptor,
	router::ResponseRouter,
};
use core::cell::RefCell;
use js_sys::{Array, Function};
use std::rc::Rc;
use tracing::{debug, error, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Element, HtmlFormElement, MutationObserver, MutationObserverInit};

/// Attribute of a marker element naming the update container its submissions target.
pub const CONTAINER_ID_ATTRIBUTE: &str = "data-updatecontainerid";

const FIELD_TAGS: [&str; 3] = ["input", "select", "textarea"];

/// Keeps the shared change listener (and optionally a mutation observer) alive.
///
/// Fields bound by an observer will throw errors into JavaScript on change once it is dropped,
/// so an observer should live as long as the page. Use [`set_router`](`FieldObserver::set_router`) to reconfigure it instead of replacing it.
pub struct FieldObserver {
	marker_class: String,
	router: Rc<RefCell<Rc<ResponseRouter>>>,
	change_handler: Closure<dyn Fn(web_sys::Event)>,
	mutation_observer: Option<(MutationObserver, Closure<dyn Fn(Array, MutationObserver)>)>,
}

impl core::fmt::Debug for FieldObserver {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("FieldObserver")
			.field("marker_class", &self.marker_class)
			.field("observing_mutations", &self.mutation_observer.is_some())
			.finish()
	}
}

impl FieldObserver {
	#[must_use]
	pub fn new(router: Rc<ResponseRouter>) -> Self {
		let marker_class = router.config().observe_marker_class.clone();
		let marker_selector = format!(".{}", marker_class);
		let router = Rc::new(RefCell::new(router));
		let current_router = Rc::clone(&router);
		Self {
			change_handler: Closure::wrap(Box::new(move |event: web_sys::Event| {
				let field = match event.target().and_then(|target| target.dyn_into::<Element>().ok()) {
					Some(field) => field,
					None => return debug!("Ignoring change event without element target."),
				};
				// Released before dispatching, so a submission may reconfigure the observer.
				let router = Rc::clone(&current_router.borrow());
				match submission_for(&field, &marker_selector, &router) {
					Ok(Some(descriptor)) => router.dispatch(descriptor),
					Ok(None) => warn!("Observed field {:?} is not inside a form.", field.id()),
					Err(error) => error!("Failed to submit observed field {:?}: {}", field.id(), error),
				}
			}) as Box<dyn Fn(web_sys::Event)>),
			marker_class,
			router,
			mutation_observer: None,
		}
	}

	/// Routes future submissions through `router`.
	///
	/// Fields stay bound to the same listener. The marker class remains the one this observer was created with.
	pub fn set_router(&self, router: Rc<ResponseRouter>) {
		*self.router.borrow_mut() = router;
	}

	#[must_use]
	pub fn router(&self) -> Rc<ResponseRouter> {
		Rc::clone(&self.router.borrow())
	}

	/// Binds the change listener to every field inside a marked element within `root` (which may itself be marked).
	///
	/// Returns the number of fields found. Fields that are already bound aren't bound twice, so this can be repeated freely.
	#[instrument(skip(self, root))]
	pub fn attach(&self, root: &Element) -> Result<usize> {
		attach_fields(root, &self.marker_class, self.handler())
	}

	/// Re-runs [`attach`](`FieldObserver::attach`) on `root` whenever elements are added anywhere below it.
	///
	/// Replaces any previous mutation observation of this instance.
	#[allow(deprecated)] // Builder-style `MutationObserverInit` setters, for older `web-sys` compatibility.
	#[instrument(skip(self, root))]
	pub fn observe_mutations(&mut self, root: &Element) -> Result<()> {
		self.disconnect();

		let observed_root = root.clone();
		let marker_class = self.marker_class.clone();
		let handler = self.handler().clone();
		let callback = Closure::wrap(Box::new(move |records: Array, _: MutationObserver| {
			trace!("{} mutation record(s).", records.length());
			if let Err(error) = attach_fields(&observed_root, &marker_class, &handler) {
				error!("Failed to re-attach field observation: {}", error);
			}
		}) as Box<dyn Fn(Array, MutationObserver)>);

		let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).map_err(Error::request)?;
		let mut init = MutationObserverInit::new();
		init.child_list(true).subtree(true);
		observer.observe_with_options(root, &init).map_err(Error::request)?;

		self.mutation_observer = Some((observer, callback));
		Ok(())
	}

	/// Stops mutation observation. Already bound fields stay bound.
	pub fn disconnect(&mut self) {
		if let Some((observer, _callback)) = self.mutation_observer.take() {
			observer.disconnect();
		}
	}

	fn handler(&self) -> &Function {
		self.change_handler.as_ref().unchecked_ref()
	}
}

impl Drop for FieldObserver {
	fn drop(&mut self) {
		self.disconnect();
	}
}

fn attach_fields(root: &Element, marker_class: &str, handler: &Function) -> Result<usize> {
	let selector = FIELD_TAGS.iter().map(|tag| format!(".{} {}", marker_class, tag)).collect::<Vec<_>>().join(", ");
	let fields = root.query_selector_all(&selector).map_err(Error::request)?;

	for i in 0..fields.length() {
		if let Some(field) = fields.item(i) {
			// Re-adding an identical listener is a no-op in the DOM.
			if let Err(error) = field.add_event_listener_with_callback("change", handler) {
				error!("Failed to add change listener: {:?}", error);
			}
		}
	}
	trace!("Observing {} field(s).", fields.length());
	Ok(fields.length() as usize)
}

/// The submission of `field`'s form, targeting the container named by the enclosing marker element.
fn submission_for(field: &Element, marker_selector: &str, router: &ResponseRouter) -> Result<Option<RequestDescriptor>> {
	let form = match field.closest("form").map_err(Error::request)?.and_then(|form| form.dyn_into::<HtmlFormElement>().ok()) {
		Some(form) => form,
		None => return Ok(None),
	};
	let container_id = field
		.closest(marker_selector)
		.map_err(Error::request)?
		.and_then(|marker| marker.get_attribute(CONTAINER_ID_ATTRIBUTE));

	RequestDescriptor::for_submit(&form, None, container_id.as_deref(), router.config().container_header).map(Some)
}
