//! Explicit table of named update actions, populated when the page initializes.
//!
//! Each update container that can be refreshed by id gets an entry; links then refer to it by name
//! instead of reaching for globally installed functions.

use crate::{
	error::{Error, Result},
	request::RequestDescriptor,
	router::ResponseRouter,
};
use core::cell::RefCell;
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{trace, warn};

/// Invoked with the id of the element that triggered the update.
pub type UpdateCallback = Rc<dyn Fn(&str)>;

/// Attribute of an update container holding the URL its content is refreshed from.
pub const UPDATE_URL_ATTRIBUTE: &str = "data-updateUrl";

/// Query parameter naming the container to update.
pub const CONTAINER_QUERY_PARAMETER: &str = "_u";

thread_local! {
	static PAGE_REGISTRY: RefCell<UpdateRegistry> = RefCell::new(UpdateRegistry::new());
}

#[derive(Default)]
pub struct UpdateRegistry {
	callbacks: HashMap<String, UpdateCallback>,
}

impl core::fmt::Debug for UpdateRegistry {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_set().entries(self.callbacks.keys()).finish()
	}
}

impl UpdateRegistry {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Installs `callback` under `id`, returning the callback it replaces.
	pub fn register(&mut self, id: impl Into<String>, callback: impl Fn(&str) + 'static) -> Option<UpdateCallback> {
		let id = id.into();
		trace!(id = id.as_str(), "Registered update callback.");
		self.callbacks.insert(id, Rc::new(callback))
	}

	/// Registers the standard refresh for the update container `id`, fired through `router`.
	///
	/// See [`refresh_container`].
	pub fn register_container(&mut self, router: &Rc<ResponseRouter>, id: &str) -> Option<UpdateCallback> {
		let router = Rc::clone(router);
		let container_id = id.to_owned();
		self.register(id, move |element_id| {
			if let Err(error) = refresh_container(&router, &container_id, element_id) {
				warn!("{}", error);
			}
		})
	}

	pub fn unregister(&mut self, id: &str) -> Option<UpdateCallback> {
		self.callbacks.remove(id)
	}

	#[must_use]
	pub fn contains(&self, id: &str) -> bool {
		self.callbacks.contains_key(id)
	}

	#[must_use]
	pub fn get(&self, id: &str) -> Option<UpdateCallback> {
		self.callbacks.get(id).cloned()
	}

	/// Runs the callback registered under `id`, if any.
	///
	/// Returns whether one was found.
	pub fn invoke(&self, id: &str, element_id: &str) -> bool {
		match self.get(id) {
			Some(callback) => {
				callback(element_id);
				true
			}
			None => {
				warn!("No update registered for {:?}.", id);
				false
			}
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.callbacks.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.callbacks.is_empty()
	}
}

/// Refreshes the update container `container_id`: its `data-updateUrl` is retargeted at `element_id` and fired through `router`.
///
/// # Errors
///
/// [`Error::MissingContainer`] if the container isn't on the page, [`Error::MissingUpdateUrl`] if it has no `data-updateUrl`.
/// Nothing is dispatched in either case.
pub fn refresh_container(router: &Rc<ResponseRouter>, container_id: &str, element_id: &str) -> Result<()> {
	let container = router.document().get_element_by_id(container_id).ok_or_else(|| Error::MissingContainer { id: container_id.to_owned() })?;
	let base_url = container.get_attribute(UPDATE_URL_ATTRIBUTE).ok_or_else(|| Error::MissingUpdateUrl { id: container_id.to_owned() })?;

	let url = container_update_url(&base_url, element_id, container_id);
	router.dispatch(RequestDescriptor::for_link(&url, Some(container_id), router.config().container_header));
	Ok(())
}

/// Runs `f` with the registry shared by the page's exported entry points.
pub fn with_page_registry<R>(f: impl FnOnce(&mut UpdateRegistry) -> R) -> R {
	PAGE_REGISTRY.with(|registry| f(&mut registry.borrow_mut()))
}

/// Invokes an entry of the page registry.
///
/// The callback runs after the registry borrow is released, so it may register further updates.
pub fn invoke_page_update(id: &str, element_id: &str) -> bool {
	match with_page_registry(|registry| registry.get(id)) {
		Some(callback) => {
			callback(element_id);
			true
		}
		None => {
			warn!("No update registered for {:?}.", id);
			false
		}
	}
}

/// Derives the refresh URL for an update container.
///
/// The last path segment of `base_url` (the container's own element id) is replaced with `element_id`,
/// and the container is named in the `_u` query parameter.
///
/// ```
/// use ng_ajax::registry::container_update_url;
///
/// assert_eq!(
/// 	container_update_url("/wo/1/2.3", "2.5.1", "results"),
/// 	"/wo/1/2.5.1?_u=results",
/// );
/// ```
#[must_use]
pub fn container_update_url(base_url: &str, element_id: &str, container_id: &str) -> String {
	let prefix = match base_url.rfind('/') {
		Some(i) => &base_url[..=i],
		None => "",
	};
	format!("{}{}?{}={}", prefix, element_id, CONTAINER_QUERY_PARAMETER, container_id)
}
