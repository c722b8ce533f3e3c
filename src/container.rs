use crate::error::{Error, Result};
use tracing::trace;
use web_sys::Document;

/// Replaces the content of the element with id `id` with `content`, verbatim.
///
/// There is no sanitization and no diffing: the server is trusted and the whole content is replaced.
/// Elements are looked up on every call, as containers may have been replaced by earlier updates.
///
/// # Errors
///
/// [`Error::MissingContainer`] if there is no such element (including for an empty `id`).
pub fn update_container(document: &Document, id: &str, content: &str) -> Result<()> {
	let container = match document.get_element_by_id(id) {
		Some(container) if !id.is_empty() => container,
		_ => return Err(Error::MissingContainer { id: id.to_owned() }),
	};

	if cfg!(feature = "dangerous-logging") {
		trace!(id, content, "Updating container.");
	} else {
		trace!(id, len = content.len(), "Updating container.");
	}
	container.set_inner_html(content);
	Ok(())
}

/// What one dispatch did to the page, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
	pub updated: Vec<String>,
	pub missing: Vec<String>,
}

impl DispatchReport {
	/// No container was touched and none was missing.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.updated.is_empty() && self.missing.is_empty()
	}

	#[must_use]
	pub fn is_complete(&self) -> bool {
		self.missing.is_empty()
	}
}
