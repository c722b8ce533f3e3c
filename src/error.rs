use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can go wrong while firing an update request or applying its response.
///
/// None of these are fatal to the page. At worst a single container keeps its previous content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	/// No element with this id exists on the page at update time.
	#[error("no update container on the page with id {id:?}")]
	MissingContainer { id: String },

	/// An update container has no `data-updateUrl` to refresh itself from.
	#[error("update container {id:?} has no data-updateUrl attribute")]
	MissingUpdateUrl { id: String },

	/// `fetch` rejected, which usually means a network failure.
	#[error("request to {url} failed: {message}")]
	Transport { url: String, message: String },

	/// The server answered, but not with a 2xx status.
	#[error("request to {url} answered with status {status}")]
	Status { url: String, status: u16 },

	#[error("failed to read response body: {message}")]
	Decode { message: String },

	/// The browser refused to assemble the request (bad header value, malformed URL, …).
	#[error("failed to build request: {message}")]
	Request { message: String },

	#[error("no `window` or `document` available")]
	NoWindow,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Renders a thrown JS value for inclusion in an [`Error`].
pub(crate) fn describe(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

impl Error {
	pub(crate) fn request(value: JsValue) -> Self {
		Self::Request { message: describe(&value) }
	}

	pub(crate) fn decode(value: JsValue) -> Self {
		Self::Decode { message: describe(&value) }
	}

	/// Whether this concerns a single container rather than the request as a whole.
	#[must_use]
	pub fn is_missing_container(&self) -> bool {
		matches!(self, Self::MissingContainer { .. })
	}
}

impl From<Error> for JsValue {
	fn from(error: Error) -> Self {
		js_sys::Error::new(&error.to_string()).into()
	}
}
