//! Classifying and decoding update responses.
//!
//! A single endpoint can answer either with one fragment (any non-multipart content type, applied to the request's fallback container)
//! or with a `multipart/form-data` bundle whose part names are container ids.

use crate::error::{Error, Result};
use js_sys::Array;
use tracing::{instrument, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, FormData};

/// Whether a `content-type` value announces a multipart bundle.
///
/// This is a case-insensitive substring check, so parameters like `boundary=…` don't matter.
#[must_use]
pub fn is_multipart(content_type: &str) -> bool {
	content_type.to_ascii_lowercase().contains("multipart")
}

/// One named fragment of a multipart response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
	/// The `name` disposition parameter, which is the id of the container to update.
	pub name: String,
	pub content: String,
}

impl Part {
	#[must_use]
	pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
		Self { name: name.into(), content: content.into() }
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
	/// A single unnamed fragment.
	Plain(String),
	/// Named fragments, in the order the server sent them.
	Multipart(Vec<Part>),
}

/// A decoded update response. Only lives for one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
	content_type: Option<String>,
	payload: Payload,
}

impl ResponseEnvelope {
	#[must_use]
	pub fn plain(content_type: Option<String>, content: impl Into<String>) -> Self {
		Self {
			content_type,
			payload: Payload::Plain(content.into()),
		}
	}

	#[must_use]
	pub fn multipart(content_type: Option<String>, parts: Vec<Part>) -> Self {
		Self {
			content_type,
			payload: Payload::Multipart(parts),
		}
	}

	/// `None` if the response didn't say.
	#[must_use]
	pub fn content_type(&self) -> Option<&str> {
		self.content_type.as_deref()
	}

	#[must_use]
	pub fn is_multipart(&self) -> bool {
		matches!(self.payload, Payload::Multipart(_))
	}

	#[must_use]
	pub fn payload(&self) -> &Payload {
		&self.payload
	}

	#[must_use]
	pub fn into_payload(self) -> Payload {
		self.payload
	}

	/// Reads `response`'s body according to its `content-type`.
	///
	/// A response without a `content-type` is read as plain text (with a warning),
	/// since that is what a mislabelled single-fragment answer most likely is.
	#[instrument(skip(response), fields(url = %response.url()))]
	pub async fn decode(response: &web_sys::Response) -> Result<Self> {
		let content_type = response.headers().get("content-type").map_err(Error::decode)?;
		match content_type {
			Some(content_type) if is_multipart(&content_type) => {
				let parts = read_parts(response).await?;
				trace!("Decoded {} part(s).", parts.len());
				Ok(Self::multipart(Some(content_type), parts))
			}
			Some(content_type) => Ok(Self::plain(Some(content_type), read_text(response).await?)),
			None => {
				warn!("Response to {:?} has no content-type; Treating it as plain text.", response.url());
				Ok(Self::plain(None, read_text(response).await?))
			}
		}
	}
}

async fn read_text(response: &web_sys::Response) -> Result<String> {
	let text = JsFuture::from(response.text().map_err(Error::decode)?).await.map_err(Error::decode)?;
	text.as_string().ok_or_else(|| Error::Decode {
		message: "response text is not a string".to_owned(),
	})
}

/// Parses the body with the browser's own multipart parser, keeping part order.
async fn read_parts(response: &web_sys::Response) -> Result<Vec<Part>> {
	let form_data: FormData = JsFuture::from(response.form_data().map_err(Error::decode)?)
		.await
		.map_err(Error::decode)?
		.dyn_into()
		.map_err(Error::decode)?;

	let entries = match js_sys::try_iter(&form_data).map_err(Error::decode)? {
		Some(entries) => entries,
		None => return Ok(Vec::new()),
	};

	let mut parts = Vec::new();
	for entry in entries {
		let entry: Array = entry.map_err(Error::decode)?.unchecked_into();
		let name = entry.get(0).as_string().unwrap_or_default();
		let value = entry.get(1);
		let content = match value.as_string() {
			Some(content) => content,
			// Parts with a `filename` come back as `File`s.
			None => match value.dyn_ref::<Blob>() {
				Some(blob) => JsFuture::from(blob.text()).await.map_err(Error::decode)?.as_string().unwrap_or_default(),
				None => {
					warn!("Skipping part {:?} of unexpected type.", name);
					continue;
				}
			},
		};
		parts.push(Part { name, content });
	}
	Ok(parts)
}
