//! Immutable descriptions of the requests fired by link clicks and form submissions.

use crate::{
	config::ContainerHeader,
	error::{Error, Result},
};
use hashbrown::HashMap;
use js_sys::Array;
use tracing::{debug, instrument, trace};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, FormData, Headers, HtmlButtonElement, HtmlFormElement, HtmlInputElement, RequestInit, UrlSearchParams};

/// Separates container ids when a request targets more than one of them.
///
/// The server renders the outermost container among those listed.
pub const CONTAINER_ID_SEPARATOR: &str = ";";

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
	Get,
	Post,
}

impl Method {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}

	/// Interprets a form's [***method***](https://developer.mozilla.org/en-US/docs/Web/API/HTMLFormElement/method).
	///
	/// Only `post` (in any case) submits a body. Everything else, including `dialog`, is treated as `GET`.
	#[must_use]
	pub fn from_form_method(method: &str) -> Self {
		if method.trim().eq_ignore_ascii_case("post") {
			Method::Post
		} else {
			Method::Get
		}
	}
}

/// Everything needed to issue one update request.
///
/// Created per user gesture, consumed by a single dispatch and then discarded.
/// There are no setters: use [`RequestDescriptor::get`], [`RequestDescriptor::post`] or one of the gesture constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
	target_url: String,
	method: Method,
	body: Vec<(String, String)>,
	headers: HashMap<String, String>,
	container_ids: Vec<String>,
}

impl RequestDescriptor {
	#[must_use]
	pub fn get(target_url: impl Into<String>) -> RequestBuilder {
		RequestBuilder::new(Method::Get, target_url)
	}

	#[must_use]
	pub fn post(target_url: impl Into<String>) -> RequestBuilder {
		RequestBuilder::new(Method::Post, target_url)
	}

	/// What an `AjaxUpdateLink` fires: a plain `GET` of the component action URL.
	#[must_use]
	pub fn for_link(url: &str, container_id: Option<&str>, container_header: ContainerHeader) -> Self {
		let mut builder = Self::get(url).container_header(container_header);
		if let Some(id) = container_id {
			builder = builder.container(id);
		}
		builder.build()
	}

	/// What an `AjaxSubmitButton` fires: the containing form's fields, sent to its action with its method.
	///
	/// Scripted submissions don't include the activated control, so the `submitter`'s name and value are appended after the form's own fields.
	/// That is how the server tells which button was pressed.
	#[instrument(skip(form, submitter))]
	pub fn for_submit(form: &HtmlFormElement, submitter: Option<&Element>, container_id: Option<&str>, container_header: ContainerHeader) -> Result<Self> {
		let mut builder = RequestBuilder::new(Method::from_form_method(&form.method()), form.action())
			.container_header(container_header)
			.fields(form_fields(form)?);

		if let Some((name, value)) = submitter.and_then(submitter_field) {
			builder = builder.field(name, value);
		}
		if let Some(id) = container_id {
			builder = builder.container(id);
		}
		Ok(builder.build())
	}

	#[must_use]
	pub fn target_url(&self) -> &str {
		&self.target_url
	}

	#[must_use]
	pub fn method(&self) -> Method {
		self.method
	}

	#[must_use]
	pub fn body(&self) -> &[(String, String)] {
		&self.body
	}

	/// Header names are lowercase.
	#[must_use]
	pub fn headers(&self) -> &HashMap<String, String> {
		&self.headers
	}

	#[must_use]
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name.to_ascii_lowercase().as_str()).map(String::as_str)
	}

	#[must_use]
	pub fn container_ids(&self) -> &[String] {
		&self.container_ids
	}

	/// The container that receives a plain (non-multipart) response.
	#[must_use]
	pub fn fallback_target_id(&self) -> Option<&str> {
		self.container_ids.first().map(String::as_str)
	}

	/// The URL that is actually requested.
	///
	/// `GET` requests can't have a body, so their form fields are moved into the query string.
	pub fn request_url(&self) -> Result<String> {
		match self.method {
			Method::Get if !self.body.is_empty() => Ok(append_query(&self.target_url, &self.encoded_body()?)),
			_ => Ok(self.target_url.clone()),
		}
	}

	/// The form fields, `application/x-www-form-urlencoded`.
	pub fn encoded_body(&self) -> Result<String> {
		let params = UrlSearchParams::new().map_err(Error::request)?;
		for (name, value) in &self.body {
			params.append(name, value);
		}
		Ok(params.to_string().into())
	}

	/// The `fetch`able request, with form fields encoded according to the method.
	#[allow(deprecated)] // Builder-style `RequestInit` setters, for older `web-sys` compatibility.
	pub fn to_web_request(&self) -> Result<web_sys::Request> {
		let headers = Headers::new().map_err(Error::request)?;
		for (name, value) in &self.headers {
			headers.append(name, value).map_err(Error::request)?;
		}

		let mut init = RequestInit::new();
		init.method(self.method.as_str());
		if self.method == Method::Post && !self.body.is_empty() {
			headers.set("content-type", FORM_URLENCODED).map_err(Error::request)?;
			init.body(Some(&JsValue::from_str(&self.encoded_body()?)));
		}
		init.headers(headers.as_ref());

		web_sys::Request::new_with_str_and_init(&self.request_url()?, &init).map_err(Error::request)
	}
}

#[derive(Debug, Clone)]
pub struct RequestBuilder {
	descriptor: RequestDescriptor,
	container_header: ContainerHeader,
}

impl RequestBuilder {
	#[must_use]
	pub fn new(method: Method, target_url: impl Into<String>) -> Self {
		Self {
			descriptor: RequestDescriptor {
				target_url: target_url.into(),
				method,
				body: Vec::new(),
				headers: HashMap::new(),
				container_ids: Vec::new(),
			},
			container_header: ContainerHeader::default(),
		}
	}

	/// Adds a targeted container. The first one added is the fallback target.
	///
	/// An empty id means no target and is ignored.
	#[must_use]
	pub fn container(mut self, id: impl Into<String>) -> Self {
		let id = id.into();
		if !id.is_empty() {
			self.descriptor.container_ids.push(id);
		}
		self
	}

	#[must_use]
	pub fn container_header(mut self, container_header: ContainerHeader) -> Self {
		self.container_header = container_header;
		self
	}

	#[must_use]
	pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.descriptor.body.push((name.into(), value.into()));
		self
	}

	#[must_use]
	pub fn fields(mut self, fields: impl IntoIterator<Item = (String, String)>) -> Self {
		self.descriptor.body.extend(fields);
		self
	}

	/// Sets an additional request header. Names are case-insensitive; a later value replaces an earlier one.
	#[must_use]
	pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
		self.descriptor.headers.insert(name.to_ascii_lowercase(), value.into());
		self
	}

	#[must_use]
	pub fn build(mut self) -> RequestDescriptor {
		if !self.descriptor.container_ids.is_empty() {
			let ids = self.descriptor.container_ids.join(CONTAINER_ID_SEPARATOR);
			for name in self.container_header.names() {
				self.descriptor.headers.insert((*name).to_owned(), ids.clone());
			}
		}
		self.descriptor
	}
}

/// Appends an already encoded query to `url`, keeping any query it already has.
#[must_use]
pub fn append_query(url: &str, encoded: &str) -> String {
	if encoded.is_empty() {
		return url.to_owned();
	}
	let (base, fragment) = match url.find('#') {
		Some(i) => url.split_at(i),
		None => (url, ""),
	};
	let separator = if !base.contains('?') {
		"?"
	} else if base.ends_with('?') || base.ends_with('&') {
		""
	} else {
		"&"
	};
	format!("{}{}{}{}", base, separator, encoded, fragment)
}

/// The form's successful controls, in document order.
///
/// File inputs can't be urlencoded and are skipped.
fn form_fields(form: &HtmlFormElement) -> Result<Vec<(String, String)>> {
	let form_data = FormData::new_with_form(form).map_err(Error::request)?;
	let entries = match js_sys::try_iter(&form_data).map_err(Error::request)? {
		Some(entries) => entries,
		None => return Ok(Vec::new()),
	};

	let mut fields = Vec::new();
	for entry in entries {
		let entry: Array = entry.map_err(Error::request)?.unchecked_into();
		let name = entry.get(0).as_string().unwrap_or_default();
		match entry.get(1).as_string() {
			Some(value) => {
				if cfg!(feature = "dangerous-logging") {
					trace!(name = name.as_str(), value = value.as_str(), "form field");
				}
				fields.push((name, value))
			}
			None => debug!("Skipping non-text form field {:?}.", name),
		}
	}
	Ok(fields)
}

fn submitter_field(submitter: &Element) -> Option<(String, String)> {
	let (name, value) = if let Some(input) = submitter.dyn_ref::<HtmlInputElement>() {
		(input.name(), input.value())
	} else if let Some(button) = submitter.dyn_ref::<HtmlButtonElement>() {
		(button.name(), button.value())
	} else {
		(submitter.get_attribute("name")?, submitter.get_attribute("value").unwrap_or_default())
	};

	if name.is_empty() {
		None
	} else {
		Some((name, value))
	}
}
