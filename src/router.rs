use crate::{
	config::{MissingContainerPolicy, RouterConfig},
	container::{update_container, DispatchReport},
	envelope::{Part, Payload, ResponseEnvelope},
	error::{describe, Error, Result},
	request::RequestDescriptor,
};
use std::rc::Rc;
use tracing::{debug, error, info, instrument, trace, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{CustomEvent, CustomEventInit, Document, Window};

/// Fires update requests and splices their responses into the page's update containers.
///
/// Everything runs on the browser's event loop. Dispatches don't coordinate with each other:
/// if two in-flight requests target the same container, whichever response arrives last wins.
/// Only the part order within one multipart response is guaranteed.
#[derive(Debug, Clone)]
pub struct ResponseRouter {
	window: Window,
	document: Document,
	config: RouterConfig,
}

impl ResponseRouter {
	/// A router for the current page.
	///
	/// # Errors
	///
	/// [`Error::NoWindow`] outside of a document context (for example in a worker).
	pub fn new(config: RouterConfig) -> Result<Self> {
		let window = web_sys::window().ok_or(Error::NoWindow)?;
		let document = window.document().ok_or(Error::NoWindow)?;
		Ok(Self::with_document(window, document, config))
	}

	#[must_use]
	pub fn with_document(window: Window, document: Document, config: RouterConfig) -> Self {
		Self { window, document, config }
	}

	#[must_use]
	pub fn config(&self) -> &RouterConfig {
		&self.config
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// Fires `descriptor` and returns immediately.
	///
	/// The response is applied whenever it arrives. If the request fails, an `error!` is logged
	/// and a [***CustomEvent***](https://developer.mozilla.org/en-US/docs/Web/API/CustomEvent) named [`RouterConfig::error_event`]
	/// is dispatched on the document, with the error message as its `detail`.
	pub fn dispatch(self: &Rc<Self>, descriptor: RequestDescriptor) {
		let router = Rc::clone(self);
		spawn_local(async move {
			match router.run(&descriptor).await {
				Ok(report) => trace!(?report, "Dispatch complete."),
				Err(error) => router.report_failure(&error),
			}
		});
	}

	/// Fires `descriptor` and applies the response once it arrives.
	///
	/// There is no timeout: a request that never completes never resolves.
	///
	/// # Errors
	///
	/// Transport, status and decoding failures. A missing container is not an error here; see [`DispatchReport::missing`].
	#[instrument(skip(self, descriptor), fields(url = descriptor.target_url(), method = descriptor.method().as_str()))]
	pub async fn run(&self, descriptor: &RequestDescriptor) -> Result<DispatchReport> {
		let request = descriptor.to_web_request()?;
		let url = request.url();

		let response = JsFuture::from(self.window.fetch_with_request(&request))
			.await
			.map_err(|error| Error::Transport { url: url.clone(), message: describe(&error) })?;
		let response: web_sys::Response = response.dyn_into().map_err(|value| Error::Transport { url, message: describe(&value) })?;

		self.route(&response, descriptor.fallback_target_id()).await
	}

	/// Decodes an already received `response` and applies it.
	///
	/// # Errors
	///
	/// [`Error::Status`] for non-2xx responses (nothing is applied in that case) and decoding failures.
	pub async fn route(&self, response: &web_sys::Response, fallback_target_id: Option<&str>) -> Result<DispatchReport> {
		if !response.ok() {
			return Err(Error::Status {
				url: response.url(),
				status: response.status(),
			});
		}

		let envelope = ResponseEnvelope::decode(response).await?;
		Ok(self.apply(&envelope, fallback_target_id))
	}

	/// Writes a decoded response into the page.
	///
	/// Multipart parts go to the containers they name, in order; a plain response goes to `fallback_target_id`.
	/// Containers that can't be found are reported according to [`RouterConfig::missing_container`] and skipped.
	#[instrument(skip(self, envelope), fields(multipart = envelope.is_multipart()))]
	pub fn apply(&self, envelope: &ResponseEnvelope, fallback_target_id: Option<&str>) -> DispatchReport {
		let mut report = DispatchReport::default();
		match envelope.payload() {
			Payload::Multipart(parts) => {
				for Part { name, content } in parts {
					self.update(&mut report, name, content);
				}
			}
			Payload::Plain(content) => match fallback_target_id {
				Some(id) => self.update(&mut report, id, content),
				None => debug!("Plain response without a target container; Discarding {} byte(s).", content.len()),
			},
		}
		if !report.missing.is_empty() {
			info!("Updated {} container(s), {} missing.", report.updated.len(), report.missing.len());
		}
		report
	}

	fn update(&self, report: &mut DispatchReport, id: &str, content: &str) {
		match update_container(&self.document, id, content) {
			Ok(()) => report.updated.push(id.to_owned()),
			Err(error) => {
				self.report_missing(&error);
				report.missing.push(id.to_owned());
			}
		}
	}

	fn report_missing(&self, error: &Error) {
		match self.config.missing_container {
			MissingContainerPolicy::Log => warn!("{}", error),
			MissingContainerPolicy::Alert => {
				warn!("{}", error);
				if let Err(alert_error) = self.window.alert_with_message(&error.to_string()) {
					error!("Failed to show alert: {:?}", alert_error);
				}
			}
		}
	}

	#[allow(deprecated)] // Builder-style `CustomEventInit` setters, for older `web-sys` compatibility.
	fn report_failure(&self, failure: &Error) {
		error!("{}", failure);

		let mut init = CustomEventInit::new();
		init.detail(&JsValue::from_str(&failure.to_string()));
		let event = match CustomEvent::new_with_event_init_dict(&self.config.error_event, &init) {
			Ok(event) => event,
			Err(event_error) => return error!("Failed to create {:?} event: {:?}", self.config.error_event, event_error),
		};
		if let Err(event_error) = self.document.dispatch_event(&event) {
			error!("Failed to dispatch {:?} event: {:?}", self.config.error_event, event_error);
		}
	}
}
