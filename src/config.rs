//! Router configuration.
//!
//! Everything here has a sensible [`Default`], so pages that just call the exported entry points never need to touch it.

/// Current name of the header that tells the server which update container(s) a request targets.
pub const CONTAINER_HEADER: &str = "ng-container-id";

/// Header name understood by older servers.
pub const LEGACY_CONTAINER_HEADER: &str = "x-updatecontainerid";

/// Class of elements whose descendant fields submit their form on change.
pub const OBSERVE_MARKER_CLASS: &str = "ng-observe-descendant-fields";

/// Name of the [***CustomEvent***](https://developer.mozilla.org/en-US/docs/Web/API/CustomEvent) dispatched on the document when a fire-and-forget request fails.
pub const ERROR_EVENT: &str = "ng-ajax-error";

/// Which header(s) carry the targeted container ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerHeader {
	/// [`CONTAINER_HEADER`] only.
	Current,
	/// [`LEGACY_CONTAINER_HEADER`] only.
	Legacy,
	/// Both, for deployments that are mid-migration.
	Both,
}

impl ContainerHeader {
	#[must_use]
	pub fn names(self) -> &'static [&'static str] {
		match self {
			ContainerHeader::Current => &[CONTAINER_HEADER],
			ContainerHeader::Legacy => &[LEGACY_CONTAINER_HEADER],
			ContainerHeader::Both => &[CONTAINER_HEADER, LEGACY_CONTAINER_HEADER],
		}
	}
}

impl Default for ContainerHeader {
	fn default() -> Self {
		if cfg!(feature = "legacy-header") {
			ContainerHeader::Legacy
		} else {
			ContainerHeader::Current
		}
	}
}

/// What happens when a response targets a container that isn't on the page.
///
/// Either way, the remaining parts of the response are still applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingContainerPolicy {
	/// Blocking `window.alert(…)`, naming the missing id.
	Alert,
	/// A `warn!` log record.
	Log,
}

impl Default for MissingContainerPolicy {
	fn default() -> Self {
		MissingContainerPolicy::Log
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
	pub container_header: ContainerHeader,
	pub missing_container: MissingContainerPolicy,
	pub error_event: String,
	pub observe_marker_class: String,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			container_header: ContainerHeader::default(),
			missing_container: MissingContainerPolicy::default(),
			error_event: ERROR_EVENT.to_owned(),
			observe_marker_class: OBSERVE_MARKER_CLASS.to_owned(),
		}
	}
}

impl RouterConfig {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn container_header(mut self, container_header: ContainerHeader) -> Self {
		self.container_header = container_header;
		self
	}

	#[must_use]
	pub fn missing_container(mut self, policy: MissingContainerPolicy) -> Self {
		self.missing_container = policy;
		self
	}

	#[must_use]
	pub fn error_event(mut self, name: impl Into<String>) -> Self {
		self.error_event = name.into();
		self
	}

	#[must_use]
	pub fn observe_marker_class(mut self, class: impl Into<String>) -> Self {
		self.observe_marker_class = class.into();
		self
	}
}
