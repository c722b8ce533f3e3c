//! Browser-side AJAX partial page updates.
//!
//! A link click or form submission becomes a [`RequestDescriptor`](`request::RequestDescriptor`),
//! which a [`ResponseRouter`](`router::ResponseRouter`) fires with `fetch`.
//! The response is then spliced into the page's update containers: a plain response replaces the content of the request's fallback container,
//! while each part of a `multipart/form-data` response replaces the content of the container named like the part.
//!
//! The [`bindings`] are what server-rendered markup calls into.

#![doc(html_root_url = "https://docs.rs/ng-ajax/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod bindings;
pub mod config;
pub mod container;
pub mod envelope;
pub mod error;
pub mod observe;
pub mod registry;
pub mod request;
pub mod router;

pub use config::RouterConfig;
pub use envelope::ResponseEnvelope;
pub use error::{Error, Result};
pub use request::RequestDescriptor;
pub use router::ResponseRouter;
