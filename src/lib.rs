//! `hubspot-http` is an async fluent request builder for bearer-authenticated
//! REST APIs such as HubSpot.
//!
//! A [`RequestBuilder`] accumulates method, endpoint, query parameters and an
//! optional JSON body, then [`RequestBuilder::execute`] sends it:
//! - transport failures are retried on a fixed [`BackoffSchedule`] (1s, 3s, 10s)
//! - HTTP error statuses are returned as ordinary responses
//! - the raw body is returned and kept on the builder with the status line,
//!   status code, headers and content length

mod error;
mod options;
mod query;
mod request;
mod retry;

pub use error::HubSpotError;
pub use options::RequestOptions;
pub use query::QueryParams;
pub use request::RequestBuilder;
pub use retry::BackoffSchedule;

pub type Result<T> = std::result::Result<T, HubSpotError>;
