//! Client for the clickhouse-sinker management API.
//!
//! [`SinkerApi`] is the seam the console talks to; [`HttpClient`] is the
//! reqwest-backed implementation used against a live sinker.

mod api;
pub use api::SinkerApi;

mod config;
pub use config::ClientConfig;

mod errors;
pub use errors::ClientError;

mod http;
pub use http::HttpClient;
