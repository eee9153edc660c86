//! Data, HTTP and view-state layer of the compliance dashboard.
//!
//! Everything here runs natively as well as in the browser; the Leptos app
//! in `compliance-ui` only supplies a fetch-backed [`http::Transport`] and a
//! signal-backed [`store::Store`].

pub mod cancel;
pub mod client;
pub mod config;
pub mod detail;
pub mod dto;
pub mod error;
pub mod filter;
pub mod http;
pub mod list;
pub mod route;
pub mod store;

pub use cancel::CancelToken;
pub use client::{ComplianceClient, StatusUpdate};
pub use config::ApiConfig;
pub use error::FetchError;
