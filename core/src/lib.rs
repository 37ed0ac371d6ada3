//! Synchronous client core for a marketplace seller API.
//!
//! # Overview
//! Builds authenticated JSON requests for four seller operations (price
//! import, stock import, product list, price info) and reshapes the
//! provider's responses into simpler values. Network I/O is injected through
//! the `Fetch` trait; every operation performs exactly one round-trip and
//! never retries.
//!
//! # Design
//! - `SellerClient` holds only its resolved `ClientConfig`.
//! - Each operation is split into `build_*` / `parse_*`, with a convenience
//!   method that runs both around one `Fetch::fetch` call.
//! - Batch imports report per-item rejections as data
//!   (`UpdateOutcome::errors`); only call-level failures are `Err`.
//! - Test-mode credentials come from a caller-supplied `TestProfile`.

pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
mod request;
pub mod types;

pub use batch::extract_batch_errors;
pub use client::SellerClient;
pub use config::{ClientConfig, ClientOptions, Credentials, Environment, TestProfile};
pub use error::ApiError;
#[cfg(feature = "ureq")]
pub use http::UreqFetch;
pub use http::{Fetch, HttpMethod, HttpRequest, HttpResponse};
pub use request::{query_string, QueryParams};
pub use types::{
    BatchError, ErrorCode, ListCriteria, PriceItem, PricePage, PriceRow, ProductListFilter,
    StockItem, UpdateOutcome, UpdateStatus,
};
