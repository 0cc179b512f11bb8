//! Dashboard API client seam
//!
//! Tools talk to the Dashboard through the [`DashboardApi`] trait so the
//! HTTP implementation can be swapped for a stub in tests.

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// HTTPS client for the real Dashboard
pub mod http;
/// Canned-response client
pub mod mock;
/// Request description types
pub mod request;

pub use http::HttpDashboardClient;
pub use mock::MockDashboardApi;
pub use request::{ApiRequest, HttpMethod};

/// Performs one logical Dashboard API operation
///
/// Implementations decode the response body as JSON. An empty body decodes
/// to `Value::Null`; a paginated request returns the concatenated array.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Execute `request` and return the decoded JSON result
    async fn call(&self, request: ApiRequest) -> Result<Value>;
}
