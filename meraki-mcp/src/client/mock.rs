//! In-memory [`DashboardApi`] for tests and dry runs

use super::{ApiRequest, DashboardApi};
use crate::error::{MerakiMcpError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Reply {
    Value(Value),
    Failure { status: u16, message: String },
}

/// A stub Dashboard that records requests and answers with a canned reply
#[derive(Debug)]
pub struct MockDashboardApi {
    reply: Reply,
    delay: Option<Duration>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockDashboardApi {
    /// Answer every call with `value`
    pub fn returning(value: Value) -> Self {
        Self {
            reply: Reply::Value(value),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with an API error
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self {
            reply: Reply::Failure {
                status,
                message: message.into(),
            },
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl DashboardApi for MockDashboardApi {
    async fn call(&self, request: ApiRequest) -> Result<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            Reply::Value(value) => Ok(value.clone()),
            Reply::Failure { status, message } => Err(MerakiMcpError::Api {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_records_calls() {
        let api = MockDashboardApi::returning(json!({"ok": true}));
        let value = api.call(ApiRequest::get("/organizations")).await.unwrap();

        assert_eq!(value, json!({"ok": true}));
        assert_eq!(api.call_count(), 1);
        assert_eq!(api.calls()[0].path, "/organizations");
    }

    #[tokio::test]
    async fn test_failing() {
        let api = MockDashboardApi::failing(500, "boom");
        let err = api.call(ApiRequest::get("/x")).await.unwrap_err();
        assert!(matches!(err, MerakiMcpError::Api { status: 500, .. }));
    }
}
