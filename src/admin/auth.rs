use async_trait::async_trait;
use axum::http::header;
use serde_json::json;

use crate::hooks::{Hook, HookOutcome, HookResult};
use crate::http::{Context, HttpResponse};
use crate::services::ServiceManager;

/// Pre-hook requiring `Authorization: Bearer <api key>`.
pub struct ApiKeyHook {
    expected: String,
}

impl ApiKeyHook {
    pub fn new(api_key: &str) -> Self {
        Self {
            expected: format!("Bearer {}", api_key),
        }
    }
}

#[async_trait]
impl Hook for ApiKeyHook {
    async fn call(&self, ctx: &mut Context, _services: &ServiceManager) -> HookResult {
        if ctx.header(header::AUTHORIZATION.as_str()) == Some(self.expected.as_str()) {
            return Ok(HookOutcome::Continue);
        }
        Ok(HookOutcome::Abort(HttpResponse::unauthorized(json!({
            "code": "unauthorized",
            "description": "Missing or invalid API key.",
        }))))
    }

    fn name(&self) -> &str {
        "api_key"
    }
}
