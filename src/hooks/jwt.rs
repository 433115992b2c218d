//! Token verification hook.
//!
//! # Responsibilities
//! - Read a JWT from the `Authorization: Bearer` header or a cookie
//! - Reject revoked, malformed or unverifiable tokens
//! - Write the verified claims to `Context::user`
//!
//! # Outcomes
//! - Token absent: continue when optional, 400 `invalid_request` when required
//! - Wrong scheme: 400 `invalid_request`
//! - Revoked / malformed / failed verification: 401 `invalid_token` with a
//!   `WWW-Authenticate` header describing the failure
//!
//! # Design Decisions
//! - HS256 with a shared secret from config
//! - Claims are kept as raw JSON; the hook does not look users up

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::header;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{json, Value};

use crate::config::JwtConfig;
use crate::hooks::hook::{Hook, HookOutcome, HookResult};
use crate::http::{Context, HttpResponse};
use crate::services::ServiceManager;

/// Where the token is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// `Authorization: Bearer <token>`.
    Header,
    /// A cookie with the given name.
    Cookie(String),
}

type RevocationCheck = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Pre-hook verifying a JSON Web Token.
#[derive(Clone)]
pub struct JwtHook {
    required: bool,
    source: TokenSource,
    key: DecodingKey,
    validation: Validation,
    revoked: Option<RevocationCheck>,
}

impl JwtHook {
    fn new(required: bool, secret: &str) -> Self {
        // `exp` is checked when present but not demanded.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();

        Self {
            required,
            source: TokenSource::Header,
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            revoked: None,
        }
    }

    /// Reject requests without a valid token.
    pub fn required(secret: &str) -> Self {
        Self::new(true, secret)
    }

    /// Let requests without a token through; still reject invalid ones.
    pub fn optional(secret: &str) -> Self {
        Self::new(false, secret)
    }

    pub fn from_config(required: bool, config: &JwtConfig) -> Self {
        let mut hook = Self::new(required, &config.secret);
        hook.validation.leeway = config.leeway_secs;
        if config.cookie {
            hook.source = TokenSource::Cookie(config.cookie_name.clone());
        }
        hook
    }

    pub fn with_cookie(mut self, name: impl Into<String>) -> Self {
        self.source = TokenSource::Cookie(name.into());
        self
    }

    pub fn with_revocation_list<F>(mut self, is_revoked: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.revoked = Some(Arc::new(is_revoked));
        self
    }

    pub fn source(&self) -> &TokenSource {
        &self.source
    }

    /// Extract the raw token, or the outcome to return when there is none.
    fn token<'a>(&self, ctx: &'a Context) -> Result<&'a str, HookOutcome> {
        match &self.source {
            TokenSource::Cookie(name) => match ctx.cookie(name) {
                Some(content) if !content.is_empty() => Ok(content),
                _ => Err(self.missing("Auth cookie not found.")),
            },
            TokenSource::Header => {
                let authorization = ctx.header(header::AUTHORIZATION.as_str()).unwrap_or_default();
                if authorization.is_empty() {
                    return Err(self.missing("Authorization header not found."));
                }
                match authorization.split_once("Bearer ") {
                    Some((_, content)) if !content.is_empty() => Ok(content),
                    _ => Err(HookOutcome::Abort(invalid_request(
                        "Expected a bearer token. Scheme is Authorization: Bearer <token>.",
                    ))),
                }
            }
        }
    }

    fn missing(&self, description: &str) -> HookOutcome {
        if self.required {
            HookOutcome::Abort(invalid_request(description))
        } else {
            HookOutcome::Continue
        }
    }
}

impl fmt::Debug for JwtHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtHook")
            .field("required", &self.required)
            .field("source", &self.source)
            .field("revocation_list", &self.revoked.is_some())
            .finish()
    }
}

#[async_trait]
impl Hook for JwtHook {
    async fn call(&self, ctx: &mut Context, _services: &ServiceManager) -> HookResult {
        let token = match self.token(ctx) {
            Ok(token) => token,
            Err(outcome) => return Ok(outcome),
        };

        if let Some(is_revoked) = &self.revoked {
            if is_revoked(token) {
                return Ok(reject("jwt revoked"));
            }
        }

        if token.split('.').count() != 3 {
            return Ok(reject("jwt malformed"));
        }

        let claims = match decode::<Value>(token, &self.key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => return Ok(reject(&e.to_string())),
        };

        ctx.user = Some(claims);
        Ok(HookOutcome::Continue)
    }

    fn name(&self) -> &str {
        if self.required {
            "jwt_required"
        } else {
            "jwt_optional"
        }
    }
}

fn invalid_request(description: &str) -> HttpResponse {
    HttpResponse::bad_request(json!({
        "code": "invalid_request",
        "description": description,
    }))
}

fn reject(description: &str) -> HookOutcome {
    tracing::warn!(reason = %description, "Rejected bearer token");
    let response = HttpResponse::unauthorized(json!({
        "code": "invalid_token",
        "description": description,
    }))
    .with_header(
        header::WWW_AUTHENTICATE,
        &format!("error=\"invalid_token\", error_description=\"{}\"", description),
    );
    HookOutcome::Abort(response)
}
