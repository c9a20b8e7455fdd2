//! Security middleware for HTTP request protection.
//!
//! Applies the CORS policy, a fixed set of protective response headers and a
//! request body size limit.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::http::header::{self, HeaderName, HeaderValue};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::middleware::DEFAULT_MAX_BODY_SIZE;

/// Tracing target for security middleware.
const TRACING_TARGET: &str = "catalog_server::middleware::security";

/// Default allowed origin for cross-origin requests.
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Extension trait for `axum::`[`Router`] to apply security middleware.
pub trait RouterSecurityExt<S> {
    /// Layers CORS, protective headers and body limits with the provided
    /// configurations.
    fn with_security(self, cors: &CorsConfig, headers: &SecurityHeadersConfig) -> Self;

    /// Layers security middlewares with default configurations.
    fn with_default_security(self) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, cors: &CorsConfig, headers: &SecurityHeadersConfig) -> Self {
        let cors_layer = CorsLayer::new()
            .allow_origin(cors.allow_origin())
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .max_age(cors.max_age());

        let router = self
            .layer(DefaultBodyLimit::max(DEFAULT_MAX_BODY_SIZE))
            .layer(RequestBodyLimitLayer::new(DEFAULT_MAX_BODY_SIZE))
            .layer(cors_layer);

        headers
            .header_values()
            .into_iter()
            .fold(router, |router, (name, value)| {
                router.layer(SetResponseHeaderLayer::overriding(name, value))
            })
    }

    fn with_default_security(self) -> Self {
        self.with_security(&CorsConfig::default(), &SecurityHeadersConfig::default())
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// Allowed CORS origins, comma-separated. `*` allows any origin.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "cors-origin",
            env = "CORS_ORIGIN",
            value_delimiter = ',',
            default_value = DEFAULT_CORS_ORIGIN
        )
    )]
    pub allowed_origins: Vec<String>,

    /// Maximum age for CORS preflight requests in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "CORS_MAX_AGE", default_value = "3600")
    )]
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![DEFAULT_CORS_ORIGIN.to_owned()],
            max_age_seconds: 3600,
        }
    }
}

impl CorsConfig {
    /// Creates a configuration allowing a single origin.
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            allowed_origins: vec![origin.into()],
            ..Self::default()
        }
    }

    /// Returns the CORS max age as a Duration.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Converts configured origins into header values.
    ///
    /// Blank and unparsable entries are skipped with a warning.
    pub fn to_header_values(&self) -> Vec<HeaderValue> {
        self.allowed_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        origin = %origin,
                        error = %err,
                        "Ignoring invalid CORS origin"
                    );
                    None
                }
            })
            .collect()
    }

    /// Returns the origin matcher for the CORS layer.
    pub fn allow_origin(&self) -> AllowOrigin {
        if self.allowed_origins.iter().any(|origin| origin.trim() == "*") {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(self.to_header_values())
        }
    }
}

/// Protective response headers applied to every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct SecurityHeadersConfig {
    /// HSTS max age in seconds.
    pub hsts_max_age_seconds: u64,

    /// Whether to include subdomains in HSTS policy.
    pub hsts_include_subdomains: bool,

    /// Content Security Policy directives.
    pub content_security_policy: Option<String>,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            hsts_max_age_seconds: 31_536_000,
            hsts_include_subdomains: true,
            content_security_policy: Some(
                "default-src 'self';\
                 base-uri 'self';\
                 font-src 'self' https: data:;\
                 form-action 'self';\
                 frame-ancestors 'self';\
                 img-src 'self' data:;\
                 object-src 'none';\
                 script-src 'self';\
                 script-src-attr 'none';\
                 style-src 'self' https: 'unsafe-inline';\
                 upgrade-insecure-requests"
                    .to_owned(),
            ),
        }
    }
}

impl SecurityHeadersConfig {
    /// Returns the HSTS header value as a string.
    pub fn hsts_header_value(&self) -> String {
        if self.hsts_include_subdomains {
            format!("max-age={}; includeSubDomains", self.hsts_max_age_seconds)
        } else {
            format!("max-age={}", self.hsts_max_age_seconds)
        }
    }

    /// Returns every header this configuration sets, in application order.
    pub fn header_values(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = vec![
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
            (
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("SAMEORIGIN"),
            ),
            (
                header::REFERRER_POLICY,
                HeaderValue::from_static("no-referrer"),
            ),
            (
                header::X_DNS_PREFETCH_CONTROL,
                HeaderValue::from_static("off"),
            ),
            (
                HeaderName::from_static("cross-origin-opener-policy"),
                HeaderValue::from_static("same-origin"),
            ),
            (
                HeaderName::from_static("cross-origin-resource-policy"),
                HeaderValue::from_static("same-origin"),
            ),
            (
                HeaderName::from_static("origin-agent-cluster"),
                HeaderValue::from_static("?1"),
            ),
            (
                HeaderName::from_static("x-permitted-cross-domain-policies"),
                HeaderValue::from_static("none"),
            ),
            (header::X_XSS_PROTECTION, HeaderValue::from_static("0")),
        ];

        if let Ok(hsts) = HeaderValue::from_str(&self.hsts_header_value()) {
            headers.push((header::STRICT_TRANSPORT_SECURITY, hsts));
        }

        match self
            .content_security_policy
            .as_deref()
            .map(HeaderValue::from_str)
        {
            Some(Ok(csp)) => headers.push((header::CONTENT_SECURITY_POLICY, csp)),
            Some(Err(err)) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %err,
                    "Ignoring invalid Content-Security-Policy"
                );
            }
            None => {}
        }

        headers
    }
}
