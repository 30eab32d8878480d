//! Donation checkout.
//!
//! A thin client for the hosted-checkout provider: one POST carrying the
//! donation amount, one JSON response carrying the redirect URL. Transport
//! sits behind a trait so tests stub the provider instead of the network.
//! Missing configuration and provider failures surface as distinct errors,
//! since the user-facing messages differ.

use serde_json::json;
use tracing::{debug, error};

use crate::error::{BoothError, BoothResult};

pub const API_KEY_ENV: &str = "CHECKOUT_API_KEY";
pub const DOMAIN_ENV: &str = "BOOTH_DOMAIN_URL";
const DEFAULT_DOMAIN: &str = "https://freephotobooth.app";
const DEFAULT_ENDPOINT: &str = "https://api.checkout.example/v1/sessions";

#[derive(Clone, Debug)]
pub struct CheckoutConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutConfig {
    pub fn from_env() -> Self {
        let domain = std::env::var(DOMAIN_ENV).unwrap_or_else(|_| DEFAULT_DOMAIN.to_string());
        Self {
            api_key: std::env::var(API_KEY_ENV).ok(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            success_url: format!("{domain}/donate/success"),
            cancel_url: format!("{domain}/donate?canceled=true"),
        }
    }
}

pub trait CheckoutTransport {
    /// POSTs `body` as JSON with a bearer key, returning the parsed
    /// response body.
    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> BoothResult<serde_json::Value>;
}

/// Production transport over `ureq`.
pub struct HttpTransport;

impl CheckoutTransport for HttpTransport {
    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> BoothResult<serde_json::Value> {
        let mut response = ureq::post(url)
            .header("Authorization", &format!("Bearer {api_key}"))
            .send_json(body)
            .map_err(|e| BoothError::PaymentProvider(format!("checkout request failed: {e}")))?;
        response
            .body_mut()
            .read_json::<serde_json::Value>()
            .map_err(|e| BoothError::PaymentProvider(format!("malformed provider response: {e}")))
    }
}

pub struct CheckoutClient<T: CheckoutTransport> {
    config: CheckoutConfig,
    transport: T,
}

impl CheckoutClient<HttpTransport> {
    pub fn from_env() -> Self {
        Self::with_transport(CheckoutConfig::from_env(), HttpTransport)
    }
}

impl<T: CheckoutTransport> CheckoutClient<T> {
    pub fn with_transport(config: CheckoutConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Creates a checkout session for a whole-dollar donation and returns
    /// the redirect URL.
    pub fn create_session(&self, amount: f64) -> BoothResult<String> {
        if !amount.is_finite() || amount < 1.0 {
            return Err(BoothError::validation(
                "donation amount must be at least 1",
            ));
        }
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            error!("checkout API key is not configured");
            BoothError::PaymentMisconfigured(format!("{API_KEY_ENV} is not set"))
        })?;

        let unit_amount = (amount * 100.0).round() as i64;
        let body = json!({
            "amount": amount,
            "unit_amount": unit_amount,
            "currency": "usd",
            "name": format!("Support ${amount}"),
            "success_url": self.config.success_url,
            "cancel_url": self.config.cancel_url,
        });

        debug!(amount, endpoint = %self.config.endpoint, "creating checkout session");
        let response = self
            .transport
            .post_json(&self.config.endpoint, api_key, &body)?;

        response
            .get("url")
            .and_then(|u| u.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                BoothError::PaymentProvider("provider response is missing 'url'".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubTransport {
        response: serde_json::Value,
        seen: RefCell<Vec<serde_json::Value>>,
    }

    impl CheckoutTransport for StubTransport {
        fn post_json(
            &self,
            _url: &str,
            _api_key: &str,
            body: &serde_json::Value,
        ) -> BoothResult<serde_json::Value> {
            self.seen.borrow_mut().push(body.clone());
            Ok(self.response.clone())
        }
    }

    fn config(with_key: bool) -> CheckoutConfig {
        CheckoutConfig {
            api_key: with_key.then(|| "sk_test_x".to_string()),
            endpoint: "https://example.test/sessions".to_string(),
            success_url: "https://example.test/donate/success".to_string(),
            cancel_url: "https://example.test/donate?canceled=true".to_string(),
        }
    }

    #[test]
    fn returns_redirect_url_and_sends_cents() {
        let transport = StubTransport {
            response: json!({ "url": "https://pay.example/s/123" }),
            seen: RefCell::new(Vec::new()),
        };
        let client = CheckoutClient::with_transport(config(true), transport);
        let url = client.create_session(5.0).unwrap();
        assert_eq!(url, "https://pay.example/s/123");
        let sent = client.transport.seen.borrow();
        assert_eq!(sent[0]["unit_amount"], 500);
    }

    #[test]
    fn rejects_amount_below_one_before_any_request() {
        let transport = StubTransport {
            response: json!({}),
            seen: RefCell::new(Vec::new()),
        };
        let client = CheckoutClient::with_transport(config(true), transport);
        assert!(matches!(
            client.create_session(0.5).unwrap_err(),
            BoothError::Validation(_)
        ));
        assert!(client.transport.seen.borrow().is_empty());
    }

    #[test]
    fn missing_key_is_misconfiguration() {
        let transport = StubTransport {
            response: json!({}),
            seen: RefCell::new(Vec::new()),
        };
        let client = CheckoutClient::with_transport(config(false), transport);
        assert!(matches!(
            client.create_session(2.0).unwrap_err(),
            BoothError::PaymentMisconfigured(_)
        ));
    }

    #[test]
    fn response_without_url_is_a_provider_error() {
        let transport = StubTransport {
            response: json!({ "id": "sess_1" }),
            seen: RefCell::new(Vec::new()),
        };
        let client = CheckoutClient::with_transport(config(true), transport);
        assert!(matches!(
            client.create_session(2.0).unwrap_err(),
            BoothError::PaymentProvider(_)
        ));
    }
}
