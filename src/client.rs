use async_trait::async_trait;
use futures::{stream, StreamExt};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::CheckError;
use crate::normalize::normalize;
use crate::types::{CheckRequest, Normalized};

/// Anything that can send text to the verification backend and hand back its raw answer.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, text: &str) -> Result<Value, CheckError>;
}

pub struct HttpVerifier {
    http: Client,
    endpoint: String,
    limiter: DefaultDirectRateLimiter,
}

impl HttpVerifier {
    pub fn new(cfg: &ClientConfig) -> Result<Self, CheckError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()?;
        let qps = NonZeroU32::new(cfg.qps).unwrap_or(nonzero!(1u32));
        let limiter = RateLimiter::direct(Quota::per_second(qps));
        Ok(Self { http, endpoint: cfg.endpoint.clone(), limiter })
    }
}

#[async_trait]
impl Verifier for HttpVerifier {
    async fn verify(&self, text: &str) -> Result<Value, CheckError> {
        self.limiter.until_ready().await;
        debug!(endpoint = %self.endpoint, chars = text.chars().count(), "posting text for verification");
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&CheckRequest { text: text.to_string() })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CheckError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }
        Ok(resp.json::<Value>().await?)
    }
}

/// One round trip: reject blank text, ask the backend, normalize the answer.
pub async fn check_text(verifier: &dyn Verifier, text: &str) -> Result<Normalized, CheckError> {
    if text.trim().is_empty() {
        return Err(CheckError::EmptyText);
    }
    let raw = verifier.verify(text).await?;
    Ok(normalize(&raw))
}

/// Checks many texts with at most `concurrency` requests in flight.
/// Output order matches input order; failed round trips become error results.
pub async fn check_many(
    verifier: &dyn Verifier,
    texts: Vec<String>,
    concurrency: usize,
) -> Vec<Normalized> {
    let total = texts.len();
    let tasks = texts.into_iter().enumerate().map(|(idx, text)| async move {
        let out = match check_text(verifier, &text).await {
            Ok(n) => n,
            Err(e) => {
                warn!(idx, error = %e, "verification failed");
                Normalized::error(e.to_string())
            }
        };
        (idx, out)
    });

    let mut out = stream::iter(tasks)
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<_>>()
        .await;
    out.sort_by_key(|(idx, _)| *idx);

    let failed = out.iter().filter(|(_, n)| n.error_message().is_some()).count();
    info!(total, failed, "batch verification finished");
    out.into_iter().map(|(_, n)| n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoVerifier;

    #[async_trait]
    impl Verifier for EchoVerifier {
        async fn verify(&self, text: &str) -> Result<Value, CheckError> {
            if text == "boom" {
                return Err(CheckError::Status { status: 500, reason: "Internal Server Error".into() });
            }
            // Later inputs answer sooner so completion order differs from input order.
            let delay = 30u64.saturating_sub(text.len() as u64);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(json!({ "result": { "verdict": text } }))
        }
    }

    #[tokio::test]
    async fn blank_text_is_rejected() {
        let err = check_text(&EchoVerifier, "   ").await.unwrap_err();
        assert!(matches!(err, CheckError::EmptyText));
    }

    #[tokio::test]
    async fn check_text_normalizes() {
        let out = check_text(&EchoVerifier, "True").await.unwrap();
        assert_eq!(out.verdict().unwrap().verdict, "true");
    }

    #[tokio::test]
    async fn batch_keeps_input_order_and_reports_failures() {
        let texts = vec!["a".to_string(), "boom".to_string(), "a longer claim".to_string(), "".to_string()];
        let out = check_many(&EchoVerifier, texts, 4).await;
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].verdict().unwrap().verdict, "a");
        assert_eq!(out[1].error_message(), Some("API request failed: 500 Internal Server Error"));
        assert_eq!(out[2].verdict().unwrap().verdict, "a longer claim");
        assert_eq!(out[3].error_message(), Some("text to verify is empty"));
    }
}
