#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use truthguard_rs::client::Verifier;
use truthguard_rs::error::CheckError;

/// Returns the same canned backend answer for every text.
pub struct FakeVerifier {
    pub response: Value,
}

#[async_trait]
impl Verifier for FakeVerifier {
    async fn verify(&self, _text: &str) -> Result<Value, CheckError> {
        Ok(self.response.clone())
    }
}

/// Always fails the way an unhealthy backend would.
pub struct FailingVerifier {
    pub status: u16,
}

#[async_trait]
impl Verifier for FailingVerifier {
    async fn verify(&self, _text: &str) -> Result<Value, CheckError> {
        Err(CheckError::Status { status: self.status, reason: "Service Unavailable".into() })
    }
}

pub fn fixture(name: &str) -> Value {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let body = std::fs::read_to_string(&path).unwrap();
    serde_json::from_str(&body).unwrap()
}
