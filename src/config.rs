use clap::Args;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/verify_for_frontend_extension_app";

/// Settings for talking to the verification backend.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Verification endpoint (POST {"text": ...})
    #[arg(long, env = "TRUTHGUARD_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: String,
    /// Per-request timeout
    #[arg(long, env = "TRUTHGUARD_TIMEOUT_MS", default_value_t = 60_000, global = true)]
    pub timeout_ms: u64,
    /// Requests per second allowed towards the backend
    #[arg(long, env = "TRUTHGUARD_QPS", default_value_t = 4, global = true)]
    pub qps: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_ms: 60_000,
            qps: 4,
        }
    }
}
