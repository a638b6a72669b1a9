//! Service configuration.

/// Service configuration shared by the store and the HTTP layer.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Seed the store with the example user, course, and enrollment
    pub seed_example_data: bool,
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Maximum accepted request body size in bytes
    pub max_request_body_bytes: usize,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            seed_example_data: true,
            request_timeout_ms: 5000,
            max_request_body_bytes: 64 * 1024,
        }
    }
}
