//! API server configuration.

/// Configuration for the API server.
///
/// Built by the server binary from CLI flags and the environment
/// (`PORT`, `DATABASE_URL`, `JWT_SECRET_KEY`).
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "0.0.0.0:8080").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
}

impl ApiConfig {
    /// Signing secret as raw bytes.
    pub fn secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}
