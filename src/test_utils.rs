//! Shared helpers for integration-style tests: configs pointed at mock
//! servers and a ready-to-use test server wrapping the full router.

use crate::{Application, Config};

/// A config suitable for tests: authentication disabled, no webhook endpoint.
pub fn create_test_config() -> Config {
    Config {
        auth: crate::config::AuthConfig {
            api_key: None,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// A test config whose webhook endpoint points at the given URL (usually a
/// `wiremock::MockServer`).
pub fn create_test_config_with_webhook(endpoint: &str) -> Config {
    let mut config = create_test_config();
    config.webhook.endpoint = Some(endpoint.parse().expect("invalid webhook url"));
    config
}

/// Build the application and wrap it in an `axum_test::TestServer`.
pub fn create_test_app(config: Config) -> axum_test::TestServer {
    Application::new(config)
        .expect("Failed to build application")
        .into_test_server()
}
