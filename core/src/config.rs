//! Credential and endpoint selection.
//!
//! Resolution happens once, in `ClientConfig::resolve`; a resolved config is
//! immutable and there is no way to re-run it on the same value. Test-mode
//! credentials are never compiled in: they arrive in a `TestProfile` supplied
//! by the caller or read from the environment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const PRODUCTION_BASE_URL: &str = "http://api-seller.ozon.ru/";
pub const TEST_BASE_URL: &str = "http://cb-api.ozonru.me/";

/// Which endpoint profile a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Test,
}

/// Seller account id plus secret key, sent as `Client-Id` / `Api-Key`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub account_id: String,
    pub api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_id", &self.account_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// The fixed credential/endpoint profile used when `use_test_api` is set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestProfile {
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default = "default_test_base_url")]
    pub base_url: String,
}

fn default_test_base_url() -> String {
    TEST_BASE_URL.to_string()
}

impl TestProfile {
    pub fn new(account_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials {
                account_id: account_id.into(),
                api_key: api_key.into(),
            },
            base_url: default_test_base_url(),
        }
    }
}

/// Caller-facing constructor input.
///
/// Either `use_test_api` is set (and `test_profile` supplies the test
/// credentials), or both `account_id` and `api_key` are present and
/// non-empty.
#[derive(Clone, Default, Deserialize)]
pub struct ClientOptions {
    pub account_id: Option<String>,
    pub api_key: Option<String>,
    #[serde(default)]
    pub use_test_api: bool,
    pub test_profile: Option<TestProfile>,
    /// Replaces the profile's base URL verbatim, e.g. to target a mock server.
    pub base_url_override: Option<String>,
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("account_id", &self.account_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("use_test_api", &self.use_test_api)
            .field("test_profile", &self.test_profile)
            .field("base_url_override", &self.base_url_override)
            .finish()
    }
}

impl ClientOptions {
    pub fn production(account_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            account_id: Some(account_id.into()),
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    pub fn test(profile: TestProfile) -> Self {
        Self {
            use_test_api: true,
            test_profile: Some(profile),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Read options from `OZON_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let use_test_api = lookup("OZON_USE_TEST_API")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let test_profile = match (lookup("OZON_TEST_CLIENT_ID"), lookup("OZON_TEST_API_KEY")) {
            (Some(account_id), Some(api_key)) => {
                let mut profile = TestProfile::new(account_id, api_key);
                if let Some(base_url) = lookup("OZON_TEST_BASE_URL") {
                    profile.base_url = base_url;
                }
                Some(profile)
            }
            _ => None,
        };

        Self {
            account_id: lookup("OZON_CLIENT_ID"),
            api_key: lookup("OZON_API_KEY"),
            use_test_api,
            test_profile,
            base_url_override: lookup("OZON_BASE_URL"),
        }
    }
}

/// Resolved, immutable client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    credentials: Credentials,
    base_url: String,
    environment: Environment,
}

impl ClientConfig {
    pub fn resolve(options: ClientOptions) -> Result<Self, ApiError> {
        let (credentials, base_url, environment) = if options.use_test_api {
            // Explicit account_id/api_key are ignored in test mode.
            let profile = options.test_profile.ok_or_else(|| {
                ApiError::Configuration(
                    "use_test_api is set but no test profile (account id and api key) was supplied"
                        .to_string(),
                )
            })?;
            (profile.credentials, profile.base_url, Environment::Test)
        } else {
            let account_id = options.account_id.filter(|v| !v.is_empty());
            let api_key = options.api_key.filter(|v| !v.is_empty());
            match (account_id, api_key) {
                (Some(account_id), Some(api_key)) => (
                    Credentials {
                        account_id,
                        api_key,
                    },
                    PRODUCTION_BASE_URL.to_string(),
                    Environment::Production,
                ),
                _ => {
                    return Err(ApiError::Configuration(
                        "either set use_test_api or supply both an account id and an api key"
                            .to_string(),
                    ))
                }
            }
        };

        let base_url = options.base_url_override.unwrap_or(base_url);
        tracing::info!(?environment, %base_url, account_id = %credentials.account_id, "seller api client configured");

        Ok(Self {
            credentials,
            base_url,
            environment,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }
}
