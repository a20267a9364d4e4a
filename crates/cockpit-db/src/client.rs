//! Backend client factory.
//!
//! Builds a PostgREST client bound to credentials taken from the process
//! environment. Missing credentials are a hard error; there is no fallback
//! endpoint or key. A new client is built per call site.

use cockpit_common::SandboxClient;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::query::QueryBuilder;

/// Public endpoint used by the dashboard.
pub const PUBLIC_URL_ENV: &str = "NEXT_PUBLIC_SUPABASE_URL";
/// Public (row-level-security bound) key used by the dashboard.
pub const PUBLIC_ANON_KEY_ENV: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";
/// Endpoint used by the tech-watch bot.
pub const SERVICE_URL_ENV: &str = "SUPABASE_URL";
/// Service-role key used by the tech-watch bot.
pub const SERVICE_ROLE_KEY_ENV: &str = "SUPABASE_SERVICE_ROLE_KEY";

/// A client bound to one backend endpoint and key.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    url: String,
    api_key: SecretString,
    http: SandboxClient,
}

impl SupabaseClient {
    pub fn new(url: impl Into<String>, api_key: SecretString) -> Result<Self, ConfigError> {
        let url = url.into().trim_end_matches('/').to_string();
        let mut http = SandboxClient::new().map_err(|e| ConfigError::Client(e.to_string()))?;
        // Only presence is validated here. A malformed URL surfaces on first request.
        if let Err(e) = http.allow_url_host(&url) {
            warn!("Backend URL could not be added to the allowlist: {e}");
        }
        Ok(Self { url, api_key, http })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// `{url}/rest/v1/{table}`
    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }

    /// Starts a query against `table`.
    pub fn from(&self, table: &str) -> QueryBuilder<'_> {
        QueryBuilder::new(self, table)
    }

    pub(crate) fn request(
        &self,
        method: reqwest::Method,
        table: &str,
    ) -> Result<reqwest::RequestBuilder, cockpit_common::CockpitError> {
        let key = self.api_key.expose_secret();
        Ok(self
            .http
            .request(method, &self.rest_url(table))?
            .header("apikey", key)
            .bearer_auth(key))
    }
}

/// Creates a dashboard client from `NEXT_PUBLIC_SUPABASE_URL` and
/// `NEXT_PUBLIC_SUPABASE_ANON_KEY`.
pub fn create_client() -> Result<SupabaseClient, ConfigError> {
    create_client_with(PUBLIC_URL_ENV, PUBLIC_ANON_KEY_ENV, env_lookup)
}

/// Creates a service-role client from `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY`.
pub fn create_service_client() -> Result<SupabaseClient, ConfigError> {
    create_client_with(SERVICE_URL_ENV, SERVICE_ROLE_KEY_ENV, env_lookup)
}

/// Builds a client from two named variables resolved through `lookup`.
/// Empty values count as missing.
pub fn create_client_with<F>(
    url_var: &'static str,
    key_var: &'static str,
    lookup: F,
) -> Result<SupabaseClient, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let url = lookup(url_var).filter(|v| !v.trim().is_empty());
    let key = lookup(key_var).filter(|v| !v.trim().is_empty());

    let (Some(url), Some(key)) = (url, key) else {
        return Err(ConfigError::MissingEnv { url_var, key_var });
    };

    debug!(url = %url, "Creating backend client");
    SupabaseClient::new(url, SecretString::from(key))
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_client_bound_to_exact_values() {
        let lookup = lookup_from(&[
            (PUBLIC_URL_ENV, "https://proj.supabase.co/"),
            (PUBLIC_ANON_KEY_ENV, "anon-key"),
        ]);
        let client = create_client_with(PUBLIC_URL_ENV, PUBLIC_ANON_KEY_ENV, lookup).unwrap();
        assert_eq!(client.url(), "https://proj.supabase.co");
        assert_eq!(client.api_key().expose_secret(), "anon-key");
        assert_eq!(
            client.rest_url("tech_watch_articles"),
            "https://proj.supabase.co/rest/v1/tech_watch_articles"
        );
    }

    #[test]
    fn test_missing_either_variable_fails() {
        let only_url = lookup_from(&[(PUBLIC_URL_ENV, "https://proj.supabase.co")]);
        let only_key = lookup_from(&[(PUBLIC_ANON_KEY_ENV, "anon-key")]);
        let empty_key = lookup_from(&[(PUBLIC_URL_ENV, "https://proj.supabase.co"), (PUBLIC_ANON_KEY_ENV, "")]);

        for lookup in [only_url, only_key, empty_key] {
            let err = create_client_with(PUBLIC_URL_ENV, PUBLIC_ANON_KEY_ENV, lookup).unwrap_err();
            assert_eq!(
                err,
                ConfigError::MissingEnv { url_var: PUBLIC_URL_ENV, key_var: PUBLIC_ANON_KEY_ENV }
            );
        }
    }

    #[test]
    fn test_error_message_names_both_variables() {
        let err = create_client_with(PUBLIC_URL_ENV, PUBLIC_ANON_KEY_ENV, |_| None).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("NEXT_PUBLIC_SUPABASE_URL"));
        assert!(msg.contains("NEXT_PUBLIC_SUPABASE_ANON_KEY"));
    }

    #[test]
    #[serial]
    fn test_create_client_reads_process_environment() {
        std::env::remove_var(PUBLIC_URL_ENV);
        std::env::remove_var(PUBLIC_ANON_KEY_ENV);
        assert!(create_client().is_err());

        std::env::set_var(PUBLIC_URL_ENV, "http://localhost:54321");
        std::env::set_var(PUBLIC_ANON_KEY_ENV, "local-anon");
        let client = create_client().unwrap();
        std::env::remove_var(PUBLIC_URL_ENV);
        std::env::remove_var(PUBLIC_ANON_KEY_ENV);

        assert_eq!(client.url(), "http://localhost:54321");
        assert_eq!(client.api_key().expose_secret(), "local-anon");
    }

    #[test]
    #[serial]
    fn test_service_client_uses_service_variables() {
        std::env::remove_var(SERVICE_URL_ENV);
        std::env::set_var(SERVICE_ROLE_KEY_ENV, "service");
        let err = create_service_client().unwrap_err();
        std::env::remove_var(SERVICE_ROLE_KEY_ENV);
        assert!(err.to_string().contains("SUPABASE_SERVICE_ROLE_KEY"));
    }
}
