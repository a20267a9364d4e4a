use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use tracing::warn;
use url::Url;
use crate::error::CockpitError;

const USER_AGENT: &str = concat!("cockpit/", env!("CARGO_PKG_VERSION"));

/// Which hosts a [`SandboxClient`] may reach.
#[derive(Debug, Clone)]
enum NetworkPolicy {
    /// Exact hostnames (and their subdomains).
    Allowlist(HashSet<String>),
    /// Any `http`/`https` URL. Used for fetching arbitrary article pages.
    AnyHttp,
}

/// An HTTP client that only issues requests to approved domains.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    policy: NetworkPolicy,
}

impl SandboxClient {
    /// Creates a client with the default allowlist of feed, discussion, LLM and backend domains.
    pub fn new() -> Result<Self, CockpitError> {
        let domains = [
            "hnrss.org",                         // Hacker News RSS
            "news.ycombinator.com",              // HN discussions
            "hn.algolia.com",                    // HN item API
            "generativelanguage.googleapis.com", // Gemini
            "supabase.co",                       // Hosted Supabase projects
            "localhost",                         // Local Supabase / dev
            "127.0.0.1",
        ];
        let allowlist = domains.iter().map(|d| d.to_string()).collect();
        Ok(Self { client: build_client()?, policy: NetworkPolicy::Allowlist(allowlist) })
    }

    /// Creates a client that accepts any `http`/`https` URL.
    pub fn permissive() -> Result<Self, CockpitError> {
        Ok(Self { client: build_client()?, policy: NetworkPolicy::AnyHttp })
    }

    /// Appends an exact hostname to the allowlist. No-op for permissive clients.
    pub fn allow_domain(&mut self, domain: &str) {
        if let NetworkPolicy::Allowlist(ref mut allowlist) = self.policy {
            allowlist.insert(domain.to_string());
        }
    }

    /// Allows the host of `url`, e.g. a self-hosted backend endpoint.
    pub fn allow_url_host(&mut self, url: &str) -> Result<(), CockpitError> {
        let parsed = Url::parse(url)
            .map_err(|e| CockpitError::Config(format!("invalid URL {url}: {e}")))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| CockpitError::Config(format!("URL has no host: {url}")))?;
        self.allow_domain(host);
        Ok(())
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }
        let Some(host) = parsed.host_str() else {
            return false;
        };
        match &self.policy {
            NetworkPolicy::AnyHttp => true,
            NetworkPolicy::Allowlist(allowlist) => allowlist
                .iter()
                .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed))),
        }
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, CockpitError> {
        self.request(reqwest::Method::GET, url)
    }

    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, CockpitError> {
        self.request(reqwest::Method::POST, url)
    }

    /// Exposes the inner `reqwest::Client` builder pattern safely.
    pub fn request(&self, method: reqwest::Method, url: &str) -> Result<reqwest::RequestBuilder, CockpitError> {
        if !self.is_allowed(url) {
            warn!("Blocked outbound request to {}", url);
            return Err(CockpitError::Security(format!(
                "Network capabilities capped: domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.request(method, url))
    }
}

fn build_client() -> Result<Client, CockpitError> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| CockpitError::Config(format!("Failed to build HTTP client: {}", e)))
}
