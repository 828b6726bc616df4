//! HTTP client construction
//!
//! Creates the reqwest clients used for outbound search requests.

use reqwest::{redirect, Client, Proxy};
use std::time::Duration;
use thiserror::Error;

/// Redirect hop limit, matching reqwest's default policy
const MAX_REDIRECTS: usize = 10;

/// Desktop browser user agent. Several source sites serve degraded or
/// blocked markup to clients they do not recognize.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

/// Certificate validation policy for outbound requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TlsPolicy {
    /// Validate every certificate chain
    Verify,
    /// Skip validation only for these hosts and their subdomains
    AcceptInvalidFor(Vec<String>),
    /// Skip validation for every host
    AcceptInvalid,
}

impl TlsPolicy {
    /// Whether requests to `host` may skip certificate validation
    pub fn allows_invalid(&self, host: &str) -> bool {
        match self {
            TlsPolicy::Verify => false,
            TlsPolicy::AcceptInvalid => true,
            TlsPolicy::AcceptInvalidFor(hosts) => hosts.iter().any(|allowed| host_matches(host, allowed)),
        }
    }

    fn needs_relaxed_client(&self) -> bool {
        match self {
            TlsPolicy::Verify => false,
            TlsPolicy::AcceptInvalid => true,
            TlsPolicy::AcceptInvalidFor(hosts) => !hosts.is_empty(),
        }
    }
}

/// Outbound fetch configuration
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Optional proxy (`http://`, `https://` or `socks5h://`)
    pub proxy: Option<String>,
    /// Certificate validation policy
    pub tls: TlsPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            proxy: None,
            tls: TlsPolicy::Verify,
        }
    }
}

impl FetchConfig {
    pub fn with_tls(mut self, tls: TlsPolicy) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }
}

/// Errors from outbound fetching
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Remote returned status {0}")]
    Status(u16),
}

/// Build a client for the given configuration.
///
/// `accept_invalid_certs` disables certificate chain validation for every
/// request made through the returned client. Such a client only follows
/// redirects to hosts the TLS policy allows; any other redirect is returned
/// to the caller as-is.
pub fn create_client(config: &FetchConfig, accept_invalid_certs: bool) -> Result<Client, FetchError> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(config.user_agent.as_str())
        .danger_accept_invalid_certs(accept_invalid_certs);

    if accept_invalid_certs {
        let tls = config.tls.clone();
        builder = builder.redirect(redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= MAX_REDIRECTS {
                return attempt.error("too many redirects");
            }
            if follows_redirect(&tls, attempt.url().host_str()) {
                attempt.follow()
            } else {
                attempt.stop()
            }
        }));
    }

    if let Some(proxy) = &config.proxy {
        let proxy = Proxy::all(proxy).map_err(|e| FetchError::ClientBuild(e.to_string()))?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| FetchError::ClientBuild(e.to_string()))
}

/// Client pair: a validating client and, when the policy allows it, a relaxed one
#[derive(Debug, Clone)]
pub struct ClientSet {
    strict: Client,
    relaxed: Option<Client>,
    tls: TlsPolicy,
}

impl ClientSet {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let strict = create_client(config, false)?;
        let relaxed = if config.tls.needs_relaxed_client() {
            Some(create_client(config, true)?)
        } else {
            None
        };

        Ok(Self {
            strict,
            relaxed,
            tls: config.tls.clone(),
        })
    }

    /// Pick the client to use for `host`
    pub fn for_host(&self, host: &str) -> &Client {
        match &self.relaxed {
            Some(relaxed) if self.tls.allows_invalid(host) => relaxed,
            _ => &self.strict,
        }
    }
}

/// Whether a relaxed client may follow a redirect to `host`
fn follows_redirect(tls: &TlsPolicy, host: Option<&str>) -> bool {
    host.is_some_and(|host| tls.allows_invalid(host))
}

fn host_matches(host: &str, allowed: &str) -> bool {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    let allowed = allowed.trim_end_matches('.').to_ascii_lowercase();
    if allowed.is_empty() {
        return false;
    }
    host == allowed
        || host
            .strip_suffix(allowed.as_str())
            .is_some_and(|prefix| prefix.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.contains("Mozilla"));
        assert_eq!(config.tls, TlsPolicy::Verify);
    }

    #[test]
    fn test_allowlist_matches_subdomains() {
        let policy = TlsPolicy::AcceptInvalidFor(vec!["bilibili.com".into()]);
        assert!(policy.allows_invalid("bilibili.com"));
        assert!(policy.allows_invalid("search.bilibili.com"));
        assert!(policy.allows_invalid("Search.Bilibili.COM"));
        assert!(!policy.allows_invalid("notbilibili.com"));
        assert!(!policy.allows_invalid("bilibili.com.evil.net"));
    }

    #[test]
    fn test_policy_extremes() {
        assert!(!TlsPolicy::Verify.allows_invalid("www.youtube.com"));
        assert!(TlsPolicy::AcceptInvalid.allows_invalid("anything.example"));
        assert!(!TlsPolicy::AcceptInvalidFor(vec![]).allows_invalid("www.youtube.com"));
    }

    #[test]
    fn test_relaxed_redirects_stay_in_allowlist() {
        let policy = TlsPolicy::AcceptInvalidFor(vec!["www.youtube.com".into()]);
        assert!(follows_redirect(&policy, Some("www.youtube.com")));
        assert!(follows_redirect(&policy, Some("m.www.youtube.com")));
        assert!(!follows_redirect(&policy, Some("evil.example")));
        assert!(!follows_redirect(&policy, None));
        assert!(follows_redirect(&TlsPolicy::AcceptInvalid, Some("evil.example")));
    }

    #[test]
    fn test_relaxed_client_builds_with_allowlist() {
        let config = FetchConfig::default().with_tls(TlsPolicy::AcceptInvalidFor(vec!["www.youtube.com".into()]));
        assert!(ClientSet::new(&config).is_ok());
    }

    #[test]
    fn test_bad_proxy_rejected() {
        let config = FetchConfig::default().with_proxy(Some("not a proxy url".into()));
        assert!(matches!(create_client(&config, false), Err(FetchError::ClientBuild(_))));
    }
}
