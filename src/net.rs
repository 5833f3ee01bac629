use log::{debug, warn};
use reqwest::blocking::Response;

use crate::{
    auth::Credentials,
    config::Config,
    headers::{Headers, UserAgent},
    proxy::{Protocol, ProxyConfig},
    Error, Result,
};

/// IP-echo endpoint, handy for checking which address a proxy exits from.
pub const DEFAULT_URL: &str = "https://ipv4.webshare.io/";

/// A single GET with optional proxy, basic auth and header overrides.
#[derive(Debug, Clone)]
pub struct Request {
    url: String,
    protocol: Option<Protocol>,
    auth_prefix: Option<String>,
    headers: Option<Vec<(String, String)>>,
    user_agent: UserAgent,
}

impl Default for Request {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

impl Request {
    pub fn new<S: AsRef<str>>(url: S) -> Self {
        Self {
            url: url.as_ref().to_string(),
            protocol: None,
            auth_prefix: None,
            headers: None,
            user_agent: UserAgent::default(),
        }
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    pub fn with_auth_prefix<S: AsRef<str>>(mut self, prefix: S) -> Self {
        self.auth_prefix = Some(prefix.as_ref().to_string());
        self
    }

    /// Headers overlaid on the baseline set; a repeated call replaces the
    /// previous overrides.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers = Some(
            headers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn with_user_agent(mut self, user_agent: UserAgent) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Headers this request will send.
    pub fn headers(&self) -> Headers {
        Headers::build(&self.user_agent, self.headers.as_deref())
    }

    /// Proxy mapping this request will use, if a protocol was chosen.
    pub fn proxies(&self, config: &Config) -> Result<Option<ProxyConfig>> {
        self.protocol
            .map(|protocol| ProxyConfig::build(protocol, config))
            .transpose()
    }

    pub fn credentials(&self, config: &Config) -> Option<Credentials> {
        self.auth_prefix
            .as_deref()
            .map(|prefix| Credentials::for_prefix(config, prefix))
    }

    /// Dispatch the request, failing on a 4xx or 5xx status.
    pub fn send(&self, config: &Config) -> Result<Response> {
        let headers = self.headers().to_header_map()?;
        let proxies = self.proxies(config)?;
        let credentials = self.credentials(config);

        let mut builder = reqwest::blocking::Client::builder();
        match &proxies {
            Some(proxies) => {
                for proxy in proxies.to_proxies()? {
                    builder = builder.proxy(proxy);
                }
            }
            None => builder = builder.no_proxy(),
        }
        let client = builder.build()?;

        let url = self.url.as_str();
        let mut request = client.get(url).headers(headers);
        if let Some(creds) = &credentials {
            request = request
                .basic_auth(creds.username_or_empty(), Some(creds.password_or_empty()));
        }

        debug!(
            "GET {url} (proxy: {}, auth: {})",
            self.protocol.map_or("none", |p| p.as_str()),
            self.auth_prefix.as_deref().unwrap_or("none"),
        );
        let resp = request.send()?;
        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            warn!("GET {url} returned {status}");
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        debug!("GET {url} returned {status}");
        Ok(resp)
    }
}

/// Plain GET with baseline headers, no proxy and no auth.
pub fn get<S: AsRef<str>>(url: S, config: &Config) -> Result<Response> {
    Request::new(url).send(config)
}
