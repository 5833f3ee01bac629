use std::sync::OnceLock;

use rand::{seq::SliceRandom, Rng};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Serialize, Serializer};

use crate::{Error, Result};

pub const ACCEPT_LANGUAGE: &str = "en-gb";
pub const ACCEPT_ENCODING: &str = "br,gzip,deflate";
pub const ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const REFERER: &str = "http://www.google.com";

const PLATFORMS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
    "X11; CrOS x86_64 14541.0.0",
];
const CHROME_MAJOR: std::ops::RangeInclusive<u32> = 112..=130;

static PROCESS_USER_AGENT: OnceLock<String> = OnceLock::new();

/// Where the `User-Agent` header comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UserAgent {
    /// A freshly drawn Chrome user agent on every build.
    #[default]
    Random,
    /// One Chrome user agent drawn on first use and reused until exit.
    PerProcess,
    Fixed(String),
}

impl UserAgent {
    pub fn resolve(&self) -> String {
        match self {
            UserAgent::Random => random_chrome(),
            UserAgent::PerProcess => {
                PROCESS_USER_AGENT.get_or_init(random_chrome).clone()
            }
            UserAgent::Fixed(ua) => ua.clone(),
        }
    }
}

/// Desktop Chrome user agent with a random platform and major version.
pub fn random_chrome() -> String {
    let mut rng = rand::thread_rng();
    let platform = PLATFORMS.choose(&mut rng).copied().unwrap_or(PLATFORMS[0]);
    let major = rng.gen_range(CHROME_MAJOR);
    format!(
        "Mozilla/5.0 ({platform}) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/{major}.0.0.0 Safari/537.36"
    )
}

/// Ordered header set. Names compare case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// The browser-like headers sent with every request.
    pub fn baseline(user_agent: &UserAgent) -> Self {
        let mut headers = Self::default();
        headers.insert("User-Agent", user_agent.resolve());
        headers.insert("Accept-Language", ACCEPT_LANGUAGE);
        headers.insert("Accept-Encoding", ACCEPT_ENCODING);
        headers.insert("Accept", ACCEPT);
        headers.insert("Referer", REFERER);
        headers
    }

    /// Baseline headers with `overrides` applied on top.
    pub fn build<K, V>(user_agent: &UserAgent, overrides: Option<&[(K, V)]>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers = Self::baseline(user_agent);
        if let Some(overrides) = overrides {
            for (name, value) in overrides {
                headers.insert(name.as_ref(), value.as_ref());
            }
        }
        headers
    }

    /// Replace the value under `name`, or append it if absent.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, name: K, value: V) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            let invalid = |reason: String| Error::InvalidHeader {
                name: name.clone(),
                reason,
            };
            let key = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| invalid(e.to_string()))?;
            let value =
                HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_has_browser_headers() {
        let headers = Headers::baseline(&UserAgent::Fixed("UA".into()));
        let names = headers.iter().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(
            names,
            ["User-Agent", "Accept-Language", "Accept-Encoding", "Accept", "Referer"]
        );
        assert_eq!(headers.get("user-agent"), Some("UA"));
        assert_eq!(headers.get("Referer"), Some(REFERER));
    }

    #[test]
    fn override_replaces_only_its_key() {
        let ua = UserAgent::Fixed("Chrome".into());
        let baseline = Headers::baseline(&ua);
        let headers = Headers::build(&ua, Some(&[("User-Agent", "X")][..]));
        assert_eq!(headers.get("User-Agent"), Some("X"));
        assert_eq!(headers.len(), baseline.len());
        for name in ["Accept-Language", "Accept-Encoding", "Accept", "Referer"] {
            assert_eq!(headers.get(name), baseline.get(name));
        }
    }

    #[test]
    fn override_matches_case_insensitively_and_appends_new_keys() {
        let headers = Headers::build(
            &UserAgent::default(),
            Some(&[("accept-language", "fr"), ("Added", "Header123"), ("added", "again")][..]),
        );
        assert_eq!(headers.get("Accept-Language"), Some("fr"));
        assert_eq!(headers.get("Added"), Some("again"));
        assert_eq!(headers.len(), 6);
    }

    #[test]
    fn random_agent_looks_like_chrome() {
        let ua = random_chrome();
        assert!(ua.starts_with("Mozilla/5.0 ("));
        assert!(ua.contains(" Chrome/"));
    }

    #[test]
    fn per_process_agent_is_stable() {
        let first = UserAgent::PerProcess.resolve();
        let second = UserAgent::PerProcess.resolve();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_invalid_header_values() {
        let headers = Headers::build(&UserAgent::default(), Some(&[("X-Bad", "a\nb")][..]));
        let err = headers.to_header_map().unwrap_err();
        assert!(matches!(err, Error::InvalidHeader { ref name, .. } if name == "X-Bad"));
    }

    #[test]
    fn serializes_in_order() {
        let headers = Headers::baseline(&UserAgent::Fixed("UA".into()));
        let json = serde_json::to_string(&headers).unwrap();
        assert!(json.starts_with("{\"User-Agent\":\"UA\""));
    }
}
