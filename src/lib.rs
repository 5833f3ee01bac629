//! Blocking GET requests with browser-like headers, an optional proxy and
//! basic-auth credentials, all configured from environment variables.
//!
//! ```no_run
//! use proxyget::{Config, Protocol, Request};
//!
//! let config = Config::load(None)?;
//! let resp = Request::new("https://ipv4.webshare.io/")
//!     .with_protocol(Protocol::Socks5)
//!     .with_auth_prefix("BC")
//!     .with_headers([("Accept-Language", "en-us")])
//!     .send(&config)?;
//! println!("{}", resp.text()?);
//! # Ok::<(), proxyget::Error>(())
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod headers;
pub mod net;
pub mod proxy;

pub use auth::Credentials;
pub use config::Config;
pub use error::Error;
pub use headers::{Headers, UserAgent};
pub use net::{get, Request, DEFAULT_URL};
pub use proxy::{Protocol, ProxyConfig};

pub type Result<T> = std::result::Result<T, Error>;
