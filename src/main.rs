use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use proxyget::{Config, Headers, Protocol, ProxyConfig, Request, UserAgent, DEFAULT_URL};

pub type Result<T> = anyhow::Result<T, anyhow::Error>;

#[derive(Parser)]
#[clap(author, version, about, verbatim_doc_comment, long_about = None, arg_required_else_help(true))]
struct Cli {
    #[command(subcommand)]
    command: Option<Action>,
    /// Env file to read instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Action {
    /// GET a url and print the response body
    Get {
        #[arg(default_value = DEFAULT_URL)]
        url: String,
        /// Proxy protocol, http or socks5 (defaults to $PROXY_PROTOCOL)
        #[arg(short, long)]
        protocol: Option<String>,
        /// Ignore $PROXY_PROTOCOL and connect directly
        #[arg(long, conflicts_with = "protocol")]
        direct: bool,
        /// Read basic-auth credentials from {PREFIX}_USERNAME and {PREFIX}_PASSWORD
        #[arg(short, long)]
        auth_prefix: Option<String>,
        /// Extra header as 'Name: value', may be repeated
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },
    /// Print the proxy mapping as JSON
    Proxies {
        #[arg(short, long)]
        protocol: Option<String>,
    },
    /// Print the headers a request would send as JSON
    Headers {
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },
}

fn parse_header(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got {s:?}"))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

fn resolve_protocol(protocol: Option<&str>, config: &Config) -> Result<Option<Protocol>> {
    match protocol {
        Some(p) => Ok(Some(p.parse()?)),
        None => Ok(config.default_protocol()?),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::load(cli.env_file.as_deref()).context("load configuration")?;
    let Some(action) = cli.command else {
        return Ok(());
    };

    match action {
        Action::Get {
            url,
            protocol,
            direct,
            auth_prefix,
            headers,
        } => {
            let mut request = Request::new(&url).with_headers(headers);
            if !direct {
                if let Some(protocol) = resolve_protocol(protocol.as_deref(), &config)? {
                    request = request.with_protocol(protocol);
                }
            }
            if let Some(prefix) = auth_prefix {
                request = request.with_auth_prefix(prefix);
            }
            let body = request
                .send(&config)
                .context(format!("GET {url}"))?
                .bytes()
                .context(format!("read response body from {url}"))?;
            io::stdout().write_all(&body)?;
        }
        Action::Proxies { protocol } => {
            let protocol = resolve_protocol(protocol.as_deref(), &config)?
                .ok_or_else(|| anyhow!("no proxy protocol given and PROXY_PROTOCOL is not set"))?;
            let proxies =
                ProxyConfig::build(protocol, &config).context("build proxy configuration")?;
            println!("{}", serde_json::to_string_pretty(&proxies)?);
        }
        Action::Headers { headers } => {
            let headers = Headers::build(&UserAgent::default(), Some(headers.as_slice()));
            println!("{}", serde_json::to_string_pretty(&headers)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_args() {
        assert_eq!(
            parse_header("User-Agent: curl/8.0").unwrap(),
            ("User-Agent".to_string(), "curl/8.0".to_string())
        );
        assert_eq!(
            parse_header("X-Time:12:00").unwrap(),
            ("X-Time".to_string(), "12:00".to_string())
        );
        assert!(parse_header("no-colon").is_err());
    }

    #[test]
    fn explicit_protocol_wins_over_config() {
        let config = Config::from_vars([("PROXY_PROTOCOL", "socks5")]);
        assert_eq!(
            resolve_protocol(Some("http"), &config).unwrap(),
            Some(Protocol::Http)
        );
        assert_eq!(
            resolve_protocol(None, &config).unwrap(),
            Some(Protocol::Socks5)
        );
        assert!(resolve_protocol(Some("ftp"), &config).is_err());
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
