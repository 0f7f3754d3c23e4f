use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use url::Url;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bot_token: Option<String>,
    /// Bot API host, without the `/bot<token>` segment.
    pub api_base_url: String,
    /// Target of the generic proxy; `<suffix>` is appended to it.
    pub proxy_base_url: String,
    /// Lower-cased header names the proxy drops on top of the hop-by-hop set.
    pub proxy_strip_headers: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let port = match get_env_opt("PORT") {
            Some(_) => get_env_parse("PORT")?,
            None => DEFAULT_PORT,
        };
        let bot_token = get_env_opt("TELEGRAM_BOT_TOKEN");
        let api_base_url = get_env_opt("TELEGRAM_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let proxy_base_url = get_env_opt("TELEGRAM_PROXY_BASE_URL");
        let proxy_strip_headers = get_env_opt("PROXY_STRIP_HEADERS")
            .map(|raw| parse_header_list(&raw))
            .unwrap_or_default();

        Self::build(port, bot_token, api_base_url, proxy_base_url, proxy_strip_headers)
    }

    /// Assembles a config the same way `from_env` does, for callers that
    /// already hold the values (tests, embedding).
    pub fn build(
        port: u16,
        bot_token: Option<String>,
        api_base_url: String,
        proxy_base_url: Option<String>,
        proxy_strip_headers: Vec<String>,
    ) -> Result<Self> {
        let bot_token = bot_token.filter(|t| !t.trim().is_empty());
        let api_base_url = normalize_base_url("TELEGRAM_API_BASE_URL", &api_base_url)?;
        let proxy_base_url = match proxy_base_url {
            Some(raw) => normalize_base_url("TELEGRAM_PROXY_BASE_URL", &raw)?,
            None => derive_proxy_base(&api_base_url, bot_token.as_deref()),
        };

        Ok(Self {
            port,
            bot_token,
            api_base_url,
            proxy_base_url,
            proxy_strip_headers,
        })
    }

    pub fn bot_configured(&self) -> bool {
        self.bot_token.is_some()
    }

    /// `<api-base>/bot<token>/<method>`, or `None` when no token is set.
    pub fn bot_method_url(&self, method: &str) -> Option<String> {
        self.bot_token
            .as_ref()
            .map(|token| format!("{}/bot{}/{}", self.api_base_url, token, method))
    }
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_parse<T>(name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name)
        .map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))?;
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))
}

fn normalize_base_url(name: &str, raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(trimmed).map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e)))?;
    Ok(trimmed.to_string())
}

fn derive_proxy_base(api_base_url: &str, bot_token: Option<&str>) -> String {
    match bot_token {
        Some(token) => format!("{}/bot{}", api_base_url, token),
        None => api_base_url.to_string(),
    }
}

fn parse_header_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|h| h.trim().to_ascii_lowercase())
        .filter(|h| !h.is_empty())
        .collect()
}
