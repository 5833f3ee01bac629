use log::warn;

use crate::config::Config;

/// Basic-auth username and password. Either half may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    /// Read the pair stored under `user_key` and `pass_key`.
    ///
    /// Unset variables are not an error here: a bad login surfaces as a
    /// 401/403 from the server.
    pub fn lookup(config: &Config, user_key: &str, pass_key: &str) -> Self {
        let username = config.var(user_key).map(str::to_string);
        let password = config.var(pass_key).map(str::to_string);
        for (key, value) in [(user_key, &username), (pass_key, &password)] {
            if value.is_none() {
                warn!("{key} is not set, sending it empty");
            }
        }
        Self { username, password }
    }

    /// Credentials under `{prefix}_USERNAME` and `{prefix}_PASSWORD`.
    pub fn for_prefix(config: &Config, prefix: &str) -> Self {
        Self::lookup(
            config,
            &format!("{prefix}_USERNAME"),
            &format!("{prefix}_PASSWORD"),
        )
    }

    pub fn username_or_empty(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }

    pub fn password_or_empty(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }
}
