//! CLI configuration.

/// Relay used when neither `--relay-url` nor the environment names one.
pub const DEFAULT_RELAY_URL: &str = "http://localhost:3000";

/// Environment variable overriding the default relay.
pub const RELAY_URL_ENV: &str = "ZEROAUTH_RELAY_URL";

/// Verifier name shown to the holder when `--verifier-name` is not given.
pub const DEFAULT_VERIFIER_NAME: &str = "ZeroAuth CLI";

/// Pick the relay URL: explicit flag, then environment, then default.
pub fn resolve_relay_url(flag: Option<&str>) -> String {
    pick_relay_url(flag, std::env::var(RELAY_URL_ENV).ok().as_deref())
}

fn pick_relay_url(flag: Option<&str>, env: Option<&str>) -> String {
    flag.or(env.filter(|url| !url.trim().is_empty()))
        .unwrap_or(DEFAULT_RELAY_URL)
        .to_string()
}
