use super::Config;

pub const API_KEY_ENV: &str = "MUSIXMATCH_API_KEY";

/// Configuration written on first run. Seeds the api key from the
/// environment when one is exported.
pub fn defaults() -> Config {
    let mut cfg = Config::default();
    if let Ok(key) = std::env::var(API_KEY_ENV)
        && !key.trim().is_empty()
    {
        cfg.api.api_key = key.trim().to_string();
    }
    cfg
}
