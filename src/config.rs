use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        wiki_api_url: get_env_or_default("WIKI_API_URL", "https://en.wikipedia.org/w/api.php"),
        request_timeout_ms: parse_env_or_default("REQUEST_TIMEOUT_MS", 10_000),
        bind_addr: get_env_or_default("BIND_ADDR", "127.0.0.1:3000"),
    }
});

pub struct Config {
    pub wiki_api_url: String,
    pub request_timeout_ms: u64,
    pub bind_addr: String,
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env_or_default(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("Invalid value for {key}: {raw:?}")),
        Err(_) => default,
    }
}
