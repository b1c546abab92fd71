use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub pool_size: u32,
    pub page_size: usize,
    pub seed_demo: bool,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_or("DATABASE_URL", "sqlite://ticketdesk.db");

        let host: IpAddr = env_or("TICKETDESK_HOST", "127.0.0.1")
            .parse()
            .map_err(|e| format!("Invalid TICKETDESK_HOST: {e}"))?;

        let port: u16 = env_or("TICKETDESK_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid TICKETDESK_PORT: {e}"))?;

        let pool_size: u32 = env_or("TICKETDESK_POOL_SIZE", "5")
            .parse()
            .map_err(|e| format!("Invalid TICKETDESK_POOL_SIZE: {e}"))?;
        if pool_size == 0 {
            return Err("Invalid TICKETDESK_POOL_SIZE: must be at least 1".to_string());
        }

        let page_size: usize = env_or(
            "TICKETDESK_PAGE_SIZE",
            &crate::views::board::DEFAULT_PAGE_SIZE.to_string(),
        )
        .parse()
        .map_err(|e| format!("Invalid TICKETDESK_PAGE_SIZE: {e}"))?;
        if page_size == 0 {
            return Err("Invalid TICKETDESK_PAGE_SIZE: must be at least 1".to_string());
        }

        let seed_demo = match env_or("TICKETDESK_SEED_DEMO", "true").to_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => return Err(format!("Invalid TICKETDESK_SEED_DEMO: '{other}'")),
        };

        let log_level = env_or("TICKETDESK_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            host,
            port,
            pool_size,
            page_size,
            seed_demo,
            log_level,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
