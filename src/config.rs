use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }

    pub fn is_prod(&self) -> bool {
        matches!(self, Self::Prod)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Estimator
    pub platform_fee_rate: Decimal,
    pub default_unit_price: Decimal,
    pub labor_hours: Decimal,
    pub labor_hourly_rate: Decimal,

    // Regional pricing service (optional delegate)
    pub pricing_service_url: Option<String>,
    pub pricing_service_token: Option<String>,
    pub pricing_service_timeout_seconds: u64,
    pub pricing_cache_ttl_seconds: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Estimator
        let platform_fee_rate = decimal_var("PLATFORM_FEE_RATE", Decimal::new(10, 2))?;
        let default_unit_price = decimal_var("DEFAULT_UNIT_PRICE", Decimal::new(15000, 2))?;
        let labor_hours = decimal_var("ESTIMATE_LABOR_HOURS", Decimal::from(8))?;
        let labor_hourly_rate = decimal_var("LABOR_HOURLY_RATE", Decimal::new(7000, 2))?;

        // Regional pricing service
        let pricing_service_url = match env::var("REGIONAL_PRICING_URL") {
            Ok(url) if !url.trim().is_empty() => {
                Url::parse(url.trim()).context("REGIONAL_PRICING_URL must be a valid URL")?;
                Some(url.trim().to_string())
            }
            _ => None,
        };
        let pricing_service_token = env::var("REGIONAL_PRICING_TOKEN").ok();
        let pricing_service_timeout_seconds = env::var("REGIONAL_PRICING_TIMEOUT_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);
        let pricing_cache_ttl_seconds = env::var("REGIONAL_PRICING_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3600); // 1 hour default

        Ok(Settings {
            env,
            server_addr,
            cors_allow_origins,
            platform_fee_rate,
            default_unit_price,
            labor_hours,
            labor_hourly_rate,
            pricing_service_url,
            pricing_service_token,
            pricing_service_timeout_seconds,
            pricing_cache_ttl_seconds,
        })
    }
}

fn decimal_var(name: &str, default: Decimal) -> Result<Decimal> {
    match env::var(name) {
        Ok(s) => {
            Decimal::from_str(s.trim()).with_context(|| format!("{name} must be a decimal number"))
        }
        Err(_) => Ok(default),
    }
}
