//! Client for the regional pricing service.
//!
//! Optional delegate that returns region-specific unit prices. Failures are
//! never surfaced to the estimate caller; the built-in price book is the
//! fallback. Successful lookups are cached in-process with a TTL.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::estimator::price_book::normalize;

/// Client for the regional pricing service.
#[derive(Clone)]
pub struct RegionalPricingClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    cache: Arc<RwLock<HashMap<String, CachedPrice>>>,
    cache_ttl: Duration,
}

#[derive(Clone, Copy)]
struct CachedPrice {
    price: Decimal,
    cached_at: Instant,
}

#[derive(Serialize)]
struct LookupRequest<'a> {
    region_code: &'a str,
    items: &'a [String],
}

#[derive(Deserialize)]
struct LookupResponse {
    prices: Vec<RegionalPrice>,
}

#[derive(Deserialize)]
struct RegionalPrice {
    name: String,
    unit_price: Decimal,
}

impl RegionalPricingClient {
    /// Create a new pricing service client.
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        timeout_seconds: u64,
        cache_ttl_seconds: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        tracing::info!(base_url = base_url, "Regional pricing client initialized");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(|t| t.to_string()),
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_ttl: Duration::from_secs(cache_ttl_seconds),
        })
    }

    /// Check pricing service health.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);

        self.client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("Pricing service health check failed")?
            .error_for_status()
            .context("Pricing service unhealthy")?;

        Ok(())
    }

    /// Resolve regional unit prices for the given item names.
    ///
    /// Returns a map keyed by normalized item name. Names the service does
    /// not price are simply absent from the map.
    pub async fn regional_prices(
        &self,
        region_code: &str,
        names: &[String],
        request_id: Option<&str>,
    ) -> Result<HashMap<String, Decimal>> {
        let mut resolved = HashMap::new();
        let mut missing: Vec<String> = Vec::new();

        {
            let cache = self.cache.read();
            for name in names {
                let key = normalize(name);
                match cache.get(&cache_key(region_code, &key)) {
                    Some(cached) if cached.cached_at.elapsed() < self.cache_ttl => {
                        resolved.insert(key, cached.price);
                    }
                    _ => missing.push(key),
                }
            }
        }

        missing.sort();
        missing.dedup();

        if missing.is_empty() {
            return Ok(resolved);
        }

        let url = format!("{}/v1/prices/lookup", self.base_url);

        let mut req = self.client.post(&url).json(&LookupRequest {
            region_code,
            items: &missing,
        });

        if let Some(token) = &self.token {
            req = req.header("X-Internal-Token", token);
        }
        if let Some(rid) = request_id {
            req = req.header("x-request-id", rid);
        }

        debug!(url = %url, region_code = region_code, items = missing.len(), "Regional price lookup");

        let response = req.send().await.context("Pricing service request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Pricing service returned status {}", response.status());
        }

        let body: LookupResponse = response
            .json()
            .await
            .context("Invalid pricing service response")?;

        let now = Instant::now();
        let mut cache = self.cache.write();
        for price in body.prices {
            let key = normalize(&price.name);
            cache.insert(
                cache_key(region_code, &key),
                CachedPrice {
                    price: price.unit_price,
                    cached_at: now,
                },
            );
            resolved.insert(key, price.unit_price);
        }

        Ok(resolved)
    }
}

fn cache_key(region_code: &str, name: &str) -> String {
    format!("{region_code}:{name}")
}
