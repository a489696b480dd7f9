//! # REST Countries Client
//!
//! Blocking HTTP client for the restcountries API with local-file caching.
//!
//! `fetch_all` is an ordered fallback chain: cache file → in-memory memo →
//! network (persisting on success). `fetch_by_field` serves `name` queries
//! from the per-country cache first and falls back to the network on miss;
//! every other field always queries the network. Successful by-field
//! results are persisted per country name as a side effect.

use std::time::Duration;

use log::{debug, info, warn};
use serde_json::Value;

use crate::api::cache::CacheStore;
use crate::api::provider::{DataProvider, FetchError, FetchOutcome};
use crate::core::config::ResolvedConfig;
use crate::core::query::QueryField;

pub struct RestCountriesClient {
    http: reqwest::blocking::Client,
    base_url: String,
    cache: CacheStore,
    /// Memo for the full listing, kept for the life of the process.
    all_data: Option<Vec<Value>>,
}

impl RestCountriesClient {
    pub fn new(config: &ResolvedConfig) -> Result<Self, FetchError> {
        Self::with_options(
            config.api_base_url.clone(),
            config.request_timeout,
            CacheStore::new(config.cache_dir.clone()),
        )
    }

    pub fn with_options(
        base_url: String,
        timeout: Duration,
        cache: CacheStore,
    ) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;
        Ok(RestCountriesClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache,
            all_data: None,
        })
    }

    fn get_json(&self, url: &str) -> Result<Vec<Value>, FetchError> {
        debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            warn!("GET {url} failed with HTTP {status}");
            return Err(FetchError::Api { status: status.as_u16(), message });
        }
        response.json().map_err(|e| FetchError::Parse(e.to_string()))
    }

    /// Persist each record under its common name so later name lookups hit
    /// the cache. The full result set is stored per name, mirroring what a
    /// name query would return.
    fn persist_by_name(&self, data: &[Value]) {
        for record in data {
            let Some(name) = record.pointer("/name/common").and_then(Value::as_str) else {
                continue;
            };
            if let Err(e) = self.cache.store_country(name, data) {
                warn!("failed to cache {name}: {e}");
            }
        }
    }
}

impl DataProvider for RestCountriesClient {
    fn fetch_all(&mut self) -> Result<Vec<Value>, FetchError> {
        if let Some(data) = self.cache.load_all() {
            return Ok(data);
        }
        if let Some(data) = &self.all_data {
            debug!("serving full listing from memory");
            return Ok(data.clone());
        }

        let data = self.get_json(&format!("{}/all", self.base_url))?;
        info!("fetched full listing ({} records)", data.len());
        if let Err(e) = self.cache.store_all(&data) {
            warn!("failed to persist full listing: {e}");
        }
        self.all_data = Some(data.clone());
        Ok(data)
    }

    fn fetch_by_field(&mut self, field: QueryField, value: &str) -> FetchOutcome {
        if field == QueryField::Name {
            // Query flags (e.g. ?fullText=true) are not part of the cache key.
            let key = value.split('?').next().unwrap_or(value);
            if let Some(data) = self.cache.load_country(key) {
                return FetchOutcome::ok(data);
            }
        }

        let url = format!("{}/{}/{}", self.base_url, field.as_str(), value);
        match self.get_json(&url) {
            Ok(data) => {
                self.persist_by_name(&data);
                FetchOutcome::ok(data)
            }
            Err(FetchError::Api { status, .. }) if status < 500 => {
                info!("no match for {field}={value} (HTTP {status})");
                FetchOutcome::not_found()
            }
            Err(e) => {
                warn!("query {field}={value} failed: {e}");
                FetchOutcome::server_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn client_with_cache() -> (TempDir, RestCountriesClient) {
        let dir = TempDir::new().expect("tempdir");
        let cache = CacheStore::new(dir.path().to_path_buf());
        // Unroutable base URL: these tests must never touch the network.
        let client = RestCountriesClient::with_options(
            "http://127.0.0.1:9".to_string(),
            Duration::from_millis(200),
            cache,
        )
        .expect("client");
        (dir, client)
    }

    #[test]
    fn fetch_all_prefers_the_cache_file() {
        let (dir, mut client) = client_with_cache();
        let seeded = vec![json!({"name": {"common": "Aruba"}})];
        CacheStore::new(dir.path().to_path_buf())
            .store_all(&seeded)
            .expect("seed");
        assert_eq!(client.fetch_all().expect("cached"), seeded);
    }

    #[test]
    fn name_queries_prefer_the_per_country_cache() {
        let (dir, mut client) = client_with_cache();
        let seeded = vec![json!({"name": {"common": "Chad"}})];
        CacheStore::new(dir.path().to_path_buf())
            .store_country("Chad", &seeded)
            .expect("seed");

        let outcome = client.fetch_by_field(QueryField::Name, "Chad?fullText=true");
        assert_eq!(outcome.data, Some(seeded));
    }

    #[test]
    fn network_failure_maps_to_server_error() {
        let (_dir, mut client) = client_with_cache();
        let outcome = client.fetch_by_field(QueryField::Region, "Oceania");
        assert_eq!(outcome.status, crate::api::provider::FetchStatus::ServerError);
        assert!(outcome.data.is_none());
    }

    #[test]
    fn fetch_all_network_failure_is_an_error() {
        let (_dir, mut client) = client_with_cache();
        assert!(matches!(client.fetch_all(), Err(FetchError::Network(_))));
    }
}
