//! HTTP client for the remote menu feed.
//!
//! The feed is a single JSON document `{"menu": [...]}` behind a fixed GET
//! endpoint - no query parameters, no authentication, no pagination. Raw
//! records are normalized here into `CatalogItem` values before anything
//! else in the crate sees them.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{CatalogItem, OTHER_CATEGORY};

use super::{CatalogSource, FetchError};

/// HTTP request timeout in seconds.
/// 30s allows for slow responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Wire shape of the feed document.
#[derive(Debug, Deserialize)]
struct MenuResponse {
    menu: Vec<RawMenuItem>,
}

/// One raw record as the feed delivers it, before normalization.
/// Field tolerance mirrors what the feed has actually been seen to emit:
/// `title` as an alias for `name`, prices as numbers or numeric strings,
/// and missing image/category fields.
#[derive(Debug, Clone, Deserialize)]
struct RawMenuItem {
    #[serde(default)]
    id: Option<i64>,
    #[serde(alias = "title")]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(deserialize_with = "de_price")]
    price: f64,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

fn de_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct PriceVisitor;

    impl Visitor<'_> for PriceVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            v.trim()
                .parse::<f64>()
                .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(PriceVisitor)
}

/// Parse the feed body, distinguishing malformed payloads from transport
/// failures.
fn parse_menu(body: &str) -> Result<Vec<RawMenuItem>, FetchError> {
    let response: MenuResponse =
        serde_json::from_str(body).map_err(|e| FetchError::DataFormat(e.to_string()))?;
    Ok(response.menu)
}

/// Normalize raw feed records into catalog items.
///
/// Records with a blank name are dropped. Ids are kept only when every
/// surviving record carries one and they are mutually unique; otherwise all
/// ids are reassigned as 1-based position. Ids are re-derived on every fetch,
/// so item identity across syncs follows the upstream order.
fn normalize(records: Vec<RawMenuItem>, image_base_url: &str) -> Vec<CatalogItem> {
    let records: Vec<RawMenuItem> = records
        .into_iter()
        .filter(|r| {
            let keep = !r.name.trim().is_empty();
            if !keep {
                warn!("dropping menu record with blank name");
            }
            keep
        })
        .collect();

    let mut seen = HashSet::new();
    let ids_usable = records
        .iter()
        .all(|r| matches!(r.id, Some(id) if seen.insert(id)));

    records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let id = match (ids_usable, raw.id) {
                (true, Some(id)) => id,
                _ => index as i64 + 1,
            };
            let price = if raw.price < 0.0 {
                warn!(id, price = raw.price, "clamping negative price to zero");
                0.0
            } else {
                raw.price
            };
            let image = raw
                .image
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .map(|i| resolve_image_url(&i, image_base_url));
            let category = raw
                .category
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| OTHER_CATEGORY.to_string());
            CatalogItem {
                id,
                name: raw.name.trim().to_string(),
                description: raw.description,
                price,
                image,
                category,
            }
        })
        .collect()
}

/// Rewrite a relative image filename into an absolute URL under the
/// configured base; absolute URLs pass through untouched.
fn resolve_image_url(image: &str, base_url: &str) -> String {
    if image.starts_with("http://") || image.starts_with("https://") {
        image.to_string()
    } else {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            image.trim_start_matches('/')
        )
    }
}

/// Client for the remote menu feed.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    menu_url: String,
    image_base_url: String,
}

impl CatalogClient {
    /// Create a new client from the configured endpoint URLs.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            menu_url: config.menu_url.clone(),
            image_base_url: config.image_base_url.clone(),
        })
    }

    async fn fetch_catalog(&self) -> Result<Vec<CatalogItem>, FetchError> {
        debug!(url = %self.menu_url, "fetching menu feed");
        let response = self.client.get(&self.menu_url).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(FetchError::from_status(status, &body));
        }

        let items = normalize(parse_menu(&body)?, &self.image_base_url);
        debug!(count = items.len(), "menu feed normalized");
        Ok(items)
    }
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch(&self) -> Result<Vec<CatalogItem>, FetchError> {
        self.fetch_catalog().await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/images";

    #[test]
    fn test_parse_menu_document() {
        let json = r#"{"menu": [
            {"id": 1, "title": "Greek Salad", "description": "Crisp and fresh", "price": "10.00", "image": "greekSalad.jpg", "category": "starters"},
            {"id": 2, "title": "Lemon Dessert", "description": "Classic", "price": 4.99, "image": "lemonDessert.jpg", "category": "desserts"}
        ]}"#;

        let records = parse_menu(json).expect("parse failed");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Greek Salad");
        assert_eq!(records[0].price, 10.0);
        assert_eq!(records[1].price, 4.99);
    }

    #[test]
    fn test_parse_menu_missing_array_is_data_format_error() {
        let err = parse_menu(r#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, FetchError::DataFormat(_)));

        let err = parse_menu("not json at all").unwrap_err();
        assert!(matches!(err, FetchError::DataFormat(_)));
    }

    #[test]
    fn test_parse_menu_rejects_non_numeric_price() {
        let json = r#"{"menu": [{"name": "Soup", "price": "free"}]}"#;
        assert!(matches!(
            parse_menu(json),
            Err(FetchError::DataFormat(_))
        ));
    }

    #[test]
    fn test_normalize_keeps_unique_upstream_ids() {
        let records = parse_menu(
            r#"{"menu": [
                {"id": 7, "name": "Soup", "price": 3.5},
                {"id": 9, "name": "Bread", "price": 2.0}
            ]}"#,
        )
        .unwrap();

        let items = normalize(records, BASE);
        assert_eq!(items[0].id, 7);
        assert_eq!(items[1].id, 9);
    }

    #[test]
    fn test_normalize_reassigns_missing_or_duplicate_ids() {
        let records = parse_menu(
            r#"{"menu": [
                {"id": 7, "name": "Soup", "price": 3.5},
                {"name": "Bread", "price": 2.0},
                {"id": 7, "name": "Cake", "price": 4.0}
            ]}"#,
        )
        .unwrap();

        let items = normalize(records, BASE);
        let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_normalize_defaults_category_to_other() {
        let records = parse_menu(
            r#"{"menu": [
                {"name": "Soup", "price": 3.5},
                {"name": "Bread", "price": 2.0, "category": "  "}
            ]}"#,
        )
        .unwrap();

        let items = normalize(records, BASE);
        assert!(items.iter().all(|i| i.category == OTHER_CATEGORY));
    }

    #[test]
    fn test_normalize_resolves_image_urls() {
        let records = parse_menu(
            r#"{"menu": [
                {"name": "Soup", "price": 3.5, "image": "soup.jpg"},
                {"name": "Bread", "price": 2.0, "image": "https://cdn.example.com/bread.jpg"},
                {"name": "Cake", "price": 4.0, "image": ""},
                {"name": "Fish", "price": 9.0}
            ]}"#,
        )
        .unwrap();

        let items = normalize(records, BASE);
        assert_eq!(
            items[0].image.as_deref(),
            Some("https://example.com/images/soup.jpg")
        );
        assert_eq!(
            items[1].image.as_deref(),
            Some("https://cdn.example.com/bread.jpg")
        );
        assert_eq!(items[2].image, None);
        assert_eq!(items[3].image, None);
    }

    #[test]
    fn test_normalize_drops_blank_names_and_clamps_prices() {
        let records = parse_menu(
            r#"{"menu": [
                {"name": "  ", "price": 3.5},
                {"name": "Bread", "price": -2.0}
            ]}"#,
        )
        .unwrap();

        let items = normalize(records, BASE);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Bread");
        assert_eq!(items[0].price, 0.0);
        assert_eq!(items[0].id, 1);
    }

    #[test]
    fn test_resolve_image_url_joins_cleanly() {
        assert_eq!(
            resolve_image_url("/soup.jpg", "https://example.com/images/"),
            "https://example.com/images/soup.jpg"
        );
    }
}
