use crate::error::DataError;
use async_trait::async_trait;
use gloo_net::http::Request;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PRODUCT_IDS: [&str; 4] = ["21-40092", "24S5A-FD182", "Y5435WR", "L901986Da"];

const DEFAULT_PRICE: f64 = 20.0;
const MAX_SIGNAL: f64 = 100.0;

const MOCK_PRICES: [(&str, f64, &str); 4] = [
    ("21-40092", 19.99, "T-Shirt"),
    ("24S5A-FD182", 49.99, "Jeans"),
    ("Y5435WR", 89.99, "Shoes"),
    ("L901986Da", 199.99, "Jacket"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub image_ref: String,
    pub price: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ProductRecord {
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default, rename = "classQuizResults")]
    class_quiz_results: Vec<Value>,
}

#[async_trait(?Send)]
pub trait CardSource {
    async fn fetch_card(&self, id: &str) -> Result<Card, DataError>;
}

pub struct HttpCardSource {
    base_url: String,
}

impl HttpCardSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for HttpCardSource {
    fn default() -> Self {
        Self::new("assets/products")
    }
}

#[async_trait(?Send)]
impl CardSource for HttpCardSource {
    async fn fetch_card(&self, id: &str) -> Result<Card, DataError> {
        let url = format!("{}/{}.json", self.base_url, id);
        let response = Request::get(&url)
            .send()
            .await
            .map_err(DataError::network)?;

        if response.status() == 404 {
            return Err(DataError::NotFound(id.to_owned()));
        }

        if !response.ok() {
            return Err(DataError::Network(format!(
                "HTTP {} while fetching {}",
                response.status(),
                url
            )));
        }

        let text = response.text().await.map_err(DataError::network)?;
        let record: ProductRecord = serde_json::from_str(&text).map_err(DataError::parse)?;
        Ok(card_from_record(id, record))
    }
}

fn card_from_record(id: &str, record: ProductRecord) -> Card {
    let signals: Vec<f64> = record
        .class_quiz_results
        .iter()
        .filter_map(Value::as_f64)
        .collect();
    Card {
        id: id.to_owned(),
        image_ref: record
            .image_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| placeholder_image(id)),
        price: derive_price(&signals),
    }
}

/// Mean of the finite signals below 100, rounded to cents. Falls back to 20.
pub fn derive_price(signals: &[f64]) -> f64 {
    let valid: Vec<f64> = signals
        .iter()
        .copied()
        .filter(|value| value.is_finite() && *value < MAX_SIGNAL)
        .collect();
    if valid.is_empty() {
        return DEFAULT_PRICE;
    }
    let average = valid.iter().sum::<f64>() / valid.len() as f64;
    (average * 100.0).round() / 100.0
}

pub fn placeholder_image(label: &str) -> String {
    format!("/placeholder.svg?height=400&width=300&text={}", label)
}

pub fn fallback_card(id: &str) -> Card {
    match MOCK_PRICES.iter().find(|(mock_id, _, _)| *mock_id == id) {
        Some((_, price, label)) => Card {
            id: id.to_owned(),
            image_ref: placeholder_image(label),
            price: *price,
        },
        None => Card {
            id: id.to_owned(),
            image_ref: placeholder_image(id),
            price: DEFAULT_PRICE,
        },
    }
}

pub fn fallback_cards() -> Vec<Card> {
    PRODUCT_IDS.iter().map(|id| fallback_card(id)).collect()
}

pub async fn load_cards<S: CardSource + ?Sized>(source: &S, ids: &[&str]) -> Vec<Card> {
    let mut cards = Vec::with_capacity(ids.len());
    for id in ids {
        match source.fetch_card(id).await {
            Ok(mut card) => {
                if !card.price.is_finite() {
                    card.price = DEFAULT_PRICE;
                }
                info!("Loaded product {} at {:.2}", id, card.price);
                cards.push(card);
            }
            Err(err) => {
                warn!("Using fallback for product {}: {}", id, err);
                cards.push(fallback_card(id));
            }
        }
    }
    cards
}
