use crate::direction::Classification;
use crate::error::FeedbackError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gloo_net::http::Request;
use log::{error, info};
use serde::Serialize;

pub const FEEDBACK_ENDPOINT: &str = "api/feedback";
pub const THB_PER_USD: f64 = 33.39;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub product_id: String,
    #[serde(rename = "priceUSD")]
    pub price_usd: f64,
    #[serde(rename = "priceTHB")]
    pub price_thb: f64,
    pub feedback: Classification,
    pub timestamp: String,
    pub currency: &'static str,
}

impl FeedbackRecord {
    pub fn new(
        card_id: &str,
        price: f64,
        classification: Classification,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            product_id: card_id.to_owned(),
            price_usd: price,
            price_thb: to_thb(price),
            feedback: classification,
            timestamp: at.to_rfc3339(),
            currency: "THB",
        }
    }
}

pub fn to_thb(usd: f64) -> f64 {
    usd * THB_PER_USD
}

#[async_trait(?Send)]
pub trait FeedbackSink {
    async fn persist(&self, record: &FeedbackRecord) -> Result<(), FeedbackError>;
}

pub struct HttpFeedbackSink {
    endpoint: String,
}

impl HttpFeedbackSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Default for HttpFeedbackSink {
    fn default() -> Self {
        Self::new(FEEDBACK_ENDPOINT)
    }
}

#[async_trait(?Send)]
impl FeedbackSink for HttpFeedbackSink {
    async fn persist(&self, record: &FeedbackRecord) -> Result<(), FeedbackError> {
        let response = Request::post(&self.endpoint)
            .json(record)
            .map_err(|err| FeedbackError::Encode(err.to_string()))?
            .send()
            .await
            .map_err(FeedbackError::network)?;

        if !response.ok() {
            return Err(FeedbackError::Rejected {
                card_id: record.product_id.clone(),
                status: response.status(),
            });
        }
        Ok(())
    }
}

/// Sends one classification to the store. Failures are logged and swallowed;
/// the local history stays authoritative either way.
pub async fn submit<S: FeedbackSink + ?Sized>(
    sink: &S,
    card_id: &str,
    price: f64,
    classification: Classification,
) -> bool {
    let record = FeedbackRecord::new(card_id, price, classification, Utc::now());
    match sink.persist(&record).await {
        Ok(()) => {
            info!(
                "Stored feedback for {}: {} at {:.2} THB ({} USD)",
                card_id,
                classification.as_str(),
                record.price_thb,
                price
            );
            true
        }
        Err(err) => {
            error!("Error storing feedback for product {}: {}", card_id, err);
            false
        }
    }
}
