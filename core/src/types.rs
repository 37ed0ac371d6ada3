//! Item records, request bodies, and reshaped results for the seller API.
//!
//! # Design
//! Outgoing records are explicit structs built with named constructors.
//! Price fields are always sent as strings; stock counts stay numeric.
//! Reshaped results (`BatchError`, `PriceRow`) serialize as positional
//! arrays so hosts that consume JSON see the same rows the provider's
//! spreadsheet-style callers expect.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::ApiError;

/// One item's price fields for `v1/product/import/prices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceItem {
    pub offer_id: String,
    pub price: String,
    pub old_price: String,
    pub premium_price: String,
}

impl PriceItem {
    /// Build a price record, rendering every field with its `Display` impl.
    ///
    /// `PriceItem::new("sku-1", 10, 15.5, "9")` sends
    /// `{"offer_id":"sku-1","price":"10","old_price":"15.5","premium_price":"9"}`.
    pub fn new(
        offer_id: impl fmt::Display,
        price: impl fmt::Display,
        old_price: impl fmt::Display,
        premium_price: impl fmt::Display,
    ) -> Result<Self, ApiError> {
        let offer_id = offer_id.to_string();
        if offer_id.is_empty() {
            return Err(ApiError::InvalidItem("price item has an empty offer_id".to_string()));
        }
        Ok(Self {
            offer_id,
            price: price.to_string(),
            old_price: old_price.to_string(),
            premium_price: premium_price.to_string(),
        })
    }
}

/// One item's inventory count for `v1/product/import/stocks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub offer_id: String,
    pub stock: u64,
}

impl StockItem {
    pub fn new(offer_id: impl Into<String>, stock: u64) -> Self {
        Self {
            offer_id: offer_id.into(),
            stock,
        }
    }
}

/// Body of `v1/product/import/prices`.
#[derive(Debug, Serialize)]
pub(crate) struct PricesImport<'a> {
    pub prices: &'a [PriceItem],
}

/// Body of `v1/product/import/stocks`.
#[derive(Debug, Serialize)]
pub(crate) struct StocksImport<'a> {
    pub stocks: &'a [StockItem],
}

/// Paging input for `v1/product/info/prices`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePage {
    pub page: u32,
    pub page_size: u32,
}

/// Typed convenience for the `v1/product/list` filter body.
///
/// The list operation sends whatever JSON it is given; this type only helps
/// callers produce the common shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListFilter {
    #[serde(default)]
    pub filter: ListCriteria,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCriteria {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offer_id: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_id: Vec<u64>,
    /// e.g. `ALL`, `VISIBLE`, `INVISIBLE`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

impl ProductListFilter {
    pub fn visibility(visibility: impl Into<String>) -> Self {
        Self {
            filter: ListCriteria {
                visibility: Some(visibility.into()),
                ..ListCriteria::default()
            },
            ..Self::default()
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value, ApiError> {
        serde_json::to_value(self).map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

/// Provider error code; the API uses both numeric and textual codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(String),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Number(n) => write!(f, "{n}"),
            ErrorCode::Text(s) => f.write_str(s),
        }
    }
}

/// One item-level failure inside a batch response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemError {
    pub code: ErrorCode,
    #[serde(default)]
    pub message: String,
}

/// Per-item outcome record in a batch import response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchItemResult {
    pub offer_id: String,
    #[serde(default)]
    pub errors: Vec<ItemError>,
}

/// A rejected item extracted from a batch response.
///
/// `position` is 1-based within the submitted batch. Only the first error of
/// an item is kept. Serializes as `[position, offer_id, code, message]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchError {
    pub position: usize,
    pub offer_id: String,
    pub code: ErrorCode,
    pub message: String,
}

impl Serialize for BatchError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.position, &self.offer_id, &self.code, &self.message).serialize(serializer)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStatus {
    #[default]
    Ok,
}

/// Result of a batch update.
///
/// `updated` is `ok` whenever the call itself went through, even if some
/// items were rejected; callers must inspect `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub updated: UpdateStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<BatchError>,
}

impl UpdateOutcome {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PriceInfoItem {
    pub offer_id: String,
    pub price: PriceInfo,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PriceInfo {
    #[serde(default, deserialize_with = "price_text")]
    pub price: String,
    #[serde(default, deserialize_with = "price_text")]
    pub old_price: String,
    #[serde(default, deserialize_with = "price_text")]
    pub premium_price: String,
}

/// Price fields arrive as strings, numbers or `null`; null reads as `""`.
fn price_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

/// Current prices of one item. Serializes as
/// `[offer_id, price, old_price, premium_price]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRow {
    pub offer_id: String,
    pub price: String,
    pub old_price: String,
    pub premium_price: String,
}

impl PriceInfoItem {
    pub(crate) fn into_row(self) -> PriceRow {
        PriceRow {
            offer_id: self.offer_id,
            price: self.price.price,
            old_price: self.price.old_price,
            premium_price: self.price.premium_price,
        }
    }
}

impl Serialize for PriceRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (
            &self.offer_id,
            &self.price,
            &self.old_price,
            &self.premium_price,
        )
            .serialize(serializer)
    }
}
