//! The seller API client.
//!
//! # Design
//! `SellerClient` holds only its resolved `ClientConfig` and carries no state
//! between calls. Each operation comes in three forms:
//!
//! - `build_*` produces the `HttpRequest` to send,
//! - `parse_*` turns the provider's `HttpResponse` into a result,
//! - the plain method (`update_prices`, ...) does both around exactly one
//!   `Fetch::fetch` call. There is no retry and no status-code branching.

use serde::Deserialize;
use serde_json::Value;

use crate::batch::errors_in_result;
use crate::config::{ClientConfig, ClientOptions, Environment};
use crate::error::ApiError;
use crate::http::{Fetch, HttpMethod, HttpRequest, HttpResponse};
use crate::request::{build_request, json_body, parse_json, take_result};
use crate::types::{
    PriceInfoItem, PriceItem, PricePage, PriceRow, PricesImport, StockItem, StocksImport,
    UpdateOutcome,
};

pub const IMPORT_PRICES_PATH: &str = "v1/product/import/prices";
pub const IMPORT_STOCKS_PATH: &str = "v1/product/import/stocks";
pub const PRODUCT_LIST_PATH: &str = "v1/product/list";
pub const PRICES_INFO_PATH: &str = "v1/product/info/prices";

/// Synchronous client for the marketplace seller API.
#[derive(Debug, Clone)]
pub struct SellerClient {
    config: ClientConfig,
}

impl SellerClient {
    /// Resolve `options` and build a client. Fails with
    /// `ApiError::Configuration` when neither test mode nor a full set of
    /// credentials is given.
    pub fn new(options: ClientOptions) -> Result<Self, ApiError> {
        Ok(Self::from_config(ClientConfig::resolve(options)?))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn environment(&self) -> Environment {
        self.config.environment()
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn account_id(&self) -> &str {
        &self.config.credentials().account_id
    }

    // -- prices import ------------------------------------------------------

    pub fn build_update_prices(&self, items: &[PriceItem]) -> Result<HttpRequest, ApiError> {
        let body = json_body(&PricesImport { prices: items })?;
        Ok(self.post(IMPORT_PRICES_PATH, body))
    }

    pub fn parse_update_prices(&self, response: HttpResponse) -> Result<UpdateOutcome, ApiError> {
        parse_update(IMPORT_PRICES_PATH, &response)
    }

    /// Send one batch of price updates. Item-level rejections come back in
    /// `UpdateOutcome::errors`, not as `Err`.
    pub fn update_prices(
        &self,
        fetch: &impl Fetch,
        items: &[PriceItem],
    ) -> Result<UpdateOutcome, ApiError> {
        let request = self.build_update_prices(items)?;
        self.parse_update_prices(fetch.fetch(&request)?)
    }

    // -- stocks import ------------------------------------------------------

    pub fn build_update_stock(&self, items: &[StockItem]) -> Result<HttpRequest, ApiError> {
        let body = json_body(&StocksImport { stocks: items })?;
        Ok(self.post(IMPORT_STOCKS_PATH, body))
    }

    pub fn parse_update_stock(&self, response: HttpResponse) -> Result<UpdateOutcome, ApiError> {
        parse_update(IMPORT_STOCKS_PATH, &response)
    }

    pub fn update_stock(
        &self,
        fetch: &impl Fetch,
        items: &[StockItem],
    ) -> Result<UpdateOutcome, ApiError> {
        let request = self.build_update_stock(items)?;
        self.parse_update_stock(fetch.fetch(&request)?)
    }

    // -- product list -------------------------------------------------------

    /// The filter is sent verbatim. `None` and JSON-falsy values (`null`,
    /// `false`, `0`, `""`) are rejected before a request exists.
    pub fn build_item_list(&self, filter: Option<&Value>) -> Result<HttpRequest, ApiError> {
        let filter = filter
            .filter(|f| !is_falsy(f))
            .ok_or(ApiError::MissingArgument("filter"))?;
        let body = json_body(filter)?;
        Ok(self.post(PRODUCT_LIST_PATH, body))
    }

    /// Returns `result.items` unmodified.
    pub fn parse_item_list(&self, response: HttpResponse) -> Result<Vec<Value>, ApiError> {
        let mut result = take_result(parse_json(&response)?, response.status)?;
        match result.get_mut("items").map(Value::take) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ApiError::UnexpectedResponseShape(
                "`result.items` is missing or not an array".to_string(),
            )),
        }
    }

    pub fn get_item_list(
        &self,
        fetch: &impl Fetch,
        filter: Option<&Value>,
    ) -> Result<Vec<Value>, ApiError> {
        let request = self.build_item_list(filter)?;
        self.parse_item_list(fetch.fetch(&request)?)
    }

    // -- price info ---------------------------------------------------------

    pub fn build_items_prices(&self, page: PricePage) -> Result<HttpRequest, ApiError> {
        let body = json_body(&page)?;
        Ok(self.post(PRICES_INFO_PATH, body))
    }

    /// One `PriceRow` per entry of `result.items`, in response order.
    pub fn parse_items_prices(&self, response: HttpResponse) -> Result<Vec<PriceRow>, ApiError> {
        let result = take_result(parse_json(&response)?, response.status)?;
        let items = result.get("items").ok_or_else(|| {
            ApiError::UnexpectedResponseShape("`result.items` is missing".to_string())
        })?;
        let items = Vec::<PriceInfoItem>::deserialize(items).map_err(|e| {
            ApiError::UnexpectedResponseShape(format!("malformed price item: {e}"))
        })?;
        Ok(items.into_iter().map(PriceInfoItem::into_row).collect())
    }

    pub fn get_items_prices(
        &self,
        fetch: &impl Fetch,
        page: PricePage,
    ) -> Result<Vec<PriceRow>, ApiError> {
        let request = self.build_items_prices(page)?;
        self.parse_items_prices(fetch.fetch(&request)?)
    }

    fn post(&self, path: &str, body: String) -> HttpRequest {
        build_request(&self.config, HttpMethod::Post, path, None, Some(body))
    }
}

fn parse_update(path: &str, response: &HttpResponse) -> Result<UpdateOutcome, ApiError> {
    let result = take_result(parse_json(response)?, response.status)?;
    let errors = errors_in_result(&result)?;
    if !errors.is_empty() {
        tracing::warn!(path, rejected = errors.len(), "provider rejected some batch items");
    }
    Ok(UpdateOutcome {
        errors,
        ..UpdateOutcome::default()
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
