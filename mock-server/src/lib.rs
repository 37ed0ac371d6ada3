//! In-memory imitation of the seller API's four product endpoints.
//!
//! Requests must carry the configured `Client-Id` / `Api-Key` headers.
//! Batch imports answer per item, the way the real provider does: unknown
//! offers and invalid values are rejected individually inside a `200`.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub product_id: u64,
    pub offer_id: String,
    pub price: String,
    pub old_price: String,
    pub premium_price: String,
    pub stock: u64,
    pub visible: bool,
}

/// Credentials the server accepts and the catalog it starts with.
#[derive(Clone, Debug)]
pub struct MockConfig {
    pub client_id: String,
    pub api_key: String,
    pub products: Vec<Product>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            client_id: "836".to_string(),
            api_key: "test-key".to_string(),
            products: sample_catalog(),
        }
    }
}

pub fn sample_catalog() -> Vec<Product> {
    let product = |product_id, offer_id: &str, prices: [&str; 3], stock, visible| Product {
        product_id,
        offer_id: offer_id.to_string(),
        price: prices[0].to_string(),
        old_price: prices[1].to_string(),
        premium_price: prices[2].to_string(),
        stock,
        visible,
    };
    vec![
        product(1001, "SKU-1", ["100", "120", "95"], 10, true),
        product(1002, "SKU-2", ["250", "300", "240"], 0, true),
        product(1003, "SKU-3", ["75", "", ""], 3, false),
    ]
}

pub type Db = Arc<RwLock<BTreeMap<String, Product>>>;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    client_id: String,
    api_key: String,
}

#[derive(Deserialize)]
pub struct PriceUpdate {
    pub offer_id: String,
    pub price: String,
    pub old_price: String,
    pub premium_price: String,
}

#[derive(Deserialize)]
pub struct PricesImport {
    pub prices: Vec<PriceUpdate>,
}

#[derive(Deserialize)]
pub struct StockUpdate {
    pub offer_id: String,
    pub stock: u64,
}

#[derive(Deserialize)]
pub struct StocksImport {
    pub stocks: Vec<StockUpdate>,
}

#[derive(Deserialize)]
pub struct PricePage {
    pub page: u32,
    pub page_size: u32,
}

#[derive(Serialize)]
pub struct ItemOutcome {
    pub offer_id: String,
    pub updated: bool,
    pub errors: Vec<ItemError>,
}

#[derive(Serialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

pub fn app(config: MockConfig) -> Router {
    let catalog = config
        .products
        .into_iter()
        .map(|p| (p.offer_id.clone(), p))
        .collect();
    let state = AppState {
        db: Arc::new(RwLock::new(catalog)),
        client_id: config.client_id,
        api_key: config.api_key,
    };
    Router::new()
        .route("/v1/product/import/prices", post(import_prices))
        .route("/v1/product/import/stocks", post(import_stocks))
        .route("/v1/product/list", post(list_products))
        .route("/v1/product/info/prices", post(price_info))
        .with_state(state)
}

pub async fn run(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app(config)).await
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    if header("Client-Id") == Some(state.client_id.as_str())
        && header("Api-Key") == Some(state.api_key.as_str())
    {
        return Ok(());
    }
    tracing::warn!("rejected request with bad credentials");
    Err((
        StatusCode::UNAUTHORIZED,
        Json(json!({"code": 16, "message": "invalid Client-Id or Api-Key", "details": []})),
    ))
}

fn rejected(offer_id: String, code: &str, message: &str) -> ItemOutcome {
    ItemOutcome {
        offer_id,
        updated: false,
        errors: vec![ItemError {
            code: code.to_string(),
            message: message.to_string(),
        }],
    }
}

fn accepted(offer_id: String) -> ItemOutcome {
    ItemOutcome {
        offer_id,
        updated: true,
        errors: Vec::new(),
    }
}

fn is_price(value: &str) -> bool {
    value.parse::<f64>().is_ok_and(|p| p >= 0.0)
}

async fn import_prices(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<PricesImport>,
) -> ApiResult {
    authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    let result: Vec<ItemOutcome> = input
        .prices
        .into_iter()
        .map(|update| {
            let Some(product) = db.get_mut(&update.offer_id) else {
                return rejected(update.offer_id, "NOT_FOUND", "product not found");
            };
            if !is_price(&update.price) {
                return rejected(update.offer_id, "INVALID_PRICE", "price is not a number");
            }
            product.price = update.price;
            product.old_price = update.old_price;
            product.premium_price = update.premium_price;
            accepted(update.offer_id)
        })
        .collect();
    tracing::info!(items = result.len(), "prices import");
    Ok(Json(json!({ "result": result })))
}

async fn import_stocks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<StocksImport>,
) -> ApiResult {
    authorize(&state, &headers)?;
    let mut db = state.db.write().await;
    let result: Vec<ItemOutcome> = input
        .stocks
        .into_iter()
        .map(|update| match db.get_mut(&update.offer_id) {
            Some(product) => {
                product.stock = update.stock;
                accepted(update.offer_id)
            }
            None => rejected(update.offer_id, "NOT_FOUND", "product not found"),
        })
        .collect();
    tracing::info!(items = result.len(), "stocks import");
    Ok(Json(json!({ "result": result })))
}

async fn list_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(filter): Json<Value>,
) -> ApiResult {
    authorize(&state, &headers)?;
    let criteria = &filter["filter"];
    let visibility = criteria["visibility"].as_str().unwrap_or("ALL");
    let offer_ids: Vec<&str> = criteria["offer_id"]
        .as_array()
        .map(|ids| ids.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let db = state.db.read().await;
    let items: Vec<Value> = db
        .values()
        .filter(|p| match visibility {
            "VISIBLE" => p.visible,
            "INVISIBLE" => !p.visible,
            _ => true,
        })
        .filter(|p| offer_ids.is_empty() || offer_ids.contains(&p.offer_id.as_str()))
        .map(|p| json!({"product_id": p.product_id, "offer_id": p.offer_id}))
        .collect();
    let total = items.len();
    Ok(Json(json!({"result": {"items": items, "total": total}})))
}

async fn price_info(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(page): Json<PricePage>,
) -> ApiResult {
    authorize(&state, &headers)?;
    if page.page == 0 || page.page_size == 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": {"code": "BAD_REQUEST", "message": "page and page_size must be positive", "data": []}})),
        ));
    }
    let db = state.db.read().await;
    let skip = (page.page as usize - 1) * page.page_size as usize;
    let items: Vec<Value> = db
        .values()
        .skip(skip)
        .take(page.page_size as usize)
        .map(|p| {
            json!({
                "product_id": p.product_id,
                "offer_id": p.offer_id,
                "price": {
                    "price": p.price,
                    "old_price": p.old_price,
                    "premium_price": p.premium_price,
                }
            })
        })
        .collect();
    Ok(Json(json!({"result": {"items": items, "total": db.len()}})))
}
