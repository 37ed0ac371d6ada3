//! End-to-end run of every operation against the live mock server.
//!
//! Starts the mock server on a random port, then drives the client over real
//! HTTP through `UreqFetch`.

#![cfg(feature = "ureq")]

use ozon_seller_core::{
    ApiError, ClientOptions, ErrorCode, Fetch, HttpMethod, HttpRequest, PriceItem, PricePage,
    ProductListFilter, SellerClient, StockItem, TestProfile, UreqFetch,
};

fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_seller_api::run(listener, mock_seller_api::MockConfig::default()).await
        })
        .unwrap();
    });

    format!("http://{addr}/")
}

#[test]
fn seller_lifecycle() {
    let base_url = start_mock_server();
    let fetch = UreqFetch::new();
    let client = SellerClient::new(
        ClientOptions::test(TestProfile::new("836", "test-key")).with_base_url(&base_url),
    )
    .unwrap();

    // Step 1: list all products.
    let filter = ProductListFilter::visibility("ALL").to_value().unwrap();
    let items = client.get_item_list(&fetch, Some(&filter)).unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["offer_id"], "SKU-1");

    // Step 2: update prices; the unknown offer is rejected as data.
    let prices = vec![
        PriceItem::new("SKU-1", 110, 130, 105).unwrap(),
        PriceItem::new("MISSING", 1, 2, 1).unwrap(),
    ];
    let outcome = client.update_prices(&fetch, &prices).unwrap();
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].position, 2);
    assert_eq!(outcome.errors[0].offer_id, "MISSING");
    assert_eq!(outcome.errors[0].code, ErrorCode::Text("NOT_FOUND".to_string()));

    // Step 3: update stock, all accepted.
    let stocks = vec![StockItem::new("SKU-2", 12), StockItem::new("SKU-3", 0)];
    let outcome = client.update_stock(&fetch, &stocks).unwrap();
    assert!(!outcome.has_errors());
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        serde_json::json!({"updated": "ok"})
    );

    // Step 4: read prices back.
    let rows = client
        .get_items_prices(
            &fetch,
            PricePage {
                page: 1,
                page_size: 50,
            },
        )
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].offer_id, "SKU-1");
    assert_eq!(rows[0].price, "110");
    assert_eq!(rows[0].old_price, "130");
    assert_eq!(rows[0].premium_price, "105");

    // Step 5: an invalid page comes back as a provider error envelope.
    let err = client
        .get_items_prices(
            &fetch,
            PricePage {
                page: 1,
                page_size: 0,
            },
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::Provider { status: 400, .. }));
}

#[test]
fn wrong_credentials_surface_as_provider_error() {
    let base_url = start_mock_server();
    let client = SellerClient::new(ClientOptions::production("836", "wrong").with_base_url(&base_url))
        .unwrap();

    let err = client
        .update_stock(&UreqFetch::new(), &[StockItem::new("SKU-1", 1)])
        .unwrap_err();
    assert!(matches!(err, ApiError::Provider { status: 401, .. }));
}

#[test]
fn unreachable_host_is_a_transport_error() {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    drop(std_listener);

    let client = SellerClient::new(
        ClientOptions::production("836", "test-key").with_base_url(format!("http://{addr}/")),
    )
    .unwrap();
    let err = client
        .get_item_list(&UreqFetch::new(), Some(&serde_json::json!({})))
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn get_requests_go_out_as_get_with_or_without_body() {
    let base_url = start_mock_server();
    let fetch = UreqFetch::new();

    for body in [None, Some(r#"{"filter":{}}"#.to_string())] {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: format!("{base_url}v1/product/list"),
            headers: vec![
                ("Client-Id".to_string(), "836".to_string()),
                ("Api-Key".to_string(), "test-key".to_string()),
            ],
            body,
        };
        // Seller routes only accept POST, so a real GET gets 405 back as data.
        let response = fetch.fetch(&request).unwrap();
        assert_eq!(response.status, 405);
    }
}
