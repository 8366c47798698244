// =====================================================
// HTTP API 테스트 (in-process, MemoryLedger)
// =====================================================
// 목적: 라우팅, 인증, 상태 코드, 응답 본문 형식 검증
// =====================================================

mod common;

use std::str::FromStr;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::*;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use cryptozen_api::domains::market::models::MarketTicker;
use cryptozen_api::domains::trade::ledger::{FailPoint, MemoryLedger};
use cryptozen_api::shared::errors::StoreError;

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post_json(uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal serialized as string")).unwrap()
}

// ===== POST /api/trades =====

#[tokio::test]
async fn place_trade_returns_created_trade() {
    let ledger = MemoryLedger::new();
    let id = ledger.create_account(dec("1000"));
    let (router, state) = setup_app(&ledger);
    let auth = bearer(&state, id);

    let (status, body) = send(
        &router,
        post_json(
            "/api/trades",
            Some(&auth),
            json!({ "symbol": "btc", "side": "buy", "amount": 2, "priceAtTrade": 100 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Trade successful");
    assert_eq!(body["trade"]["accountId"], id);
    assert_eq!(body["trade"]["symbol"], "btc");
    assert_eq!(body["trade"]["side"], "buy");
    assert_eq!(decimal(&body["trade"]["fee"]), dec("0.2"));
    assert!(body["trade"]["timestamp"].is_string());
    assert_eq!(ledger.balance(id).await, Some(dec("799.8")));
}

#[tokio::test]
async fn place_trade_accepts_legacy_field_names() {
    let ledger = MemoryLedger::new();
    let id = ledger.create_account(dec("0"));
    let (router, state) = setup_app(&ledger);
    let auth = bearer(&state, id);

    let (status, _) = send(
        &router,
        post_json(
            "/api/trades",
            Some(&auth),
            json!({ "userId": id, "cryptoSymbol": "eth", "type": "sell", "amount": "1", "priceAtTrade": "50" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ledger.balance(id).await, Some(dec("50")));
}

#[tokio::test]
async fn place_trade_requires_token() {
    let ledger = MemoryLedger::new();
    let (router, _) = setup_app(&ledger);

    let (status, _) = send(
        &router,
        post_json("/api/trades", None, json!({ "symbol": "btc", "side": "buy", "amount": 1, "priceAtTrade": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &router,
        post_json(
            "/api/trades",
            Some("Bearer not-a-token"),
            json!({ "symbol": "btc", "side": "buy", "amount": 1, "priceAtTrade": 1 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn place_trade_for_another_account_is_forbidden() {
    let ledger = MemoryLedger::new();
    let id = ledger.create_account(dec("1000"));
    let other = ledger.create_account(dec("1000"));
    let (router, state) = setup_app(&ledger);
    let auth = bearer(&state, id);

    let (status, _) = send(
        &router,
        post_json(
            "/api/trades",
            Some(&auth),
            json!({ "accountId": other, "symbol": "btc", "side": "buy", "amount": 1, "priceAtTrade": 1 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(ledger.balance(other).await, Some(dec("1000")));
    assert_eq!(ledger.trade_count(), 0);
}

#[tokio::test]
async fn settlement_errors_map_to_status_and_kind() {
    let ledger = MemoryLedger::new();
    let id = ledger.create_account(dec("100"));
    let (router, state) = setup_app(&ledger);
    let auth = bearer(&state, id);

    let cases = [
        (
            json!({ "symbol": "btc", "side": "hold", "amount": 1, "priceAtTrade": 1 }),
            StatusCode::BAD_REQUEST,
            "invalid_argument",
        ),
        (
            json!({ "symbol": "btc", "side": "buy", "amount": 0, "priceAtTrade": 1 }),
            StatusCode::BAD_REQUEST,
            "invalid_argument",
        ),
        (
            json!({ "symbol": "btc", "side": "buy", "amount": 1000000, "priceAtTrade": 1 }),
            StatusCode::BAD_REQUEST,
            "insufficient_balance",
        ),
    ];

    for (body, expected_status, expected_kind) in cases {
        let (status, response) = send(&router, post_json("/api/trades", Some(&auth), body)).await;
        assert_eq!(status, expected_status);
        assert_eq!(response["kind"], expected_kind);
        assert!(response["error"].is_string());
    }

    assert_eq!(ledger.balance(id).await, Some(dec("100")));
    assert_eq!(ledger.trade_count(), 0);
}

#[tokio::test]
async fn trade_for_missing_account_is_not_found() {
    let ledger = MemoryLedger::new();
    let (router, state) = setup_app(&ledger);
    let auth = bearer(&state, 4_242);

    let (status, body) = send(
        &router,
        post_json(
            "/api/trades",
            Some(&auth),
            json!({ "symbol": "btc", "side": "buy", "amount": 1, "priceAtTrade": 1 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
    assert_eq!(body["kind"], "account_not_found");
}

// ===== GET /api/trades/my, GET /api/account =====

#[tokio::test]
async fn my_trades_and_account_reflect_settlements() {
    let ledger = MemoryLedger::new();
    let id = ledger.create_account(dec("1000"));
    let (router, state) = setup_app(&ledger);
    let auth = bearer(&state, id);

    for (symbol, side) in [("btc", "buy"), ("eth", "buy"), ("btc", "sell")] {
        let (status, _) = send(
            &router,
            post_json(
                "/api/trades",
                Some(&auth),
                json!({ "symbol": symbol, "side": side, "amount": 1, "priceAtTrade": 10 }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&router, get("/api/trades/my", Some(&auth))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trades"].as_array().unwrap().len(), 3);

    let (status, body) = send(&router, get("/api/trades/my?symbol=btc&limit=1", Some(&auth))).await;
    assert_eq!(status, StatusCode::OK);
    let trades = body["trades"].as_array().unwrap();
    assert_eq!(trades.len(), 1);
    assert_eq!(trades[0]["symbol"], "btc");

    // 1000 - 10.01 - 10.01 + 10
    let (status, body) = send(&router, get("/api/account", Some(&auth))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["id"], id);
    assert_eq!(decimal(&body["account"]["balance"]), dec("989.98"));
}

#[tokio::test]
async fn account_requires_existing_account() {
    let ledger = MemoryLedger::new();
    let (router, state) = setup_app(&ledger);
    let auth = bearer(&state, 77);

    let (status, _) = send(&router, get("/api/account", Some(&auth))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn store_failures_on_queries_hide_details() {
    let ledger = MemoryLedger::new();
    let id = ledger.create_account(dec("1000"));
    let (router, state) = setup_app(&ledger);
    let auth = bearer(&state, id);

    for uri in ["/api/trades/my", "/api/account"] {
        ledger.fail_once(
            FailPoint::Query,
            StoreError::Unavailable("connection to db.internal:5432 refused".to_string()),
        );

        let (status, body) = send(&router, get(uri, Some(&auth))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body, json!({ "error": "Internal Server Error" }), "{uri}");
    }
}

// ===== 시세 =====

#[tokio::test]
async fn price_is_served_from_latest_snapshot() {
    let ledger = MemoryLedger::new();
    let (router, state) = setup_app(&ledger);

    state.market_state.feed.publish(vec![MarketTicker {
        id: "bitcoin".to_string(),
        symbol: "btc".to_string(),
        name: "Bitcoin".to_string(),
        image: None,
        current_price: Some(100.5),
        market_cap: None,
        price_change_percentage_24h: None,
        last_updated: None,
    }]);

    let (status, body) = send(&router, get("/api/market/price/BTC", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "btc");
    assert_eq!(decimal(&body["price"]), dec("100.5"));

    let (status, body) = send(&router, get("/api/market/markets", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["markets"][0]["id"], "bitcoin");

    let (status, _) = send(&router, get("/api/market/price/doge", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ===== 인증 =====

#[tokio::test]
async fn register_validation_errors_are_unprocessable() {
    let ledger = MemoryLedger::new();
    let (router, _) = setup_app(&ledger);

    let (status, body) = send(
        &router,
        post_json(
            "/api/auth/register",
            None,
            json!({ "username": "bob", "email": "not-an-email", "password": "short" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn login_validation_errors_are_unprocessable() {
    let ledger = MemoryLedger::new();
    let (router, _) = setup_app(&ledger);

    let (status, _) = send(
        &router,
        post_json("/api/auth/login", None, json!({ "email": "a@b.com", "password": "1234" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn verify_requires_token() {
    let ledger = MemoryLedger::new();
    let (router, _) = setup_app(&ledger);

    let (status, body) = send(&router, get("/api/auth/verify", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token not provided");
}
