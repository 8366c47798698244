use std::sync::Arc;
use std::time::Duration;
use anyhow::{Context, Result};
use axum::Router;
use axum::http::{header, HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use cryptozen_api::config::AppConfig;
use cryptozen_api::domains::market::services::{MarketPoller, MarketSource};
use cryptozen_api::routes::create_router;
use cryptozen_api::shared::database::Database;
use cryptozen_api::shared::logging::init_logging;
use cryptozen_api::shared::services::AppState;

// Import models for OpenAPI schema
use cryptozen_api::domains::auth::models::*;
use cryptozen_api::domains::market::models::*;
use cryptozen_api::domains::trade::models::*;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        cryptozen_api::domains::auth::handlers::auth_handler::register,
        cryptozen_api::domains::auth::handlers::auth_handler::login,
        cryptozen_api::domains::auth::handlers::auth_handler::verify,
        cryptozen_api::domains::trade::handlers::trade_handler::place_trade,
        cryptozen_api::domains::trade::handlers::trade_handler::get_my_trades,
        cryptozen_api::domains::trade::handlers::account_handler::get_account,
        cryptozen_api::domains::market::handlers::market_handler::get_markets,
        cryptozen_api::domains::market::handlers::market_handler::get_price,
        cryptozen_api::domains::market::handlers::market_handler::get_market_chart,
        cryptozen_api::domains::market::handlers::market_handler::get_ohlc
    ),
    components(schemas(
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        VerifyResponse,
        UserResponse,
        UserRole,
        TradeSide,
        Trade,
        PlaceTradeRequest,
        PlaceTradeResponse,
        TradesResponse,
        Account,
        AccountResponse,
        MarketTicker,
        MarketUpdate,
        MarketsResponse,
        PriceResponse
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Auth", description = "Register, login and token verification"),
        (name = "Trades", description = "Trade settlement and account queries"),
        (name = "Market", description = "Market data (CoinGecko proxy and live snapshot)")
    ),
    info(
        title = "CryptoZen API Server",
        description = "Demo crypto trading API: accounts, trade settlement and market data",
        version = "1.0.0"
    )
)]
struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 설정 + 로깅
    let config = AppConfig::load()?;
    init_logging(&config.log);
    info!(env = %config.env, "configuration loaded");

    // DB 연결 + 마이그레이션
    let db = Database::new(&config.database).await?;
    db.initialize().await?;

    // AppState 생성 (모든 Service 초기화)
    let app_state = AppState::new(config.clone(), db)?;

    // 개발 환경 기본 사용자
    if config.is_development() && config.account.seed_default_users {
        if let Err(e) = app_state.auth_state.auth_service.seed_default_users().await {
            error!(error = %e, "failed to initialize default users");
        }
    }

    // 시세 폴러 시작
    let poller = if config.market.enabled {
        let source: Arc<dyn MarketSource> = app_state.market_state.client.clone();
        Some(
            MarketPoller::new(
                source,
                app_state.market_state.feed.clone(),
                Duration::from_millis(config.market.poll_interval_ms),
            )
            .start(),
        )
    } else {
        info!("market poller disabled");
        None
    };

    // CORS 설정
    let cors = CorsLayer::new()
        .allow_origin(
            config
                .server
                .cors_origin
                .parse::<HeaderValue>()
                .context("Invalid server.cors_origin")?,
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true);

    // Router 생성
    let app = Router::new()
        .merge(create_router())
        .merge(SwaggerUi::new("/api").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("server running on http://{}", addr);
    info!("swagger UI available at http://{}/api", addr);

    // 서버 실행 (Ctrl+C 시 종료)
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(poller) = poller {
        poller.stop().await;
    }

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
