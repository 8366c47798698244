use crate::domains::trade::models::AccountResponse;
use crate::shared::errors::StoreError;
use crate::shared::middleware::auth::AuthenticatedUser;
use crate::shared::services::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use tracing::error;

/// 내 계정 잔고 조회 핸들러
/// Get my account handler
///
/// # Response
/// - 200: 계정 조회 성공
/// - 404: 계정 없음
/// - 500: 서버 오류
#[utoipa::path(
    get,
    path = "/api/account",
    responses(
        (status = 200, description = "Account retrieved successfully", body = AccountResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Trades"
)]
pub async fn get_account(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<AccountResponse>, (StatusCode, Json<serde_json::Value>)> {
    let account = app_state
        .trade_state
        .trade_service
        .get_account(authenticated_user.user_id)
        .await
        .map_err(|e: StoreError| -> (StatusCode, Json<serde_json::Value>) {
            error!(account_id = authenticated_user.user_id, error = %e, "failed to fetch account");
            e.into()
        })?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "User not found" })),
            )
        })?;

    Ok(Json(AccountResponse { account }))
}
