use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};

use crate::{
    dto::products::ProductListResponse,
    error::{AppError, AppResult, ValidationErrors},
    middleware::account::AccountContext,
    models::ProductDetail,
    response::{ApiResponse, ErrorResponse},
    routes::params::{ProductListQuery, parse_product_id},
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
}

#[utoipa::path(
    get,
    path = "/api/v1/external/product",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Paginated catalog listing", body = ApiResponse<ProductListResponse>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    account: AccountContext,
    query: Result<Query<ProductListQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<ProductListResponse>>> {
    let Query(query) = query.map_err(|rejection| {
        AppError::validation(
            "Invalid query parameters.",
            ValidationErrors::single("query", rejection.body_text()),
        )
    })?;
    let params = query
        .validate()
        .map_err(|details| AppError::validation("Invalid query parameters.", details))?;

    let result = product_service::list_products(&state, &account, params).await?;
    Ok(Json(ApiResponse::success(result)))
}

#[utoipa::path(
    get,
    path = "/api/v1/external/product/{id}",
    params(
        ("id" = i64, Path, description = "Product ID, a positive integer")
    ),
    responses(
        (status = 200, description = "Product detail", body = ApiResponse<ProductDetail>),
        (status = 400, description = "Invalid product ID", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    account: AccountContext,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    let id_product = parse_product_id(&id)
        .map_err(|details| AppError::validation("Invalid product ID.", details))?;

    match product_service::get_product(&state, &account, id_product).await? {
        Some(product) => Ok(Json(ApiResponse::success(product))),
        None => Err(AppError::NotFound("Product not found.".to_string())),
    }
}
