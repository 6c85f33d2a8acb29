use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::products::ProductListResponse,
    error::FieldError,
    models::{Flavor, Image, Pagination, ProductDetail, ProductListItem, Size},
    response::{ApiResponse, ErrorBody, ErrorResponse, Metadata},
    routes::{health, params, products as product_routes},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        product_routes::list_products,
        product_routes::get_product,
    ),
    components(
        schemas(
            ProductListItem,
            ProductDetail,
            Image,
            Flavor,
            Size,
            Pagination,
            ProductListResponse,
            params::ProductSort,
            health::HealthData,
            Metadata,
            ErrorBody,
            ErrorResponse,
            FieldError,
            ApiResponse<ProductListResponse>,
            ApiResponse<ProductDetail>,
            ApiResponse<health::HealthData>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Public catalog endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
