use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Pagination, ProductListItem};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<ProductListItem>,
    pub pagination: Pagination,
}
