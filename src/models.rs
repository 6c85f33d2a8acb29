use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog card projection returned by the listing routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListItem {
    pub id_product: i64,
    pub name: String,
    pub base_price: f64,
    pub preparation_time: String,
    pub primary_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id_product_image: i64,
    pub image_url: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Flavor {
    pub id_flavor: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub id_size: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_modifier: f64,
}

/// The detail row as the routine returns it, ingredients still JSON text.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailRow {
    pub id_product: i64,
    pub name: String,
    pub description: Option<String>,
    pub ingredients_json: Option<String>,
    pub base_price: f64,
    pub preparation_time: String,
    pub id_category: i64,
    pub category_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id_product: i64,
    pub name: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub base_price: f64,
    pub preparation_time: String,
    pub id_category: i64,
    pub category_name: String,
    pub images: Vec<Image>,
    pub flavors: Vec<Flavor>,
    pub sizes: Vec<Size>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(current_page: i64, page_size: i64, total_items: i64) -> Self {
        let total_items = total_items.max(0);
        let total_pages = if page_size > 0 {
            total_items / page_size + i64::from(total_items % page_size != 0)
        } else {
            0
        };
        Self {
            current_page,
            page_size,
            total_items,
            total_pages,
        }
    }
}
