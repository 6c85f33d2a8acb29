use crate::{
    dto::products::ProductListResponse,
    error::AppResult,
    gateway::{Expect, ResultSetSchema, RoutineParams, decode_row, decode_rows},
    middleware::account::AccountContext,
    models::{Flavor, Image, Pagination, ProductDetail, ProductDetailRow, ProductListItem, Size},
    routes::params::ProductListParams,
    state::AppState,
};

pub const PRODUCT_LIST_ROUTINE: &str = "functional.sp_product_list";
pub const PRODUCT_GET_ROUTINE: &str = "functional.sp_product_get";

/// Result sets of [`PRODUCT_GET_ROUTINE`], in the order it opens them.
pub const PRODUCT_GET_RESULT_SETS: ResultSetSchema =
    ResultSetSchema::new(&["product_details", "images", "flavors", "sizes"]);

#[derive(serde::Deserialize)]
struct TotalRow {
    total: i64,
}

pub fn list_params(account: &AccountContext, params: &ProductListParams) -> RoutineParams {
    RoutineParams::new()
        .with("id_account", account.id_account)
        .with("page_number", params.page)
        .with("page_size", params.page_size)
        .with("sort", params.sort.as_str())
        .with("search_term", params.search.clone())
        .with("category_ids", params.categories.clone())
        .with("flavor_ids", params.flavors.clone())
        .with("size_ids", params.sizes.clone())
        .with("min_price", params.price_min)
        .with("max_price", params.price_max)
}

pub async fn list_products(
    state: &AppState,
    account: &AccountContext,
    params: ProductListParams,
) -> AppResult<ProductListResponse> {
    let mut sets = state
        .gateway
        .execute(
            PRODUCT_LIST_ROUTINE,
            &list_params(account, &params),
            Expect::Multi,
        )
        .await?
        .into_multi()?
        .into_iter();

    let products: Vec<ProductListItem> =
        decode_rows("products", sets.next().unwrap_or_default())?;

    let total = match sets.next().and_then(|set| set.into_iter().next()) {
        Some(row) => decode_row::<TotalRow>("total", row)?.total,
        None => {
            tracing::warn!(
                routine = PRODUCT_LIST_ROUTINE,
                "routine returned no total row, assuming zero"
            );
            0
        }
    };

    let pagination = Pagination::new(params.page, params.page_size, total);
    Ok(ProductListResponse {
        products,
        pagination,
    })
}

pub async fn get_product(
    state: &AppState,
    account: &AccountContext,
    id_product: i64,
) -> AppResult<Option<ProductDetail>> {
    let params = RoutineParams::new()
        .with("id_account", account.id_account)
        .with("id_product", id_product);

    let mut sets = state
        .gateway
        .execute(
            PRODUCT_GET_ROUTINE,
            &params,
            Expect::Named(PRODUCT_GET_RESULT_SETS),
        )
        .await?
        .into_named()?;

    let Some(detail) = sets.take("product_details")?.into_iter().next() else {
        return Ok(None);
    };
    let detail: ProductDetailRow = decode_row("product_details", detail)?;
    let ingredients = decode_ingredients(detail.ingredients_json.as_deref())?;

    Ok(Some(ProductDetail {
        id_product: detail.id_product,
        name: detail.name,
        description: detail.description,
        ingredients,
        base_price: detail.base_price,
        preparation_time: detail.preparation_time,
        id_category: detail.id_category,
        category_name: detail.category_name,
        images: sets.take_as::<Image>("images")?,
        flavors: sets.take_as::<Flavor>("flavors")?,
        sizes: sets.take_as::<Size>("sizes")?,
    }))
}

/// Ingredients are stored as a JSON array of strings.
pub fn decode_ingredients(raw: Option<&str>) -> anyhow::Result<Vec<String>> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => Ok(serde_json::from_str(raw)?),
        None => Ok(Vec::new()),
    }
}
