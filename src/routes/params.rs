use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ValidationErrors;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 12;
pub const MAX_PAGE_SIZE: i64 = 36;
pub const MAX_SEARCH_LEN: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl ProductSort {
    const ALL: [ProductSort; 5] = [
        ProductSort::Relevance,
        ProductSort::PriceAsc,
        ProductSort::PriceDesc,
        ProductSort::NameAsc,
        ProductSort::NameDesc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductSort::Relevance => "relevance",
            ProductSort::PriceAsc => "price_asc",
            ProductSort::PriceDesc => "price_desc",
            ProductSort::NameAsc => "name_asc",
            ProductSort::NameDesc => "name_desc",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sort| sort.as_str() == value)
    }
}

/// Raw listing query exactly as it arrives; every value is still text.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Page number, default 1.
    pub page: Option<String>,
    /// Items per page, 1 to 36, default 12.
    pub page_size: Option<String>,
    /// relevance | price_asc | price_desc | name_asc | name_desc
    pub sort: Option<String>,
    /// Free-text search, at most 100 characters.
    pub search: Option<String>,
    /// Comma-separated category ids.
    pub categories: Option<String>,
    /// Comma-separated flavor ids.
    pub flavors: Option<String>,
    /// Comma-separated size ids.
    pub sizes: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
}

/// Validated listing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListParams {
    pub page: i64,
    pub page_size: i64,
    pub sort: ProductSort,
    pub search: Option<String>,
    pub categories: Option<Vec<i64>>,
    pub flavors: Option<Vec<i64>>,
    pub sizes: Option<Vec<i64>>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
}

impl Default for ProductListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort: ProductSort::default(),
            search: None,
            categories: None,
            flavors: None,
            sizes: None,
            price_min: None,
            price_max: None,
        }
    }
}

impl ProductListQuery {
    /// Check every field and report all violations at once. Blank values
    /// count as absent.
    pub fn validate(&self) -> Result<ProductListParams, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut params = ProductListParams::default();

        if let Some(raw) = present(&self.page) {
            match parse_integer(raw) {
                Ok(page) if page >= 1 => params.page = page,
                Ok(_) => errors.add("page", "Number must be greater than or equal to 1"),
                Err(message) => errors.add("page", message),
            }
        }

        if let Some(raw) = present(&self.page_size) {
            match parse_integer(raw) {
                Ok(size) if size < 1 => {
                    errors.add("pageSize", "Number must be greater than or equal to 1")
                }
                Ok(size) if size > MAX_PAGE_SIZE => errors.add(
                    "pageSize",
                    format!("Number must be less than or equal to {MAX_PAGE_SIZE}"),
                ),
                Ok(size) => params.page_size = size,
                Err(message) => errors.add("pageSize", message),
            }
        }

        if let Some(raw) = present(&self.sort) {
            match ProductSort::parse(raw) {
                Some(sort) => params.sort = sort,
                None => errors.add(
                    "sort",
                    format!(
                        "Invalid enum value. Expected {}, received '{raw}'",
                        ProductSort::ALL
                            .iter()
                            .map(|s| format!("'{}'", s.as_str()))
                            .collect::<Vec<_>>()
                            .join(" | ")
                    ),
                ),
            }
        }

        if let Some(raw) = present(&self.search) {
            if raw.chars().count() > MAX_SEARCH_LEN {
                errors.add(
                    "search",
                    format!("String must contain at most {MAX_SEARCH_LEN} character(s)"),
                );
            } else {
                params.search = Some(raw.to_string());
            }
        }

        for (field, raw, slot) in [
            ("categories", &self.categories, &mut params.categories),
            ("flavors", &self.flavors, &mut params.flavors),
            ("sizes", &self.sizes, &mut params.sizes),
        ] {
            if let Some(raw) = present(raw) {
                match parse_id_list(raw) {
                    Some(ids) => *slot = Some(ids),
                    None => errors.add(
                        field,
                        "All IDs in the comma-separated list must be positive integers.",
                    ),
                }
            }
        }

        if let Some(raw) = present(&self.price_min) {
            match parse_number(raw) {
                Ok(min) if min >= 0.0 => params.price_min = Some(min),
                Ok(_) => errors.add("priceMin", "Number must be greater than or equal to 0"),
                Err(message) => errors.add("priceMin", message),
            }
        }

        if let Some(raw) = present(&self.price_max) {
            match parse_number(raw) {
                Ok(max) if max > 0.0 => params.price_max = Some(max),
                Ok(_) => errors.add("priceMax", "Number must be greater than 0"),
                Err(message) => errors.add("priceMax", message),
            }
        }

        if let (Some(min), Some(max)) = (params.price_min, params.price_max) {
            if max <= min {
                errors.add("priceMax", "priceMax must be greater than priceMin");
            }
        }

        if errors.is_empty() {
            Ok(params)
        } else {
            Err(errors)
        }
    }
}

/// Validate a product id taken from the request path.
pub fn parse_product_id(raw: &str) -> Result<i64, ValidationErrors> {
    match parse_integer(raw.trim()) {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationErrors::single(
            "id",
            "Product ID must be a positive integer.",
        )),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(raw: &str) -> Result<f64, &'static str> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err("Expected number, received nan"),
    }
}

fn parse_integer(raw: &str) -> Result<i64, &'static str> {
    let value = parse_number(raw)?;
    if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        return Err("Expected integer, received float");
    }
    Ok(value as i64)
}

fn parse_id_list(raw: &str) -> Option<Vec<i64>> {
    let mut ids = Vec::new();
    for token in raw.split(',') {
        let id = token.trim().parse::<i64>().ok().filter(|id| *id > 0)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Some(ids)
}
