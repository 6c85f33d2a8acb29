use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    error::{AppError, ValidationErrors},
    state::AppState,
};

pub const ACCOUNT_HEADER: &str = "x-account-id";

/// The tenant whose catalog a request reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountContext {
    pub id_account: i64,
}

impl AccountContext {
    pub fn new(id_account: i64) -> Self {
        Self { id_account }
    }
}

/// Taken from `X-Account-Id` when present, otherwise the configured default
/// account.
impl FromRequestParts<AppState> for AccountContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(ACCOUNT_HEADER) else {
            return Ok(state.default_account);
        };

        header
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map(AccountContext::new)
            .ok_or_else(|| {
                AppError::validation(
                    "Invalid account header.",
                    ValidationErrors::single(
                        ACCOUNT_HEADER,
                        "Account ID must be a positive integer.",
                    ),
                )
            })
    }
}
