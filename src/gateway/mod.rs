//! Data access gateway: runs named stored routines and shapes their result
//! sets according to what the caller expects back.

use async_trait::async_trait;
use thiserror::Error;

pub mod params;
pub mod postgres;
pub mod result_sets;

pub use params::{ParamValue, RoutineParams};
pub use postgres::PgGateway;
pub use result_sets::{NamedResultSets, ResultSet, ResultSetSchema, Row, decode_row, decode_rows};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("database error")]
    Database(#[from] sqlx::Error),

    #[error("invalid SQL identifier `{0}`")]
    InvalidIdentifier(String),

    #[error("routine declares no result set named `{0}`")]
    UnknownResultSet(String),

    #[error("failed to decode result set `{result_set}`")]
    Decode {
        result_set: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("column `{column}` holds a value that is not valid {type_name}")]
    ColumnValue { column: String, type_name: String },

    #[error("routine output is not {expected}")]
    UnexpectedOutput { expected: &'static str },
}

/// The shape a caller expects a routine's results in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    None,
    Single,
    Multi,
    Named(ResultSetSchema),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoutineOutput {
    None,
    Single(Option<Row>),
    Multi(Vec<ResultSet>),
    Named(NamedResultSets),
}

impl RoutineOutput {
    pub fn shape(expect: Expect, sets: Vec<ResultSet>) -> Self {
        match expect {
            Expect::None => RoutineOutput::None,
            Expect::Single => {
                RoutineOutput::Single(sets.into_iter().next().and_then(|set| set.into_iter().next()))
            }
            Expect::Multi => RoutineOutput::Multi(sets),
            Expect::Named(schema) => RoutineOutput::Named(schema.bind(sets)),
        }
    }

    pub fn into_single(self) -> Result<Option<Row>, GatewayError> {
        match self {
            RoutineOutput::Single(row) => Ok(row),
            _ => Err(GatewayError::UnexpectedOutput {
                expected: "a single row",
            }),
        }
    }

    pub fn into_multi(self) -> Result<Vec<ResultSet>, GatewayError> {
        match self {
            RoutineOutput::Multi(sets) => Ok(sets),
            _ => Err(GatewayError::UnexpectedOutput {
                expected: "a list of result sets",
            }),
        }
    }

    pub fn into_named(self) -> Result<NamedResultSets, GatewayError> {
        match self {
            RoutineOutput::Named(sets) => Ok(sets),
            _ => Err(GatewayError::UnexpectedOutput {
                expected: "named result sets",
            }),
        }
    }
}

/// Executes stored routines. Implemented over Postgres by [`PgGateway`];
/// tests substitute in-memory fakes.
#[async_trait]
pub trait RoutineGateway: Send + Sync {
    async fn execute(
        &self,
        routine: &str,
        params: &RoutineParams,
        expect: Expect,
    ) -> Result<RoutineOutput, GatewayError>;
}
