use serde::de::DeserializeOwned;
use serde_json::Value;

use super::GatewayError;

/// One row of a result set, keyed by column name.
pub type Row = serde_json::Map<String, Value>;

pub type ResultSet = Vec<Row>;

pub fn decode_row<T: DeserializeOwned>(result_set: &str, row: Row) -> Result<T, GatewayError> {
    serde_json::from_value(Value::Object(row)).map_err(|source| GatewayError::Decode {
        result_set: result_set.to_string(),
        source,
    })
}

pub fn decode_rows<T: DeserializeOwned>(
    result_set: &str,
    rows: ResultSet,
) -> Result<Vec<T>, GatewayError> {
    rows.into_iter()
        .map(|row| decode_row(result_set, row))
        .collect()
}

/// The result sets a routine returns, in the order it returns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultSetSchema {
    names: &'static [&'static str],
}

impl ResultSetSchema {
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| *candidate == name)
    }

    /// Assign result sets to the declared names by position. Sets beyond the
    /// schema are dropped; declared sets the routine did not return stay empty.
    pub fn bind(self, sets: Vec<ResultSet>) -> NamedResultSets {
        if sets.len() > self.names.len() {
            tracing::debug!(
                declared = self.names.len(),
                returned = sets.len(),
                "routine returned undeclared result sets"
            );
        }
        let mut slots: Vec<Option<ResultSet>> = sets
            .into_iter()
            .take(self.names.len())
            .map(Some)
            .collect();
        slots.resize(self.names.len(), None);
        NamedResultSets {
            schema: self,
            slots,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedResultSets {
    schema: ResultSetSchema,
    slots: Vec<Option<ResultSet>>,
}

impl NamedResultSets {
    pub fn schema(&self) -> ResultSetSchema {
        self.schema
    }

    /// Whether the routine actually returned the named set.
    pub fn contains(&self, name: &str) -> bool {
        self.schema
            .position(name)
            .is_some_and(|index| self.slots[index].is_some())
    }

    pub fn take(&mut self, name: &str) -> Result<ResultSet, GatewayError> {
        let index = self
            .schema
            .position(name)
            .ok_or_else(|| GatewayError::UnknownResultSet(name.to_string()))?;
        Ok(self.slots[index].take().unwrap_or_default())
    }

    pub fn take_as<T: DeserializeOwned>(&mut self, name: &str) -> Result<Vec<T>, GatewayError> {
        let rows = self.take(name)?;
        decode_rows(name, rows)
    }
}
