use async_trait::async_trait;
use serde_json::{Number, Value};
use sqlx::{
    Column, Executor, PgConnection, Postgres, Row as _, Transaction, TypeInfo,
    postgres::{PgArguments, PgRow},
    query::QueryScalar,
};

use super::{
    Expect, GatewayError, ResultSet, Row, RoutineGateway, RoutineOutput, RoutineParams,
    params::{ParamValue, is_identifier},
};
use crate::db::DbPool;

/// Runs routines that return `SETOF refcursor`, one cursor per result set.
/// Cursors only live inside a transaction, so calls against the pool open and
/// commit their own.
#[derive(Debug, Clone)]
pub struct PgGateway {
    pool: DbPool,
}

impl PgGateway {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, GatewayError> {
        Ok(self.pool.begin().await?)
    }

    /// Run a routine inside a caller-owned transaction. The caller decides
    /// whether to commit or roll back.
    pub async fn execute_in(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        routine: &str,
        params: &RoutineParams,
        expect: Expect,
    ) -> Result<RoutineOutput, GatewayError> {
        let sets = call_routine(tx, routine, params).await?;
        Ok(RoutineOutput::shape(expect, sets))
    }
}

#[async_trait]
impl RoutineGateway for PgGateway {
    async fn execute(
        &self,
        routine: &str,
        params: &RoutineParams,
        expect: Expect,
    ) -> Result<RoutineOutput, GatewayError> {
        let mut tx = self.pool.begin().await?;
        let sets = call_routine(&mut tx, routine, params).await?;
        tx.commit().await?;
        Ok(RoutineOutput::shape(expect, sets))
    }
}

async fn call_routine(
    conn: &mut PgConnection,
    routine: &str,
    params: &RoutineParams,
) -> Result<Vec<ResultSet>, GatewayError> {
    let sql = build_call_sql(routine, params)?;

    let mut query = sqlx::query_scalar::<_, String>(&sql);
    for (_, value) in params.iter() {
        query = bind_value(query, value);
    }
    let cursors = query.fetch_all(&mut *conn).await?;

    let mut sets = Vec::with_capacity(cursors.len());
    for cursor in &cursors {
        // FETCH goes over the simple protocol: its row description is only
        // known once the portal runs, and every value then arrives as text.
        let fetch = format!("FETCH ALL FROM {}", quote_identifier(cursor));
        let rows = Executor::fetch_all(&mut *conn, sqlx::raw_sql(&fetch)).await?;
        let set = rows.iter().map(row_to_json).collect::<Result<ResultSet, _>>()?;
        sets.push(set);
    }

    tracing::debug!(routine, result_sets = sets.len(), "routine executed");
    Ok(sets)
}

fn build_call_sql(routine: &str, params: &RoutineParams) -> Result<String, GatewayError> {
    if !is_identifier(routine, true) {
        return Err(GatewayError::InvalidIdentifier(routine.to_string()));
    }

    let mut args = Vec::with_capacity(params.len());
    for (index, (name, value)) in params.iter().enumerate() {
        if !is_identifier(name, false) {
            return Err(GatewayError::InvalidIdentifier(name.to_string()));
        }
        args.push(format!("{name} => ${}::{}", index + 1, value.sql_type()));
    }

    Ok(format!(
        "SELECT cursor_name::text FROM {routine}({}) AS result(cursor_name)",
        args.join(", ")
    ))
}

fn bind_value<'q>(
    query: QueryScalar<'q, Postgres, String, PgArguments>,
    value: &'q ParamValue,
) -> QueryScalar<'q, Postgres, String, PgArguments> {
    match value {
        ParamValue::Int(v) => query.bind(*v),
        ParamValue::Float(v) => query.bind(*v),
        ParamValue::Text(v) => query.bind(v.as_deref()),
        ParamValue::IntList(v) => query.bind(v.as_deref()),
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn row_to_json(row: &PgRow) -> Result<Row, GatewayError> {
    let mut out = Row::new();
    for column in row.columns() {
        let raw: Option<String> = row.try_get_unchecked(column.ordinal())?;
        let value = match raw {
            Some(raw) => text_to_json(column.name(), column.type_info().name(), raw)?,
            None => Value::Null,
        };
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

fn text_to_json(column: &str, type_name: &str, raw: String) -> Result<Value, GatewayError> {
    let invalid = || GatewayError::ColumnValue {
        column: column.to_string(),
        type_name: type_name.to_string(),
    };

    match type_name {
        "BOOL" => match raw.as_str() {
            "t" | "true" => Ok(Value::Bool(true)),
            "f" | "false" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        "INT2" | "INT4" | "INT8" | "OID" => {
            raw.parse::<i64>().map(Value::from).map_err(|_| invalid())
        }
        "FLOAT4" | "FLOAT8" | "NUMERIC" => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(invalid),
        "JSON" | "JSONB" => serde_json::from_str(&raw).map_err(|_| invalid()),
        _ => Ok(Value::String(raw)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn call_sql_uses_named_notation_with_typed_placeholders() {
        let params = RoutineParams::new()
            .with("id_account", 1_i64)
            .with("search_term", None::<String>)
            .with("category_ids", vec![1_i64, 2]);

        let sql = build_call_sql("functional.sp_product_list", &params).unwrap();
        assert_eq!(
            sql,
            "SELECT cursor_name::text FROM functional.sp_product_list(\
             id_account => $1::bigint, search_term => $2::text, category_ids => $3::bigint[]) \
             AS result(cursor_name)"
        );
    }

    #[test]
    fn call_sql_rejects_unsafe_names() {
        let bad_routine = build_call_sql("sp; drop table x", &RoutineParams::new());
        assert!(matches!(bad_routine, Err(GatewayError::InvalidIdentifier(_))));

        let params = RoutineParams::new().with("id) --", 1_i64);
        let bad_param = build_call_sql("functional.sp_product_get", &params);
        assert!(matches!(bad_param, Err(GatewayError::InvalidIdentifier(name)) if name == "id) --"));
    }

    #[test]
    fn cursor_names_are_quoted() {
        assert_eq!(quote_identifier("<unnamed portal 1>"), "\"<unnamed portal 1>\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn text_values_follow_column_types() {
        assert_eq!(text_to_json("n", "INT4", "42".into()).unwrap(), json!(42));
        assert_eq!(text_to_json("p", "NUMERIC", "12.50".into()).unwrap(), json!(12.5));
        assert_eq!(text_to_json("b", "BOOL", "t".into()).unwrap(), json!(true));
        assert_eq!(
            text_to_json("j", "JSONB", r#"["flour", "sugar"]"#.into()).unwrap(),
            json!(["flour", "sugar"])
        );
        assert_eq!(
            text_to_json("t", "VARCHAR", "45 min".into()).unwrap(),
            json!("45 min")
        );
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = text_to_json("price", "NUMERIC", "NaN".into()).unwrap_err();
        assert!(matches!(err, GatewayError::ColumnValue { ref column, .. } if column == "price"));
    }
}
