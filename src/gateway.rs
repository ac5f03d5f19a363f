use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Config(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("{message}")]
    Backend { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Eq { column: String, value: String },
    Ilike { column: String, pattern: String },
}

/// A read against one collection: columns (with embedded foreign-key
/// expansion), filters, ordering and an optional row limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub table: String,
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<String>,
    pub limit: Option<usize>,
}

impl Select {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push(Filter::Eq {
            column: column.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn ilike(mut self, column: &str, pattern: &str) -> Self {
        self.filters.push(Filter::Ilike {
            column: column.to_string(),
            pattern: pattern.to_string(),
        });
        self
    }

    pub fn order(mut self, column: &str) -> Self {
        self.order = Some(column.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Query-string pairs in the backend's REST dialect.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), compact_columns(&self.columns))];
        for filter in &self.filters {
            match filter {
                Filter::Eq { column, value } => pairs.push((column.clone(), format!("eq.{value}"))),
                Filter::Ilike { column, pattern } => {
                    pairs.push((column.clone(), format!("ilike.{pattern}")))
                }
            }
        }
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

fn compact_columns(columns: &str) -> String {
    columns.chars().filter(|c| !c.is_whitespace()).collect()
}

/// The hosted backend as the client sees it: table reads, keyed upserts and
/// named procedures.
pub trait Gateway: Send + Sync {
    fn select(&self, query: &Select) -> Result<Vec<Value>, GatewayError>;

    fn upsert(&self, table: &str, rows: &[Value], on_conflict: &[&str])
    -> Result<(), GatewayError>;

    fn rpc(&self, name: &str, args: Value) -> Result<Value, GatewayError>;
}

pub fn select_as<T: DeserializeOwned>(
    gateway: &dyn Gateway,
    query: &Select,
) -> Result<Vec<T>, GatewayError> {
    gateway
        .select(query)?
        .into_iter()
        .map(|row| {
            serde_json::from_value(row)
                .map_err(|err| GatewayError::Decode(format!("{}: {err}", query.table)))
        })
        .collect()
}

/// Stands in for the remote backend when no credentials are configured;
/// every call fails with the configuration error.
#[derive(Debug, Clone)]
pub struct UnconfiguredGateway {
    error: GatewayError,
}

impl UnconfiguredGateway {
    pub fn new(error: GatewayError) -> Self {
        Self { error }
    }
}

impl Gateway for UnconfiguredGateway {
    fn select(&self, _query: &Select) -> Result<Vec<Value>, GatewayError> {
        Err(self.error.clone())
    }

    fn upsert(
        &self,
        _table: &str,
        _rows: &[Value],
        _on_conflict: &[&str],
    ) -> Result<(), GatewayError> {
        Err(self.error.clone())
    }

    fn rpc(&self, _name: &str, _args: Value) -> Result<Value, GatewayError> {
        Err(self.error.clone())
    }
}

/// Procedures returning a single row may come back as a bare object or as a
/// one-element array depending on how they are declared.
pub fn first_row(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Array(rows) => rows.into_iter().find(|row| !row.is_null()),
        other => Some(other),
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(rows) => rows.first().is_some_and(is_truthy),
        Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Select, first_row, is_truthy};

    #[test]
    fn select_renders_filters_order_and_limit() {
        let query = Select::from("voorspellingen_toernooi")
            .columns("*, home:landen!home_team_id(land, groep)")
            .eq("user_id", 42)
            .order("land")
            .limit(1);
        let pairs = query.query_pairs();
        assert_eq!(
            pairs,
            vec![
                (
                    "select".to_string(),
                    "*,home:landen!home_team_id(land,groep)".to_string()
                ),
                ("user_id".to_string(), "eq.42".to_string()),
                ("order".to_string(), "land".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn ilike_filter_uses_ilike_operator() {
        let pairs = Select::from("users")
            .columns("email, full_name")
            .ilike("email", "Joe@Example.com")
            .query_pairs();
        assert_eq!(pairs[1], ("email".to_string(), "ilike.Joe@Example.com".to_string()));
    }

    #[test]
    fn first_row_unwraps_arrays() {
        assert_eq!(first_row(json!([{"id": 1}])), Some(json!({"id": 1})));
        assert_eq!(first_row(json!({"id": 2})), Some(json!({"id": 2})));
        assert_eq!(first_row(json!([])), None);
        assert_eq!(first_row(json!(null)), None);
    }

    #[test]
    fn truthiness_follows_rpc_payloads() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!([true])));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!([])));
    }
}
