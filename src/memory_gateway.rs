use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::gateway::{Filter, Gateway, GatewayError, Select};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Select(Select),
    Upsert { table: String, rows: usize },
    Rpc { name: String, args: Value },
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<String, Vec<Value>>,
    rpc_replies: HashMap<String, Result<Value, GatewayError>>,
    failing_tables: HashMap<String, GatewayError>,
    calls: Vec<Call>,
}

/// In-process backend double: rows held per table, keyed upserts applied
/// in place, canned procedure replies, and per-table failures on demand.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    inner: Mutex<Inner>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, table: &str, rows: Vec<Value>) -> Self {
        self.lock().tables.insert(table.to_string(), rows);
        self
    }

    pub fn with_rpc(self, name: &str, reply: Result<Value, GatewayError>) -> Self {
        self.lock().rpc_replies.insert(name.to_string(), reply);
        self
    }

    pub fn failing(self, table: &str, error: GatewayError) -> Self {
        self.lock().failing_tables.insert(table.to_string(), error);
        self
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Gateway for MemoryGateway {
    fn select(&self, query: &Select) -> Result<Vec<Value>, GatewayError> {
        let mut inner = self.lock();
        inner.calls.push(Call::Select(query.clone()));
        if let Some(err) = inner.failing_tables.get(&query.table) {
            return Err(err.clone());
        }
        let mut rows: Vec<Value> = inner
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| matches_filter(row, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if let Some(order) = &query.order {
            rows.sort_by(|a, b| compare_field(a.get(order), b.get(order)));
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    fn upsert(
        &self,
        table: &str,
        rows: &[Value],
        on_conflict: &[&str],
    ) -> Result<(), GatewayError> {
        let mut inner = self.lock();
        inner.calls.push(Call::Upsert {
            table: table.to_string(),
            rows: rows.len(),
        });
        if let Some(err) = inner.failing_tables.get(table) {
            return Err(err.clone());
        }
        let stored = inner.tables.entry(table.to_string()).or_default();
        for row in rows {
            let existing = stored.iter().position(|candidate| {
                !on_conflict.is_empty()
                    && on_conflict
                        .iter()
                        .all(|key| candidate.get(*key) == row.get(*key))
            });
            let Some(idx) = existing else {
                stored.push(row.clone());
                continue;
            };
            match (stored[idx].as_object_mut(), row.as_object()) {
                (Some(target), Some(update)) => {
                    for (key, value) in update {
                        target.insert(key.clone(), value.clone());
                    }
                }
                _ => stored[idx] = row.clone(),
            }
        }
        Ok(())
    }

    fn rpc(&self, name: &str, args: Value) -> Result<Value, GatewayError> {
        let mut inner = self.lock();
        inner.calls.push(Call::Rpc {
            name: name.to_string(),
            args,
        });
        inner.rpc_replies.get(name).cloned().unwrap_or_else(|| {
            Err(GatewayError::Backend {
                status: 404,
                message: format!("Could not find the function public.{name}"),
            })
        })
    }
}

fn matches_filter(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::Eq { column, value } => row.get(column).is_some_and(|v| text(v) == *value),
        Filter::Ilike { column, pattern } => row
            .get(column)
            .is_some_and(|v| text(v).eq_ignore_ascii_case(pattern)),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_field(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => text(x).cmp(&text(y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
