//! Outbound parameter preparation and inbound row decoding.
//!
//! BigQuery needs an explicit type for every parameter as soon as one of
//! them is null, and JSON-bearing columns are stored as encoded strings.
//! Both adjustments happen here, around the compiled query.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::ast::{OperationNode, Value};
use crate::engine::{QueryRequest, Row};
use crate::registry::JsonColumnRegistry;
use crate::transpiler::CompiledQuery;

/// Start of the SET list in a rendered UPDATE.
static SET_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bset\s").expect("SET regex"));

/// Clause that may follow the SET list. Only a match outside parentheses counts.
static SET_LIST_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s(from|where)\s").expect("SET boundary regex"));

/// Wire-level parameter type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParamType {
    String,
    Int64,
    Float64,
    Bool,
    Timestamp,
    Date,
    Bytes,
    Struct,
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ParamType::String => "STRING",
            ParamType::Int64 => "INT64",
            ParamType::Float64 => "FLOAT64",
            ParamType::Bool => "BOOL",
            ParamType::Timestamp => "TIMESTAMP",
            ParamType::Date => "DATE",
            ParamType::Bytes => "BYTES",
            ParamType::Struct => "STRUCT",
        };
        write!(f, "{}", name)
    }
}

fn float_type(f: f64) -> ParamType {
    if f.is_finite() && f.fract() == 0.0 {
        ParamType::Int64
    } else {
        ParamType::Float64
    }
}

/// Type tag for a single value. Nulls are tagged STRING.
pub fn param_type(value: &Value) -> ParamType {
    match value {
        Value::Null | Value::String(_) => ParamType::String,
        Value::Bool(_) => ParamType::Bool,
        Value::Int(_) => ParamType::Int64,
        Value::Float(f) => float_type(*f),
        Value::Bytes(_) => ParamType::Bytes,
        Value::Timestamp(_) => ParamType::Timestamp,
        Value::Date(_) => ParamType::Date,
        Value::Json(json) => match json {
            serde_json::Value::Null | serde_json::Value::String(_) => ParamType::String,
            serde_json::Value::Bool(_) => ParamType::Bool,
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => ParamType::Int64,
            serde_json::Value::Number(n) => n.as_f64().map_or(ParamType::Float64, float_type),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => ParamType::Struct,
        },
    }
}

/// Type tags for every parameter, or `None` when no parameter is null.
pub fn infer_param_types(params: &[Value]) -> Option<Vec<ParamType>> {
    if !params.iter().any(Value::is_null) {
        return None;
    }
    Some(params.iter().map(param_type).collect())
}

/// Blank out quoted text, keeping byte offsets.
fn mask_quoted(sql: &str) -> String {
    let mut masked = String::with_capacity(sql.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for ch in sql.chars() {
        match quote {
            Some(q) => {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                    masked.push(ch);
                    continue;
                }
                masked.extend(std::iter::repeat_n('_', ch.len_utf8()));
            }
            None => {
                if matches!(ch, '\'' | '"' | '`') {
                    quote = Some(ch);
                }
                masked.push(ch);
            }
        }
    }
    masked
}

fn paren_depth(text: &str) -> i32 {
    text.chars().fold(0, |depth, ch| match ch {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    })
}

/// Number of placeholders in the SET list of a rendered UPDATE.
///
/// The list ends at the first top-level `from` or `where`, so
/// `extract(year from ?)` stays inside it.
pub fn set_clause_param_count(sql: &str) -> Option<usize> {
    let masked = mask_quoted(sql);
    let start = SET_KEYWORD.find(&masked)?.end();
    let end = SET_LIST_END
        .find_iter(&masked[start..])
        .find(|m| paren_depth(&masked[start..start + m.start()]) == 0)
        .map_or(masked.len(), |m| start + m.start());
    Some(masked[start..end].matches('?').count())
}

fn should_serialize(value: &Value) -> bool {
    !value.is_null() && value.is_composite()
}

fn serialize_columns(
    params: &mut [Value],
    table: &str,
    columns: &[&str],
    registry: &JsonColumnRegistry,
) {
    for (value, column) in params.iter_mut().zip(columns) {
        if !registry.is_json_column(table, column) || !should_serialize(value) {
            continue;
        }
        if let Value::Json(json) = value {
            *value = Value::String(json.to_string());
        }
    }
}

/// Encode composite values bound to registered JSON columns.
///
/// INSERT parameters are matched to the column list when their counts agree.
/// UPDATE parameters are matched to the SET list when the SET placeholders
/// and the updated columns agree. Anything else is left untouched.
pub fn serialize_json_params(compiled: &CompiledQuery, registry: &JsonColumnRegistry) -> Vec<Value> {
    let mut params = compiled.parameters.clone();
    if registry.is_empty() {
        return params;
    }

    match &compiled.query {
        OperationNode::Insert(insert) if params.len() == insert.columns.len() => {
            let table = insert.into.qualified_name();
            let columns: Vec<&str> = insert.columns.iter().map(String::as_str).collect();
            serialize_columns(&mut params, &table, &columns, registry);
        }
        OperationNode::Update(update) => {
            let set_params = set_clause_param_count(&compiled.sql);
            if set_params == Some(update.updates.len()) {
                let table = update.table.qualified_name();
                let columns: Vec<&str> = update.updates.iter().map(|u| u.column.as_str()).collect();
                serialize_columns(&mut params, &table, &columns, registry);
            } else {
                tracing::trace!(
                    ?set_params,
                    updates = update.updates.len(),
                    "SET list does not align with parameters, skipping JSON encoding"
                );
            }
        }
        _ => {}
    }
    params
}

/// Build the request sent to the warehouse for a compiled query.
pub fn prepare_request(compiled: &CompiledQuery, registry: &JsonColumnRegistry) -> QueryRequest {
    let params = serialize_json_params(compiled, registry);
    let types = infer_param_types(&params);
    if let Some(types) = &types {
        tracing::trace!(?types, "inferred parameter types");
    }
    QueryRequest {
        sql: compiled.sql.clone(),
        params,
        types,
    }
}

/// Decode registered JSON columns of a result row in place.
///
/// Only non-empty strings are parsed; values that fail to parse are kept.
pub fn parse_json_columns(row: &mut Row, registry: &JsonColumnRegistry) {
    if registry.is_empty() {
        return;
    }
    for column in registry.json_column_names() {
        let Some(serde_json::Value::String(text)) = row.get(column) else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(text) {
            row.insert(column.clone(), parsed);
        }
    }
}
