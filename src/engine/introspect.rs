//! Dataset and table metadata via `INFORMATION_SCHEMA`.

use futures_util::{StreamExt, TryStreamExt, stream};
use serde::Serialize;

use crate::config::Config;
use crate::engine::{QueryRequest, Row, WarehouseClient};
use crate::error::{BqError, BqResult, Operation};
use crate::transpiler::quote_bigquery_identifier;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub has_default_value: bool,
    /// BigQuery has no auto-increment columns; always false.
    pub is_auto_incrementing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableMetadata {
    pub schema: String,
    pub name: String,
    pub is_view: bool,
    pub columns: Vec<ColumnMetadata>,
}

/// Reads table metadata for every dataset visible to a client.
pub struct DatabaseIntrospector<'a, C: ?Sized> {
    client: &'a C,
    concurrency: usize,
}

impl<'a, C: WarehouseClient + ?Sized> DatabaseIntrospector<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self::with_concurrency(client, Config::default().introspection_concurrency)
    }

    pub fn from_config(client: &'a C, config: &Config) -> Self {
        Self::with_concurrency(client, config.introspection_concurrency)
    }

    /// At most `concurrency` metadata queries are in flight at once.
    pub fn with_concurrency(client: &'a C, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
        }
    }

    /// Dataset names, sorted.
    pub async fn get_schemas(&self) -> BqResult<Vec<String>> {
        let mut datasets = self
            .client
            .list_datasets()
            .await
            .map_err(|e| BqError::from_client(Operation::Query, e))?;
        datasets.sort();
        Ok(datasets)
    }

    /// Tables and columns of every dataset, ordered by dataset then table.
    pub async fn get_tables(&self) -> BqResult<Vec<TableMetadata>> {
        let datasets = self.get_schemas().await?;
        tracing::debug!(
            datasets = datasets.len(),
            concurrency = self.concurrency,
            "introspecting datasets"
        );

        let per_dataset: Vec<Vec<TableMetadata>> = stream::iter(datasets)
            .map(|dataset| async move { self.dataset_tables(dataset).await })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        Ok(per_dataset.into_iter().flatten().collect())
    }

    async fn dataset_tables(&self, dataset: String) -> BqResult<Vec<TableMetadata>> {
        let request = QueryRequest {
            sql: columns_query(&dataset),
            params: vec![],
            types: None,
        };
        let rows = self
            .client
            .query(request)
            .await
            .map_err(|e| BqError::from_client(Operation::Query, e))?;
        Ok(group_columns(&dataset, &rows))
    }
}

fn columns_query(dataset: &str) -> String {
    let ds = quote_bigquery_identifier(dataset);
    format!(
        "select c.table_name, c.column_name, c.data_type, c.is_nullable, c.column_default, t.table_type \
         from {ds}.INFORMATION_SCHEMA.COLUMNS as c \
         join {ds}.INFORMATION_SCHEMA.TABLES as t on c.table_name = t.table_name \
         order by c.table_name, c.ordinal_position"
    )
}

fn text<'r>(row: &'r Row, field: &str) -> Option<&'r str> {
    row.get(field).and_then(|v| v.as_str())
}

fn column_from_row(row: &Row) -> ColumnMetadata {
    let has_default_value = match text(row, "column_default") {
        Some(default) => !default.eq_ignore_ascii_case("NULL"),
        None => false,
    };
    ColumnMetadata {
        name: text(row, "column_name").unwrap_or_default().to_string(),
        data_type: text(row, "data_type").unwrap_or_default().to_string(),
        is_nullable: text(row, "is_nullable") == Some("YES"),
        has_default_value,
        is_auto_incrementing: false,
    }
}

/// Fold column rows (ordered by table) into tables.
fn group_columns(dataset: &str, rows: &[Row]) -> Vec<TableMetadata> {
    let mut tables: Vec<TableMetadata> = Vec::new();
    for row in rows {
        let Some(table_name) = text(row, "table_name") else {
            continue;
        };
        let column = column_from_row(row);
        match tables.last_mut() {
            Some(table) if table.name == table_name => table.columns.push(column),
            _ => tables.push(TableMetadata {
                schema: dataset.to_string(),
                name: table_name.to_string(),
                is_view: text(row, "table_type") == Some("VIEW"),
                columns: vec![column],
            }),
        }
    }
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RowStream;
    use crate::engine::testing::{MockClient, row};
    use crate::error::ClientError;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn column_row(table: &str, column: &str, nullable: &str, default: serde_json::Value) -> Row {
        row(json!({
            "table_name": table,
            "column_name": column,
            "data_type": "STRING",
            "is_nullable": nullable,
            "column_default": default,
            "table_type": if table.ends_with("_v") { "VIEW" } else { "BASE TABLE" },
        }))
    }

    #[test]
    fn test_columns_query_quotes_dataset() {
        let sql = columns_query("analytics");
        assert!(sql.contains("from `analytics`.INFORMATION_SCHEMA.COLUMNS as c"));
        assert!(sql.contains("join `analytics`.INFORMATION_SCHEMA.TABLES as t"));
    }

    #[test]
    fn test_group_columns() {
        let rows = vec![
            column_row("events", "id", "NO", json!(null)),
            column_row("events", "kind", "YES", json!("'click'")),
            column_row("events_v", "id", "YES", json!("NULL")),
        ];
        let tables = group_columns("analytics", &rows);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].name, "events");
        assert_eq!(tables[0].columns.len(), 2);
        assert!(!tables[0].is_view);
        assert!(!tables[0].columns[0].is_nullable);
        assert!(!tables[0].columns[0].has_default_value);
        assert!(tables[0].columns[1].is_nullable);
        assert!(tables[0].columns[1].has_default_value);
        assert!(tables[1].is_view);
        assert!(!tables[1].columns[0].has_default_value);
    }

    #[tokio::test]
    async fn test_get_tables_orders_by_dataset() {
        let mut client = MockClient {
            datasets: vec!["zeta".to_string(), "alpha".to_string()],
            ..Default::default()
        };
        client
            .rows_by_sql
            .insert("`alpha`".to_string(), vec![column_row("a1", "id", "NO", json!(null))]);
        client
            .rows_by_sql
            .insert("`zeta`".to_string(), vec![column_row("z1", "id", "NO", json!(null))]);

        let introspector = DatabaseIntrospector::with_concurrency(&client, 2);
        let tables = introspector.get_tables().await.unwrap();
        let names: Vec<(&str, &str)> = tables
            .iter()
            .map(|t| (t.schema.as_str(), t.name.as_str()))
            .collect();
        assert_eq!(names, vec![("alpha", "a1"), ("zeta", "z1")]);
        assert_eq!(client.requests().len(), 2);
    }

    /// Tracks how many metadata queries run at the same time.
    #[derive(Default)]
    struct SlowClient {
        datasets: Vec<String>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl WarehouseClient for SlowClient {
        async fn query(&self, _request: QueryRequest) -> Result<Vec<Row>, ClientError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![])
        }

        async fn query_stream(&self, _request: QueryRequest) -> Result<RowStream, ClientError> {
            Ok(futures_util::stream::empty().boxed())
        }

        async fn list_datasets(&self) -> Result<Vec<String>, ClientError> {
            Ok(self.datasets.clone())
        }
    }

    #[tokio::test]
    async fn test_metadata_queries_respect_concurrency_cap() {
        let client = SlowClient {
            datasets: (0..12).map(|i| format!("ds{:02}", i)).collect(),
            ..Default::default()
        };
        DatabaseIntrospector::with_concurrency(&client, 3)
            .get_tables()
            .await
            .unwrap();
        let peak = client.peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak in-flight queries: {}", peak);
        assert!(peak > 1, "queries never overlapped");
    }

    #[tokio::test]
    async fn test_get_schemas_sorted() {
        let client = MockClient {
            datasets: vec!["b".to_string(), "a".to_string()],
            ..Default::default()
        };
        let schemas = DatabaseIntrospector::new(&client).get_schemas().await.unwrap();
        assert_eq!(schemas, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_query_errors_propagate() {
        let mut client = MockClient::failing("Access Denied");
        client.datasets = vec!["a".to_string()];
        let err = DatabaseIntrospector::new(&client).get_tables().await.unwrap_err();
        assert!(err.to_string().contains("Access Denied"));
    }
}
