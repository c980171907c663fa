//! Connection wrapper that adapts parameters and rows around every call.

use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use std::sync::Arc;

use crate::ast::Value;
use crate::engine::params::{infer_param_types, parse_json_columns, prepare_request};
use crate::engine::{QueryRequest, Row, WarehouseClient};
use crate::error::{BqError, BqResult, Operation};
use crate::registry::JsonColumnRegistry;
use crate::transpiler::{CompiledQuery, ToSql};

/// A BigQuery connection over an injected [`WarehouseClient`].
///
/// # Example
///
/// ```rust,ignore
/// let mut registry = JsonColumnRegistry::new();
/// registry.register("app.users", ["metadata"]);
/// let conn = BigQueryConnection::new(client, registry);
///
/// let rows = conn
///     .execute(&SelectQueryNode::from_table("app.users").select_all())
///     .await?;
/// ```
pub struct BigQueryConnection<C> {
    client: C,
    registry: Arc<JsonColumnRegistry>,
}

impl<C: WarehouseClient> BigQueryConnection<C> {
    pub fn new(client: C, registry: JsonColumnRegistry) -> Self {
        Self::with_shared_registry(client, Arc::new(registry))
    }

    /// Share one registry between several connections.
    pub fn with_shared_registry(client: C, registry: Arc<JsonColumnRegistry>) -> Self {
        Self { client, registry }
    }

    pub fn registry(&self) -> &Arc<JsonColumnRegistry> {
        &self.registry
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Compile `query` with the BigQuery dialect and run it.
    pub async fn execute<Q: ToSql + ?Sized>(&self, query: &Q) -> BqResult<Vec<Row>> {
        let compiled = query.compile();
        self.execute_query(&compiled).await
    }

    /// Run a compiled query and decode its JSON columns.
    pub async fn execute_query(&self, compiled: &CompiledQuery) -> BqResult<Vec<Row>> {
        let request = prepare_request(compiled, &self.registry);
        self.run(request).await
    }

    /// Run SQL text directly. Parameters are typed but never JSON-encoded,
    /// since there is no tree to match them against.
    pub async fn execute_sql(&self, sql: &str, params: Vec<Value>) -> BqResult<Vec<Row>> {
        let types = infer_param_types(&params);
        let request = QueryRequest {
            sql: sql.to_string(),
            params,
            types,
        };
        self.run(request).await
    }

    async fn run(&self, request: QueryRequest) -> BqResult<Vec<Row>> {
        tracing::debug!(sql = %request.sql, params = request.params.len(), "executing query");
        let mut rows = self
            .client
            .query(request)
            .await
            .map_err(|e| BqError::from_client(Operation::Query, e))?;
        for row in &mut rows {
            parse_json_columns(row, &self.registry);
        }
        Ok(rows)
    }

    /// Stream the rows of a compiled query.
    ///
    /// Rows are decoded as they are pulled; dropping the stream stops
    /// processing.
    pub async fn stream_query(
        &self,
        compiled: &CompiledQuery,
    ) -> BqResult<BoxStream<'static, BqResult<Row>>> {
        let request = prepare_request(compiled, &self.registry);
        tracing::debug!(sql = %request.sql, params = request.params.len(), "streaming query");
        let stream = self
            .client
            .query_stream(request)
            .await
            .map_err(|e| BqError::from_client(Operation::Stream, e))?;

        let registry = Arc::clone(&self.registry);
        Ok(stream
            .map(move |item| match item {
                Ok(mut row) => {
                    parse_json_columns(&mut row, &registry);
                    Ok(row)
                }
                Err(e) => Err(BqError::from_client(Operation::Stream, e)),
            })
            .boxed())
    }

    pub async fn list_datasets(&self) -> BqResult<Vec<String>> {
        self.client
            .list_datasets()
            .await
            .map_err(|e| BqError::from_client(Operation::Query, e))
    }

    pub async fn begin_transaction(&self) -> BqResult<()> {
        Err(BqError::Unsupported("Transactions"))
    }

    pub async fn commit_transaction(&self) -> BqResult<()> {
        Err(BqError::Unsupported("Transactions"))
    }

    pub async fn rollback_transaction(&self) -> BqResult<()> {
        Err(BqError::Unsupported("Transactions"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::*;
    use crate::ast::{InsertQueryNode, SelectQueryNode};
    use crate::engine::ParamType;
    use crate::engine::testing::{MockClient, row};
    use futures_util::TryStreamExt;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registry() -> JsonColumnRegistry {
        let mut registry = JsonColumnRegistry::new();
        registry.register("app.users", ["metadata"]);
        registry
    }

    #[tokio::test]
    async fn test_rows_are_decoded() {
        let client = MockClient::with_rows(vec![row(json!({"id": 1, "metadata": r#"{"a":1}"#}))]);
        let conn = BigQueryConnection::new(client, registry());
        let rows = conn
            .execute(&SelectQueryNode::from_table("app.users").select_all())
            .await
            .unwrap();
        assert_eq!(rows, vec![row(json!({"id": 1, "metadata": {"a": 1}}))]);
    }

    #[tokio::test]
    async fn test_null_parameters_get_types() {
        let conn = BigQueryConnection::new(MockClient::default(), JsonColumnRegistry::new());
        let query = SelectQueryNode::from_table("t")
            .filter(eq(col("a"), val(Value::Null)))
            .filter(eq(col("status"), val("active")));
        conn.execute(&query).await.unwrap();

        let requests = conn.client().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].types, Some(vec![ParamType::String, ParamType::String]));
    }

    #[tokio::test]
    async fn test_no_types_without_nulls() {
        let conn = BigQueryConnection::new(MockClient::default(), JsonColumnRegistry::new());
        conn.execute_sql("select ? , ?", vec!["x".into(), "y".into()])
            .await
            .unwrap();
        assert_eq!(conn.client().requests()[0].types, None);
    }

    #[tokio::test]
    async fn test_insert_encodes_json_columns() {
        let conn = BigQueryConnection::new(MockClient::default(), registry());
        let insert = InsertQueryNode::into_table("app.users")
            .columns(["id", "metadata"])
            .values([Value::Int(1), Value::Json(json!({"plan": "pro"}))]);
        conn.execute(&insert).await.unwrap();

        let request = &conn.client().requests()[0];
        assert_eq!(
            request.params,
            vec![Value::Int(1), Value::String(r#"{"plan":"pro"}"#.to_string())]
        );
        assert_eq!(request.types, None);
    }

    #[tokio::test]
    async fn test_api_errors_are_wrapped() {
        let conn = BigQueryConnection::new(MockClient::failing("Not found: Table x"), registry());
        let err = conn.execute_sql("select 1", vec![]).await.unwrap_err();
        assert_eq!(err.to_string(), "BigQuery query failed: Not found: Table x");
    }

    #[tokio::test]
    async fn test_stream_rows_are_decoded_lazily() {
        let client = MockClient::with_rows(vec![
            row(json!({"metadata": r#"[1,2]"#})),
            row(json!({"metadata": "plain"})),
        ]);
        let conn = BigQueryConnection::new(client, registry());
        let compiled = SelectQueryNode::from_table("app.users").compile();
        let rows: Vec<Row> = conn
            .stream_query(&compiled)
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(rows[0]["metadata"], json!([1, 2]));
        assert_eq!(rows[1]["metadata"], json!("plain"));
    }

    #[tokio::test]
    async fn test_stream_errors_name_the_operation() {
        let conn = BigQueryConnection::new(MockClient::failing("quota exceeded"), registry());
        let compiled = SelectQueryNode::from_table("t").compile();
        let err = match conn.stream_query(&compiled).await {
            Ok(_) => panic!("stream should fail"),
            Err(e) => e,
        };
        assert_eq!(err.to_string(), "BigQuery stream query failed: quota exceeded");
    }

    #[tokio::test]
    async fn test_transactions_unsupported() {
        let conn = BigQueryConnection::new(MockClient::default(), registry());
        assert!(matches!(
            conn.begin_transaction().await,
            Err(BqError::Unsupported("Transactions"))
        ));
        assert!(conn.commit_transaction().await.is_err());
        assert!(conn.rollback_transaction().await.is_err());
    }

    #[tokio::test]
    async fn test_shared_registry() {
        let shared = Arc::new(registry());
        let a = BigQueryConnection::with_shared_registry(MockClient::default(), Arc::clone(&shared));
        let b = BigQueryConnection::with_shared_registry(MockClient::default(), Arc::clone(&shared));
        assert!(Arc::ptr_eq(a.registry(), b.registry()));
    }
}
