//! Runtime layer between compiled queries and the warehouse.
//!
//! The network client is not part of this crate: callers implement
//! [`WarehouseClient`] over whatever transport and credentials they use, and
//! [`BigQueryConnection`] wraps it with parameter typing and JSON column
//! handling.

pub mod connection;
pub mod introspect;
pub mod params;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use std::sync::Arc;

use crate::ast::Value;
use crate::error::ClientError;

pub use connection::BigQueryConnection;
pub use introspect::{ColumnMetadata, DatabaseIntrospector, TableMetadata};
pub use params::ParamType;

/// A result row: field name to value, in column order.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Rows pulled lazily from a streaming query.
pub type RowStream = BoxStream<'static, Result<Row, ClientError>>;

/// One statement as sent to the warehouse.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub sql: String,
    pub params: Vec<Value>,
    /// Present only when at least one parameter is null.
    pub types: Option<Vec<ParamType>>,
}

/// Query execution against the warehouse.
#[async_trait]
pub trait WarehouseClient: Send + Sync {
    async fn query(&self, request: QueryRequest) -> Result<Vec<Row>, ClientError>;

    async fn query_stream(&self, request: QueryRequest) -> Result<RowStream, ClientError>;

    /// Dataset ids visible to the client.
    async fn list_datasets(&self) -> Result<Vec<String>, ClientError>;
}

#[async_trait]
impl<C: WarehouseClient + ?Sized> WarehouseClient for Arc<C> {
    async fn query(&self, request: QueryRequest) -> Result<Vec<Row>, ClientError> {
        (**self).query(request).await
    }

    async fn query_stream(&self, request: QueryRequest) -> Result<RowStream, ClientError> {
        (**self).query_stream(request).await
    }

    async fn list_datasets(&self) -> Result<Vec<String>, ClientError> {
        (**self).list_datasets().await
    }
}
