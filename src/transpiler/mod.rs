//! SQL compiler for operation trees.
//!
//! Walks an [`OperationNode`] tree and produces SQL text plus the positional
//! parameters bound to its placeholders.

pub mod bigquery;
pub mod ddl;
pub mod dialect;
pub mod dml;
pub mod expr;
pub mod raw;
pub mod traits;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::ast::*;
pub use bigquery::{BigQueryCompiler, quote_bigquery_identifier};
pub use dialect::Dialect;
pub use traits::{CompileContext, GenericCompiler, QueryCompiler, escape_identifier};

/// SQL text, its bound parameters and the tree it was compiled from.
///
/// Parameter `i` binds the `i`-th placeholder of `sql`, left to right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub parameters: Vec<Value>,
    pub query: OperationNode,
}

/// Run one compilation pass of `root` through `compiler`.
///
/// The compiler's buffer is drained, so the same compiler can be reused.
pub fn compile_query<C: QueryCompiler + ?Sized>(
    compiler: &mut C,
    root: &OperationNode,
) -> CompiledQuery {
    compiler.visit_node(root);
    let context = std::mem::take(compiler.context());
    tracing::debug!(sql = %context.sql, params = context.params.len(), "compiled query");
    CompiledQuery {
        sql: context.sql,
        parameters: context.params,
        query: root.clone(),
    }
}

/// Trait for converting operation trees to SQL.
pub trait ToSql {
    /// Compile with the default (BigQuery) dialect.
    fn compile(&self) -> CompiledQuery {
        self.compile_with_dialect(Dialect::default())
    }

    fn compile_with_dialect(&self, dialect: Dialect) -> CompiledQuery;

    /// SQL text only, default dialect.
    fn to_sql(&self) -> String {
        self.compile().sql
    }
}

impl ToSql for OperationNode {
    fn compile_with_dialect(&self, dialect: Dialect) -> CompiledQuery {
        dialect.compile(self)
    }
}

macro_rules! impl_to_sql {
    ($($node:ty),* $(,)?) => {
        $(
            impl ToSql for $node {
                fn compile_with_dialect(&self, dialect: Dialect) -> CompiledQuery {
                    dialect.compile(&OperationNode::from(self.clone()))
                }
            }
        )*
    };
}

impl_to_sql!(
    SelectQueryNode,
    InsertQueryNode,
    UpdateQueryNode,
    DeleteQueryNode,
    CreateTableNode,
);

/// Count `?` placeholders outside quoted strings and identifiers.
pub fn count_placeholders(sql: &str) -> usize {
    let mut count = 0;
    let mut quote: Option<char> = None;
    let mut chars = sql.chars();
    while let Some(ch) = chars.next() {
        match quote {
            Some(q) => {
                if ch == '\\' {
                    chars.next();
                } else if ch == q {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' | '`' => quote = Some(ch),
                '?' => count += 1,
                _ => {}
            },
        }
    }
    count
}
