//! # bqsql: BigQuery SQL dialect compiler
//!
//! Compiles relational operation trees into BigQuery Standard SQL with
//! positional `?` parameters, and adapts parameters and result rows at run
//! time: null parameters get explicit type tags, and configured JSON columns
//! are encoded on the way in and decoded on the way out.
//!
//! ## Quick Example
//!
//! ```rust
//! use bqsql::prelude::*;
//!
//! let query = SelectQueryNode::from_table("my-project.analytics.events")
//!     .column(func("LENGTH", [col("name")]))
//!     .filter(eq(col("status"), val("active")))
//!     .union(SelectQueryNode::from_table("archive.events").column(col("name")));
//!
//! let compiled = query.compile();
//! assert_eq!(
//!     compiled.sql,
//!     "select CHAR_LENGTH(`name`) from `my-project`.`analytics`.`events` \
//!      where `status` = ? union distinct select `name` from `archive`.`events`"
//! );
//! assert_eq!(compiled.parameters.len(), 1);
//! ```
//!
//! ## Rewrites
//!
//! | Generic                     | BigQuery                          |
//! |-----------------------------|-----------------------------------|
//! | `union`                     | `union distinct`                  |
//! | `LENGTH(x)`                 | `CHAR_LENGTH(x)`                  |
//! | `NOW()`                     | `CURRENT_TIMESTAMP()`             |
//! | `DATE_FORMAT(v, f)`         | `FORMAT_TIMESTAMP(f, v)`          |
//! | `update t set ...`          | `update t set ... where true`     |
//! | `primary key (id)`          | `primary key (id) not enforced`   |
//! | `project.dataset.table`     | `` `project`.`dataset`.`table` `` |

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::engine::{
        BigQueryConnection, DatabaseIntrospector, ParamType, QueryRequest, Row, WarehouseClient,
    };
    pub use crate::error::*;
    pub use crate::registry::JsonColumnRegistry;
    pub use crate::transpiler::{CompiledQuery, Dialect, QueryCompiler, ToSql};
}
