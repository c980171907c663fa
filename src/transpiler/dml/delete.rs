//! DELETE rendering.

use crate::ast::*;
use crate::transpiler::traits::QueryCompiler;

/// Generate DELETE SQL.
pub fn walk_delete<C: QueryCompiler + ?Sized>(c: &mut C, node: &DeleteQueryNode) {
    c.append("delete from ");
    c.visit_table(&node.from);

    if let Some(where_) = &node.where_ {
        c.append(" ");
        c.visit_where(where_);
    }
}
