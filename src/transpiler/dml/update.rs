//! UPDATE rendering.

use crate::ast::*;
use crate::transpiler::expr::write_list;
use crate::transpiler::traits::QueryCompiler;

/// Generate UPDATE SQL.
pub fn walk_update<C: QueryCompiler + ?Sized>(c: &mut C, node: &UpdateQueryNode) {
    c.append("update ");
    c.visit_table(&node.table);

    c.append(" set ");
    write_list(c, &node.updates, |c, u| c.visit_column_update(u));

    // FROM clause (multi-table update)
    if !node.from.is_empty() {
        c.append(" from ");
        write_list(c, &node.from, |c, f| c.visit_node(f));
    }

    if let Some(where_) = &node.where_ {
        c.append(" ");
        c.visit_where(where_);
    }
}

pub fn walk_column_update<C: QueryCompiler + ?Sized>(c: &mut C, node: &ColumnUpdateNode) {
    c.append_identifier(&node.column);
    c.append(" = ");
    c.visit_node(&node.value);
}
