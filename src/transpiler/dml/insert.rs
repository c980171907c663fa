//! INSERT rendering.

use crate::ast::*;
use crate::transpiler::expr::{write_column_list, write_list};
use crate::transpiler::traits::QueryCompiler;

/// Generate INSERT SQL.
pub fn walk_insert<C: QueryCompiler + ?Sized>(c: &mut C, node: &InsertQueryNode) {
    c.append("insert into ");
    c.visit_table(&node.into);

    if !node.columns.is_empty() {
        c.append(" ");
        write_column_list(c, &node.columns);
    }

    // INSERT...SELECT takes precedence over VALUES
    if let Some(select) = &node.select {
        c.append(" ");
        c.visit_node(select);
    } else if let Some(values) = &node.values {
        c.append(" ");
        c.visit_values(values);
    }
}

pub fn walk_values<C: QueryCompiler + ?Sized>(c: &mut C, node: &ValuesNode) {
    c.append("values ");
    write_list(c, &node.rows, |c, row| {
        c.append("(");
        write_list(c, row, |c, v| c.visit_node(v));
        c.append(")");
    });
}
