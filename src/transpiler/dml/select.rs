//! SELECT rendering.

use crate::ast::*;
use crate::transpiler::expr::write_list;
use crate::transpiler::traits::QueryCompiler;

/// Generate SELECT SQL.
///
/// Clause order: select, from, joins, where, group by, having, set
/// operations, order by, limit, offset.
pub fn walk_select<C: QueryCompiler + ?Sized>(c: &mut C, node: &SelectQueryNode) {
    c.append("select ");
    if node.distinct {
        c.append("distinct ");
    }

    if node.selections.is_empty() {
        c.append("*");
    } else {
        write_list(c, &node.selections, |c, s| c.visit_selection(s));
    }

    if !node.from.is_empty() {
        c.append(" from ");
        write_list(c, &node.from, |c, f| c.visit_node(f));
    }

    for join in &node.joins {
        c.append(" ");
        c.visit_join(join);
    }

    if let Some(where_) = &node.where_ {
        c.append(" ");
        c.visit_where(where_);
    }

    if !node.group_by.is_empty() {
        c.append(" group by ");
        write_list(c, &node.group_by, |c, g| c.visit_node(g));
    }

    if let Some(having) = &node.having {
        c.append(" having ");
        c.visit_node(&having.expression);
    }

    for set_op in &node.set_operations {
        c.append(" ");
        c.visit_set_operation(set_op);
    }

    if !node.order_by.is_empty() {
        c.append(" order by ");
        write_list(c, &node.order_by, |c, o| c.visit_order_by_item(o));
    }

    if let Some(limit) = &node.limit {
        c.append(" limit ");
        c.visit_node(limit);
    }

    if let Some(offset) = &node.offset {
        c.append(" offset ");
        c.visit_node(offset);
    }
}

pub fn walk_set_operation<C: QueryCompiler + ?Sized>(c: &mut C, node: &SetOperationNode) {
    c.append(&node.operator.to_string());
    if node.all {
        c.append(" all");
    }
    c.append(" ");
    c.visit_node(&node.expression);
}

pub fn walk_selection<C: QueryCompiler + ?Sized>(c: &mut C, node: &SelectionNode) {
    match node {
        SelectionNode::All => c.append("*"),
        SelectionNode::AllFrom(table) => {
            c.visit_table(table);
            c.append(".*");
        }
        SelectionNode::Expression(expr) => c.visit_node(expr),
    }
}

pub fn walk_join<C: QueryCompiler + ?Sized>(c: &mut C, node: &JoinNode) {
    c.append(&node.join_type.to_string());
    c.append(" ");
    c.visit_node(&node.table);
    if let Some(on) = &node.on {
        c.append(" on ");
        c.visit_node(on);
    }
}

pub fn walk_order_by_item<C: QueryCompiler + ?Sized>(c: &mut C, node: &OrderByItemNode) {
    c.visit_node(&node.expression);
    match node.direction {
        Some(SortDirection::Asc) => c.append(" asc"),
        Some(SortDirection::Desc) => c.append(" desc"),
        None => {}
    }
}
