//! Generic rendering of expression-level nodes.

use crate::ast::*;
use crate::transpiler::traits::QueryCompiler;

/// Dispatch a node to its `visit_*` method.
pub fn walk_node<C: QueryCompiler + ?Sized>(c: &mut C, node: &OperationNode) {
    match node {
        OperationNode::Select(n) => c.visit_select(n),
        OperationNode::Insert(n) => c.visit_insert(n),
        OperationNode::Update(n) => c.visit_update(n),
        OperationNode::Delete(n) => c.visit_delete(n),
        OperationNode::CreateTable(n) => c.visit_create_table(n),
        OperationNode::Table(n) => c.visit_table(n),
        OperationNode::Identifier(n) => c.visit_identifier(n),
        OperationNode::Reference(n) => c.visit_reference(n),
        OperationNode::Alias(n) => c.visit_alias(n),
        OperationNode::Value(n) => c.visit_value(n),
        OperationNode::ValueList(n) => c.visit_value_list(n),
        OperationNode::Function(n) => c.visit_function(n),
        OperationNode::BinaryOperation(n) => c.visit_binary_operation(n),
        OperationNode::UnaryOperation(n) => c.visit_unary_operation(n),
        OperationNode::Parens(n) => c.visit_parens(n),
        OperationNode::Raw(n) => c.visit_raw(n),
        OperationNode::PrimaryKeyConstraint(n) => c.visit_primary_key_constraint(n),
        OperationNode::UniqueConstraint(n) => c.visit_unique_constraint(n),
        OperationNode::ForeignKeyConstraint(n) => c.visit_foreign_key_constraint(n),
        OperationNode::ColumnDefinition(n) => c.visit_column_definition(n),
    }
}

/// Visit each item, separated by `, `.
pub fn write_list<C, T, F>(c: &mut C, items: &[T], mut visit: F)
where
    C: QueryCompiler + ?Sized,
    F: FnMut(&mut C, &T),
{
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            c.append(", ");
        }
        visit(c, item);
    }
}

/// `(a, b, c)` of quoted column names.
pub fn write_column_list<C: QueryCompiler + ?Sized>(c: &mut C, columns: &[String]) {
    c.append("(");
    write_list(c, columns, |c, col| c.append_identifier(col));
    c.append(")");
}

/// `name(arg, ...)` with the arguments visited in the given order.
pub fn write_call<C: QueryCompiler + ?Sized>(c: &mut C, name: &str, args: &[&OperationNode]) {
    c.append(name);
    c.append("(");
    write_list(c, args, |c, arg| c.visit_node(arg));
    c.append(")");
}

pub fn walk_where<C: QueryCompiler + ?Sized>(c: &mut C, node: &WhereNode) {
    c.append("where ");
    c.visit_node(&node.expression);
}

pub fn walk_table<C: QueryCompiler + ?Sized>(c: &mut C, node: &TableNode) {
    if let Some(schema) = &node.schema {
        c.append_identifier(schema);
        c.append(".");
    }
    c.append_identifier(&node.name);
}

pub fn walk_identifier<C: QueryCompiler + ?Sized>(c: &mut C, node: &IdentifierNode) {
    c.append_identifier(&node.name);
}

pub fn walk_reference<C: QueryCompiler + ?Sized>(c: &mut C, node: &ReferenceNode) {
    if let Some(table) = &node.table {
        c.visit_table(table);
        c.append(".");
    }
    if node.column == "*" {
        c.append("*");
    } else {
        c.append_identifier(&node.column);
    }
}

pub fn walk_alias<C: QueryCompiler + ?Sized>(c: &mut C, node: &AliasNode) {
    c.visit_node(&node.node);
    c.append(" as ");
    c.append_identifier(&node.alias);
}

pub fn walk_value<C: QueryCompiler + ?Sized>(c: &mut C, node: &ValueNode) {
    c.append_value(&node.value);
}

pub fn walk_value_list<C: QueryCompiler + ?Sized>(c: &mut C, node: &ValueListNode) {
    c.append("(");
    write_list(c, &node.values, |c, v| c.visit_node(v));
    c.append(")");
}

pub fn walk_function<C: QueryCompiler + ?Sized>(c: &mut C, node: &FunctionNode) {
    let args: Vec<&OperationNode> = node.arguments.iter().collect();
    write_call(c, &node.name, &args);
}

pub fn walk_binary_operation<C: QueryCompiler + ?Sized>(c: &mut C, node: &BinaryOperationNode) {
    c.visit_node(&node.left);
    c.append(" ");
    c.append(&node.operator);
    c.append(" ");
    c.visit_node(&node.right);
}

pub fn walk_unary_operation<C: QueryCompiler + ?Sized>(c: &mut C, node: &UnaryOperationNode) {
    c.append(&node.operator);
    c.append(" ");
    c.visit_node(&node.operand);
}

pub fn walk_parens<C: QueryCompiler + ?Sized>(c: &mut C, node: &ParensNode) {
    c.append("(");
    c.visit_node(&node.node);
    c.append(")");
}

/// Fragments and parameters strictly alternate; surplus parameters follow
/// the last fragment.
pub fn walk_raw<C: QueryCompiler + ?Sized>(c: &mut C, node: &RawNode) {
    let mut params = node.parameters.iter();
    for fragment in &node.sql_fragments {
        c.append(fragment);
        if let Some(param) = params.next() {
            c.visit_node(param);
        }
    }
    for param in params {
        c.visit_node(param);
    }
}
