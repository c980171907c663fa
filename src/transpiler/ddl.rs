//! Generic rendering of DDL nodes.

use crate::ast::*;
use crate::transpiler::expr::{write_column_list, write_list};
use crate::transpiler::traits::QueryCompiler;

/// Generate CREATE TABLE SQL.
pub fn walk_create_table<C: QueryCompiler + ?Sized>(c: &mut C, node: &CreateTableNode) {
    c.append("create table ");
    if node.if_not_exists {
        c.append("if not exists ");
    }
    c.visit_table(&node.table);
    c.append(" (");
    write_list(c, &node.columns, |c, col| c.visit_column_definition(col));
    for constraint in &node.constraints {
        c.append(", ");
        c.visit_node(constraint);
    }
    c.append(")");
}

pub fn walk_column_definition<C: QueryCompiler + ?Sized>(c: &mut C, node: &ColumnDefinitionNode) {
    c.append_identifier(&node.column);
    c.append(" ");
    c.append(&node.data_type);

    if let Some(default) = &node.default_to {
        c.append(" default ");
        c.visit_node(default);
    }
    if node.primary_key {
        c.append(" primary key");
    }
    if node.unique {
        c.append(" unique");
    }
    if node.not_null {
        c.append(" not null");
    }
    if let Some(references) = &node.references {
        c.append(" ");
        c.visit_references(references);
    }
}

pub fn walk_references<C: QueryCompiler + ?Sized>(c: &mut C, node: &ReferencesNode) {
    c.append("references ");
    c.visit_table(&node.table);
    c.append(" ");
    write_column_list(c, &node.columns);

    if let Some(action) = node.on_delete {
        c.append(&format!(" on delete {}", action));
    }
    if let Some(action) = node.on_update {
        c.append(&format!(" on update {}", action));
    }
}

fn write_constraint_name<C: QueryCompiler + ?Sized>(c: &mut C, name: Option<&str>) {
    if let Some(name) = name {
        c.append("constraint ");
        c.append_identifier(name);
        c.append(" ");
    }
}

pub fn walk_primary_key_constraint<C: QueryCompiler + ?Sized>(
    c: &mut C,
    node: &PrimaryKeyConstraintNode,
) {
    write_constraint_name(c, node.name.as_deref());
    c.append("primary key ");
    write_column_list(c, &node.columns);
}

pub fn walk_unique_constraint<C: QueryCompiler + ?Sized>(c: &mut C, node: &UniqueConstraintNode) {
    write_constraint_name(c, node.name.as_deref());
    c.append("unique ");
    write_column_list(c, &node.columns);
}

pub fn walk_foreign_key_constraint<C: QueryCompiler + ?Sized>(
    c: &mut C,
    node: &ForeignKeyConstraintNode,
) {
    write_constraint_name(c, node.name.as_deref());
    c.append("foreign key ");
    write_column_list(c, &node.columns);
    c.append(" ");
    c.visit_references(&node.references);
}
