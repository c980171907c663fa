//! BigQuery dialect compiler.
//!
//! Renders through the generic walkers and intercepts the node kinds whose
//! BigQuery spelling differs: set operations, function names, unguarded
//! mutations, `project.dataset` qualifiers, key constraints and raw SQL.

pub mod rewrite;

use crate::ast::*;
use crate::transpiler::expr::{self, write_call};
use crate::transpiler::raw::{self, RawPiece};
use crate::transpiler::traits::{CompileContext, QueryCompiler};
use crate::transpiler::{ddl, dml};

use self::rewrite::{FunctionRewrite, MUTATION_GUARD, NOT_ENFORCED, QualifierShape};

/// Quote a BigQuery identifier with backticks.
pub fn quote_bigquery_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "\\`"))
}

#[derive(Debug, Default)]
pub struct BigQueryCompiler {
    context: CompileContext,
}

impl BigQueryCompiler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryCompiler for BigQueryCompiler {
    fn context(&mut self) -> &mut CompileContext {
        &mut self.context
    }

    fn quote_identifier(&self, name: &str) -> String {
        quote_bigquery_identifier(name)
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn visit_set_operation(&mut self, node: &SetOperationNode) {
        self.append(&rewrite::set_operation_keyword(node.operator, node.all));
        self.append(" ");
        self.visit_node(&node.expression);
    }

    fn visit_function(&mut self, node: &FunctionNode) {
        let args: Vec<&OperationNode> = node.arguments.iter().collect();
        match rewrite::function_rewrite(&node.name) {
            FunctionRewrite::Keep => expr::walk_function(self, node),
            FunctionRewrite::Rename(name) => write_call(self, name, &args),
            FunctionRewrite::SwapLeadingArgs(name) => {
                let mut args = args;
                if args.len() >= 2 {
                    args.swap(0, 1);
                }
                write_call(self, name, &args);
            }
        }
    }

    fn visit_update(&mut self, node: &UpdateQueryNode) {
        dml::update::walk_update(self, node);
        if rewrite::needs_mutation_guard(node.where_.is_some()) {
            self.append(MUTATION_GUARD);
        }
    }

    fn visit_delete(&mut self, node: &DeleteQueryNode) {
        dml::delete::walk_delete(self, node);
        if rewrite::needs_mutation_guard(node.where_.is_some()) {
            self.append(MUTATION_GUARD);
        }
    }

    fn visit_table(&mut self, node: &TableNode) {
        let Some(schema) = node.schema.as_deref() else {
            return expr::walk_table(self, node);
        };
        match rewrite::split_qualifier(schema) {
            QualifierShape::ProjectDataset(project, dataset) => {
                self.append_identifier(project);
                self.append(".");
                self.append_identifier(dataset);
                self.append(".");
                self.append_identifier(&node.name);
            }
            QualifierShape::Ambiguous => {
                tracing::warn!(
                    qualifier = schema,
                    table = %node.name,
                    "table qualifier has more than two parts, rendering it as one identifier"
                );
                expr::walk_table(self, node);
            }
            QualifierShape::Plain => expr::walk_table(self, node),
        }
    }

    fn visit_raw(&mut self, node: &RawNode) {
        for piece in raw::translate(&node.sql_fragments, &node.parameters) {
            match piece {
                RawPiece::Text(text) => self.append(&text),
                RawPiece::Param(param) => self.visit_node(param),
            }
        }
    }

    fn visit_column_definition(&mut self, node: &ColumnDefinitionNode) {
        ddl::walk_column_definition(self, node);
        if rewrite::column_needs_not_enforced(node) {
            self.append(NOT_ENFORCED);
        }
    }

    fn visit_primary_key_constraint(&mut self, node: &PrimaryKeyConstraintNode) {
        ddl::walk_primary_key_constraint(self, node);
        self.append(NOT_ENFORCED);
    }

    fn visit_unique_constraint(&mut self, node: &UniqueConstraintNode) {
        ddl::walk_unique_constraint(self, node);
        self.append(NOT_ENFORCED);
    }

    fn visit_foreign_key_constraint(&mut self, node: &ForeignKeyConstraintNode) {
        ddl::walk_foreign_key_constraint(self, node);
        self.append(NOT_ENFORCED);
    }
}
