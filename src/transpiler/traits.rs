//! Compiler trait and the shared compilation buffer.
//!
//! [`QueryCompiler`] has one `visit_*` method per node kind. Every method
//! defaults to the matching `walk_*` function, which renders the node in the
//! generic dialect and recurses back through the trait, so a dialect only
//! overrides the kinds it rewrites and still sees every nested node.

use crate::ast::*;
use crate::transpiler::{ddl, dml, expr};

/// SQL text and positional parameters collected during one pass.
#[derive(Debug, Default)]
pub struct CompileContext {
    pub sql: String,
    pub params: Vec<Value>,
}

impl CompileContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parameter and return its 1-based position.
    pub fn add_param(&mut self, value: Value) -> usize {
        self.params.push(value);
        self.params.len()
    }
}

/// Escape an identifier with the given quote character by doubling it.
pub fn escape_identifier(name: &str, quote: char) -> String {
    let doubled: String = [quote, quote].iter().collect();
    format!("{q}{}{q}", name.replace(quote, &doubled), q = quote)
}

/// Visitor over the operation tree that writes SQL into a [`CompileContext`].
pub trait QueryCompiler {
    fn context(&mut self) -> &mut CompileContext;

    /// Quote a table or column name.
    fn quote_identifier(&self, name: &str) -> String {
        escape_identifier(name, '"')
    }

    /// Placeholder text for the parameter at 1-based `index`.
    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn append(&mut self, sql: &str) {
        self.context().sql.push_str(sql);
    }

    fn append_identifier(&mut self, name: &str) {
        let quoted = self.quote_identifier(name);
        self.append(&quoted);
    }

    /// Bind `value` and emit its placeholder in the same step.
    fn append_value(&mut self, value: &Value) {
        let index = self.context().add_param(value.clone());
        let placeholder = self.placeholder(index);
        self.append(&placeholder);
    }

    fn visit_node(&mut self, node: &OperationNode) {
        expr::walk_node(self, node)
    }

    fn visit_select(&mut self, node: &SelectQueryNode) {
        dml::select::walk_select(self, node)
    }

    fn visit_set_operation(&mut self, node: &SetOperationNode) {
        dml::select::walk_set_operation(self, node)
    }

    fn visit_selection(&mut self, node: &SelectionNode) {
        dml::select::walk_selection(self, node)
    }

    fn visit_join(&mut self, node: &JoinNode) {
        dml::select::walk_join(self, node)
    }

    fn visit_order_by_item(&mut self, node: &OrderByItemNode) {
        dml::select::walk_order_by_item(self, node)
    }

    fn visit_insert(&mut self, node: &InsertQueryNode) {
        dml::insert::walk_insert(self, node)
    }

    fn visit_values(&mut self, node: &ValuesNode) {
        dml::insert::walk_values(self, node)
    }

    fn visit_update(&mut self, node: &UpdateQueryNode) {
        dml::update::walk_update(self, node)
    }

    fn visit_column_update(&mut self, node: &ColumnUpdateNode) {
        dml::update::walk_column_update(self, node)
    }

    fn visit_delete(&mut self, node: &DeleteQueryNode) {
        dml::delete::walk_delete(self, node)
    }

    fn visit_where(&mut self, node: &WhereNode) {
        expr::walk_where(self, node)
    }

    fn visit_table(&mut self, node: &TableNode) {
        expr::walk_table(self, node)
    }

    fn visit_identifier(&mut self, node: &IdentifierNode) {
        expr::walk_identifier(self, node)
    }

    fn visit_reference(&mut self, node: &ReferenceNode) {
        expr::walk_reference(self, node)
    }

    fn visit_alias(&mut self, node: &AliasNode) {
        expr::walk_alias(self, node)
    }

    fn visit_value(&mut self, node: &ValueNode) {
        expr::walk_value(self, node)
    }

    fn visit_value_list(&mut self, node: &ValueListNode) {
        expr::walk_value_list(self, node)
    }

    fn visit_function(&mut self, node: &FunctionNode) {
        expr::walk_function(self, node)
    }

    fn visit_binary_operation(&mut self, node: &BinaryOperationNode) {
        expr::walk_binary_operation(self, node)
    }

    fn visit_unary_operation(&mut self, node: &UnaryOperationNode) {
        expr::walk_unary_operation(self, node)
    }

    fn visit_parens(&mut self, node: &ParensNode) {
        expr::walk_parens(self, node)
    }

    fn visit_raw(&mut self, node: &RawNode) {
        expr::walk_raw(self, node)
    }

    fn visit_create_table(&mut self, node: &CreateTableNode) {
        ddl::walk_create_table(self, node)
    }

    fn visit_column_definition(&mut self, node: &ColumnDefinitionNode) {
        ddl::walk_column_definition(self, node)
    }

    fn visit_references(&mut self, node: &ReferencesNode) {
        ddl::walk_references(self, node)
    }

    fn visit_primary_key_constraint(&mut self, node: &PrimaryKeyConstraintNode) {
        ddl::walk_primary_key_constraint(self, node)
    }

    fn visit_unique_constraint(&mut self, node: &UniqueConstraintNode) {
        ddl::walk_unique_constraint(self, node)
    }

    fn visit_foreign_key_constraint(&mut self, node: &ForeignKeyConstraintNode) {
        ddl::walk_foreign_key_constraint(self, node)
    }
}

/// Compiler for the generic dialect: double-quoted identifiers, `$n` placeholders.
#[derive(Debug, Default)]
pub struct GenericCompiler {
    context: CompileContext,
}

impl GenericCompiler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueryCompiler for GenericCompiler {
    fn context(&mut self) -> &mut CompileContext {
        &mut self.context
    }
}
