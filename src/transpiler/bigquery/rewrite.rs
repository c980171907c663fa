//! Rewrite decisions for the BigQuery dialect.
//!
//! Pure functions over node shapes; the compiler asks these before deciding
//! whether to emit the default rendering or substitute its own text.

use crate::ast::{ColumnDefinitionNode, SetOperator};

/// BigQuery accepts key constraints only as unenforced metadata.
pub const NOT_ENFORCED: &str = " not enforced";

/// BigQuery rejects UPDATE and DELETE without a WHERE clause.
pub const MUTATION_GUARD: &str = " where true";

/// What to do with a function call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionRewrite {
    /// Emit the name as written.
    Keep,
    /// Emit a different name with the same arguments.
    Rename(&'static str),
    /// Emit a different name with the first two arguments swapped.
    SwapLeadingArgs(&'static str),
}

/// Look up the substitution for `name`, matched case-insensitively.
pub fn function_rewrite(name: &str) -> FunctionRewrite {
    match name.to_ascii_uppercase().as_str() {
        "LENGTH" => FunctionRewrite::Rename("CHAR_LENGTH"),
        "NOW" => FunctionRewrite::Rename("CURRENT_TIMESTAMP"),
        "DATE_FORMAT" => FunctionRewrite::SwapLeadingArgs("FORMAT_TIMESTAMP"),
        _ => FunctionRewrite::Keep,
    }
}

/// Keyword text for a set operation. A bare UNION must be spelled out as
/// `union distinct`.
pub fn set_operation_keyword(operator: SetOperator, all: bool) -> String {
    match (operator, all) {
        (SetOperator::Union, false) => "union distinct".to_string(),
        (op, true) => format!("{} all", op),
        (op, false) => op.to_string(),
    }
}

pub fn needs_mutation_guard(has_where: bool) -> bool {
    !has_where
}

/// How a table qualifier maps onto BigQuery's `project.dataset.table`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualifierShape<'a> {
    /// No embedded dot: render as `schema.table`.
    Plain,
    /// `project.dataset`
    ProjectDataset(&'a str, &'a str),
    /// Any other dotted shape; left to the default rendering.
    Ambiguous,
}

pub fn split_qualifier(qualifier: &str) -> QualifierShape<'_> {
    if !qualifier.contains('.') {
        return QualifierShape::Plain;
    }
    match qualifier.split_once('.') {
        Some((project, dataset))
            if !project.is_empty() && !dataset.is_empty() && !dataset.contains('.') =>
        {
            QualifierShape::ProjectDataset(project, dataset)
        }
        _ => QualifierShape::Ambiguous,
    }
}

/// Inline primary key, unique or reference markers need the suffix.
pub fn column_needs_not_enforced(node: &ColumnDefinitionNode) -> bool {
    node.has_key_constraint()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_rewrite_is_case_insensitive() {
        assert_eq!(function_rewrite("length"), FunctionRewrite::Rename("CHAR_LENGTH"));
        assert_eq!(function_rewrite("Now"), FunctionRewrite::Rename("CURRENT_TIMESTAMP"));
        assert_eq!(
            function_rewrite("date_format"),
            FunctionRewrite::SwapLeadingArgs("FORMAT_TIMESTAMP")
        );
        assert_eq!(function_rewrite("coalesce"), FunctionRewrite::Keep);
    }

    #[test]
    fn test_set_operation_keyword() {
        assert_eq!(set_operation_keyword(SetOperator::Union, false), "union distinct");
        assert_eq!(set_operation_keyword(SetOperator::Union, true), "union all");
        assert_eq!(set_operation_keyword(SetOperator::Intersect, false), "intersect");
        assert_eq!(set_operation_keyword(SetOperator::Except, true), "except all");
    }

    #[test]
    fn test_split_qualifier() {
        assert_eq!(split_qualifier("analytics"), QualifierShape::Plain);
        assert_eq!(
            split_qualifier("my-project.analytics"),
            QualifierShape::ProjectDataset("my-project", "analytics")
        );
        assert_eq!(split_qualifier("a.b.c"), QualifierShape::Ambiguous);
        assert_eq!(split_qualifier(".b"), QualifierShape::Ambiguous);
    }

    #[test]
    fn test_column_markers() {
        let plain = ColumnDefinitionNode::new("name", "STRING");
        assert!(!column_needs_not_enforced(&plain));
        assert!(column_needs_not_enforced(&plain.clone().primary_key()));
        assert!(column_needs_not_enforced(&plain.clone().unique()));
        assert!(column_needs_not_enforced(&plain.references("app.users", "id")));
    }

    #[test]
    fn test_mutation_guard() {
        assert!(needs_mutation_guard(false));
        assert!(!needs_mutation_guard(true));
    }
}
