//! Ergonomic builder functions for operation trees.
//!
//! # Example
//! ```
//! use bqsql::ast::builders::*;
//! use bqsql::ast::SelectQueryNode;
//!
//! let query = SelectQueryNode::from_table("analytics.events")
//!     .column(col("id"))
//!     .column(func("LENGTH", [col("name")]))
//!     .filter(eq(col("status"), val("active")))
//!     .limit(10);
//! ```

use crate::ast::*;

/// Column reference; `t.col` becomes a table-qualified reference.
pub fn col(name: &str) -> OperationNode {
    let (table, column) = match name.rsplit_once('.') {
        Some((table, column)) => (Some(TableNode::parse(table)), column),
        None => (None, name),
    };
    OperationNode::Reference(ReferenceNode {
        table,
        column: column.to_string(),
    })
}

/// Bare identifier.
pub fn ident(name: &str) -> OperationNode {
    OperationNode::Identifier(IdentifierNode {
        name: name.to_string(),
    })
}

/// Bound parameter value.
pub fn val(value: impl Into<Value>) -> OperationNode {
    OperationNode::Value(ValueNode {
        value: value.into(),
    })
}

/// Table reference parsed from `[schema.]name`.
pub fn table(qualified: &str) -> OperationNode {
    OperationNode::Table(TableNode::parse(qualified))
}

/// Function call.
pub fn func(name: &str, args: impl IntoIterator<Item = OperationNode>) -> OperationNode {
    OperationNode::Function(FunctionNode {
        name: name.to_string(),
        arguments: args.into_iter().collect(),
    })
}

pub fn binary(left: OperationNode, operator: &str, right: OperationNode) -> OperationNode {
    OperationNode::BinaryOperation(BinaryOperationNode {
        left: Box::new(left),
        operator: operator.to_string(),
        right: Box::new(right),
    })
}

pub fn eq(left: OperationNode, right: OperationNode) -> OperationNode {
    binary(left, "=", right)
}

pub fn and(left: OperationNode, right: OperationNode) -> OperationNode {
    binary(left, "and", right)
}

pub fn not(operand: OperationNode) -> OperationNode {
    OperationNode::UnaryOperation(UnaryOperationNode {
        operator: "not".to_string(),
        operand: Box::new(operand),
    })
}

pub fn alias(node: OperationNode, alias: &str) -> OperationNode {
    OperationNode::Alias(AliasNode {
        node: Box::new(node),
        alias: alias.to_string(),
    })
}

pub fn parens(node: OperationNode) -> OperationNode {
    OperationNode::Parens(ParensNode {
        node: Box::new(node),
    })
}

/// `(v1, v2, ...)` of bound values.
pub fn list<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> OperationNode {
    OperationNode::ValueList(ValueListNode {
        values: values.into_iter().map(val).collect(),
    })
}

/// Raw SQL with parameters spliced between fragments.
pub fn raw<S: Into<String>>(
    fragments: impl IntoIterator<Item = S>,
    parameters: impl IntoIterator<Item = OperationNode>,
) -> OperationNode {
    OperationNode::Raw(RawNode {
        sql_fragments: fragments.into_iter().map(Into::into).collect(),
        parameters: parameters.into_iter().collect(),
    })
}

/// Raw SQL without parameters.
pub fn raw_sql(sql: &str) -> OperationNode {
    raw([sql], Vec::<OperationNode>::new())
}

fn and_where(existing: Option<WhereNode>, expr: OperationNode) -> Option<WhereNode> {
    Some(match existing {
        Some(w) => WhereNode::new(and(*w.expression, expr)),
        None => WhereNode::new(expr),
    })
}

impl SelectQueryNode {
    /// Start a `select ... from <table>`.
    pub fn from_table(qualified: &str) -> Self {
        Self {
            from: vec![table(qualified)],
            ..Default::default()
        }
    }

    pub fn column(mut self, expr: OperationNode) -> Self {
        self.selections.push(SelectionNode::Expression(expr));
        self
    }

    pub fn select_all(mut self) -> Self {
        self.selections.push(SelectionNode::All);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Add a predicate, AND-ed with any existing one.
    pub fn filter(mut self, expr: OperationNode) -> Self {
        self.where_ = and_where(self.where_.take(), expr);
        self
    }

    pub fn join(mut self, join_type: JoinType, target: OperationNode, on: OperationNode) -> Self {
        self.joins.push(JoinNode {
            join_type,
            table: target,
            on: Some(on),
        });
        self
    }

    pub fn group_by(mut self, expr: OperationNode) -> Self {
        self.group_by.push(expr);
        self
    }

    pub fn union(self, other: SelectQueryNode) -> Self {
        self.set_operation(SetOperator::Union, other, false)
    }

    pub fn union_all(self, other: SelectQueryNode) -> Self {
        self.set_operation(SetOperator::Union, other, true)
    }

    pub fn set_operation(mut self, operator: SetOperator, other: SelectQueryNode, all: bool) -> Self {
        self.set_operations.push(SetOperationNode {
            operator,
            expression: Box::new(other.into()),
            all,
        });
        self
    }

    pub fn order_by(mut self, expr: OperationNode, direction: SortDirection) -> Self {
        self.order_by.push(OrderByItemNode {
            expression: expr,
            direction: Some(direction),
        });
        self
    }

    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(Box::new(val(n)));
        self
    }

    pub fn offset(mut self, n: i64) -> Self {
        self.offset = Some(Box::new(val(n)));
        self
    }
}

impl InsertQueryNode {
    pub fn into_table(qualified: &str) -> Self {
        Self {
            into: TableNode::parse(qualified),
            columns: vec![],
            values: None,
            select: None,
        }
    }

    pub fn columns<S: Into<String>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Append one row of bound values.
    pub fn values<V: Into<Value>>(mut self, row: impl IntoIterator<Item = V>) -> Self {
        let row: Vec<OperationNode> = row.into_iter().map(val).collect();
        self.values.get_or_insert_with(ValuesNode::default).rows.push(row);
        self
    }

    /// Append one row of arbitrary expressions.
    pub fn values_expr(mut self, row: impl IntoIterator<Item = OperationNode>) -> Self {
        let row: Vec<OperationNode> = row.into_iter().collect();
        self.values.get_or_insert_with(ValuesNode::default).rows.push(row);
        self
    }
}

impl UpdateQueryNode {
    pub fn table(qualified: &str) -> Self {
        Self {
            table: TableNode::parse(qualified),
            updates: vec![],
            from: vec![],
            where_: None,
        }
    }

    /// `column = <bound value>`
    pub fn set(self, column: &str, value: impl Into<Value>) -> Self {
        self.set_expr(column, val(value))
    }

    pub fn set_expr(mut self, column: &str, value: OperationNode) -> Self {
        self.updates.push(ColumnUpdateNode {
            column: column.to_string(),
            value,
        });
        self
    }

    pub fn filter(mut self, expr: OperationNode) -> Self {
        self.where_ = and_where(self.where_.take(), expr);
        self
    }
}

impl DeleteQueryNode {
    pub fn from_table(qualified: &str) -> Self {
        Self {
            from: TableNode::parse(qualified),
            where_: None,
        }
    }

    pub fn filter(mut self, expr: OperationNode) -> Self {
        self.where_ = and_where(self.where_.take(), expr);
        self
    }
}

impl CreateTableNode {
    pub fn new(qualified: &str) -> Self {
        Self {
            table: TableNode::parse(qualified),
            if_not_exists: false,
            columns: vec![],
            constraints: vec![],
        }
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn column(mut self, def: ColumnDefinitionNode) -> Self {
        self.columns.push(def);
        self
    }

    pub fn constraint(mut self, constraint: impl Into<OperationNode>) -> Self {
        self.constraints.push(constraint.into());
        self
    }
}

impl ColumnDefinitionNode {
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn references(mut self, qualified: &str, column: &str) -> Self {
        self.references = Some(ReferencesNode {
            table: TableNode::parse(qualified),
            columns: vec![column.to_string()],
            on_delete: None,
            on_update: None,
        });
        self
    }

    pub fn default_to(mut self, expr: OperationNode) -> Self {
        self.default_to = Some(Box::new(expr));
        self
    }
}
