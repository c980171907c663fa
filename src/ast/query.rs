use serde::{Deserialize, Serialize};

use crate::ast::{
    JoinNode, OperationNode, OrderByItemNode, SelectionNode, TableNode, WhereNode,
};

/// Set operators joining two queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

impl std::fmt::Display for SetOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetOperator::Union => write!(f, "union"),
            SetOperator::Intersect => write!(f, "intersect"),
            SetOperator::Except => write!(f, "except"),
        }
    }
}

/// `union [all] <query>` attached to a select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetOperationNode {
    pub operator: SetOperator,
    pub expression: Box<OperationNode>,
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectQueryNode {
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub selections: Vec<SelectionNode>,
    #[serde(default)]
    pub from: Vec<OperationNode>,
    #[serde(default)]
    pub joins: Vec<JoinNode>,
    #[serde(default, rename = "where")]
    pub where_: Option<WhereNode>,
    #[serde(default)]
    pub group_by: Vec<OperationNode>,
    #[serde(default)]
    pub having: Option<WhereNode>,
    #[serde(default)]
    pub set_operations: Vec<SetOperationNode>,
    #[serde(default)]
    pub order_by: Vec<OrderByItemNode>,
    #[serde(default)]
    pub limit: Option<Box<OperationNode>>,
    #[serde(default)]
    pub offset: Option<Box<OperationNode>>,
}

/// Rows of an `insert ... values` statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuesNode {
    pub rows: Vec<Vec<OperationNode>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertQueryNode {
    pub into: TableNode,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub values: Option<ValuesNode>,
    /// `insert into t (...) select ...`
    #[serde(default)]
    pub select: Option<Box<OperationNode>>,
}

/// `column = value` inside an UPDATE's SET list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnUpdateNode {
    pub column: String,
    pub value: OperationNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateQueryNode {
    pub table: TableNode,
    pub updates: Vec<ColumnUpdateNode>,
    #[serde(default)]
    pub from: Vec<OperationNode>,
    #[serde(default, rename = "where")]
    pub where_: Option<WhereNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteQueryNode {
    pub from: TableNode,
    #[serde(default, rename = "where")]
    pub where_: Option<WhereNode>,
}
