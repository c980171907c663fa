use serde::{Deserialize, Serialize};

use crate::ast::{OperationNode, Value};

/// Table reference with an optional schema qualifier.
///
/// The qualifier is kept as a single segment even when it encodes a
/// `project.dataset` pair; splitting it is a dialect decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableNode {
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
}

impl TableNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    pub fn with_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Parse `name`, `schema.name` or `project.dataset.name`.
    ///
    /// Everything before the last dot becomes the qualifier.
    pub fn parse(qualified: &str) -> Self {
        match qualified.rsplit_once('.') {
            Some((schema, name)) => Self::with_schema(schema, name),
            None => Self::new(qualified),
        }
    }

    /// Key used by the JSON column registry (`schema.table` or `table`).
    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }
}

/// A bare identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierNode {
    pub name: String,
}

/// Column reference, optionally qualified by a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceNode {
    #[serde(default)]
    pub table: Option<TableNode>,
    pub column: String,
}

/// `expr as alias`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasNode {
    pub node: Box<OperationNode>,
    pub alias: String,
}

/// A literal value, always sent as a bound parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueNode {
    pub value: Value,
}

/// `(v1, v2, ...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueListNode {
    pub values: Vec<OperationNode>,
}

/// Function call `name(arg, ...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionNode {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<OperationNode>,
}

/// `left <operator> right`; the operator is emitted verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryOperationNode {
    pub left: Box<OperationNode>,
    pub operator: String,
    pub right: Box<OperationNode>,
}

/// Prefix operator such as `not` or `exists`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryOperationNode {
    pub operator: String,
    pub operand: Box<OperationNode>,
}

/// `( node )`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParensNode {
    pub node: Box<OperationNode>,
}

/// Caller-supplied SQL text interleaved with parameters.
///
/// `sql_fragments.len()` is expected to be `parameters.len() + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    pub sql_fragments: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<OperationNode>,
}

/// A WHERE or HAVING predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereNode {
    pub expression: Box<OperationNode>,
}

impl WhereNode {
    pub fn new(expression: OperationNode) -> Self {
        Self {
            expression: Box::new(expression),
        }
    }
}

/// One item of a select list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionNode {
    /// `*`
    All,
    /// `table.*`
    AllFrom(TableNode),
    Expression(OperationNode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItemNode {
    pub expression: OperationNode,
    #[serde(default)]
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinType::Inner => write!(f, "inner join"),
            JoinType::Left => write!(f, "left join"),
            JoinType::Right => write!(f, "right join"),
            JoinType::Full => write!(f, "full join"),
            JoinType::Cross => write!(f, "cross join"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinNode {
    pub join_type: JoinType,
    pub table: OperationNode,
    #[serde(default)]
    pub on: Option<OperationNode>,
}
