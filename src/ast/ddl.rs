use serde::{Deserialize, Serialize};

use crate::ast::{OperationNode, TableNode};

/// `on delete` / `on update` action of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnModifyAction {
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
    NoAction,
}

impl std::fmt::Display for OnModifyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnModifyAction::Cascade => write!(f, "cascade"),
            OnModifyAction::SetNull => write!(f, "set null"),
            OnModifyAction::SetDefault => write!(f, "set default"),
            OnModifyAction::Restrict => write!(f, "restrict"),
            OnModifyAction::NoAction => write!(f, "no action"),
        }
    }
}

/// `references table (columns) [on delete ...] [on update ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencesNode {
    pub table: TableNode,
    pub columns: Vec<String>,
    #[serde(default)]
    pub on_delete: Option<OnModifyAction>,
    #[serde(default)]
    pub on_update: Option<OnModifyAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinitionNode {
    pub column: String,
    pub data_type: String,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub references: Option<ReferencesNode>,
    #[serde(default)]
    pub default_to: Option<Box<OperationNode>>,
}

impl ColumnDefinitionNode {
    pub fn new(column: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            data_type: data_type.into(),
            not_null: false,
            primary_key: false,
            unique: false,
            references: None,
            default_to: None,
        }
    }

    /// Whether the column declares an inline key or reference.
    pub fn has_key_constraint(&self) -> bool {
        self.primary_key || self.unique || self.references.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryKeyConstraintNode {
    #[serde(default)]
    pub name: Option<String>,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueConstraintNode {
    #[serde(default)]
    pub name: Option<String>,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyConstraintNode {
    #[serde(default)]
    pub name: Option<String>,
    pub columns: Vec<String>,
    pub references: ReferencesNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTableNode {
    pub table: TableNode,
    #[serde(default)]
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDefinitionNode>,
    /// Table-level constraint nodes.
    #[serde(default)]
    pub constraints: Vec<OperationNode>,
}
