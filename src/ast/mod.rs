//! Operation tree for relational queries.
//!
//! Every syntactic unit of a query is one [`OperationNode`] variant carrying
//! only the fields relevant to its kind. Trees are immutable once built and
//! are consumed read-only by a [`QueryCompiler`](crate::transpiler::QueryCompiler).

pub mod builders;
pub mod ddl;
pub mod expr;
pub mod query;
pub mod values;

use serde::{Deserialize, Serialize};

pub use self::ddl::{
    ColumnDefinitionNode, CreateTableNode, ForeignKeyConstraintNode, OnModifyAction,
    PrimaryKeyConstraintNode, ReferencesNode, UniqueConstraintNode,
};
pub use self::expr::{
    AliasNode, BinaryOperationNode, FunctionNode, IdentifierNode, JoinNode, JoinType,
    OrderByItemNode, ParensNode, RawNode, ReferenceNode, SelectionNode, SortDirection, TableNode,
    UnaryOperationNode, ValueListNode, ValueNode, WhereNode,
};
pub use self::query::{
    ColumnUpdateNode, DeleteQueryNode, InsertQueryNode, SelectQueryNode, SetOperationNode,
    SetOperator, UpdateQueryNode, ValuesNode,
};
pub use self::values::Value;

/// One node of the operation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationNode {
    Select(SelectQueryNode),
    Insert(InsertQueryNode),
    Update(UpdateQueryNode),
    Delete(DeleteQueryNode),
    CreateTable(CreateTableNode),
    Table(TableNode),
    Identifier(IdentifierNode),
    Reference(ReferenceNode),
    Alias(AliasNode),
    Value(ValueNode),
    ValueList(ValueListNode),
    Function(FunctionNode),
    BinaryOperation(BinaryOperationNode),
    UnaryOperation(UnaryOperationNode),
    Parens(ParensNode),
    Raw(RawNode),
    PrimaryKeyConstraint(PrimaryKeyConstraintNode),
    UniqueConstraint(UniqueConstraintNode),
    ForeignKeyConstraint(ForeignKeyConstraintNode),
    ColumnDefinition(ColumnDefinitionNode),
}

impl From<SelectQueryNode> for OperationNode {
    fn from(node: SelectQueryNode) -> Self {
        OperationNode::Select(node)
    }
}

impl From<InsertQueryNode> for OperationNode {
    fn from(node: InsertQueryNode) -> Self {
        OperationNode::Insert(node)
    }
}

impl From<UpdateQueryNode> for OperationNode {
    fn from(node: UpdateQueryNode) -> Self {
        OperationNode::Update(node)
    }
}

impl From<DeleteQueryNode> for OperationNode {
    fn from(node: DeleteQueryNode) -> Self {
        OperationNode::Delete(node)
    }
}

impl From<CreateTableNode> for OperationNode {
    fn from(node: CreateTableNode) -> Self {
        OperationNode::CreateTable(node)
    }
}

impl From<TableNode> for OperationNode {
    fn from(node: TableNode) -> Self {
        OperationNode::Table(node)
    }
}

impl From<FunctionNode> for OperationNode {
    fn from(node: FunctionNode) -> Self {
        OperationNode::Function(node)
    }
}

impl From<RawNode> for OperationNode {
    fn from(node: RawNode) -> Self {
        OperationNode::Raw(node)
    }
}

impl From<ColumnDefinitionNode> for OperationNode {
    fn from(node: ColumnDefinitionNode) -> Self {
        OperationNode::ColumnDefinition(node)
    }
}

impl From<PrimaryKeyConstraintNode> for OperationNode {
    fn from(node: PrimaryKeyConstraintNode) -> Self {
        OperationNode::PrimaryKeyConstraint(node)
    }
}

impl From<UniqueConstraintNode> for OperationNode {
    fn from(node: UniqueConstraintNode) -> Self {
        OperationNode::UniqueConstraint(node)
    }
}

impl From<ForeignKeyConstraintNode> for OperationNode {
    fn from(node: ForeignKeyConstraintNode) -> Self {
        OperationNode::ForeignKeyConstraint(node)
    }
}
