//! BigQuery dialect rewrites.

use pretty_assertions::assert_eq;

use crate::ast::builders::*;
use crate::ast::*;
use crate::transpiler::{
    BigQueryCompiler, CompiledQuery, Dialect, ToSql, compile_query, count_placeholders,
};

fn bq(node: impl ToSql) -> CompiledQuery {
    node.compile()
}

#[test]
fn test_default_dialect_is_bigquery() {
    assert_eq!(Dialect::default(), Dialect::BigQuery);
    let sql = SelectQueryNode::from_table("users").column(col("id")).to_sql();
    assert_eq!(sql, "select `id` from `users`");
}

#[test]
fn test_placeholders_are_question_marks() {
    let compiled = bq(SelectQueryNode::from_table("users")
        .filter(eq(col("id"), val(1)))
        .limit(10));
    assert_eq!(compiled.sql, "select * from `users` where `id` = ? limit ?");
    assert_eq!(compiled.parameters, vec![Value::Int(1), Value::Int(10)]);
}

#[test]
fn test_union_becomes_union_distinct() {
    let query = SelectQueryNode::from_table("a")
        .column(col("id"))
        .union(SelectQueryNode::from_table("b").column(col("id")));
    assert_eq!(
        bq(query).sql,
        "select `id` from `a` union distinct select `id` from `b`"
    );
}

#[test]
fn test_union_all_untouched() {
    let query = SelectQueryNode::from_table("a")
        .column(col("id"))
        .union_all(SelectQueryNode::from_table("b").column(col("id")));
    let sql = bq(query).sql;
    assert_eq!(sql, "select `id` from `a` union all select `id` from `b`");
    assert!(!sql.contains("distinct"));
}

#[test]
fn test_other_set_operators_untouched() {
    let query = SelectQueryNode::from_table("a").set_operation(
        SetOperator::Except,
        SelectQueryNode::from_table("b"),
        false,
    );
    assert_eq!(bq(query).sql, "select * from `a` except select * from `b`");
}

#[test]
fn test_length_becomes_char_length() {
    let query = SelectQueryNode::from_table("users").column(alias(func("length", [col("name")]), "n"));
    let sql = bq(query).sql;
    assert_eq!(sql, "select CHAR_LENGTH(`name`) as `n` from `users`");
    assert!(!sql.replace("CHAR_LENGTH(", "").contains("LENGTH("));
}

#[test]
fn test_now_always_has_parentheses() {
    let query = SelectQueryNode::from_table("t").column(func("NOW", []));
    assert_eq!(bq(query).sql, "select CURRENT_TIMESTAMP() from `t`");
}

#[test]
fn test_date_format_arguments_swapped() {
    let query = SelectQueryNode::from_table("events")
        .column(func("date_format", [col("created_at"), val("%Y-%m")]));
    let compiled = bq(query);
    assert_eq!(
        compiled.sql,
        "select FORMAT_TIMESTAMP(?, `created_at`) from `events`"
    );
    assert_eq!(compiled.parameters, vec![Value::String("%Y-%m".to_string())]);
}

#[test]
fn test_swapped_arguments_keep_parameter_order() {
    let query = SelectQueryNode::from_table("events").column(func(
        "DATE_FORMAT",
        [val("2024-01-01"), val("%Y"), val("extra")],
    ));
    let compiled = bq(query);
    assert_eq!(compiled.sql, "select FORMAT_TIMESTAMP(?, ?, ?) from `events`");
    assert_eq!(
        compiled.parameters,
        vec![
            Value::String("%Y".to_string()),
            Value::String("2024-01-01".to_string()),
            Value::String("extra".to_string()),
        ]
    );
}

#[test]
fn test_unmapped_function_keeps_casing() {
    let query = SelectQueryNode::from_table("t").column(func("coalesce", [col("a"), val(0)]));
    assert_eq!(bq(query).sql, "select coalesce(`a`, ?) from `t`");
}

#[test]
fn test_update_without_where_gets_guard() {
    let compiled = bq(UpdateQueryNode::table("app.users").set("name", "x"));
    assert_eq!(compiled.sql, "update `app`.`users` set `name` = ? where true");
}

#[test]
fn test_update_with_where_has_no_guard() {
    let compiled = bq(UpdateQueryNode::table("users")
        .set("name", "x")
        .filter(eq(col("id"), val(1))));
    assert_eq!(compiled.sql, "update `users` set `name` = ? where `id` = ?");
    assert!(!compiled.sql.contains("where true"));
}

#[test]
fn test_delete_without_where_gets_guard() {
    let compiled = bq(DeleteQueryNode::from_table("users"));
    assert_eq!(compiled.sql, "delete from `users` where true");
    assert!(compiled.sql.ends_with(" where true"));
}

#[test]
fn test_delete_with_where_has_no_guard() {
    let compiled = bq(DeleteQueryNode::from_table("users").filter(eq(col("id"), val(1))));
    assert_eq!(compiled.sql, "delete from `users` where `id` = ?");
}

#[test]
fn test_project_dataset_qualifier_split() {
    let query = SelectQueryNode::from_table("my-project.analytics.events");
    assert_eq!(
        bq(query).sql,
        "select * from `my-project`.`analytics`.`events`"
    );
}

#[test]
fn test_dataset_only_qualifier() {
    let query = SelectQueryNode::from_table("analytics.events").column(col("e.id"));
    assert_eq!(bq(query).sql, "select `e`.`id` from `analytics`.`events`");
}

#[test]
fn test_ambiguous_qualifier_falls_back() {
    let query = SelectQueryNode::from_table("a.b.c.d");
    assert_eq!(bq(query).sql, "select * from `a.b.c`.`d`");
}

#[test]
fn test_table_constraints_not_enforced() {
    let query = CreateTableNode::new("analytics.users")
        .column(ColumnDefinitionNode::new("id", "INT64"))
        .column(ColumnDefinitionNode::new("org_id", "INT64"))
        .constraint(PrimaryKeyConstraintNode {
            name: Some("pk_users".to_string()),
            columns: vec!["id".to_string()],
        })
        .constraint(ForeignKeyConstraintNode {
            name: None,
            columns: vec!["org_id".to_string()],
            references: ReferencesNode {
                table: TableNode::parse("analytics.orgs"),
                columns: vec!["id".to_string()],
                on_delete: Some(OnModifyAction::Cascade),
                on_update: None,
            },
        });
    assert_eq!(
        bq(query).sql,
        "create table `analytics`.`users` (`id` INT64, `org_id` INT64, \
         constraint `pk_users` primary key (`id`) not enforced, \
         foreign key (`org_id`) references `analytics`.`orgs` (`id`) on delete cascade not enforced)"
    );
}

#[test]
fn test_unique_constraint_node_ends_not_enforced() {
    let node: OperationNode = UniqueConstraintNode {
        name: None,
        columns: vec!["email".to_string()],
    }
    .into();
    let sql = bq(node).sql;
    assert_eq!(sql, "unique (`email`) not enforced");
}

#[test]
fn test_inline_column_markers_not_enforced() {
    let query = CreateTableNode::new("users")
        .column(ColumnDefinitionNode::new("id", "INT64").primary_key())
        .column(ColumnDefinitionNode::new("email", "STRING").unique().not_null())
        .column(ColumnDefinitionNode::new("org_id", "INT64").references("orgs", "id"))
        .column(ColumnDefinitionNode::new("name", "STRING"));
    let sql = bq(query).sql;
    assert_eq!(
        sql,
        "create table `users` (`id` INT64 primary key not enforced, \
         `email` STRING unique not null not enforced, \
         `org_id` INT64 references `orgs` (`id`) not enforced, \
         `name` STRING)"
    );
    assert_eq!(sql.matches("not enforced").count(), 3);
}

#[test]
fn test_column_definition_node_alone() {
    let node: OperationNode = ColumnDefinitionNode::new("id", "INT64").primary_key().into();
    assert!(bq(node).sql.ends_with("not enforced"));
}

#[test]
fn test_raw_fragments_translated() {
    let node = raw(
        [
            "select DATE_FORMAT(created_at, '%Y-%m-%d') as day, NOW() as ts from events where id = ",
            "",
        ],
        [val(5)],
    );
    let compiled = bq(node);
    assert_eq!(
        compiled.sql,
        "select FORMAT_TIMESTAMP('%Y-%m-%d', created_at) as day, CURRENT_TIMESTAMP() as ts from events where id = ?"
    );
    assert_eq!(compiled.parameters, vec![Value::Int(5)]);
}

#[test]
fn test_raw_inside_structured_query() {
    let query = SelectQueryNode::from_table("t")
        .filter(raw(["created_at < now() and id = ", ""], [val(1)]));
    assert_eq!(
        bq(query).sql,
        "select * from `t` where created_at < CURRENT_TIMESTAMP() and id = ?"
    );
}

#[test]
fn test_raw_parameter_argument_reordered() {
    let node = raw(["select DATE_FORMAT(", ", '%Y') as y"], [val("2024-05-01")]);
    let compiled = bq(node);
    assert_eq!(compiled.sql, "select FORMAT_TIMESTAMP('%Y', ?) as y");
    assert_eq!(compiled.parameters.len(), 1);
}

#[test]
fn test_raw_parameter_can_be_a_node() {
    let node = raw(["select ", " from t"], [func("length", [col("name")])]);
    assert_eq!(bq(node).sql, "select CHAR_LENGTH(`name`) from t");
}

#[test]
fn test_large_integers_pass_through() {
    let compiled = bq(SelectQueryNode::from_table("t").filter(eq(col("id"), val(9_007_199_254_740_993i64))));
    assert_eq!(compiled.parameters, vec![Value::Int(9_007_199_254_740_993)]);
}

#[test]
fn test_compiler_is_reusable() {
    let mut compiler = BigQueryCompiler::new();
    let first = compile_query(&mut compiler, &DeleteQueryNode::from_table("a").into());
    let second = compile_query(&mut compiler, &DeleteQueryNode::from_table("b").into());
    assert_eq!(first.sql, "delete from `a` where true");
    assert_eq!(second.sql, "delete from `b` where true");
    assert!(second.parameters.is_empty());
}

#[test]
fn test_placeholder_count_matches_parameters() {
    let trees: Vec<OperationNode> = vec![
        SelectQueryNode::from_table("t")
            .column(func("DATE_FORMAT", [col("ts"), val("%Y")]))
            .filter(binary(col("id"), "in", list([1, 2, 3])))
            .union(SelectQueryNode::from_table("u").filter(eq(col("x"), val("?"))))
            .limit(3)
            .into(),
        InsertQueryNode::into_table("p.d.t")
            .columns(["a", "b"])
            .values([Value::Null, Value::from("x")])
            .into(),
        UpdateQueryNode::table("t")
            .set("a", 1)
            .set_expr("b", raw(["coalesce(", ", 0)"], [val(2)]))
            .into(),
        raw(["select DATE_FORMAT(", ", '%Y')"], [val("2024-01-01")]),
        raw(["select ", ", ", ""], [val(1), val(2), val(3), val(4)]),
    ];
    for tree in trees {
        let compiled = bq(tree);
        assert_eq!(
            count_placeholders(&compiled.sql),
            compiled.parameters.len(),
            "{}",
            compiled.sql
        );
    }
}

#[test]
fn test_count_placeholders_skips_quoted_text() {
    assert_eq!(count_placeholders("a = ? and b = '?' and `c?` = ?"), 2);
    assert_eq!(count_placeholders("x = 'it\\'s?' and y = ?"), 1);
    assert_eq!(count_placeholders("no params"), 0);
}
