//! JSON column registry.
//!
//! Records which columns of which tables hold structured data stored as
//! encoded text. Consulted when binding INSERT/UPDATE parameters and when
//! decoding result rows.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::Config;

/// Qualified table name to JSON-bearing column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonColumnRegistry {
    tables: BTreeMap<String, BTreeSet<String>>,
    /// Union of every table's columns, used to decode rows.
    all_columns: BTreeSet<String>,
}

impl JsonColumnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[json_columns]` table of a config.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();
        for (table, columns) in &config.json_columns {
            registry.register(table, columns.iter().map(String::as_str));
        }
        tracing::debug!(
            tables = registry.tables.len(),
            columns = registry.all_columns.len(),
            "built JSON column registry"
        );
        registry
    }

    /// Set the JSON columns of `table`, replacing any earlier set.
    pub fn register<'a>(&mut self, table: &str, columns: impl IntoIterator<Item = &'a str>) {
        let columns = columns.into_iter().map(str::to_string).collect();
        self.tables.insert(table.to_string(), columns);
        self.all_columns = self.tables.values().flatten().cloned().collect();
    }

    /// Whether `column` of `table` holds encoded JSON.
    ///
    /// The table must match exactly; an `alias.column` reference is matched
    /// by its bare column name.
    pub fn is_json_column(&self, table: &str, column: &str) -> bool {
        let column = column.rsplit_once('.').map_or(column, |(_, bare)| bare);
        self.tables
            .get(table)
            .is_some_and(|columns| columns.contains(column))
    }

    /// JSON column names across all tables.
    pub fn json_column_names(&self) -> &BTreeSet<String> {
        &self.all_columns
    }

    pub fn is_empty(&self) -> bool {
        self.all_columns.is_empty()
    }

    /// Registered table names.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.tables.iter().map(|(table, columns)| (table.as_str(), columns))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> JsonColumnRegistry {
        let mut registry = JsonColumnRegistry::new();
        registry.register("analytics.events", ["payload", "tags"]);
        registry.register("app.users", ["metadata"]);
        registry
    }

    #[test]
    fn test_exact_table_match() {
        let registry = registry();
        assert!(registry.is_json_column("analytics.events", "payload"));
        assert!(registry.is_json_column("app.users", "metadata"));
        assert!(!registry.is_json_column("events", "payload"));
        assert!(!registry.is_json_column("app.users", "payload"));
    }

    #[test]
    fn test_alias_prefix_is_ignored() {
        let registry = registry();
        assert!(registry.is_json_column("app.users", "u.metadata"));
    }

    #[test]
    fn test_global_column_set() {
        let registry = registry();
        let names: Vec<&str> = registry
            .json_column_names()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["metadata", "payload", "tags"]);
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = registry();
        registry.register("analytics.events", ["attributes"]);
        assert!(!registry.is_json_column("analytics.events", "payload"));
        assert!(registry.is_json_column("analytics.events", "attributes"));
        assert!(!registry.json_column_names().contains("payload"));
    }

    #[test]
    fn test_register_is_idempotent() {
        let once = registry();
        let mut twice = registry();
        twice.register("analytics.events", ["payload", "tags"]);
        twice.register("app.users", ["metadata"]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_from_config() {
        let config = Config::default().json_table("app.users", ["metadata", "prefs"]);
        let registry = JsonColumnRegistry::from_config(&config);
        assert!(registry.is_json_column("app.users", "prefs"));
        assert!(!registry.is_empty());
        assert!(JsonColumnRegistry::from_config(&Config::default()).is_empty());
    }
}
