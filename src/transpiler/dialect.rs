use crate::ast::OperationNode;
use crate::transpiler::bigquery::BigQueryCompiler;
use crate::transpiler::traits::{GenericCompiler, QueryCompiler};
use crate::transpiler::{CompiledQuery, compile_query};

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Neutral rendering: double-quoted identifiers, `$n` placeholders.
    Generic,
    #[default]
    BigQuery,
}

impl Dialect {
    pub fn compiler(&self) -> Box<dyn QueryCompiler> {
        match self {
            Dialect::Generic => Box::new(GenericCompiler::new()),
            Dialect::BigQuery => Box::new(BigQueryCompiler::new()),
        }
    }

    pub fn compile(&self, node: &OperationNode) -> CompiledQuery {
        let mut compiler = self.compiler();
        compile_query(compiler.as_mut(), node)
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generic" => Ok(Dialect::Generic),
            "bigquery" | "bq" => Ok(Dialect::BigQuery),
            other => Err(format!("unknown dialect '{}'", other)),
        }
    }
}
