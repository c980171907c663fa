//! Generic rendering of DML statements.

pub mod delete;
pub mod insert;
pub mod select;
pub mod update;
