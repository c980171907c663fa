//! Text-level rewriting of raw SQL fragments.
//!
//! Raw nodes carry caller-written SQL split around parameter slots, so
//! dialect differences inside them cannot be fixed structurally. The rules
//! here are pattern based and only understand flat calls: nested calls and
//! non-literal arguments (beyond the single two-fragment shape handled by
//! [`translate`]) are left alone.
//!
//! The output is an ordered list of [`RawPiece`]s. Every input parameter
//! appears exactly once, so the placeholder count always matches the
//! parameter count even when emission order changes.

use regex::Regex;
use std::sync::LazyLock;

static NOW_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNOW\(\s*\)").expect("NOW regex"));

static DATE_FORMAT_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDATE_FORMAT(\s*\()").expect("DATE_FORMAT regex"));

/// `DATE_FORMAT(<value>, '<format>')` with both arguments inside one fragment.
/// The format may be single or double quoted.
static DATE_FORMAT_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bDATE_FORMAT\s*\(\s*(?P<value>[^,()]+?)\s*,\s*(?P<format>'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*")\s*\)"#)
        .expect("DATE_FORMAT literal regex")
});

/// Call opener at the very end of a fragment: the value is the next parameter.
static DATE_FORMAT_OPEN_AT_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bDATE_FORMAT\s*\(\s*$").expect("DATE_FORMAT tail regex"));

/// `, '<format>')` at the start of the fragment following a parameter.
static FORMAT_ARG_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*,\s*(?P<format>'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*")\s*\)"#)
        .expect("format argument regex")
});

/// One unit of translated raw SQL.
#[derive(Debug, PartialEq)]
pub enum RawPiece<'a, P> {
    Text(String),
    Param(&'a P),
}

/// Translate raw fragments and decide the emission order of parameters.
pub fn translate<'a, P>(fragments: &[String], params: &'a [P]) -> Vec<RawPiece<'a, P>> {
    let fragments: Vec<String> = fragments
        .iter()
        .map(|f| NOW_CALL.replace_all(f, "CURRENT_TIMESTAMP()").into_owned())
        .collect();

    if !fragments.iter().any(|f| DATE_FORMAT_CALL.is_match(f)) {
        return interleave(fragments, params);
    }

    if let Some(pieces) = swap_parameter_argument(&fragments, params) {
        return pieces;
    }

    let fragments = fragments.iter().map(|f| rewrite_date_format(f)).collect();
    interleave(fragments, params)
}

/// Swap literal arguments in place, then rename any call still unresolved.
fn rewrite_date_format(fragment: &str) -> String {
    let swapped = DATE_FORMAT_LITERAL.replace_all(fragment, "FORMAT_TIMESTAMP(${format}, ${value})");
    DATE_FORMAT_CALL
        .replace_all(&swapped, "FORMAT_TIMESTAMP${1}")
        .into_owned()
}

/// `["... DATE_FORMAT(", ", '<fmt>') ..."]` around a single parameter becomes
/// `... FORMAT_TIMESTAMP('<fmt>', <param>) ...`.
fn swap_parameter_argument<'a, P>(
    fragments: &[String],
    params: &'a [P],
) -> Option<Vec<RawPiece<'a, P>>> {
    let ([head, tail], [param]) = (fragments, params) else {
        return None;
    };
    if !DATE_FORMAT_OPEN_AT_END.is_match(head) {
        return None;
    }
    let caps = FORMAT_ARG_PREFIX.captures(tail)?;
    let format = caps.name("format")?.as_str();
    let rest = &tail[caps.get(0)?.end()..];

    tracing::trace!(format, "reordering DATE_FORMAT arguments around parameter");

    let mut pieces = Vec::with_capacity(4);
    pieces.push(RawPiece::Text(rewrite_date_format(head)));
    pieces.push(RawPiece::Text(format!("{}, ", format)));
    pieces.push(RawPiece::Param(param));
    pieces.push(RawPiece::Text(format!("){}", rewrite_date_format(rest))));
    Some(pieces)
}

/// Strict left-to-right alternation; empty fragments are skipped and
/// surplus parameters follow the last fragment.
fn interleave<P>(fragments: Vec<String>, params: &[P]) -> Vec<RawPiece<'_, P>> {
    let mut pieces = Vec::with_capacity(fragments.len() + params.len());
    let mut params_iter = params.iter();
    for fragment in fragments {
        if !fragment.is_empty() {
            pieces.push(RawPiece::Text(fragment));
        }
        if let Some(param) = params_iter.next() {
            pieces.push(RawPiece::Param(param));
        }
    }
    pieces.extend(params_iter.map(RawPiece::Param));
    pieces
}
