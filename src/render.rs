//! Shared snippet rendering helpers.
//!
//! Pure string builders used by every artifact generator. Alias order always
//! follows the registry; the first alias is the canonical representative.

use crate::registry::Registry;

/// Match pattern over quoted aliases: `"go"` or `"ts" | "typescript"`.
pub fn quoted_alias_pattern(aliases: &[String]) -> String {
    aliases
        .iter()
        .map(|a| format!("\"{a}\""))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Match pattern over token kinds: `TokenKind::Ts | TokenKind::TypeScript`.
pub fn token_pattern(token_kinds: &[String]) -> String {
    token_kinds
        .iter()
        .map(|t| format!("TokenKind::{t}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Regex capture group for a language's aliases: `(go)` or `(ts|typescript)`.
pub fn alias_regex_group(aliases: &[String]) -> String {
    let escaped: Vec<String> = aliases.iter().map(|a| regex::escape(a)).collect();
    format!("({})", escaped.join("|"))
}

/// Alternation of every alias of every language, in registry order.
pub fn alias_alternation(registry: &Registry) -> String {
    registry
        .iter()
        .flat_map(|(_, spec)| spec.aliases.iter())
        .map(|a| regex::escape(a))
        .collect::<Vec<_>>()
        .join("|")
}

/// Tree-sitter injection predicate: `#eq?` for one alias, `#any-of?` for several.
pub fn injection_predicate(aliases: &[String]) -> String {
    if aliases.len() == 1 {
        format!("(#eq? @_lang \"{}\")", aliases[0])
    } else {
        let quoted: Vec<String> = aliases.iter().map(|a| format!("\"{a}\"")).collect();
        format!("(#any-of? @_lang {})", quoted.join(" "))
    }
}
