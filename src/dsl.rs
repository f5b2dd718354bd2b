//! crossbench-dsl regeneration: the `Lang` enum, `TokenKind` language
//! variants, keyword dispatch and the parser's token-to-language tables.

use anyhow::Result;

use crate::registry::Registry;
use crate::render::{quoted_alias_pattern, token_pattern};
use crate::workspace::Workspace;

const AST_RS: &str = "crossbench-dsl/src/ast.rs";
const TOKENS_RS: &str = "crossbench-dsl/src/tokens.rs";
const PARSER_RS: &str = "crossbench-dsl/src/parser.rs";

/// Render the `Lang` enum with alias dispatch and canonical reverse dispatch.
///
/// Shared between the DSL ast and the syntax crate's partial ast, which carry
/// the same shape under different doc comments and derives.
pub(crate) fn lang_enum_block(registry: &Registry, doc: &str, derive: &str) -> String {
    let variants: Vec<String> =
        registry.iter().map(|(_, spec)| format!("    {},", spec.rust_enum)).collect();

    let from_str_arms: Vec<String> = registry
        .iter()
        .map(|(_, spec)| {
            format!(
                "            {} => Some(Lang::{}),",
                quoted_alias_pattern(&spec.aliases),
                spec.rust_enum
            )
        })
        .collect();

    let as_str_arms: Vec<String> = registry
        .iter()
        .map(|(_, spec)| {
            format!("            Lang::{} => \"{}\",", spec.rust_enum, spec.primary_alias())
        })
        .collect();

    format!(
        r#"{doc}
{derive}
pub enum Lang {{
{variants}
}}

impl Lang {{
    pub fn from_str(s: &str) -> Option<Self> {{
        match s.to_lowercase().as_str() {{
{from_str}
            _ => None,
        }}
    }}

    pub fn as_str(&self) -> &'static str {{
        match self {{
{as_str}
        }}
    }}
}}"#,
        variants = variants.join("\n"),
        from_str = from_str_arms.join("\n"),
        as_str = as_str_arms.join("\n"),
    )
}

pub fn regenerate_ast(ws: &Workspace, registry: &Registry) -> Result<()> {
    let generated = lang_enum_block(
        registry,
        "/// Supported programming languages",
        "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]",
    );
    ws.edit(AST_RS, |content| {
        ws.patch_markers(
            AST_RS,
            content,
            "// BEGIN-GENERATED: Lang enum (do not edit)\n",
            "\n// END-GENERATED: Lang enum",
            &generated,
            "Lang enum",
        )
    })
}

pub fn regenerate_tokens(ws: &Workspace, registry: &Registry) -> Result<()> {
    let all_tokens: Vec<&str> = registry
        .iter()
        .flat_map(|(_, spec)| spec.token_kinds.iter().map(String::as_str))
        .collect();

    let variants: Vec<String> = all_tokens.iter().map(|t| format!("    {t},")).collect();
    let variants = variants.join("\n");

    let is_lang: Vec<String> = all_tokens.iter().map(|t| format!("TokenKind::{t}")).collect();
    let is_lang = format!("            {}", is_lang.join(" |\n                "));

    // Every alias dispatches to the descriptor's first token kind.
    let keyword_arms: Vec<String> = registry
        .iter()
        .map(|(_, spec)| {
            format!(
                "        {} => Some(TokenKind::{}),",
                quoted_alias_pattern(&spec.aliases),
                spec.token_kinds[0]
            )
        })
        .collect();
    let keyword_arms = keyword_arms.join("\n");

    ws.edit(TOKENS_RS, |content| {
        let content = ws.patch_markers(
            TOKENS_RS,
            content,
            "    // Language keywords (BEGIN-GENERATED: TokenKind lang variants)\n",
            "\n    // END-GENERATED: TokenKind lang variants",
            &variants,
            "TokenKind lang variants",
        )?;
        let content = ws.patch_markers(
            TOKENS_RS,
            &content,
            "            // BEGIN-GENERATED: is_lang tokens\n",
            "\n            // END-GENERATED: is_lang tokens",
            &is_lang,
            "is_lang tokens",
        )?;
        ws.patch_markers(
            TOKENS_RS,
            &content,
            "        // Language keywords (BEGIN-GENERATED: keyword_from_str lang)\n",
            "\n        // END-GENERATED: keyword_from_str lang",
            &keyword_arms,
            "keyword_from_str lang",
        )
    })
}

pub fn regenerate_parser(ws: &Workspace, registry: &Registry) -> Result<()> {
    let all_tokens: Vec<String> = registry
        .iter()
        .flat_map(|(_, spec)| spec.token_kinds.iter())
        .map(|t| format!("TokenKind::{t}"))
        .collect();

    let macro_block = format!(
        "macro_rules! lang_tokens {{\n    () => {{\n        {}\n    }};\n}}",
        all_tokens.join(" |\n        ")
    );

    // One arm per language: all of its token kinds fold into a single case.
    let token_arms: Vec<String> = registry
        .iter()
        .map(|(_, spec)| {
            format!(
                "            {} => Some(Lang::{}),",
                token_pattern(&spec.token_kinds),
                spec.rust_enum
            )
        })
        .collect();
    let token_arms = token_arms.join("\n");

    ws.edit(PARSER_RS, |content| {
        let content = ws.patch_markers(
            PARSER_RS,
            content,
            "// BEGIN-GENERATED: lang_tokens macro (do not edit)\n",
            "\n// END-GENERATED: lang_tokens macro",
            &macro_block,
            "lang_tokens macro",
        )?;
        ws.patch_markers(
            PARSER_RS,
            &content,
            "            // BEGIN-GENERATED: token_to_lang (do not edit)\n",
            "\n            // END-GENERATED: token_to_lang",
            &token_arms,
            "token_to_lang",
        )
    })
}
