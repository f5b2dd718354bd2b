//! crossbench-grammar regeneration: the `language_tag` choice in grammar.js
//! and the tree-sitter injection queries.

use anyhow::Result;

use crate::registry::{ImportStyle, LanguageSpec, Registry};
use crate::render::injection_predicate;
use crate::workspace::Workspace;

const GRAMMAR_JS: &str = "crossbench-grammar/grammar.js";
const INJECTIONS_SCM: &str = "crossbench-grammar/queries/injections.scm";

pub fn regenerate_grammar_js(ws: &Workspace, registry: &Registry) -> Result<()> {
    let choices: Vec<String> = registry
        .iter()
        .flat_map(|(_, spec)| spec.aliases.iter())
        .map(|a| format!("'{a}'"))
        .collect();

    let rule = format!(
        "    language_tag: $ => choice(\n      {},\n    ),",
        choices.join(",\n      ")
    );

    ws.edit(GRAMMAR_JS, |content| {
        ws.patch_markers(
            GRAMMAR_JS,
            content,
            "    // BEGIN-GENERATED: language_tag choice (do not edit)\n",
            "\n    // END-GENERATED: language_tag choice",
            &rule,
            "language_tag choice",
        )
    })
}

pub fn regenerate_injections(ws: &Workspace, registry: &Registry) -> Result<()> {
    ws.write(INJECTIONS_SCM, &render_injections(registry))
}

/// One injection query against a setup-block section.
fn setup_section_query(section: &str, code_block: &str, pred: &str, set_line: &str) -> String {
    let mut query = format!(
        "(setup_block\n  language: (language_tag) @_lang\n  (setup_body\n    ({section}_section\n      ({code_block}\n        (embedded_code) @injection.content)))\n  {pred}\n"
    );
    if !set_line.is_empty() {
        query.push_str(set_line);
        query.push('\n');
    }
    query.push(')');
    query
}

/// One injection query against a flat node carrying a code block.
fn flat_query(node: &str, inner: &str, pred: &str, set_line: &str) -> String {
    let mut query = format!(
        "({node}\n  language: (language_tag) @_lang\n  {inner}\n  {pred}\n"
    );
    if !set_line.is_empty() {
        query.push_str(set_line);
        query.push('\n');
    }
    query.push(')');
    query
}

fn set_injection_line(spec: &LanguageSpec) -> String {
    // #set! is only needed when the injection id differs from what the alias
    // already names (python, csharp).
    if spec.tree_sitter_injection == spec.primary_alias() {
        String::new()
    } else {
        format!("  (#set! injection.language \"{}\")", spec.tree_sitter_injection)
    }
}

fn render_injections(registry: &Registry) -> String {
    let mut out = String::new();
    out.push_str("; Injection queries for embedded languages in crossbench\n");
    out.push_str("; These queries identify code blocks and inject the appropriate language parser\n\n");

    for (_, spec) in registry.iter() {
        let pred = injection_predicate(&spec.aliases);
        let set_line = set_injection_line(spec);
        let import_block = match spec.import_style {
            ImportStyle::Paren => "paren_code_block",
            ImportStyle::Brace => "code_block",
        };

        out.push_str("; ============================================================\n");
        out.push_str(&format!("; {} injections\n", spec.rust_enum));
        out.push_str("; ============================================================\n\n");

        out.push_str(&format!("; Setup block with {} language\n", spec.rust_enum));
        for (section, block) in [
            ("import", import_block),
            ("declare", "code_block"),
            ("init", "code_block"),
            ("helpers", "code_block"),
        ] {
            out.push_str(&setup_section_query(section, block, &pred, &set_line));
            out.push_str("\n\n");
        }

        out.push_str(&format!("; Language implementation with {}\n", spec.rust_enum));
        out.push_str(&flat_query(
            "language_implementation",
            "(code_block\n    (embedded_code) @injection.content)",
            &pred,
            &set_line,
        ));
        out.push_str("\n\n");

        out.push_str(&format!("; Hook with {}\n", spec.rust_enum));
        out.push_str(&flat_query(
            "hook_flat",
            "(code_block\n    (embedded_code) @injection.content)",
            &pred,
            &set_line,
        ));
        out.push_str("\n\n");
    }

    out.push_str("; ============================================================\n");
    out.push_str("; Inline code injections (single-line expressions)\n");
    out.push_str("; ============================================================\n\n");

    for (_, spec) in registry.iter() {
        let pred = injection_predicate(&spec.aliases);
        out.push_str(&format!("; {} inline code\n", spec.rust_enum));
        out.push_str(&flat_query(
            "language_implementation",
            "(inline_code) @injection.content",
            &pred,
            // Inline expressions always set the injection language explicitly.
            &format!("  (#set! injection.language \"{}\")", spec.tree_sitter_injection),
        ));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    const SAMPLE: &str = r#"
[languages.go]
rust_enum = "Go"
aliases = ["go"]
token_kinds = ["Go"]
vscode_scope = "go"
tree_sitter_injection = "go"
import_style = "paren"

[languages.python]
rust_enum = "Python"
aliases = ["python", "py"]
token_kinds = ["Python"]
vscode_scope = "python"
tree_sitter_injection = "python"
"#;

    #[test]
    fn grammar_choice_flattens_aliases_in_order() {
        let registry = Registry::from_toml(SAMPLE);
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("crossbench-grammar")).unwrap();
        std::fs::write(
            dir.path().join("crossbench-grammar/grammar.js"),
            "module.exports = grammar({\n  rules: {\n    // BEGIN-GENERATED: language_tag choice (do not edit)\nstale\n    // END-GENERATED: language_tag choice\n  },\n});\n",
        )
        .unwrap();

        let ws = Workspace::new(dir.path().to_path_buf(), false, false);
        regenerate_grammar_js(&ws, &registry).unwrap();

        let patched =
            std::fs::read_to_string(dir.path().join("crossbench-grammar/grammar.js")).unwrap();
        assert!(patched.contains("'go',\n      'python',\n      'py',"), "{patched}");
    }

    #[test]
    fn injections_branch_on_import_style_and_predicate_arity() {
        let registry = Registry::from_toml(SAMPLE);
        let scm = render_injections(&registry);

        // Go imports live in a paren block; python stays brace-delimited.
        assert!(scm.contains("(import_section\n      (paren_code_block"), "{scm}");
        assert_eq!(scm.matches("paren_code_block").count(), 1, "{scm}");

        assert!(scm.contains("(#eq? @_lang \"go\")"), "{scm}");
        assert!(scm.contains("(#any-of? @_lang \"python\" \"py\")"), "{scm}");
    }

    #[test]
    fn set_injection_only_when_id_differs_from_primary_alias() {
        let registry = Registry::from_toml(
            r#"
[languages.typescript]
rust_enum = "TypeScript"
aliases = ["ts", "typescript"]
token_kinds = ["Ts"]
vscode_scope = "ts"
tree_sitter_injection = "typescript"
"#,
        );
        let scm = render_injections(&registry);
        // Primary alias is "ts" but the parser id is "typescript": setup
        // queries need an explicit #set!.
        assert!(
            scm.contains("(#any-of? @_lang \"ts\" \"typescript\")\n  (#set! injection.language \"typescript\")"),
            "{scm}"
        );
    }

    #[test]
    fn queries_are_balanced() {
        let registry = Registry::from_toml(SAMPLE);
        let scm = render_injections(&registry);
        let opens = scm.matches('(').count();
        let closes = scm.matches(')').count();
        assert_eq!(opens, closes, "unbalanced query file:\n{scm}");
    }
}
