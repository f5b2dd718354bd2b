//! VS Code extension regeneration: the TextMate grammar's per-language block
//! definitions and include lists, and the package.json embedded-language map.
//!
//! These artifacts are JSON documents, so they are edited structurally rather
//! than textually: parse, merge generated keys into the repository, splice
//! generated entries into include lists at their anchor, rebuild the two
//! hook-rule regexes, and re-serialize. serde_json's preserve_order keeps the
//! document stable across runs.

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

use crate::registry::{ImportStyle, LanguageSpec, Registry};
use crate::render::{alias_alternation, alias_regex_group};
use crate::workspace::Workspace;

const TMLANGUAGE_JSON: &str = "extensions/vscode/syntaxes/crossbench.tmLanguage.json";
const PACKAGE_JSON: &str = "extensions/vscode/package.json";

/// The two hook rules, as structured fields: keyword group plus a language
/// alternation rebuilt from the registry. Recognition goes through the
/// keyword group, never through any previously generated language token.
const HOOK_RULES: &[&str] = &["skip|validate", "before|after|each"];

fn content_name(spec: &LanguageSpec) -> String {
    format!("source.{}.embedded.bench", spec.embedded_lang())
}

fn source_include(spec: &LanguageSpec) -> Value {
    json!({ "include": format!("source.{}", spec.vscode_scope) })
}

/// `setup-X-block` and its sub-blocks for one language.
fn setup_blocks(spec: &LanguageSpec) -> Map<String, Value> {
    let name = spec.primary_alias();
    let lang_regex = alias_regex_group(&spec.aliases);
    let content = content_name(spec);

    let mut blocks = Map::new();

    let import_block = match spec.import_style {
        ImportStyle::Paren => json!({
            "name": format!("meta.block.import.{name}.bench"),
            "begin": "^(\\s*)(import)\\s*(\\()",
            "end": "^\\1\\)",
            "beginCaptures": {
                "2": { "name": "keyword.control.setup.bench" },
                "3": { "name": "punctuation.definition.block.begin.bench" }
            },
            "endCaptures": { "0": { "name": "punctuation.definition.block.end.bench" } },
            "patterns": [source_include(spec)]
        }),
        ImportStyle::Brace => json!({
            "name": format!("meta.block.import.{name}.bench"),
            "contentName": content,
            "begin": "^(\\s*)(import)\\s*\\{",
            "end": "^\\1\\}",
            "beginCaptures": { "2": { "name": "keyword.control.setup.bench" } },
            "endCaptures": { "0": { "name": "punctuation.definition.block.end.bench" } },
            "patterns": [source_include(spec)]
        }),
    };
    blocks.insert(format!("setup-import-{name}-block"), import_block);

    for section in ["declare", "init", "helpers"] {
        blocks.insert(
            format!("setup-{section}-{name}-block"),
            json!({
                "name": format!("meta.block.{section}.{name}.bench"),
                "contentName": content,
                "begin": format!("^(\\s*)({section})\\s*\\{{"),
                "end": "^\\1\\}",
                "beginCaptures": { "2": { "name": "keyword.control.setup.bench" } },
                "endCaptures": { "0": { "name": "punctuation.definition.block.end.bench" } },
                "patterns": [source_include(spec)]
            }),
        );
    }

    if spec.has_use_block {
        blocks.insert(
            format!("setup-use-{name}-block"),
            json!({
                "name": format!("meta.block.use.{name}.bench"),
                "begin": "^(\\s*)(use)\\s+",
                "end": ";",
                "beginCaptures": { "2": { "name": "keyword.control.setup.bench" } },
                "patterns": [source_include(spec)]
            }),
        );
    }

    let mut sub_blocks = vec![
        format!("#setup-import-{name}-block"),
        format!("#setup-declare-{name}-block"),
    ];
    if spec.has_use_block {
        sub_blocks.push(format!("#setup-use-{name}-block"));
    }
    sub_blocks.push(format!("#setup-init-{name}-block"));
    sub_blocks.push(format!("#setup-helpers-{name}-block"));
    sub_blocks.push("#comment".to_string());

    blocks.insert(
        format!("setup-{name}-block"),
        json!({
            "name": format!("meta.block.setup.{name}.bench"),
            "begin": format!("^(\\s*)(setup)\\s+{lang_regex}\\s*\\{{\\s*$"),
            "end": "^\\1\\}\\s*$",
            "beginCaptures": {
                "2": { "name": "keyword.control.bench" },
                "3": { "name": "entity.name.language.bench" }
            },
            "endCaptures": { "0": { "name": "punctuation.definition.block.end.bench" } },
            "patterns": sub_blocks.iter().map(|inc| json!({ "include": inc })).collect::<Vec<_>>()
        }),
    );

    blocks
}

/// `fixture-X-block`, `bench-X-block` and `bench-X-line` for one language.
fn fixture_bench_blocks(spec: &LanguageSpec) -> Map<String, Value> {
    let name = spec.primary_alias();
    let lang_regex = alias_regex_group(&spec.aliases);
    let content = content_name(spec);

    let block = |kind: &str| {
        json!({
            "name": format!("meta.block.{kind}.{name}.bench"),
            "begin": format!("\\b{lang_regex}\\s*:\\s*\\{{\\s*$"),
            "end": "^\\s{0,12}\\}\\s*$",
            "beginCaptures": { "1": { "name": "entity.name.language.bench" } },
            "endCaptures": { "0": { "name": "punctuation.definition.block.end.bench" } },
            "contentName": content,
            "patterns": [source_include(spec)]
        })
    };

    let mut blocks = Map::new();
    blocks.insert(format!("fixture-{name}-block"), block("fixture"));
    blocks.insert(format!("bench-{name}-block"), block("bench"));
    blocks.insert(
        format!("bench-{name}-line"),
        json!({
            "name": format!("meta.expression.{name}.bench"),
            "begin": format!("\\b{lang_regex}\\s*:\\s*"),
            "end": "$",
            "beginCaptures": { "1": { "name": "entity.name.language.bench" } },
            "contentName": content,
            "patterns": [source_include(spec)]
        }),
    );
    blocks
}

/// Remove every include recognized as generated, then reinsert `replacement`
/// immediately after the anchor entry. Hand-written neighbors keep their
/// relative order.
fn splice_includes(
    patterns: &mut Vec<Value>,
    anchor: &str,
    replacement: &[Value],
    is_generated: impl Fn(&str) -> bool,
) {
    let mut spliced = Vec::with_capacity(patterns.len() + replacement.len());
    for pattern in patterns.drain(..) {
        let include = pattern.get("include").and_then(Value::as_str).unwrap_or_default();
        if is_generated(include) {
            continue;
        }
        let is_anchor = include == anchor;
        spliced.push(pattern);
        if is_anchor {
            spliced.extend(replacement.iter().cloned());
        }
    }
    *patterns = spliced;
}

fn include_list(registry: &Registry, fmt: impl Fn(&str) -> String) -> Vec<Value> {
    registry.iter().map(|(_, spec)| json!({ "include": fmt(spec.primary_alias()) })).collect()
}

fn patterns_of<'a>(repo: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Vec<Value>> {
    repo.get_mut(key)?.get_mut("patterns")?.as_array_mut()
}

pub fn regenerate_tmlanguage(ws: &Workspace, registry: &Registry) -> Result<()> {
    ws.edit(TMLANGUAGE_JSON, |content| {
        let mut doc: Value =
            serde_json::from_str(content).with_context(|| format!("Failed to parse {TMLANGUAGE_JSON}"))?;

        let repo = doc
            .get_mut("repository")
            .and_then(Value::as_object_mut)
            .context("tmLanguage has no repository object")?;

        // Add-or-overwrite the per-language block definitions. Keys for
        // languages removed from the registry are left behind.
        for (_, spec) in registry.iter() {
            for (key, value) in setup_blocks(spec) {
                repo.insert(key, value);
            }
            for (key, value) in fixture_bench_blocks(spec) {
                repo.insert(key, value);
            }
        }

        let setup_includes = include_list(registry, |name| format!("#setup-{name}-block"));
        if let Some(patterns) = patterns_of(repo, "suite-block") {
            splice_includes(patterns, "#suite-global-setup-block", &setup_includes, |inc| {
                inc.starts_with("#setup-") && inc.ends_with("-block")
            });
        }

        let fixture_includes = include_list(registry, |name| format!("#fixture-{name}-block"));
        if let Some(patterns) = patterns_of(repo, "fixture-block") {
            splice_includes(patterns, "#fixture-attributes", &fixture_includes, |inc| {
                inc.starts_with("#fixture-") && inc.ends_with("-block") && inc != "#fixture-block"
            });
        }

        let mut bench_includes = include_list(registry, |name| format!("#bench-{name}-block"));
        bench_includes.extend(include_list(registry, |name| format!("#bench-{name}-line")));
        if let Some(patterns) = patterns_of(repo, "bench-block") {
            splice_includes(patterns, "#bench-hooks", &bench_includes, |inc| {
                inc.starts_with("#bench-")
                    && (inc.ends_with("-block") || inc.ends_with("-line"))
                    && !matches!(inc, "#bench-block" | "#bench-attributes" | "#bench-hooks")
            });
        }

        let alternation = alias_alternation(registry);
        if let Some(patterns) = patterns_of(repo, "bench-hooks") {
            rewrite_hook_rules(patterns, &alternation);
        }

        let mut rendered = serde_json::to_string_pretty(&doc)?;
        rendered.push('\n');
        Ok(rendered)
    })
}

/// Regenerate the alternation clause of the two hook-rule regexes, leaving
/// every other field of the rule untouched.
fn rewrite_hook_rules(patterns: &mut [Value], alternation: &str) {
    for pattern in patterns.iter_mut() {
        let Some(current) = pattern.get("match").and_then(Value::as_str) else {
            continue;
        };
        for keywords in HOOK_RULES {
            if current.contains(&format!("({keywords})")) {
                pattern["match"] =
                    Value::String(format!("\\b({keywords})\\s+({alternation})\\s*:"));
                break;
            }
        }
    }
}

pub fn regenerate_package_json(ws: &Workspace, registry: &Registry) -> Result<()> {
    ws.edit(PACKAGE_JSON, |content| {
        let mut doc: Value =
            serde_json::from_str(content).with_context(|| format!("Failed to parse {PACKAGE_JSON}"))?;

        let grammars = doc
            .get_mut("contributes")
            .and_then(|c| c.get_mut("grammars"))
            .and_then(Value::as_array_mut)
            .context("package.json has no contributes.grammars")?;

        for grammar in grammars.iter_mut() {
            let is_bench = grammar.get("scopeName").and_then(Value::as_str) == Some("source.bench");
            if !is_bench || grammar.get("embeddedLanguages").is_none() {
                continue;
            }
            let mut embedded = Map::new();
            for (_, spec) in registry.iter() {
                // Both the extension scope and the primary alias map to the
                // embedded language id (e.g. cs and csharp for C#).
                for scope in [spec.vscode_scope.as_str(), spec.primary_alias()] {
                    embedded.insert(
                        format!("source.{scope}.embedded.bench"),
                        Value::String(spec.embedded_lang().to_string()),
                    );
                }
            }
            grammar["embeddedLanguages"] = Value::Object(embedded);
            break;
        }

        let mut rendered = serde_json::to_string_pretty(&doc)?;
        rendered.push('\n');
        Ok(rendered)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
[languages.go]
rust_enum = "Go"
aliases = ["go"]
token_kinds = ["Go"]
vscode_scope = "go"
tree_sitter_injection = "go"
import_style = "paren"

[languages.rust]
rust_enum = "Rust"
aliases = ["rust", "rs"]
token_kinds = ["Rust"]
vscode_scope = "rust"
tree_sitter_injection = "rust"
has_use_block = true

[languages.csharp]
rust_enum = "CSharp"
aliases = ["csharp", "cs"]
token_kinds = ["CSharp"]
vscode_scope = "cs"
embedded_lang = "csharp"
tree_sitter_injection = "c-sharp"
"#;

    fn sample_registry() -> Registry {
        Registry::from_toml(SAMPLE)
    }

    fn sample_tmlanguage() -> String {
        serde_json::to_string_pretty(&json!({
            "scopeName": "source.bench",
            "repository": {
                "comment": { "match": "//.*" },
                "suite-block": {
                    "patterns": [
                        { "include": "#comment" },
                        { "include": "#suite-global-setup-block" },
                        { "include": "#setup-stale-block" },
                        { "include": "#fixture-block" },
                        { "include": "#bench-block" }
                    ]
                },
                "fixture-block": {
                    "patterns": [
                        { "include": "#fixture-attributes" },
                        { "include": "#fixture-stale-block" },
                        { "include": "#comment" }
                    ]
                },
                "bench-block": {
                    "patterns": [
                        { "include": "#bench-attributes" },
                        { "include": "#bench-hooks" },
                        { "include": "#bench-stale-block" },
                        { "include": "#bench-stale-line" },
                        { "include": "#comment" }
                    ]
                },
                "bench-hooks": {
                    "patterns": [
                        { "match": "\\b(skip|validate)\\s+(stale)\\s*:", "name": "keyword.control.hook.bench" },
                        { "match": "\\b(before|after|each)\\s+(stale)\\s*:", "name": "keyword.control.hook.bench" }
                    ]
                }
            }
        }))
        .unwrap()
            + "\n"
    }

    fn run_tmlanguage(registry: &Registry) -> Value {
        let dir = tempfile::tempdir().unwrap();
        let syntaxes = dir.path().join("extensions/vscode/syntaxes");
        std::fs::create_dir_all(&syntaxes).unwrap();
        let path = syntaxes.join("crossbench.tmLanguage.json");
        std::fs::write(&path, sample_tmlanguage()).unwrap();

        let ws = Workspace::new(dir.path().to_path_buf(), false, false);
        regenerate_tmlanguage(&ws, registry).unwrap();
        // Converges on the second run.
        let first = std::fs::read_to_string(&path).unwrap();
        regenerate_tmlanguage(&ws, registry).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);

        serde_json::from_str(&second).unwrap()
    }

    fn includes(doc: &Value, block: &str) -> Vec<String> {
        doc["repository"][block]["patterns"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p.get("include").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn include_lists_spliced_after_anchor() {
        let doc = run_tmlanguage(&sample_registry());

        assert_eq!(
            includes(&doc, "suite-block"),
            vec![
                "#comment",
                "#suite-global-setup-block",
                "#setup-go-block",
                "#setup-rust-block",
                "#setup-csharp-block",
                "#fixture-block",
                "#bench-block",
            ]
        );
        assert_eq!(
            includes(&doc, "bench-block"),
            vec![
                "#bench-attributes",
                "#bench-hooks",
                "#bench-go-block",
                "#bench-rust-block",
                "#bench-csharp-block",
                "#bench-go-line",
                "#bench-rust-line",
                "#bench-csharp-line",
                "#comment",
            ]
        );
    }

    #[test]
    fn hook_rules_rebuilt_from_structured_fields() {
        let doc = run_tmlanguage(&sample_registry());
        let hooks = doc["repository"]["bench-hooks"]["patterns"].as_array().unwrap();

        assert_eq!(
            hooks[0]["match"],
            "\\b(skip|validate)\\s+(go|rust|rs|csharp|cs)\\s*:"
        );
        assert_eq!(
            hooks[1]["match"],
            "\\b(before|after|each)\\s+(go|rust|rs|csharp|cs)\\s*:"
        );
        // Untouched siblings survive the rewrite.
        assert_eq!(hooks[0]["name"], "keyword.control.hook.bench");
    }

    #[test]
    fn block_definitions_merged_without_deleting_foreign_keys() {
        let doc = run_tmlanguage(&sample_registry());
        let repo = doc["repository"].as_object().unwrap();

        // Paren import for go, no contentName.
        let go_import = &repo["setup-import-go-block"];
        assert_eq!(go_import["begin"], "^(\\s*)(import)\\s*(\\()");
        assert!(go_import.get("contentName").is_none());

        // Rust alone gets a use sub-block.
        assert!(repo.contains_key("setup-use-rust-block"));
        assert!(!repo.contains_key("setup-use-go-block"));
        let rust_setup_includes: Vec<&str> = repo["setup-rust-block"]["patterns"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|p| p["include"].as_str())
            .collect();
        assert!(rust_setup_includes.contains(&"#setup-use-rust-block"));

        // Multi-alias languages get an alternation group in begin patterns.
        assert_eq!(
            repo["setup-rust-block"]["begin"],
            "^(\\s*)(setup)\\s+(rust|rs)\\s*\\{\\s*$"
        );

        // Hand-written repository entries are never deleted.
        assert!(repo.contains_key("comment"));
    }

    #[test]
    fn package_json_embedded_languages() {
        let registry = sample_registry();
        let dir = tempfile::tempdir().unwrap();
        let vscode = dir.path().join("extensions/vscode");
        std::fs::create_dir_all(&vscode).unwrap();
        let package = json!({
            "name": "crossbench",
            "contributes": {
                "grammars": [
                    {
                        "scopeName": "source.bench",
                        "path": "./syntaxes/crossbench.tmLanguage.json",
                        "embeddedLanguages": { "source.stale.embedded.bench": "stale" }
                    }
                ]
            }
        });
        std::fs::write(
            vscode.join("package.json"),
            serde_json::to_string_pretty(&package).unwrap() + "\n",
        )
        .unwrap();

        let ws = Workspace::new(dir.path().to_path_buf(), false, false);
        regenerate_package_json(&ws, &registry).unwrap();

        let doc: Value = serde_json::from_str(
            &std::fs::read_to_string(vscode.join("package.json")).unwrap(),
        )
        .unwrap();
        let embedded = doc["contributes"]["grammars"][0]["embeddedLanguages"].as_object().unwrap();

        // Both the vscode scope and the primary alias map to the embedded id.
        assert_eq!(embedded["source.cs.embedded.bench"], "csharp");
        assert_eq!(embedded["source.csharp.embedded.bench"], "csharp");
        assert_eq!(embedded["source.go.embedded.bench"], "go");
        assert!(embedded.get("source.stale.embedded.bench").is_none());
    }
}
