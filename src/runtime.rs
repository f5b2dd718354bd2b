//! Runtime-side regeneration: the `RuntimeConfig` / `ProjectRoots` field
//! lists, their clone-mappings in the executor, and the per-language runtime
//! env constants in crossbench-project.

use anyhow::Result;

use crate::registry::{LanguageSpec, Registry};
use crate::workspace::Workspace;

const CONFIG_RS: &str = "crossbench-runtime-traits/src/config.rs";
const EXECUTOR_LIB_RS: &str = "crossbench-executor/src/lib.rs";
const PROJECT_LIB_RS: &str = "crossbench-project/src/lib.rs";

/// Bespoke doc comments for the long-standing languages; anything newer falls
/// back to a generic comment so a registry addition never breaks generation.
fn project_root_comment(id: &str, spec: &LanguageSpec) -> String {
    match id {
        "go" => "Go module root (directory containing go.mod)".to_string(),
        "typescript" => {
            "Node.js project root (directory containing package.json or node_modules)".to_string()
        }
        "rust" => "Rust project root (directory containing Cargo.toml)".to_string(),
        "python" => {
            "Python project root (directory containing requirements.txt or pyproject.toml)"
                .to_string()
        }
        "csharp" => "C# project root (directory containing .csproj/.sln)".to_string(),
        _ => format!("{} project root", spec.rust_enum),
    }
}

fn runtime_env_comment(id: &str, spec: &LanguageSpec) -> String {
    match id {
        "go" => "Go runtime env subdir (go.mod, go.sum, generated bench code)".to_string(),
        "typescript" => {
            "TypeScript/Node runtime env subdir (package.json, node_modules, generated bench code)"
                .to_string()
        }
        "rust" => {
            "Rust runtime env subdir (Cargo.toml, Cargo.lock, generated bench code)".to_string()
        }
        "python" => "Python runtime env subdir".to_string(),
        "csharp" => {
            "C# runtime env subdir (crossbench.csproj, Program.cs, generated bench code)"
                .to_string()
        }
        _ => format!("{} runtime env subdir", spec.rust_enum),
    }
}

fn root_fields(registry: &Registry) -> String {
    let fields: Vec<String> = registry
        .iter()
        .map(|(id, spec)| {
            format!(
                "    /// {}\n    pub {}: Option<PathBuf>,",
                project_root_comment(id, spec),
                spec.config_field(id)
            )
        })
        .collect();
    fields.join("\n")
}

pub fn regenerate_config(ws: &Workspace, registry: &Registry) -> Result<()> {
    let fields = root_fields(registry);
    ws.edit(CONFIG_RS, |content| {
        ws.patch_markers(
            CONFIG_RS,
            content,
            "    // BEGIN-GENERATED: RuntimeConfig fields (do not edit)\n",
            "\n    // END-GENERATED: RuntimeConfig fields",
            &fields,
            "RuntimeConfig fields",
        )
    })
}

pub fn regenerate_executor_lib(ws: &Workspace, registry: &Registry) -> Result<()> {
    let fields = root_fields(registry);
    ws.edit(EXECUTOR_LIB_RS, |content| {
        ws.patch_markers(
            EXECUTOR_LIB_RS,
            content,
            "    // BEGIN-GENERATED: ProjectRoots fields (do not edit)\n",
            "\n    // END-GENERATED: ProjectRoots fields",
            &fields,
            "ProjectRoots fields",
        )
    })
}

/// The validation and scheduler paths build a `RuntimeConfig` from
/// `ProjectRoots` at different nesting depths; only the indent differs.
pub fn regenerate_executor_mappings(ws: &Workspace, registry: &Registry) -> Result<()> {
    for (rel, indent) in [
        ("crossbench-executor/src/validation.rs", "        "),
        ("crossbench-executor/src/scheduler.rs", "            "),
    ] {
        let lines: Vec<String> = registry
            .iter()
            .map(|(id, spec)| {
                let field = spec.config_field(id);
                format!("{indent}{field}: project_roots.{field}.clone(),")
            })
            .collect();
        let mapping = lines.join("\n");

        let begin = format!("{indent}// BEGIN-GENERATED: RuntimeConfig mapping (do not edit)\n");
        let end = format!("\n{indent}// END-GENERATED: RuntimeConfig mapping");
        ws.edit(rel, |content| {
            ws.patch_markers(rel, content, &begin, &end, &mapping, "RuntimeConfig mapping")
        })?;
    }
    Ok(())
}

pub fn regenerate_project_lib(ws: &Workspace, registry: &Registry) -> Result<()> {
    let consts: Vec<String> = registry
        .iter()
        .map(|(id, spec)| {
            format!(
                "/// {}\npub const RUNTIME_ENV_{}: &str = \"{}\";",
                runtime_env_comment(id, spec),
                spec.rust_enum.to_uppercase(),
                spec.primary_alias()
            )
        })
        .collect();
    let consts = consts.join("\n");

    let fns: Vec<String> = registry
        .iter()
        .map(|(_, spec)| {
            format!(
                r#"/// Path to the {rust_enum} runtime env for a project
pub fn runtime_env_{primary}(project_root: &Path) -> PathBuf {{
    project_root.join(RUNTIME_ENV_DIR).join(RUNTIME_ENV_{upper})
}}"#,
                rust_enum = spec.rust_enum,
                primary = spec.primary_alias(),
                upper = spec.rust_enum.to_uppercase(),
            )
        })
        .collect();
    let fns = fns.join("\n\n");

    ws.edit(PROJECT_LIB_RS, |content| {
        let content = ws.patch_markers(
            PROJECT_LIB_RS,
            content,
            "// BEGIN-GENERATED: RUNTIME_ENV constants (do not edit)\n",
            "\n// END-GENERATED: RUNTIME_ENV constants",
            &consts,
            "RUNTIME_ENV constants",
        )?;
        ws.patch_markers(
            PROJECT_LIB_RS,
            &content,
            "// BEGIN-GENERATED: runtime_env functions (do not edit)\n",
            "\n// END-GENERATED: runtime_env functions",
            &fns,
            "runtime_env functions",
        )
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

[languages.zig]
rust_enum = "Zig"
aliases = ["zig"]
token_kinds = ["Zig"]
vscode_scope = "zig"
tree_sitter_injection = "zig"
config_field = "zig_workspace"
"#;

    #[test]
    fn fields_use_bespoke_and_fallback_comments() {
        let registry = Registry::from_toml(SAMPLE);
        let fields = root_fields(&registry);
        assert!(fields.contains("/// Go module root (directory containing go.mod)"), "{fields}");
        assert!(fields.contains("pub go_root: Option<PathBuf>,"), "{fields}");
        // No bespoke comment registered for zig: generic fallback applies,
        // and the explicit config_field override is respected.
        assert!(fields.contains("/// Zig project root"), "{fields}");
        assert!(fields.contains("pub zig_workspace: Option<PathBuf>,"), "{fields}");
    }

    #[test]
    fn mappings_rendered_at_both_indents() {
        let registry = Registry::from_toml(SAMPLE);
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("crossbench-executor/src");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(
            src.join("validation.rs"),
            "fn make() {\n    let config = RuntimeConfig {\n        // BEGIN-GENERATED: RuntimeConfig mapping (do not edit)\nstale\n        // END-GENERATED: RuntimeConfig mapping\n    };\n}\n",
        )
        .unwrap();
        std::fs::write(
            src.join("scheduler.rs"),
            "fn make() {\n    {\n        let config = RuntimeConfig {\n            // BEGIN-GENERATED: RuntimeConfig mapping (do not edit)\nstale\n            // END-GENERATED: RuntimeConfig mapping\n        };\n    }\n}\n",
        )
        .unwrap();

        let ws = Workspace::new(dir.path().to_path_buf(), false, false);
        regenerate_executor_mappings(&ws, &registry).unwrap();

        let validation = std::fs::read_to_string(src.join("validation.rs")).unwrap();
        assert!(
            validation.contains("        go_root: project_roots.go_root.clone(),"),
            "{validation}"
        );
        let scheduler = std::fs::read_to_string(src.join("scheduler.rs")).unwrap();
        assert!(
            scheduler.contains("            zig_workspace: project_roots.zig_workspace.clone(),"),
            "{scheduler}"
        );
    }

    #[test]
    fn project_lib_consts_and_fns() {
        let registry = Registry::from_toml(SAMPLE);
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("crossbench-project/src");
        std::fs::create_dir_all(&src).unwrap();
        let host = "\
// BEGIN-GENERATED: RUNTIME_ENV constants (do not edit)
stale
// END-GENERATED: RUNTIME_ENV constants

// BEGIN-GENERATED: runtime_env functions (do not edit)
stale
// END-GENERATED: runtime_env functions
";
        std::fs::write(src.join("lib.rs"), host).unwrap();

        let ws = Workspace::new(dir.path().to_path_buf(), false, false);
        regenerate_project_lib(&ws, &registry).unwrap();

        let patched = std::fs::read_to_string(src.join("lib.rs")).unwrap();
        assert!(patched.contains("pub const RUNTIME_ENV_GO: &str = \"go\";"), "{patched}");
        assert!(patched.contains("pub fn runtime_env_zig(project_root: &Path) -> PathBuf {"), "{patched}");

        regenerate_project_lib(&ws, &registry).unwrap();
        let again = std::fs::read_to_string(src.join("lib.rs")).unwrap();
        assert_eq!(patched, again);
    }
}
