//! Anchor-insertion scaffolding for the newest language (C#).
//!
//! crossbench-project's manifest/build/templates sources carry no generated
//! markers; C# support is spliced in after stable anchor substrings instead.
//! Every step is guarded by its own sentinel, so a partially applied file
//! from an interrupted run completes on the next one, and a file whose shape
//! has drifted (anchor gone) is left for manual reconciliation.

use anyhow::Result;

use crate::patch::insert_after_anchor;
use crate::registry::Registry;
use crate::templates::Templates;
use crate::workspace::Workspace;

pub const SCAFFOLD_LANG: &str = "csharp";

struct Insertion {
    template: &'static str,
    anchor: &'static str,
    sentinel: &'static str,
    /// Glued around the trimmed template before insertion.
    prefix: &'static str,
    suffix: &'static str,
}

struct HostPipeline {
    path: &'static str,
    steps: &'static [Insertion],
}

const MANIFEST_STEPS: &[Insertion] = &[
    Insertion {
        template: "manifest_config",
        anchor: "}\n\nfn default_python_version",
        sentinel: "CSharpConfig",
        prefix: "",
        suffix: "\n\n",
    },
    Insertion {
        template: "manifest_struct_field",
        anchor: "pub python: Option<PythonConfig>,\n\n",
        sentinel: "pub csharp: Option<CSharpConfig>",
        prefix: "",
        suffix: "",
    },
    Insertion {
        template: "manifest_new_has_check",
        anchor: "let has_python = languages.iter().any(|l| l == \"python\" || l == \"py\");\n\n",
        sentinel: "let has_csharp = ",
        prefix: "",
        suffix: "",
    },
    Insertion {
        template: "manifest_new_block",
        anchor: "            },\n            output: OutputConfig::default()",
        sentinel: "csharp: if has_csharp",
        prefix: "\n            ",
        suffix: "",
    },
    Insertion {
        template: "manifest_has_method",
        anchor: "pub fn has_python(&self) -> bool {\n        self.python.is_some()\n    }\n\n",
        sentinel: "pub fn has_csharp",
        prefix: "",
        suffix: "\n\n",
    },
    Insertion {
        template: "manifest_add_dep",
        anchor: "pub fn remove_python_dependency(&mut self, package: &str) -> Result<()> {\n        \
                 let python = self\n            \
                 .python\n            \
                 .as_mut()\n            \
                 .ok_or_else(|| miette::miette!(\"Python is not enabled in this project\"))?;\n        \
                 python.dependencies.remove(package);\n        \
                 Ok(())\n    \
                 }\n\n",
        sentinel: "pub fn add_csharp_dependency",
        prefix: "",
        suffix: "\n\n",
    },
    // Anchored on the add_csharp_dependency text the previous step inserts.
    Insertion {
        template: "manifest_remove_dep",
        anchor: "pub fn add_csharp_dependency(&mut self, package: &str, version: &str) -> Result<()> {\n        \
                 let csharp = self\n            \
                 .csharp\n            \
                 .as_mut()\n            \
                 .ok_or_else(|| miette::miette!(\"C# is not enabled in this project\"))?;\n        \
                 csharp.dependencies.insert(package.to_string(), version.to_string());\n        \
                 Ok(())\n    \
                 }\n\n",
        sentinel: "pub fn remove_csharp_dependency",
        prefix: "",
        suffix: "\n\n",
    },
    Insertion {
        template: "manifest_enabled_langs",
        anchor: "if self.has_python() {\n            langs.push(\"python\".to_string());\n        }\n\n",
        sentinel: "langs.push(\"csharp\"",
        prefix: "",
        suffix: "\n",
    },
];

const BUILD_STEPS: &[Insertion] = &[
    Insertion {
        template: "build_project_call",
        anchor: "    }\n\n    println!()",
        sentinel: "manifest.has_csharp()",
        prefix: "\n    ",
        suffix: "\n\n",
    },
    Insertion {
        template: "build_env",
        anchor: "    terminal::success_indented(\"Python environment ready\");\n\n    Ok(())\n}\n\nfn ",
        sentinel: "fn build_csharp_env",
        prefix: "",
        suffix: "\n\n",
    },
];

const TEMPLATES_STEPS: &[Insertion] = &[Insertion {
    template: "csproj",
    anchor: "\"#\n    .to_string()\n}\n\n/// Internal Python deps",
    sentinel: "csharp_csproj",
    prefix: "",
    suffix: "\n\n",
}];

const PIPELINES: &[HostPipeline] = &[
    HostPipeline { path: "crossbench-project/src/manifest.rs", steps: MANIFEST_STEPS },
    HostPipeline { path: "crossbench-project/src/build.rs", steps: BUILD_STEPS },
    HostPipeline { path: "crossbench-project/src/templates.rs", steps: TEMPLATES_STEPS },
];

pub fn apply_scaffold(ws: &Workspace, registry: &Registry, templates: &Templates) -> Result<()> {
    if !registry.contains(SCAFFOLD_LANG) {
        return Ok(());
    }

    for pipeline in PIPELINES {
        ws.edit(pipeline.path, |content| {
            let mut text = content.to_string();
            for step in pipeline.steps {
                let Some(template) = templates.scaffold(SCAFFOLD_LANG, step.template)? else {
                    continue;
                };
                let block =
                    format!("{}{}{}", step.prefix, template.trim_end(), step.suffix);
                text = insert_after_anchor(&text, step.anchor, &block, step.sentinel);
            }
            Ok(text)
        })?;
    }
    Ok(())
}
