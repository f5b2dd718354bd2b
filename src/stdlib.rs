//! crossbench-stdlib regeneration: the anvil module, assembled from one
//! template per language. This is the one renderer that aborts the whole run
//! on a missing input - a language without an anvil template would silently
//! lose its `use std::anvil` support.

use anyhow::Result;

use crate::registry::{LanguageSpec, Registry};
use crate::templates::Templates;
use crate::workspace::Workspace;

const ANVIL_RS: &str = "crossbench-stdlib/src/anvil.rs";

const HEADER: &str = r#"//! Anvil module - Anvil RPC URL accessor for EVM benchmarks
//!
//! When `use std::anvil` is specified along with `globalSetup { spawnAnvil() }`,
//! crossbench spawns a local Anvil Ethereum node and makes the RPC URL available
//! via the `ANVIL_RPC_URL` variable.
//!
//! ## Available Variables
//!
//! - `ANVIL_RPC_URL` - The RPC endpoint URL (e.g., "http://127.0.0.1:8545")
//!
//! ## Usage
//!
//! ```bench
//! use std::anvil
//!
//! globalSetup {
//!     spawnAnvil()                           // Basic spawn
//!     // spawnAnvil(fork: "https://...")     // With chain forking
//! }
//!
//! suite evmBench {
//!     setup go {
//!         import ("net/http")
//!
//!         helpers {
//!             func callRpc() {
//!                 http.Post(ANVIL_RPC_URL, "application/json", ...)
//!             }
//!         }
//!     }
//!
//!     bench rpcTest {
//!         go: callRpc()
//!     }
//! }
//! ```
"#;

/// Environment accessor each language's template is expected to use. New
/// languages are not in this table; their generated test only checks for the
/// RPC URL variable.
fn env_probe(id: &str) -> Option<&'static str> {
    match id {
        "go" => Some("os.Getenv"),
        "typescript" => Some("process.env"),
        "rust" => Some("std::env::var"),
        "python" => Some("os.environ"),
        "csharp" => Some("Environment.GetEnvironmentVariable"),
        _ => None,
    }
}

fn imports_arm(spec: &LanguageSpec) -> String {
    let imports: Vec<String> =
        spec.anvil_imports.iter().map(|s| format!("\"{}\"", s.replace('"', "\\\""))).collect();
    format!("        Lang::{} => vec![{}],", spec.rust_enum, imports.join(", "))
}

fn test_case(id: &str, spec: &LanguageSpec) -> String {
    let probe_assert = match env_probe(id) {
        Some(probe) => format!("\n        assert!(code.contains(\"{probe}\"));"),
        None => String::new(),
    };
    format!(
        r#"    #[test]
    fn test_{name}_anvil_contains_rpc_url() {{
        let code = get_code(Lang::{rust_enum});
        assert!(code.contains("ANVIL_RPC_URL"));{probe_assert}
    }}"#,
        name = spec.anvil_template(),
        rust_enum = spec.rust_enum,
    )
}

pub fn regenerate_anvil(ws: &Workspace, registry: &Registry, templates: &Templates) -> Result<()> {
    let mut consts = Vec::new();
    let mut imports_arms = Vec::new();
    let mut code_arms = Vec::new();
    let mut tests = Vec::new();

    for (id, spec) in registry.iter() {
        let code = templates.anvil(id, spec)?;
        let const_name = format!("{}_ANVIL", spec.rust_enum.to_uppercase());
        consts.push(format!("const {const_name}: &str = r#\"\n{code}\n\"#;"));
        imports_arms.push(imports_arm(spec));
        code_arms.push(format!("        Lang::{} => {const_name}.to_string(),", spec.rust_enum));
        tests.push(test_case(id, spec));
    }

    let rendered = format!(
        r##"{header}
use crossbench_dsl::Lang;

/// Get the language-specific imports for the anvil module
pub fn get_imports(lang: Lang) -> Vec<&'static str> {{
    match lang {{
{imports}
    }}
}}

/// Get the language-specific code for the anvil module
pub fn get_code(lang: Lang) -> String {{
    match lang {{
{code}
    }}
}}

{consts}

#[cfg(test)]
mod tests {{
    use super::*;

{tests}
}}
"##,
        header = HEADER,
        imports = imports_arms.join("\n"),
        code = code_arms.join("\n"),
        consts = consts.join("\n"),
        tests = tests.join("\n\n"),
    );

    ws.write(ANVIL_RS, &rendered)
}
