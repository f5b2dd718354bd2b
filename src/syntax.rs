//! crossbench-syntax regeneration: the partial-parse `Lang` enum used for
//! embedded code blocks. Same shape as the DSL enum, lighter derives.

use anyhow::Result;

use crate::dsl::lang_enum_block;
use crate::registry::Registry;
use crate::workspace::Workspace;

const PARTIAL_AST_RS: &str = "crossbench-syntax/src/partial_ast.rs";

pub fn regenerate_partial_ast(ws: &Workspace, registry: &Registry) -> Result<()> {
    let generated = lang_enum_block(
        registry,
        "/// Supported languages for embedded code",
        "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]",
    );
    ws.edit(PARTIAL_AST_RS, |content| {
        ws.patch_markers(
            PARTIAL_AST_RS,
            content,
            "// BEGIN-GENERATED: partial Lang enum (do not edit)\n",
            "\n// END-GENERATED: partial Lang enum",
            &generated,
            "partial Lang enum",
        )
    })
}
