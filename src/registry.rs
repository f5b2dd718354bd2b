//! Language registry loading.
//!
//! `languages.toml` is the single source of truth for supported languages.
//! Document order is preserved end-to-end: every generated enum, dispatch
//! table and include list iterates languages in the order they appear in the
//! registry file.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::GenError;

#[derive(Debug, Deserialize)]
pub struct Registry {
    #[serde(default)]
    languages: IndexMap<String, LanguageSpec>,
}

/// One language definition from `languages.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageSpec {
    /// Variant name used in generated Rust enums (e.g. "TypeScript")
    pub rust_enum: String,

    /// Accepted spellings; the first alias is canonical and is used wherever
    /// a single string must represent the language (as_str, directory names,
    /// tmLanguage block names, regex group order)
    pub aliases: Vec<String>,

    /// TokenKind variant names; several kinds may fold into one language
    /// (e.g. Ts and TypeScript)
    pub token_kinds: Vec<String>,

    /// RuntimeConfig / ProjectRoots field name (default: `{id}_root`)
    #[serde(default)]
    pub config_field: Option<String>,

    /// Grammar scope registered by the language's VS Code extension
    pub vscode_scope: String,

    /// Embedded language id for tmLanguage contentName (default: vscode_scope)
    #[serde(default)]
    pub embedded_lang: Option<String>,

    #[serde(default)]
    pub import_style: ImportStyle,

    /// Language id passed to `#set! injection.language`
    pub tree_sitter_injection: String,

    /// Anvil template file stem (default: primary alias)
    #[serde(default)]
    pub anvil_template: Option<String>,

    /// Extra import strings for the generated anvil module (e.g. `"os"`)
    #[serde(default)]
    pub anvil_imports: Vec<String>,

    /// Whether the setup block grammar has a `use` sub-block (rust only)
    #[serde(default)]
    pub has_use_block: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStyle {
    #[default]
    Brace,
    Paren,
}

impl Registry {
    /// Load and decode the registry, preserving document order.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GenError::RegistryMissing { path: path.to_path_buf() }.into());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read registry file: {}", path.display()))?;
        let registry: Registry =
            toml::from_str(&content).with_context(|| "Failed to parse languages.toml")?;

        if registry.languages.is_empty() {
            return Err(GenError::RegistryEmpty { path: path.to_path_buf() }.into());
        }
        for (id, spec) in &registry.languages {
            if spec.aliases.is_empty() {
                anyhow::bail!("language '{}' has no aliases", id);
            }
            if spec.token_kinds.is_empty() {
                anyhow::bail!("language '{}' has no token_kinds", id);
            }
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Iterate languages in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LanguageSpec)> {
        self.languages.iter().map(|(id, spec)| (id.as_str(), spec))
    }

    pub fn ids(&self) -> Vec<&str> {
        self.languages.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.languages.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Result<&LanguageSpec, GenError> {
        self.languages.get(id).ok_or_else(|| GenError::UnknownLanguage {
            name: id.to_string(),
            known: self.languages.keys().cloned().collect(),
        })
    }

    #[cfg(test)]
    pub(crate) fn from_toml(content: &str) -> Self {
        toml::from_str(content).expect("test registry should parse")
    }
}

impl LanguageSpec {
    /// Canonical spelling: the first alias.
    pub fn primary_alias(&self) -> &str {
        &self.aliases[0]
    }

    pub fn config_field(&self, id: &str) -> String {
        self.config_field.clone().unwrap_or_else(|| format!("{id}_root"))
    }

    pub fn embedded_lang(&self) -> &str {
        self.embedded_lang.as_deref().unwrap_or(&self.vscode_scope)
    }

    pub fn anvil_template(&self) -> &str {
        self.anvil_template.as_deref().unwrap_or_else(|| self.primary_alias())
    }
}
