//! Template file lookup.
//!
//! Layout convention: `{templates}/{kind}/{name}.template`. Anvil templates
//! are required (a missing one silently breaks that language's stdlib support,
//! so the run aborts); scaffold templates are best-effort and a missing file
//! just skips that insertion step.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

use crate::error::GenError;
use crate::registry::LanguageSpec;

pub struct Templates {
    root: PathBuf,
}

impl Templates {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn anvil_path(&self, spec: &LanguageSpec) -> PathBuf {
        self.root.join("anvil").join(format!("{}.template", spec.anvil_template()))
    }

    /// Read a language's anvil template, trimmed of surrounding whitespace.
    pub fn anvil(&self, id: &str, spec: &LanguageSpec) -> Result<String> {
        let path = self.anvil_path(spec);
        if !path.exists() {
            return Err(GenError::TemplateNotFound { language: id.to_string(), path }.into());
        }
        let code = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        Ok(code.trim().to_string())
    }

    /// Presence check used when the caller names a single language.
    pub fn check_anvil(&self, id: &str, spec: &LanguageSpec) -> Result<()> {
        let path = self.anvil_path(spec);
        if !path.exists() {
            return Err(GenError::TemplateNotFound { language: id.to_string(), path }.into());
        }
        Ok(())
    }

    /// Read a scaffold template for `lang`; `None` if the file does not exist.
    pub fn scaffold(&self, lang: &str, name: &str) -> Result<Option<String>> {
        let path = self.root.join(lang).join(format!("{name}.template"));
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template {}", path.display()))?;
        Ok(Some(content))
    }

    /// Enumerate every `.template` under a kind directory (verbose reporting).
    pub fn list(&self, kind: &str) -> Vec<PathBuf> {
        WalkDir::new(self.root.join(kind))
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "template")
            })
            .map(|entry| entry.into_path())
            .collect()
    }
}
