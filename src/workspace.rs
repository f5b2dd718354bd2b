//! Scoped read-then-write access to host files.
//!
//! Every artifact is read, transformed and written back in strict sequence;
//! the workspace is the single place that honors `--dry-run` and reports
//! which files changed. Writes are not transactional: a failure partway
//! through a run leaves earlier artifacts rewritten, and the next run
//! converges because every patch is idempotent.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use crate::error::GenError;
use crate::patch::replace_marker_block;

pub struct Workspace {
    root: PathBuf,
    dry_run: bool,
    verbose: bool,
}

impl Workspace {
    pub fn new(root: PathBuf, dry_run: bool, verbose: bool) -> Self {
        Self { root, dry_run, verbose }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.path(rel);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    pub fn write(&self, rel: &str, contents: &str) -> Result<()> {
        if self.dry_run {
            if self.verbose {
                println!("    [DRY RUN] Would write {rel}");
            }
            return Ok(());
        }
        let path = self.path(rel);
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  {} Updated {}", "✓".green(), rel);
        Ok(())
    }

    /// Marker-block replacement that fails loudly when the pair is missing.
    pub fn patch_markers(
        &self,
        rel: &str,
        content: &str,
        begin: &str,
        end: &str,
        region: &str,
        marker: &str,
    ) -> Result<String> {
        replace_marker_block(content, begin, end, region).ok_or_else(|| {
            GenError::MarkersNotFound {
                path: self.path(rel),
                marker: marker.to_string(),
            }
            .into()
        })
    }

    /// Read `rel`, transform it, and write back only if the content changed.
    pub fn edit(&self, rel: &str, transform: impl FnOnce(&str) -> Result<String>) -> Result<()> {
        let content = self.read(rel)?;
        let patched = transform(&content)?;
        if patched != content {
            self.write(rel, &patched)?;
        } else if self.verbose {
            println!("  - {rel} unchanged");
        }
        Ok(())
    }
}
