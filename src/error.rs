//! Error taxonomy for the generator.
//!
//! Everything here is fatal and aborts the run; best-effort paths (anchor
//! insertion into files whose shape has drifted) return unchanged content
//! instead of an error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("language registry not found: {}", path.display())]
    RegistryMissing { path: PathBuf },

    #[error("no languages defined in {}", path.display())]
    RegistryEmpty { path: PathBuf },

    #[error("unknown language '{name}'. Known: {}", known.join(", "))]
    UnknownLanguage { name: String, known: Vec<String> },

    #[error(
        "anvil template not found for {language}: {}. \
         Create it or set anvil_template in languages.toml.",
        path.display()
    )]
    TemplateNotFound { language: String, path: PathBuf },

    #[error("{}: {marker} markers not found", path.display())]
    MarkersNotFound { path: PathBuf, marker: String },
}
