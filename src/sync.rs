//! Orchestration: load the registry once, then run every artifact generator
//! over the full registry in a fixed sequence.
//!
//! Generated-code artifacts always cover the whole registry, even when the
//! caller names a single language - no artifact may ever reflect a subset of
//! languages while others reflect the full set. Failures abort immediately;
//! there is no rollback, because every patch is independently idempotent and
//! the next run converges.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

use crate::registry::Registry;
use crate::templates::Templates;
use crate::workspace::Workspace;
use crate::{dsl, editor, grammar, runtime, scaffold, stdlib, syntax};

#[derive(Parser)]
#[command(name = "langgen")]
#[command(about = "Regenerate language boilerplate for the crossbench workspace", long_about = None)]
#[command(version)]
pub struct SyncArgs {
    /// Language to validate (e.g. "csharp"). Generated artifacts are always
    /// regenerated from the full registry regardless.
    pub lang: Option<String>,

    /// Crossbench workspace root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Path to languages.toml, relative to the workspace root
    #[arg(long, default_value = "languages.toml")]
    pub registry: PathBuf,

    /// Path to the template directory, relative to the workspace root
    #[arg(long, default_value = "templates")]
    pub templates: PathBuf,

    /// Show what would be regenerated without modifying files
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(long, short)]
    pub verbose: bool,
}

pub fn run(args: SyncArgs) -> Result<()> {
    println!("{}", "🔄 Regenerating language boilerplate...".bold().cyan());

    let registry_path = args.root.join(&args.registry);
    let registry = Registry::load(&registry_path)?;
    println!(
        "✓ Loaded {} language definitions from {}",
        registry.len(),
        registry_path.display()
    );

    if args.verbose {
        for (id, spec) in registry.iter() {
            println!("  - {} ({}, aliases: {})", id.green(), spec.rust_enum, spec.aliases.join(", "));
        }
    }

    let templates = Templates::new(args.root.join(&args.templates));
    if args.verbose {
        println!("  {} anvil template(s) on disk", templates.list("anvil").len());
    }

    // A named language narrows the compatibility check only: its registry
    // entry and anvil template must exist before any file is touched.
    if let Some(name) = &args.lang {
        let spec = registry.get(name)?;
        templates.check_anvil(name, spec)?;
    }

    if args.dry_run {
        let selected: Vec<&str> = match &args.lang {
            Some(name) => vec![name.as_str()],
            None => registry.ids(),
        };
        println!("Would regenerate for: {}", selected.join(", "));
    }

    let ws = Workspace::new(args.root.clone(), args.dry_run, args.verbose);

    dsl::regenerate_ast(&ws, &registry)?;
    dsl::regenerate_tokens(&ws, &registry)?;
    syntax::regenerate_partial_ast(&ws, &registry)?;
    runtime::regenerate_config(&ws, &registry)?;
    grammar::regenerate_grammar_js(&ws, &registry)?;
    grammar::regenerate_injections(&ws, &registry)?;
    dsl::regenerate_parser(&ws, &registry)?;
    editor::regenerate_tmlanguage(&ws, &registry)?;
    stdlib::regenerate_anvil(&ws, &registry, &templates)?;
    editor::regenerate_package_json(&ws, &registry)?;
    runtime::regenerate_project_lib(&ws, &registry)?;
    runtime::regenerate_executor_lib(&ws, &registry)?;
    runtime::regenerate_executor_mappings(&ws, &registry)?;
    scaffold::apply_scaffold(&ws, &registry, &templates)?;

    println!();
    if args.dry_run {
        println!("{}", "🔍 Dry run complete (no files modified)".yellow().bold());
    } else {
        println!("{}", "✅ Language boilerplate regenerated!".green().bold());
    }
    println!("   Languages: {}", registry.ids().join(", "));

    Ok(())
}
