use clap::Parser;
use colored::Colorize;

use langgen::sync::{self, SyncArgs};

fn main() {
    let args = SyncArgs::parse();
    if let Err(err) = sync::run(args) {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
