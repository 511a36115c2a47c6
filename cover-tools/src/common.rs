#![allow(unused)]

pub use cover_nmi::cover_io as io;
pub use cover_nmi::*;

pub use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
pub use env_logger;

pub use log::{info, warn};
pub use std::path::Path;

pub use rayon::ThreadPoolBuilder;

/// `RUST_LOG=info` when asked for, then start the logger
pub fn init_logger(verbose: bool) {
    if verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
}

/// Create the parent directory of `file` if needed
pub fn mkdir_parent(file: &str) -> anyhow::Result<()> {
    if let Some(dir) = Path::new(file).parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}
