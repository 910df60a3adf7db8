//! Manual-testing shim for milc-drv: reads a source file path from argv,
//! compiles it, and prints the resulting LLIR to stdout. Not itself part
//! of the specified core (spec.md §2 item 8) — just enough CLI to drive
//! the pipeline by hand.

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(ir) => {
            print!("{ir}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<String> {
    let path = std::env::args()
        .nth(1)
        .context("usage: milc <source-file>")?;
    let source = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let ir = milc_drv::compile_file(&path, &source)
        .map_err(|e| {
            let file = milc_util::SourceFile::new(&path, &source);
            anyhow::anyhow!("{}", e.render(&file))
        })?;
    Ok(ir)
}
