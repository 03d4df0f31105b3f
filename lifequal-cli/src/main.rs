//! Entry point for the `lifequal-import` binary.
#![forbid(unsafe_code)]

use lifequal_cli::{CliError, error_chain, summary_lines};

fn main() {
    match lifequal_cli::run() {
        Ok(report) => {
            for line in summary_lines(&report) {
                println!("{line}");
            }
            println!("All data imported successfully!");
        }
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("lifequal-import: {}", error_chain(&err));
            std::process::exit(1);
        }
    }
}
