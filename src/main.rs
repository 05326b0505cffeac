//! Flujo compiler binary

use std::process;

fn main() {
    if let Err(error) = flujo::cli::run() {
        eprintln!("{}", error);
        process::exit(1);
    }
}
