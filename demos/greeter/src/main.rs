//! Runs the greeter demo interactively against the real terminal.
//!
//! ```text
//! cargo run -p greeter
//! cargo run -p greeter -- --record session.json
//! cargo run -p greeter -- --replay session.json
//! ```
//!
//! Argument parsing here is deliberately minimal — CLI argument parsing
//! is out of scope for this workspace's core, and this binary exists
//! only to exercise it end to end.

mod ops;

use std::path::PathBuf;

use op_core::{IoConfig, Mode};
use op_runtime::OpRunner;

fn parse_args() -> IoConfig {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [flag, path] if flag == "--record" => IoConfig {
            mode: Mode::Record,
            session_file: Some(PathBuf::from(path)),
            log_file: None,
        },
        [flag, path] if flag == "--replay" => IoConfig {
            mode: Mode::Replay,
            session_file: Some(PathBuf::from(path)),
            log_file: None,
        },
        _ => IoConfig::interactive(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = parse_args();
    let io = op_io::assemble(&config).await?;

    let root = Box::new(ops::AskName);
    let mut runner = OpRunner::new(root, io);
    runner.run().await?;

    Ok(())
}
