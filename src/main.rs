use std::env;

use anyhow::Result;
use neural_playground::{headless, PlaygroundConfig};

fn main() -> Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => PlaygroundConfig::load(path)?,
        None => PlaygroundConfig::default(),
    };

    let report = headless::run(&config)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
