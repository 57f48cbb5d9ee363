// Copyright (c) Microsoft. All rights reserved.

#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use anyhow::{Context, Result};
use clap::Parser;

// Subcommands
mod create_key;

fn try_main() -> Result<()> {
    logger::try_init().context("could not initialize logger")?;

    let options = Options::parse();
    match options {
        Options::CreateKey(options) => create_key::run(options)?,
    }

    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}

#[derive(Parser)]
#[command(name = "kmsctl")]
enum Options {
    /// Build a CreateKey request from the configured defaults and the given overrides, and print it.
    CreateKey(create_key::Options),
}
