// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Find the best phase settings for a chain of amplifiers all running the same Intcode program

use intcode::prelude::*;
use std::error::Error;
use std::fs::read_to_string;
use std::io;
use std::path::PathBuf;

use clap::Parser;

const VERSION: &str = concat!(env!("CARGO_CRATE_NAME"), '-', env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = VERSION)]
#[command(about = "Amplifier phase search", long_about = None)]
struct Args {
    #[arg(help = "File containing the amplifier software")]
    source: PathBuf,
    #[arg(short = 'n', long = "amps", default_value_t = 5)]
    #[arg(help = "Number of amplifiers in the chain")]
    amps: u8,
    #[arg(long, help = "Loop the last amplifier's output back into the first")]
    feedback: bool,
    #[arg(long, help = "Log every executed instruction to stderr")]
    log: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let source = read_to_string(&args.source)
        .map_err(|e| format!("failed to read {}: {e}", args.source.display()))?;

    let mut pipeline = Pipeline::from_source(usize::from(args.amps), &source)?;
    if args.log {
        for machine in pipeline.machines_mut() {
            machine.log_with(io::stderr());
        }
    }

    let amps = i64::from(args.amps);
    let (thrust, phases) = if args.feedback {
        pipeline.max_feedback_thrust(5..5 + amps)?
    } else {
        pipeline.max_thrust(0..amps)?
    };

    let phases = phases
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    println!("{thrust} (phases {phases})");
    Ok(())
}
