// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Run an Intcode program, printing each output on its own line

use intcode::prelude::*;
use std::error::Error;
use std::io::{self, Write, stdin};
use std::path::PathBuf;

use clap::Parser;

const VERSION: &str = concat!(env!("CARGO_CRATE_NAME"), '-', env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = VERSION)]
#[command(about = "Intcode runner", long_about = None)]
struct Args {
    #[arg(help = "File containing comma-separated intcode")]
    source: PathBuf,
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    #[arg(help = "Comma-separated values to queue as input")]
    input: Vec<i64>,
    #[arg(long, help = "Prompt on stdin when queued input runs out")]
    interactive: bool,
    #[arg(long, help = "Stop after the first output instead of running to HALT")]
    stream: bool,
    #[arg(long, help = "Log each executed instruction to stderr")]
    log: bool,
    #[arg(long, help = "Print the final memory state after running")]
    dump: bool,
}

/// Ask for integers on stdin until one parses. Returns [None] on end of input, or if stdin fails.
fn prompt() -> Option<i64> {
    let mut buf = String::new();
    loop {
        eprint!("Enter integer: ");
        buf.clear();
        match stdin().read_line(&mut buf) {
            Ok(0) => return None,
            Ok(_) => match buf.trim().parse() {
                Ok(n) => return Some(n),
                Err(e) => eprintln!("{e}\nInvalid input, try again."),
            },
            Err(e) => {
                eprintln!("failed to read input: {e}");
                return None;
            }
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut machine = Machine::from_file(&args.source)
        .map_err(|e| format!("failed to load {}: {e}", args.source.display()))?;
    if args.log {
        machine.log_with(io::stderr());
    }

    let outputs = if args.interactive {
        machine.run_with_fallback(Some(args.input.as_slice()), args.stream, prompt)?
    } else {
        machine.run(Some(args.input.as_slice()), args.stream)?
    };

    let mut stdout = io::stdout().lock();
    for out in outputs {
        writeln!(stdout, "{out}")?;
    }
    if args.dump {
        writeln!(stdout, "{}", machine.memory())?;
    }
    Ok(())
}
