// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 5 built using the `intcode` library.

use intcode::prelude::*;

/// Run the diagnostic program for `system_id`, checking that every test before the final
/// diagnostic code passed
fn diagnose(mut machine: Machine, system_id: i64) -> i64 {
    let (&diagnostic, tests) = machine
        .run(Some(&[system_id]), false)
        .unwrap()
        .split_last()
        .expect("no diagnostic code");
    assert!(tests.iter().all(|&i| i == 0), "diagnostic failed");
    diagnostic
}

fn main() {
    use std::env::args_os;
    let path = args_os().nth(1).expect("missing file name");
    let machine = Machine::from_file(path).expect("failed to load program");
    println!("part 1: {}", diagnose(machine.clone(), 1));
    println!("part 2: {}", diagnose(machine, 5));
}
