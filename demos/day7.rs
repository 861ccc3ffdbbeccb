// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 7 built using the `intcode` library.

use intcode::prelude::*;

fn main() {
    use std::env::args_os;
    use std::fs::read_to_string;
    let input =
        read_to_string(args_os().nth(1).expect("missing file name")).expect("failed to read file");

    let mut amps = Pipeline::from_source(5, &input).unwrap();
    let (thrust, phases) = amps.max_thrust(0..5).unwrap();
    println!("part 1: {thrust} (phases {phases:?})");
    let (thrust, phases) = amps.max_feedback_thrust(5..10).unwrap();
    println!("part 2: {thrust} (phases {phases:?})");
}
