// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! A solution to Advent of Code 2019 Day 2 built using the `intcode` library.

use intcode::prelude::*;

fn part1(mut machine: Machine) -> i64 {
    machine[1] = 12;
    machine[2] = 2;
    let output = machine.run(None, false).unwrap();
    assert!(output.is_empty(), "intcode had unexpected output");
    assert!(machine.is_halted(), "intcode did not run to completion");
    machine[0]
}

#[allow(clippy::unreadable_literal, reason = "from Advent of Code")]
fn part2(base: &Machine) -> i64 {
    for noun in 0..=99 {
        for verb in 0..=99 {
            let mut machine = base.clone();
            machine[1] = noun;
            machine[2] = verb;
            // some noun/verb pairs point outside of memory, so failures just rule the pair out
            if machine.run(None, false).is_err() {
                continue;
            }
            if machine.mem_get(0).unwrap() == 19690720 {
                return 100 * noun + verb;
            }
        }
    }
    panic!("no answer found for part 2");
}

fn main() {
    use std::env::args_os;
    let path = args_os().nth(1).expect("missing file name");
    let machine = Machine::from_file(path).expect("failed to load program");
    println!("part 1: {}", part1(machine.clone()));
    println!("part 2: {}", part2(&machine));
}
