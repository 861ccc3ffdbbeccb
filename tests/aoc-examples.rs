//! Test that examples from Advent of Code problem descriptions behave as described.
// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use either::Either;
use intcode::prelude::*;
use intcode::trace::{Trace, TracedInstr};
use intcode::{OpCode, ParamMode};
use itertools::Itertools;

// first, some groundwork for common elements of different tests

/// Construct a new machine with the given starting code
macro_rules! machine {
    [$($i:expr),*] => {{
        Machine::new([$($i),*])
    }}
}

/// Run a machine to the end, returning its output.
/// Borrows the machine in case its trace is useful
fn run_to_end(machine: &mut Machine, inputs: &[i64]) -> Result<Vec<i64>, Either<MachineError, Stopped>> {
    let output = machine.run(Some(inputs), false).map_err(Either::Left)?.to_vec();
    if machine.is_halted() {
        Ok(output)
    } else {
        Err(Either::Right(Stopped { output }))
    }
}

/// A struct with the information about expected traced instruction
struct ExpectedOp {
    instr_word: i64,
    pointer: i64,
    stored_val: Option<i64>,
}

impl ExpectedOp {
    const fn new(instr_word: i64, pointer: i64, stored_val: Option<i64>) -> Self {
        Self {
            instr_word,
            pointer,
            stored_val,
        }
    }

    fn validate(self, traced: TracedInstr) {
        assert_eq!(self.instr_word, traced.instr_word());
        assert_eq!(self.pointer, traced.pointer());
        assert_eq!(self.stored_val, traced.stored_val());
    }
}

fn validate_trace(expected: impl IntoIterator<Item = ExpectedOp>, Trace(trace): Trace) {
    expected
        .into_iter()
        .zip_eq(trace)
        .for_each(|(op, instr)| op.validate(instr))
}

mod day2_examples {
    mod part1 {
        use crate::*;

        /// the extended example used to help illustrate the basics
        #[test]
        fn extended_example() {
            let mut machine = machine![1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50];
            machine.start_trace();
            let output = run_to_end(&mut machine, &[]).unwrap();
            assert!(output.is_empty());
            const EXPECTED: [ExpectedOp; 3] = [
                ExpectedOp::new(1, 0, Some(70)),
                ExpectedOp::new(2, 4, Some(3500)),
                ExpectedOp::new(99, 8, None),
            ];
            validate_trace(EXPECTED, machine.end_trace().unwrap());
            assert_eq!(machine[0], 3500);
        }

        /// the extra, smaller examples that are listed after the extended example
        #[test]
        fn small_examples() {
            macro_rules! example {
                ($($code: literal),+ becomes $($output: literal),+) => {{
                    let mut machine = machine![$($code),*];
                    run_to_end(&mut machine, &[]).unwrap();
                    assert_eq!(machine.memory().as_slice(), [$($output),+]);
                }}
            }
            example!(1,0,0,0,99 becomes 2,0,0,0,99);
            example!(2,3,0,3,99 becomes 2,3,0,6,99);
            example!(2,4,4,5,99,0 becomes 2,4,4,5,99,9801);
            example!(1,1,1,4,99,5,6,0,99 becomes 30,1,1,4,2,5,6,0,99);
        }
    }
}

mod day5_examples {
    mod part1 {
        use crate::*;

        #[test]
        fn echo_input() {
            let template = machine![3, 0, 4, 0, 99];
            for i in -128..128 {
                assert_eq!(run_to_end(&mut template.clone(), &[i]).unwrap(), vec![i]);
            }
        }

        #[test]
        fn immediate_mode_example() {
            let mut machine = machine![1002, 4, 3, 4, 33];
            machine.start_trace();
            assert_eq!(machine.step(), Ok(StepOutcome::Running));
            assert_eq!(machine.pointer(), 4);
            assert_eq!(machine.memory().as_slice(), [1002, 4, 3, 4, 99]);
            let output = run_to_end(&mut machine, &[]).unwrap();
            assert!(output.is_empty());
            const EXPECTED: [ExpectedOp; 2] = [
                ExpectedOp::new(1002, 0, Some(99)),
                ExpectedOp::new(99, 4, None),
            ];
            let trace = machine.end_trace().unwrap();
            assert_eq!(
                trace.0[0].param_modes(),
                [
                    ParamMode::Position,
                    ParamMode::Immediate,
                    ParamMode::Immediate
                ]
            );
            validate_trace(EXPECTED, trace);
        }
    }
    mod part2 {
        use crate::*;

        #[test]
        fn comparison_examples() {
            let templates = [
                machine![3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8],
                machine![3, 9, 7, 9, 10, 9, 4, 9, 99, -1, 8],
                machine![3, 3, 1108, -1, 8, 3, 4, 3, 99],
                machine![3, 3, 1107, -1, 8, 3, 4, 3, 99],
            ];

            let expected_builder = |immediate: bool, cmp_op: OpCode, input: i64| {
                let val = i64::from(if cmp_op == OpCode::Lt {
                    input < 8
                } else {
                    input == 8
                });
                let expected = [
                    ExpectedOp::new(OpCode::In as i64, 0, Some(input)),
                    ExpectedOp::new(
                        cmp_op as i64 + if immediate { 1100 } else { 0 },
                        2,
                        Some(val),
                    ),
                    ExpectedOp::new(OpCode::Out as i64, 6, None),
                    ExpectedOp::new(OpCode::Halt as i64, 8, None),
                ];
                (expected, val)
            };

            let expected = |i: i64| {
                [
                    expected_builder(false, OpCode::Eq, i),
                    expected_builder(false, OpCode::Lt, i),
                    expected_builder(true, OpCode::Eq, i),
                    expected_builder(true, OpCode::Lt, i),
                ]
            };

            for input in [7, 8, 9] {
                let mut machines = templates.clone();
                let expected_traces = expected(input);
                for (machine, (trace, out)) in machines.iter_mut().zip(expected_traces) {
                    machine.start_trace();
                    let output = run_to_end(machine, &[input]).unwrap();
                    assert_eq!(output, vec![out]);
                    validate_trace(trace, machine.end_trace().unwrap());
                }
            }
        }

        #[test]
        fn jump_examples() {
            let templates = [
                machine![3, 12, 6, 12, 15, 1, 13, 14, 13, 4, 13, 99, -1, 0, 1, 9],
                machine![3, 3, 1105, -1, 9, 1101, 0, 0, 12, 4, 12, 99, 1],
            ];

            for i in [0, 1] {
                let mut machines = templates.clone();
                for machine in &mut machines {
                    machine.push_input(i);
                    assert_eq!(machine.step(), Ok(StepOutcome::Running));
                    machine.start_trace();
                    assert_eq!(machine.step(), Ok(StepOutcome::Running));
                }
                let modes: [Vec<ParamMode>; 2] = core::array::from_fn(|i| {
                    let Trace(trace) = machines[i].end_trace().unwrap();
                    assert_eq!(trace.len(), 1);
                    trace[0].param_modes().to_vec()
                });
                for mut machine in machines {
                    assert_eq!(run_to_end(&mut machine, &[]).unwrap(), vec![i]);
                }
                assert_eq!(
                    modes,
                    [
                        vec![ParamMode::Position; 2],
                        vec![ParamMode::Immediate, ParamMode::Immediate]
                    ]
                );
            }
        }

        #[test]
        fn larger_example() {
            let template = machine![
                3, 21, 1008, 21, 8, 20, 1005, 20, 22, 107, 8, 21, 20, 1006, 20, 31, 1106, 0, 36,
                98, 0, 0, 1002, 21, 125, 20, 4, 20, 1105, 1, 46, 104, 999, 1105, 1, 46, 1101,
                1000, 1, 20, 4, 20, 1105, 1, 46, 98, 99
            ];
            for (input, expected) in [(-5, 999), (7, 999), (8, 1000), (9, 1001), (100, 1001)] {
                let output = run_to_end(&mut template.clone(), &[input]).unwrap();
                assert_eq!(output, vec![expected]);
            }
        }
    }
}

mod day7_examples {
    const PROGRAMS: [&str; 3] = [
        "3,15,3,16,1002,16,10,16,1,16,15,15,4,15,99,0,0",
        "3,23,3,24,1002,24,10,24,1002,23,-1,23,101,5,23,23,1,24,23,23,4,23,99,0,0",
        "3,31,3,32,1002,32,10,32,1001,31,-2,31,1007,31,0,33,1002,33,7,33,1,33,31,31,1,32,31,31,\
         4,31,99,0,0,0",
    ];
    const PHASES: [[i64; 5]; 3] = [[4, 3, 2, 1, 0], [0, 1, 2, 3, 4], [1, 0, 4, 3, 2]];
    const THRUSTS: [i64; 3] = [43210, 54321, 65210];

    mod part1 {
        use super::*;
        use crate::*;

        #[test]
        fn thrust() {
            for ((program, phases), thrust) in PROGRAMS.into_iter().zip(PHASES).zip(THRUSTS) {
                let mut amps = Pipeline::from_source(5, program).unwrap();
                assert_eq!(amps.thrust(&phases), Ok(thrust));
            }
        }

        #[test]
        fn max_thrust() {
            for ((program, phases), thrust) in PROGRAMS.into_iter().zip(PHASES).zip(THRUSTS) {
                let mut amps = Pipeline::from_source(5, program).unwrap();
                assert_eq!(amps.max_thrust(0..5), Ok((thrust, phases.to_vec())));
            }
        }

        /// Each amplifier must get its own copy of memory, as the programs store their signals
        #[test]
        fn amplifiers_do_not_share_memory() {
            let mut amps = Pipeline::from_source(5, PROGRAMS[0]).unwrap();
            amps.thrust(&PHASES[0]).unwrap();
            let stored_signals = amps
                .machines()
                .iter()
                .map(|amp| amp.mem_get(15).unwrap())
                .collect_vec();
            assert_eq!(stored_signals, [4, 43, 432, 4321, 43210]);
        }
    }

    mod part2 {
        use crate::*;

        const PROGRAMS: [&str; 2] = [
            "3,26,1001,26,-4,26,3,27,1002,27,2,27,1,27,26,27,4,27,1001,28,-1,28,1005,28,6,99,0,0,5",
            "3,52,1001,52,-5,52,3,53,1,52,56,54,1007,54,5,55,1005,55,26,1001,54,-5,54,1105,1,12,1,\
             53,54,53,1008,54,0,55,1001,55,1,55,2,53,55,53,4,53,1001,56,-1,56,1005,56,6,99,0,0,0,\
             0,10",
        ];
        const PHASES: [[i64; 5]; 2] = [[9, 8, 7, 6, 5], [9, 7, 8, 5, 6]];
        const THRUSTS: [i64; 2] = [139629729, 18216];

        #[test]
        fn feedback_thrust() {
            for ((program, phases), thrust) in PROGRAMS.into_iter().zip(PHASES).zip(THRUSTS) {
                let mut amps = Pipeline::from_source(5, program).unwrap();
                assert_eq!(amps.feedback_thrust(&phases), Ok(thrust));
                assert!(amps.machines().iter().all(Machine::is_halted));
            }
        }

        #[test]
        fn max_feedback_thrust() {
            for ((program, phases), thrust) in PROGRAMS.into_iter().zip(PHASES).zip(THRUSTS) {
                let mut amps = Pipeline::from_source(5, program).unwrap();
                assert_eq!(amps.max_feedback_thrust(5..10), Ok((thrust, phases.to_vec())));
            }
        }

        /// Driving the amplifiers by hand, one output at a time, gives the same answer
        #[test]
        fn manual_feedback_loop() {
            let mut amps = vec![PROGRAMS[0].parse::<Machine>().unwrap(); 5];
            let mut signal = 0;
            for (amp, phase) in amps.iter_mut().zip_eq(PHASES[0]) {
                signal = *amp.run(Some(&[phase, signal]), true).unwrap().last().unwrap();
            }
            while !amps[4].is_halted() {
                for amp in &mut amps {
                    let seen = amp.outputs().len();
                    let outputs = amp.run(Some(&[signal]), true).unwrap();
                    if let Some(&out) = outputs.get(seen) {
                        signal = out;
                    }
                }
            }
            assert_eq!(signal, THRUSTS[0]);
        }
    }
}

#[derive(Debug)]
struct Stopped {
    #[allow(dead_code, reason = "for Debug impl")]
    output: Vec<i64>,
}
