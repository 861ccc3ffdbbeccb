// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD
#![warn(missing_docs)]

//! Library providing an Intcode virtual machine and amplifier pipelines
//!
//! The machine supports the eight arithmetic and control [Opcodes] plus `HALT`, in the two
//! [Parameter Modes] defined for the Intcode computer of [Day 5]. Execution can be suspended
//! after each output and resumed later, which is what lets several machines be chained together
//! into a [`Pipeline`](pipeline::Pipeline), as in [Day 7].
//!
//! # Example
//!
//! ```rust
//! use intcode::prelude::*;
//! let mut machine: Machine = "3,0,4,0,99".parse().unwrap();
//!
//! assert_eq!(machine.run(Some(&[1024]), false).unwrap(), [1024]);
//! assert!(machine.is_halted());
//! ```
//!
//! Chaining machines:
//!
//! ```rust
//! use intcode::prelude::*;
//! const PROGRAM: &str = "3,15,3,16,1002,16,10,16,1,16,15,15,4,15,99,0,0";
//!
//! let mut amps = Pipeline::from_source(5, PROGRAM).unwrap();
//! assert_eq!(amps.thrust(&[4, 3, 2, 1, 0]).unwrap(), 43210);
//! assert_eq!(amps.max_thrust(0..5).unwrap(), (43210, vec![4, 3, 2, 1, 0]));
//! ```
//!
//! [Opcodes]: https://esolangs.org/wiki/Intcode#Opcodes
//! [Parameter Modes]: https://esolangs.org/wiki/Intcode#Parameter_Modes
//! [Day 5]: https://adventofcode.com/2019/day/5
//! [Day 7]: https://adventofcode.com/2019/day/7

pub mod instruction;
/// A module implementing internal logic that doesn't fit cleanly into the module hierarchy
mod internals;
pub mod memory;
pub mod pipeline;
pub mod trace;

use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{self, Debug, Display};
use std::fs;
use std::io;
use std::ops::{Index, IndexMut};
use std::path::Path;
use std::str::FromStr;

pub use instruction::{DecodeError, Instruction, OpCode, ParamMode};
pub use memory::{MalformedProgram, Memory, OutOfBoundsAccess};

/// A small module that re-exports items useful when working with the Intcode machine
pub mod prelude {
    pub use crate::pipeline::{Pipeline, PipelineError};
    pub use crate::{Machine, MachineError, StepOutcome};
}

/// The outcome when a [Machine] executes a single instruction
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum StepOutcome {
    /// The instruction ran, and execution can continue
    Running,
    /// An `OUT` instruction ran and produced the contained value
    Output(i64),
    /// A `HALT` instruction was reached. No more instructions will be executed.
    Halted,
}

#[derive(Debug)]
/// A fatal error occured when executing an intcode instruction
pub enum MachineError {
    /// The instruction word at `pointer` contained an opcode outside of the instruction set
    InvalidOpcode {
        /// the offending opcode
        opcode: i64,
        /// address of the instruction word
        pointer: i64,
    },
    /// The instruction word at `pointer` had a parameter mode digit other than `0` or `1`
    UnknownMode {
        /// the offending mode digit
        mode: i64,
        /// address of the instruction word
        pointer: i64,
    },
    /// An `IN` instruction ran with no queued input and no fallback value available
    InputStarvation {
        /// address of the `IN` instruction
        pointer: i64,
    },
    /// An instruction read, wrote, or jumped to an address outside of memory
    OutOfBounds(OutOfBoundsAccess),
    /// An `ADD` or `MUL` instruction produced a result that doesn't fit in an `i64`
    Overflow {
        /// address of the instruction word
        pointer: i64,
    },
    /// An error occured with the logger
    LogFailed(io::Error),
    /// A machine was used after previously erroring out
    Poisoned,
}

impl MachineError {
    fn decode(err: DecodeError, pointer: i64) -> Self {
        match err {
            DecodeError::InvalidOpcode(opcode) => Self::InvalidOpcode { opcode, pointer },
            DecodeError::UnknownMode(mode) => Self::UnknownMode { mode, pointer },
        }
    }
}

impl PartialEq for MachineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::InvalidOpcode {
                    opcode: l_op,
                    pointer: l_ptr,
                },
                Self::InvalidOpcode {
                    opcode: r_op,
                    pointer: r_ptr,
                },
            ) => l_op == r_op && l_ptr == r_ptr,
            (
                Self::UnknownMode {
                    mode: l_mode,
                    pointer: l_ptr,
                },
                Self::UnknownMode {
                    mode: r_mode,
                    pointer: r_ptr,
                },
            ) => l_mode == r_mode && l_ptr == r_ptr,
            (
                Self::InputStarvation { pointer: lhs },
                Self::InputStarvation { pointer: rhs },
            ) => lhs == rhs,
            (Self::OutOfBounds(lhs), Self::OutOfBounds(rhs)) => lhs == rhs,
            (Self::Overflow { pointer: lhs }, Self::Overflow { pointer: rhs }) => {
                lhs == rhs
            }
            (Self::LogFailed(lhs), Self::LogFailed(rhs)) => lhs.kind() == rhs.kind(),
            (Self::Poisoned, Self::Poisoned) => true,
            _ => false,
        }
    }
}

impl Display for MachineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineError::InvalidOpcode { opcode, pointer } => {
                write!(f, "encountered unrecognized opcode {opcode} at address {pointer}")
            }
            MachineError::UnknownMode { mode, pointer } => {
                write!(f, "encountered unknown parameter mode {mode} at address {pointer}")
            }
            MachineError::InputStarvation { pointer } => {
                write!(f, "input instruction at address {pointer} found no input")
            }
            MachineError::OutOfBounds(err) => Display::fmt(err, f),
            MachineError::Overflow { pointer } => {
                write!(f, "arithmetic at address {pointer} overflowed")
            }
            MachineError::LogFailed(e) => write!(f, "logger encountered an error: {e}"),
            MachineError::Poisoned => {
                write!(f, "tried to reuse a machine after a fatal error")
            }
        }
    }
}

impl Error for MachineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MachineError::OutOfBounds(err) => Some(err),
            MachineError::LogFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<OutOfBoundsAccess> for MachineError {
    fn from(err: OutOfBoundsAccess) -> Self {
        Self::OutOfBounds(err)
    }
}

impl From<io::Error> for MachineError {
    fn from(err: io::Error) -> Self {
        Self::LogFailed(err)
    }
}

#[derive(Debug)]
/// Failure to load a program from a file
pub enum LoadError {
    /// The file couldn't be read
    Io(io::Error),
    /// The file's contents weren't a valid program
    Malformed(MalformedProgram),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "failed to read program: {e}"),
            LoadError::Malformed(e) => Display::fmt(e, f),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Malformed(e) => Some(e),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<MalformedProgram> for LoadError {
    fn from(err: MalformedProgram) -> Self {
        Self::Malformed(err)
    }
}

#[derive(Clone)]
/// An Intcode virtual machine, which provides optional tracing and logging of executed
/// instructions.
///
/// Each machine owns its memory outright, along with a pristine copy of the program it was built
/// from, which [`Machine::reset`] restores.
pub struct Machine {
    image: Memory,
    memory: Memory,
    pointer: i64,
    pending_inputs: VecDeque<i64>,
    outputs: Vec<i64>,
    halted: bool,
    poisoned: bool,
    trace: Option<trace::Trace>,
    logger: Option<trace::Logger>,
}

// ignore the trace and logger fields
impl PartialEq for Machine {
    fn eq(&self, other: &Self) -> bool {
        self.pointer == other.pointer
            && self.memory == other.memory
            && self.pending_inputs == other.pending_inputs
            && self.outputs == other.outputs
            && self.halted == other.halted
            && self.poisoned == other.poisoned
    }
}

impl Debug for Machine {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_struct("Machine")
            .field("memory", &self.memory)
            .field("ip", &self.pointer)
            .field("pending_inputs", &self.pending_inputs)
            .field("outputs", &self.outputs)
            .field("halted", &self.halted)
            .field("poisoned", &self.poisoned)
            .field("tracing", &self.trace.is_some())
            .field("logging", &self.logger.is_some())
            .finish()
    }
}

impl Index<usize> for Machine {
    type Output = i64;

    fn index(&self, i: usize) -> &Self::Output {
        self.memory.index(i)
    }
}

impl IndexMut<usize> for Machine {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        self.memory.index_mut(i)
    }
}

impl FromStr for Machine {
    type Err = MalformedProgram;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::with_memory)
    }
}

impl Machine {
    /// Create a new machine. Collects `code` into the starting memory state.
    pub fn new(code: impl IntoIterator<Item = i64>) -> Self {
        Self::with_memory(code.into_iter().collect())
    }

    fn with_memory(image: Memory) -> Self {
        Self {
            memory: image.clone(),
            image,
            pointer: 0,
            pending_inputs: VecDeque::new(),
            outputs: Vec::new(),
            halted: false,
            poisoned: false,
            trace: None,
            logger: None,
        }
    }

    /// Load a program from a file containing comma-separated integers
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file can't be read, or [`LoadError::Malformed`] if its
    /// contents can't be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Ok(fs::read_to_string(path)?.parse::<Self>()?)
    }

    /// Restore memory to the program's initial state, zero the instruction pointer, and clear the
    /// input queue, the outputs, and the halted and poisoned flags.
    ///
    /// Tracing and logging settings are left alone.
    pub fn reset(&mut self) {
        self.memory.clone_from(&self.image);
        self.pointer = 0;
        self.pending_inputs.clear();
        self.outputs.clear();
        self.halted = false;
        self.poisoned = false;
    }

    /// Replace the pending input queue with `inputs`
    pub fn set_inputs(&mut self, inputs: impl IntoIterator<Item = i64>) {
        self.pending_inputs.clear();
        self.pending_inputs.extend(inputs);
    }

    /// Append `input` to the pending input queue
    pub fn push_input(&mut self, input: i64) {
        self.pending_inputs.push_back(input);
    }

    /// Inputs that have been queued but not consumed yet, in the order they'll be consumed
    pub fn pending_inputs(&self) -> impl ExactSizeIterator<Item = i64> + '_ {
        self.pending_inputs.iter().copied()
    }

    /// Every value output since construction or the last [`reset`](Machine::reset)
    #[must_use]
    pub fn outputs(&self) -> &[i64] {
        &self.outputs
    }

    /// Address of the next instruction to execute
    #[must_use]
    pub fn pointer(&self) -> i64 {
        self.pointer
    }

    /// Whether a `HALT` instruction has been executed
    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Whether execution has failed. A poisoned machine won't run again until it's reset.
    #[must_use]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// A view of the machine's memory
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Manually set a memory location to a provided value
    ///
    /// # Errors
    ///
    /// if `location` is outside of memory, returns an [`OutOfBoundsAccess`] error
    #[doc(alias("poke", "write"))]
    #[inline]
    pub fn mem_override(&mut self, location: i64, value: i64) -> Result<(), OutOfBoundsAccess> {
        self.memory.set(location, value)
    }

    /// Get the memory at `address`.
    ///
    /// # Errors
    ///
    /// if `address` is outside of memory, returns an [`OutOfBoundsAccess`] error
    #[doc(alias = "peek")]
    #[inline]
    pub fn mem_get(&self, address: i64) -> Result<i64, OutOfBoundsAccess> {
        self.memory.get(address)
    }

    /// Run a single instruction, consuming from the pending input queue if it's an `IN`
    ///
    /// ```
    /// use intcode::prelude::*;
    /// let mut machine = Machine::new([1002, 4, 3, 4, 33]);
    /// assert_eq!(machine.step(), Ok(StepOutcome::Running));
    /// assert_eq!(machine.memory().as_slice(), [1002, 4, 3, 4, 99]);
    /// assert_eq!(machine.pointer(), 4);
    /// assert_eq!(machine.step(), Ok(StepOutcome::Halted));
    /// ```
    ///
    /// # Errors
    ///
    /// If the machine has previously failed, returns [`MachineError::Poisoned`] before attempting
    /// to do anything.
    ///
    /// Otherwise, if any of the following conditions occur, it marks itself as poisoned and
    /// returns the listed [`MachineError`] variant:
    ///
    /// | Condition                                      | Error type          |
    /// |------------------------------------------------|---------------------|
    /// | Opcode is not in the instruction set           | [`InvalidOpcode`]   |
    /// | Mode digit is not `0` or `1`                   | [`UnknownMode`]     |
    /// | `IN` runs with nothing queued                  | [`InputStarvation`] |
    /// | Instruction touches an address outside memory  | [`OutOfBounds`]     |
    /// | `ADD` or `MUL` result overflows an `i64`       | [`Overflow`]        |
    /// | Writing to the logger fails                    | [`LogFailed`]       |
    ///
    /// [`InvalidOpcode`]: MachineError::InvalidOpcode
    /// [`UnknownMode`]: MachineError::UnknownMode
    /// [`InputStarvation`]: MachineError::InputStarvation
    /// [`OutOfBounds`]: MachineError::OutOfBounds
    /// [`Overflow`]: MachineError::Overflow
    /// [`LogFailed`]: MachineError::LogFailed
    #[doc(alias("exec_instruction"))]
    pub fn step(&mut self) -> Result<StepOutcome, MachineError> {
        self.exec_instruction(&mut || None::<i64>)
    }

    /// Execute until the program halts, or, if `stop_after_first_output` is set, until an output
    /// instruction runs. Returns every output the machine has produced so far.
    ///
    /// If `inputs` is [`Some`], its contents *replace* the pending input queue before anything
    /// runs. Stopping after an output leaves the machine exactly where it was, so a later call
    /// picks up from the next instruction. Running a halted machine does nothing.
    ///
    /// ```
    /// use intcode::prelude::*;
    /// let mut machine = Machine::new([3, 0, 4, 0, 3, 0, 4, 0, 99]);
    /// assert_eq!(machine.run(Some(&[5]), true).unwrap(), [5]);
    /// assert_eq!(machine.run(Some(&[7]), true).unwrap(), [5, 7]);
    /// assert_eq!(machine.run(None, true).unwrap(), [5, 7]);
    /// assert!(machine.is_halted());
    /// ```
    ///
    /// # Errors
    ///
    /// If an internal call to [`self.step`][Machine::step] fails, returns the resulting
    /// [`MachineError`] unchanged.
    pub fn run(
        &mut self,
        inputs: Option<&[i64]>,
        stop_after_first_output: bool,
    ) -> Result<&[i64], MachineError> {
        self.run_with_fallback(inputs, stop_after_first_output, || None)
    }

    /// Like [`Machine::run`], but when an `IN` instruction finds the queue empty, `fallback` is
    /// called for a value. If it returns [`None`], the machine fails with
    /// [`MachineError::InputStarvation`].
    ///
    /// ```
    /// use intcode::prelude::*;
    /// let mut machine = Machine::new([3, 0, 3, 1, 1, 0, 1, 0, 4, 0, 99]);
    /// let mut extra = [20, 30].into_iter();
    /// let out = machine.run_with_fallback(Some(&[10]), false, || extra.next()).unwrap();
    /// assert_eq!(out, [30]);
    /// ```
    ///
    /// # Errors
    ///
    /// See [`Machine::run`]
    pub fn run_with_fallback(
        &mut self,
        inputs: Option<&[i64]>,
        stop_after_first_output: bool,
        mut fallback: impl FnMut() -> Option<i64>,
    ) -> Result<&[i64], MachineError> {
        if let Some(inputs) = inputs {
            self.set_inputs(inputs.iter().copied());
        }
        loop {
            match self.exec_instruction(&mut fallback)? {
                StepOutcome::Running => (),
                StepOutcome::Output(_) if stop_after_first_output => break,
                StepOutcome::Output(_) => (),
                StepOutcome::Halted => break,
            }
        }
        Ok(&self.outputs)
    }

    fn exec_instruction(
        &mut self,
        fallback: &mut dyn FnMut() -> Option<i64>,
    ) -> Result<StepOutcome, MachineError> {
        if self.poisoned {
            return Err(MachineError::Poisoned);
        }

        if self.halted {
            return Ok(StepOutcome::Halted);
        }

        let outcome = self.dispatch(fallback);
        if outcome.is_err() {
            self.poisoned = true;
        }
        outcome
    }

    fn dispatch(
        &mut self,
        fallback: &mut dyn FnMut() -> Option<i64>,
    ) -> Result<StepOutcome, MachineError> {
        let word = self.memory.get(self.pointer)?;
        let instr =
            Instruction::decode(word).map_err(|e| MachineError::decode(e, self.pointer))?;

        match instr.opcode() {
            OpCode::Add => self.op3(word, instr, i64::checked_add),
            OpCode::Mul => self.op3(word, instr, i64::checked_mul),
            OpCode::In => self.input(word, instr, fallback),
            OpCode::Out => self.output(word, instr),
            OpCode::Jnz => self.jump(word, instr, |i| i != 0),
            OpCode::Jz => self.jump(word, instr, |i| i == 0),
            OpCode::Lt => self.op3(word, instr, |a, b| Some(i64::from(a < b))),
            OpCode::Eq => self.op3(word, instr, |a, b| Some(i64::from(a == b))),
            OpCode::Halt => {
                self.record(word, instr, &[])?;
                self.halted = true;
                Ok(StepOutcome::Halted)
            }
        }
    }
}
