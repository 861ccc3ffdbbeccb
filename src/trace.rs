// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Tracing and logging of executed instructions
use std::fmt::{self, Debug, Display};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use super::Machine;
use crate::instruction::{Instruction, OpCode, ParamMode};

/// A parameter as it appeared in memory, paired with what it resolved to
type Resolved = (i64, i64);

#[derive(Clone, Copy)]
enum TracedOp {
    Add(Resolved, Resolved, Resolved),
    Mul(Resolved, Resolved, Resolved),
    In(Resolved),
    Out(Resolved),
    Jnz(Resolved, Resolved),
    Jz(Resolved, Resolved),
    Lt(Resolved, Resolved, Resolved),
    Eq(Resolved, Resolved, Resolved),
    Halt,
}

#[derive(Clone)]
/// An opaque type containing information about what instruction was executed, which can be queried
/// with its various methods, or converted into a [String] using its [Display] impl.
pub struct TracedInstr {
    op: TracedOp,
    instr_word: i64,
    pointer: i64,
    instruction: Instruction,
}

impl TracedInstr {
    /// Return the instruction pointer's position when the traced instruction was executed
    pub fn pointer(&self) -> i64 {
        self.pointer
    }

    /// Return the actual integer of the traced instruction
    pub fn instr_word(&self) -> i64 {
        self.instr_word
    }

    /// Return the opcode of the traced instruction
    pub fn opcode(&self) -> OpCode {
        self.instruction.opcode()
    }

    /// If the instruction stored a value, return that value
    pub fn stored_val(&self) -> Option<i64> {
        match self.op {
            TracedOp::Add(_, _, (_, v))
            | TracedOp::Mul(_, _, (_, v))
            | TracedOp::Lt(_, _, (_, v))
            | TracedOp::Eq(_, _, (_, v))
            | TracedOp::In((_, v)) => Some(v),
            _ => None,
        }
    }

    /// Return the parameter modes of the traced instruction, one per parameter
    pub fn param_modes(&self) -> &[ParamMode] {
        self.instruction.modes()
    }

    pub(super) fn build(
        instr_word: i64,
        pointer: i64,
        instruction: Instruction,
        resolved_params: &[Resolved],
    ) -> Self {
        macro_rules! op {
            {$id: ident(_, _, _)} => {{
                debug_assert_eq!(resolved_params.len(), 3);
                TracedOp::$id(resolved_params[0], resolved_params[1], resolved_params[2])
            }};
            {$id: ident(_, _)} => {{
                debug_assert_eq!(resolved_params.len(), 2);
                TracedOp::$id(resolved_params[0], resolved_params[1])
            }};
            {$id: ident(_)} => {{
                debug_assert_eq!(resolved_params.len(), 1);
                TracedOp::$id(resolved_params[0])
            }};
            {$id: ident} => {{
                debug_assert_eq!(resolved_params.len(), 0);
                TracedOp::$id
            }}
        }

        let op = match instruction.opcode() {
            OpCode::Add => op! { Add(_, _, _) },
            OpCode::Mul => op! { Mul(_, _, _) },
            OpCode::In => op! { In(_) },
            OpCode::Out => op! { Out(_) },
            OpCode::Jnz => op! { Jnz(_, _) },
            OpCode::Jz => op! { Jz(_, _) },
            OpCode::Lt => op! { Lt(_, _, _) },
            OpCode::Eq => op! { Eq(_, _, _) },
            OpCode::Halt => op! { Halt },
        };
        Self {
            op,
            instr_word,
            pointer,
            instruction,
        }
    }
}

/// Shared sink for per-instruction log lines
pub(crate) type Logger = Arc<Mutex<dyn Write + Send>>;

impl Machine {
    /// Begin a [Trace] of executed instructions. If a trace is already running, this replaces that
    /// trace and returns in a [`Some`], otherwise, it returns [`None`].
    ///
    /// # Example
    /// ```
    /// use intcode::prelude::*;
    /// let mut machine = Machine::new([1101, 90, 9, 4, 3]);
    /// machine.start_trace();
    /// machine.run(None, false).unwrap();
    /// let trace = machine.end_trace().unwrap();
    /// assert_eq!(trace.0.len(), 2);
    /// assert_eq!(trace.0[0].stored_val(), Some(99));
    /// ```
    pub fn start_trace(&mut self) -> Option<Trace> {
        self.trace.replace(Trace::new())
    }

    /// Stop tracing executed instructions into a [Trace]. If no trace was active, returns [`None`]
    ///
    /// see [Machine::start_trace]
    pub fn end_trace(&mut self) -> Option<Trace> {
        self.trace.take()
    }

    /// Get a view of the current trace
    pub fn show_trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Log each executed instruction as a line written to `logger`.
    ///
    /// Clones of this machine share the same logger.
    pub fn log_with(&mut self, logger: impl Write + Send + 'static) {
        let logger: Logger = Arc::new(Mutex::new(logger));
        self.logger = Some(logger);
    }

    /// Stop logging, dropping the logger
    pub fn stop_logging(&mut self) {
        self.logger = None;
    }

    /// Record the instruction about to finish executing in the trace and the log, if either is
    /// active. Must be called before the instruction writes to memory or moves the pointer.
    pub(crate) fn record(
        &mut self,
        instr_word: i64,
        instruction: Instruction,
        resolved_params: &[Resolved],
    ) -> io::Result<()> {
        if self.trace.is_none() && self.logger.is_none() {
            return Ok(());
        }
        let traced = TracedInstr::build(instr_word, self.pointer, instruction, resolved_params);
        if let Some(ref logger) = self.logger {
            let mut logger = logger.lock().unwrap_or_else(PoisonError::into_inner);
            writeln!(logger, "{traced}")?;
        }
        if let Some(trace) = self.trace.as_mut() {
            trace.0.push(traced);
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
/// A log of instructions that a [Machine] has executed since a call to [Machine::start_trace]
///
/// see [Machine::start_trace]
pub struct Trace(pub Vec<TracedInstr>);

impl Trace {
    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }
}

impl Debug for TracedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        macro_rules! arg {
            ($arg: ident) => {
                format_args!("{} => {}", $arg.0, $arg.1)
            };
        }
        macro_rules! variant {
            ($name: literal, ($($arg: ident),*)) => {
                f.debug_tuple($name)
                $(.field(&arg!($arg) ))*
                .finish()
            }
        }
        match self {
            Self::Add(a0, a1, a2) => variant!("Add", (a0, a1, a2)),
            Self::Mul(a0, a1, a2) => variant!("Mul", (a0, a1, a2)),
            Self::In(a0) => variant!("In", (a0)),
            Self::Out(a0) => variant!("Out", (a0)),
            Self::Jnz(a0, a1) => variant!("Jnz", (a0, a1)),
            Self::Jz(a0, a1) => variant!("Jz", (a0, a1)),
            Self::Lt(a0, a1, a2) => variant!("Lt", (a0, a1, a2)),
            Self::Eq(a0, a1, a2) => variant!("Eq", (a0, a1, a2)),
            Self::Halt => write!(f, "Halt"),
        }
    }
}

impl Debug for TracedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedInstr")
            .field("op", &self.op)
            .field("instr_word", &self.instr_word)
            .field("pointer", &self.pointer)
            .field("modes", &self.instruction.modes())
            .finish()
    }
}

impl Display for TracedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ran instruction at {:0>4}: word {: <5} | ",
            self.pointer, self.instr_word
        )?;
        let opcode = self.instruction.opcode();
        let modes = self.instruction.modes();

        match self.op {
            TracedOp::Add((pa, va), (pb, vb), (dest, val))
            | TracedOp::Mul((pa, va), (pb, vb), (dest, val))
            | TracedOp::Lt((pa, va), (pb, vb), (dest, val))
            | TracedOp::Eq((pa, va), (pb, vb), (dest, val)) => {
                write!(
                    f,
                    "[{opcode} {}{pa} (resolves to {va}), {}{pb} (resolves to {vb}), {dest} (stored {val})]",
                    modes[0], modes[1],
                )
            }
            TracedOp::Jnz((p_cond, v_cond), (p_dest, v_dest))
            | TracedOp::Jz((p_cond, v_cond), (p_dest, v_dest)) => {
                let jumped = (opcode == OpCode::Jnz) == (v_cond != 0);
                write!(
                    f,
                    "[{opcode} {}{p_cond} (resolves to {v_cond}), {}{p_dest} ({} to {v_dest})]",
                    modes[0],
                    modes[1],
                    if jumped { "jumped" } else { "didn't jump" }
                )
            }
            TracedOp::In((p, v)) => {
                write!(f, "[{opcode} {p} (stored input {v})]")
            }
            TracedOp::Out((p, v)) => {
                write!(f, "[{opcode} {}{p} (output {v})]", modes[0])
            }
            TracedOp::Halt => {
                write!(f, "[HALT]")
            }
        }
    }
}
