// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! The instruction set: opcodes, parameter modes, and decoding of instruction words

use std::error::Error;
use std::fmt::{self, Display};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// An Intcode `OpCode`
///
/// The discriminant of each variant is the opcode's numeric value in an instruction word.
#[allow(missing_docs, reason = "trivial")]
pub enum OpCode {
    Add = 1,
    Mul = 2,
    In = 3,
    Out = 4,
    Jnz = 5,
    Jz = 6,
    Lt = 7,
    Eq = 8,
    Halt = 99,
}

impl OpCode {
    /// The number of parameters that follow an instruction with this opcode
    #[must_use]
    pub const fn param_count(self) -> usize {
        match self {
            Self::Add | Self::Mul | Self::Lt | Self::Eq => 3,
            Self::Jnz | Self::Jz => 2,
            Self::In | Self::Out => 1,
            Self::Halt => 0,
        }
    }

    /// Whether the last parameter of this opcode names a memory location to write
    #[must_use]
    pub const fn writes_memory(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Mul | Self::In | Self::Lt | Self::Eq
        )
    }
}

impl TryFrom<i64> for OpCode {
    type Error = i64;
    fn try_from(i: i64) -> Result<Self, Self::Error> {
        match i {
            1 => Ok(Self::Add),
            2 => Ok(Self::Mul),
            3 => Ok(Self::In),
            4 => Ok(Self::Out),
            5 => Ok(Self::Jnz),
            6 => Ok(Self::Jz),
            7 => Ok(Self::Lt),
            8 => Ok(Self::Eq),
            99 => Ok(Self::Halt),
            _ => Err(i),
        }
    }
}

impl Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "ADD"),
            Self::Mul => write!(f, "MUL"),
            Self::In => write!(f, "IN"),
            Self::Out => write!(f, "OUT"),
            Self::Jnz => write!(f, "JNZ"),
            Self::Jz => write!(f, "JZ"),
            Self::Lt => write!(f, "LT"),
            Self::Eq => write!(f, "EQ"),
            Self::Halt => write!(f, "HALT"),
        }
    }
}

/// Parameter mode for an Intcode instruction
///
/// When executing an intcode instruction, the instruction's parameters are interpreted in
/// accordance with their associated modes.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ParamMode {
    /// Position Mode
    ///
    /// A parameter in position mode evaluates to the value at the address specified by the
    /// parameter.
    Position = 0,
    /// Immediate Mode
    ///
    /// A parameter in immediate mode evaluates directly to the value specified. Destination
    /// parameters are always decoded in this mode, as the literal operand *is* the address to
    /// write to.
    #[doc(alias = "#")]
    Immediate = 1,
}

impl Display for ParamMode {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamMode::Position => Ok(()),
            ParamMode::Immediate => write!(fmt, "#"),
        }
    }
}

impl TryFrom<i64> for ParamMode {
    type Error = DecodeError;
    fn try_from(i: i64) -> Result<Self, Self::Error> {
        match i {
            0 => Ok(ParamMode::Position),
            1 => Ok(ParamMode::Immediate),
            _ => Err(DecodeError::UnknownMode(i)),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// An error encountered while decoding an instruction word
pub enum DecodeError {
    /// The low two digits did not name an opcode in the instruction set
    InvalidOpcode(i64),
    /// A parameter mode digit was neither `0` nor `1`
    UnknownMode(i64),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::InvalidOpcode(n) => write!(f, "unrecognized opcode {n}"),
            DecodeError::UnknownMode(n) => write!(f, "unknown parameter mode {n}"),
        }
    }
}

impl Error for DecodeError {}

/// A decoded instruction word: an [`OpCode`] and one [`ParamMode`] per parameter
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Instruction {
    opcode: OpCode,
    modes: [ParamMode; 3],
}

impl Instruction {
    /// Decode an instruction word.
    ///
    /// Given a 5 digit number, digits ABCDE are used as follows:
    /// DE is the two-digit opcode
    /// C is the 1st parameter's mode
    /// B is the 2nd parameter's mode
    /// A is the 3rd parameter's mode
    ///
    /// Missing digits are `0`. Only as many mode digits as the opcode has parameters are read,
    /// and the mode of a destination parameter is always [`ParamMode::Immediate`], whatever its
    /// digit says.
    ///
    /// ```
    /// use intcode::instruction::{Instruction, OpCode, ParamMode};
    /// let instr = Instruction::decode(1002).unwrap();
    /// assert_eq!(instr.opcode(), OpCode::Mul);
    /// assert_eq!(
    ///     instr.modes(),
    ///     [ParamMode::Position, ParamMode::Immediate, ParamMode::Immediate]
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidOpcode`] if `word % 100` is not in the instruction set, or
    /// [`DecodeError::UnknownMode`] if a mode digit for a value-read parameter is not `0` or `1`.
    pub fn decode(word: i64) -> Result<Self, DecodeError> {
        let opcode = OpCode::try_from(word % 100).map_err(DecodeError::InvalidOpcode)?;
        let count = opcode.param_count();
        // a negative word can't get this far, so the remaining digits are all non-negative
        let mut digits = word / 100;
        let mut modes = [ParamMode::Position; 3];
        for (i, mode) in modes.iter_mut().take(count).enumerate() {
            if opcode.writes_memory() && i == count - 1 {
                *mode = ParamMode::Immediate;
            } else {
                *mode = ParamMode::try_from(digits % 10)?;
            }
            digits /= 10;
        }
        Ok(Self { opcode, modes })
    }

    /// The decoded [`OpCode`]
    #[must_use]
    pub const fn opcode(&self) -> OpCode {
        self.opcode
    }

    /// The parameter modes, one per parameter
    #[must_use]
    pub fn modes(&self) -> &[ParamMode] {
        &self.modes[..self.opcode.param_count()]
    }

    /// Number of memory cells the instruction occupies, including the instruction word itself
    #[must_use]
    #[allow(clippy::cast_possible_wrap, reason = "never more than 3")]
    pub const fn width(&self) -> i64 {
        1 + self.opcode.param_count() as i64
    }
}
