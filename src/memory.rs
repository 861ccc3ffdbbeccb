// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use std::error::Error;
use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// A flat, fixed-size Intcode memory tape
///
/// Addresses are `i64`s, as they come straight out of program memory. Every access is
/// bounds-checked, and the tape never grows.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Memory(Vec<i64>);

impl Memory {
    fn slot(&self, address: i64) -> Result<usize, OutOfBoundsAccess> {
        usize::try_from(address)
            .ok()
            .filter(|&i| i < self.0.len())
            .ok_or(OutOfBoundsAccess {
                address,
                len: self.0.len(),
            })
    }

    /// Read the value at `address`
    ///
    /// # Errors
    ///
    /// If `address` is negative or past the end of memory, returns [`OutOfBoundsAccess`]
    pub fn get(&self, address: i64) -> Result<i64, OutOfBoundsAccess> {
        self.slot(address).map(|i| self.0[i])
    }

    /// Write `value` to `address`
    ///
    /// # Errors
    ///
    /// If `address` is negative or past the end of memory, returns [`OutOfBoundsAccess`]
    pub fn set(&mut self, address: i64, value: i64) -> Result<(), OutOfBoundsAccess> {
        let i = self.slot(address)?;
        self.0[i] = value;
        Ok(())
    }

    /// Check that `address` exists without reading it
    ///
    /// # Errors
    ///
    /// If `address` is negative or past the end of memory, returns [`OutOfBoundsAccess`]
    pub fn check(&self, address: i64) -> Result<(), OutOfBoundsAccess> {
        self.slot(address).map(|_| ())
    }

    /// Number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the tape has no cells at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View the whole tape
    #[must_use]
    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }
}

impl FromIterator<i64> for Memory {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for Memory {
    type Err = MalformedProgram;

    /// Parse comma-separated base-10 integers. Whitespace around each token is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .enumerate()
            .map(|(position, token)| {
                token.parse().map_err(|source| MalformedProgram {
                    position,
                    token: Box::from(token),
                    source,
                })
            })
            .collect()
    }
}

impl Index<usize> for Memory {
    type Output = i64;
    fn index(&self, i: usize) -> &i64 {
        &self.0[i]
    }
}

impl IndexMut<usize> for Memory {
    fn index_mut(&mut self, i: usize) -> &mut i64 {
        &mut self.0[i]
    }
}

impl fmt::Debug for Memory {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_list().entries(&self.0).finish()
    }
}

impl Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cells = self.0.iter();
        if let Some(first) = cells.next() {
            write!(f, "{first}")?;
            for cell in cells {
                write!(f, ",{cell}")?;
            }
        }
        Ok(())
    }
}

/// An address outside of the allocated memory was read or written
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct OutOfBoundsAccess {
    /// the address that was accessed
    pub address: i64,
    /// the size of memory at the time
    pub len: usize,
}

impl Display for OutOfBoundsAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "address {} is outside of memory (size {})",
            self.address, self.len
        )
    }
}

impl Error for OutOfBoundsAccess {}

/// Program text contained a token that isn't an integer
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MalformedProgram {
    /// 0-based index of the bad token within the comma-separated list
    pub position: usize,
    /// the bad token, with surrounding whitespace removed
    pub token: Box<str>,
    source: ParseIntError,
}

impl Display for MalformedProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "malformed program: token {} ({:?}) is not an integer",
            self.position, self.token
        )
    }
}

impl Error for MalformedProgram {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}
