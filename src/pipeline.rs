// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Chains of [Machine]s, each one's output feeding the next one's input
//!
//! Every machine in a [Pipeline] is given a *phase setting* as its first input, then the signal
//! produced by the previous stage (or `0` for the first stage). The final stage's output is the
//! pipeline's *thrust*.

use std::error::Error;
use std::fmt::{self, Display};

use itertools::Itertools;

use crate::{Machine, MachineError, MalformedProgram};

#[derive(Debug, PartialEq)]
/// An error that prevented a pipeline from producing a thrust value
pub enum PipelineError {
    /// The number of phase settings didn't match the number of machines
    ArityMismatch {
        /// number of machines in the pipeline
        machines: usize,
        /// number of phase settings provided
        phases: usize,
    },
    /// The pipeline has no machines in it
    Empty,
    /// The machine at `stage` halted without producing a signal
    NoOutput {
        /// index of the machine within the pipeline
        stage: usize,
    },
    /// The machine at `stage` failed
    Machine {
        /// index of the machine within the pipeline
        stage: usize,
        /// what went wrong
        source: MachineError,
    },
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::ArityMismatch { machines, phases } => write!(
                f,
                "pipeline has {machines} machines, but {phases} phase settings were given"
            ),
            PipelineError::Empty => write!(f, "pipeline has no machines"),
            PipelineError::NoOutput { stage } => {
                write!(f, "stage {stage} halted without producing a signal")
            }
            PipelineError::Machine { stage, source } => write!(f, "stage {stage} failed: {source}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Machine { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A series of independent machines, run in sequence
#[derive(Debug, Clone)]
pub struct Pipeline {
    machines: Vec<Machine>,
}

impl Pipeline {
    /// Build a pipeline out of already-constructed machines
    #[must_use]
    pub fn new(machines: Vec<Machine>) -> Self {
        Self { machines }
    }

    /// Build a pipeline of `count` machines, each with its own copy of the program in `source`
    ///
    /// # Errors
    ///
    /// If `source` isn't a valid program, returns the [`MalformedProgram`] error
    pub fn from_source(count: usize, source: &str) -> Result<Self, MalformedProgram> {
        let machine: Machine = source.parse()?;
        Ok(Self::new(vec![machine; count]))
    }

    /// The machines, in the order signals pass through them
    #[must_use]
    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    /// Mutable access to the machines, e.g. to attach loggers
    pub fn machines_mut(&mut self) -> &mut [Machine] {
        &mut self.machines
    }

    /// Number of machines in the pipeline
    #[must_use]
    pub fn len(&self) -> usize {
        self.machines.len()
    }

    /// Whether the pipeline has no machines
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    fn prepare(&mut self, phases: &[i64]) -> Result<(), PipelineError> {
        if self.machines.len() != phases.len() {
            return Err(PipelineError::ArityMismatch {
                machines: self.machines.len(),
                phases: phases.len(),
            });
        }
        if self.machines.is_empty() {
            return Err(PipelineError::Empty);
        }
        self.machines.iter_mut().for_each(Machine::reset);
        Ok(())
    }

    /// Run `inputs` through the machine at `stage` until it outputs or halts, returning the new
    /// output if there was one
    fn advance(&mut self, stage: usize, inputs: &[i64]) -> Result<Option<i64>, PipelineError> {
        let machine = &mut self.machines[stage];
        let seen = machine.outputs().len();
        let outputs = machine
            .run(Some(inputs), true)
            .map_err(|source| PipelineError::Machine { stage, source })?;
        Ok(outputs.get(seen).copied())
    }

    /// Reset every machine, then pass a signal through each one in order, returning the last
    /// machine's output.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ArityMismatch`] before running anything if `phases` doesn't have
    /// one entry per machine. Also fails if any machine fails or halts without output.
    pub fn thrust(&mut self, phases: &[i64]) -> Result<i64, PipelineError> {
        self.prepare(phases)?;
        let mut signal = 0;
        for (stage, &phase) in phases.iter().enumerate() {
            signal = self
                .advance(stage, &[phase, signal])?
                .ok_or(PipelineError::NoOutput { stage })?;
        }
        Ok(signal)
    }

    /// Like [`Pipeline::thrust`], but the last machine's output is fed back into the first
    /// machine, round after round, until the last machine halts. Each machine resumes where it
    /// left off, and only gets its phase setting in the first round.
    ///
    /// A machine that halts without output passes the signal it was given on unchanged.
    ///
    /// ```
    /// use intcode::prelude::*;
    /// const PROGRAM: &str = "3,26,1001,26,-4,26,3,27,1002,27,2,27,1,27,26,\
    ///     27,4,27,1001,28,-1,28,1005,28,6,99,0,0,5";
    /// let mut amps = Pipeline::from_source(5, PROGRAM).unwrap();
    /// assert_eq!(amps.feedback_thrust(&[9, 8, 7, 6, 5]).unwrap(), 139629729);
    /// ```
    ///
    /// # Errors
    ///
    /// See [`Pipeline::thrust`]. [`PipelineError::NoOutput`] is only returned if the last machine
    /// halts without ever producing a signal.
    pub fn feedback_thrust(&mut self, phases: &[i64]) -> Result<i64, PipelineError> {
        self.prepare(phases)?;
        let last = self.machines.len() - 1;
        let mut signal = 0;
        for (stage, &phase) in phases.iter().enumerate() {
            if let Some(out) = self.advance(stage, &[phase, signal])? {
                signal = out;
            }
        }
        while !self.machines[last].is_halted() {
            for stage in 0..=last {
                if let Some(out) = self.advance(stage, &[signal])? {
                    signal = out;
                }
            }
        }
        self.machines[last]
            .outputs()
            .last()
            .copied()
            .ok_or(PipelineError::NoOutput { stage: last })
    }

    /// Try every ordering of `phases` with [`Pipeline::thrust`], returning the highest thrust and
    /// the ordering that produced it. On a tie, the ordering found first wins.
    ///
    /// # Errors
    ///
    /// Fails on the first error any ordering runs into.
    pub fn max_thrust(
        &mut self,
        phases: impl IntoIterator<Item = i64>,
    ) -> Result<(i64, Vec<i64>), PipelineError> {
        self.search(phases, Self::thrust)
    }

    /// Try every ordering of `phases` with [`Pipeline::feedback_thrust`], returning the highest
    /// thrust and the ordering that produced it. On a tie, the ordering found first wins.
    ///
    /// # Errors
    ///
    /// Fails on the first error any ordering runs into.
    pub fn max_feedback_thrust(
        &mut self,
        phases: impl IntoIterator<Item = i64>,
    ) -> Result<(i64, Vec<i64>), PipelineError> {
        self.search(phases, Self::feedback_thrust)
    }

    fn search(
        &mut self,
        phases: impl IntoIterator<Item = i64>,
        mut eval: impl FnMut(&mut Self, &[i64]) -> Result<i64, PipelineError>,
    ) -> Result<(i64, Vec<i64>), PipelineError> {
        let phases: Vec<i64> = phases.into_iter().collect();
        if phases.len() != self.machines.len() {
            return Err(PipelineError::ArityMismatch {
                machines: self.machines.len(),
                phases: phases.len(),
            });
        }
        let mut best: Option<(i64, Vec<i64>)> = None;
        for settings in phases.iter().copied().permutations(phases.len()) {
            let thrust = eval(&mut *self, &settings)?;
            if best.as_ref().is_none_or(|(top, _)| thrust > *top) {
                best = Some((thrust, settings));
            }
        }
        best.ok_or(PipelineError::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT: &str = "3,11,3,12,2,11,12,13,4,13,99,0,0,0";
    const SUM: &str = "3,11,3,12,1,11,12,13,4,13,99,0,0,0";

    #[test]
    fn arity_checked_before_running() {
        let mut pipeline = Pipeline::from_source(3, PRODUCT).unwrap();
        assert_eq!(
            pipeline.thrust(&[1, 2]),
            Err(PipelineError::ArityMismatch {
                machines: 3,
                phases: 2
            })
        );
        assert!(pipeline.machines().iter().all(|m| m.pointer() == 0));
        assert_eq!(
            pipeline.max_thrust(0..4),
            Err(PipelineError::ArityMismatch {
                machines: 3,
                phases: 4
            })
        );
    }

    #[test]
    fn empty_pipeline() {
        let mut pipeline = Pipeline::new(Vec::new());
        assert_eq!(pipeline.thrust(&[]), Err(PipelineError::Empty));
        assert_eq!(pipeline.max_thrust([]), Err(PipelineError::Empty));
    }

    #[test]
    fn signal_threads_through_stages() {
        let mut pipeline = Pipeline::from_source(3, PRODUCT).unwrap();
        assert_eq!(pipeline.thrust(&[2, 3, 4]), Ok(0));
        let mut pipeline = Pipeline::from_source(3, SUM).unwrap();
        assert_eq!(pipeline.thrust(&[2, 3, 4]), Ok(9));
        // rerunning resets every machine first
        assert_eq!(pipeline.thrust(&[2, 3, 4]), Ok(9));
    }

    #[test]
    fn first_best_ordering_wins_ties() {
        // every ordering sums to the same thing
        let mut pipeline = Pipeline::from_source(3, SUM).unwrap();
        assert_eq!(pipeline.max_thrust([5, 1, 3]), Ok((9, vec![5, 1, 3])));
    }

    #[test]
    fn silent_stage() {
        let mut pipeline = Pipeline::from_source(2, "3,0,3,0,99").unwrap();
        assert_eq!(
            pipeline.thrust(&[0, 1]),
            Err(PipelineError::NoOutput { stage: 0 })
        );
    }

    #[test]
    fn failing_stage() {
        let mut pipeline = Pipeline::new(vec![
            Machine::new([3, 0, 3, 0, 4, 0, 99]),
            Machine::new([3, 0, 99]),
        ]);
        assert_eq!(
            pipeline.thrust(&[7, 7]),
            Err(PipelineError::NoOutput { stage: 1 })
        );
        let mut pipeline = Pipeline::new(vec![
            Machine::new([3, 0, 3, 0, 4, 0, 99]),
            Machine::new([3, 0, 3, 0, 3, 0, 99]),
        ]);
        assert_eq!(
            pipeline.thrust(&[7, 7]),
            Err(PipelineError::Machine {
                stage: 1,
                source: MachineError::InputStarvation { pointer: 4 }
            })
        );
    }
}
