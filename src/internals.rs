// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

use super::*;

impl Machine {
    /// The raw operand `offset` cells after the current instruction word
    pub(crate) fn operand(&self, offset: i64) -> Result<i64, OutOfBoundsAccess> {
        self.memory.get(self.pointer + offset)
    }

    /// Resolves the `offset`th parameter according to `mode`, returning both the raw operand and
    /// the value it resolved to
    pub(crate) fn resolve_param(
        &self,
        mode: ParamMode,
        offset: i64,
    ) -> Result<(i64, i64), OutOfBoundsAccess> {
        let raw = self.operand(offset)?;
        match mode {
            ParamMode::Position => self.memory.get(raw).map(|val| (raw, val)),
            ParamMode::Immediate => Ok((raw, raw)),
        }
    }

    /// Resolves the `offset`th parameter as a destination address, which must exist
    pub(crate) fn resolve_dest(&self, offset: i64) -> Result<i64, OutOfBoundsAccess> {
        let dest = self.operand(offset)?;
        self.memory.check(dest)?;
        Ok(dest)
    }

    /// common logic of all 4 instructions that take 3 parameters
    pub(crate) fn op3(
        &mut self,
        word: i64,
        instr: Instruction,
        operation: impl Fn(i64, i64) -> Option<i64>,
    ) -> Result<StepOutcome, MachineError> {
        let modes = instr.modes();
        let a = self.resolve_param(modes[0], 1)?;
        let b = self.resolve_param(modes[1], 2)?;
        let dest = self.resolve_dest(3)?;
        let val = operation(a.1, b.1).ok_or(MachineError::Overflow {
            pointer: self.pointer,
        })?;
        self.record(word, instr, &[a, b, (dest, val)])?;
        self.memory.set(dest, val)?;
        self.pointer += instr.width();
        Ok(StepOutcome::Running)
    }

    pub(crate) fn jump(
        &mut self,
        word: i64,
        instr: Instruction,
        func: impl Fn(i64) -> bool,
    ) -> Result<StepOutcome, MachineError> {
        let modes = instr.modes();
        let cond = self.resolve_param(modes[0], 1)?;
        let target = self.resolve_param(modes[1], 2)?;
        if func(cond.1) {
            self.memory.check(target.1)?;
            self.record(word, instr, &[cond, target])?;
            self.pointer = target.1;
        } else {
            self.record(word, instr, &[cond, target])?;
            self.pointer += instr.width();
        }
        Ok(StepOutcome::Running)
    }

    /// Takes the next queued input, falling back to `fallback` once the queue is drained
    pub(crate) fn input(
        &mut self,
        word: i64,
        instr: Instruction,
        fallback: &mut dyn FnMut() -> Option<i64>,
    ) -> Result<StepOutcome, MachineError> {
        let dest = self.resolve_dest(1)?;
        let Some(val) = self.pending_inputs.pop_front().or_else(|| fallback()) else {
            return Err(MachineError::InputStarvation {
                pointer: self.pointer,
            });
        };
        self.record(word, instr, &[(dest, val)])?;
        self.memory.set(dest, val)?;
        self.pointer += instr.width();
        Ok(StepOutcome::Running)
    }

    pub(crate) fn output(
        &mut self,
        word: i64,
        instr: Instruction,
    ) -> Result<StepOutcome, MachineError> {
        let out = self.resolve_param(instr.modes()[0], 1)?;
        self.record(word, instr, &[out])?;
        self.outputs.push(out.1);
        self.pointer += instr.width();
        Ok(StepOutcome::Output(out.1))
    }
}
