//! Arithmetic and bitwise opcodes (spec §4.8): two's-complement signed
//! 16-bit arithmetic, division truncates toward zero, overflow wraps.
//! Grounded in the teacher's `opcodes_math.rs`.

use crate::error::ZmError;
use crate::executor::{Executor, ExecutionResult};
use crate::instruction::Instruction;
use log::debug;

pub fn or(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.store(inst, inst.operands[0] | inst.operands[1])?;
    Ok(ExecutionResult::Continue)
}

pub fn and(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.store(inst, inst.operands[0] & inst.operands[1])?;
    Ok(ExecutionResult::Continue)
}

/// 2OP:0x07 `test`: branch if every flag bit set in `flags` is also set in
/// `bitmap`.
pub fn test(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let bitmap = inst.operands[0];
    let flags = inst.operands[1];
    exec.branch(inst, bitmap & flags == flags)
}

pub fn add(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let result = (inst.operands[0] as i16).wrapping_add(inst.operands[1] as i16) as u16;
    exec.store(inst, result)?;
    Ok(ExecutionResult::Continue)
}

pub fn sub(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let result = (inst.operands[0] as i16).wrapping_sub(inst.operands[1] as i16) as u16;
    exec.store(inst, result)?;
    Ok(ExecutionResult::Continue)
}

pub fn mul(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let result = (inst.operands[0] as i16).wrapping_mul(inst.operands[1] as i16) as u16;
    exec.store(inst, result)?;
    Ok(ExecutionResult::Continue)
}

pub fn div(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    if inst.operands[1] == 0 {
        return Err(ZmError::InvalidOpcode { opcode: inst.opcode, form: "div by zero", pc: inst.addr });
    }
    let result = (inst.operands[0] as i16).wrapping_div(inst.operands[1] as i16) as u16;
    exec.store(inst, result)?;
    Ok(ExecutionResult::Continue)
}

pub fn z_mod(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    if inst.operands[1] == 0 {
        return Err(ZmError::InvalidOpcode { opcode: inst.opcode, form: "mod by zero", pc: inst.addr });
    }
    let result = (inst.operands[0] as i16).wrapping_rem(inst.operands[1] as i16) as u16;
    exec.store(inst, result)?;
    Ok(ExecutionResult::Continue)
}

/// 1OP:0x0F in v1-4: bitwise NOT. (v5+ this opcode number is `call_1n`,
/// routed elsewhere by the executor's version check before dispatch.)
pub fn not_1op(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    debug!("not {}", inst.operands[0]);
    exec.store(inst, !inst.operands[0])?;
    Ok(ExecutionResult::Continue)
}

/// VAR:0x18 `not` (v5+ general form, one operand).
pub fn not_var(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.store(inst, !inst.operands[0])?;
    Ok(ExecutionResult::Continue)
}

pub fn random(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let n = inst.operands[0] as i16;
    let result = exec.state.rng.random_opcode(n);
    exec.store(inst, result)?;
    Ok(ExecutionResult::Continue)
}

pub fn log_shift(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let value = inst.operands[0];
    let places = inst.operands[1] as i16;
    let result = if places >= 0 { value.wrapping_shl(places as u32) } else { value.wrapping_shr((-places) as u32) };
    exec.store(inst, result)?;
    Ok(ExecutionResult::Continue)
}

pub fn art_shift(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let value = inst.operands[0] as i16;
    let places = inst.operands[1] as i16;
    let result = if places >= 0 { value.wrapping_shl(places as u32) } else { value.wrapping_shr((-places) as u32) };
    exec.store(inst, result as u16)?;
    Ok(ExecutionResult::Continue)
}
