//! Evaluation-stack and local-variable opcodes (spec §4.6, §4.8).

use crate::error::ZmError;
use crate::executor::{ExecutionResult, Executor};
use crate::instruction::Instruction;

pub fn push(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.state.push(inst.operands[0]);
    Ok(ExecutionResult::Continue)
}

pub fn pull(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let var = inst.operands[0] as u8;
    let value = exec.state.pop();
    exec.state.store_variable(var, value, true)?;
    Ok(ExecutionResult::Continue)
}

/// 0OP:0x09 `pop`, v1-4: discard the top of the evaluation stack.
pub fn pop(exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.state.pop();
    Ok(ExecutionResult::Continue)
}

/// 0OP:0x09 `catch`, v5+: stores a token identifying the current call-stack
/// depth, consumed later by `throw` to unwind back to it.
pub fn catch(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let token = exec.state.call_stack.len() as u16;
    exec.store(inst, token)?;
    Ok(ExecutionResult::Continue)
}

pub fn inc(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let var = inst.operands[0] as u8;
    let value = exec.state.load_variable(var, true)? as i16;
    exec.state.store_variable(var, value.wrapping_add(1) as u16, true)?;
    Ok(ExecutionResult::Continue)
}

pub fn dec(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let var = inst.operands[0] as u8;
    let value = exec.state.load_variable(var, true)? as i16;
    exec.state.store_variable(var, value.wrapping_sub(1) as u16, true)?;
    Ok(ExecutionResult::Continue)
}

pub fn inc_chk(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let var = inst.operands[0] as u8;
    let compare_to = inst.operands[1] as i16;
    let value = (exec.state.load_variable(var, true)? as i16).wrapping_add(1);
    exec.state.store_variable(var, value as u16, true)?;
    exec.branch(inst, value > compare_to)
}

pub fn dec_chk(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let var = inst.operands[0] as u8;
    let compare_to = inst.operands[1] as i16;
    let value = (exec.state.load_variable(var, true)? as i16).wrapping_sub(1);
    exec.state.store_variable(var, value as u16, true)?;
    exec.branch(inst, value < compare_to)
}

/// VAR:0x1F `check_arg_count`: branch if the current frame was called
/// with at least `inst.operands[0]` arguments.
pub fn check_arg_count(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let n = inst.operands[0];
    let supplied = exec.state.current_frame().argument_count as u16;
    exec.branch(inst, supplied >= n)
}
