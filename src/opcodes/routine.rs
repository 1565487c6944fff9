//! Call/return, branch, and save/restore opcodes (spec §4.6, §4.8).

use crate::error::ZmError;
use crate::executor::{ExecutionResult, Executor};
use crate::input::FilenameOp;
use crate::instruction::Instruction;
use crate::memory::Memory;
use crate::quetzal::{restore_game, save_game};
use crate::state::{GameState, InterpreterConfig};

fn do_call(exec: &mut Executor, inst: &Instruction, discard_result: bool) -> Result<ExecutionResult, ZmError> {
    let packed = inst.operands[0] as u32;
    let args = &inst.operands[1..];
    let result_store = if discard_result { None } else { inst.store_var };
    let return_pc = exec.state.pc;
    exec.state.call_routine(packed, true, result_store, args, return_pc)?;
    Ok(ExecutionResult::Continue)
}

pub fn call(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    do_call(exec, inst, false)
}
pub fn call_1s(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    do_call(exec, inst, false)
}
pub fn call_2s(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    do_call(exec, inst, false)
}
pub fn call_vs2(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    do_call(exec, inst, false)
}
/// 1OP:0x0F in v5+ (`not` in v1-4, see `opcodes::op1_table`).
pub fn call_1n(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    do_call(exec, inst, true)
}
pub fn call_2n(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    do_call(exec, inst, true)
}
pub fn call_vn(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    do_call(exec, inst, true)
}
pub fn call_vn2(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    do_call(exec, inst, true)
}

pub fn rtrue(exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.state.return_from_routine(1)?;
    Ok(ExecutionResult::Continue)
}

pub fn rfalse(exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.state.return_from_routine(0)?;
    Ok(ExecutionResult::Continue)
}

pub fn ret(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.state.return_from_routine(inst.operands[0])?;
    Ok(ExecutionResult::Continue)
}

pub fn ret_popped(exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let value = exec.state.pop();
    exec.state.return_from_routine(value)?;
    Ok(ExecutionResult::Continue)
}

pub fn jump(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let offset = inst.operands[0] as i16;
    exec.state.pc = (exec.state.pc as i64 + offset as i64 - 2) as u32;
    Ok(ExecutionResult::Continue)
}

pub fn je(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let a = inst.operands[0];
    let matched = inst.operands[1..].iter().any(|&b| b == a);
    exec.branch(inst, matched)
}

pub fn jl(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.branch(inst, (inst.operands[0] as i16) < (inst.operands[1] as i16))
}

pub fn jg(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.branch(inst, (inst.operands[0] as i16) > (inst.operands[1] as i16))
}

pub fn jz(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.branch(inst, inst.operands[0] == 0)
}

/// 2OP:0x1C `throw`: unwind back to the frame that ran `catch` (its depth
/// given by `operands[1]`) and make it return `operands[0]`.
pub fn throw(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let value = inst.operands[0];
    let token = inst.operands[1] as usize;
    while exec.state.call_stack.len() > token {
        exec.state.call_stack.pop();
    }
    exec.state.return_from_routine(value)?;
    Ok(ExecutionResult::Continue)
}

fn finish_save_restore(exec: &mut Executor, inst: &Instruction, success: bool) -> Result<ExecutionResult, ZmError> {
    if inst.store_var.is_some() {
        exec.store(inst, success as u16)?;
        Ok(ExecutionResult::Continue)
    } else {
        exec.branch(inst, success)
    }
}

pub fn save(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let name = exec.input.prompt_for_filename(FilenameOp::Save).unwrap_or_else(|| "autosave.qzl".to_string());
    let success = save_game(&exec.state, exec.blobs.as_mut(), &name).is_ok();
    finish_save_restore(exec, inst, success)
}

pub fn restore(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let name = match exec.input.prompt_for_filename(FilenameOp::Restore) {
        Some(name) => name,
        None => return finish_save_restore(exec, inst, false),
    };
    let success = restore_game(&mut exec.state, exec.blobs.as_ref(), &name).is_ok();
    finish_save_restore(exec, inst, success)
}

pub fn save_undo(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let ok = exec.state.save_undo(inst.store_var);
    exec.store(inst, ok as u16)?;
    Ok(ExecutionResult::Continue)
}

/// On success `GameState::restore_undo` already wrote `2` into the saved
/// `save_undo` call's own store variable; this instruction's store
/// variable belongs to a future that just got discarded, so it is only
/// written on failure.
pub fn restore_undo(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    if !exec.state.restore_undo() {
        exec.store(inst, 0)?;
    }
    Ok(ExecutionResult::Continue)
}

/// 0OP:0x07 `restart`: reload the untouched story image, preserving the
/// transcribing-on and fixed-pitch-font bits of flags2 across the reload
/// (spec §4.8) since those are player/interpreter state, not game state.
pub fn restart(exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let preserved_flags2 = exec.state.memory.header().flags2 & 0x0003;
    let mut memory = Memory::new(exec.original_story.clone()).map_err(|message| ZmError::SaveFormatError { message })?;
    memory.preserve_flags2_bits(preserved_flags2);
    let config = std::mem::replace(&mut exec.state.config, InterpreterConfig::default());
    exec.state = GameState::new(memory, config);
    Ok(ExecutionResult::Continue)
}

pub fn quit(_exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    Ok(ExecutionResult::Quit)
}
