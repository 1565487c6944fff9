//! Array/table opcodes (spec §4.2, §4.8): `loadw`/`loadb`/`storew`/`storeb`
//! index raw memory directly, bypassing the object/dictionary views.

use crate::error::ZmError;
use crate::executor::{ExecutionResult, Executor};
use crate::instruction::Instruction;

pub fn loadw(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let array = inst.operands[0] as u32;
    let index = inst.operands[1] as u32;
    let value = exec.state.memory.get_word(array + 2 * index)?;
    exec.store(inst, value)?;
    Ok(ExecutionResult::Continue)
}

pub fn loadb(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let array = inst.operands[0] as u32;
    let index = inst.operands[1] as u32;
    let value = exec.state.memory.get_byte(array + index)? as u16;
    exec.store(inst, value)?;
    Ok(ExecutionResult::Continue)
}

/// 2OP:0x0D `store`: indirect write to the variable named by operand 0.
/// Variable 0 replaces the top of the evaluation stack rather than
/// pushing, matching the Standard's indirect-reference rule.
pub fn store(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let var = inst.operands[0] as u8;
    let value = inst.operands[1];
    exec.state.store_variable(var, value, true)?;
    Ok(ExecutionResult::Continue)
}

/// 1OP:0x0E `load`: indirect read of the variable named by the operand,
/// without popping it off the stack (variable 0 peeks).
pub fn load(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let var = inst.operands[0] as u8;
    let value = exec.state.load_variable(var, true)?;
    exec.store(inst, value)?;
    Ok(ExecutionResult::Continue)
}

pub fn storew(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let array = inst.operands[0] as u32;
    let index = inst.operands[1] as u32;
    let value = inst.operands[2];
    exec.state.memory.set_word(array + 2 * index, value)?;
    Ok(ExecutionResult::Continue)
}

pub fn storeb(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let array = inst.operands[0] as u32;
    let index = inst.operands[1] as u32;
    let value = inst.operands[2] as u8;
    exec.state.memory.set_byte(array + index, value)?;
    Ok(ExecutionResult::Continue)
}

/// VAR:0x1D `copy_table`: `second == 0` zero-fills `first` for `abs(size)`
/// bytes; otherwise copies `abs(size)` bytes from `first` to `second`,
/// forward-only when `size` is negative.
pub fn copy_table(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let first = inst.operands[0] as u32;
    let second = inst.operands[1] as u32;
    let size = inst.operands[2] as i16;
    if second == 0 {
        for i in 0..size.unsigned_abs() as u32 {
            exec.state.memory.set_byte(first + i, 0)?;
        }
        return Ok(ExecutionResult::Continue);
    }
    let force_forward = size < 0;
    exec.state.memory.copy_block(first, second, size as i32, force_forward)?;
    Ok(ExecutionResult::Continue)
}

/// VAR:0x17 `scan_table`: linear search for `x` among `len` entries of
/// `table`. `form`'s high bit selects word vs byte comparisons; the low 7
/// bits give the entry stride in bytes (default `0x82`: word entries, 2
/// bytes apart).
pub fn scan_table(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let x = inst.operands[0];
    let table = inst.operands[1] as u32;
    let len = inst.operands[2];
    let form = inst.operands.get(3).copied().unwrap_or(0x82) as u8;
    let word_entries = form & 0x80 != 0;
    let stride = (form & 0x7F).max(1) as u32;
    let mut found = 0u32;
    for i in 0..len as u32 {
        let addr = table + i * stride;
        let value = if word_entries { exec.state.memory.get_word(addr)? } else { exec.state.memory.get_byte(addr)? as u16 };
        if value == x {
            found = addr;
            break;
        }
    }
    exec.store(inst, found as u16)?;
    exec.branch(inst, found != 0)
}
