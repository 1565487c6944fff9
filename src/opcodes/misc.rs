//! Parser-table opcodes and the v6 graphics/sound/menu surface. The
//! latter is out of scope (spec Non-goals): these are safe no-ops so a
//! v6 file doesn't abort on an opcode this core never renders.

use crate::error::ZmError;
use crate::executor::{ExecutionResult, Executor};
use crate::instruction::Instruction;
use crate::parser::tokenise;
use crate::zstring::encode;

pub fn nop(_exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    Ok(ExecutionResult::Continue)
}

/// VAR:0x1B `tokenise`.
pub fn tokenise_opcode(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let text_buf = inst.operands[0] as u32;
    let parse_buf = inst.operands[1] as u32;
    let dict_addr = inst.operands.get(2).copied().unwrap_or(0) as u32;
    let flag = inst.operands.get(3).copied().unwrap_or(0) != 0;
    tokenise(&mut exec.state.memory, text_buf, parse_buf, dict_addr, flag)?;
    Ok(ExecutionResult::Continue)
}

/// VAR:0x1C `encode_text`: encode `length` ZSCII characters starting at
/// `from` within `text`, writing the dictionary-style coded word(s) to
/// `coded_buf`.
pub fn encode_text(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let text = inst.operands[0] as u32;
    let length = inst.operands[1] as u32;
    let from = inst.operands[2] as u32;
    let coded_buf = inst.operands[3] as u32;
    let mut s = String::with_capacity(length as usize);
    for i in 0..length {
        let b = exec.state.memory.get_byte(text + from + i)?;
        s.push(b as char);
    }
    let version = exec.state.memory.header().version;
    let words = encode(&s, version);
    for (i, word) in words.iter().enumerate() {
        exec.state.memory.set_word(coded_buf + i as u32 * 2, *word)?;
    }
    Ok(ExecutionResult::Continue)
}

macro_rules! graphics_stub {
    ($name:ident) => {
        pub fn $name(_exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
            Ok(ExecutionResult::Continue)
        }
    };
}

graphics_stub!(draw_picture);
graphics_stub!(erase_picture);
graphics_stub!(set_margins);
graphics_stub!(move_window);
graphics_stub!(window_style);
graphics_stub!(scroll_window);
graphics_stub!(mouse_window);
graphics_stub!(put_wind_prop);
graphics_stub!(print_form);

/// EXT:4 `set_font`: no font other than the current one is supported, so
/// report failure regardless of the requested font number.
pub fn set_font(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.store(inst, 0)?;
    Ok(ExecutionResult::Continue)
}

/// EXT:27 `make_menu`: no menu support; report "not available".
pub fn make_menu(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.branch(inst, false)
}

pub fn picture_data(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    // No blorb resource store is wired up; report "picture not present".
    exec.branch(inst, false)
}

pub fn window_size(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let (rows, cols) = exec.screen.get_size();
    exec.store(inst, cols)?;
    let _ = rows;
    Ok(ExecutionResult::Continue)
}

pub fn get_wind_prop(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.store(inst, 0)?;
    Ok(ExecutionResult::Continue)
}

pub fn pop_stack(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let count = inst.operands[0];
    for _ in 0..count {
        exec.state.pop();
    }
    Ok(ExecutionResult::Continue)
}

pub fn push_stack(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let value = inst.operands[0];
    exec.state.push(value);
    exec.branch(inst, true)
}

pub fn read_mouse(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let array = inst.operands[0] as u32;
    exec.state.memory.set_word(array, 0)?;
    exec.state.memory.set_word(array + 2, 0)?;
    Ok(ExecutionResult::Continue)
}

pub fn picture_table(exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let _ = exec;
    Ok(ExecutionResult::Continue)
}
