//! Screen/transcript/input opcodes (spec §4.5, §4.7, §4.8). Actual
//! rendering and keystrokes live behind [`crate::screen::ScreenPort`] and
//! [`crate::input::InputPort`]; this module only translates opcodes into
//! calls on those ports.

use crate::error::ZmError;
use crate::executor::{ExecutionResult, Executor};
use crate::input::{InputMode, InputState};
use crate::instruction::Instruction;
use crate::zstring::{unpack_zchars, Decoder};

fn decode_text(exec: &Executor, zchars: &[u8]) -> String {
    Decoder::new(&exec.state.memory).decode(zchars, true).unwrap_or_default()
}

pub fn print(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let zchars = inst.text.as_ref().expect("print always carries inline text");
    let text = decode_text(exec, zchars);
    exec.print_str(&text)?;
    Ok(ExecutionResult::Continue)
}

pub fn print_ret(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let zchars = inst.text.as_ref().expect("print_ret always carries inline text");
    let text = decode_text(exec, zchars);
    exec.print_str(&text)?;
    exec.print_str("\n")?;
    exec.state.return_from_routine(1)?;
    Ok(ExecutionResult::Continue)
}

pub fn new_line(exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.print_str("\n")?;
    Ok(ExecutionResult::Continue)
}

pub fn print_addr(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let words = exec.state.memory.get_zstring_words(inst.operands[0] as u32)?;
    let text = decode_text(exec, &unpack_zchars(&words));
    exec.print_str(&text)?;
    Ok(ExecutionResult::Continue)
}

pub fn print_paddr(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let addr = exec.state.memory.unpack_string(inst.operands[0]);
    let words = exec.state.memory.get_zstring_words(addr)?;
    let text = decode_text(exec, &unpack_zchars(&words));
    exec.print_str(&text)?;
    Ok(ExecutionResult::Continue)
}

pub fn print_char(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    if let Some(c) = char::from_u32(inst.operands[0] as u32) {
        exec.print_str(&c.to_string())?;
    }
    Ok(ExecutionResult::Continue)
}

pub fn print_num(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let value = inst.operands[0] as i16;
    exec.print_str(&value.to_string())?;
    Ok(ExecutionResult::Continue)
}

/// VAR:0x1E `print_table`: print a `width`x`height` block of ZSCII bytes
/// from `table`, advancing `skip` bytes (default 0) between rows.
pub fn print_table(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let table = inst.operands[0] as u32;
    let width = inst.operands[1] as u32;
    let height = inst.operands.get(2).copied().unwrap_or(1) as u32;
    let skip = inst.operands.get(3).copied().unwrap_or(0) as u32;
    for row in 0..height {
        if row > 0 {
            exec.print_str("\n")?;
        }
        let row_addr = table + row * (width + skip);
        let mut line = String::new();
        for col in 0..width {
            let b = exec.state.memory.get_byte(row_addr + col)?;
            if let Some(c) = char::from_u32(b as u32) {
                line.push(c);
            }
        }
        exec.print_str(&line)?;
    }
    Ok(ExecutionResult::Continue)
}

/// 0OP:0x0D `verify`: branch if the file's stored checksum (summing every
/// byte from offset 0x40 to `file_length_words*2`, mod 0x10000) matches.
pub fn verify(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let header = exec.state.memory.header();
    let end = (header.file_length_words as usize) * 2;
    let raw = exec.state.memory.raw();
    let end = end.min(raw.len());
    let computed: u16 = raw.get(0x40..end).map(|slice| slice.iter().fold(0u16, |acc, &b| acc.wrapping_add(b as u16))).unwrap_or(0);
    exec.branch(inst, computed == header.checksum)
}

pub fn piracy(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    exec.branch(inst, true)
}

/// 0OP:0x0C `show_status`, v1-3 only: global 16 is the current location
/// object, globals 17/18 are score/moves or hours/minutes depending on
/// header flags1 bit 1 ("time game").
pub fn show_status(exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let room_obj = exec.state.load_variable(16, true)?;
    let table = exec.state.object_table();
    let location = table.get(room_obj).and_then(|h| h.name(&exec.state.memory)).unwrap_or_default();
    let g17 = exec.state.load_variable(17, true)? as i16;
    let g18 = exec.state.load_variable(18, true)?;
    let right = if exec.state.memory.header().flags1 & 0x02 != 0 {
        format!("{:02}:{:02}", g17, g18)
    } else {
        format!("{}/{}", g17, g18)
    };
    if let Err(e) = exec.screen.update_status_bar(&location, &right) {
        log::warn!("status bar update failed: {e}");
    }
    Ok(ExecutionResult::Continue)
}

pub fn set_text_style(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    if let Err(e) = exec.screen.set_text_style(inst.operands[0]) {
        log::warn!("{e}");
    }
    Ok(ExecutionResult::Continue)
}

pub fn set_window(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    if let Err(e) = exec.screen.set_window(inst.operands[0] as u8) {
        log::warn!("{e}");
    }
    Ok(ExecutionResult::Continue)
}

pub fn erase_window(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    if let Err(e) = exec.screen.erase_window(inst.operands[0] as i16) {
        log::warn!("{e}");
    }
    Ok(ExecutionResult::Continue)
}

pub fn erase_line(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    if inst.operands[0] == 1 {
        let (row, col) = exec.screen.get_cursor().unwrap_or((1, 1));
        let _ = exec.screen.set_cursor(row, col);
        // erase-to-end-of-line has no separate port call; clients implement
        // it as part of cursor-aware printing. Nothing further to do here.
    }
    Ok(ExecutionResult::Continue)
}

pub fn split_window(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    if let Err(e) = exec.screen.split_window(inst.operands[0]) {
        log::warn!("{e}");
    }
    Ok(ExecutionResult::Continue)
}

pub fn set_cursor(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    if let Err(e) = exec.screen.set_cursor(inst.operands[0], inst.operands[1]) {
        log::warn!("{e}");
    }
    Ok(ExecutionResult::Continue)
}

pub fn get_cursor(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let (row, col) = exec.screen.get_cursor().unwrap_or((1, 1));
    let array = inst.operands[0] as u32;
    exec.state.memory.set_word(array, row)?;
    exec.state.memory.set_word(array + 2, col)?;
    Ok(ExecutionResult::Continue)
}

pub fn set_colour(exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    // Colour is part of the v6+ graphics surface; host screens that support
    // it can read text-style bits instead. No-op here (spec Non-goals).
    let _ = exec;
    Ok(ExecutionResult::Continue)
}

pub fn sound_effect(_exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    Ok(ExecutionResult::Continue)
}

pub fn buffer_mode(_exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    Ok(ExecutionResult::Continue)
}

pub fn output_stream(_exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    Ok(ExecutionResult::Continue)
}

pub fn input_stream(_exec: &mut Executor, _inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    Ok(ExecutionResult::Continue)
}

/// VAR:0x04, v1-4 `sread` / v5+ `aread`: suspend for a line of input.
pub fn sread(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let text_buffer_addr = inst.operands[0] as u32;
    let parse_buffer_addr = inst.operands.get(1).copied().unwrap_or(0) as u32;
    let timeout_tenths = inst.operands.get(2).copied().unwrap_or(0);
    let timer_routine = inst.operands.get(3).copied().unwrap_or(0);
    Ok(ExecutionResult::Suspend(InputState {
        mode: InputMode::Text,
        text_buffer_addr,
        parse_buffer_addr,
        store_var: inst.store_var,
        timeout_tenths,
        timer_routine,
    }))
}

pub fn read_char(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let timeout_tenths = inst.operands.get(1).copied().unwrap_or(0);
    let timer_routine = inst.operands.get(2).copied().unwrap_or(0);
    let _ = exec;
    Ok(ExecutionResult::Suspend(InputState {
        mode: InputMode::Char,
        text_buffer_addr: 0,
        parse_buffer_addr: 0,
        store_var: inst.store_var,
        timeout_tenths,
        timer_routine,
    }))
}

pub fn print_unicode(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    if let Some(c) = char::from_u32(inst.operands[0] as u32) {
        exec.print_str(&c.to_string())?;
    }
    Ok(ExecutionResult::Continue)
}

pub fn check_unicode(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let can_print = char::from_u32(inst.operands[0] as u32).is_some();
    exec.store(inst, if can_print { 0x03 } else { 0 })?;
    Ok(ExecutionResult::Continue)
}
