//! Opcode dispatch tables: four (five, counting extended) fixed arrays of
//! function pointers keyed by opcode number, per spec §9 DESIGN NOTES —
//! deliberately not a single big `match`, so dispatch is O(1) array
//! indexing rather than a chain of comparisons.

pub mod io;
pub mod math;
pub mod memory;
pub mod misc;
pub mod object;
pub mod routine;
pub mod stack;

use crate::error::ZmError;
use crate::executor::{ExecutionResult, Executor};
use crate::instruction::Instruction;

pub type OpcodeFn = fn(&mut Executor, &Instruction) -> Result<ExecutionResult, ZmError>;

const OP0_PRE_V5: [Option<OpcodeFn>; 16] = {
    let mut t: [Option<OpcodeFn>; 16] = [None; 16];
    t[0x00] = Some(routine::rtrue);
    t[0x01] = Some(routine::rfalse);
    t[0x02] = Some(io::print);
    t[0x03] = Some(io::print_ret);
    t[0x04] = Some(misc::nop);
    t[0x05] = Some(routine::save);
    t[0x06] = Some(routine::restore);
    t[0x07] = Some(routine::restart);
    t[0x08] = Some(routine::ret_popped);
    t[0x09] = Some(stack::pop);
    t[0x0A] = Some(routine::quit);
    t[0x0B] = Some(io::new_line);
    t[0x0C] = Some(io::show_status);
    t[0x0D] = Some(io::verify);
    t[0x0F] = Some(io::piracy);
    t
};

const OP0_V5_PLUS: [Option<OpcodeFn>; 16] = {
    let mut t = OP0_PRE_V5;
    t[0x09] = Some(stack::catch);
    t[0x0C] = None; // show_status removed in v4+
    t
};

pub fn op0_table(version: u8) -> &'static [Option<OpcodeFn>; 16] {
    if version >= 5 {
        &OP0_V5_PLUS
    } else {
        &OP0_PRE_V5
    }
}

const OP1_PRE_V5: [Option<OpcodeFn>; 16] = {
    let mut t: [Option<OpcodeFn>; 16] = [None; 16];
    t[0x00] = Some(routine::jz);
    t[0x01] = Some(object::get_sibling);
    t[0x02] = Some(object::get_child);
    t[0x03] = Some(object::get_parent);
    t[0x04] = Some(object::get_prop_len);
    t[0x05] = Some(stack::inc);
    t[0x06] = Some(stack::dec);
    t[0x07] = Some(io::print_addr);
    t[0x08] = Some(routine::call_1s);
    t[0x09] = Some(object::remove_obj);
    t[0x0A] = Some(object::print_obj);
    t[0x0B] = Some(routine::ret);
    t[0x0C] = Some(routine::jump);
    t[0x0D] = Some(io::print_paddr);
    t[0x0E] = Some(memory::load);
    t[0x0F] = Some(math::not_1op);
    t
};

const OP1_V5_PLUS: [Option<OpcodeFn>; 16] = {
    let mut t = OP1_PRE_V5;
    t[0x0F] = Some(routine::call_1n);
    t
};

pub fn op1_table(version: u8) -> &'static [Option<OpcodeFn>; 16] {
    if version >= 5 {
        &OP1_V5_PLUS
    } else {
        &OP1_PRE_V5
    }
}

const OP2_TABLE: [Option<OpcodeFn>; 32] = {
    let mut t: [Option<OpcodeFn>; 32] = [None; 32];
    t[0x01] = Some(routine::je);
    t[0x02] = Some(routine::jl);
    t[0x03] = Some(routine::jg);
    t[0x04] = Some(stack::dec_chk);
    t[0x05] = Some(stack::inc_chk);
    t[0x06] = Some(object::jin);
    t[0x07] = Some(math::test);
    t[0x08] = Some(math::or);
    t[0x09] = Some(math::and);
    t[0x0A] = Some(object::test_attr);
    t[0x0B] = Some(object::set_attr);
    t[0x0C] = Some(object::clear_attr);
    t[0x0D] = Some(memory::store);
    t[0x0E] = Some(object::insert_obj);
    t[0x0F] = Some(memory::loadw);
    t[0x10] = Some(memory::loadb);
    t[0x11] = Some(object::get_prop);
    t[0x12] = Some(object::get_prop_addr);
    t[0x13] = Some(object::get_next_prop);
    t[0x14] = Some(math::add);
    t[0x15] = Some(math::sub);
    t[0x16] = Some(math::mul);
    t[0x17] = Some(math::div);
    t[0x18] = Some(math::z_mod);
    t[0x19] = Some(routine::call_2s);
    t[0x1A] = Some(routine::call_2n);
    t[0x1B] = Some(io::set_colour);
    t[0x1C] = Some(routine::throw);
    t
};

const VAR_TABLE: [Option<OpcodeFn>; 32] = {
    let mut t: [Option<OpcodeFn>; 32] = [None; 32];
    t[0x00] = Some(routine::call);
    t[0x01] = Some(memory::storew);
    t[0x02] = Some(memory::storeb);
    t[0x03] = Some(object::put_prop);
    t[0x04] = Some(io::sread);
    t[0x05] = Some(io::print_char);
    t[0x06] = Some(io::print_num);
    t[0x07] = Some(math::random);
    t[0x08] = Some(stack::push);
    t[0x09] = Some(stack::pull);
    t[0x0A] = Some(io::split_window);
    t[0x0B] = Some(io::set_window);
    t[0x0C] = Some(routine::call_vs2);
    t[0x0D] = Some(io::erase_window);
    t[0x0E] = Some(io::erase_line);
    t[0x0F] = Some(io::set_cursor);
    t[0x10] = Some(io::get_cursor);
    t[0x11] = Some(io::set_text_style);
    t[0x12] = Some(io::buffer_mode);
    t[0x13] = Some(io::output_stream);
    t[0x14] = Some(io::input_stream);
    t[0x15] = Some(io::sound_effect);
    t[0x16] = Some(io::read_char);
    t[0x17] = Some(memory::scan_table);
    t[0x18] = Some(math::not_var);
    t[0x19] = Some(routine::call_vn);
    t[0x1A] = Some(routine::call_vn2);
    t[0x1B] = Some(misc::tokenise_opcode);
    t[0x1C] = Some(misc::encode_text);
    t[0x1D] = Some(memory::copy_table);
    t[0x1E] = Some(io::print_table);
    t[0x1F] = Some(stack::check_arg_count);
    t
};

const EXT_TABLE: [Option<OpcodeFn>; 32] = {
    let mut t: [Option<OpcodeFn>; 32] = [None; 32];
    t[0x00] = Some(routine::save);
    t[0x01] = Some(routine::restore);
    t[0x02] = Some(math::log_shift);
    t[0x03] = Some(math::art_shift);
    t[0x04] = Some(misc::set_font);
    t[0x05] = Some(misc::draw_picture);
    t[0x06] = Some(misc::picture_data);
    t[0x07] = Some(misc::erase_picture);
    t[0x08] = Some(misc::set_margins);
    t[0x09] = Some(routine::save_undo);
    t[0x0A] = Some(routine::restore_undo);
    t[0x0B] = Some(io::print_unicode);
    t[0x0C] = Some(io::check_unicode);
    t[0x10] = Some(misc::move_window);
    t[0x11] = Some(misc::window_size);
    t[0x12] = Some(misc::window_style);
    t[0x13] = Some(misc::get_wind_prop);
    t[0x14] = Some(misc::scroll_window);
    t[0x15] = Some(misc::pop_stack);
    t[0x16] = Some(misc::read_mouse);
    t[0x17] = Some(misc::mouse_window);
    t[0x18] = Some(misc::push_stack);
    t[0x19] = Some(misc::put_wind_prop);
    t[0x1A] = Some(misc::print_form);
    t[0x1B] = Some(misc::make_menu);
    t[0x1C] = Some(misc::picture_table);
    t
};

pub fn op2_table() -> &'static [Option<OpcodeFn>; 32] {
    &OP2_TABLE
}

pub fn var_table() -> &'static [Option<OpcodeFn>; 32] {
    &VAR_TABLE
}

pub fn ext_table() -> &'static [Option<OpcodeFn>; 32] {
    &EXT_TABLE
}
