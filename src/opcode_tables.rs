//! Opcode name tables, keyed by form + operand-count the way the Z-machine
//! Standard's encoding actually disambiguates them. Grounded in the
//! teacher's `opcode_tables.rs`; consolidated to one lookup per form.

use crate::instruction::{InstructionForm, OperandCount};

pub fn opcode_name(opcode: u8, ext_opcode: Option<u8>, form: InstructionForm, operand_count: OperandCount) -> &'static str {
    match form {
        InstructionForm::Extended => ext_opcode_name(ext_opcode.unwrap_or(0)),
        InstructionForm::Variable => variable_opcode_name(opcode, operand_count),
        InstructionForm::Short => match operand_count {
            OperandCount::OP0 => op0_name(opcode),
            OperandCount::OP1 => op1_name(opcode),
            _ => "unknown",
        },
        InstructionForm::Long => op2_name(opcode),
    }
}

fn op2_name(opcode: u8) -> &'static str {
    match opcode {
        0x01 => "je",
        0x02 => "jl",
        0x03 => "jg",
        0x04 => "dec_chk",
        0x05 => "inc_chk",
        0x06 => "jin",
        0x07 => "test",
        0x08 => "or",
        0x09 => "and",
        0x0A => "test_attr",
        0x0B => "set_attr",
        0x0C => "clear_attr",
        0x0D => "store",
        0x0E => "insert_obj",
        0x0F => "loadw",
        0x10 => "loadb",
        0x11 => "get_prop",
        0x12 => "get_prop_addr",
        0x13 => "get_next_prop",
        0x14 => "add",
        0x15 => "sub",
        0x16 => "mul",
        0x17 => "div",
        0x18 => "mod",
        0x19 => "call_2s",
        0x1A => "call_2n",
        0x1B => "set_colour",
        0x1C => "throw",
        _ => "unknown_2op",
    }
}

fn op1_name(opcode: u8) -> &'static str {
    match opcode {
        0x00 => "jz",
        0x01 => "get_sibling",
        0x02 => "get_child",
        0x03 => "get_parent",
        0x04 => "get_prop_len",
        0x05 => "inc",
        0x06 => "dec",
        0x07 => "print_addr",
        0x08 => "call_1s",
        0x09 => "remove_obj",
        0x0A => "print_obj",
        0x0B => "ret",
        0x0C => "jump",
        0x0D => "print_paddr",
        0x0E => "load",
        0x0F => "not", // call_1n in v5+, still decoded as "not" at this layer
        _ => "unknown_1op",
    }
}

fn op0_name(opcode: u8) -> &'static str {
    match opcode {
        0x00 => "rtrue",
        0x01 => "rfalse",
        0x02 => "print",
        0x03 => "print_ret",
        0x04 => "nop",
        0x05 => "save",
        0x06 => "restore",
        0x07 => "restart",
        0x08 => "ret_popped",
        0x09 => "pop", // catch in v5+
        0x0A => "quit",
        0x0B => "new_line",
        0x0C => "show_status",
        0x0D => "verify",
        0x0E => "extended",
        0x0F => "piracy",
        _ => "unknown_0op",
    }
}

/// `opcode` is always in 0..=0x1F here (`Instruction::decode` masks with
/// 0x1F regardless of the VAR/2OP bit); `operand_count` is what
/// disambiguates a 2OP opcode encoded in variable form from a true VAR one.
fn variable_opcode_name(opcode: u8, operand_count: OperandCount) -> &'static str {
    if operand_count == OperandCount::OP2 {
        return op2_name(opcode);
    }
    match opcode {
        0x00 => "call",
        0x01 => "storew",
        0x02 => "storeb",
        0x03 => "put_prop",
        0x04 => "sread", // aread in v5+
        0x05 => "print_char",
        0x06 => "print_num",
        0x07 => "random",
        0x08 => "push",
        0x09 => "pull",
        0x0A => "split_window",
        0x0B => "set_window",
        0x0C => "call_vs2",
        0x0D => "erase_window",
        0x0E => "erase_line",
        0x0F => "set_cursor",
        0x10 => "get_cursor",
        0x11 => "set_text_style",
        0x12 => "buffer_mode",
        0x13 => "output_stream",
        0x14 => "input_stream",
        0x15 => "sound_effect",
        0x16 => "read_char",
        0x17 => "scan_table",
        0x18 => "not",
        0x19 => "call_vn",
        0x1A => "call_vn2",
        0x1B => "tokenise",
        0x1C => "encode_text",
        0x1D => "copy_table",
        0x1E => "print_table",
        0x1F => "check_arg_count",
        _ => "unknown_var",
    }
}

fn ext_opcode_name(ext: u8) -> &'static str {
    match ext {
        0x00 => "save",
        0x01 => "restore",
        0x02 => "log_shift",
        0x03 => "art_shift",
        0x04 => "set_font",
        0x05 => "draw_picture",
        0x06 => "picture_data",
        0x07 => "erase_picture",
        0x08 => "set_margins",
        0x09 => "save_undo",
        0x0A => "restore_undo",
        0x0B => "print_unicode",
        0x0C => "check_unicode",
        0x10 => "move_window",
        0x11 => "window_size",
        0x12 => "window_style",
        0x13 => "get_wind_prop",
        0x14 => "scroll_window",
        0x15 => "pop_stack",
        0x16 => "read_mouse",
        0x17 => "mouse_window",
        0x18 => "push_stack",
        0x19 => "put_wind_prop",
        0x1A => "print_form",
        0x1B => "make_menu",
        0x1C => "picture_table",
        _ => "unknown_ext",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_form_names() {
        assert_eq!(op2_name(0x14), "add");
        assert_eq!(op2_name(0x01), "je");
    }

    #[test]
    fn variable_form_of_2op_maps_back() {
        assert_eq!(variable_opcode_name(0x14, OperandCount::OP2), "add");
    }

    #[test]
    fn extended_form_names() {
        assert_eq!(ext_opcode_name(0x09), "save_undo");
    }
}
