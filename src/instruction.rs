//! Instruction decode: the four encodings (long, short, variable,
//! extended) plus the store-variable/branch-offset tail. See spec §4.7.

use crate::error::ZmError;
use crate::memory::Memory;
use crate::opcode_tables::opcode_name;
use crate::state::GameState;
use crate::zstring::unpack_zchars;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandType {
    LargeConstant,
    SmallConstant,
    Variable,
    Omitted,
}

impl OperandType {
    pub fn from_bits(bits: u8) -> OperandType {
        match bits & 0x03 {
            0b00 => OperandType::LargeConstant,
            0b01 => OperandType::SmallConstant,
            0b10 => OperandType::Variable,
            _ => OperandType::Omitted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionForm {
    Long,
    Short,
    Extended,
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandCount {
    OP0,
    OP1,
    OP2,
    VAR,
}

#[derive(Debug, Clone, Copy)]
pub struct BranchInfo {
    pub on_true: bool,
    pub offset: i16,
}

#[derive(Debug, Clone)]
pub struct Instruction {
    pub opcode: u8,
    pub ext_opcode: Option<u8>,
    pub form: InstructionForm,
    pub operand_count: OperandCount,
    pub operand_types: Vec<OperandType>,
    pub operands: Vec<u16>,
    pub store_var: Option<u8>,
    pub branch: Option<BranchInfo>,
    pub text: Option<Vec<u16>>,
    pub addr: u32,
    pub size: u32,
}

impl Instruction {
    pub fn decode(memory: &Memory, addr: u32, version: u8) -> Result<Instruction, ZmError> {
        let mut cursor = addr;
        let opcode_byte = memory.get_byte(cursor)?;
        cursor += 1;

        let form = match opcode_byte >> 6 {
            0b11 => InstructionForm::Variable,
            0b10 => InstructionForm::Short,
            0b01 => InstructionForm::Long,
            _ if opcode_byte == 0xBE && version >= 5 => InstructionForm::Extended,
            _ => InstructionForm::Long,
        };

        let mut ext_opcode = None;
        let opcode;
        let operand_count;
        let mut operand_types = Vec::new();

        match form {
            InstructionForm::Long => {
                opcode = opcode_byte & 0x1F;
                operand_count = OperandCount::OP2;
                operand_types.push(if opcode_byte & 0x40 != 0 { OperandType::Variable } else { OperandType::SmallConstant });
                operand_types.push(if opcode_byte & 0x20 != 0 { OperandType::Variable } else { OperandType::SmallConstant });
            }
            InstructionForm::Short => {
                opcode = opcode_byte & 0x0F;
                let type_bits = (opcode_byte >> 4) & 0x03;
                if type_bits == 0b11 {
                    operand_count = OperandCount::OP0;
                } else {
                    operand_count = OperandCount::OP1;
                    operand_types.push(OperandType::from_bits(type_bits));
                }
            }
            InstructionForm::Variable => {
                opcode = opcode_byte & 0x1F;
                let is_var = opcode_byte & 0x20 != 0;
                operand_count = if is_var { OperandCount::VAR } else { OperandCount::OP2 };
                let type_byte = memory.get_byte(cursor)?;
                cursor += 1;
                let mut types: Vec<OperandType> = (0..4).map(|i| OperandType::from_bits(type_byte >> (6 - i * 2))).collect();
                // call_vs2 (0x0C) / call_vn2 (0x1A): a second type byte extends to 8 operands.
                if is_var && (opcode == 0x0C || opcode == 0x1A) {
                    let type_byte2 = memory.get_byte(cursor)?;
                    cursor += 1;
                    types.extend((0..4).map(|i| OperandType::from_bits(type_byte2 >> (6 - i * 2))));
                }
                operand_types = types.into_iter().take_while(|t| *t != OperandType::Omitted).collect();
            }
            InstructionForm::Extended => {
                let ext = memory.get_byte(cursor)?;
                cursor += 1;
                ext_opcode = Some(ext);
                opcode = ext;
                operand_count = OperandCount::VAR;
                let type_byte = memory.get_byte(cursor)?;
                cursor += 1;
                let types: Vec<OperandType> = (0..4).map(|i| OperandType::from_bits(type_byte >> (6 - i * 2))).collect();
                operand_types = types.into_iter().take_while(|t| *t != OperandType::Omitted).collect();
            }
        }

        let mut operands = Vec::with_capacity(operand_types.len());
        for ty in &operand_types {
            match ty {
                OperandType::LargeConstant => {
                    operands.push(memory.get_word(cursor)?);
                    cursor += 2;
                }
                OperandType::SmallConstant | OperandType::Variable => {
                    operands.push(memory.get_byte(cursor)? as u16);
                    cursor += 1;
                }
                OperandType::Omitted => unreachable!("omitted operand types are trimmed above"),
            }
        }

        let name = opcode_name(opcode, ext_opcode, form, operand_count);
        // save/restore are branch opcodes in v3, store opcodes in v4+
        // (spec §4.8); EXT-form save/restore (v5+) are always store-only.
        let (stores, branches) = if (name == "save" || name == "restore") && form != InstructionForm::Extended {
            if version <= 3 {
                (false, true)
            } else {
                (true, false)
            }
        } else if name == "sread" {
            // VAR:0x04 is `sread` (no result) in v1-4, `aread` (stores the
            // terminating key) in v5+; the name table doesn't version this.
            (version >= 5, false)
        } else {
            (opcode_stores_result(name), opcode_is_branch(name))
        };
        let prints_inline_string = name == "print" || name == "print_ret";

        let store_var = if stores {
            let v = memory.get_byte(cursor)?;
            cursor += 1;
            Some(v)
        } else {
            None
        };

        let branch = if branches {
            let first = memory.get_byte(cursor)?;
            cursor += 1;
            let second = if first & 0x40 == 0 {
                let b = memory.get_byte(cursor)?;
                cursor += 1;
                Some(b)
            } else {
                None
            };
            let (offset, on_true) = GameState::decode_branch(first, second);
            Some(BranchInfo { on_true, offset })
        } else {
            None
        };

        let text = if prints_inline_string {
            let words = memory.get_zstring_words(cursor)?;
            cursor += words.len() as u32 * 2;
            Some(unpack_zchars(&words))
        } else {
            None
        };

        let size = cursor - addr;
        debug!("decoded {:#06x}: {} ({:?}, {} operands)", addr, name, form, operands.len());
        Ok(Instruction { opcode, ext_opcode, form, operand_count, operand_types, operands, store_var, branch, text, addr, size })
    }

    pub fn name(&self) -> &'static str {
        opcode_name(self.opcode, self.ext_opcode, self.form, self.operand_count)
    }
}

/// Opcodes that store a result, independent of operand count (spec §4.7
/// "Storing opcodes").
fn opcode_stores_result(name: &str) -> bool {
    matches!(
        name,
        "or" | "and" | "loadw" | "loadb" | "get_prop" | "get_prop_addr" | "get_next_prop" | "add" | "sub" | "mul"
            | "div" | "mod" | "call_2s" | "call_vs" | "call_vs2" | "get_sibling" | "get_child" | "get_parent"
            | "get_prop_len" | "call_1s" | "load" | "not" | "random" | "call" | "push_pull_value"
            | "catch" | "save" | "restore" | "restore_undo" | "save_undo" | "read_char" | "scan_table"
            | "aread" | "log_shift" | "art_shift" | "set_font" | "check_unicode" | "get_wind_prop"
    )
}

/// Opcodes that have a branch tail (spec §4.7 "Branching opcodes").
fn opcode_is_branch(name: &str) -> bool {
    matches!(
        name,
        "je" | "jl" | "jg" | "dec_chk" | "inc_chk" | "jin" | "test" | "test_attr" | "jz" | "get_sibling"
            | "get_child" | "verify" | "piracy" | "scan_table" | "save" | "restore" | "check_arg_count"
            | "picture_data" | "push_stack" | "make_menu"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_with(bytes: &[u8]) -> Memory {
        let mut b = vec![0u8; 0x100];
        b[0x00] = 3;
        b[0x0E] = 0x00;
        b[0x0F] = 0x10;
        for (i, &byte) in bytes.iter().enumerate() {
            b[0x10 + i] = byte;
        }
        Memory::new(b).unwrap()
    }

    #[test]
    fn decodes_long_form_add() {
        // add (2OP 0x14), both small constants: 5 + 37
        let m = mem_with(&[0x14, 5, 37]);
        let inst = Instruction::decode(&m, 0x10, 3).unwrap();
        assert_eq!(inst.name(), "add");
        assert_eq!(inst.operands, vec![5, 37]);
        assert!(inst.store_var.is_some());
    }

    #[test]
    fn decodes_short_form_0op_quit() {
        let m = mem_with(&[0xBA]);
        let inst = Instruction::decode(&m, 0x10, 3).unwrap();
        assert_eq!(inst.name(), "quit");
        assert_eq!(inst.operand_types.len(), 0);
    }

    #[test]
    fn decodes_variable_form_call_vs() {
        // call_vs (VAR 0x00): operand types byte 0x7F = small,omit,omit,omit... actually
        // 01 11 11 11 = small const then 3 omitted.
        let m = mem_with(&[0xE0, 0x7F, 42]);
        let inst = Instruction::decode(&m, 0x10, 3).unwrap();
        assert_eq!(inst.name(), "call");
        assert_eq!(inst.operands, vec![42]);
    }

    #[test]
    fn branch_tail_parsed_for_je() {
        // je (2OP 0x01) small,small, single-byte branch offset with on_true + 6-bit
        let m = mem_with(&[0x01, 1, 1, 0xC5]);
        let inst = Instruction::decode(&m, 0x10, 3).unwrap();
        let branch = inst.branch.unwrap();
        assert!(branch.on_true);
        assert_eq!(branch.offset, 5);
    }

    #[test]
    fn print_opcode_consumes_inline_string() {
        // print (0OP 0x02) followed by a 1-word terminated z-string
        let m = mem_with(&[0xB2, 0x80, 0x00]);
        let inst = Instruction::decode(&m, 0x10, 3).unwrap();
        assert_eq!(inst.name(), "print");
        assert_eq!(inst.size, 3);
        assert!(inst.text.is_some());
    }
}
