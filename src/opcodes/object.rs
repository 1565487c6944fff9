//! Object-tree opcodes (spec §4.4, §4.8). Errors for invalid object
//! numbers/attributes/properties are logged and degraded to zero per
//! spec §7, via [`Executor::recoverable`].

use crate::error::ZmError;
use crate::executor::{ExecutionResult, Executor};
use crate::instruction::Instruction;

pub fn jin(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let parent_target = inst.operands[1];
    let actual = if obj == 0 {
        0
    } else {
        let table = exec.state.object_table();
        exec.recoverable(table.get(obj).and_then(|h| h.parent_num(&exec.state.memory)))?
    };
    exec.branch(inst, actual == parent_target)
}

pub fn test_attr(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let attr = inst.operands[1];
    let table = exec.state.object_table();
    let has = exec.recoverable(table.get(obj).and_then(|h| h.has_attribute(&exec.state.memory, attr)))?;
    exec.branch(inst, has)
}

pub fn set_attr(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let attr = inst.operands[1];
    let table = exec.state.object_table();
    let result = table.get(obj).and_then(|h| h.set_attr(&mut exec.state.memory, attr));
    exec.recoverable(result)?;
    Ok(ExecutionResult::Continue)
}

pub fn clear_attr(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let attr = inst.operands[1];
    let table = exec.state.object_table();
    let result = table.get(obj).and_then(|h| h.clear_attr(&mut exec.state.memory, attr));
    exec.recoverable(result)?;
    Ok(ExecutionResult::Continue)
}

pub fn insert_obj(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let dest = inst.operands[1];
    let table = exec.state.object_table();
    let result = table.get(obj).and_then(|h| h.insert_obj(&mut exec.state.memory, dest));
    exec.recoverable(result)?;
    Ok(ExecutionResult::Continue)
}

pub fn get_prop(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let prop = inst.operands[1];
    let table = exec.state.object_table();
    let value = exec.recoverable(table.get(obj).and_then(|h| h.get_property(&exec.state.memory, prop)))?;
    exec.store(inst, value)?;
    Ok(ExecutionResult::Continue)
}

pub fn get_prop_addr(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let prop = inst.operands[1];
    let table = exec.state.object_table();
    let addr = exec.recoverable(table.get(obj).and_then(|h| h.get_prop_addr(&exec.state.memory, prop)))?;
    exec.store(inst, addr as u16)?;
    Ok(ExecutionResult::Continue)
}

pub fn get_next_prop(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let prop = inst.operands[1];
    let table = exec.state.object_table();
    let next = exec.recoverable(table.get(obj).and_then(|h| h.get_next_prop(&exec.state.memory, prop)))?;
    exec.store(inst, next)?;
    Ok(ExecutionResult::Continue)
}

pub fn put_prop(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let prop = inst.operands[1];
    let value = inst.operands[2];
    let table = exec.state.object_table();
    let addr = table.get(obj).and_then(|h| h.get_prop_addr(&exec.state.memory, prop));
    match addr {
        Ok(addr) if addr != 0 => {
            let len = crate::object::get_prop_len(&exec.state.memory, addr, exec.state.memory.header().version)?;
            if len == 1 {
                exec.state.memory.set_byte(addr, value as u8)?;
            } else {
                exec.state.memory.set_word(addr, value)?;
            }
            Ok(ExecutionResult::Continue)
        }
        Ok(_) => Err(ZmError::InvalidPropertyNumber { prop, max: exec.state.memory.header().property_defaults_count() }),
        Err(e) => {
            exec.recoverable::<u16>(Err(e))?;
            Ok(ExecutionResult::Continue)
        }
    }
}

pub fn get_sibling(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let table = exec.state.object_table();
    let sib = exec.recoverable(table.get(obj).and_then(|h| h.sibling_num(&exec.state.memory)))?;
    exec.store(inst, sib)?;
    exec.branch(inst, sib != 0)
}

pub fn get_child(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let table = exec.state.object_table();
    let child = exec.recoverable(table.get(obj).and_then(|h| h.child_num(&exec.state.memory)))?;
    exec.store(inst, child)?;
    exec.branch(inst, child != 0)
}

pub fn get_parent(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let table = exec.state.object_table();
    let parent = exec.recoverable(table.get(obj).and_then(|h| h.parent_num(&exec.state.memory)))?;
    exec.store(inst, parent)?;
    Ok(ExecutionResult::Continue)
}

pub fn get_prop_len(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let addr = inst.operands[0] as u32;
    let len = crate::object::get_prop_len(&exec.state.memory, addr, exec.state.memory.header().version)?;
    exec.store(inst, len as u16)?;
    Ok(ExecutionResult::Continue)
}

pub fn remove_obj(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let table = exec.state.object_table();
    let result = table.get(obj).and_then(|h| h.remove_obj(&mut exec.state.memory));
    exec.recoverable(result)?;
    Ok(ExecutionResult::Continue)
}

pub fn print_obj(exec: &mut Executor, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
    let obj = inst.operands[0];
    let table = exec.state.object_table();
    let text = match table.get(obj).and_then(|h| h.name(&exec.state.memory)) {
        Ok(t) => t,
        Err(e) if !e.is_fatal() => {
            log::warn!("{e}");
            String::new()
        }
        Err(e) => return Err(e),
    };
    exec.print_str(&text)?;
    Ok(ExecutionResult::Continue)
}
