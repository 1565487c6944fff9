//! Fetch-decode-execute loop and the `Executor` context every opcode
//! function is handed (spec §4.7, §5 "Run loop"). Dispatch indexes the
//! five fixed opcode tables in [`crate::opcodes`] rather than matching on
//! mnemonics, per the design note in spec §9.

use crate::blob::BlobStore;
use crate::error::ZmError;
use crate::input::{InputMode, InputPort, InputResult, InputState};
use crate::instruction::{Instruction, InstructionForm, OperandCount, OperandType};
use crate::opcodes::{ext_table, op0_table, op1_table, op2_table, var_table};
use crate::parser::tokenise;
use crate::screen::ScreenPort;
use crate::state::GameState;
use log::warn;

#[derive(Debug, Clone)]
pub enum ExecutionResult {
    Continue,
    Suspend(InputState),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    AwaitingInput,
    Quit,
}

pub struct Executor {
    pub state: GameState,
    pub screen: Box<dyn ScreenPort>,
    pub input: Box<dyn InputPort>,
    pub blobs: Box<dyn BlobStore>,
    /// The untouched story file bytes, kept for `restart` (spec §4.8).
    pub original_story: Vec<u8>,
    pending_input: Option<InputState>,
}

impl Executor {
    pub fn new(state: GameState, screen: Box<dyn ScreenPort>, input: Box<dyn InputPort>, blobs: Box<dyn BlobStore>, original_story: Vec<u8>) -> Executor {
        Executor { state, screen, input, blobs, original_story, pending_input: None }
    }

    /// Writes `value` to `inst.store_var`, a no-op if the opcode has none
    /// (some store-tail opcodes are conditionally storing, e.g. `sread`
    /// pre-v5).
    pub fn store(&mut self, inst: &Instruction, value: u16) -> Result<(), ZmError> {
        if let Some(var) = inst.store_var {
            self.state.store_variable(var, value, false)?;
        }
        Ok(())
    }

    /// Evaluates `inst`'s branch tail against `cond`, performing the
    /// implicit `rtrue`/`rfalse` the Standard assigns to offsets 0 and 1.
    pub fn branch(&mut self, inst: &Instruction, cond: bool) -> Result<ExecutionResult, ZmError> {
        let Some(info) = inst.branch else {
            return Ok(ExecutionResult::Continue);
        };
        match self.state.do_branch(cond, info.on_true, info.offset) {
            Some(value) => {
                self.state.return_from_routine(value as u16)?;
            }
            None => {}
        }
        Ok(ExecutionResult::Continue)
    }

    /// Downgrades a non-fatal [`ZmError`] (spec §7) to `T::default()`,
    /// logging it; propagates fatal errors unchanged.
    pub fn recoverable<T: Default>(&self, result: Result<T, ZmError>) -> Result<T, ZmError> {
        match result {
            Ok(v) => Ok(v),
            Err(e) if !e.is_fatal() => {
                warn!("{e}");
                Ok(T::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Prints through the screen port, logging (not propagating) a port
    /// failure: there is no `ZmError` variant for display-side faults, and
    /// losing output is preferable to aborting the game over it.
    pub fn print_str(&mut self, text: &str) -> Result<(), ZmError> {
        if let Err(e) = self.screen.print(text) {
            warn!("screen port: {e}");
        }
        Ok(())
    }

    fn dispatch(&mut self, inst: &Instruction) -> Result<ExecutionResult, ZmError> {
        let version = self.state.memory.header().version;
        let table_entry = match (inst.form, inst.operand_count) {
            (InstructionForm::Extended, _) => ext_table().get(inst.opcode as usize).copied().flatten(),
            (_, OperandCount::OP0) => op0_table(version).get(inst.opcode as usize).copied().flatten(),
            (_, OperandCount::OP1) => op1_table(version).get(inst.opcode as usize).copied().flatten(),
            (_, OperandCount::OP2) => op2_table().get(inst.opcode as usize).copied().flatten(),
            (_, OperandCount::VAR) => var_table().get(inst.opcode as usize).copied().flatten(),
        };
        match table_entry {
            Some(f) => f(self, inst),
            None => Err(ZmError::InvalidOpcode { opcode: inst.opcode, form: opcode_form_name(inst), pc: inst.addr }),
        }
    }

    /// Decodes and executes exactly one instruction.
    pub fn step(&mut self) -> Result<ExecutionResult, ZmError> {
        let version = self.state.memory.header().version;
        let mut inst = Instruction::decode(&self.state.memory, self.state.pc, version)?;
        self.state.pc += inst.size;
        self.resolve_operands(&mut inst)?;
        self.dispatch(&inst)
    }

    /// Replaces every `Variable`-typed operand with the value it names
    /// (spec §4.3): reading variable 0 pops the stack rather than peeking
    /// it. `SmallConstant`/`LargeConstant` operands are literal and pass
    /// through untouched. Opcodes that take an operand as an indirect
    /// variable number (`load`, `store`, `inc`, `dec`, `inc_chk`,
    /// `dec_chk`, `pull`) still see the right thing: when that operand is
    /// itself encoded as a literal small constant the resolved value IS
    /// the variable number, and when it's encoded as `Variable` the
    /// Standard's double-indirection applies the same way.
    fn resolve_operands(&mut self, inst: &mut Instruction) -> Result<(), ZmError> {
        for (ty, value) in inst.operand_types.iter().zip(inst.operands.iter_mut()) {
            if *ty == OperandType::Variable {
                *value = self.state.load_variable(*value as u8, false)?;
            }
        }
        Ok(())
    }

    /// Runs until the game suspends for input or quits.
    pub fn run(&mut self) -> Result<RunOutcome, ZmError> {
        loop {
            match self.step()? {
                ExecutionResult::Continue => continue,
                ExecutionResult::Suspend(input_state) => {
                    match input_state.mode {
                        InputMode::Text => self.input.start_text_input(input_state.clone()),
                        InputMode::Char => self.input.start_char_input(input_state.clone()),
                    }
                    self.pending_input = Some(input_state);
                    return Ok(RunOutcome::AwaitingInput);
                }
                ExecutionResult::Quit => return Ok(RunOutcome::Quit),
            }
        }
    }

    /// Which kind of input (if any) the last `run()` call suspended for.
    /// Hosts read this to decide whether to collect a line or a keystroke
    /// before calling `resume`.
    pub fn pending_input_mode(&self) -> Option<InputMode> {
        self.pending_input.as_ref().map(|s| s.mode)
    }

    /// Feeds a completed input operation back in and resumes `run()`.
    pub fn resume(&mut self, result: InputResult) -> Result<RunOutcome, ZmError> {
        let pending = self.pending_input.take().expect("resume called with no pending input");
        match result {
            InputResult::Line { text, terminator } => self.complete_line_input(&pending, &text, terminator)?,
            InputResult::Key { zscii } => {
                if let Some(var) = pending.store_var {
                    self.state.store_variable(var, zscii, false)?;
                }
            }
            InputResult::TimedOut => {
                let aborts = match self.run_timer_routine(pending.timer_routine)? {
                    Some(value) => value != 0,
                    None => return Ok(RunOutcome::Quit),
                };
                if !aborts {
                    self.pending_input = Some(pending);
                    return Ok(RunOutcome::AwaitingInput);
                }
                if let Some(var) = pending.store_var {
                    self.state.store_variable(var, 0, false)?;
                }
            }
        }
        self.run()
    }

    /// Runs `packed_addr` as a nested routine call to completion (spec
    /// §4.7 timed input): the timer callback fires without disturbing the
    /// pending read, and only aborts it if it returns non-zero. `packed_addr
    /// == 0` means no timer routine was registered, equivalent to a
    /// non-aborting return of 0. Returns `None` if the routine itself quit
    /// the game.
    fn run_timer_routine(&mut self, packed_addr: u16) -> Result<Option<u16>, ZmError> {
        if packed_addr == 0 {
            return Ok(Some(0));
        }
        let depth = self.state.call_stack.len();
        self.state.call_routine(packed_addr as u32, true, Some(0), &[], self.state.pc)?;
        loop {
            if self.state.call_stack.len() <= depth {
                return Ok(Some(self.state.pop()));
            }
            match self.step()? {
                ExecutionResult::Continue => continue,
                ExecutionResult::Suspend(_) => {
                    warn!("timer routine attempted interactive input; treating as non-aborting");
                    return Ok(Some(0));
                }
                ExecutionResult::Quit => return Ok(None),
            }
        }
    }

    fn complete_line_input(&mut self, pending: &InputState, text: &str, terminator: u8) -> Result<(), ZmError> {
        let version = self.state.memory.header().version;
        let lower: String = text.chars().map(|c| c.to_ascii_lowercase()).collect();
        let buf = pending.text_buffer_addr;
        if version <= 4 {
            let max_len = self.state.memory.get_byte(buf)? as usize;
            for (i, b) in lower.bytes().take(max_len).enumerate() {
                self.state.memory.set_byte(buf + 1 + i as u32, b)?;
            }
            self.state.memory.set_byte(buf + 1 + lower.len().min(max_len) as u32, 0)?;
        } else {
            let max_len = self.state.memory.get_byte(buf)? as usize;
            let n = lower.len().min(max_len);
            self.state.memory.set_byte(buf + 1, n as u8)?;
            for (i, b) in lower.bytes().take(n).enumerate() {
                self.state.memory.set_byte(buf + 2 + i as u32, b)?;
            }
        }
        if pending.parse_buffer_addr != 0 {
            tokenise(&mut self.state.memory, buf, pending.parse_buffer_addr, 0, false)?;
        }
        if let Some(var) = pending.store_var {
            self.state.store_variable(var, terminator as u16, false)?;
        }
        Ok(())
    }
}

fn opcode_form_name(inst: &Instruction) -> &'static str {
    match inst.operand_count {
        OperandCount::OP0 => "0OP",
        OperandCount::OP1 => "1OP",
        OperandCount::OP2 => "2OP",
        OperandCount::VAR if inst.form == InstructionForm::Extended => "EXT",
        OperandCount::VAR => "VAR",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::input::FilenameOp;
    use crate::memory::Memory;
    use crate::screen::HeadlessScreen;
    use crate::state::InterpreterConfig;

    struct NullInput;
    impl InputPort for NullInput {
        fn start_text_input(&mut self, _state: InputState) {}
        fn start_char_input(&mut self, _state: InputState) {}
        fn cancel(&mut self) {}
        fn prompt_for_filename(&mut self, _op: FilenameOp) -> Option<String> {
            None
        }
    }

    fn test_executor() -> Executor {
        let mut b = vec![0u8; 0x200];
        b[0x00] = 3;
        b[0x0E] = 0x01;
        b[0x0F] = 0x00;
        // add #5 #37 -> sp ; long form 2OP 0x14, both small constants
        b[0x100] = 0x14;
        b[0x101] = 5;
        b[0x102] = 37;
        b[0x103] = 0; // store to variable 0 (stack)
        b[0x104] = 0xBA; // quit (0OP short form)
        let story = b.clone();
        let memory = Memory::new(b).unwrap();
        let state = GameState::new(memory, InterpreterConfig::default());
        Executor::new(state, Box::new(HeadlessScreen::new()), Box::new(NullInput), Box::new(MemoryBlobStore::new()), story)
    }

    #[test]
    fn step_decodes_and_advances_pc() {
        let mut exec = test_executor();
        let before = exec.state.pc;
        exec.step().unwrap();
        assert!(exec.state.pc > before);
        assert_eq!(exec.state.peek(), 42);
    }

    #[test]
    fn run_reaches_quit() {
        let mut exec = test_executor();
        let outcome = exec.run().unwrap();
        assert_eq!(outcome, RunOutcome::Quit);
    }
}
