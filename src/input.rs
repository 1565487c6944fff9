//! Input port: the narrow interface the executor calls when an opcode
//! needs user input, and the suspend/resume state it carries (spec §4.7,
//! §5, §6 "Input port").

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Text,
    Char,
}

/// Carried by a `Suspend` result out of the executor and back in via
/// `resume`/`on_key`.
#[derive(Debug, Clone)]
pub struct InputState {
    pub mode: InputMode,
    /// Text buffer address (`sread`/`aread`).
    pub text_buffer_addr: u32,
    /// Parse buffer address, or 0 if none was supplied.
    pub parse_buffer_addr: u32,
    /// Variable to store the result in (`read_char`, and v4+ `aread`).
    pub store_var: Option<u8>,
    /// Tenths of a second before the timer routine fires, or 0 for none.
    pub timeout_tenths: u16,
    /// Packed address of the timer routine, or 0 for none.
    pub timer_routine: u16,
}

/// Operations the executor calls on the host's input port.
pub trait InputPort {
    fn start_text_input(&mut self, state: InputState);
    fn start_char_input(&mut self, state: InputState);
    fn cancel(&mut self);
    fn prompt_for_filename(&mut self, op: FilenameOp) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameOp {
    Save,
    Restore,
}

/// Result of a completed line/key input, delivered back into the
/// executor via `Executor::resume`.
#[derive(Debug, Clone)]
pub enum InputResult {
    Line { text: String, terminator: u8 },
    Key { zscii: u16 },
    /// The host's clock hit `timeout_tenths` with no input yet collected.
    /// `Executor::resume` runs `timer_routine` to completion as a nested
    /// call and only aborts the read if it returns non-zero; otherwise
    /// input keeps waiting.
    TimedOut,
}
