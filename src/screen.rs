//! Screen port: the narrow interface the core calls into for all display
//! output. Terminal/pixel rendering is an external collaborator (spec §1,
//! §6 "Screen port") — this module only defines the trait and its error
//! type, mirroring the teacher's `display_trait::ZMachineDisplay` /
//! `DisplayError` split between interface and implementation.

use std::fmt;

#[derive(Debug, Clone)]
pub struct ScreenError {
    pub message: String,
}

impl ScreenError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl fmt::Display for ScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "screen port error: {}", self.message)
    }
}

impl std::error::Error for ScreenError {}

/// Capability flags the core reports into header bytes 0x01/0x10 at
/// startup (spec §6).
#[derive(Debug, Clone, Copy, Default)]
pub struct ScreenCapabilities {
    pub has_colors: bool,
    pub has_bold: bool,
    pub has_italic: bool,
    pub has_fixed_pitch: bool,
    pub has_split_window: bool,
    pub has_timed_input: bool,
}

/// Operations the core calls (spec §6 "Screen port").
pub trait ScreenPort {
    fn get_size(&self) -> (u16, u16);
    fn get_capabilities(&self) -> ScreenCapabilities;
    fn print(&mut self, text: &str) -> Result<(), ScreenError>;
    fn print_char(&mut self, zscii: u16) -> Result<(), ScreenError>;
    fn set_text_style(&mut self, bits: u16) -> Result<(), ScreenError>;
    fn set_window(&mut self, window: u8) -> Result<(), ScreenError>;
    fn erase_window(&mut self, window: i16) -> Result<(), ScreenError>;
    fn split_window(&mut self, rows: u16) -> Result<(), ScreenError>;
    fn set_cursor(&mut self, row: u16, col: u16) -> Result<(), ScreenError>;
    fn get_cursor(&mut self) -> Result<(u16, u16), ScreenError>;
    fn update_status_bar(&mut self, left: &str, right: &str) -> Result<(), ScreenError>;
}

/// A no-op/log-only screen used in tests and by headless hosts; grounded
/// in the teacher's `display_headless`.
pub struct HeadlessScreen {
    pub transcript: String,
}

impl HeadlessScreen {
    pub fn new() -> Self {
        HeadlessScreen { transcript: String::new() }
    }
}

impl Default for HeadlessScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenPort for HeadlessScreen {
    fn get_size(&self) -> (u16, u16) {
        (25, 80)
    }

    fn get_capabilities(&self) -> ScreenCapabilities {
        ScreenCapabilities::default()
    }

    fn print(&mut self, text: &str) -> Result<(), ScreenError> {
        self.transcript.push_str(text);
        Ok(())
    }

    fn print_char(&mut self, zscii: u16) -> Result<(), ScreenError> {
        if let Some(c) = char::from_u32(zscii as u32) {
            self.transcript.push(c);
        }
        Ok(())
    }

    fn set_text_style(&mut self, _bits: u16) -> Result<(), ScreenError> {
        Ok(())
    }

    fn set_window(&mut self, _window: u8) -> Result<(), ScreenError> {
        Ok(())
    }

    fn erase_window(&mut self, _window: i16) -> Result<(), ScreenError> {
        Ok(())
    }

    fn split_window(&mut self, _rows: u16) -> Result<(), ScreenError> {
        Ok(())
    }

    fn set_cursor(&mut self, _row: u16, _col: u16) -> Result<(), ScreenError> {
        Ok(())
    }

    fn get_cursor(&mut self) -> Result<(u16, u16), ScreenError> {
        Ok((1, 1))
    }

    fn update_status_bar(&mut self, _left: &str, _right: &str) -> Result<(), ScreenError> {
        Ok(())
    }
}
