//! Headless CLI driver: loads a story file, runs it against stdin/stdout,
//! and persists Quetzal saves as sibling files on disk. Illustrates how a
//! host wires the three ports (`screen`, `input`, `blob`) into
//! [`zmcore::Executor`]; real hosts (terminal UI, web, etc.) provide their
//! own port implementations instead of this one.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use zmcore::blob::BlobStore;
use zmcore::input::{FilenameOp, InputMode, InputPort, InputResult, InputState};
use zmcore::screen::{ScreenCapabilities, ScreenError, ScreenPort};
use zmcore::state::InterpreterConfig;
use zmcore::{Executor, GameState, Memory, RunOutcome};

struct StdioScreen;

impl ScreenPort for StdioScreen {
    fn get_size(&self) -> (u16, u16) {
        (25, 80)
    }

    fn get_capabilities(&self) -> ScreenCapabilities {
        ScreenCapabilities::default()
    }

    fn print(&mut self, text: &str) -> Result<(), ScreenError> {
        print!("{text}");
        io::stdout().flush().ok();
        Ok(())
    }

    fn print_char(&mut self, zscii: u16) -> Result<(), ScreenError> {
        if let Some(c) = char::from_u32(zscii as u32) {
            print!("{c}");
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

    fn update_status_bar(&mut self, left: &str, right: &str) -> Result<(), ScreenError> {
        println!("\n[{left} | {right}]");
        Ok(())
    }
}

struct StdioInput;

impl InputPort for StdioInput {
    fn start_text_input(&mut self, _state: InputState) {}
    fn start_char_input(&mut self, _state: InputState) {}
    fn cancel(&mut self) {}

    fn prompt_for_filename(&mut self, op: FilenameOp) -> Option<String> {
        let verb = match op {
            FilenameOp::Save => "save",
            FilenameOp::Restore => "restore",
        };
        print!("filename to {verb} [game.qzl]: ");
        io::stdout().flush().ok();
        let mut line = String::new();
        io::stdin().read_line(&mut line).ok()?;
        let trimmed = line.trim();
        Some(if trimmed.is_empty() { "game.qzl".to_string() } else { trimmed.to_string() })
    }
}

fn collect_input(mode: InputMode) -> InputResult {
    match mode {
        InputMode::Char => {
            let mut buf = [0u8; 1];
            use std::io::Read;
            io::stdin().read_exact(&mut buf).ok();
            InputResult::Key { zscii: buf[0] as u16 }
        }
        InputMode::Text => {
            let mut line = String::new();
            io::stdin().read_line(&mut line).ok();
            let trimmed = line.trim_end_matches(['\n', '\r']);
            InputResult::Line { text: trimmed.to_string(), terminator: 13 }
        }
    }
}

struct DiskBlobStore {
    dir: std::path::PathBuf,
}

impl BlobStore for DiskBlobStore {
    fn read(&self, name: &str) -> Option<Vec<u8>> {
        fs::read(self.dir.join(name)).ok()
    }

    fn write(&mut self, name: &str, bytes: &[u8]) {
        let _ = fs::write(self.dir.join(name), bytes);
    }

    fn list(&self, pattern: &str) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else { return Vec::new() };
        entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|n| n.contains(pattern))
            .collect()
    }

    fn exists(&self, name: &str) -> bool {
        self.dir.join(name).exists()
    }

    fn delete(&mut self, name: &str) -> bool {
        fs::remove_file(self.dir.join(name)).is_ok()
    }

    fn ensure_dir(&mut self, name: &str) {
        let _ = fs::create_dir_all(self.dir.join(name));
    }
}

fn main() -> ExitCode {
    env_logger_init();
    let path = match env::args().nth(1) {
        Some(p) => p,
        None => {
            eprintln!("usage: zmcore-run <story-file>");
            return ExitCode::FAILURE;
        }
    };
    let story = match fs::read(&path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("failed to read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    let memory = match Memory::new(story.clone()) {
        Ok(m) => m,
        Err(message) => {
            eprintln!("invalid story file: {message}");
            return ExitCode::FAILURE;
        }
    };
    let state = GameState::new(memory, InterpreterConfig::default());
    let blobs = DiskBlobStore { dir: env::current_dir().unwrap_or_default() };
    let mut exec = Executor::new(state, Box::new(StdioScreen), Box::new(StdioInput), Box::new(blobs), story);

    let mut outcome = match exec.run() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("fatal: {e}");
            return ExitCode::FAILURE;
        }
    };
    while outcome == RunOutcome::AwaitingInput {
        let mode = exec.pending_input_mode().expect("AwaitingInput always carries a pending mode");
        let result = collect_input(mode);
        outcome = match exec.resume(result) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("fatal: {e}");
                return ExitCode::FAILURE;
            }
        };
    }
    ExitCode::SUCCESS
}

fn env_logger_init() {
    let _ = env_logger::try_init();
}
