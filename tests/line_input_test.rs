//! Drives `sread` through its full suspend/resume cycle: `Executor::run`
//! stops at `AwaitingInput`, a line is fed back through `resume`, and the
//! result is tokenised into the parse buffer via `parser::tokenise` before
//! the program reaches `quit`.

use zmcore::blob::MemoryBlobStore;
use zmcore::input::{FilenameOp, InputMode, InputPort, InputResult, InputState};
use zmcore::screen::HeadlessScreen;
use zmcore::state::InterpreterConfig;
use zmcore::zstring::encode;
use zmcore::{Executor, GameState, Memory, RunOutcome};

struct NullInput;

impl InputPort for NullInput {
    fn start_text_input(&mut self, _state: InputState) {}
    fn start_char_input(&mut self, _state: InputState) {}
    fn cancel(&mut self) {}
    fn prompt_for_filename(&mut self, _op: FilenameOp) -> Option<String> {
        None
    }
}

const TEXT_BUF: u32 = 0x80;
const PARSE_BUF: u32 = 0x90;
const DICT_BASE: u32 = 0x40;

fn build_story() -> Vec<u8> {
    let mut b = vec![0u8; 0x200];
    b[0x00] = 3; // version 3
    b[0x08] = 0x00;
    b[0x09] = DICT_BASE as u8; // dictionary address
    b[0x0C] = 0x00;
    b[0x0D] = 0x30; // globals (unused by this program, but must sit somewhere)
    b[0x0E] = 0x01;
    b[0x0F] = 0x00; // static mem base 0x0100
    b[0x06] = 0x01;
    b[0x07] = 0x00; // initial pc 0x0100

    // dictionary: one separator (','), 4-byte entries, one word "go".
    let dict = DICT_BASE as usize;
    b[dict] = 1;
    b[dict + 1] = b',';
    b[dict + 2] = 4;
    let n_entries: i16 = 1;
    b[dict + 3..dict + 5].copy_from_slice(&n_entries.to_be_bytes());
    let key = encode("go", 3);
    b[dict + 5] = (key[0] >> 8) as u8;
    b[dict + 6] = key[0] as u8;
    b[dict + 7] = (key[1] >> 8) as u8;
    b[dict + 8] = key[1] as u8;

    // text buffer: max length 20 bytes of input.
    b[TEXT_BUF as usize] = 20;
    // parse buffer: max 4 tokens.
    b[PARSE_BUF as usize] = 4;

    // main: sread text_buf, parse_buf (both small constants, < 0x100); quit.
    let main: [u8; 5] = [0xE4, 0x5F, TEXT_BUF as u8, PARSE_BUF as u8, 0xBA];
    b[0x100..0x100 + main.len()].copy_from_slice(&main);
    b
}

#[test]
fn sread_suspends_then_tokenises_on_resume() {
    let story = build_story();
    let memory = Memory::new(story.clone()).unwrap();
    let state = GameState::new(memory, InterpreterConfig::default());
    let mut exec = Executor::new(
        state,
        Box::new(HeadlessScreen::new()),
        Box::new(NullInput),
        Box::new(MemoryBlobStore::new()),
        story,
    );

    let outcome = exec.run().unwrap();
    assert_eq!(outcome, RunOutcome::AwaitingInput);
    assert_eq!(exec.pending_input_mode(), Some(InputMode::Text));

    let outcome = exec.resume(InputResult::Line { text: "go".to_string(), terminator: 13 }).unwrap();
    assert_eq!(outcome, RunOutcome::Quit);

    let word_count = exec.state.memory.get_byte(PARSE_BUF + 1).unwrap();
    assert_eq!(word_count, 1);
    let dict_addr = exec.state.memory.get_word(PARSE_BUF + 2).unwrap();
    assert_eq!(dict_addr, (DICT_BASE + 5) as u16);
    let token_len = exec.state.memory.get_byte(PARSE_BUF + 2 + 2).unwrap();
    assert_eq!(token_len, 2);
}
