//! Runs a hand-assembled story file through the public `Executor` API:
//! call a routine, add two values, store the result in a global, and
//! quit. Exercises decode, call/return, variable storage, and the run
//! loop together rather than any one module in isolation.

use zmcore::blob::MemoryBlobStore;
use zmcore::input::{FilenameOp, InputPort, InputState};
use zmcore::screen::HeadlessScreen;
use zmcore::state::InterpreterConfig;
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

fn build_story() -> Vec<u8> {
    let mut b = vec![0u8; 0x300];
    b[0x00] = 3; // version 3
    b[0x04] = 0x02;
    b[0x05] = 0x00; // high mem base 0x0200
    b[0x06] = 0x01;
    b[0x07] = 0x00; // initial pc 0x0100
    b[0x0C] = 0x00;
    b[0x0D] = 0x50; // globals at 0x0050
    b[0x0E] = 0x02;
    b[0x0F] = 0x00; // static mem base 0x0200

    // main: call 0x0100 (packed addr of routine at 0x0200) with arg 5,
    // storing the result in global 16; print_num global 16; new_line; quit.
    let main: [u8; 11] = [0xE0, 0x1F, 0x01, 0x00, 0x05, 0x10, 0xE6, 0xBF, 0x10, 0xBB, 0xBA];
    b[0x100..0x100 + main.len()].copy_from_slice(&main);

    // routine at 0x0200: 1 local (default 0), add local1 + 37 -> stack, ret_popped.
    let routine: [u8; 8] = [0x01, 0x00, 0x00, 0x54, 0x01, 37, 0x00, 0xB8];
    b[0x200..0x200 + routine.len()].copy_from_slice(&routine);
    b
}

#[test]
fn call_add_and_store_reaches_quit_with_expected_result() {
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
    assert_eq!(outcome, RunOutcome::Quit);
    // global 16 <- call_routine(arg 5) which adds 37 -> 42
    assert_eq!(exec.state.load_variable(16, true).unwrap(), 42);
}
