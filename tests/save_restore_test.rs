//! Drives `save`/`restore` (v4 store-opcode form) through `Executor`: a
//! global is set, saved, stomped, then restored, and must come back to the
//! saved value. Exercises `opcodes::routine::{save, restore}` together with
//! the Quetzal roundtrip in `quetzal::save`/`quetzal::restore`.

use zmcore::blob::MemoryBlobStore;
use zmcore::input::{FilenameOp, InputPort, InputState};
use zmcore::screen::HeadlessScreen;
use zmcore::state::InterpreterConfig;
use zmcore::{Executor, GameState, Memory, RunOutcome};

struct FixedNameInput;

impl InputPort for FixedNameInput {
    fn start_text_input(&mut self, _state: InputState) {}
    fn start_char_input(&mut self, _state: InputState) {}
    fn cancel(&mut self) {}
    fn prompt_for_filename(&mut self, _op: FilenameOp) -> Option<String> {
        Some("roundtrip.qzl".to_string())
    }
}

fn build_story() -> Vec<u8> {
    let mut b = vec![0u8; 0x200];
    b[0x00] = 4; // version 4: save/restore are store opcodes, not branch
    b[0x04] = 0x01;
    b[0x05] = 0x00; // high mem base 0x0100
    b[0x06] = 0x01;
    b[0x07] = 0x00; // initial pc 0x0100
    b[0x0C] = 0x00;
    b[0x0D] = 0x50; // globals at 0x0050
    b[0x0E] = 0x01;
    b[0x0F] = 0x00; // static mem base 0x0100

    // store 16,77 ; save -> var20 ; store 16,99 ; restore -> var21 ; quit
    let main: [u8; 11] = [
        0x0D, 16, 77, // store (2OP:0x0D), both small constants
        0xB5, 20, // save (0OP:0x05), store_var 20
        0x0D, 16, 99, // stomp global 16
        0xB6, 21, // restore (0OP:0x06), store_var 21
        0xBA, // quit
    ];
    b[0x100..0x100 + main.len()].copy_from_slice(&main);
    b
}

#[test]
fn save_then_restore_recovers_stomped_global() {
    let story = build_story();
    let memory = Memory::new(story.clone()).unwrap();
    let state = GameState::new(memory, InterpreterConfig::default());
    let mut exec = Executor::new(
        state,
        Box::new(HeadlessScreen::new()),
        Box::new(FixedNameInput),
        Box::new(MemoryBlobStore::new()),
        story,
    );

    let outcome = exec.run().unwrap();
    assert_eq!(outcome, RunOutcome::Quit);

    // var20 held `save`'s own success flag live, but that write happened
    // after the snapshot was taken, so the restore's full dynamic-memory
    // copy reverts it back to its pre-save value of 0.
    assert_eq!(exec.state.load_variable(20, true).unwrap(), 0, "save's own result flag predates the snapshot, so restore reverts it");
    assert_eq!(exec.state.load_variable(21, true).unwrap(), 1, "restore should report success");
    assert_eq!(exec.state.load_variable(16, true).unwrap(), 77, "global should be restored, not the stomped 99");
}
