//! `save` opcode support: serialise [`GameState`] into a Quetzal IFZS blob
//! and hand it to the host's [`BlobStore`]. See spec §6.

use crate::blob::BlobStore;
use crate::error::ZmError;
use crate::quetzal::chunks::{IfhdChunk, StksChunk};
use crate::quetzal::compressed_memory::compress_memory;
use crate::quetzal::iff::IffFile;
use crate::state::GameState;

pub fn serialise(state: &GameState) -> Vec<u8> {
    let mut iff = IffFile::new(*b"IFZS");
    iff.add_chunk(*b"IFhd", IfhdChunk::from_state(state).to_bytes());
    let dynamic = state.memory.dynamic_memory();
    let compressed = compress_memory(dynamic, state.original_dynamic_memory());
    iff.add_chunk(*b"CMem", compressed);
    iff.add_chunk(*b"Stks", StksChunk::from_state(state).to_bytes());
    iff.to_bytes()
}

pub fn save_game(state: &GameState, store: &mut dyn BlobStore, name: &str) -> Result<(), ZmError> {
    let bytes = serialise(state);
    store.write(name, &bytes);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::memory::Memory;
    use crate::state::InterpreterConfig;

    #[test]
    fn save_writes_a_blob() {
        let mut b = vec![0u8; 0x200];
        b[0x00] = 3;
        b[0x0E] = 0x01;
        b[0x0F] = 0x00;
        let state = GameState::new(Memory::new(b).unwrap(), InterpreterConfig::default());
        let mut store = MemoryBlobStore::new();
        save_game(&state, &mut store, "save1.qzl").unwrap();
        assert!(store.exists("save1.qzl"));
    }
}
