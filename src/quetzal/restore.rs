//! `restore` opcode support: read a Quetzal blob back via the host's
//! [`BlobStore`] and apply it to [`GameState`] in place. PC is left alone
//! per spec §4.8 — the opcode that called `restore` resumes normally,
//! it does not jump to the saved PC.

use crate::blob::BlobStore;
use crate::error::ZmError;
use crate::quetzal::chunks::{IfhdChunk, StksChunk};
use crate::quetzal::compressed_memory::decompress_memory;
use crate::quetzal::iff::IffFile;
use crate::state::GameState;
use log::{debug, info};

pub fn deserialise(state: &mut GameState, bytes: &[u8]) -> Result<(), ZmError> {
    let iff = IffFile::from_bytes(bytes)?;
    if iff.form_type != *b"IFZS" {
        return Err(ZmError::SaveFormatError { message: "not a Quetzal (IFZS) file".to_string() });
    }
    let ifhd_chunk = iff.find_chunk(b"IFhd").ok_or(ZmError::SaveFormatError { message: "missing IFhd chunk".to_string() })?;
    let ifhd = IfhdChunk::from_bytes(&ifhd_chunk.data)?;
    ifhd.check_identity(state.memory.header())?;

    let dynamic_size = state.memory.header().static_mem_base as usize;
    if let Some(cmem) = iff.find_chunk(b"CMem") {
        debug!("restoring from CMem chunk");
        let restored = decompress_memory(&cmem.data, state.original_dynamic_memory())
            .map_err(|message| ZmError::SaveFormatError { message })?;
        state.memory.dynamic_memory_mut().copy_from_slice(&restored);
    } else if let Some(umem) = iff.find_chunk(b"UMem") {
        debug!("restoring from UMem chunk");
        if umem.data.len() != dynamic_size {
            return Err(ZmError::SaveFormatError { message: "UMem size does not match dynamic memory size".to_string() });
        }
        state.memory.dynamic_memory_mut().copy_from_slice(&umem.data);
    } else {
        return Err(ZmError::SaveFormatError { message: "missing CMem/UMem chunk".to_string() });
    }

    let stks_chunk = iff.find_chunk(b"Stks").ok_or(ZmError::SaveFormatError { message: "missing Stks chunk".to_string() })?;
    let stks = StksChunk { data: stks_chunk.data.clone() };
    let (call_stack, stack) = stks.decode()?;
    state.call_stack = call_stack;
    state.stack = stack;
    info!("game restored ({} call frames)", state.call_stack.len());
    Ok(())
}

pub fn restore_game(state: &mut GameState, store: &dyn BlobStore, name: &str) -> Result<(), ZmError> {
    let bytes = store.read(name).ok_or(ZmError::SaveIoError { message: format!("no such save: {name}") })?;
    deserialise(state, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use crate::memory::Memory;
    use crate::quetzal::save::save_game;
    use crate::state::InterpreterConfig;

    fn state() -> GameState {
        let mut b = vec![0u8; 0x200];
        b[0x00] = 3;
        b[0x0E] = 0x01;
        b[0x0F] = 0x00;
        b[0x02] = 0x00;
        b[0x03] = 0x03;
        GameState::new(Memory::new(b).unwrap(), InterpreterConfig::default())
    }

    #[test]
    fn save_then_restore_roundtrips_memory() {
        let mut s = state();
        s.memory.force_set_byte(0x10, 0xAB).unwrap();
        let mut store = MemoryBlobStore::new();
        save_game(&s, &mut store, "a.qzl").unwrap();

        let mut fresh = state();
        restore_game(&mut fresh, &store, "a.qzl").unwrap();
        assert_eq!(fresh.memory.get_byte(0x10).unwrap(), 0xAB);
    }

    #[test]
    fn identity_mismatch_is_rejected() {
        let s = state();
        let mut store = MemoryBlobStore::new();
        save_game(&s, &mut store, "a.qzl").unwrap();

        let mut b = vec![0u8; 0x200];
        b[0x00] = 3;
        b[0x0E] = 0x01;
        b[0x0F] = 0x00;
        b[0x02] = 0x00;
        b[0x03] = 0x09; // different release
        let mut other = GameState::new(Memory::new(b).unwrap(), InterpreterConfig::default());
        assert!(matches!(restore_game(&mut other, &store, "a.qzl"), Err(ZmError::SaveIdentityMismatch { .. })));
    }
}
