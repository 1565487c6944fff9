//! Byte-addressable story image: regions, big-endian access, packed
//! addresses. See spec §3 "Memory image" and §4.1.

use crate::error::ZmError;
use crate::header::{Header, VersionClass};
use log::{debug, warn};

pub struct Memory {
    bytes: Vec<u8>,
    header: Header,
}

impl Memory {
    /// Build a `Memory` from a raw story file image, validating the header.
    pub fn new(bytes: Vec<u8>) -> Result<Memory, String> {
        let header = Header::parse(&bytes)?;
        if bytes.len() > header.max_memory_size() {
            warn!(
                "story image {} bytes exceeds v{} maximum {}; continuing anyway",
                bytes.len(),
                header.version,
                header.max_memory_size()
            );
        }
        Ok(Memory { bytes, header })
    }

    /// Build without header validation, for hand-built test fixtures.
    pub fn new_unchecked(bytes: Vec<u8>) -> Memory {
        let header = Header::parse_unchecked(&bytes);
        Memory { bytes, header }
    }

    /// Merges `bits` into the low byte of flags2 (offset 0x11), updating
    /// both the raw image and the cached `Header`. Used by `restart` (spec
    /// §4.8) to carry the transcribing-on and fixed-pitch-font bits across
    /// a fresh load of the story, since those reflect player/interpreter
    /// state rather than game state.
    pub fn preserve_flags2_bits(&mut self, bits: u16) {
        self.header.flags2 |= bits;
        self.bytes[0x11] |= bits as u8;
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn raw(&self) -> &[u8] {
        &self.bytes
    }

    fn check_bounds(&self, addr: u32) -> Result<(), ZmError> {
        if (addr as usize) >= self.bytes.len() {
            return Err(ZmError::OutOfBoundsAddress { addr, size: self.bytes.len() as u32 });
        }
        Ok(())
    }

    pub fn get_byte(&self, addr: u32) -> Result<u8, ZmError> {
        self.check_bounds(addr)?;
        Ok(self.bytes[addr as usize])
    }

    pub fn get_word(&self, addr: u32) -> Result<u16, ZmError> {
        self.check_bounds(addr + 1)?;
        let a = addr as usize;
        Ok(u16::from_be_bytes([self.bytes[a], self.bytes[a + 1]]))
    }

    pub fn set_byte(&mut self, addr: u32, value: u8) -> Result<(), ZmError> {
        self.check_bounds(addr)?;
        if !(addr < self.header.static_mem_base as u32) {
            return Err(ZmError::ReadOnlyMemory { addr, static_base: self.header.static_mem_base });
        }
        self.bytes[addr as usize] = value;
        Ok(())
    }

    pub fn set_word(&mut self, addr: u32, value: u16) -> Result<(), ZmError> {
        self.check_bounds(addr + 1)?;
        if !(addr < self.header.static_mem_base as u32) {
            return Err(ZmError::ReadOnlyMemory { addr, static_base: self.header.static_mem_base });
        }
        let [hi, lo] = value.to_be_bytes();
        let a = addr as usize;
        self.bytes[a] = hi;
        self.bytes[a + 1] = lo;
        Ok(())
    }

    /// Force a write bypassing the dynamic-memory guard. Only the restore
    /// path and story (re)load use this.
    pub fn force_set_byte(&mut self, addr: u32, value: u8) -> Result<(), ZmError> {
        self.check_bounds(addr)?;
        self.bytes[addr as usize] = value;
        Ok(())
    }

    pub fn is_dynamic(&self, addr: u32) -> bool {
        addr < self.header.static_mem_base as u32
    }

    pub fn is_static(&self, addr: u32) -> bool {
        addr >= self.header.static_mem_base as u32 && addr < self.header.high_mem_base as u32
    }

    pub fn is_high(&self, addr: u32) -> bool {
        addr >= self.header.high_mem_base as u32
    }

    pub fn dynamic_memory(&self) -> &[u8] {
        &self.bytes[0..self.header.static_mem_base as usize]
    }

    pub fn dynamic_memory_mut(&mut self) -> &mut [u8] {
        let end = self.header.static_mem_base as usize;
        &mut self.bytes[0..end]
    }

    /// Read a packed Z-string's raw Z-characters (5-bit, three per word)
    /// until a word with the high bit set terminates it.
    pub fn get_zstring_words(&self, addr: u32) -> Result<Vec<u16>, ZmError> {
        let mut words = Vec::new();
        let mut a = addr;
        loop {
            let w = self.get_word(a)?;
            words.push(w);
            if w & 0x8000 != 0 {
                break;
            }
            a += 2;
        }
        Ok(words)
    }

    /// Unpack a routine address (spec §4.1).
    pub fn unpack_routine(&self, packed: u16) -> u32 {
        match self.header.version_class() {
            VersionClass::Classic => packed as u32 * 2,
            VersionClass::Plus => packed as u32 * 4,
            VersionClass::Graphics => packed as u32 * 4 + self.header.routines_offset as u32 * 8,
            VersionClass::Wide => packed as u32 * 8,
        }
    }

    /// Unpack a string address (spec §4.1); v6-7 uses a separate offset.
    pub fn unpack_string(&self, packed: u16) -> u32 {
        match self.header.version_class() {
            VersionClass::Classic => packed as u32 * 2,
            VersionClass::Plus => packed as u32 * 4,
            VersionClass::Graphics => packed as u32 * 4 + self.header.strings_offset as u32 * 8,
            VersionClass::Wide => packed as u32 * 8,
        }
    }

    /// Validate a byte address produced by unpacking is divisor-aligned,
    /// per spec §3 "Packed-address alignment".
    pub fn check_packed_alignment(&self, packed: u16, byte_addr: u32) -> Result<(), ZmError> {
        let divisor = self.header.packed_address_divisor();
        if byte_addr % divisor != 0 {
            return Err(ZmError::UnalignedPackedAddress {
                packed: packed as u32,
                byte_addr,
                divisor,
            });
        }
        Ok(())
    }

    /// `copy_table` support: copy `len` bytes from `src` to `dst`.
    /// Positive `len`: if source and destination overlap, behaves as if
    /// copied via an intermediate buffer (i.e. correct even when
    /// overlapping forward). Negative `len` (supplied as `len.abs()` by
    /// the caller with `force_forward = true`) always copies low-to-high
    /// even when overlapping, matching the `copy_table` opcode's defined
    /// behavior for negative length.
    pub fn copy_block(&mut self, src: u32, dst: u32, len: i32, force_forward: bool) -> Result<(), ZmError> {
        let n = len.unsigned_abs() as usize;
        if n == 0 {
            return Ok(());
        }
        self.check_bounds(src + n as u32 - 1)?;
        self.check_bounds(dst + n as u32 - 1)?;
        let forward = force_forward || dst <= src || dst as usize >= src as usize + n;
        debug!("copy_block src={src:#06x} dst={dst:#06x} len={n} forward={forward}");
        if forward {
            for i in 0..n {
                let b = self.get_byte(src + i as u32)?;
                self.set_word_guarded_byte(dst + i as u32, b)?;
            }
        } else {
            for i in (0..n).rev() {
                let b = self.get_byte(src + i as u32)?;
                self.set_word_guarded_byte(dst + i as u32, b)?;
            }
        }
        Ok(())
    }

    fn set_word_guarded_byte(&mut self, addr: u32, value: u8) -> Result<(), ZmError> {
        self.set_byte(addr, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_image() -> Memory {
        let mut b = vec![0u8; 0x1000];
        b[0x00] = 3;
        b[0x0E] = 0x04;
        b[0x0F] = 0x00; // static base 0x0400
        b[0x04] = 0x08;
        b[0x05] = 0x00; // high mem 0x0800
        Memory::new(b).unwrap()
    }

    #[test]
    fn region_predicates() {
        let m = small_image();
        assert!(m.is_dynamic(0));
        assert!(m.is_dynamic(0x3FF));
        assert!(m.is_static(0x400));
        assert!(m.is_static(0x7FF));
        assert!(m.is_high(0x800));
    }

    #[test]
    fn write_protection() {
        let mut m = small_image();
        assert!(m.set_byte(0x3FF, 1).is_ok());
        assert_eq!(
            m.set_byte(0x400, 1),
            Err(ZmError::ReadOnlyMemory { addr: 0x400, static_base: 0x400 })
        );
    }

    #[test]
    fn out_of_bounds_rejected() {
        let m = small_image();
        assert!(matches!(m.get_byte(0x1000), Err(ZmError::OutOfBoundsAddress { .. })));
    }

    #[test]
    fn word_roundtrip() {
        let mut m = small_image();
        m.set_word(0x10, 0xBEEF).unwrap();
        assert_eq!(m.get_word(0x10).unwrap(), 0xBEEF);
    }

    #[test]
    fn zstring_words_stop_at_high_bit() {
        let mut m = small_image();
        m.force_set_byte(0x10, 0x00).unwrap();
        m.force_set_byte(0x11, 0x01).unwrap();
        m.force_set_byte(0x12, 0x80).unwrap();
        m.force_set_byte(0x13, 0x02).unwrap();
        let words = m.get_zstring_words(0x10).unwrap();
        assert_eq!(words, vec![0x0001, 0x8002]);
    }

    #[test]
    fn copy_block_handles_overlap_forward() {
        let mut m = small_image();
        for i in 0..5u32 {
            m.force_set_byte(0x10 + i, i as u8 + 1).unwrap();
        }
        // overlap: dst = src+2, forward semantics copy as via a temp buffer
        m.copy_block(0x10, 0x12, 5, false).unwrap();
        let result: Vec<u8> = (0..5).map(|i| m.get_byte(0x12 + i).unwrap()).collect();
        assert_eq!(result, vec![1, 2, 3, 4, 5]);
    }
}
