//! Story file header: fixed big-endian fields at the start of the image.
//!
//! Field offsets follow the Z-machine Standard 1.1 header layout
//! reproduced in spec §6. Parsing happens once at [`crate::memory::Memory`]
//! construction; callers that only need a handful of header fields for a
//! test fixture can skip validation with [`Header::parse_unchecked`].

use std::fmt;

pub const HEADER_SIZE: usize = 64;

#[derive(Debug, Clone)]
pub struct Header {
    pub version: u8,
    pub flags1: u8,
    pub high_mem_base: u16,
    pub initial_pc: u16,
    pub dictionary_addr: u16,
    pub object_table_addr: u16,
    pub globals_addr: u16,
    pub static_mem_base: u16,
    pub flags2: u16,
    pub serial: [u8; 6],
    pub abbrev_table_addr: u16,
    pub file_length_words: u16,
    pub checksum: u16,
    pub release: u16,
    pub routines_offset: u16,
    pub strings_offset: u16,
    pub header_extension_addr: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionClass {
    /// v1-3
    Classic,
    /// v4-5
    Plus,
    /// v6-7
    Graphics,
    /// v8
    Wide,
}

impl Header {
    /// Parse and validate the header per spec §3's invariants.
    pub fn parse(bytes: &[u8]) -> Result<Header, String> {
        if bytes.len() < HEADER_SIZE {
            return Err(format!(
                "story file too small: {} bytes, header needs {HEADER_SIZE}",
                bytes.len()
            ));
        }
        let h = Header::parse_unchecked(bytes);
        if !(1..=8).contains(&h.version) {
            return Err(format!("unsupported version byte {}", h.version));
        }
        if h.static_mem_base < 64 {
            return Err(format!(
                "static memory base {:#06x} below header size",
                h.static_mem_base
            ));
        }
        if h.static_mem_base > h.high_mem_base {
            return Err(format!(
                "static memory base {:#06x} exceeds high memory base {:#06x}",
                h.static_mem_base, h.high_mem_base
            ));
        }
        Ok(h)
    }

    /// Parse without the cross-field validation `parse` does; used by unit
    /// tests that build small synthetic memory images.
    pub fn parse_unchecked(bytes: &[u8]) -> Header {
        let word = |off: usize| -> u16 {
            if off + 1 < bytes.len() {
                u16::from_be_bytes([bytes[off], bytes[off + 1]])
            } else {
                0
            }
        };
        let mut serial = [0u8; 6];
        for (i, b) in serial.iter_mut().enumerate() {
            *b = *bytes.get(0x12 + i).unwrap_or(&0);
        }
        Header {
            version: bytes[0x00],
            flags1: bytes[0x01],
            high_mem_base: word(0x04),
            initial_pc: word(0x06),
            dictionary_addr: word(0x08),
            object_table_addr: word(0x0A),
            globals_addr: word(0x0C),
            static_mem_base: word(0x0E),
            flags2: word(0x10),
            serial,
            abbrev_table_addr: word(0x18),
            file_length_words: word(0x1A),
            checksum: word(0x1C),
            release: word(0x02),
            routines_offset: word(0x28),
            strings_offset: word(0x2A),
            header_extension_addr: word(0x36),
        }
    }

    pub fn version_class(&self) -> VersionClass {
        match self.version {
            1..=3 => VersionClass::Classic,
            4 | 5 => VersionClass::Plus,
            6 | 7 => VersionClass::Graphics,
            8 => VersionClass::Wide,
            v => unreachable!("invalid version {v} should have failed Header::parse"),
        }
    }

    /// Maximum memory image size in bytes for this version (spec §3).
    pub fn max_memory_size(&self) -> usize {
        match self.version_class() {
            VersionClass::Classic => 128 * 1024,
            VersionClass::Plus => 256 * 1024,
            VersionClass::Graphics | VersionClass::Wide => 512 * 1024,
        }
    }

    /// Divisor for packed-address unpacking (spec §4.1).
    pub fn packed_address_divisor(&self) -> u32 {
        match self.version_class() {
            VersionClass::Classic => 2,
            VersionClass::Plus | VersionClass::Graphics => 4,
            VersionClass::Wide => 8,
        }
    }

    pub fn serial_str(&self) -> String {
        self.serial.iter().map(|&b| b as char).collect()
    }

    /// Object table sizing (spec §3: v1-3 vs v4-8).
    pub fn object_count_max(&self) -> u16 {
        match self.version_class() {
            VersionClass::Classic => 255,
            _ => 65535,
        }
    }

    pub fn attribute_count(&self) -> u16 {
        match self.version_class() {
            VersionClass::Classic => 32,
            _ => 48,
        }
    }

    pub fn property_defaults_count(&self) -> u16 {
        match self.version_class() {
            VersionClass::Classic => 31,
            _ => 63,
        }
    }

    pub fn object_entry_size(&self) -> u16 {
        match self.version_class() {
            VersionClass::Classic => 9,
            _ => 14,
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Z-code v{} release {} serial {} | high={:#06x} static={:#06x} pc={:#06x}",
            self.version,
            self.release,
            self.serial_str(),
            self.high_mem_base,
            self.static_mem_base,
            self.initial_pc
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bytes(version: u8) -> Vec<u8> {
        let mut b = vec![0u8; 128];
        b[0x00] = version;
        b[0x04] = 0x10;
        b[0x05] = 0x00; // high mem
        b[0x06] = 0x50;
        b[0x07] = 0x00; // initial pc
        b[0x0E] = 0x08;
        b[0x0F] = 0x00; // static mem base
        b
    }

    #[test]
    fn parses_valid_header() {
        let bytes = sample_bytes(3);
        let h = Header::parse(&bytes).unwrap();
        assert_eq!(h.version, 3);
        assert_eq!(h.static_mem_base, 0x0800);
        assert_eq!(h.high_mem_base, 0x1000);
        assert_eq!(h.version_class(), VersionClass::Classic);
        assert_eq!(h.object_count_max(), 255);
        assert_eq!(h.attribute_count(), 32);
    }

    #[test]
    fn rejects_bad_version() {
        let bytes = sample_bytes(9);
        assert!(Header::parse(&bytes).is_err());
    }

    #[test]
    fn rejects_static_below_header() {
        let mut bytes = sample_bytes(3);
        bytes[0x0E] = 0x00;
        bytes[0x0F] = 0x10;
        assert!(Header::parse(&bytes).is_err());
    }

    #[test]
    fn v4_sizing_differs_from_v3() {
        let bytes = sample_bytes(5);
        let h = Header::parse(&bytes).unwrap();
        assert_eq!(h.object_count_max(), 65535);
        assert_eq!(h.attribute_count(), 48);
        assert_eq!(h.packed_address_divisor(), 4);
    }

    #[test]
    fn v8_uses_divisor_eight() {
        let bytes = sample_bytes(8);
        let h = Header::parse(&bytes).unwrap();
        assert_eq!(h.packed_address_divisor(), 8);
        assert_eq!(h.max_memory_size(), 512 * 1024);
    }
}
