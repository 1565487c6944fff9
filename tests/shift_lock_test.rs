//! v1's alphabet shift (z-chars 4/5) locks until the next shift z-char;
//! v2+ single-shifts for one character only. Exercised here through the
//! public `Decoder` rather than `zstring.rs`'s own unit tests, since this
//! distinction is a cross-version behavior worth pinning down on its own.

use zmcore::memory::Memory;
use zmcore::zstring::Decoder;

fn memory_with_version(version: u8) -> Memory {
    let mut b = vec![0u8; 0x200];
    b[0x00] = version;
    b[0x0E] = 0x01;
    b[0x0F] = 0x00;
    Memory::new(b).unwrap()
}

#[test]
fn v1_shift_is_locked_until_next_shift() {
    let m = memory_with_version(1);
    let dec = Decoder::new(&m);
    // z-char 4 (shift to A1) then two A1-alphabet letters (index 0 = 'A')
    let text = dec.decode(&[4, 6, 6], false).unwrap();
    assert_eq!(text, "AA");
}

#[test]
fn v2_shift_applies_to_one_character_only() {
    let m = memory_with_version(2);
    let dec = Decoder::new(&m);
    let text = dec.decode(&[4, 6, 6], false).unwrap();
    assert_eq!(text, "Aa");
}
