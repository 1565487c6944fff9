//! Z-string codec: 5-bit packed text, alphabet shifts, abbreviation
//! expansion, ZSCII escapes. See spec §4.2 and Design Notes (a), (b).

use crate::header::VersionClass;
use crate::memory::Memory;
use bitreader::BitReader;
use lazy_static::lazy_static;
use log::debug;

pub const PAD: u8 = 5;

lazy_static! {
    static ref A0: &'static str = "abcdefghijklmnopqrstuvwxyz";
    static ref A1: &'static str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    static ref A2: &'static str = " \n0123456789.,!?_#'\"/\\-:()";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alphabet {
    A0,
    A1,
    A2,
}

impl Alphabet {
    fn table(self) -> &'static str {
        match self {
            Alphabet::A0 => &A0,
            Alphabet::A1 => &A1,
            Alphabet::A2 => &A2,
        }
    }

    fn next(self) -> Alphabet {
        match self {
            Alphabet::A0 => Alphabet::A1,
            Alphabet::A1 => Alphabet::A2,
            Alphabet::A2 => Alphabet::A0,
        }
    }

    fn prev(self) -> Alphabet {
        match self {
            Alphabet::A0 => Alphabet::A2,
            Alphabet::A1 => Alphabet::A0,
            Alphabet::A2 => Alphabet::A1,
        }
    }
}

/// Split a 16-bit Z-string word into its three 5-bit Z-characters, using
/// `bitreader` the way the teacher's `util::read_zchars_from_word` does.
fn split_word(word: u16) -> [u8; 3] {
    let bytes = word.to_be_bytes();
    let mut br = BitReader::new(&bytes);
    let _terminator = br.read_u8(1).unwrap();
    [
        br.read_u8(5).unwrap(),
        br.read_u8(5).unwrap(),
        br.read_u8(5).unwrap(),
    ]
}

/// Unpack a Z-string's words into its flat sequence of Z-characters.
pub fn unpack_zchars(words: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(words.len() * 3);
    for &w in words {
        out.extend_from_slice(&split_word(w));
    }
    out
}

/// Default ZSCII->Unicode table for codes 155-251 (spec §9 "Char set").
/// This is the Z-machine Standard's default extra character set; a v5+
/// header-extension override is honored via `unicode_table_override`.
fn default_extra_chars() -> [char; 97] {
    let s = "äöüÄÖÜß»«ëïÿÆæœŒàèìòùÀÈÌÒÙáéíóúýÁÉÍÓÚÝâêîôûÂÊÎÔÛåÅøØãñõÃÑÕæ\
             çÇþðÞÐ£œŒ¡¿";
    let mut out = ['?'; 97];
    for (i, c) in s.chars().enumerate().take(97) {
        out[i] = c;
    }
    out
}

fn zscii_to_unicode(code: u16, unicode_table_override: Option<&[char]>) -> char {
    match code {
        9 => '\t',
        10 | 13 => '\n',
        32..=126 => code as u8 as char,
        155..=251 => {
            let idx = (code - 155) as usize;
            if let Some(table) = unicode_table_override {
                *table.get(idx).unwrap_or(&'?')
            } else {
                *default_extra_chars().get(idx).unwrap_or(&'?')
            }
        }
        _ => '?',
    }
}

pub struct Decoder<'a> {
    memory: &'a Memory,
    unicode_override: Option<Vec<char>>,
}

impl<'a> Decoder<'a> {
    pub fn new(memory: &'a Memory) -> Decoder<'a> {
        Decoder { memory, unicode_override: None }
    }

    pub fn with_unicode_override(mut self, table: Vec<char>) -> Self {
        self.unicode_override = Some(table);
        self
    }

    /// Decode a Z-string already split into Z-characters, expanding
    /// abbreviations at most one level deep (spec §4.2).
    pub fn decode(&self, zchars: &[u8], expand_abbreviations: bool) -> Result<String, String> {
        self.decode_inner(zchars, expand_abbreviations, false)
    }

    fn decode_inner(&self, zchars: &[u8], expand_abbreviations: bool, in_abbrev: bool) -> Result<String, String> {
        let version = self.memory.header().version;
        let version_class = self.memory.header().version_class();
        let mut out = String::new();
        let mut alphabet = Alphabet::A0;
        let mut locked_alphabet: Option<Alphabet> = None;
        let mut i = 0usize;
        while i < zchars.len() {
            let c = zchars[i];
            match c {
                0 => {
                    out.push(' ');
                    i += 1;
                }
                2 | 3 if version == 1 => {
                    // v1: 2/3 are single-shift (non-locking); 4/5 below are the
                    // shift-lock versions of the same alphabet switch.
                    alphabet = if c == 2 { Alphabet::A1 } else { Alphabet::A2 };
                    i += 1;
                    continue;
                }
                1 | 2 | 3 if expand_abbreviations && !in_abbrev => {
                    if i + 1 >= zchars.len() {
                        break;
                    }
                    let next = zchars[i + 1];
                    let abbrev_index = 32 * (c as u16 - 1) + next as u16;
                    let abbrev_addr = self.memory.header().abbrev_table_addr as u32 + abbrev_index * 2;
                    let table_entry = self.memory.get_word(abbrev_addr).map_err(|e| e.to_string())?;
                    let string_addr = (table_entry as u32) * 2;
                    let words = self.memory.get_zstring_words(string_addr).map_err(|e| e.to_string())?;
                    let inner_chars = unpack_zchars(&words);
                    out.push_str(&self.decode_inner(&inner_chars, false, true)?);
                    i += 2;
                }
                1 | 2 | 3 => {
                    // abbreviation-in-abbreviation is forbidden; treat as space.
                    debug!("nested abbreviation reference ignored");
                    i += 2.min(zchars.len() - i);
                }
                4 | 5 => {
                    if version == 1 {
                        // v1: 2/3 single-shift, 4/5 shift-lock.
                        let target = if c == 4 { Alphabet::A1 } else { Alphabet::A2 };
                        locked_alphabet = Some(target);
                        alphabet = target;
                    } else if version == 2 {
                        let target = if c == 4 { alphabet.next() } else { alphabet.prev() };
                        alphabet = target;
                    } else {
                        let target = if c == 4 { alphabet.next() } else { alphabet.prev() };
                        alphabet = target;
                    }
                    i += 1;
                    continue;
                }
                6..=31 if alphabet == Alphabet::A2 && c == 6 => {
                    if i + 2 >= zchars.len() {
                        i += 1;
                        continue;
                    }
                    let hi = zchars[i + 1];
                    let lo = zchars[i + 2];
                    let code = ((hi as u16) << 5) | lo as u16;
                    out.push(zscii_to_unicode(code, self.unicode_override.as_deref()));
                    i += 3;
                    alphabet = locked_alphabet.unwrap_or(Alphabet::A0);
                    continue;
                }
                6..=31 if alphabet == Alphabet::A2 && c == 7 => {
                    out.push('\n');
                    i += 1;
                    alphabet = locked_alphabet.unwrap_or(Alphabet::A0);
                    continue;
                }
                6..=31 => {
                    let ch = alphabet.table().as_bytes()[(c - 6) as usize] as char;
                    out.push(ch);
                    i += 1;
                    alphabet = locked_alphabet.unwrap_or(Alphabet::A0);
                    continue;
                }
                _ => unreachable!("5-bit zchar {c} out of range"),
            }
            if matches!(version_class, VersionClass::Classic) && version >= 3 {
                // v3 has no shift lock; single shifts already reset above.
            }
        }
        Ok(out)
    }
}

/// Encode `text` into Z-characters (inverse of decoding, without
/// abbreviation substitution), per spec §4.2.
pub fn encode_to_zchars(text: &str, version: u8) -> Vec<u8> {
    let limit = if version <= 3 { 6 } else { 9 };
    let mut zchars = Vec::with_capacity(limit);
    for ch in text.chars() {
        if zchars.len() >= limit {
            break;
        }
        if ch == ' ' {
            zchars.push(0);
            continue;
        }
        if let Some(pos) = A0.find(ch) {
            zchars.push(pos as u8 + 6);
            continue;
        }
        if let Some(pos) = A1.find(ch) {
            zchars.push(4);
            if zchars.len() < limit {
                zchars.push(pos as u8 + 6);
            }
            continue;
        }
        if let Some(pos) = A2.find(ch) {
            zchars.push(5);
            if zchars.len() < limit {
                zchars.push(pos as u8 + 6);
            }
            continue;
        }
        // unrepresentable character: ZSCII escape via A2 z-char 6
        zchars.push(5);
        if zchars.len() < limit {
            zchars.push(6);
        }
        let code = ch as u16;
        if zchars.len() < limit {
            zchars.push((code >> 5) as u8 & 0x1F);
        }
        if zchars.len() < limit {
            zchars.push(code as u8 & 0x1F);
        }
    }
    while zchars.len() < limit {
        zchars.push(PAD);
    }
    zchars.truncate(limit);
    zchars
}

/// Pack Z-characters into 16-bit words, three per word, setting the
/// terminator bit on the last word and padding the final group with 5s
/// (spec §4.2 `pack_zchars`).
pub fn pack_zchars(zchars: &[u8]) -> Vec<u16> {
    let mut padded = zchars.to_vec();
    while padded.len() % 3 != 0 {
        padded.push(PAD);
    }
    let mut words = Vec::with_capacity(padded.len() / 3);
    for chunk in padded.chunks(3) {
        let word = ((chunk[0] as u16 & 0x1F) << 10) | ((chunk[1] as u16 & 0x1F) << 5) | (chunk[2] as u16 & 0x1F);
        words.push(word);
    }
    if let Some(last) = words.last_mut() {
        *last |= 0x8000;
    }
    words
}

/// `encode(text, version, pad)` per spec §4.2: Z-characters packed into
/// words, limited/padded to the version's fixed length.
pub fn encode(text: &str, version: u8) -> Vec<u16> {
    pack_zchars(&encode_to_zchars(text, version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Memory;

    fn v3_memory() -> Memory {
        let mut b = vec![0u8; 0x200];
        b[0x00] = 3;
        b[0x0E] = 0x01;
        b[0x0F] = 0x00;
        b[0x04] = 0x01;
        b[0x05] = 0x00;
        b[0x18] = 0x00;
        b[0x19] = 0x40; // abbrev table at 0x40 (unused by these tests)
        Memory::new(b).unwrap()
    }

    #[test]
    fn decode_hello_v3() {
        let m = v3_memory();
        let dec = Decoder::new(&m);
        // Standard alphabet table, z-chars for "hello"
        let chars = [13, 10, 17, 17, 20];
        let text = dec.decode(&chars, true).unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn encode_hello_v3() {
        let zchars = encode_to_zchars("Hello", 3);
        assert_eq!(zchars, vec![4, 13, 10, 17, 17, 20]);
        let words = pack_zchars(&zchars);
        assert_eq!(words.len(), 2);
        assert_eq!(words[1] & 0x8000, 0x8000);
    }

    #[test]
    fn pack_unpack_roundtrip() {
        let zchars = [6u8, 7, 8, 9, 10];
        let words = pack_zchars(&zchars);
        let back = unpack_zchars(&words);
        assert_eq!(&back[0..5], &zchars);
    }

    #[test]
    fn zchar_zero_is_space() {
        let m = v3_memory();
        let dec = Decoder::new(&m);
        let text = dec.decode(&[0], true).unwrap();
        assert_eq!(text, " ");
    }

    #[test]
    fn split_word_extracts_three_zchars() {
        // word with terminator bit set, zchars 1,2,3
        let word = 0x8000 | (1 << 10) | (2 << 5) | 3;
        assert_eq!(split_word(word), [1, 2, 3]);
    }
}
