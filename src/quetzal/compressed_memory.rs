//! XOR-RLE compression for the CMem chunk. XOR current dynamic memory with
//! the original story's dynamic memory; non-zero bytes are emitted
//! verbatim, runs of zero bytes become a `0x00` marker followed by a count
//! byte storing `run_length - 1` (spec §6, open question (a) resolved this
//! way — grounded in the teacher's `compressed_memory.rs`).

use log::debug;

pub fn compress_memory(current: &[u8], original: &[u8]) -> Vec<u8> {
    debug_assert_eq!(current.len(), original.len());
    let mut compressed = Vec::new();
    let mut i = 0;
    while i < current.len() {
        let xor_byte = current[i] ^ original[i];
        if xor_byte == 0 {
            let start = i;
            while i < current.len() && (current[i] ^ original[i]) == 0 {
                i += 1;
            }
            let mut remaining = i - start;
            while remaining > 256 {
                compressed.push(0);
                compressed.push(255);
                remaining -= 256;
            }
            if remaining > 0 {
                compressed.push(0);
                compressed.push((remaining - 1) as u8);
            }
        } else {
            compressed.push(xor_byte);
            i += 1;
        }
    }
    debug!("compressed {} bytes to {} bytes", current.len(), compressed.len());
    compressed
}

pub fn decompress_memory(compressed: &[u8], original: &[u8]) -> Result<Vec<u8>, String> {
    let mut out = Vec::with_capacity(original.len());
    let mut ci = 0;
    let mut oi = 0;
    while ci < compressed.len() && oi < original.len() {
        let byte = compressed[ci];
        ci += 1;
        if byte == 0 {
            if ci >= compressed.len() {
                return Err("incomplete RLE sequence".to_string());
            }
            let run_length = compressed[ci] as usize + 1;
            ci += 1;
            for _ in 0..run_length {
                if oi >= original.len() {
                    return Err("RLE run extends beyond dynamic memory".to_string());
                }
                out.push(original[oi]);
                oi += 1;
            }
        } else {
            if oi >= original.len() {
                return Err("compressed data extends beyond dynamic memory".to_string());
            }
            out.push(original[oi] ^ byte);
            oi += 1;
        }
    }
    while oi < original.len() {
        out.push(original[oi]);
        oi += 1;
    }
    if out.len() != original.len() {
        return Err(format!("decompressed size {} != original size {}", out.len(), original.len()));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_decompress_roundtrip() {
        let original = vec![0x10, 0x20, 0x30, 0x40, 0x50];
        let mut current = original.clone();
        current[1] = 0x21;
        current[4] = 0x51;
        let compressed = compress_memory(&current, &original);
        let restored = decompress_memory(&compressed, &original).unwrap();
        assert_eq!(restored, current);
    }

    #[test]
    fn all_zero_xor_compresses_to_near_empty() {
        let original = vec![0u8; 4096];
        let current = original.clone();
        let compressed = compress_memory(&current, &original);
        assert!(compressed.len() < 32);
        let restored = decompress_memory(&compressed, &original).unwrap();
        assert_eq!(restored, current);
    }

    #[test]
    fn long_zero_run_splits_at_256() {
        let original = vec![0xFFu8; 600];
        let mut current = original.clone();
        current[599] = 0xFE;
        let compressed = compress_memory(&current, &original);
        let restored = decompress_memory(&compressed, &original).unwrap();
        assert_eq!(restored, current);
    }
}
