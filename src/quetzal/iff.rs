//! IFF container: FORM header plus a flat list of (type, data) chunks.
//! The core only ever serialises to/deserialises from `Vec<u8>` — the
//! blob store port owns the actual file I/O (spec §6 "Blob store port").

use crate::error::ZmError;

pub struct IffChunk {
    pub chunk_type: [u8; 4],
    pub data: Vec<u8>,
}

pub struct IffFile {
    pub form_type: [u8; 4],
    pub chunks: Vec<IffChunk>,
}

impl IffFile {
    pub fn new(form_type: [u8; 4]) -> Self {
        IffFile { form_type, chunks: Vec::new() }
    }

    pub fn add_chunk(&mut self, chunk_type: [u8; 4], data: Vec<u8>) {
        self.chunks.push(IffChunk { chunk_type, data });
    }

    pub fn find_chunk(&self, chunk_type: &[u8; 4]) -> Option<&IffChunk> {
        self.chunks.iter().find(|c| &c.chunk_type == chunk_type)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let total_size = 4 + self.chunks.iter().map(|c| 8 + c.data.len() + (c.data.len() % 2)).sum::<usize>();
        let mut out = Vec::with_capacity(8 + total_size);
        out.extend_from_slice(b"FORM");
        out.extend_from_slice(&(total_size as u32).to_be_bytes());
        out.extend_from_slice(&self.form_type);
        for chunk in &self.chunks {
            out.extend_from_slice(&chunk.chunk_type);
            out.extend_from_slice(&(chunk.data.len() as u32).to_be_bytes());
            out.extend_from_slice(&chunk.data);
            if chunk.data.len() % 2 == 1 {
                out.push(0);
            }
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<IffFile, ZmError> {
        let fmt = |m: &str| ZmError::SaveFormatError { message: m.to_string() };
        if bytes.len() < 12 || &bytes[0..4] != b"FORM" {
            return Err(fmt("missing FORM header"));
        }
        let mut form_type = [0u8; 4];
        form_type.copy_from_slice(&bytes[8..12]);
        let mut file = IffFile { form_type, chunks: Vec::new() };
        let mut pos = 12usize;
        while pos + 8 <= bytes.len() {
            let mut chunk_type = [0u8; 4];
            chunk_type.copy_from_slice(&bytes[pos..pos + 4]);
            let size = u32::from_be_bytes(bytes[pos + 4..pos + 8].try_into().unwrap()) as usize;
            pos += 8;
            if pos + size > bytes.len() {
                return Err(fmt("chunk data runs past end of file"));
            }
            let data = bytes[pos..pos + size].to_vec();
            pos += size;
            if size % 2 == 1 {
                pos += 1;
            }
            file.chunks.push(IffChunk { chunk_type, data });
        }
        Ok(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_bytes() {
        let mut f = IffFile::new(*b"IFZS");
        f.add_chunk(*b"IFhd", vec![1, 2, 3]);
        let bytes = f.to_bytes();
        let back = IffFile::from_bytes(&bytes).unwrap();
        assert_eq!(back.form_type, *b"IFZS");
        assert_eq!(back.find_chunk(b"IFhd").unwrap().data, vec![1, 2, 3]);
    }

    #[test]
    fn odd_length_chunk_is_padded() {
        let mut f = IffFile::new(*b"IFZS");
        f.add_chunk(*b"ANNO", vec![1, 2, 3]);
        f.add_chunk(*b"IFhd", vec![9]);
        let bytes = f.to_bytes();
        let back = IffFile::from_bytes(&bytes).unwrap();
        assert_eq!(back.find_chunk(b"IFhd").unwrap().data, vec![9]);
    }
}
