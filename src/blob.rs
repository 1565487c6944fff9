//! Blob store port: abstracts over the filesystem for Quetzal save data
//! (spec §6 "Blob store port"). The core never touches `std::fs` itself.

use indexmap::IndexMap;

pub trait BlobStore {
    fn read(&self, name: &str) -> Option<Vec<u8>>;
    fn write(&mut self, name: &str, bytes: &[u8]);
    fn list(&self, pattern: &str) -> Vec<String>;
    fn exists(&self, name: &str) -> bool;
    fn delete(&mut self, name: &str) -> bool;
    fn ensure_dir(&mut self, name: &str);
}

/// In-memory blob store used by tests and as a reference implementation.
/// `IndexMap` preserves insertion order for `list()`, matching the way a
/// directory listing would naturally enumerate saves in creation order.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: IndexMap<String, Vec<u8>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        MemoryBlobStore { blobs: IndexMap::new() }
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, name: &str) -> Option<Vec<u8>> {
        self.blobs.get(name).cloned()
    }

    fn write(&mut self, name: &str, bytes: &[u8]) {
        self.blobs.insert(name.to_string(), bytes.to_vec());
    }

    fn list(&self, pattern: &str) -> Vec<String> {
        self.blobs.keys().filter(|k| k.contains(pattern)).cloned().collect()
    }

    fn exists(&self, name: &str) -> bool {
        self.blobs.contains_key(name)
    }

    fn delete(&mut self, name: &str) -> bool {
        self.blobs.shift_remove(name).is_some()
    }

    fn ensure_dir(&mut self, _name: &str) {
        // in-memory store has no directory hierarchy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_read_roundtrip() {
        let mut store = MemoryBlobStore::new();
        store.write("save1.qzl", &[1, 2, 3]);
        assert_eq!(store.read("save1.qzl"), Some(vec![1, 2, 3]));
        assert!(store.exists("save1.qzl"));
        assert!(store.delete("save1.qzl"));
        assert!(!store.exists("save1.qzl"));
    }

    #[test]
    fn list_filters_by_pattern() {
        let mut store = MemoryBlobStore::new();
        store.write("a.qzl", &[]);
        store.write("b.txt", &[]);
        assert_eq!(store.list(".qzl"), vec!["a.qzl".to_string()]);
    }
}
