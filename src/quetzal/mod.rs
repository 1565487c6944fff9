//! Quetzal save format: IFF chunk container, XOR-RLE memory compression,
//! and stack serialisation. See spec §6 "Quetzal save format".

pub mod chunks;
pub mod compressed_memory;
pub mod iff;
pub mod restore;
pub mod save;

pub use restore::restore_game;
pub use save::save_game;
