//! A Z-machine (Infocom/Inform interactive-fiction virtual machine)
//! interpreter core, versions 1-8. Rendering, keystrokes, and save-file
//! storage are external collaborators reached through the
//! [`screen`], [`input`], and [`blob`] ports; this crate only holds the
//! memory model, object/dictionary views, instruction decode, and opcode
//! execution.

pub mod blob;
pub mod dictionary;
pub mod error;
pub mod executor;
pub mod frame;
pub mod header;
pub mod input;
pub mod instruction;
pub mod memory;
pub mod object;
pub mod opcode_tables;
pub mod opcodes;
pub mod parser;
pub mod quetzal;
pub mod screen;
pub mod state;
pub mod zrand;
pub mod zstring;

pub use error::{ZmError, ZmResult};
pub use executor::{ExecutionResult, Executor, RunOutcome};
pub use memory::Memory;
pub use state::{GameState, InterpreterConfig};
