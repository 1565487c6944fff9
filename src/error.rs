//! Error kinds for the Z-machine core.
//!
//! Mirrors the hand-rolled error style the teacher uses for its display
//! port (`DisplayError`) rather than pulling in a derive-macro crate: a
//! plain enum, a `Display` impl, and a manual `std::error::Error` impl.

use std::fmt;

/// Every recoverable-at-the-boundary condition the interpreter can hit.
///
/// Fatal variants propagate out of [`crate::executor::Executor::run`] and
/// end the session. Recoverable variants (stack underflow, invalid object
/// or property numbers) are logged with `warn!` at the call site and
/// folded into a zero/no-op result rather than propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZmError {
    OutOfBoundsAddress { addr: u32, size: u32 },
    ReadOnlyMemory { addr: u32, static_base: u16 },
    UnalignedPackedAddress { packed: u32, byte_addr: u32, divisor: u32 },
    InvalidPackedAddress { packed: u32 },
    InvalidOpcode { opcode: u8, form: &'static str, pc: u32 },
    InvalidObjectNumber { obj: u16, max: u16 },
    InvalidAttributeIndex { attr: u16, max: u16 },
    InvalidPropertyNumber { prop: u16, max: u16 },
    StackUnderflow { context: &'static str },
    BranchOutOfBounds { pc: u32, target: i64 },
    SaveIoError { message: String },
    SaveFormatError { message: String },
    SaveIdentityMismatch { field: &'static str },
}

impl fmt::Display for ZmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZmError::OutOfBoundsAddress { addr, size } => {
                write!(f, "address {addr:#06x} out of bounds (memory size {size:#06x})")
            }
            ZmError::ReadOnlyMemory { addr, static_base } => write!(
                f,
                "write to {addr:#06x} rejected: at or past static memory base {static_base:#06x}"
            ),
            ZmError::UnalignedPackedAddress { packed, byte_addr, divisor } => write!(
                f,
                "packed address {packed:#06x} unpacks to {byte_addr:#06x}, not a multiple of {divisor}"
            ),
            ZmError::InvalidPackedAddress { packed } => {
                write!(f, "packed address {packed:#06x} does not resolve to a valid address")
            }
            ZmError::InvalidOpcode { opcode, form, pc } => {
                write!(f, "unimplemented {form} opcode {opcode:#04x} at PC {pc:#06x}")
            }
            ZmError::InvalidObjectNumber { obj, max } => {
                write!(f, "object number {obj} exceeds table maximum {max}")
            }
            ZmError::InvalidAttributeIndex { attr, max } => {
                write!(f, "attribute index {attr} exceeds maximum {max}")
            }
            ZmError::InvalidPropertyNumber { prop, max } => {
                write!(f, "property number {prop} exceeds maximum {max}")
            }
            ZmError::StackUnderflow { context } => write!(f, "stack underflow in {context}"),
            ZmError::BranchOutOfBounds { pc, target } => {
                write!(f, "branch from {pc:#06x} targets out-of-range offset {target}")
            }
            ZmError::SaveIoError { message } => write!(f, "save I/O error: {message}"),
            ZmError::SaveFormatError { message } => write!(f, "malformed Quetzal save: {message}"),
            ZmError::SaveIdentityMismatch { field } => {
                write!(f, "save file does not match this story (IFhd field: {field})")
            }
        }
    }
}

impl std::error::Error for ZmError {}

impl ZmError {
    /// True for conditions spec.md §7 marks fatal (abort the run).
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ZmError::InvalidObjectNumber { .. }
                | ZmError::InvalidAttributeIndex { .. }
                | ZmError::InvalidPropertyNumber { .. }
                | ZmError::StackUnderflow { .. }
                | ZmError::SaveIoError { .. }
                | ZmError::SaveFormatError { .. }
                | ZmError::SaveIdentityMismatch { .. }
        )
    }
}

pub type ZmResult<T> = Result<T, ZmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(ZmError::OutOfBoundsAddress { addr: 0, size: 0 }.is_fatal());
        assert!(!ZmError::StackUnderflow { context: "pop" }.is_fatal());
        assert!(!ZmError::SaveIdentityMismatch { field: "serial" }.is_fatal());
    }

    #[test]
    fn display_is_human_readable() {
        let e = ZmError::ReadOnlyMemory { addr: 0x400, static_base: 0x400 };
        assert!(e.to_string().contains("0x0400"));
    }
}
