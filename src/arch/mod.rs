//! Architecture-specific relocation contracts.
//!
//! Each supported architecture provides one [`RelocApply`] implementation:
//! given a relocation kind, the patched section and the record's offset
//! into it, plus the (symbol address, addend) pair, it bounds the patch
//! site by its own width, computes the value, narrows it through the
//! shared width-checked primitive, and writes the patch. The active
//! architecture is selected at build time.

pub mod x86_64;

use crate::{Result, table::Table};

/// The relocation-application capability one architecture implements.
pub(crate) trait RelocApply {
    /// Applies relocation `kind` at byte `offset` of the `patched` section
    /// for a symbol resolved at `sym_addr` with `addend`.
    ///
    /// The implementation knows the patch width for each kind and must
    /// derive the patch address through `patched` so the whole write stays
    /// inside the section.
    fn apply(kind: u32, patched: &Table, offset: usize, sym_addr: usize, addend: i64)
    -> Result<()>;
}

#[cfg(target_arch = "x86_64")]
pub(crate) use x86_64::Amd64Relocator as Relocator;
