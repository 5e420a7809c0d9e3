//! x86-64 relocation contract.

use crate::{
    Error, Result,
    arch::RelocApply,
    relocation::word::patch,
    table::Table,
};
use elf::abi::{R_X86_64_PC32, R_X86_64_PLT32};

/// Program-counter-relative 32-bit relocation kind.
pub const REL_PC32: u32 = R_X86_64_PC32;
/// Procedure-linkage-table-relative 32-bit relocation kind; resolves like
/// [`REL_PC32`] here since the linker builds no PLT for these modules.
pub const REL_PLT32: u32 = R_X86_64_PLT32;

/// The x86-64 relocation applier.
pub(crate) struct Amd64Relocator;

impl RelocApply for Amd64Relocator {
    fn apply(
        kind: u32,
        patched: &Table,
        offset: usize,
        sym_addr: usize,
        addend: i64,
    ) -> Result<()> {
        match kind {
            // Both kinds patch a signed 32-bit displacement from the patch
            // site to the symbol.
            R_X86_64_PC32 | R_X86_64_PLT32 => {
                let patch_addr = patched.get_span(offset, size_of::<u32>())?;
                let value = (sym_addr as u64)
                    .wrapping_add(addend as u64)
                    .wrapping_sub(patch_addr as u64);
                patch::<u32>(kind, patch_addr, value, true)
            }
            _ => Err(Error::BadRelocationType { kind }),
        }
    }
}
