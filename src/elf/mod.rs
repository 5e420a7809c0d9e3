//! ELF wire-format definitions consumed by the linker.
//!
//! The image is parsed in place: the raw structures here are `#[repr(C)]`
//! views over bytes the caller already holds in memory, in the host's native
//! byte order. ABI constants come from the `elf` crate rather than being
//! redefined locally.

mod defs;
pub mod ident;

pub use defs::{E_CLASS, EHDR_SIZE, ElfEhdr, ElfRel, ElfRela, ElfShdr, ElfSym};
