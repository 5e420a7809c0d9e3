//! # modlink
//!
//! **modlink** is a minimal runtime linker for relocatable ELF modules. Given
//! an object image that the host has already placed in memory, it maps the
//! image's sections to their resident addresses, resolves the symbol table
//! against a caller-supplied set of external definitions, and rewrites every
//! relocation site in place so the module becomes directly executable,
//! without process machinery, an allocator, or an OS loader.
//!
//! It is meant for constrained environments (OS kernels, embedded runtimes)
//! that want to link small relocatable modules at run time. The core performs
//! no allocation of its own and borrows the image exclusively for the
//! duration of one [`Session`].
//!
//! ## Pipeline
//!
//! A load is three all-or-nothing stages, run in order:
//!
//! 1. [`Session::map_sections`] assigns every section its run-time address.
//! 2. [`Session::resolve_symbols`] binds undefined symbols to the caller's
//!    definitions and publishes the module's own definitions back through a
//!    query list.
//! 3. [`Session::apply_relocations`] patches every relocation site.
//!
//! The first error inside a stage aborts that stage for the whole session; a
//! partially processed image is not safe to execute.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use modlink::{Session, SymbolBinding};
//!
//! fn link(image: &mut [u8]) -> modlink::Result<usize> {
//!     extern "C" fn host_print() {}
//!
//!     let defs = [SymbolBinding::definition("print", host_print as usize)];
//!     let mut queries = [SymbolBinding::query("module_entry")];
//!
//!     let mut session = Session::new(image)?;
//!     session.map_sections()?;
//!     session.resolve_symbols(&defs, &mut queries)?;
//!     session.apply_relocations()?;
//!
//!     Ok(queries[0].addr())
//! }
//! ```
#![no_std]
#![warn(
    clippy::unnecessary_wraps,
    clippy::unnecessary_lazy_evaluations,
    clippy::cast_lossless,
    clippy::explicit_iter_loop,
    clippy::manual_assert,
    clippy::needless_question_mark,
    clippy::needless_return,
    clippy::redundant_clone,
    clippy::redundant_else,
    clippy::redundant_static_lifetimes
)]

/// Compile-time check for supported architectures
#[cfg(not(target_arch = "x86_64"))]
compile_error!("Unsupported target architecture. Supported architectures: x86_64");

#[cfg(test)]
extern crate std;

pub mod arch;
pub mod elf;
mod error;
mod relocation;
mod sections;
mod session;
mod symbols;
mod table;

pub use crate::elf::ident::{IdentFindings, check_ident};
pub use error::Error;
pub use session::Session;
pub use symbols::SymbolBinding;

/// A type alias for `Result`s returned by `modlink` functions.
///
/// This is a convenience alias that eliminates the need to repeatedly specify
/// the `Error` type in function signatures.
pub type Result<T> = core::result::Result<T, Error>;
