//! ELF identification-block validation.
//!
//! This runs before any structural parsing, so it must not assume anything
//! about the rest of the image. It accumulates findings instead of failing:
//! the caller decides what a non-empty set means for the load.

use bitflags::bitflags;
use elf::abi::{EI_CLASS, EI_DATA, EI_NIDENT, ELFDATA2LSB, ELFDATANONE, ELFMAG0, ELFMAGIC};

bitflags! {
    /// Findings accumulated while checking an ELF identification block.
    ///
    /// An empty set means the identifier is fully consistent with this host
    /// and the expected class.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IdentFindings: u8 {
        /// The magic bytes are wrong; nothing else was checked.
        const BAD_MAGIC = 1 << 0;
        /// The declared data encoding is "none"; nothing further was checked.
        const UNKNOWN_DATA_FORMAT = 1 << 2;
        /// The declared byte order differs from the host's byte order.
        const BAD_ENDIANNESS = 1 << 3;
        /// The declared class differs from the expected class.
        const BAD_CLASS = 1 << 4;
    }
}

/// Checks an ELF identification block against this host and `expected_class`.
///
/// The host's own byte order is determined by reading the first two magic
/// bytes back as a native `u16`: this works before any full-width read of the
/// image is known to be meaningful, and assumes software-emulated integers
/// follow the machine's endianness.
///
/// Never fails; malformed input is reported through the returned findings.
///
/// # Examples
/// ```rust
/// use modlink::{check_ident, IdentFindings, elf::E_CLASS};
///
/// let mut ident = [0u8; 16];
/// ident[..4].copy_from_slice(&[0x7f, b'E', b'L', b'F']);
/// ident[4] = E_CLASS;
/// ident[5] = 1; // ELFDATA2LSB
/// assert_eq!(check_ident(&ident, E_CLASS), IdentFindings::empty());
/// ```
pub fn check_ident(ident: &[u8; EI_NIDENT], expected_class: u8) -> IdentFindings {
    if ident[..4] != ELFMAGIC {
        return IdentFindings::BAD_MAGIC;
    }

    let ei_data = ident[EI_DATA];
    if ei_data == ELFDATANONE {
        return IdentFindings::UNKNOWN_DATA_FORMAT;
    }

    let mut findings = IdentFindings::empty();

    if ident[EI_CLASS] != expected_class {
        findings |= IdentFindings::BAD_CLASS;
    }

    // Host byte order: on a little-endian host the low byte of a native u16
    // read over the magic is ELFMAG0.
    let ident_lsb = u16::from_ne_bytes([ident[0], ident[1]]);
    let host_little_endian = ident_lsb as u8 == ELFMAG0;
    let elf_little_endian = ei_data == ELFDATA2LSB;
    if host_little_endian != elf_little_endian {
        findings |= IdentFindings::BAD_ENDIANNESS;
    }

    findings
}
