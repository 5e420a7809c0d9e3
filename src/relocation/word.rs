//! The width-parameterized narrow-and-check patch primitive.
//!
//! Every architecture implementation funnels its writes through
//! [`patch`], so the numeric contract lives in exactly one place: a
//! relative (signed) value must lie in the destination width's
//! two's-complement range, an absolute (unsigned) value must fit unsigned,
//! and exactly the destination width's bytes are written, with no
//! read-modify-write of the neighbors.

use crate::{Error, Result};

/// A destination word an architecture can patch.
pub(crate) trait RelocWord: Copy {
    const BITS: u32;
    const UNSIGNED_MAX: u64;
    const SIGNED_MIN: i64;
    const SIGNED_MAX: i64;

    fn truncate(value: u64) -> Self;

    /// # Safety
    /// `dst` must be valid for a `BITS / 8`-byte write.
    unsafe fn write(self, dst: *mut u8);
}

macro_rules! impl_reloc_word {
    ($($word:ty),*) => {$(
        impl RelocWord for $word {
            const BITS: u32 = <$word>::BITS;
            const UNSIGNED_MAX: u64 = <$word>::MAX as u64;
            const SIGNED_MIN: i64 = (<$word>::MAX as i64) / -2 - 1;
            const SIGNED_MAX: i64 = (<$word>::MAX as i64) / 2;

            #[inline]
            fn truncate(value: u64) -> Self {
                value as $word
            }

            #[inline]
            unsafe fn write(self, dst: *mut u8) {
                unsafe { dst.cast::<$word>().write_unaligned(self) };
            }
        }
    )*};
}

impl_reloc_word!(u16, u32);

// u64 carries any value; the checks degenerate to always-true.
impl RelocWord for u64 {
    const BITS: u32 = 64;
    const UNSIGNED_MAX: u64 = u64::MAX;
    const SIGNED_MIN: i64 = i64::MIN;
    const SIGNED_MAX: i64 = i64::MAX;

    #[inline]
    fn truncate(value: u64) -> Self {
        value
    }

    #[inline]
    unsafe fn write(self, dst: *mut u8) {
        unsafe { dst.cast::<u64>().write_unaligned(self) };
    }
}

/// Narrows `value` to `W`, verifying the narrowing is lossless, and writes
/// the result at `patch_addr`.
///
/// `relative` selects the signedness of the check: position-relative values
/// are signed displacements, absolute values are unsigned addresses.
pub(crate) fn patch<W: RelocWord>(
    kind: u32,
    patch_addr: usize,
    value: u64,
    relative: bool,
) -> Result<()> {
    let overflow = if relative {
        let signed = value as i64;
        signed < W::SIGNED_MIN || signed > W::SIGNED_MAX
    } else {
        value > W::UNSIGNED_MAX
    };
    if overflow {
        return Err(Error::RelocationValueOverflow {
            kind,
            width: W::BITS,
        });
    }

    unsafe { W::truncate(value).write(patch_addr as *mut u8) };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patch32(buf: &mut [u8], value: i64, relative: bool) -> Result<()> {
        patch::<u32>(2, buf.as_mut_ptr() as usize, value as u64, relative)
    }

    #[test]
    fn relative_boundaries_are_exact() {
        let mut buf = [0u8; 4];

        patch32(&mut buf, i32::MAX as i64, true).unwrap();
        assert_eq!(buf, [0xff, 0xff, 0xff, 0x7f]);

        patch32(&mut buf, i32::MIN as i64, true).unwrap();
        assert_eq!(buf, [0x00, 0x00, 0x00, 0x80]);

        assert_eq!(
            patch32(&mut buf, i32::MAX as i64 + 1, true),
            Err(Error::RelocationValueOverflow { kind: 2, width: 32 })
        );
        assert_eq!(
            patch32(&mut buf, i32::MIN as i64 - 1, true),
            Err(Error::RelocationValueOverflow { kind: 2, width: 32 })
        );
    }

    #[test]
    fn negative_displacement_writes_twos_complement() {
        let mut buf = [0u8; 4];
        patch32(&mut buf, -4, true).unwrap();
        assert_eq!(buf, [0xfc, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn absolute_check_is_unsigned() {
        let mut buf = [0u8; 8];

        patch::<u16>(0, buf.as_mut_ptr() as usize, 0xffff, false).unwrap();
        assert_eq!(buf[..2], [0xff, 0xff]);

        assert_eq!(
            patch::<u16>(0, buf.as_mut_ptr() as usize, 0x1_0000, false),
            Err(Error::RelocationValueOverflow { kind: 0, width: 16 })
        );

        // Any 64-bit value fits a 64-bit patch.
        patch::<u64>(0, buf.as_mut_ptr() as usize, u64::MAX, false).unwrap();
        assert_eq!(buf, [0xff; 8]);
    }

    #[test]
    fn neighboring_bytes_untouched() {
        let mut buf = [0xaau8; 8];
        patch::<u32>(2, buf[2..].as_mut_ptr() as usize, 0, true).unwrap();
        assert_eq!(buf, [0xaa, 0xaa, 0, 0, 0, 0, 0xaa, 0xaa]);
    }
}
