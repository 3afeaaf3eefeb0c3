//! Small bit-twiddling helpers shared by the CPU, bus, and PPU implementations.

/// Uniform bit/byte access across plain integers and the `modular_bitfield` register structs.
///
/// The register types (e.g. [`crate::emulator::ppu::registers::LcdControl`]) are thin wrappers
/// around a `u8`/`u16`/`u32`, so MMIO reads/writes want to treat them exactly like the integer
/// they're backed by: pull out a single byte, or replace one. `Bytes` lets each implementor pick
/// its own width without the blanket impls fighting each other over coherence.
pub trait BitOps: Sized + Copy {
    type Bytes: AsRef<[u8]> + AsMut<[u8]>;

    /// Is `bit` set?
    fn check_bit(&self, bit: u32) -> bool;

    /// Extract the inclusive `[start, end]` bit range, right-aligned to bit 0.
    fn get_bits(&self, start: u32, end: u32) -> Self;

    fn to_le_bytes(&self) -> Self::Bytes;
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Replace the `offset`th little-endian byte, returning the new value.
    fn change_byte_le(&self, offset: usize, value: u8) -> Self {
        let mut bytes = self.to_le_bytes();
        bytes.as_mut()[offset] = value;
        Self::from_le_bytes(bytes)
    }

    /// Replace the `offset`th little-endian byte in place.
    fn set_byte_le(&mut self, offset: usize, value: u8) {
        *self = self.change_byte_le(offset, value);
    }

    /// Alias of [`BitOps::set_byte_le`] used by the register-backed MMIO writers.
    fn update_byte_le(&mut self, offset: usize, value: u8) {
        self.set_byte_le(offset, value);
    }
}

macro_rules! impl_bit_ops_int {
    ($ty:ty, $bytes:literal) => {
        impl BitOps for $ty {
            type Bytes = [u8; $bytes];

            #[inline(always)]
            fn check_bit(&self, bit: u32) -> bool {
                (*self >> bit) & 1 == 1
            }

            #[inline(always)]
            fn get_bits(&self, start: u32, end: u32) -> Self {
                let bits = end - start + 1;
                let mask: $ty = if bits >= <$ty>::BITS { <$ty>::MAX } else { ((1 as $ty) << bits).wrapping_sub(1) };
                (*self >> start) & mask
            }

            #[inline(always)]
            fn to_le_bytes(&self) -> Self::Bytes {
                <$ty>::to_le_bytes(*self)
            }

            #[inline(always)]
            fn from_le_bytes(bytes: Self::Bytes) -> Self {
                <$ty>::from_le_bytes(bytes)
            }
        }
    };
}

impl_bit_ops_int!(u8, 1);
impl_bit_ops_int!(u16, 2);
impl_bit_ops_int!(u32, 4);
impl_bit_ops_int!(u64, 8);
impl_bit_ops_int!(usize, 8);

impl BitOps for i64 {
    type Bytes = [u8; 8];

    #[inline(always)]
    fn check_bit(&self, bit: u32) -> bool {
        (*self >> bit) & 1 == 1
    }

    #[inline(always)]
    fn get_bits(&self, start: u32, end: u32) -> Self {
        let bits = end - start + 1;
        let mask = if bits >= 64 { u64::MAX } else { (1u64 << bits).wrapping_sub(1) };
        ((*self >> start) as u64 & mask) as i64
    }

    #[inline(always)]
    fn to_le_bytes(&self) -> Self::Bytes {
        i64::to_le_bytes(*self)
    }

    #[inline(always)]
    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        i64::from_le_bytes(bytes)
    }
}

/// Implements [`BitOps`] for a `modular_bitfield` register struct backed by an 8-bit value.
///
/// The register types convert losslessly to/from their backing integer (see their `#[repr(uN)]`
/// attribute), so byte access just round-trips through that integer's own `BitOps` impl.
#[macro_export]
macro_rules! impl_register_bit_ops8 {
    ($ty:ty) => {
        impl $crate::utils::BitOps for $ty {
            type Bytes = [u8; 1];

            #[inline(always)]
            fn check_bit(&self, bit: u32) -> bool {
                let raw: u8 = (*self).into();
                $crate::utils::BitOps::check_bit(&raw, bit)
            }

            #[inline(always)]
            fn get_bits(&self, start: u32, end: u32) -> Self {
                let raw: u8 = (*self).into();
                <$ty>::from($crate::utils::BitOps::get_bits(&raw, start, end))
            }

            #[inline(always)]
            fn to_le_bytes(&self) -> Self::Bytes {
                let raw: u8 = (*self).into();
                raw.to_le_bytes()
            }

            #[inline(always)]
            fn from_le_bytes(bytes: Self::Bytes) -> Self {
                <$ty>::from(u8::from_le_bytes(bytes))
            }
        }
    };
}

/// Implements [`BitOps`] for a `modular_bitfield` register struct backed by a 16-bit value.
#[macro_export]
macro_rules! impl_register_bit_ops16 {
    ($ty:ty) => {
        impl $crate::utils::BitOps for $ty {
            type Bytes = [u8; 2];

            #[inline(always)]
            fn check_bit(&self, bit: u32) -> bool {
                let raw: u16 = (*self).into();
                $crate::utils::BitOps::check_bit(&raw, bit)
            }

            #[inline(always)]
            fn get_bits(&self, start: u32, end: u32) -> Self {
                let raw: u16 = (*self).into();
                <$ty>::from($crate::utils::BitOps::get_bits(&raw, start, end))
            }

            #[inline(always)]
            fn to_le_bytes(&self) -> Self::Bytes {
                let raw: u16 = (*self).into();
                raw.to_le_bytes()
            }

            #[inline(always)]
            fn from_le_bytes(bytes: Self::Bytes) -> Self {
                <$ty>::from(u16::from_le_bytes(bytes))
            }
        }
    };
}

/// Implements [`BitOps`] for a `modular_bitfield` register struct backed by a 32-bit value.
#[macro_export]
macro_rules! impl_register_bit_ops32 {
    ($ty:ty) => {
        impl $crate::utils::BitOps for $ty {
            type Bytes = [u8; 4];

            #[inline(always)]
            fn check_bit(&self, bit: u32) -> bool {
                let raw: u32 = (*self).into();
                $crate::utils::BitOps::check_bit(&raw, bit)
            }

            #[inline(always)]
            fn get_bits(&self, start: u32, end: u32) -> Self {
                let raw: u32 = (*self).into();
                <$ty>::from($crate::utils::BitOps::get_bits(&raw, start, end))
            }

            #[inline(always)]
            fn to_le_bytes(&self) -> Self::Bytes {
                let raw: u32 = (*self).into();
                raw.to_le_bytes()
            }

            #[inline(always)]
            fn from_le_bytes(bytes: Self::Bytes) -> Self {
                <$ty>::from(u32::from_le_bytes(bytes))
            }
        }
    };
}

/// Sign-extend the low `size_in_bits` bits of `value` to a full `i32`.
#[inline]
pub fn sign_extend32(value: u32, size_in_bits: u32) -> i32 {
    let shift = 32 - size_in_bits;
    ((value << shift) as i32) >> shift
}

/// Whether adding/subtracting `op1` and `op2` as two's-complement 32-bit signed integers
/// overflowed, given the actual unsigned `result` that was produced.
#[inline]
pub fn has_sign_overflowed(op1: u32, op2: u32, result: u32) -> bool {
    let op1_sign = op1.check_bit(31);
    let op2_sign = op2.check_bit(31);
    let result_sign = result.check_bit(31);

    (op1_sign == op2_sign) && (op1_sign != result_sign)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_bit_works() {
        assert!(0b1000u32.check_bit(3));
        assert!(!0b1000u32.check_bit(2));
    }

    #[test]
    fn get_bits_extracts_field() {
        let value: u32 = 0b1101_0110;
        assert_eq!(value.get_bits(0, 3), 0b0110);
        assert_eq!(value.get_bits(4, 7), 0b1101);
    }

    #[test]
    fn get_bits_full_width() {
        assert_eq!(u32::MAX.get_bits(0, 31), u32::MAX);
        assert_eq!(0xFFu8.get_bits(0, 7), 0xFF);
    }

    #[test]
    fn sign_extend_negative() {
        assert_eq!(sign_extend32(0xFF, 8), -1);
        assert_eq!(sign_extend32(0x7F, 8), 0x7F);
    }

    #[test]
    fn byte_round_trip() {
        let mut value: u32 = 0x1234_5678;
        value.set_byte_le(0, 0xAB);
        assert_eq!(value, 0x1234_56AB);
    }
}
