//! Primitive wire encoding: little-endian scalars, null-terminated
//! EUC-KR/UTF-8 strings, and explicitly-sized variable-length
//! collections.
//!
//! Every command body is built out of [`WireCodec`] impls for its
//! scalar and collection types rather than hand-rolled byte pushes.

use std::io::Write;

use byteorder::{WriteBytesExt, LE};

use crate::error::{CodecError, CodecResult};

/// A value that can read and write itself to the wire.
pub trait WireCodec: Sized {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()>;
    fn read_from(r: &mut &[u8]) -> CodecResult<Self>;
}

macro_rules! impl_scalar {
    ($ty:ty, $read:ident) => {
        impl WireCodec for $ty {
            fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
                w.write_all(&self.to_le_bytes())?;
                Ok(())
            }

            fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
                const N: usize = std::mem::size_of::<$ty>();
                if r.len() < N {
                    return Err(CodecError::NeedMoreData);
                }
                let (head, tail) = r.split_at(N);
                *r = tail;
                Ok(<$ty>::from_le_bytes(head.try_into().expect($read)))
            }
        }
    };
}

impl_scalar!(u8, "u8");
impl_scalar!(i8, "i8");
impl_scalar!(u16, "u16");
impl_scalar!(i16, "i16");
impl_scalar!(u32, "u32");
impl_scalar!(i32, "i32");
impl_scalar!(u64, "u64");
impl_scalar!(i64, "i64");
impl_scalar!(f32, "f32");
impl_scalar!(f64, "f64");

impl WireCodec for bool {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        w.write_u8(if *self { 1 } else { 0 })?;
        Ok(())
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        Ok(u8::read_from(r)? != 0)
    }
}

/// A null-terminated string, converted to/from EUC-KR on the wire
/// boundary (see the locale conversion rules). In-memory the value is
/// always a valid UTF-8 `String`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireString(pub String);

impl From<&str> for WireString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for WireString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::ops::Deref for WireString {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl WireCodec for WireString {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        let (encoded, _, had_errors) = encoding_rs::EUC_KR.encode(&self.0);
        if had_errors {
            return Err(CodecError::LocaleConversion);
        }
        w.write_all(&encoded)?;
        w.write_u8(0)?;
        Ok(())
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        let nul = r
            .iter()
            .position(|&b| b == 0)
            .ok_or(CodecError::NeedMoreData)?;
        let (raw, rest) = r.split_at(nul);
        *r = &rest[1..];

        let (decoded, _, had_errors) = encoding_rs::EUC_KR.decode(raw);
        if had_errors {
            return Err(CodecError::LocaleConversion);
        }
        Ok(WireString(decoded.into_owned()))
    }
}

/// A variable-length collection whose wire size prefix is a single
/// `u8`. The prefix width is part of the type, not a runtime parameter,
/// so a structure that documents a `u8` count can't accidentally be
/// written with a `u16` one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizedVecU8<T>(pub Vec<T>);

/// As [`SizedVecU8`], but with a `u16` wire size prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizedVecU16<T>(pub Vec<T>);

impl<T> From<Vec<T>> for SizedVecU8<T> {
    fn from(v: Vec<T>) -> Self {
        Self(v)
    }
}

impl<T> From<Vec<T>> for SizedVecU16<T> {
    fn from(v: Vec<T>) -> Self {
        Self(v)
    }
}

impl<T: WireCodec> WireCodec for SizedVecU8<T> {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        let len = u8::try_from(self.0.len()).map_err(|_| CodecError::FieldOutOfRange {
            field: "SizedVecU8::len",
            value: self.0.len() as i64,
        })?;
        w.write_u8(len)?;
        for item in &self.0 {
            item.write_to(w)?;
        }
        Ok(())
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        let len = u8::read_from(r)?;
        let mut items = Vec::with_capacity(len as usize);
        for _ in 0..len {
            items.push(T::read_from(r)?);
        }
        Ok(Self(items))
    }
}

impl<T: WireCodec> WireCodec for SizedVecU16<T> {
    fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
        let len = u16::try_from(self.0.len()).map_err(|_| CodecError::FieldOutOfRange {
            field: "SizedVecU16::len",
            value: self.0.len() as i64,
        })?;
        w.write_u16::<LE>(len)?;
        for item in &self.0 {
            item.write_to(w)?;
        }
        Ok(())
    }

    fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
        let len = u16::read_from(r)?;
        let mut items = Vec::with_capacity(len as usize);
        for _ in 0..len {
            items.push(T::read_from(r)?);
        }
        Ok(Self(items))
    }
}

/// Ensures every byte of a decoded command body was consumed.
pub fn ensure_fully_consumed(remaining: &[u8]) -> CodecResult<()> {
    if remaining.is_empty() {
        Ok(())
    } else {
        Err(CodecError::TrailingBytes(remaining.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_round_trip() {
        let mut buf = Vec::new();
        42u32.write_to(&mut buf).unwrap();
        let mut cursor = &buf[..];
        assert_eq!(u32::read_from(&mut cursor).unwrap(), 42);
        assert!(cursor.is_empty());
    }

    #[test]
    fn string_round_trip() {
        let original = WireString::from("hello ranch");
        let mut buf = Vec::new();
        original.write_to(&mut buf).unwrap();
        assert_eq!(*buf.last().unwrap(), 0);

        let mut cursor = &buf[..];
        let decoded = WireString::read_from(&mut cursor).unwrap();
        assert_eq!(decoded, original);
        assert!(cursor.is_empty());
    }

    #[test]
    fn sized_vec_u8_round_trip() {
        let original: SizedVecU8<u32> = vec![1, 2, 3, 4].into();
        let mut buf = Vec::new();
        original.write_to(&mut buf).unwrap();
        assert_eq!(buf[0], 4);

        let mut cursor = &buf[..];
        let decoded = SizedVecU8::<u32>::read_from(&mut cursor).unwrap();
        assert_eq!(decoded, original);
    }
}
