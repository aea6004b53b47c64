//! Persistent and instance-scoped identifiers.

use std::io::Write;

use crate::error::CodecResult;
use crate::wire::WireCodec;

macro_rules! wire_newtype {
    ($name:ident, $repr:ty, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub $repr);

        impl $name {
            /// The reserved invalid value.
            pub const INVALID: Self = Self(0);

            pub fn is_valid(self) -> bool {
                self.0 != 0
            }
        }

        impl From<$repr> for $name {
            fn from(v: $repr) -> Self {
                Self(v)
            }
        }

        impl From<$name> for $repr {
            fn from(v: $name) -> Self {
                v.0
            }
        }

        impl WireCodec for $name {
            fn write_to(&self, w: &mut dyn Write) -> CodecResult<()> {
                self.0.write_to(w)
            }

            fn read_from(r: &mut &[u8]) -> CodecResult<Self> {
                Ok(Self(<$repr>::read_from(r)?))
            }
        }
    };
}

wire_newtype!(Uid, u32, "32-bit unique identifier for a persistent entity. 0 is invalid.");
wire_newtype!(Tid, u32, "32-bit content-template identifier. 0 is invalid.");
wire_newtype!(Oid, u16, "16-bit instance-scoped object identifier. 0 is invalid.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_uid_is_zero() {
        assert!(!Uid::INVALID.is_valid());
        assert!(Uid(1).is_valid());
    }
}
