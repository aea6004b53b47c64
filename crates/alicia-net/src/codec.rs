//! Binds the pure scrambling primitives in `alicia_protocol::scramble`
//! to a live connection: which keystream a listener uses, and whether
//! it rolls before scrambling outbound frames (see the observed
//! reference asymmetry, preserved as a config knob).

use alicia_protocol::magic;
use alicia_protocol::scramble::{self, RollingCode};

/// Per-connection scrambling state. Lobby/Ranch/Race connections carry
/// a [`RollingCode`] seeded at connect time; Messenger connections use
/// the fixed fallback key and have no state to roll.
#[derive(Debug, Clone)]
pub enum ConnectionCodec {
    Rolling {
        code: RollingCode,
        /// The reference does not roll the code before scrambling the
        /// outbound direction; clients may depend on this asymmetry.
        /// Set `true` to roll symmetrically instead.
        scramble_outbound: bool,
    },
    Messenger,
}

impl ConnectionCodec {
    pub fn rolling(seed: u32, scramble_outbound: bool) -> Self {
        Self::Rolling { code: RollingCode::new(seed), scramble_outbound }
    }

    pub fn messenger() -> Self {
        Self::Messenger
    }

    /// Descrambles one inbound frame body (`length - 4` bytes, as
    /// received), trimming the trailing pad if the codec uses one.
    pub fn descramble_inbound(&mut self, body: &mut [u8]) -> Vec<u8> {
        match self {
            ConnectionCodec::Rolling { code, .. } => scramble::descramble_inbound(code, body).to_vec(),
            ConnectionCodec::Messenger => {
                scramble::messenger_xor(body, magic::FRAME_HEADER_LEN);
                body.to_vec()
            }
        }
    }

    /// Scrambles a fully-built outbound frame (magic header + body) in
    /// place before it's written to the socket. The reference writes
    /// this direction in plaintext (`CommandServer::SendCommand` never
    /// touches the rolling code on send), so the default
    /// (`scramble_outbound: false`) leaves the frame untouched; only an
    /// opted-in `true` rolls the code and applies the keystream.
    pub fn scramble_outbound(&mut self, frame: &mut [u8]) {
        match self {
            ConnectionCodec::Rolling { code, scramble_outbound } => {
                if *scramble_outbound {
                    code.roll();
                    code.apply_keystream(frame);
                }
            }
            ConnectionCodec::Messenger => {
                scramble::messenger_xor(frame, 0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The default (`scramble_outbound: false`) leaves outbound frames
    /// as plaintext, matching the reference's unscrambled send path.
    #[test]
    fn outbound_default_is_plaintext() {
        let mut codec = ConnectionCodec::rolling(0x1234, false);

        let mut inbound = b"client frame payload".to_vec();
        codec.descramble_inbound(&mut inbound);

        let original = vec![1, 2, 3, 4, 5, 6, 7, 8];
        let mut reply = original.clone();
        codec.scramble_outbound(&mut reply);

        assert_eq!(reply, original);
    }

    #[test]
    fn outbound_can_opt_into_rolling_symmetrically() {
        let mut codec = ConnectionCodec::rolling(0x1234, true);
        let mut first_reply = vec![1, 2, 3, 4];
        codec.scramble_outbound(&mut first_reply);

        let mut codec_no_roll = ConnectionCodec::rolling(0x1234, true);
        let mut second_reply = vec![1, 2, 3, 4];
        codec_no_roll.scramble_outbound(&mut second_reply);

        assert_eq!(first_reply, second_reply, "same seed, same single roll, same keystream");
        assert_ne!(first_reply, vec![1, 2, 3, 4], "opted-in scrambling actually transforms the frame");
    }

    #[test]
    fn messenger_codec_is_its_own_inverse() {
        let mut codec = ConnectionCodec::messenger();
        let original = b"ChatterLogin".to_vec();
        let mut buf = original.clone();
        codec.scramble_outbound(&mut buf);

        let mut codec2 = ConnectionCodec::messenger();
        let recovered = codec2.descramble_inbound(&mut buf);
        assert_eq!(recovered, original);
    }
}
