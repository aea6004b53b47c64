//! Payload scrambling: the per-connection rolling XOR keystream used by
//! Lobby/Ranch/Race, and the fixed four-byte XOR used by Messenger.

const XOR_CONTROL: u32 = 0xA201_91CB;
const XOR_MULTIPLIER: u32 = 0x2008_0825;

/// The rolling XOR state held by one connection on the Lobby, Ranch, or
/// Race listeners. Advanced once per inbound command, never reused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollingCode(u32);

impl RollingCode {
    pub fn new(seed: u32) -> Self {
        Self(seed)
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Advances the code and returns the new value. Wrapping 32-bit
    /// signed arithmetic, matching the reference's `int32_t` roll.
    pub fn roll(&mut self) -> u32 {
        self.0 = XOR_CONTROL.wrapping_sub(self.0.wrapping_mul(XOR_MULTIPLIER));
        self.0
    }

    /// The low 3 bits of the current code: the count of trailing filler
    /// bytes appended to the wire payload.
    pub fn pad(self) -> u8 {
        (self.0 & 0x7) as u8
    }

    /// Descrambles (or, symmetrically, scrambles) `data` in place by
    /// XORing it with the little-endian bytes of the current code,
    /// repeating as a 4-byte keystream.
    pub fn apply_keystream(self, data: &mut [u8]) {
        let key = self.0.to_le_bytes();
        for (i, byte) in data.iter_mut().enumerate() {
            *byte ^= key[i % 4];
        }
    }
}

/// Descrambles one inbound payload: rolls `code`, strips the trailing
/// pad bytes, and XORs the remainder in place.
///
/// `raw` is the payload as it arrived on the wire, i.e. `length - 4`
/// bytes. Returns the descrambled slice with the pad trimmed off.
pub fn descramble_inbound<'a>(code: &mut RollingCode, raw: &'a mut [u8]) -> &'a [u8] {
    code.roll();
    let pad = code.pad() as usize;
    let usable = raw.len().saturating_sub(pad);
    code.apply_keystream(&mut raw[..usable]);
    &raw[..usable]
}

/// The fixed Messenger XOR key (no rolling state).
pub const MESSENGER_XOR_KEY: [u8; 4] = [0x2B, 0xFE, 0xB8, 0x02];

/// XORs `data` in place with the repeating Messenger key, at the given
/// starting keystream offset (the header and payload are scrambled as
/// one contiguous stream, so the payload continues the header's phase).
pub fn messenger_xor(data: &mut [u8], start_offset: usize) {
    for (i, byte) in data.iter_mut().enumerate() {
        *byte ^= MESSENGER_XOR_KEY[(start_offset + i) % 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Concrete scenario: starting from code 0, one roll gives
    /// `0xA20191CB`; a second roll gives the documented wrapped value.
    #[test]
    fn rolling_code_advance_scenario() {
        let mut code = RollingCode::default();
        assert_eq!(code.roll(), 0xA201_91CB);

        let expected_second: u32 = 0xA201_91CBu32.wrapping_sub(0xA201_91CBu32.wrapping_mul(0x2008_0825));
        assert_eq!(code.roll(), expected_second);
    }

    #[test]
    fn scramble_round_trip() {
        let mut rng_state: u32 = 0x1234_5678;
        let mut next = || {
            rng_state = rng_state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            rng_state
        };

        for _ in 0..64 {
            let payload: Vec<u8> = (0..37).map(|_| (next() & 0xFF) as u8).collect();
            let code_seed = next();

            let mut enc_code = RollingCode::new(code_seed);
            enc_code.roll();
            let mut scrambled = payload.clone();
            enc_code.apply_keystream(&mut scrambled);

            let mut dec_code = RollingCode::new(code_seed);
            dec_code.roll();
            let mut descrambled = scrambled.clone();
            dec_code.apply_keystream(&mut descrambled);

            assert_eq!(descrambled, payload);
        }
    }

    #[test]
    fn messenger_xor_round_trip() {
        let original = b"ChatterLoginPayload".to_vec();
        let mut buf = original.clone();
        messenger_xor(&mut buf, 4);
        assert_ne!(buf, original);
        messenger_xor(&mut buf, 4);
        assert_eq!(buf, original);
    }
}
