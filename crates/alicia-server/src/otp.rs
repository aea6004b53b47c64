//! One-time codes handed from the Lobby to the Ranch/Race services as
//! the handoff ticket a client presents on its next connection.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::RngCore;

use alicia_protocol::model::Uid;

const OTP_LIFETIME: Duration = Duration::from_secs(30);

struct Entry {
    code: u32,
    issued_at: Instant,
}

/// Single-use, 30-second-lifetime codes keyed by an arbitrary `Uid`
/// (a ranch uid, a room uid, ...). A failed [`OtpSystem::authorize`]
/// does not remove the stored code, so a brute-force attempt merely
/// waits out the same expiry as a legitimate client would.
#[derive(Default)]
pub struct OtpSystem {
    codes: Mutex<HashMap<Uid, Entry>>,
}

impl OtpSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, key: Uid) -> u32 {
        let code = rand::thread_rng().next_u32();
        self.codes.lock().insert(key, Entry { code, issued_at: Instant::now() });
        code
    }

    /// Returns true iff `key` has an unexpired entry equal to `code`;
    /// on success the entry is consumed so it can never authorize a
    /// second time.
    pub fn authorize(&self, key: Uid, code: u32) -> bool {
        let mut codes = self.codes.lock();
        let Some(entry) = codes.get(&key) else { return false };
        if entry.issued_at.elapsed() > OTP_LIFETIME {
            codes.remove(&key);
            return false;
        }
        if entry.code != code {
            return false;
        }
        codes.remove(&key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_authorizes_exactly_once() {
        let otp = OtpSystem::new();
        let code = otp.grant(Uid(1));
        assert!(otp.authorize(Uid(1), code));
        assert!(!otp.authorize(Uid(1), code));
    }

    #[test]
    fn wrong_code_leaves_entry_available() {
        let otp = OtpSystem::new();
        let code = otp.grant(Uid(1));
        assert!(!otp.authorize(Uid(1), code.wrapping_add(1)));
        assert!(otp.authorize(Uid(1), code));
    }
}
