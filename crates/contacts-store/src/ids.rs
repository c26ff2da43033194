// SPDX-License-Identifier: Apache-2.0

use contacts_model::ContactId;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub const OBJECT_ID_HEX_LEN: usize = 24;

const COUNTER_MASK: u32 = 0x00ff_ffff;

/// Issues 12-byte identifiers rendered as 24 lowercase hex characters:
/// 4 bytes of unix seconds, 5 bytes of per-generator nonce, 3 bytes of counter.
pub struct IdGenerator {
    nonce: [u8; 5],
    counter: AtomicU32,
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let seed = format!("{}:{nanos}:{:?}", std::process::id(), std::thread::current().id());
        Self::from_seed(seed.as_bytes())
    }

    /// Deterministic generator, for tests.
    #[must_use]
    pub fn from_seed(seed: &[u8]) -> Self {
        let digest = Sha256::digest(seed);
        let mut nonce = [0_u8; 5];
        nonce.copy_from_slice(&digest[..5]);
        let counter = u32::from_be_bytes([0, digest[5], digest[6], digest[7]]);
        Self {
            nonce,
            counter: AtomicU32::new(counter),
        }
    }

    #[must_use]
    pub fn next_id(&self) -> ContactId {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs()) as u32;
        let count = self.counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;
        let mut bytes = [0_u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&self.nonce);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        ContactId::new(hex::encode(bytes))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
