use std::fmt;

use sha2::{Digest, Sha256};

/// PIN as typed by the user. Never printed, not even through `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    pub fn new(pin: impl Into<String>) -> Self {
        Self(pin.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Pin {
    fn from(pin: &str) -> Self {
        Self::new(pin)
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(***)")
    }
}

/// SHA-256 of the PIN bytes. This is what the account keeps instead of the PIN.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PinDigest([u8; 32]);

impl PinDigest {
    pub fn of(pin: &str) -> Self {
        Self(Sha256::digest(pin.as_bytes()).into())
    }

    /// Plain `==` on the digests, so the comparison is not constant time.
    pub fn matches(&self, pin: &str) -> bool {
        *self == Self::of(pin)
    }
}

impl fmt::Debug for PinDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PinDigest(..)")
    }
}
