/// The pair of HMAC secrets a receiver accepts.
///
/// `current` is tried first; `next` covers the rollover window after the
/// dispatcher rotated its keys. Both are opaque byte strings.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKeys {
    current: Vec<u8>,
    next: Vec<u8>,
}

impl SigningKeys {
    pub fn new(current: impl AsRef<[u8]>, next: impl AsRef<[u8]>) -> Self {
        Self {
            current: current.as_ref().to_vec(),
            next: next.as_ref().to_vec(),
        }
    }

    pub fn current(&self) -> &[u8] {
        &self.current
    }

    pub fn next(&self) -> &[u8] {
        &self.next
    }
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("SigningKeys")
            .field("current", &"[REDACTED]")
            .field("next", &"[REDACTED]")
            .finish()
    }
}
