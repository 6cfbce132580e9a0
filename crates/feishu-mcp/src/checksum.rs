//! Adler-32 checksum for upload integrity.
//!
//! The drive upload endpoint recomputes this value server-side and rejects
//! the upload on mismatch, so the result must match the standard algorithm
//! bit for bit.

/// Largest prime below 2^16.
const MOD_ADLER: u32 = 65521;

/// Streaming Adler-32 hasher.
///
/// ```
/// use feishu_mcp::Adler32;
///
/// let mut hasher = Adler32::new();
/// hasher.update(b"te");
/// hasher.update(b"st");
/// assert_eq!(hasher.finish(), 73_204_161);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Adler32 {
    /// Create a hasher in its initial state (`a = 1`, `b = 0`).
    #[must_use]
    pub fn new() -> Self {
        Self { a: 1, b: 0 }
    }

    /// Feed bytes into the running sums.
    pub fn update(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.a = (self.a + u32::from(byte)) % MOD_ADLER;
            self.b = (self.b + self.a) % MOD_ADLER;
        }
    }

    /// The checksum of everything fed so far.
    #[must_use]
    pub fn finish(&self) -> u32 {
        (self.b << 16) | self.a
    }
}

/// Adler-32 of `bytes`.
#[must_use]
pub fn adler32(bytes: &[u8]) -> u32 {
    let mut hasher = Adler32::new();
    hasher.update(bytes);
    hasher.finish()
}

/// Adler-32 of `bytes` rendered in base 10, as the upload form expects.
#[must_use]
pub fn checksum_string(bytes: &[u8]) -> String {
    adler32(bytes).to_string()
}
