use rand_chacha::ChaCha20Rng;
use rand_core::{OsRng, RngCore, SeedableRng};

use crate::error::CryptoError;

/// Fills a fixed-size array from the operating system entropy source.
///
/// Unlike `OsRng::fill_bytes`, a failing source is reported instead of
/// panicking. The draw is all-or-nothing: on error no bytes are returned.
pub fn try_random_bytes_fixed<const N: usize>() -> Result<[u8; N], CryptoError> {
    let mut buf = [0u8; N];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| CryptoError::EntropyUnavailable(e.to_string()))?;
    Ok(buf)
}

/// Deterministic byte stream keyed by a 64-bit seed.
///
/// The generator is ChaCha20 with the `rand_core` 0.6 `seed_from_u64`
/// expansion. Both are stable across platforms and releases, so the same
/// seed yields the same stream everywhere.
pub struct SeededStream(ChaCha20Rng);

impl SeededStream {
    pub fn new(seed: u64) -> Self {
        Self(ChaCha20Rng::seed_from_u64(seed))
    }

    /// Returns the next `N` bytes of the stream.
    pub fn next_bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut buf = [0u8; N];
        self.0.fill_bytes(&mut buf);
        buf
    }
}
