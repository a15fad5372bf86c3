//! Digest algorithms the search engine can drive.
//!
//! Every algorithm is exposed through [`DigestAlgorithm`], a small
//! write/sum/reset accumulator, and registered under a canonical name so
//! callers can pick algorithms from configuration.

use std::fmt;
use std::str::FromStr;

use blake3::Hasher as Blake3Hasher;
use digest::{Digest, Reset};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgorithmError {
    #[error("unknown digest algorithm '{0}'")]
    Unknown(String),
}

/// A stateful digest accumulator.
pub trait DigestAlgorithm: Send {
    /// Feeds more data into the running state.
    fn write(&mut self, data: &[u8]);

    /// Digest of everything written so far. Does not disturb the state.
    fn sum(&self) -> Vec<u8>;

    /// Returns the accumulator to its initial state.
    fn reset(&mut self);

    fn output_len(&self) -> usize;
}

/// Adapter for RustCrypto hashers.
#[derive(Clone, Default)]
pub struct RustCrypto<D>(D);

impl<D> DigestAlgorithm for RustCrypto<D>
where
    D: Digest + Reset + Clone + Send,
{
    fn write(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn sum(&self) -> Vec<u8> {
        self.0.clone().finalize().to_vec()
    }

    fn reset(&mut self) {
        Digest::reset(&mut self.0);
    }

    fn output_len(&self) -> usize {
        <D as Digest>::output_size()
    }
}

#[derive(Clone, Default)]
pub struct Blake3(Blake3Hasher);

impl DigestAlgorithm for Blake3 {
    fn write(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn sum(&self) -> Vec<u8> {
        self.0.finalize().as_bytes().to_vec()
    }

    fn reset(&mut self) {
        self.0.reset();
    }

    fn output_len(&self) -> usize {
        blake3::OUT_LEN
    }
}

pub type Factory = fn() -> Box<dyn DigestAlgorithm>;

/// A named factory of fresh [`DigestAlgorithm`] instances.
#[derive(Clone, Copy)]
pub struct Algorithm {
    name: &'static str,
    factory: Factory,
}

impl Algorithm {
    pub const fn new(name: &'static str, factory: Factory) -> Self {
        Algorithm { name, factory }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// A new accumulator that shares no state with any other instance.
    pub fn instantiate(&self) -> Box<dyn DigestAlgorithm> {
        (self.factory)()
    }

    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        let mut hasher = self.instantiate();
        hasher.write(data);
        hasher.sum()
    }
}

impl fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Algorithm").field(&self.name).finish()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl PartialEq for Algorithm {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Algorithm {}

impl FromStr for Algorithm {
    type Err = AlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        by_name(s).ok_or_else(|| AlgorithmError::Unknown(s.to_string()))
    }
}

fn rust_crypto<D>() -> Box<dyn DigestAlgorithm>
where
    D: Digest + Reset + Clone + Default + Send + 'static,
{
    Box::new(RustCrypto(D::default()))
}

fn new_blake3() -> Box<dyn DigestAlgorithm> {
    Box::new(Blake3::default())
}

pub const MD4: Algorithm = Algorithm::new("md4", rust_crypto::<md4::Md4>);
pub const MD5: Algorithm = Algorithm::new("md5", rust_crypto::<md5::Md5>);
pub const SHA1: Algorithm = Algorithm::new("sha1", rust_crypto::<sha1::Sha1>);
pub const SHA224: Algorithm = Algorithm::new("sha224", rust_crypto::<sha2::Sha224>);
pub const SHA256: Algorithm = Algorithm::new("sha256", rust_crypto::<sha2::Sha256>);
pub const SHA384: Algorithm = Algorithm::new("sha384", rust_crypto::<sha2::Sha384>);
pub const SHA512: Algorithm = Algorithm::new("sha512", rust_crypto::<sha2::Sha512>);
pub const SHA3_256: Algorithm = Algorithm::new("sha3-256", rust_crypto::<sha3::Sha3_256>);
pub const SHA3_512: Algorithm = Algorithm::new("sha3-512", rust_crypto::<sha3::Sha3_512>);
pub const RIPEMD160: Algorithm = Algorithm::new("ripemd160", rust_crypto::<ripemd::Ripemd160>);
pub const BLAKE3: Algorithm = Algorithm::new("blake3", new_blake3);

const ALL: [Algorithm; 11] = [
    MD4, MD5, SHA1, SHA224, SHA256, SHA384, SHA512, SHA3_256, SHA3_512, RIPEMD160, BLAKE3,
];

/// Every built-in algorithm, in a stable order.
pub fn all() -> &'static [Algorithm] {
    &ALL
}

/// Looks an algorithm up by name. Case and `-`/`_` separators are ignored,
/// so `SHA3_256`, `sha3-256` and `sha3256` all resolve.
pub fn by_name(name: &str) -> Option<Algorithm> {
    let wanted = normalize(name);
    ALL.iter().copied().find(|alg| normalize(alg.name) == wanted)
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_digest(alg: Algorithm, data: &[u8]) -> String {
        hex::encode(alg.digest(data))
    }

    #[test]
    fn known_answers() {
        assert_eq!(hex_digest(MD4, b""), "31d6cfe0d16ae931b73c59d7e0c089c0");
        assert_eq!(hex_digest(MD5, b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hex_digest(SHA1, b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(
            hex_digest(SHA256, b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hex_digest(RIPEMD160, b""), "9c1185a5c5e9fc54612808977ee8f548b2258d31");
        assert_eq!(
            hex_digest(BLAKE3, b""),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn sum_does_not_disturb_state() {
        for alg in all() {
            let mut hasher = alg.instantiate();
            hasher.write(b"a");
            let _ = hasher.sum();
            hasher.write(b"bc");
            assert_eq!(hasher.sum(), alg.digest(b"abc"), "{}", alg);
        }
    }

    #[test]
    fn reset_restores_initial_state() {
        for alg in all() {
            let mut hasher = alg.instantiate();
            hasher.write(b"some earlier data");
            hasher.reset();
            hasher.write(b"abc");
            assert_eq!(hasher.sum(), alg.digest(b"abc"), "{}", alg);
        }
    }

    #[test]
    fn output_len_matches_sum() {
        for alg in all() {
            let hasher = alg.instantiate();
            assert_eq!(hasher.sum().len(), hasher.output_len(), "{}", alg);
        }
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(by_name("sha256"), Some(SHA256));
        assert_eq!(by_name("SHA3_256"), Some(SHA3_256));
        assert_eq!(by_name("RipeMD-160"), Some(RIPEMD160));
        assert_eq!(by_name("whirlpool"), None);
        assert_eq!(
            "whirlpool".parse::<Algorithm>(),
            Err(AlgorithmError::Unknown("whirlpool".to_string()))
        );
    }

    #[test]
    fn registry_names_are_unique() {
        for (i, a) in all().iter().enumerate() {
            for b in &all()[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }
}
