use std::fmt;

use crate::bytefield::ByteField;

/// A digest value together with the byte histogram used to compare it
/// fuzzily against other digests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyDigest {
    value: Vec<u8>,
    field: ByteField,
}

impl FuzzyDigest {
    pub fn new(value: &[u8]) -> Self {
        Self::from(value.to_vec())
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// How many byte values differ between the two digests, ignoring order,
    /// plus the difference in their lengths.
    ///
    /// A single substituted byte moves one count down and another up, so the
    /// summed histogram difference is halved.
    pub fn distance_to(&self, other: &FuzzyDigest) -> usize {
        let histogram: usize = (0..=255u8)
            .map(|v| self.field.count_of(v).abs_diff(other.field.count_of(v)))
            .sum();
        histogram / 2 + self.len().abs_diff(other.len())
    }
}

impl From<Vec<u8>> for FuzzyDigest {
    fn from(value: Vec<u8>) -> Self {
        let field = ByteField::from_bytes(&value);
        FuzzyDigest { value, field }
    }
}

impl fmt::Display for FuzzyDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn distance(a: &str, b: &str) -> usize {
        FuzzyDigest::new(a.as_bytes()).distance_to(&FuzzyDigest::new(b.as_bytes()))
    }

    #[test]
    fn differences() {
        for (a, b, want) in [
            ("cow", "bow", 1),
            ("moo", "mom", 1),
            ("abc", "xyz", 3),
            ("aaa", "aab", 1),
            ("aaaa", "aab", 2),
            ("aaaa", "aaa", 1),
            ("aaab", "aaa", 1),
        ] {
            assert_eq!(distance(a, b), want, "{} vs {}", a, b);
            assert_eq!(distance(a, b), distance(b, a), "{} vs {}", a, b);
        }
    }

    #[test]
    fn order_is_ignored() {
        assert_eq!(distance("stop", "pots"), 0);
    }

    #[test]
    fn empty_digests() {
        assert_eq!(distance("", ""), 0);
        // Histogram term (4 / 2) plus length term (4).
        assert_eq!(distance("", "abcd"), 6);
        assert_eq!(distance("aaaa", ""), 6);
        assert_eq!(distance("", "abcd"), distance("abcd", ""));
    }

    #[test]
    fn renders_lowercase_hex() {
        let digest = FuzzyDigest::new(&[0x00, 0xab, 0x7f, 0xff]);
        assert_eq!(digest.to_string(), "00ab7fff");
        assert_eq!(FuzzyDigest::new(&[]).to_string(), "");
    }

    #[test]
    fn copies_its_input() {
        let mut bytes = vec![1, 2, 3];
        let digest = FuzzyDigest::new(&bytes);
        bytes[0] = 9;
        assert_eq!(digest.value(), &[1, 2, 3]);
        assert_eq!(digest.len(), 3);
        assert!(!digest.is_empty());
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(a in prop::collection::vec(any::<u8>(), 0..64),
                                 b in prop::collection::vec(any::<u8>(), 0..64)) {
            let (a, b) = (FuzzyDigest::from(a), FuzzyDigest::from(b));
            prop_assert_eq!(a.distance_to(&b), b.distance_to(&a));
        }

        #[test]
        fn distance_to_self_is_zero(a in prop::collection::vec(any::<u8>(), 0..64)) {
            let a = FuzzyDigest::from(a);
            prop_assert_eq!(a.distance_to(&a), 0);
        }

        #[test]
        fn one_substitution_is_distance_one(a in prop::collection::vec(any::<u8>(), 1..64),
                                            index in any::<prop::sample::Index>(),
                                            flip in 1..=255u8) {
            let mut b = a.clone();
            let i = index.index(b.len());
            b[i] ^= flip;
            prop_assert_eq!(FuzzyDigest::from(a).distance_to(&FuzzyDigest::from(b)), 1);
        }
    }
}
