/// Occurrence counts for every possible byte value.
///
/// Counts only ever go up; there is no way to remove a byte once it has been
/// recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteField {
    counts: [usize; 256],
}

impl ByteField {
    pub fn new() -> Self {
        ByteField { counts: [0; 256] }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut field = ByteField::new();
        for &b in bytes {
            field.increment(b);
        }
        field
    }

    pub fn increment(&mut self, value: u8) {
        self.counts[value as usize] += 1;
    }

    pub fn count_of(&self, value: u8) -> usize {
        self.counts[value as usize]
    }

    /// Number of bytes recorded so far.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl Default for ByteField {
    fn default() -> Self {
        Self::new()
    }
}
