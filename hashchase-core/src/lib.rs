pub mod bytefield;
pub mod error;
pub mod finder;
pub mod fuzzy;
pub mod settings;

pub use error::FinderError;
pub use finder::{Finder, Match, Strategy, DEFAULT_ITERATIONS};
pub use fuzzy::FuzzyDigest;
pub use settings::SearchSettings;
