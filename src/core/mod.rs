// Core algorithm exports
pub mod engine;
pub mod enumerate;
pub mod error;
pub mod matching;
pub mod preferences;
pub mod stability;

pub use engine::{solve, DeferredAcceptance, SolveOutcome};
pub use enumerate::{enumerate_stable, enumerate_stable_up_to};
pub use error::{MalformedPreferenceError, Side};
pub use matching::Matching;
pub use preferences::{validate, PreferenceModel, PreferenceTable};
pub use stability::{blocking_pairs, is_stable, BlockingPair, StabilityCheck};
