pub mod candidate;

pub use candidate::{Candidate, CandidateName, InvalidName};
