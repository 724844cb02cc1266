pub use error::CoreError;
pub use solution::{Candidate, Solution};

mod error;
mod solution;
#[cfg(test)]
pub(crate) mod test_utils;
