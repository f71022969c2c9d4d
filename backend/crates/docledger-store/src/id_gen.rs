//! Collision-checked random identifiers.

use crate::error::{EntityError, Result};
use rand::Rng;

/// Upper bound (exclusive) of generated ids; every id has exactly this many digits.
const ID_SPACE: u32 = 10_000_000;

/// Draw 7-digit decimal ids until `exists` reports one as unused.
///
/// Predicate errors are returned as-is. Gives up with `ExhaustedAttempts` after
/// `max_attempts` draws that were all taken.
pub fn generate_unique_id<R, F>(rng: &mut R, mut exists: F, max_attempts: u32) -> Result<String>
where
    R: Rng,
    F: FnMut(&str) -> Result<bool>,
{
    for attempt in 1..=max_attempts {
        let id = format!("{:07}", rng.random_range(0..ID_SPACE));
        if !exists(&id)? {
            return Ok(id);
        }
        log::debug!("Generated id {} is taken (attempt {}/{})", id, attempt, max_attempts);
    }

    Err(EntityError::ExhaustedAttempts(max_attempts))
}
