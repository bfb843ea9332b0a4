use anyhow::Result;
use rand::distr::Alphanumeric;
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng, TryRngCore};

/// Alphanumeric string from an OS-seeded generator, used for verification and reset codes.
pub fn generate_random_string(length: usize) -> Result<String> {
    let mut seed = [0u8; 32];
    OsRng.try_fill_bytes(&mut seed)?;

    Ok(StdRng::from_seed(seed)
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_alphanumeric_codes_of_requested_length() {
        let a = generate_random_string(32).unwrap();
        let b = generate_random_string(32).unwrap();

        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
