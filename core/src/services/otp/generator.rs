//! Code generation

use rand::rngs::OsRng;
use rand::Rng;

const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// Six-digit code drawn uniformly from `100000..=999999` using the OS RNG
pub fn generate_code() -> String {
    generate_code_with(&mut OsRng)
}

/// Same as [`generate_code`] with a caller-supplied RNG
///
/// `gen_range` samples by rejection, so every code in the range is equally
/// likely regardless of the RNG's word size.
pub fn generate_code_with<R: Rng>(rng: &mut R) -> String {
    rng.gen_range(CODE_MIN..=CODE_MAX).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_codes_are_six_digits_without_leading_zero() {
        for _ in 0..1_000 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.chars().next(), Some('0'));
        }
    }

    #[test]
    fn test_leading_digits_are_spread_evenly() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0u32; 10];
        let samples = 90_000;
        for _ in 0..samples {
            let code = generate_code_with(&mut rng);
            let lead = code.as_bytes()[0] - b'0';
            counts[lead as usize] += 1;
        }

        assert_eq!(counts[0], 0);
        let expected = samples / 9;
        for lead in 1..=9 {
            let deviation = (counts[lead] as i64 - expected as i64).abs();
            assert!(deviation < (expected / 10) as i64, "digit {} seen {} times", lead, counts[lead]);
        }
    }
}
