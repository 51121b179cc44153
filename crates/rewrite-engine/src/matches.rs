// Containment: is an expected output string in a lattice?

use rewrite_core::{Semiring, TokenType};
use rewrite_fst::{ComposeFilter, VectorFst, compose};

use crate::RewriteError;
use crate::input::RewriteInput;

/// Whether `lattice` accepts `expected` (compiled with `token_type` when it
/// is text). Weights are ignored; absence is `Ok(false)`.
pub fn lattice_contains<W: Semiring>(
    lattice: &VectorFst<W>,
    expected: impl Into<RewriteInput<W>>,
    token_type: &TokenType,
) -> Result<bool, RewriteError> {
    let expected = expected.into().into_acceptor(token_type)?;
    let composed = compose(lattice, &expected, ComposeFilter::AltSequence);
    Ok(!composed.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewrite_core::TropicalWeight;

    fn lattice(words: &[&str]) -> VectorFst<TropicalWeight> {
        VectorFst::string_map(words.iter().map(|s| {
            let labels = TokenType::Byte.compile(s).unwrap();
            (labels.clone(), labels, TropicalWeight::new(0.0))
        }))
    }

    #[test]
    fn present_and_absent() {
        let l = lattice(&["p", "pq"]);
        assert!(lattice_contains(&l, "p", &TokenType::Byte).unwrap());
        assert!(lattice_contains(&l, "pq", &TokenType::Byte).unwrap());
        assert!(!lattice_contains(&l, "q", &TokenType::Byte).unwrap());
        assert!(!lattice_contains(&l, "", &TokenType::Byte).unwrap());
    }

    #[test]
    fn heavy_paths_still_match() {
        let l = VectorFst::string_map([(vec![1], vec![1], TropicalWeight::new(1e6))]);
        let expected = VectorFst::linear_acceptor(&[1]);
        assert!(lattice_contains(&l, expected, &TokenType::Byte).unwrap());
    }

    #[test]
    fn empty_lattice_matches_nothing() {
        let l = VectorFst::<TropicalWeight>::new();
        assert!(!lattice_contains(&l, "a", &TokenType::Byte).unwrap());
    }
}
