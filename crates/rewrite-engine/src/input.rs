// Rewrite inputs: literal text or a prebuilt acceptor.

use rewrite_core::{Semiring, TokenType};
use rewrite_fst::VectorFst;

use crate::RewriteError;

/// The input to a rewrite: either text, compiled with the input token type
/// when the lattice is built, or an acceptor built by the caller.
///
/// Anything convertible with `Into` can be passed where an input is
/// expected, so `"cat"`, `String`s and `VectorFst`s all work directly.
#[derive(Debug, Clone, PartialEq)]
pub enum RewriteInput<W: Semiring> {
    Text(String),
    Acceptor(VectorFst<W>),
}

impl<W: Semiring> RewriteInput<W> {
    /// Resolve to an acceptor, compiling text with `token_type`.
    pub fn into_acceptor(self, token_type: &TokenType) -> Result<VectorFst<W>, RewriteError> {
        match self {
            Self::Text(text) => Ok(VectorFst::linear_acceptor(&token_type.compile(&text)?)),
            Self::Acceptor(fst) => Ok(fst),
        }
    }

    /// Short human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Text(text) => format!("{text:?}"),
            Self::Acceptor(fst) => describe_acceptor(fst),
        }
    }
}

pub(crate) fn describe_acceptor<W: Semiring>(fst: &VectorFst<W>) -> String {
    format!(
        "acceptor with {} states and {} transitions",
        fst.num_states(),
        fst.num_transitions()
    )
}

impl<W: Semiring> From<&str> for RewriteInput<W> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl<W: Semiring> From<String> for RewriteInput<W> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<W: Semiring> From<&String> for RewriteInput<W> {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl<W: Semiring> From<VectorFst<W>> for RewriteInput<W> {
    fn from(fst: VectorFst<W>) -> Self {
        Self::Acceptor(fst)
    }
}

impl<W: Semiring> From<&VectorFst<W>> for RewriteInput<W> {
    fn from(fst: &VectorFst<W>) -> Self {
        Self::Acceptor(fst.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewrite_core::{TokenError, TropicalWeight};

    type Input = RewriteInput<TropicalWeight>;

    #[test]
    fn text_compiles_with_token_type() {
        let fst = Input::from("ab").into_acceptor(&TokenType::Byte).unwrap();
        assert_eq!(fst, VectorFst::linear_acceptor(&[b'a' as u32, b'b' as u32]));
    }

    #[test]
    fn acceptor_passes_through() {
        let acceptor = VectorFst::<TropicalWeight>::linear_acceptor(&[7]);
        let resolved = Input::from(&acceptor).into_acceptor(&TokenType::Utf8).unwrap();
        assert_eq!(resolved, acceptor);
    }

    #[test]
    fn nul_text_is_a_token_error() {
        let err = Input::from("a\0").into_acceptor(&TokenType::Byte).unwrap_err();
        assert!(matches!(err, RewriteError::Token(TokenError::NulCharacter)));
    }

    #[test]
    fn descriptions() {
        assert_eq!(Input::from("cat").describe(), "\"cat\"");
        let fst = VectorFst::linear_acceptor(&[1, 2]);
        assert_eq!(
            Input::from(fst).describe(),
            "acceptor with 3 states and 2 transitions"
        );
    }
}
