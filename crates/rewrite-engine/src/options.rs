// Rewrite options: token types and the determinization state multiplier.

use rewrite_core::TokenType;

/// Default ratio between the state budget of a determinized lattice and the
/// size of the lattice it came from.
pub const DEFAULT_STATE_MULTIPLIER: f64 = 4.0;

/// Constant part of the determinization state cap.
pub const STATE_CAP_BASE: usize = 256;

/// Options shared by the rewrite functions and methods.
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteOptions {
    /// How text inputs (and text expected outputs in `matches`) on the input
    /// side are compiled to labels.
    pub input_token_type: TokenType,
    /// How output labels are rendered, and how expected output text is
    /// compiled.
    pub token_type: TokenType,
    /// Determinization may create at most
    /// `STATE_CAP_BASE + state_multiplier * lattice states` states.
    pub state_multiplier: f64,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            input_token_type: TokenType::Byte,
            token_type: TokenType::Byte,
            state_multiplier: DEFAULT_STATE_MULTIPLIER,
        }
    }
}

impl RewriteOptions {
    /// Options using `token_type` for both inputs and outputs.
    pub fn with_token_type(token_type: TokenType) -> Self {
        Self {
            input_token_type: token_type.clone(),
            token_type,
            ..Self::default()
        }
    }

    pub fn input_token_type(mut self, token_type: TokenType) -> Self {
        self.input_token_type = token_type;
        self
    }

    pub fn output_token_type(mut self, token_type: TokenType) -> Self {
        self.token_type = token_type;
        self
    }

    pub fn state_multiplier(mut self, multiplier: f64) -> Self {
        self.state_multiplier = multiplier;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = RewriteOptions::default();
        assert_eq!(options.input_token_type, TokenType::Byte);
        assert_eq!(options.token_type, TokenType::Byte);
        assert_eq!(options.state_multiplier, 4.0);
    }

    #[test]
    fn builder_methods() {
        let options = RewriteOptions::with_token_type(TokenType::Utf8)
            .output_token_type(TokenType::Byte)
            .state_multiplier(8.0);
        assert_eq!(options.input_token_type, TokenType::Utf8);
        assert_eq!(options.token_type, TokenType::Byte);
        assert_eq!(options.state_multiplier, 8.0);
    }
}
