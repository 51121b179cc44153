// Token types: how strings become label sequences and back.

use std::sync::Arc;

use crate::symbols::SymbolTable;
use crate::{EPSILON, Label, TokenError};

/// How a string is split into labels and how labels are rendered.
///
/// - `Byte`: one label per UTF-8 byte, rendered by concatenation.
/// - `Utf8`: one label per Unicode scalar value, rendered by concatenation.
/// - `Symbols`: whitespace-separated tokens looked up in a symbol table,
///   rendered joined by single spaces.
///
/// Epsilon labels are skipped when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TokenType {
    #[default]
    Byte,
    Utf8,
    Symbols(Arc<SymbolTable>),
}

impl TokenType {
    /// Look up a named token type (`"byte"` or `"utf8"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "byte" => Some(Self::Byte),
            "utf8" => Some(Self::Utf8),
            _ => None,
        }
    }

    pub fn symbols(table: SymbolTable) -> Self {
        Self::Symbols(Arc::new(table))
    }

    /// Compile a string into a label sequence.
    pub fn compile(&self, text: &str) -> Result<Vec<Label>, TokenError> {
        match self {
            Self::Byte => text
                .bytes()
                .map(|b| if b == 0 { Err(TokenError::NulCharacter) } else { Ok(b as Label) })
                .collect(),
            Self::Utf8 => text
                .chars()
                .map(|ch| if ch == '\0' { Err(TokenError::NulCharacter) } else { Ok(ch as Label) })
                .collect(),
            Self::Symbols(table) => text
                .split_whitespace()
                .map(|token| {
                    table
                        .find_label(token)
                        .ok_or_else(|| TokenError::UnknownSymbol(token.to_string()))
                })
                .collect(),
        }
    }

    /// Render a label sequence as a string.
    pub fn render(&self, labels: &[Label]) -> Result<String, TokenError> {
        let labels = labels.iter().copied().filter(|&l| l != EPSILON);
        match self {
            Self::Byte => {
                let bytes = labels
                    .map(|l| u8::try_from(l).map_err(|_| TokenError::InvalidLabel(l)))
                    .collect::<Result<Vec<u8>, _>>()?;
                String::from_utf8(bytes).map_err(|_| TokenError::InvalidUtf8)
            }
            Self::Utf8 => labels
                .map(|l| char::from_u32(l).ok_or(TokenError::InvalidLabel(l)))
                .collect(),
            Self::Symbols(table) => {
                let mut out = String::new();
                for label in labels {
                    let symbol = table.find_symbol(label).ok_or(TokenError::InvalidLabel(label))?;
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    out.push_str(symbol);
                }
                Ok(out)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_compile_and_render() {
        let labels = TokenType::Byte.compile("ä!").unwrap();
        assert_eq!(labels, vec![0xC3, 0xA4, b'!' as Label]);
        assert_eq!(TokenType::Byte.render(&labels).unwrap(), "ä!");
    }

    #[test]
    fn utf8_compile_and_render() {
        let labels = TokenType::Utf8.compile("ä!").unwrap();
        assert_eq!(labels, vec![0xE4, b'!' as Label]);
        assert_eq!(TokenType::Utf8.render(&labels).unwrap(), "ä!");
    }

    #[test]
    fn render_skips_epsilon() {
        let labels = [0, b'a' as Label, 0, b'b' as Label];
        assert_eq!(TokenType::Byte.render(&labels).unwrap(), "ab");
    }

    #[test]
    fn byte_render_rejects_wide_labels() {
        assert_eq!(TokenType::Byte.render(&[300]), Err(TokenError::InvalidLabel(300)));
        assert_eq!(TokenType::Byte.render(&[0xC3]), Err(TokenError::InvalidUtf8));
    }

    #[test]
    fn nul_is_rejected() {
        assert_eq!(TokenType::Byte.compile("a\0"), Err(TokenError::NulCharacter));
        assert_eq!(TokenType::Utf8.compile("\0"), Err(TokenError::NulCharacter));
    }

    #[test]
    fn symbol_compile_and_render() {
        let tt = TokenType::symbols(SymbolTable::from_symbols("arpa", ["K", "AE1", "T"]));
        let labels = tt.compile(" K  AE1 T ").unwrap();
        assert_eq!(labels, vec![1, 2, 3]);
        assert_eq!(tt.render(&labels).unwrap(), "K AE1 T");
        assert_eq!(tt.compile("K Q"), Err(TokenError::UnknownSymbol("Q".to_string())));
        assert_eq!(tt.render(&[9]), Err(TokenError::InvalidLabel(9)));
    }

    #[test]
    fn named_token_types() {
        assert_eq!(TokenType::from_name("byte"), Some(TokenType::Byte));
        assert_eq!(TokenType::from_name("utf8"), Some(TokenType::Utf8));
        assert_eq!(TokenType::from_name("symbol"), None);
    }
}
