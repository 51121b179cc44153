//! Shared building blocks for the WFST rewrite engine.
//!
//! - [`weight`] -- Semiring traits and the tropical weight
//! - [`symbols`] -- Symbol tables mapping labels to token strings
//! - [`token`] -- Token types: how strings are compiled to labels and rendered back

pub mod symbols;
pub mod token;
pub mod weight;

pub use symbols::SymbolTable;
pub use token::TokenType;
pub use weight::{NaturalOrder, Semiring, TropicalWeight};

/// Arc label. Label `0` is reserved for epsilon.
pub type Label = u32;

/// The epsilon label.
pub const EPSILON: Label = 0;

/// Error type for compiling strings to labels and rendering labels to strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("symbol {0:?} not found in symbol table")]
    UnknownSymbol(String),
    #[error("label {0} cannot be rendered by this token type")]
    InvalidLabel(Label),
    #[error("rendered bytes are not valid UTF-8")]
    InvalidUtf8,
    #[error("NUL cannot be compiled: label 0 is reserved for epsilon")]
    NulCharacter,
    #[error("invalid symbol table: {0}")]
    InvalidSymbolTable(String),
}
