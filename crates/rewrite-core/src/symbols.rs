// Symbol table: label-to-string and string-to-label mapping.

use hashbrown::HashMap;

use crate::{EPSILON, Label, TokenError};

/// Symbol string conventionally bound to the epsilon label.
pub const EPSILON_SYMBOL: &str = "<epsilon>";

/// A named, bidirectional mapping between labels and token strings.
///
/// Label 0 is always epsilon. Tables are usually loaded from the two-column
/// text format (`symbol<whitespace>label` per line) or grown with
/// [`add_symbol`](Self::add_symbol), which hands out the next free label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    name: String,
    /// Maps label to its symbol string.
    symbols: HashMap<Label, String>,
    /// Maps symbol string to its label.
    labels: HashMap<String, Label>,
    /// Next label handed out by `add_symbol`.
    available_label: Label,
}

impl SymbolTable {
    /// Create a table holding only epsilon.
    pub fn new(name: impl Into<String>) -> Self {
        let mut table = Self {
            name: name.into(),
            symbols: HashMap::new(),
            labels: HashMap::new(),
            available_label: 0,
        };
        table.add_symbol_with_label(EPSILON_SYMBOL, EPSILON);
        table
    }

    /// Parse the text format: one `symbol label` pair per line, blank lines
    /// ignored. Label 0 must be present or is added as `<epsilon>`.
    pub fn from_text(name: impl Into<String>, text: &str) -> Result<Self, TokenError> {
        let mut table = Self {
            name: name.into(),
            symbols: HashMap::new(),
            labels: HashMap::new(),
            available_label: 0,
        };
        for (lineno, line) in text.lines().enumerate() {
            let mut fields = line.split_whitespace();
            let Some(symbol) = fields.next() else {
                continue;
            };
            let label = fields
                .next()
                .and_then(|f| f.parse::<Label>().ok())
                .ok_or_else(|| {
                    TokenError::InvalidSymbolTable(format!("line {}: expected `symbol label`", lineno + 1))
                })?;
            if fields.next().is_some() {
                return Err(TokenError::InvalidSymbolTable(format!(
                    "line {}: trailing fields",
                    lineno + 1
                )));
            }
            if table.labels.contains_key(symbol) || table.symbols.contains_key(&label) {
                return Err(TokenError::InvalidSymbolTable(format!(
                    "line {}: duplicate entry {symbol} {label}",
                    lineno + 1
                )));
            }
            table.add_symbol_with_label(symbol, label);
        }
        if !table.symbols.contains_key(&EPSILON) {
            if table.labels.contains_key(EPSILON_SYMBOL) {
                return Err(TokenError::InvalidSymbolTable(format!(
                    "{EPSILON_SYMBOL} must have label 0"
                )));
            }
            table.add_symbol_with_label(EPSILON_SYMBOL, EPSILON);
        }
        Ok(table)
    }

    /// Build a table from symbols in order, numbered from 1.
    pub fn from_symbols<'a>(name: impl Into<String>, symbols: impl IntoIterator<Item = &'a str>) -> Self {
        let mut table = Self::new(name);
        for symbol in symbols {
            table.add_symbol(symbol);
        }
        table
    }

    /// Add a symbol, returning its label. Existing symbols keep their label.
    pub fn add_symbol(&mut self, symbol: &str) -> Label {
        if let Some(&label) = self.labels.get(symbol) {
            return label;
        }
        let label = self.available_label;
        self.add_symbol_with_label(symbol, label);
        label
    }

    fn add_symbol_with_label(&mut self, symbol: &str, label: Label) {
        self.symbols.insert(label, symbol.to_string());
        self.labels.insert(symbol.to_string(), label);
        if label >= self.available_label {
            self.available_label = label.saturating_add(1);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn find_label(&self, symbol: &str) -> Option<Label> {
        self.labels.get(symbol).copied()
    }

    pub fn find_symbol(&self, label: Label) -> Option<&str> {
        self.symbols.get(&label).map(String::as_str)
    }

    /// Number of symbols, epsilon included.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Serialize to the text format, ordered by label.
    pub fn to_text(&self) -> String {
        let mut entries: Vec<(&Label, &String)> = self.symbols.iter().collect();
        entries.sort_by_key(|(label, _)| **label);
        let mut out = String::new();
        for (label, symbol) in entries {
            out.push_str(symbol);
            out.push('\t');
            out.push_str(&label.to_string());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_has_epsilon() {
        let table = SymbolTable::new("t");
        assert_eq!(table.len(), 1);
        assert_eq!(table.find_label(EPSILON_SYMBOL), Some(EPSILON));
        assert_eq!(table.find_symbol(EPSILON), Some(EPSILON_SYMBOL));
    }

    #[test]
    fn add_symbol_is_idempotent() {
        let mut table = SymbolTable::new("t");
        let a = table.add_symbol("AA");
        let b = table.add_symbol("B");
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(table.add_symbol("AA"), 1);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn parse_text_format() {
        let text = "<eps>\t0\nK 1\n\nAE1 5\n";
        let table = SymbolTable::from_text("arpabet", text).unwrap();
        assert_eq!(table.find_label("<eps>"), Some(0));
        assert_eq!(table.find_label("AE1"), Some(5));
        assert_eq!(table.find_symbol(1), Some("K"));
        // New symbols continue after the highest label seen.
        let mut table = table;
        assert_eq!(table.add_symbol("T"), 6);
    }

    #[test]
    fn parse_adds_missing_epsilon() {
        let table = SymbolTable::from_text("t", "a 1\nb 2\n").unwrap();
        assert_eq!(table.find_symbol(0), Some(EPSILON_SYMBOL));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn reject_malformed_lines() {
        assert!(SymbolTable::from_text("t", "a\n").is_err());
        assert!(SymbolTable::from_text("t", "a x\n").is_err());
        assert!(SymbolTable::from_text("t", "a 1 2\n").is_err());
        assert!(SymbolTable::from_text("t", "a 1\nb 1\n").is_err());
    }

    #[test]
    fn text_round_trip() {
        let table = SymbolTable::from_symbols("t", ["x", "y"]);
        let again = SymbolTable::from_text("t", &table.to_text()).unwrap();
        assert_eq!(table, again);
    }
}
