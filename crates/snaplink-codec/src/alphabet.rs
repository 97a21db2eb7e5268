use sha2::{Digest, Sha256};
use std::fmt::Display;

/// Number of symbols in an alphabet, i.e. the numeral base.
pub const BASE: usize = 62;

/// The default symbol ordering: lowercase, digits, uppercase.
pub const DEFAULT_ALPHABET: &[u8; BASE] =
    b"abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

const NO_DIGIT: u8 = u8::MAX;

/// An ordered set of 62 distinct ASCII symbols.
///
/// The position of a symbol is its digit value. Every alphabet holds the same
/// symbols as [`DEFAULT_ALPHABET`]; keyed alphabets only reorder them.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: [u8; BASE],
    digits: [u8; 128],
}

impl Alphabet {
    /// Returns the alphabet permuted by `secret_key`.
    ///
    /// Each symbol is ranked by the hex character at the same position of the
    /// key's SHA-256 digest (64 hex characters, one per symbol with room to
    /// spare). Symbols are sorted by rank descending, ties by symbol ascending.
    /// This obscures the mapping from sequential ids to codes; it is not
    /// encryption.
    pub fn keyed(secret_key: impl AsRef<[u8]>) -> Self {
        let digest = hex::encode(Sha256::digest(secret_key.as_ref()));

        let mut ranked: Vec<(u8, u8)> = digest
            .bytes()
            .zip(DEFAULT_ALPHABET.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let mut symbols = [0u8; BASE];
        for (slot, (_, symbol)) in symbols.iter_mut().zip(ranked) {
            *slot = symbol;
        }
        Self::from_symbols(symbols)
    }

    /// Returns the keyed alphabet when a key is given, the default otherwise.
    pub fn from_secret_key(secret_key: Option<&str>) -> Self {
        match secret_key {
            Some(key) => Self::keyed(key),
            None => Self::default(),
        }
    }

    fn from_symbols(symbols: [u8; BASE]) -> Self {
        let mut digits = [NO_DIGIT; 128];
        for (digit, &symbol) in symbols.iter().enumerate() {
            digits[usize::from(symbol)] = digit as u8;
        }
        Self { symbols, digits }
    }

    /// Returns the symbol for a digit in `0..BASE`.
    pub fn symbol(&self, digit: usize) -> char {
        char::from(self.symbols[digit])
    }

    /// Returns the digit value of a symbol, or `None` if it is not part of
    /// the alphabet.
    pub fn digit(&self, symbol: char) -> Option<u8> {
        if !symbol.is_ascii() {
            return None;
        }
        match self.digits[symbol as usize] {
            NO_DIGIT => None,
            digit => Some(digit),
        }
    }

    /// Returns the symbols in digit order.
    pub fn symbols(&self) -> &[u8; BASE] {
        &self.symbols
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::from_symbols(*DEFAULT_ALPHABET)
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.symbols
            .iter()
            .try_for_each(|&symbol| write!(f, "{}", char::from(symbol)))
    }
}

impl std::fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Alphabet").field(&self.to_string()).finish()
    }
}
