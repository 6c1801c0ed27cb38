//! Process-unique identities for runtime types and members.
//!
//! Every type and member registered with the runtime type system receives a [`Token`]. The
//! layout follows the ECMA-335 metadata token: the high byte names the table (see
//! [`TokenKind`]) and the low 24 bits are a row number. Rows are allocated from a
//! process-wide counter per table, so tokens stay unique even across different
//! [`crate::runtime::Module`]s. Receiver checks rely on that uniqueness.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use strum::{Display, EnumIter};

use crate::{Error, Result};

/// Highest row number a token can carry
const MAX_ROW: u32 = 0x00FF_FFFF;

/// The table a [`Token`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[repr(u8)]
pub enum TokenKind {
    /// A type definition
    TypeDef = 0x02,
    /// A field definition
    Field = 0x04,
    /// A method or constructor definition
    MethodDef = 0x06,
    /// A property definition
    Property = 0x17,
}

impl TokenKind {
    fn counter(self) -> &'static AtomicU32 {
        static TYPEDEF: AtomicU32 = AtomicU32::new(1);
        static FIELD: AtomicU32 = AtomicU32::new(1);
        static METHODDEF: AtomicU32 = AtomicU32::new(1);
        static PROPERTY: AtomicU32 = AtomicU32::new(1);

        match self {
            TokenKind::TypeDef => &TYPEDEF,
            TokenKind::Field => &FIELD,
            TokenKind::MethodDef => &METHODDEF,
            TokenKind::Property => &PROPERTY,
        }
    }
}

// Stops at MAX_ROW, so rows are never reused
fn take_row(counter: &AtomicU32) -> Option<u32> {
    let bump = |row: u32| (row <= MAX_ROW).then_some(row + 1);
    counter
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, bump)
        .ok()
}

/// A token identifying one runtime type or member.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Allocates the next free token of the given kind
    ///
    /// # Errors
    /// Returns [`crate::Error::TokenExhausted`] once all rows of the table are taken.
    pub fn next(kind: TokenKind) -> Result<Self> {
        match take_row(kind.counter()) {
            Some(row) => Ok(Token((u32::from(kind as u8) << 24) | row)),
            None => Err(Error::TokenExhausted(kind)),
        }
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & MAX_ROW
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_token_table_and_row() {
        let token = Token(0x06000001);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.row(), 1);

        let token = Token(0x06FFFFFF);
        assert_eq!(token.row(), 0x00FFFFFF);
    }

    #[test]
    fn test_token_next_uses_table_byte() {
        for kind in TokenKind::iter() {
            let token = Token::next(kind).unwrap();
            assert_eq!(token.table(), kind as u8);
            assert!(!token.is_null());
        }
    }

    #[test]
    fn test_token_next_is_unique() {
        let first = Token::next(TokenKind::MethodDef).unwrap();
        let second = Token::next(TokenKind::MethodDef).unwrap();
        assert_ne!(first, second);
        assert!(first < second);
    }

    #[test]
    fn test_rows_do_not_wrap() {
        let counter = AtomicU32::new(MAX_ROW);
        assert_eq!(take_row(&counter), Some(MAX_ROW));
        assert_eq!(take_row(&counter), None);
        assert_eq!(take_row(&counter), None);
        assert_eq!(counter.load(Ordering::Relaxed), MAX_ROW + 1);
    }

    #[test]
    fn test_exhausted_message() {
        let err = Error::TokenExhausted(TokenKind::MethodDef);
        assert_eq!(
            err.to_string(),
            "No free rows left in the MethodDef token table"
        );
    }

    #[test]
    fn test_token_display() {
        assert_eq!(format!("{}", Token(0x02000005)), "0x02000005");
        let debug_str = format!("{:?}", Token(0x06000001));
        assert!(debug_str.contains("table: 0x06"));
        assert!(debug_str.contains("row: 1"));
    }
}
