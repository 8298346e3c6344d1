//! Stable identifiers for entries of the symbol graph.
//!
//! Every named type, member and assembly registered with a
//! [`crate::symbols::typesystem::TypeRegistry`] is addressed by a [`Token`]: the high byte
//! names the table the entry lives in, the low 24 bits the 1-based row inside that table.
//! Tokens are assigned in registration order, so comparing two tokens of the same table
//! compares declaration order as well.
//!
//! Walks over the type graph (base chains, interface flattening, override chains) operate on
//! tokens rather than on object pointers. This keeps traversal order deterministic and makes
//! cycle detection a simple set lookup.
//!
//! # Examples
//!
//! ```rust
//! use symscope::symbols::token::{SymbolTable, Token};
//!
//! let token = Token::from_parts(SymbolTable::Method, 7);
//! assert_eq!(token.value(), 0x0600_0007);
//! assert_eq!(token.symbol_table(), Some(SymbolTable::Method));
//! assert_eq!(token.row(), 7);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use strum::{EnumCount, EnumIter};

/// The tables a [`Token`] can point into.
///
/// The discriminants follow the ECMA-335 table numbering for the corresponding concepts so
/// tokens read familiar in debug output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
#[repr(u8)]
pub enum SymbolTable {
    /// Named type definitions (classes, interfaces, structs, enums, delegates)
    TypeDef = 0x02,
    /// Fields
    Field = 0x04,
    /// Methods, including property and event accessors
    Method = 0x06,
    /// Events
    Event = 0x14,
    /// Properties and indexers
    Property = 0x17,
    /// Assemblies taking part in a compilation
    Assembly = 0x20,
}

impl SymbolTable {
    /// Maps a raw table byte back to its [`SymbolTable`], if it names one.
    #[must_use]
    pub fn from_byte(value: u8) -> Option<Self> {
        match value {
            0x02 => Some(SymbolTable::TypeDef),
            0x04 => Some(SymbolTable::Field),
            0x06 => Some(SymbolTable::Method),
            0x14 => Some(SymbolTable::Event),
            0x17 => Some(SymbolTable::Property),
            0x20 => Some(SymbolTable::Assembly),
            _ => None,
        }
    }
}

/// A symbol token, addressing a row inside one of the [`SymbolTable`]s.
///
/// Layout: `[table: 8 bits][row: 24 bits]`. The null token (`0`) never names an entry.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table and a 1-based row.
    #[must_use]
    pub const fn from_parts(table: SymbolTable, row: u32) -> Self {
        Token(((table as u32) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw 32-bit value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Returns the raw table byte (upper 8 bits).
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Returns the table this token points into, if the table byte is known.
    #[must_use]
    pub fn symbol_table(&self) -> Option<SymbolTable> {
        SymbolTable::from_byte(self.table())
    }

    /// Returns the row (lower 24 bits).
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns `true` for the null token.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if this token names a type definition.
    #[must_use]
    pub fn is_type(&self) -> bool {
        self.table() == SymbolTable::TypeDef as u8
    }

    /// Returns `true` if this token names a method.
    #[must_use]
    pub fn is_method(&self) -> bool {
        self.table() == SymbolTable::Method as u8
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
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

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
