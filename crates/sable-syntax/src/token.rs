//! Token types and keyword classification.

use crate::span::Span;

/// A token: its kind, the source text it covers and where that text is.
///
/// The text borrows from the source buffer; tokens never own or copy text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
}

impl<'src> Token<'src> {
    /// Create a new token.
    #[inline]
    pub const fn new(kind: TokenKind, text: &'src str, span: Span) -> Self {
        Self { kind, text, span }
    }
}

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenKind {
    // === Punctuation ===
    LParen,
    RParen,
    Comma,
    Colon,
    Semicolon,

    // === Operators ===
    /// `=`
    Assign,
    /// `+=` `-=` `*=` `/=` `%=`
    CompoundAssign,
    /// `==` `<>` `<` `<=` `>` `>=`
    Compare,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // === Keywords ===
    Do,
    End,
    Var,
    Return,
    If,
    Elif,
    Else,
    While,
    And,
    Or,
    Not,
    True,
    False,
    Nil,

    // Type names
    Nat,
    Int,
    Bool,

    // === Other ===
    Ident,
    /// Any run of identifier characters starting with a digit.
    Number,
    #[default]
    Eof,
}

impl TokenKind {
    /// Check if this token is a keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::Do
                | Self::End
                | Self::Var
                | Self::Return
                | Self::If
                | Self::Elif
                | Self::Else
                | Self::While
                | Self::And
                | Self::Or
                | Self::Not
                | Self::True
                | Self::False
                | Self::Nil
                | Self::Nat
                | Self::Int
                | Self::Bool
        )
    }

    /// Check if this token names a type.
    pub fn is_type(&self) -> bool {
        matches!(self, Self::Nat | Self::Int | Self::Bool)
    }

    /// How the token is named in "expected ..." messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Comma => "','",
            Self::Colon => "':'",
            Self::Semicolon => "';'",
            Self::Assign => "'='",
            Self::CompoundAssign => "compound assignment",
            Self::Compare => "comparison",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::Percent => "'%'",
            Self::Do => "'do'",
            Self::End => "'end'",
            Self::Var => "'var'",
            Self::Return => "'return'",
            Self::If => "'if'",
            Self::Elif => "'elif'",
            Self::Else => "'else'",
            Self::While => "'while'",
            Self::And => "'and'",
            Self::Or => "'or'",
            Self::Not => "'not'",
            Self::True => "'true'",
            Self::False => "'false'",
            Self::Nil => "'nil'",
            Self::Nat => "'nat'",
            Self::Int => "'int'",
            Self::Bool => "'bool'",
            Self::Ident => "identifier",
            Self::Number => "number",
            Self::Eof => "end of file",
        }
    }
}

// === Keyword perfect hash ===
//
// Every keyword hashes to its own slot of a 32-entry table under
// `h = SBOX[h ^ byte]` (starting from zero), keeping the low five bits.

const SBOX: [u8; 256] = [
    0xeb, 0xce, 0x84, 0xe9, 0x3b, 0x49, 0x2a, 0x4e, 0x76, 0x9e, 0xaa, 0xf2, 0xfa, 0xa0, 0x74, 0xf0,
    0x21, 0x3c, 0xb9, 0xd3, 0x24, 0x67, 0xfc, 0xae, 0xa2, 0x69, 0x2f, 0xe1, 0xbc, 0x7b, 0xb2, 0x77,
    0xcd, 0x3e, 0x70, 0xf6, 0xde, 0x7f, 0x7c, 0xb5, 0x65, 0x63, 0x85, 0x8b, 0xc6, 0x0d, 0x15, 0xff,
    0xa4, 0x79, 0xa9, 0x38, 0x7a, 0x10, 0x88, 0x61, 0xb1, 0x39, 0xe8, 0xbe, 0x8d, 0xbb, 0x5a, 0xe4,
    0xcc, 0x3f, 0xb7, 0x04, 0xc8, 0x34, 0x44, 0xe5, 0x9b, 0xaf, 0x81, 0x4f, 0xc7, 0xc4, 0xd1, 0xc3,
    0x1a, 0x9a, 0x31, 0x37, 0x56, 0x90, 0x1d, 0x55, 0x53, 0x41, 0x09, 0xba, 0x48, 0x2b, 0x54, 0x26,
    0x9f, 0x82, 0x6b, 0x40, 0x08, 0xbf, 0xfd, 0xd8, 0x95, 0x89, 0xd6, 0xa3, 0xb4, 0x92, 0x42, 0x35,
    0x64, 0xb3, 0x20, 0xe0, 0x73, 0xf5, 0x12, 0x59, 0xdd, 0x96, 0x25, 0x68, 0xc1, 0x03, 0x28, 0x80,
    0x5b, 0x36, 0x19, 0xf4, 0xd5, 0x83, 0x6d, 0x29, 0xac, 0x6e, 0xf9, 0x66, 0x16, 0x7e, 0xc5, 0x99,
    0x0c, 0xf7, 0x62, 0xf1, 0x1f, 0xd4, 0x71, 0x9d, 0xe6, 0x0a, 0x32, 0x3a, 0x2c, 0x0f, 0x45, 0xb6,
    0x33, 0x50, 0x8c, 0xca, 0x8e, 0x87, 0xbd, 0xdf, 0x8a, 0xee, 0x91, 0x43, 0x75, 0x4b, 0xfb, 0x06,
    0xea, 0x02, 0x6c, 0x7d, 0xd9, 0xec, 0xd7, 0x1b, 0x4c, 0xdb, 0x93, 0x3d, 0xc2, 0xa8, 0x9c, 0x23,
    0xc0, 0x00, 0xef, 0x4a, 0x97, 0xc9, 0x18, 0x2e, 0x60, 0x27, 0x52, 0x30, 0x78, 0x5e, 0x11, 0xab,
    0xe3, 0x17, 0x1e, 0x58, 0xfe, 0x22, 0xa7, 0xa6, 0x46, 0xed, 0x5c, 0xa1, 0x1c, 0xd0, 0x98, 0xad,
    0xa5, 0x13, 0x51, 0x6a, 0xf8, 0x94, 0xe2, 0xd2, 0x01, 0x47, 0x05, 0x5d, 0x2d, 0x4d, 0x0e, 0x0b,
    0xe7, 0xdc, 0xb0, 0x8f, 0x6f, 0xda, 0x14, 0xf3, 0xb8, 0x07, 0x72, 0x57, 0xcf, 0xcb, 0x86, 0x5f,
];

const KEYWORD_SLOTS: usize = 32;

const KEYWORDS: [Option<(&str, TokenKind)>; KEYWORD_SLOTS] = [
    Some(("end", TokenKind::End)),
    None,
    Some(("var", TokenKind::Var)),
    None,
    Some(("false", TokenKind::False)),
    Some(("or", TokenKind::Or)),
    None,
    None,
    Some(("bool", TokenKind::Bool)),
    None,
    None,
    Some(("if", TokenKind::If)),
    None,
    None,
    Some(("else", TokenKind::Else)),
    Some(("and", TokenKind::And)),
    Some(("while", TokenKind::While)),
    None,
    Some(("nil", TokenKind::Nil)),
    Some(("true", TokenKind::True)),
    None,
    None,
    Some(("not", TokenKind::Not)),
    Some(("elif", TokenKind::Elif)),
    Some(("do", TokenKind::Do)),
    Some(("nat", TokenKind::Nat)),
    None,
    Some(("return", TokenKind::Return)),
    None,
    Some(("int", TokenKind::Int)),
    None,
    None,
];

/// Fold one byte into a running keyword hash.
#[inline]
pub(crate) const fn hash_step(hash: u8, byte: u8) -> u8 {
    SBOX[(hash ^ byte) as usize]
}

/// Keyword hash of a whole word.
pub fn keyword_hash(word: &str) -> u8 {
    word.bytes().fold(0, hash_step)
}

/// Classify a word whose hash was computed while scanning it.
pub(crate) fn classify_word(hash: u8, word: &str) -> TokenKind {
    match KEYWORDS[hash as usize & (KEYWORD_SLOTS - 1)] {
        Some((keyword, kind)) if keyword == word => kind,
        _ => TokenKind::Ident,
    }
}

/// Look up a keyword by its text.
pub fn keyword_from_str(word: &str) -> Option<TokenKind> {
    match classify_word(keyword_hash(word), word) {
        TokenKind::Ident => None,
        kind => Some(kind),
    }
}
