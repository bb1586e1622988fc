//! Lexer (tokenizer).
//!
//! Tokens are produced on demand: the scanner only runs when the parser asks
//! for a token past the end of what has been scanned so far. Every token is
//! kept in an arena-backed buffer, so the parser can take a [`Checkpoint`],
//! read ahead, and [`backtrack`](Lexer::backtrack) without rescanning.

use tracing::trace;

use crate::arena::Arena;
use crate::diagnostics::{Diagnostics, Message};
use crate::error::Result;
use crate::source::SourceFile;
use crate::span::Span;
use crate::token::{classify_word, hash_step, Token, TokenKind};
use crate::vector::Vector;

/// Initial capacity of the token buffer.
const TOKEN_BUFFER_CAPACITY: usize = 64;

/// A saved read position in the token buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

/// Buffered, backtrackable token stream over one source file.
pub struct Lexer<'a, 'src> {
    file: SourceFile<'src>,
    scanner: Scanner<'src>,
    tokens: Vector<'a, Token<'src>>,
    /// Index of the token `next` returns.
    cursor: usize,
    diagnostics: &'a Diagnostics<'src>,
}

impl<'a, 'src> Lexer<'a, 'src> {
    /// Create a lexer whose token buffer lives in `arena`.
    pub fn new(
        file: SourceFile<'src>,
        arena: &'a Arena<Token<'src>>,
        diagnostics: &'a Diagnostics<'src>,
    ) -> Result<Self> {
        Ok(Self {
            file,
            scanner: Scanner::new(file.content()),
            tokens: Vector::new_in(arena, TOKEN_BUFFER_CAPACITY)?,
            cursor: 0,
            diagnostics,
        })
    }

    /// Return the token at the cursor and advance past it.
    ///
    /// Once the end of input is reached, every call returns the EOF token.
    pub fn next(&mut self) -> Result<Token<'src>> {
        let token = self.peek()?;
        if token.kind != TokenKind::Eof {
            self.cursor += 1;
        }
        Ok(token)
    }

    /// Return the token `next` would return, without advancing.
    pub fn peek(&mut self) -> Result<Token<'src>> {
        if self.cursor == self.tokens.len() {
            let token = self.scan()?;
            self.tokens.push(token)?;
        }
        Ok(self.tokens.peek(self.cursor))
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.cursor)
    }

    /// Rewind to a checkpoint. Tokens up to the frontier are replayed from
    /// the buffer.
    pub fn backtrack(&mut self, checkpoint: Checkpoint) {
        debug_assert!(checkpoint.0 <= self.tokens.len());
        self.cursor = checkpoint.0;
    }

    pub fn source(&self) -> &'src str {
        self.file.content()
    }

    pub fn file(&self) -> SourceFile<'src> {
        self.file
    }

    pub fn diagnostics(&self) -> &'a Diagnostics<'src> {
        self.diagnostics
    }

    /// Number of tokens the scanner has produced so far.
    pub fn materialized(&self) -> usize {
        self.tokens.len()
    }

    /// Scan the next valid token, reporting invalid symbols on the way.
    fn scan(&mut self) -> Result<Token<'src>> {
        loop {
            match self.scanner.next_token() {
                Ok(token) => {
                    trace!(kind = ?token.kind, text = token.text, "lexer: token");
                    return Ok(token);
                }
                Err(span) => self.diagnostics.report(span, Message::InvalidSymbol, false)?,
            }
        }
    }
}

/// Byte-level scanner. Produces a token or the span of an invalid character.
struct Scanner<'src> {
    source: &'src str,
    bytes: &'src [u8],
    /// Current byte position.
    pos: usize,
    /// Start position of the current token.
    token_start: usize,
}

impl<'src> Scanner<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            token_start: 0,
        }
    }

    fn next_token(&mut self) -> std::result::Result<Token<'src>, Span> {
        self.skip_whitespace_and_comments();
        self.token_start = self.pos;

        if self.is_eof() {
            return Ok(self.make_token(TokenKind::Eof));
        }

        let kind = match self.current() {
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_word(),
            b'0'..=b'9' => self.scan_number(),

            b'(' => { self.advance(); TokenKind::LParen }
            b')' => { self.advance(); TokenKind::RParen }
            b',' => { self.advance(); TokenKind::Comma }
            b':' => { self.advance(); TokenKind::Colon }
            b';' => { self.advance(); TokenKind::Semicolon }

            b'=' => self.scan_equals(),
            b'+' => self.scan_arithmetic(TokenKind::Plus),
            b'-' => self.scan_arithmetic(TokenKind::Minus),
            b'*' => self.scan_arithmetic(TokenKind::Star),
            b'/' => self.scan_arithmetic(TokenKind::Slash),
            b'%' => self.scan_arithmetic(TokenKind::Percent),
            b'<' => self.scan_less_than(),
            b'>' => self.scan_greater_than(),

            _ => {
                self.skip_char();
                return Err(Span::from_offsets(self.token_start, self.pos));
            }
        };

        Ok(self.make_token(kind))
    }

    // === Helper methods ===

    fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn current(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn peek_char(&self) -> u8 {
        self.bytes.get(self.pos + 1).copied().unwrap_or(0)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Step over one whole UTF-8 character.
    fn skip_char(&mut self) {
        let width = self.source[self.pos..].chars().next().map_or(1, char::len_utf8);
        self.pos += width;
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        Token::new(
            kind,
            &self.source[self.token_start..self.pos],
            Span::from_offsets(self.token_start, self.pos),
        )
    }

    // === Whitespace and comments ===

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.current() {
                b' ' | b'\t' | b'\r' | b'\n' => self.advance(),
                b'/' if self.peek_char() == b'/' => self.skip_line_comment(),
                b'/' if self.peek_char() == b'*' => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        self.pos += 2;
        while !self.is_eof() && self.current() != b'\n' {
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while !self.is_eof() {
            if self.current() == b'*' && self.peek_char() == b'/' {
                self.pos += 2;
                return;
            }
            self.advance();
        }
        // Unterminated: the comment runs to the end of input.
    }

    // === Token scanning ===

    fn scan_word(&mut self) -> TokenKind {
        let mut hash = 0;
        while is_word_byte(self.current()) {
            hash = hash_step(hash, self.current());
            self.advance();
        }
        classify_word(hash, &self.source[self.token_start..self.pos])
    }

    fn scan_number(&mut self) -> TokenKind {
        while is_word_byte(self.current()) {
            self.advance();
        }
        TokenKind::Number
    }

    fn scan_equals(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.advance();
            TokenKind::Compare
        } else {
            TokenKind::Assign
        }
    }

    /// `+ - * / %`, or their compound assignment when followed by `=`.
    fn scan_arithmetic(&mut self, plain: TokenKind) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.advance();
            TokenKind::CompoundAssign
        } else {
            plain
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        self.advance();
        if matches!(self.current(), b'=' | b'>') {
            self.advance();
        }
        TokenKind::Compare
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        self.advance();
        if self.current() == b'=' {
            self.advance();
        }
        TokenKind::Compare
    }
}

fn is_word_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticsConfig;
    use TokenKind::*;

    fn tokenize(source: &str) -> Vec<(TokenKind, String)> {
        let file = SourceFile::new("test.sbl", source);
        let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
        let arena = Arena::new(16);
        let mut lexer = Lexer::new(file, &arena, &diagnostics).unwrap();
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next().unwrap();
            tokens.push((token.kind, token.text.to_string()));
            if token.kind == Eof {
                break;
            }
        }
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|(kind, _)| kind).collect()
    }

    #[test]
    fn test_declaration() {
        assert_eq!(
            tokenize("var x : int = 1 + 2;"),
            vec![
                (Var, "var".into()),
                (Ident, "x".into()),
                (Colon, ":".into()),
                (Int, "int".into()),
                (Assign, "=".into()),
                (Number, "1".into()),
                (Plus, "+".into()),
                (Number, "2".into()),
                (Semicolon, ";".into()),
                (Eof, String::new()),
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(tokenize("// c\n42"), vec![(Number, "42".into()), (Eof, String::new())]);
        assert_eq!(kinds("a /* b \n c */ d"), vec![Ident, Ident, Eof]);
        assert_eq!(kinds("a /* never closed"), vec![Ident, Eof]);
    }

    #[test]
    fn test_comparison() {
        assert_eq!(
            tokenize("x==y"),
            vec![
                (Ident, "x".into()),
                (Compare, "==".into()),
                (Ident, "y".into()),
                (Eof, String::new()),
            ]
        );
        assert_eq!(kinds("< <= <> > >="), vec![Compare, Compare, Compare, Compare, Compare, Eof]);
    }

    #[test]
    fn test_maximal_munch() {
        assert_eq!(
            kinds("= += -= *= /= %= + - * / %"),
            vec![
                Assign,
                CompoundAssign,
                CompoundAssign,
                CompoundAssign,
                CompoundAssign,
                CompoundAssign,
                Plus,
                Minus,
                Star,
                Slash,
                Percent,
                Eof,
            ]
        );
    }

    #[test]
    fn test_numbers_are_not_validated() {
        assert_eq!(tokenize("1a2 7"), vec![
            (Number, "1a2".into()),
            (Number, "7".into()),
            (Eof, String::new()),
        ]);
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("do end while whiles nat natural not_ true false nil"),
            vec![Do, End, While, Ident, Nat, Ident, Ident, True, False, Nil, Eof]
        );
    }

    #[test]
    fn test_invalid_symbols_are_reported_and_skipped() {
        let file = SourceFile::new("bad.sbl", "a $ é b");
        let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
        let arena = Arena::new(16);
        let mut lexer = Lexer::new(file, &arena, &diagnostics).unwrap();

        assert_eq!(lexer.next().unwrap().text, "a");
        assert_eq!(lexer.next().unwrap().text, "b");
        assert_eq!(lexer.next().unwrap().kind, Eof);

        let records = diagnostics.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].column, 3);
        assert_eq!(records[1].column, 5);
        assert_eq!(records[1].length, 2);
        assert!(records.iter().all(|r| r.message == Message::InvalidSymbol));
    }

    #[test]
    fn test_eof_repeats() {
        let file = SourceFile::new("e.sbl", "  ");
        let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
        let arena = Arena::new(4);
        let mut lexer = Lexer::new(file, &arena, &diagnostics).unwrap();
        for _ in 0..3 {
            let token = lexer.next().unwrap();
            assert_eq!(token.kind, Eof);
            assert_eq!(token.span, Span::empty(2));
        }
        assert_eq!(lexer.materialized(), 1);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let file = SourceFile::new("p.sbl", "a b");
        let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
        let arena = Arena::new(4);
        let mut lexer = Lexer::new(file, &arena, &diagnostics).unwrap();
        assert_eq!(lexer.peek().unwrap().text, "a");
        assert_eq!(lexer.peek().unwrap().text, "a");
        assert_eq!(lexer.next().unwrap().text, "a");
        assert_eq!(lexer.peek().unwrap().text, "b");
    }

    #[test]
    fn test_backtrack_replays_from_buffer() {
        let file = SourceFile::new("b.sbl", "f(x, y) + 1");
        let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
        let arena = Arena::new(4);
        let mut lexer = Lexer::new(file, &arena, &diagnostics).unwrap();

        let checkpoint = lexer.checkpoint();
        let first: Vec<Token<'_>> = (0..6).map(|_| lexer.next().unwrap()).collect();
        assert_eq!(lexer.materialized(), 6);

        lexer.backtrack(checkpoint);
        let replay: Vec<Token<'_>> = (0..6).map(|_| lexer.next().unwrap()).collect();
        assert_eq!(first, replay);
        assert_eq!(lexer.materialized(), 6);

        assert_eq!(lexer.next().unwrap().kind, Plus);
        assert_eq!(lexer.materialized(), 7);
    }

    #[test]
    fn test_source_is_exposed() {
        let file = SourceFile::new("s.sbl", "x");
        let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
        let arena = Arena::new(4);
        let lexer = Lexer::new(file, &arena, &diagnostics).unwrap();
        assert_eq!(lexer.source(), "x");
    }
}
