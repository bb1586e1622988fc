//! sable-syntax: lexer, parser and diagnostics for the sable language.
//!
//! # Design Principles
//!
//! 1. **Lexing on demand**
//!    - The lexer runs only when the parser asks for a token it has not seen
//!    - Every token is buffered, so the parser can checkpoint and backtrack
//!
//! 2. **Arena-based allocation**
//!    - Tokens, AST nodes and child lists live in region arenas
//!    - Nodes refer to each other through handles, not pointers
//!    - A whole tree is released at once
//!
//! 3. **Keep going after errors**
//!    - Problems are queued in a per-file [`Diagnostics`] context
//!    - A placeholder `Error` node stands in for anything missing
//!    - Only running out of input mid-construct stops the parse
//!
//! # Example
//!
//! ```
//! use sable_syntax::{Diagnostics, DiagnosticsConfig, NodeKind, SourceFile};
//!
//! let file = SourceFile::new("main.sbl", "var x : int = 1 + 2;");
//! let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
//! let ast = sable_syntax::parse(file, &diagnostics)?;
//!
//! let root = ast.root().unwrap();
//! assert_eq!(ast.kind(ast.children(root)[0]), NodeKind::VarList);
//! assert!(!diagnostics.has_errors());
//! # Ok::<(), sable_syntax::Error>(())
//! ```

mod arena;
mod ast;
mod diagnostics;
mod error;
mod lexer;
mod parser;
mod source;
mod span;
mod token;
mod vector;

pub use arena::{Arena, ArenaError, Block};
pub use ast::{Ast, Node, NodeId, NodeKind, Shape};
pub use diagnostics::{Diagnostic, Diagnostics, DiagnosticsConfig, Message};
pub use error::{Error, Result};
pub use lexer::{Checkpoint, Lexer};
pub use parser::Parser;
pub use source::SourceFile;
pub use span::Span;
pub use token::{keyword_from_str, keyword_hash, Token, TokenKind};
pub use vector::Vector;

/// Minimum region size of the token arena used by [`parse`].
const TOKEN_REGION: usize = 1024;

/// Parse a whole file, reporting problems into `diagnostics`.
///
/// Returns the tree even when recoverable problems were found; check
/// [`Diagnostics::has_errors`]. A fatal problem comes back as
/// [`Error::Fatal`] after it has been rendered.
pub fn parse<'src>(file: SourceFile<'src>, diagnostics: &Diagnostics<'src>) -> Result<Ast<'src>> {
    let tokens = Arena::new(TOKEN_REGION);
    let lexer = Lexer::new(file, &tokens, diagnostics)?;
    Parser::new(lexer).parse()
}
