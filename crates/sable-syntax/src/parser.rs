//! Statement and expression parser.
//!
//! Statements use recursive descent with one token of lookahead; telling a
//! call from a plain identifier takes two, done with a lexer checkpoint.
//! Expressions are parsed by a single iterative shunting-yard loop driven by
//! the operator table in [`Operator::infix`].
//!
//! Grammar:
//!
//! ```text
//! program   := block EOF
//! block     := { vardecl | value }
//! vardecl   := 'var' decl (',' decl)* ';'?
//! decl      := ident ':' type '=' value
//! type      := 'nat' | 'int' | 'bool'
//! value     := 'do' block 'end'
//!            | 'return' value
//!            | 'while' expr body 'end'
//!            | 'if' expr body ('elif' expr body)* ('else' body)? 'end'
//!            | expr ';'?
//! body      := (':' | 'do') block
//! expr      := unary* term (binop unary* term)*
//! term      := number | 'true' | 'false' | 'nil' | '(' expr ')'
//!            | ident | ident '(' [value (',' value)*] ')'
//! ```
//!
//! Grammar violations are recorded in the [`Diagnostics`] context and an
//! `Error` node stands in for whatever was missing. A violation at the end of
//! input cannot be recovered from and is fatal.

use tracing::debug;

use crate::arena::Arena;
use crate::ast::{Ast, NodeId, NodeKind};
use crate::diagnostics::{Diagnostics, Message};
use crate::error::Result;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::vector::Vector;

/// Minimum region size of the expression scratch arenas.
const SCRATCH_REGION: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Assoc {
    #[default]
    Left,
    Right,
}

/// Binding strength of an operator. Lower tiers bind tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Operator {
    tier: u8,
    assoc: Assoc,
    node: NodeKind,
}

impl Operator {
    /// `not`, unary `+` and unary `-`.
    const PREFIX: Operator = Operator {
        tier: 0,
        assoc: Assoc::Right,
        node: NodeKind::Unary,
    };

    fn infix(kind: TokenKind) -> Option<Operator> {
        let (tier, assoc, node) = match kind {
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => (1, Assoc::Left, NodeKind::Binary),
            TokenKind::Plus | TokenKind::Minus => (2, Assoc::Left, NodeKind::Binary),
            TokenKind::Compare => (3, Assoc::Left, NodeKind::Binary),
            TokenKind::And | TokenKind::Or => (4, Assoc::Left, NodeKind::Binary),
            TokenKind::Assign | TokenKind::CompoundAssign => (5, Assoc::Right, NodeKind::Assign),
            _ => return None,
        };
        Some(Operator { tier, assoc, node })
    }

    /// Whether this stacked operator has to be reduced before `incoming` is
    /// pushed.
    fn reduces_before(self, incoming: Operator) -> bool {
        self.tier < incoming.tier || (self.tier == incoming.tier && incoming.assoc == Assoc::Left)
    }
}

/// An operator waiting on the operator stack.
#[derive(Debug, Clone, Copy, Default)]
struct PendingOp<'src> {
    op: Operator,
    token: Token<'src>,
}

/// Backing storage for the value and operator stacks, reused across
/// expressions.
struct ExprScratch<'src> {
    values: Arena<NodeId>,
    operators: Arena<PendingOp<'src>>,
}

impl ExprScratch<'_> {
    fn new() -> Self {
        Self {
            values: Arena::new(SCRATCH_REGION),
            operators: Arena::new(SCRATCH_REGION),
        }
    }

    fn reset(&mut self) {
        self.values.empty();
        self.operators.empty();
    }
}

/// The parser.
pub struct Parser<'a, 'src> {
    lexer: Lexer<'a, 'src>,
    diagnostics: &'a Diagnostics<'src>,
    ast: Ast<'src>,
    /// Taken by the outermost expression in progress.
    scratch: Option<ExprScratch<'src>>,
}

impl<'a, 'src> Parser<'a, 'src> {
    /// Create a parser reporting into the lexer's diagnostics context.
    pub fn new(lexer: Lexer<'a, 'src>) -> Self {
        let diagnostics = lexer.diagnostics();
        Self {
            lexer,
            diagnostics,
            ast: Ast::new(),
            scratch: Some(ExprScratch::new()),
        }
    }

    /// Parse the whole file. The root of the returned tree is a `Block`.
    pub fn parse(mut self) -> Result<Ast<'src>> {
        let file = self.lexer.file();
        debug!(file = file.name(), bytes = file.content().len(), "parse: start");

        let root = self.parse_block(true)?;
        self.ast.set_root(root);

        debug!(
            file = file.name(),
            nodes = self.ast.len(),
            tokens = self.lexer.materialized(),
            errors = self.diagnostics.error_count(),
            "parse: done"
        );
        Ok(self.ast)
    }

    // =========================================================================
    // Token Handling
    // =========================================================================

    fn peek(&mut self) -> Result<Token<'src>> {
        self.lexer.peek()
    }

    fn advance(&mut self) -> Result<Token<'src>> {
        self.lexer.next()
    }

    fn check(&mut self, kind: TokenKind) -> Result<bool> {
        Ok(self.peek()?.kind == kind)
    }

    /// Consume a token if it matches, returning true if consumed.
    fn eat(&mut self, kind: TokenKind) -> Result<bool> {
        let matched = self.check(kind)?;
        if matched {
            self.advance()?;
        }
        Ok(matched)
    }

    /// Consume a token of `kind`, or report it missing and leave the stream
    /// where it is.
    fn expect(&mut self, kind: TokenKind) -> Result<Option<Token<'src>>> {
        let token = self.peek()?;
        if token.kind == kind {
            self.advance()?;
            return Ok(Some(token));
        }
        self.report(token, Message::ExpectedToken(kind))?;
        Ok(None)
    }

    /// Report a problem at `token`. Fatal when `token` is the end of input.
    fn report(&self, token: Token<'src>, message: Message) -> Result<()> {
        self.diagnostics
            .report(token.span, message, token.kind == TokenKind::Eof)
    }

    /// Report a problem at `token` and build the placeholder for it.
    fn error_node(&mut self, token: Token<'src>, message: Message) -> Result<NodeId> {
        self.report(token, message)?;
        self.ast.pair_node(NodeKind::Error, token.text, token.span)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Parse statements until `end`, `elif`, `else` or end of input.
    ///
    /// At top level those keywords have nothing to close, so they are
    /// reported and skipped instead.
    fn parse_block(&mut self, top_level: bool) -> Result<NodeId> {
        let first = self.peek()?;
        let mut block = self.ast.list_node(4, NodeKind::Block, "", first.span)?;

        loop {
            let token = self.peek()?;
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::End | TokenKind::Elif | TokenKind::Else if !top_level => break,
                TokenKind::End | TokenKind::Elif | TokenKind::Else => {
                    self.report(token, Message::Expected("a statement or expression"))?;
                    self.advance()?;
                    continue;
                }
                _ => {}
            }

            let before = self.lexer.checkpoint();
            let item = if token.kind == TokenKind::Var {
                self.parse_var_list()?
            } else {
                self.parse_value()?
            };
            block = self.ast.list_add(block, item)?;

            // The offending token was already reported; step over it.
            if self.lexer.checkpoint() == before {
                self.advance()?;
            }
        }
        Ok(block)
    }

    /// A statement, or an expression with an optional trailing `;`.
    fn parse_value(&mut self) -> Result<NodeId> {
        self.parse_value_with(true)
    }

    /// A call argument: like a value, but a `;` is left for the caller.
    fn parse_argument(&mut self) -> Result<NodeId> {
        self.parse_value_with(false)
    }

    fn parse_value_with(&mut self, semicolon: bool) -> Result<NodeId> {
        match self.peek()?.kind {
            TokenKind::Do => self.parse_do_block(),
            TokenKind::Return => self.parse_return(),
            TokenKind::While => self.parse_while(),
            TokenKind::If => self.parse_if(),
            _ => {
                let expr = self.parse_expr()?;
                if semicolon {
                    self.eat(TokenKind::Semicolon)?;
                }
                Ok(expr)
            }
        }
    }

    fn parse_do_block(&mut self) -> Result<NodeId> {
        self.advance()?; // do
        let block = self.parse_block(false)?;
        self.expect(TokenKind::End)?;
        Ok(block)
    }

    fn parse_return(&mut self) -> Result<NodeId> {
        let keyword = self.advance()?;
        let node = self.ast.pair_node(NodeKind::Return, keyword.text, keyword.span)?;
        let value = self.parse_value()?;
        self.ast.set_left(node, value);
        Ok(node)
    }

    fn parse_while(&mut self) -> Result<NodeId> {
        let keyword = self.advance()?;
        let node = self.ast.pair_node(NodeKind::While, keyword.text, keyword.span)?;
        let condition = self.parse_expr()?;
        self.ast.set_left(node, condition);
        let body = self.parse_body()?;
        self.ast.set_right(node, body);
        self.expect(TokenKind::End)?;
        Ok(node)
    }

    fn parse_if(&mut self) -> Result<NodeId> {
        let keyword = self.advance()?;
        let mut node = self.ast.list_node(2, NodeKind::If, keyword.text, keyword.span)?;

        let branch = self.parse_branch(keyword, true)?;
        node = self.ast.list_add(node, branch)?;

        loop {
            let token = self.peek()?;
            let has_condition = match token.kind {
                TokenKind::Elif => true,
                TokenKind::Else => false,
                _ => break,
            };
            self.advance()?;
            let branch = self.parse_branch(token, has_condition)?;
            node = self.ast.list_add(node, branch)?;
            if !has_condition {
                break;
            }
        }

        self.expect(TokenKind::End)?;
        Ok(node)
    }

    fn parse_branch(&mut self, keyword: Token<'src>, has_condition: bool) -> Result<NodeId> {
        let branch = self.ast.pair_node(NodeKind::Branch, keyword.text, keyword.span)?;
        if has_condition {
            let condition = self.parse_expr()?;
            self.ast.set_left(branch, condition);
        }
        let body = self.parse_body()?;
        self.ast.set_right(branch, body);
        Ok(branch)
    }

    /// `:` or `do`, then a block.
    fn parse_body(&mut self) -> Result<NodeId> {
        let token = self.peek()?;
        if matches!(token.kind, TokenKind::Colon | TokenKind::Do) {
            self.advance()?;
        } else {
            self.report(token, Message::Expected("':' or inline block"))?;
        }
        self.parse_block(false)
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_var_list(&mut self) -> Result<NodeId> {
        let keyword = self.advance()?;
        let mut list = self.ast.list_node(2, NodeKind::VarList, keyword.text, keyword.span)?;
        loop {
            let decl = self.parse_decl()?;
            list = self.ast.list_add(list, decl)?;
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        self.eat(TokenKind::Semicolon)?;
        Ok(list)
    }

    /// `name : type = value`
    fn parse_decl(&mut self) -> Result<NodeId> {
        let name = self.peek()?;
        if name.kind != TokenKind::Ident {
            return self.error_node(name, Message::ExpectedToken(TokenKind::Ident));
        }
        self.advance()?;

        let var = self.ast.pair_node(NodeKind::Var, name.text, name.span)?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type()?;
        self.ast.set_left(var, ty);
        self.expect(TokenKind::Assign)?;
        let value = self.parse_value()?;
        self.ast.set_right(var, value);
        Ok(var)
    }

    fn parse_type(&mut self) -> Result<NodeId> {
        let token = self.peek()?;
        if token.kind.is_type() {
            self.advance()?;
            return self.ast.pair_node(NodeKind::Type, token.text, token.span);
        }
        let node = self.error_node(token, Message::Expected("a valid type"))?;
        // An unknown type name still takes the type's place.
        if token.kind == TokenKind::Ident {
            self.advance()?;
        }
        Ok(node)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expr(&mut self) -> Result<NodeId> {
        // Nested expressions (parentheses, call arguments) find the slot
        // empty and get their own scratch space.
        let mut scratch = self.scratch.take().unwrap_or_else(ExprScratch::new);
        let result = self.shunting_yard(&scratch);
        scratch.reset();
        self.scratch = Some(scratch);
        result
    }

    fn shunting_yard(&mut self, scratch: &ExprScratch<'src>) -> Result<NodeId> {
        let mut values = Vector::new_in(&scratch.values, 16)?;
        let mut operators = Vector::new_in(&scratch.operators, 16)?;
        let mut expecting = "an expression term";

        loop {
            while let Some(token) = self.eat_prefix()? {
                operators.push(PendingOp {
                    op: Operator::PREFIX,
                    token,
                })?;
            }
            let term = self.parse_term(expecting)?;
            values.push(term)?;

            let token = self.peek()?;
            let Some(op) = Operator::infix(token.kind) else {
                break;
            };
            self.advance()?;

            while let Some(top) = operators.last() {
                if !top.op.reduces_before(op) {
                    break;
                }
                operators.pop();
                self.reduce(&mut values, top)?;
            }
            operators.push(PendingOp { op, token })?;
            expecting = "another expression term";
        }

        while let Some(top) = operators.pop() {
            self.reduce(&mut values, top)?;
        }

        match values.pop() {
            Some(root) if values.is_empty() => Ok(root),
            _ => {
                let token = self.peek()?;
                self.error_node(token, Message::Expected("a well-formed expression"))
            }
        }
    }

    fn eat_prefix(&mut self) -> Result<Option<Token<'src>>> {
        let token = self.peek()?;
        if matches!(token.kind, TokenKind::Not | TokenKind::Plus | TokenKind::Minus) {
            self.advance()?;
            return Ok(Some(token));
        }
        Ok(None)
    }

    /// Pop the operands of `pending`, build its node and push the result.
    fn reduce(&mut self, values: &mut Vector<'_, NodeId>, pending: PendingOp<'src>) -> Result<()> {
        let PendingOp { op, token } = pending;

        let node = if op.node == NodeKind::Unary {
            let operand = self.pop_operand(values, token)?;
            let span = token.span.merge(self.ast.span(operand));
            let node = self.ast.pair_node(op.node, token.text, span)?;
            self.ast.set_left(node, operand);
            node
        } else {
            let right = self.pop_operand(values, token)?;
            let left = self.pop_operand(values, token)?;
            let span = self.ast.span(left).merge(self.ast.span(right));
            let node = self.ast.pair_node(op.node, token.text, span)?;
            self.ast.set_left(node, left);
            self.ast.set_right(node, right);
            node
        };

        values.push(node)?;
        Ok(())
    }

    fn pop_operand(&mut self, values: &mut Vector<'_, NodeId>, operator: Token<'src>) -> Result<NodeId> {
        match values.pop() {
            Some(value) => Ok(value),
            None => self.error_node(operator, Message::Expected("another expression term")),
        }
    }

    fn parse_term(&mut self, expecting: &'static str) -> Result<NodeId> {
        let token = self.peek()?;
        match token.kind {
            TokenKind::Number | TokenKind::True | TokenKind::False | TokenKind::Nil => {
                self.advance()?;
                self.ast.pair_node(NodeKind::Literal, token.text, token.span)
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident => {
                if self.at_call()? {
                    self.parse_call()
                } else {
                    self.advance()?;
                    self.ast.pair_node(NodeKind::Ident, token.text, token.span)
                }
            }
            _ => self.error_node(token, Message::Expected(expecting)),
        }
    }

    /// Whether the identifier at the cursor is followed by `(`.
    fn at_call(&mut self) -> Result<bool> {
        let checkpoint = self.lexer.checkpoint();
        self.advance()?;
        let is_call = self.check(TokenKind::LParen)?;
        self.lexer.backtrack(checkpoint);
        Ok(is_call)
    }

    fn parse_call(&mut self) -> Result<NodeId> {
        let name = self.advance()?;
        self.advance()?; // (
        let mut call = self.ast.list_node(4, NodeKind::Call, name.text, name.span)?;

        if !self.check(TokenKind::RParen)? {
            loop {
                let arg = self.parse_argument()?;
                call = self.ast.list_add(call, arg)?;
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Diagnostic, DiagnosticsConfig};
    use crate::error::Error;
    use crate::source::SourceFile;

    /// Compact rendering of a subtree for assertions.
    fn sexpr(ast: &Ast<'_>, id: NodeId) -> String {
        let node = ast.node(id);
        let children: Vec<NodeId> = if node.kind.is_list() {
            ast.children(id)
        } else {
            ast.left(id).into_iter().chain(ast.right(id)).collect()
        };
        let head = match node.kind {
            NodeKind::Error => "?".to_string(),
            NodeKind::Var | NodeKind::Call => format!("{} {}", node.kind.name(), node.content),
            NodeKind::Ident
            | NodeKind::Literal
            | NodeKind::Type
            | NodeKind::Unary
            | NodeKind::Binary
            | NodeKind::Assign => node.content.to_string(),
            kind => kind.name().to_string(),
        };
        if children.is_empty() && !node.kind.is_list() {
            return head;
        }
        let mut out = format!("({head}");
        for child in children {
            out.push(' ');
            out.push_str(&sexpr(ast, child));
        }
        out.push(')');
        out
    }

    fn parse(source: &str) -> (String, Vec<Diagnostic>) {
        let file = SourceFile::new("test.sbl", source);
        let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
        let ast = crate::parse(file, &diagnostics).unwrap();
        let root = ast.root().unwrap();
        (sexpr(&ast, root), diagnostics.records())
    }

    fn parse_ok(source: &str) -> String {
        let (tree, records) = parse(source);
        assert!(records.is_empty(), "unexpected diagnostics: {records:?}");
        tree
    }

    fn parse_fatal(source: &str) -> Diagnostic {
        let file = SourceFile::new("test.sbl", source);
        let diagnostics = Diagnostics::buffered(file, DiagnosticsConfig::default());
        match crate::parse(file, &diagnostics) {
            Err(Error::Fatal { diagnostic, .. }) => diagnostic,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected a fatal diagnostic"),
        }
    }

    #[test]
    fn test_precedence() {
        assert_eq!(parse_ok("return 1 + 2 * 3;"), "(block (return (+ 1 (* 2 3))))");
        assert_eq!(parse_ok("1 * 2 + 3"), "(block (+ (* 1 2) 3))");
        assert_eq!(parse_ok("a < b + 1 and c"), "(block (and (< a (+ b 1)) c))");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(parse_ok("a - b - c"), "(block (- (- a b) c))");
        assert_eq!(parse_ok("a / b % c"), "(block (% (/ a b) c))");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(parse_ok("x = y = 1;"), "(block (= x (= y 1)))");
        assert_eq!(parse_ok("x += y -= 2"), "(block (+= x (-= y 2)))");
    }

    #[test]
    fn test_unary_binds_tightest() {
        assert_eq!(parse_ok("-x * y"), "(block (* (- x) y))");
        assert_eq!(parse_ok("not a and b"), "(block (and (not a) b))");
        assert_eq!(parse_ok("x = - - 1"), "(block (= x (- (- 1))))");
    }

    #[test]
    fn test_parentheses() {
        assert_eq!(parse_ok("(1 + 2) * 3"), "(block (* (+ 1 2) 3))");
        assert_eq!(parse_ok("((x))"), "(block x)");
    }

    #[test]
    fn test_calls() {
        assert_eq!(parse_ok("f()"), "(block (call f))");
        assert_eq!(parse_ok("f(1, g(x), y + 1)"), "(block (call f 1 (call g x) (+ y 1)))");
        assert_eq!(parse_ok("f"), "(block f)");
    }

    #[test]
    fn test_call_argument_does_not_take_semicolon() {
        let (tree, records) = parse("f(a;)");
        assert_eq!(tree, "(block (call f a) ?)");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, Message::ExpectedToken(TokenKind::RParen));
        assert_eq!(records[0].column, 4);
        assert_eq!(records[1].message, Message::Expected("an expression term"));
        assert_eq!(records[1].column, 5);

        let (tree, records) = parse("f(a; b)");
        assert_eq!(tree, "(block (call f a) b ?)");
        assert_eq!(records[0].message, Message::ExpectedToken(TokenKind::RParen));
        assert_eq!(records[0].column, 4);
    }

    #[test]
    fn test_call_with_many_arguments_grows() {
        assert_eq!(
            parse_ok("f(1, 2, 3, 4, 5, 6)"),
            "(block (call f 1 2 3 4 5 6))"
        );
    }

    #[test]
    fn test_var_declarations() {
        assert_eq!(
            parse_ok("var x : int = 1, ok : bool = true;"),
            "(block (var-list (var x int 1) (var ok bool true)))"
        );
    }

    #[test]
    fn test_while() {
        assert_eq!(
            parse_ok("while x < 10 do x += 1; end"),
            "(block (while (< x 10) (block (+= x 1))))"
        );
        assert_eq!(parse_ok("while c: end"), "(block (while c (block)))");
    }

    #[test]
    fn test_if_elif_else() {
        assert_eq!(
            parse_ok("if a: b elif c do d else: e end"),
            "(block (if (branch a (block b)) (branch c (block d)) (branch (block e))))"
        );
    }

    #[test]
    fn test_do_block_and_nested_return() {
        assert_eq!(
            parse_ok("do var n : nat = 0; return n end"),
            "(block (block (var-list (var n nat 0)) (return n)))"
        );
        assert_eq!(parse_ok("return return nil"), "(block (return (return nil)))");
    }

    #[test]
    fn test_missing_term_inserts_placeholder() {
        let (tree, records) = parse("x = (1 + ;");
        assert_eq!(tree, "(block (= x (+ 1 ?)))");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, Message::Expected("another expression term"));
        assert_eq!(records[1].message, Message::ExpectedToken(TokenKind::RParen));
        assert_eq!(records[1].column, 10);
    }

    #[test]
    fn test_unexpected_token_is_skipped() {
        let (tree, records) = parse(") 1");
        assert_eq!(tree, "(block ? 1)");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, Message::Expected("an expression term"));
    }

    #[test]
    fn test_stray_end_at_top_level() {
        let (tree, records) = parse("end x");
        assert_eq!(tree, "(block x)");
        assert_eq!(records[0].message, Message::Expected("a statement or expression"));
    }

    #[test]
    fn test_bad_type() {
        let (tree, records) = parse("var x : string = 1");
        assert_eq!(tree, "(block (var-list (var x ? 1)))");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, Message::Expected("a valid type"));
        assert_eq!(records[0].column, 9);

        let (tree, records) = parse("var x : int 1");
        assert_eq!(tree, "(block (var-list (var x int 1)))");
        assert_eq!(records[0].message, Message::ExpectedToken(TokenKind::Assign));
    }

    #[test]
    fn test_missing_body_separator() {
        let (tree, records) = parse("while x y end");
        assert_eq!(tree, "(block (while x (block y)))");
        assert_eq!(records[0].message, Message::Expected("':' or inline block"));
    }

    #[test]
    fn test_invalid_symbol_inside_expression() {
        let (tree, records) = parse("1 + $ 2");
        assert_eq!(tree, "(block (+ 1 2))");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, Message::InvalidSymbol);
    }

    #[test]
    fn test_missing_end_is_fatal_at_eof() {
        let diagnostic = parse_fatal("if true : return 1;");
        assert_eq!(diagnostic.message, Message::ExpectedToken(TokenKind::End));
        assert_eq!((diagnostic.row, diagnostic.column), (1, 20));
        assert_eq!(diagnostic.length, 0);
    }

    #[test]
    fn test_missing_operand_at_eof_is_fatal() {
        let diagnostic = parse_fatal("x =\n");
        assert_eq!(diagnostic.message, Message::Expected("another expression term"));
        assert_eq!(diagnostic.row, 2);
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(parse_ok(""), "(block)");
        assert_eq!(parse_ok("// only a comment"), "(block)");
    }

    #[test]
    fn test_operator_table() {
        let mul = Operator::infix(TokenKind::Star).unwrap();
        let add = Operator::infix(TokenKind::Plus).unwrap();
        let assign = Operator::infix(TokenKind::Assign).unwrap();
        assert!(mul.reduces_before(add));
        assert!(!add.reduces_before(mul));
        assert!(add.reduces_before(add));
        assert!(!assign.reduces_before(assign));
        assert!(Operator::PREFIX.reduces_before(mul));
        assert_eq!(Operator::infix(TokenKind::Not), None);
    }
}
