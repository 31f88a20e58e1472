//! adderc-par - Parser and AST builder for the Adder language.
//!
//! Consumes the finalized token stream from `adderc-lex` and builds the
//! typed operator tree defined in [`ast`]. The grammar actions double as
//! the semantic pass: every reduction that introduces, uses or removes a
//! name calls into the [`Checker`] from `adderc-sem`, so var_declare vs
//! assign, undefined-name diagnostics and the `break`/`continue`/`pass`/
//! `return` context checks all happen during the parse.
//!
//! The expression grammar is precedence climbing over the fixed ladder
//! (or < and < not < comparisons < `|` < `^` < `&` < shifts < additive <
//! multiplicative < power, with power right-associative); assignment
//! forms are statement productions and nest to the right. The contract
//! is on the AST shape, not the parsing mechanism.
//!
//! There is no error recovery: the first parse or semantic error aborts
//! and is handed back to the caller.

pub mod ast;
mod expr;
mod items;
mod stmt;
mod types;

#[cfg(test)]
mod edge_cases;

use adderc_lex::{Token, TokenKind};
use adderc_sem::Checker;
use adderc_util::{Category, CompileError, Handler, Symbol};

use ast::{Node, Operand, Operator, OperatorNode};

/// Recursive-descent parser over a finalized token vector.
pub struct Parser<'a> {
    /// Finalized token stream (START ... END).
    tokens: Vec<Token>,

    /// Current position in the token stream.
    position: usize,

    /// Error sink shared by all phases.
    handler: &'a Handler,

    /// Semantic state driven by the grammar actions.
    checker: Checker<'a>,
}

impl<'a> Parser<'a> {
    /// Creates a parser over a finalized token stream.
    pub fn new(tokens: Vec<Token>, handler: &'a Handler) -> Self {
        Self {
            tokens,
            position: 0,
            handler,
            checker: Checker::new(handler),
        }
    }

    /// Parses the whole stream into top-level statements.
    ///
    /// Fails on the first lexical leftover, grammar rejection or semantic
    /// violation; unresolved callees and base classes become fatal here,
    /// at end of input.
    pub fn parse(&mut self) -> Result<Vec<Node>, CompileError> {
        self.expect(TokenKind::StartToken)?;
        let statements = self.statement_list(TokenKind::EndToken)?;
        let end_line = self.line();
        self.expect(TokenKind::EndToken)?;
        self.checker.finish(end_line)?;
        Ok(statements)
    }

    /// The semantic state accumulated by the last parse.
    pub fn checker(&self) -> &Checker<'a> {
        &self.checker
    }

    // ========================= statement groups =========================

    /// Parses statements until `end` shows up (not consumed).
    ///
    /// Statements are separated by NEWLINE; a statement may also end
    /// directly at a DEDENT (the indentation processor plants DEDENT
    /// before the closing newline) or at the group end.
    pub(crate) fn statement_list(&mut self, end: TokenKind) -> Result<Vec<Node>, CompileError> {
        let mut statements = Vec::new();
        loop {
            while self.match_kind(TokenKind::Newline) {}
            if self.check(end) {
                break;
            }

            statements.push(self.parse_statement()?);

            if !self.match_kind(TokenKind::Newline) && !self.check(end) {
                return Err(self.error(format!(
                    "expected end of statement, found {:?}",
                    self.current_kind()
                )));
            }
        }
        Ok(statements)
    }

    /// Parses a suite: `: NEWLINE INDENT statements DEDENT`.
    pub(crate) fn parse_suite(&mut self) -> Result<Vec<Node>, CompileError> {
        self.expect(TokenKind::Colon)?;
        self.expect(TokenKind::Newline)?;
        if !self.check(TokenKind::Indent) {
            return Err(self.error("expected an indented block".to_string()));
        }
        self.advance();
        let body = self.statement_list(TokenKind::Dedent)?;
        self.expect(TokenKind::Dedent)?;
        Ok(body)
    }

    // =========================== token access ===========================

    pub(crate) fn current(&self) -> &Token {
        self.tokens
            .get(self.position)
            .expect("parser ran past END_TOKEN")
    }

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.position + offset)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EndToken)
    }

    /// Line of the current token (1-based).
    pub(crate) fn line(&self) -> u32 {
        self.current().line
    }

    /// Consumes and returns the current token.
    ///
    /// The END sentinel is never consumed past; requesting more tokens
    /// there keeps returning it.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens[self.position].clone();
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Consumes the current token when it matches.
    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the given kind or fails.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, CompileError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(format!(
                "expected {:?}, found {:?}",
                kind,
                self.current_kind()
            )))
        }
    }

    /// Builds a parse-category error at the current line.
    pub(crate) fn error(&self, message: String) -> CompileError {
        self.handler.fatal(Category::Parse, message, self.line())
    }

    /// Mutable access to the semantic checker for grammar actions.
    pub(crate) fn checker_mut(&mut self) -> &mut Checker<'a> {
        &mut self.checker
    }

    // ====================== shared AST construction =====================

    /// Builds the assignment node for a plain name target.
    ///
    /// First assignment in scope declares (var_declare); later ones
    /// reassign (assign). The target is declared only after its value
    /// parsed, so `a = a` on a fresh name stays an undefined-name error.
    pub(crate) fn build_name_assignment(&mut self, name: Symbol, line: u32, value: Node) -> Node {
        let op = match self.checker.assign_target(name) {
            adderc_sem::AssignDisposition::Declare => Operator::VarDeclare,
            adderc_sem::AssignDisposition::Reassign => Operator::Assign,
        };
        let mut node = OperatorNode::new(op, line);
        node.set(Operand::Left, Node::name(name, line));
        node.set(Operand::Right, value);
        node.into_node()
    }
}

/// Convenience entry point: lex and parse one source buffer.
pub fn parse_source(source: &str, handler: &Handler) -> Result<Vec<Node>, CompileError> {
    let tokens = adderc_lex::lex(source, handler)?;
    Parser::new(tokens, handler).parse()
}
