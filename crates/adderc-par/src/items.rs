//! Function and class declarations.
//!
//! `def` and `class` own the only suites that open a new scope besides
//! `for`. A function's name is declared in the enclosing scope before
//! its body parses, so recursion resolves immediately; its parameters
//! live in the function scope and vanish with it.

use adderc_lex::TokenKind;
use adderc_util::CompileError;

use crate::ast::{Child, Node, Operand, Operator, OperatorNode, Param};
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses `def name(params) [-> hint]: suite`.
    pub(crate) fn parse_def_item(&mut self) -> Result<Node, CompileError> {
        let line = self.line();
        self.advance(); // 'def'

        let name_token = self.expect(TokenKind::Name)?;
        let name = name_token.name();
        self.checker_mut().declare_function(name);

        self.checker_mut().enter_scope();
        self.expect(TokenKind::LParenthesis)?;
        let params = self.parse_parameters()?;
        self.expect(TokenKind::RParenthesis)?;

        if self.match_kind(TokenKind::Arrow) {
            self.parse_type_hint()?;
        }

        self.checker_mut().enter_function();
        let body = self.parse_suite()?;
        self.checker_mut().exit_function();
        self.checker_mut().exit_scope();

        let mut node = OperatorNode::new(Operator::FuncDeclare, line);
        node.set(Operand::FunctionName, Node::name(name, name_token.line));
        node.insert(Operand::Arguments, Child::Params(params));
        node.insert(Operand::Body, Child::Group(body));
        Ok(node.into_node())
    }

    /// Parses the parameter list of a declaration.
    ///
    /// Each parameter is `NAME [: hint] [= default]`; once a default
    /// appears, every later parameter needs one too.
    fn parse_parameters(&mut self) -> Result<Vec<Param>, CompileError> {
        let mut params = Vec::new();
        let mut seen_default = false;

        if !self.check(TokenKind::RParenthesis) {
            loop {
                let token = self.expect(TokenKind::Name)?;
                let name = token.name();
                let param_line = token.line;
                self.checker_mut().declare_parameter(name);

                if self.match_kind(TokenKind::Colon) {
                    self.parse_type_hint()?;
                }

                let default = if self.match_kind(TokenKind::Equal) {
                    seen_default = true;
                    Some(self.parse_expression()?)
                } else {
                    if seen_default {
                        return Err(self.handler_semantic(
                            param_line,
                            format!(
                                "positional parameter '{}' follows a defaulted parameter",
                                name
                            ),
                        ));
                    }
                    None
                };

                params.push(Param {
                    name: Node::name(name, param_line),
                    default,
                });

                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
                if self.check(TokenKind::RParenthesis) {
                    break;
                }
            }
        }

        Ok(params)
    }

    /// Parses `class Name [( Parent )]: suite`.
    pub(crate) fn parse_class_item(&mut self) -> Result<Node, CompileError> {
        let line = self.line();
        self.advance(); // 'class'

        let name_token = self.expect(TokenKind::Name)?;
        let name = name_token.name();

        let parent = if self.match_kind(TokenKind::LParenthesis) {
            let parent_token = self.expect(TokenKind::Name)?;
            self.expect(TokenKind::RParenthesis)?;
            let parent = parent_token.name();
            self.checker_mut()
                .track_base_class(name, parent, parent_token.line)?;
            Some(Node::name(parent, parent_token.line))
        } else {
            None
        };

        self.checker_mut().declare_class(name);

        self.checker_mut().enter_scope();
        self.checker_mut().enter_class();
        let body = self.parse_suite()?;
        self.checker_mut().exit_class();
        self.checker_mut().exit_scope();

        let mut node = OperatorNode::new(Operator::ClassDeclare, line);
        node.set(Operand::ClassName, Node::name(name, name_token.line));
        if let Some(parent) = parent {
            node.set(Operand::ParentClass, parent);
        }
        node.insert(Operand::Body, Child::Group(body));
        Ok(node.into_node())
    }

    /// Builds a semantic error at a specific line.
    fn handler_semantic(&self, line: u32, message: String) -> CompileError {
        self.handler
            .fatal(adderc_util::Category::Semantic, message, line)
    }
}
