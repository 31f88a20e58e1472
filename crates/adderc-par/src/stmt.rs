//! Statement parsing.
//!
//! One `parse_*_stmt` method per construct. Compound statements own
//! their suites; the if/elif/else chain and loop else clauses attach
//! through the deepest-ALTERNATIVE walk so the finished node matches
//! the spine shape the emitter expects.

use adderc_lex::TokenKind;
use adderc_util::CompileError;

use crate::ast::{Child, Literal, Node, OpSym, Operand, Operator, OperatorNode};
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parses one statement, simple or compound.
    pub(crate) fn parse_statement(&mut self) -> Result<Node, CompileError> {
        match self.current_kind() {
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Def => self.parse_def_item(),
            TokenKind::Class => self.parse_class_item(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Break => self.parse_break_stmt(),
            TokenKind::Continue => self.parse_continue_stmt(),
            TokenKind::Pass => self.parse_pass_stmt(),
            TokenKind::Dot => self.parse_ellipsis_stmt(),
            TokenKind::Name => self.parse_name_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    // ========================== assignments =============================

    /// Dispatches a statement that starts with a plain name.
    fn parse_name_statement(&mut self) -> Result<Node, CompileError> {
        match self.peek_kind(1) {
            TokenKind::Equal => {
                let name_token = self.advance();
                let line = name_token.line;
                self.advance(); // '='
                let value = self.parse_assign_value()?;
                Ok(self.build_name_assignment(name_token.name(), line, value))
            },
            TokenKind::Colon => self.parse_hinted_declaration(),
            TokenKind::Comma if self.looks_like_unpack() => self.parse_unpack_assignment(),
            kind if compound_assign_sym(kind).is_some() => self.parse_augmented_assignment(),
            _ => self.parse_expression_statement(),
        }
    }

    /// Parses the right side of `=`, recursing on `a = b = c` chains.
    fn parse_assign_value(&mut self) -> Result<Node, CompileError> {
        if self.check(TokenKind::Name) && self.peek_kind(1) == TokenKind::Equal {
            let name_token = self.advance();
            let line = name_token.line;
            self.advance(); // '='
            let value = self.parse_assign_value()?;
            Ok(self.build_name_assignment(name_token.name(), line, value))
        } else {
            self.parse_expression()
        }
    }

    /// Parses `name: hint = value`; the hint is validated and dropped.
    fn parse_hinted_declaration(&mut self) -> Result<Node, CompileError> {
        let name_token = self.advance();
        let line = name_token.line;
        self.advance(); // ':'
        self.parse_type_hint()?;
        self.expect(TokenKind::Equal)?;
        let value = self.parse_assign_value()?;
        Ok(self.build_name_assignment(name_token.name(), line, value))
    }

    /// Whether the upcoming tokens read `NAME (, NAME)+ =`.
    fn looks_like_unpack(&self) -> bool {
        let mut offset = 1;
        loop {
            if self.peek_kind(offset) != TokenKind::Comma {
                return false;
            }
            if self.peek_kind(offset + 1) != TokenKind::Name {
                return false;
            }
            offset += 2;
            if self.peek_kind(offset) == TokenKind::Equal {
                return true;
            }
        }
    }

    /// Parses `a, b, ... = value`.
    fn parse_unpack_assignment(&mut self) -> Result<Node, CompileError> {
        let line = self.line();
        let mut names = Vec::new();

        let first = self.expect(TokenKind::Name)?;
        names.push((first.name(), first.line));
        while self.match_kind(TokenKind::Comma) {
            let token = self.expect(TokenKind::Name)?;
            names.push((token.name(), token.line));
        }
        self.expect(TokenKind::Equal)?;
        let value = self.parse_expression()?;

        // targets are declared only after the value parsed
        let mut targets = Vec::with_capacity(names.len());
        for (name, name_line) in names {
            self.checker_mut().assign_target(name);
            targets.push(Node::name(name, name_line));
        }

        let mut node = OperatorNode::new(Operator::UnpackAssign, line);
        node.insert(Operand::Left, Child::Group(targets));
        node.set(Operand::Right, value);
        Ok(node.into_node())
    }

    /// Parses `name op= value`; the target must already be defined.
    fn parse_augmented_assignment(&mut self) -> Result<Node, CompileError> {
        let name_token = self.advance();
        let line = name_token.line;
        let name = name_token.name();
        self.checker_mut().check_expression_name(name, line)?;

        let sym = compound_assign_sym(self.current_kind())
            .expect("dispatch guaranteed a compound operator");
        self.advance();
        let value = self.parse_expression()?;

        let mut node = OperatorNode::new(Operator::Sym(sym), line);
        node.set(Operand::Left, Node::name(name, line));
        node.set(Operand::Right, value);
        Ok(node.into_node())
    }

    /// Parses an expression statement, including assignments whose
    /// target is an indexing/slicing/attribute place.
    fn parse_expression_statement(&mut self) -> Result<Node, CompileError> {
        let line = self.line();
        let expr = self.parse_expression()?;

        if self.check(TokenKind::Equal) {
            self.ensure_assignable(&expr)?;
            self.advance();
            let value = self.parse_assign_value()?;
            let mut node = OperatorNode::new(Operator::Assign, line);
            node.set(Operand::Left, expr);
            node.set(Operand::Right, value);
            return Ok(node.into_node());
        }

        if let Some(sym) = compound_assign_sym(self.current_kind()) {
            self.ensure_assignable(&expr)?;
            self.advance();
            let value = self.parse_expression()?;
            let mut node = OperatorNode::new(Operator::Sym(sym), line);
            node.set(Operand::Left, expr);
            node.set(Operand::Right, value);
            return Ok(node.into_node());
        }

        Ok(expr)
    }

    /// Rejects assignment targets that are not places.
    fn ensure_assignable(&self, expr: &Node) -> Result<(), CompileError> {
        let assignable = matches!(
            expr.as_operator().map(|op| op.op),
            Some(Operator::Indexing) | Some(Operator::Slicing) | Some(Operator::AttributeCall)
        );
        if assignable {
            Ok(())
        } else {
            Err(self.error("cannot assign to this expression".to_string()))
        }
    }

    // ========================== control flow ============================

    /// Parses an if statement with its elif/else spine.
    fn parse_if_stmt(&mut self) -> Result<Node, CompileError> {
        let line = self.line();
        self.advance(); // 'if'

        let condition = self.parse_expression()?;
        let body = self.parse_suite()?;

        let mut root = OperatorNode::new(Operator::If, line);
        root.set(Operand::Condition, condition);
        root.insert(Operand::Body, Child::Group(body));

        // arms attach at the deepest open ALTERNATIVE slot
        loop {
            if self.check(TokenKind::Elif) {
                let arm_line = self.line();
                self.advance();
                let condition = self.parse_expression()?;
                let body = self.parse_suite()?;

                let mut arm = OperatorNode::new(Operator::Elif, arm_line);
                arm.set(Operand::Condition, condition);
                arm.insert(Operand::Body, Child::Group(body));
                root.attach_deepest(Operand::Alternative, Child::Tree(arm.into_node()));
            } else if self.check(TokenKind::Else) {
                self.advance();
                let body = self.parse_suite()?;
                root.attach_deepest(Operand::Alternative, Child::Group(body));
                break;
            } else {
                break;
            }
        }

        Ok(root.into_node())
    }

    /// Parses a while loop with an optional loop-else clause.
    fn parse_while_stmt(&mut self) -> Result<Node, CompileError> {
        let line = self.line();
        self.advance(); // 'while'

        let condition = self.parse_expression()?;

        self.checker_mut().enter_loop();
        let body = self.parse_suite()?;
        self.checker_mut().exit_loop();

        let mut node = OperatorNode::new(Operator::While, line);
        node.set(Operand::Condition, condition);
        node.insert(Operand::Body, Child::Group(body));

        if self.match_kind(TokenKind::Else) {
            let alternative = self.parse_suite()?;
            node.insert(Operand::Alternative, Child::Group(alternative));
        }

        Ok(node.into_node())
    }

    /// Parses a for loop: targets, iterable, body, optional else.
    ///
    /// The iterable parses before the targets are declared, so
    /// `for i in i` stays an undefined-name error; the targets live in
    /// the loop's own scope and vanish after the statement.
    fn parse_for_stmt(&mut self) -> Result<Node, CompileError> {
        let line = self.line();
        self.advance(); // 'for'

        let mut symbols = Vec::new();
        let first = self.expect(TokenKind::Name)?;
        symbols.push((first.name(), first.line));
        while self.match_kind(TokenKind::Comma) {
            let token = self.expect(TokenKind::Name)?;
            symbols.push((token.name(), token.line));
        }

        self.expect(TokenKind::In)?;
        let iterable = self.parse_for_iterable()?;

        self.checker_mut().enter_scope();
        let mut targets = Vec::with_capacity(symbols.len());
        for (name, name_line) in symbols {
            self.checker_mut().declare_loop_target(name);
            targets.push(Node::name(name, name_line));
        }

        self.checker_mut().enter_loop();
        let body = self.parse_suite()?;
        self.checker_mut().exit_loop();

        let mut node = OperatorNode::new(Operator::For, line);
        node.insert(Operand::Symbols, Child::Group(targets));
        node.set(Operand::ForLiteral, iterable);
        node.insert(Operand::Body, Child::Group(body));

        if self.match_kind(TokenKind::Else) {
            let alternative = self.parse_suite()?;
            node.insert(Operand::Alternative, Child::Group(alternative));
        }

        self.checker_mut().exit_scope();
        Ok(node.into_node())
    }

    /// Parses and validates a for-loop iterable: a name, a structured
    /// literal, or a call.
    fn parse_for_iterable(&mut self) -> Result<Node, CompileError> {
        let line = self.line();
        let iterable = self.parse_expression()?;

        let valid = match &iterable {
            Node::Name(_) => true,
            Node::Literal(literal) => matches!(
                literal,
                Literal::List(_)
                    | Literal::Tuple(_)
                    | Literal::Set(_)
                    | Literal::Dict(_)
                    | Literal::Str(_)
            ),
            Node::Operator(op) => {
                matches!(op.op, Operator::FunctionCall | Operator::MethodCall)
            },
        };
        if valid {
            Ok(iterable)
        } else {
            Err(self.handler.fatal(
                adderc_util::Category::Parse,
                "for loop needs a name, literal or call to iterate",
                line,
            ))
        }
    }

    // ======================= simple statements ==========================

    /// Parses `return` with an optional comma series of values.
    fn parse_return_stmt(&mut self) -> Result<Node, CompileError> {
        let line = self.line();
        self.checker_mut().check_return(line)?;
        self.advance(); // 'return'

        let mut node = OperatorNode::new(Operator::Return, line);
        if matches!(
            self.current_kind(),
            TokenKind::Newline | TokenKind::Dedent | TokenKind::EndToken
        ) {
            node.set(Operand::Center, Node::Literal(Literal::None));
            return Ok(node.into_node());
        }

        let mut values = vec![self.parse_expression()?];
        while self.match_kind(TokenKind::Comma) {
            values.push(self.parse_expression()?);
        }

        if values.len() == 1 {
            node.set(Operand::Center, values.pop().expect("one value"));
        } else {
            node.insert(Operand::Center, Child::Group(values));
        }
        Ok(node.into_node())
    }

    fn parse_break_stmt(&mut self) -> Result<Node, CompileError> {
        let line = self.line();
        self.checker_mut().check_break(line)?;
        self.advance();
        Ok(OperatorNode::new(Operator::Break, line).into_node())
    }

    fn parse_continue_stmt(&mut self) -> Result<Node, CompileError> {
        let line = self.line();
        self.checker_mut().check_continue(line)?;
        self.advance();
        Ok(OperatorNode::new(Operator::Continue, line).into_node())
    }

    fn parse_pass_stmt(&mut self) -> Result<Node, CompileError> {
        let line = self.line();
        self.checker_mut().check_pass(line)?;
        self.advance();
        Ok(OperatorNode::new(Operator::Pass, line).into_node())
    }

    /// Parses a `...` body; equivalent to `pass` but only in functions.
    fn parse_ellipsis_stmt(&mut self) -> Result<Node, CompileError> {
        let line = self.line();
        if self.peek_kind(1) != TokenKind::Dot || self.peek_kind(2) != TokenKind::Dot {
            return Err(self.error("unexpected '.'".to_string()));
        }
        self.checker_mut().check_ellipsis(line)?;
        self.advance();
        self.advance();
        self.advance();
        Ok(OperatorNode::new(Operator::Pass, line).into_node())
    }

}

/// Maps a compound-assignment token to its operator symbol.
fn compound_assign_sym(kind: TokenKind) -> Option<OpSym> {
    let sym = match kind {
        TokenKind::PlusEqual => OpSym::AddAssign,
        TokenKind::MinusEqual => OpSym::SubAssign,
        TokenKind::StarEqual => OpSym::MulAssign,
        TokenKind::SlashEqual => OpSym::DivAssign,
        TokenKind::DoubleSlashEqual => OpSym::FloorDivAssign,
        TokenKind::ModEqual => OpSym::ModAssign,
        TokenKind::DoubleStarEqual => OpSym::PowAssign,
        TokenKind::AmpersandEqual => OpSym::BitAndAssign,
        TokenKind::BarEqual => OpSym::BitOrAssign,
        TokenKind::HatEqual => OpSym::BitXorAssign,
        TokenKind::LeftShiftEqual => OpSym::ShlAssign,
        TokenKind::RightShiftEqual => OpSym::ShrAssign,
        _ => return None,
    };
    Some(sym)
}
