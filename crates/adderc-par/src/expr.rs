//! Expression parsing.
//!
//! Precedence climbing over the fixed ladder, lowest to highest:
//! ternary, `or`, `and`, `not`, comparisons/membership/identity (one
//! left-associative level), `|`, `^`, `&`, shifts, additive,
//! multiplicative, unary prefixes, and right-associative `**`. Postfix
//! position handles calls, indexing vs slicing, and dotted attribute
//! chains, including the right-spine growth and the method-call
//! promotion of a chain's rightmost name.

use adderc_lex::{TokenKind, TokenValue};
use adderc_util::CompileError;

use crate::ast::{Child, Literal, Node, OpSym, Operand, Operator, OperatorNode};
use crate::Parser;

/// Binding powers of the `not` prefix and the unary arithmetic prefixes.
///
/// `not` sits between `and` and the comparisons; `-`/`+`/`~` sit between
/// multiplicative and power, so `-a ** b` parses as `-(a ** b)`.
const NOT_BP: u8 = 6;
const UNARY_BP: u8 = 21;

impl<'a> Parser<'a> {
    /// Parses one expression, ternary included.
    pub(crate) fn parse_expression(&mut self) -> Result<Node, CompileError> {
        let value = self.parse_binary_expr(0)?;

        if self.check(TokenKind::If) {
            let line = self.line();
            self.advance();
            let condition = self.parse_binary_expr(0)?;
            self.expect(TokenKind::Else)?;
            let falsy = self.parse_expression()?;

            let mut node = OperatorNode::new(Operator::Ternary, line);
            node.set(Operand::Condition, condition);
            node.insert(
                Operand::Values,
                Child::Branches {
                    truthy: value,
                    falsy,
                },
            );
            return Ok(node.into_node());
        }

        Ok(value)
    }

    /// Precedence climbing loop.
    fn parse_binary_expr(&mut self, min_bp: u8) -> Result<Node, CompileError> {
        let mut lhs = self.parse_unary()?;

        while let Some(op) = self.peek_binary_op() {
            if op.left_bp < min_bp {
                break;
            }
            let line = self.line();
            for _ in 0..=op.extra_tokens {
                self.advance();
            }

            let rhs = self.parse_binary_expr(op.right_bp)?;
            let mut node = OperatorNode::new(Operator::Sym(op.sym), line);
            node.set(Operand::Left, lhs);
            node.set(Operand::Right, rhs);
            lhs = node.into_node();
        }

        Ok(lhs)
    }

    /// Parses unary prefixes; unary operators carry only CENTER.
    fn parse_unary(&mut self) -> Result<Node, CompileError> {
        let sym = match self.current_kind() {
            TokenKind::Not => Some((OpSym::Not, NOT_BP)),
            TokenKind::Minus => Some((OpSym::Sub, UNARY_BP)),
            TokenKind::Plus => Some((OpSym::Add, UNARY_BP)),
            TokenKind::Tilde => Some((OpSym::BitNot, UNARY_BP)),
            _ => None,
        };

        match sym {
            Some((sym, bp)) => {
                let line = self.line();
                self.advance();
                let operand = self.parse_binary_expr(bp)?;
                let mut node = OperatorNode::new(Operator::Sym(sym), line);
                node.set(Operand::Center, operand);
                Ok(node.into_node())
            },
            None => self.parse_postfix(),
        }
    }

    /// Parses an atom and its postfix suffixes: calls, subscripts and
    /// dotted attributes.
    fn parse_postfix(&mut self) -> Result<Node, CompileError> {
        let mut node = self.parse_atom()?;
        loop {
            node = match self.current_kind() {
                TokenKind::LParenthesis => self.finish_call(node)?,
                TokenKind::LBracket => self.finish_subscript(node)?,
                TokenKind::Dot => self.finish_attribute(node)?,
                _ => return Ok(node),
            };
        }
    }

    /// Completes a call suffix.
    ///
    /// A bare name becomes a function_call with its callee tracked; a
    /// dotted chain promotes its rightmost name into the METHOD slot of
    /// a method_call, with the remaining chain as INSTANCE.
    fn finish_call(&mut self, callee: Node) -> Result<Node, CompileError> {
        let line = self.line();
        let arguments = self.parse_call_arguments()?;

        match callee {
            Node::Name(name) => {
                self.checker_mut().track_callee(name.id, name.line);
                let mut call = OperatorNode::new(Operator::FunctionCall, line);
                call.set(Operand::FunctionName, Node::Name(name));
                call.insert(Operand::Arguments, Child::Group(arguments));
                Ok(call.into_node())
            },
            Node::Operator(op) if op.op == Operator::AttributeCall => {
                let (instance, method_name) = Node::Operator(op).split_rightmost();
                if method_name.as_name().is_none() {
                    return Err(self.error("expected a method name before '('".to_string()));
                }

                let mut call = OperatorNode::new(Operator::FunctionCall, line);
                call.set(Operand::FunctionName, method_name);
                call.insert(Operand::Arguments, Child::Group(arguments));

                let mut method = OperatorNode::new(Operator::MethodCall, line);
                method.set(Operand::Instance, instance);
                method.set(Operand::Method, call.into_node());
                Ok(method.into_node())
            },
            _ => Err(self.error("expression is not callable".to_string())),
        }
    }

    /// Parses `( arguments )` with optional trailing comma.
    fn parse_call_arguments(&mut self) -> Result<Vec<Node>, CompileError> {
        self.expect(TokenKind::LParenthesis)?;
        let mut arguments = Vec::new();
        if !self.check(TokenKind::RParenthesis) {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
                if self.check(TokenKind::RParenthesis) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParenthesis)?;
        Ok(arguments)
    }

    /// Completes a `[...]` suffix: indexing, or slicing when the inner
    /// construct contains a colon. A slice's END is always present.
    fn finish_subscript(&mut self, instance: Node) -> Result<Node, CompileError> {
        let line = self.line();
        self.advance(); // '['

        let slice = if self.match_kind(TokenKind::Colon) {
            Child::SliceRange {
                start: None,
                end: self.parse_expression()?,
            }
        } else {
            let first = self.parse_expression()?;
            if self.match_kind(TokenKind::Colon) {
                Child::SliceRange {
                    start: Some(first),
                    end: self.parse_expression()?,
                }
            } else {
                self.expect(TokenKind::RBracket)?;
                let mut node = OperatorNode::new(Operator::Indexing, line);
                node.set(Operand::Instance, instance);
                node.set(Operand::Index, first);
                return Ok(node.into_node());
            }
        };
        self.expect(TokenKind::RBracket)?;

        let mut node = OperatorNode::new(Operator::Slicing, line);
        node.set(Operand::Instance, instance);
        node.insert(Operand::Slice, slice);
        Ok(node.into_node())
    }

    /// Completes a `.NAME` suffix, growing the right-leaning chain.
    fn finish_attribute(&mut self, base: Node) -> Result<Node, CompileError> {
        let line = self.line();
        self.advance(); // '.'
        let name_token = self.expect(TokenKind::Name)?;
        let attribute = Node::name(name_token.name(), name_token.line);

        match base {
            Node::Operator(mut op) if op.op == Operator::AttributeCall => {
                op.grow_right_spine(attribute, line);
                Ok(Node::Operator(op))
            },
            base => {
                let mut link = OperatorNode::new(Operator::AttributeCall, line);
                link.set(Operand::Left, base);
                link.set(Operand::Right, attribute);
                Ok(link.into_node())
            },
        }
    }

    /// Parses an atom: a literal, a name, or a bracketed construct.
    fn parse_atom(&mut self) -> Result<Node, CompileError> {
        match self.current_kind() {
            TokenKind::IntegerNumber
            | TokenKind::BinaryNumber
            | TokenKind::OctalNumber
            | TokenKind::HexadecimalNumber => {
                let token = self.advance();
                match token.value {
                    TokenValue::Int(value) => Ok(Node::Literal(Literal::Int(value))),
                    other => panic!("integer token without integer value: {:?}", other),
                }
            },
            TokenKind::FloatingNumber => {
                let token = self.advance();
                match token.value {
                    TokenValue::Float(value) => Ok(Node::Literal(Literal::Float(value))),
                    other => panic!("float token without float value: {:?}", other),
                }
            },
            TokenKind::String
            | TokenKind::TripleString
            | TokenKind::RawString
            | TokenKind::UnicodeString => {
                let token = self.advance();
                match token.value {
                    TokenValue::Str(value) => Ok(Node::Literal(Literal::Str(value))),
                    other => panic!("string token without string value: {:?}", other),
                }
            },
            TokenKind::True => {
                self.advance();
                Ok(Node::Literal(Literal::Bool(true)))
            },
            TokenKind::False => {
                self.advance();
                Ok(Node::Literal(Literal::Bool(false)))
            },
            TokenKind::None => {
                self.advance();
                Ok(Node::Literal(Literal::None))
            },
            TokenKind::Name => self.parse_name_atom(),
            TokenKind::LParenthesis => self.parse_paren_or_tuple(),
            TokenKind::LBracket => self.parse_list_literal(),
            TokenKind::LCurlyBrace => self.parse_dict_or_set(),
            kind => Err(self.error(format!("unexpected {:?} in expression", kind))),
        }
    }

    /// Parses a name reference.
    ///
    /// Definedness depends on position: a callee is tracked instead of
    /// checked, a dotted-chain base gets the `self` exemption, and a
    /// plain reference must be defined.
    fn parse_name_atom(&mut self) -> Result<Node, CompileError> {
        let token = self.advance();
        let name = token.name();
        let line = token.line;

        match self.current_kind() {
            TokenKind::LParenthesis => {
                // callee; tracked when the call suffix completes
            },
            TokenKind::Dot => {
                self.checker_mut().check_chain_base(name, line)?;
            },
            _ => {
                self.checker_mut().check_expression_name(name, line)?;
            },
        }

        Ok(Node::name(name, line))
    }

    /// Parses `( ... )`: the empty tuple, a parenthesized expression, or
    /// a tuple display.
    fn parse_paren_or_tuple(&mut self) -> Result<Node, CompileError> {
        self.advance(); // '('

        if self.match_kind(TokenKind::RParenthesis) {
            return Ok(Node::Literal(Literal::Tuple(Vec::new())));
        }

        let first = self.parse_expression()?;

        if self.check(TokenKind::Comma) {
            let mut items = vec![first];
            while self.match_kind(TokenKind::Comma) {
                if self.check(TokenKind::RParenthesis) {
                    break;
                }
                items.push(self.parse_expression()?);
            }
            self.expect(TokenKind::RParenthesis)?;
            return Ok(Node::Literal(Literal::Tuple(items)));
        }

        self.expect(TokenKind::RParenthesis)?;
        let mut wrapped = first;
        if let Some(op) = wrapped.as_operator_mut() {
            op.parenthesized = true;
        }
        Ok(wrapped)
    }

    /// Parses `[ ... ]` into a list literal.
    fn parse_list_literal(&mut self) -> Result<Node, CompileError> {
        self.advance(); // '['
        let mut items = Vec::new();
        if !self.check(TokenKind::RBracket) {
            loop {
                items.push(self.parse_expression()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
                if self.check(TokenKind::RBracket) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket)?;
        Ok(Node::Literal(Literal::List(items)))
    }

    /// Parses `{ ... }`: an empty dict, a dict display, or a set display.
    fn parse_dict_or_set(&mut self) -> Result<Node, CompileError> {
        self.advance(); // '{'

        if self.match_kind(TokenKind::RCurlyBrace) {
            return Ok(Node::Literal(Literal::Dict(Vec::new())));
        }

        let first = self.parse_expression()?;

        if self.match_kind(TokenKind::Colon) {
            let value = self.parse_expression()?;
            let mut pairs = vec![(first, value)];
            while self.match_kind(TokenKind::Comma) {
                if self.check(TokenKind::RCurlyBrace) {
                    break;
                }
                let key = self.parse_expression()?;
                self.expect(TokenKind::Colon)?;
                let value = self.parse_expression()?;
                pairs.push((key, value));
            }
            self.expect(TokenKind::RCurlyBrace)?;
            return Ok(Node::Literal(Literal::Dict(pairs)));
        }

        let mut items = vec![first];
        while self.match_kind(TokenKind::Comma) {
            if self.check(TokenKind::RCurlyBrace) {
                break;
            }
            items.push(self.parse_expression()?);
        }
        self.expect(TokenKind::RCurlyBrace)?;
        Ok(Node::Literal(Literal::Set(items)))
    }

    /// The infix operator at the cursor, if any.
    fn peek_binary_op(&self) -> Option<BinaryOp> {
        let op = match self.current_kind() {
            TokenKind::Or => BinaryOp::new(OpSym::Or, 1, 2),
            TokenKind::And => BinaryOp::new(OpSym::And, 3, 4),
            TokenKind::Not if self.peek_kind(1) == TokenKind::In => {
                BinaryOp::wide(OpSym::NotIn, 7, 8)
            },
            TokenKind::In => BinaryOp::new(OpSym::In, 7, 8),
            TokenKind::Is if self.peek_kind(1) == TokenKind::Not => {
                BinaryOp::wide(OpSym::IsNot, 7, 8)
            },
            TokenKind::Is => BinaryOp::new(OpSym::Is, 7, 8),
            TokenKind::EqualEqual => BinaryOp::new(OpSym::Eq, 7, 8),
            TokenKind::NotEqual => BinaryOp::new(OpSym::Ne, 7, 8),
            TokenKind::LessThan => BinaryOp::new(OpSym::Lt, 7, 8),
            TokenKind::LessEqual => BinaryOp::new(OpSym::Le, 7, 8),
            TokenKind::GreaterThan => BinaryOp::new(OpSym::Gt, 7, 8),
            TokenKind::GreaterEqual => BinaryOp::new(OpSym::Ge, 7, 8),
            TokenKind::Bar => BinaryOp::new(OpSym::BitOr, 9, 10),
            TokenKind::Hat => BinaryOp::new(OpSym::BitXor, 11, 12),
            TokenKind::Ampersand => BinaryOp::new(OpSym::BitAnd, 13, 14),
            TokenKind::LeftShift => BinaryOp::new(OpSym::Shl, 15, 16),
            TokenKind::RightShift => BinaryOp::new(OpSym::Shr, 15, 16),
            TokenKind::Plus => BinaryOp::new(OpSym::Add, 17, 18),
            TokenKind::Minus => BinaryOp::new(OpSym::Sub, 17, 18),
            TokenKind::Star => BinaryOp::new(OpSym::Mul, 19, 20),
            TokenKind::Slash => BinaryOp::new(OpSym::Div, 19, 20),
            TokenKind::DoubleSlash => BinaryOp::new(OpSym::FloorDiv, 19, 20),
            TokenKind::Mod => BinaryOp::new(OpSym::Mod, 19, 20),
            // right-associative: right_bp below left_bp
            TokenKind::DoubleStar => BinaryOp::new(OpSym::Pow, 24, 23),
            _ => return None,
        };
        Some(op)
    }
}

/// One infix operator with its binding powers.
struct BinaryOp {
    sym: OpSym,
    left_bp: u8,
    right_bp: u8,
    /// Extra tokens beyond the first (`not in`, `is not`).
    extra_tokens: usize,
}

impl BinaryOp {
    fn new(sym: OpSym, left_bp: u8, right_bp: u8) -> Self {
        Self {
            sym,
            left_bp,
            right_bp,
            extra_tokens: 0,
        }
    }

    fn wide(sym: OpSym, left_bp: u8, right_bp: u8) -> Self {
        Self {
            sym,
            left_bp,
            right_bp,
            extra_tokens: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{parse_err, parse_ok};
    use adderc_util::Symbol;

    /// Parses `source` (which must end in one expression statement) and
    /// returns that expression.
    fn expr(source: &str) -> Node {
        parse_ok(source).pop().expect("expression statement")
    }

    fn binary_parts(node: &Node) -> (&Node, Operator, &Node) {
        let op = node.as_operator().expect("binary node");
        (op.tree(Operand::Left), op.op, op.tree(Operand::Right))
    }

    #[test]
    fn test_additive_left_associative() {
        // a - b - c parses as (a - b) - c
        let node = expr("a = 1\nb = 2\nc = 3\na - b - c\n");
        let (left, op, right) = binary_parts(&node);
        assert_eq!(op, Operator::Sym(OpSym::Sub));
        assert_eq!(right.as_name().unwrap().id, Symbol::intern("c"));
        let (_, inner_op, inner_right) = binary_parts(left);
        assert_eq!(inner_op, Operator::Sym(OpSym::Sub));
        assert_eq!(inner_right.as_name().unwrap().id, Symbol::intern("b"));
    }

    #[test]
    fn test_power_right_associative() {
        // a ** b ** c parses as a ** (b ** c)
        let node = expr("a = 1\nb = 2\nc = 3\na ** b ** c\n");
        let (left, op, right) = binary_parts(&node);
        assert_eq!(op, Operator::Sym(OpSym::Pow));
        assert_eq!(left.as_name().unwrap().id, Symbol::intern("a"));
        let (_, inner_op, _) = binary_parts(right);
        assert_eq!(inner_op, Operator::Sym(OpSym::Pow));
    }

    #[test]
    fn test_multiplicative_binds_tighter() {
        // a + b * c
        let node = expr("a = 1\nb = 2\nc = 3\na + b * c\n");
        let (_, op, right) = binary_parts(&node);
        assert_eq!(op, Operator::Sym(OpSym::Add));
        assert_eq!(
            right.as_operator().unwrap().op,
            Operator::Sym(OpSym::Mul)
        );
    }

    #[test]
    fn test_comparison_below_additive() {
        // a + 1 < b parses as (a + 1) < b
        let node = expr("a = 1\nb = 2\na + 1 < b\n");
        let (left, op, _) = binary_parts(&node);
        assert_eq!(op, Operator::Sym(OpSym::Lt));
        assert_eq!(left.as_operator().unwrap().op, Operator::Sym(OpSym::Add));
    }

    #[test]
    fn test_not_above_and() {
        // not a and b parses as (not a) and b
        let node = expr("a = True\nb = False\nnot a and b\n");
        let (left, op, _) = binary_parts(&node);
        assert_eq!(op, Operator::Sym(OpSym::And));
        let not_node = left.as_operator().unwrap();
        assert_eq!(not_node.op, Operator::Sym(OpSym::Not));
        assert!(not_node.child(Operand::Center).is_some());
    }

    #[test]
    fn test_not_below_comparison() {
        // not a == b parses as not (a == b)
        let node = expr("a = 1\nb = 2\nnot a == b\n");
        let not_node = node.as_operator().unwrap();
        assert_eq!(not_node.op, Operator::Sym(OpSym::Not));
        assert_eq!(
            not_node.tree(Operand::Center).as_operator().unwrap().op,
            Operator::Sym(OpSym::Eq)
        );
    }

    #[test]
    fn test_membership_and_identity() {
        let node = expr("a = 1\nb = [1]\na not in b\n");
        assert_eq!(
            node.as_operator().unwrap().op,
            Operator::Sym(OpSym::NotIn)
        );

        let node = expr("a = 1\nb = 1\na is not b\n");
        assert_eq!(
            node.as_operator().unwrap().op,
            Operator::Sym(OpSym::IsNot)
        );
    }

    #[test]
    fn test_bitwise_ladder() {
        // a | b ^ c & d parses as a | (b ^ (c & d))
        let node = expr("a = 1\nb = 2\nc = 3\nd = 4\na | b ^ c & d\n");
        let (_, op, right) = binary_parts(&node);
        assert_eq!(op, Operator::Sym(OpSym::BitOr));
        let (_, xor_op, xor_right) = binary_parts(right);
        assert_eq!(xor_op, Operator::Sym(OpSym::BitXor));
        assert_eq!(
            xor_right.as_operator().unwrap().op,
            Operator::Sym(OpSym::BitAnd)
        );
    }

    #[test]
    fn test_unary_minus_below_power() {
        // -a ** b parses as -(a ** b)
        let node = expr("a = 2\nb = 3\n-a ** b\n");
        let neg = node.as_operator().unwrap();
        assert_eq!(neg.op, Operator::Sym(OpSym::Sub));
        assert_eq!(
            neg.tree(Operand::Center).as_operator().unwrap().op,
            Operator::Sym(OpSym::Pow)
        );
    }

    #[test]
    fn test_parenthesized_flag() {
        let plain = expr("a = 1\nb = 2\na + b\n");
        let wrapped = expr("a = 1\nb = 2\n(a + b)\n");

        let plain_op = plain.as_operator().unwrap();
        let wrapped_op = wrapped.as_operator().unwrap();
        assert!(!plain_op.parenthesized);
        assert!(wrapped_op.parenthesized);
        assert_eq!(plain_op.op, wrapped_op.op);
        assert_eq!(plain_op.operands, wrapped_op.operands);
    }

    #[test]
    fn test_parens_override_precedence() {
        // (a + b) * c keeps the sum on the left
        let node = expr("a = 1\nb = 2\nc = 3\n(a + b) * c\n");
        let (left, op, _) = binary_parts(&node);
        assert_eq!(op, Operator::Sym(OpSym::Mul));
        assert!(left.as_operator().unwrap().parenthesized);
    }

    #[test]
    fn test_ternary_shape() {
        let node = expr("c = True\nx = 1\ny = 2\nx if c else y\n");
        let ternary = node.as_operator().unwrap();
        assert_eq!(ternary.op, Operator::Ternary);
        assert!(ternary.child(Operand::Condition).is_some());
        match ternary.child(Operand::Values) {
            Some(Child::Branches { truthy, falsy }) => {
                assert_eq!(truthy.as_name().unwrap().id, Symbol::intern("x"));
                assert_eq!(falsy.as_name().unwrap().id, Symbol::intern("y"));
            },
            other => panic!("expected branches, found {:?}", other),
        }
    }

    #[test]
    fn test_function_call_shape() {
        let node = expr("range(3)\n");
        let call = node.as_operator().unwrap();
        assert_eq!(call.op, Operator::FunctionCall);
        assert_eq!(
            call.tree(Operand::FunctionName).as_name().unwrap().id,
            Symbol::intern("range")
        );
        assert_eq!(call.group(Operand::Arguments).len(), 1);
    }

    #[test]
    fn test_method_call_promotion() {
        // obj.method(1, 2): INSTANCE is the name, METHOD the call
        let node = expr("obj = {}\nobj.method(1, 2)\n");
        let method = node.as_operator().unwrap();
        assert_eq!(method.op, Operator::MethodCall);
        assert_eq!(
            method.tree(Operand::Instance).as_name().unwrap().id,
            Symbol::intern("obj")
        );

        let call = method.tree(Operand::Method).as_operator().unwrap();
        assert_eq!(call.op, Operator::FunctionCall);
        assert_eq!(
            call.tree(Operand::FunctionName).as_name().unwrap().id,
            Symbol::intern("method")
        );
        assert_eq!(call.group(Operand::Arguments).len(), 2);
    }

    #[test]
    fn test_chain_promotion_keeps_prefix() {
        // x.y.z(1): FUNCTION_NAME is z, INSTANCE has leaves {x, y}
        let node = expr("x = {}\nx.y.z(1)\n");
        let method = node.as_operator().unwrap();
        assert_eq!(method.op, Operator::MethodCall);

        let call = method.tree(Operand::Method).as_operator().unwrap();
        assert_eq!(
            call.tree(Operand::FunctionName).as_name().unwrap().id,
            Symbol::intern("z")
        );

        let instance = method.tree(Operand::Instance);
        let leaf_ids: Vec<_> = instance
            .leaves()
            .iter()
            .map(|leaf| leaf.as_name().unwrap().id)
            .collect();
        assert_eq!(leaf_ids, vec![Symbol::intern("x"), Symbol::intern("y")]);
    }

    #[test]
    fn test_attribute_chain_right_spine() {
        let node = expr("x = {}\nx.y.z\n");
        let chain = node.as_operator().unwrap();
        assert_eq!(chain.op, Operator::AttributeCall);
        assert_eq!(
            chain.tree(Operand::Left).as_name().unwrap().id,
            Symbol::intern("x")
        );
        let inner = chain.tree(Operand::Right).as_operator().unwrap();
        assert_eq!(inner.op, Operator::AttributeCall);
    }

    #[test]
    fn test_indexing_vs_slicing() {
        let node = expr("x = [1, 2, 3]\nx[0]\n");
        assert_eq!(node.as_operator().unwrap().op, Operator::Indexing);

        let node = expr("x = [1, 2, 3]\nx[0:2]\n");
        let slice = node.as_operator().unwrap();
        assert_eq!(slice.op, Operator::Slicing);
        match slice.child(Operand::Slice) {
            Some(Child::SliceRange { start, .. }) => assert!(start.is_some()),
            other => panic!("expected slice range, found {:?}", other),
        }

        let node = expr("x = [1, 2, 3]\nx[:2]\n");
        match node.as_operator().unwrap().child(Operand::Slice) {
            Some(Child::SliceRange { start, .. }) => assert!(start.is_none()),
            other => panic!("expected slice range, found {:?}", other),
        }
    }

    #[test]
    fn test_open_ended_slice_rejected() {
        // END is mandatory
        let err = parse_err("x = [1, 2, 3]\nx[1:]\n");
        assert!(matches!(err, CompileError::Parse { .. }));
    }

    #[test]
    fn test_structure_literals() {
        let node = expr("[1, 2, 3]\n");
        assert!(matches!(node, Node::Literal(Literal::List(ref v)) if v.len() == 3));

        let node = expr("(1, 2, 3)\n");
        assert!(matches!(node, Node::Literal(Literal::Tuple(ref v)) if v.len() == 3));

        let node = expr("{1, 2}\n");
        assert!(matches!(node, Node::Literal(Literal::Set(ref v)) if v.len() == 2));

        let node = expr("{1: 2, 3: 4}\n");
        assert!(matches!(node, Node::Literal(Literal::Dict(ref v)) if v.len() == 2));

        let node = expr("{}\n");
        assert!(matches!(node, Node::Literal(Literal::Dict(ref v)) if v.is_empty()));

        let node = expr("()\n");
        assert!(matches!(node, Node::Literal(Literal::Tuple(ref v)) if v.is_empty()));
    }

    #[test]
    fn test_trailing_commas() {
        let node = expr("[1, 2,]\n");
        assert!(matches!(node, Node::Literal(Literal::List(ref v)) if v.len() == 2));

        let node = expr("(1,)\n");
        assert!(matches!(node, Node::Literal(Literal::Tuple(ref v)) if v.len() == 1));
    }

    #[test]
    fn test_nested_bracket_literal_spans_lines() {
        let ast = parse_ok("x = (1,\n    2,\n    3)\n");
        let node = ast[0].as_operator().unwrap();
        assert_eq!(node.op, Operator::VarDeclare);
        assert!(matches!(
            node.tree(Operand::Right),
            Node::Literal(Literal::Tuple(v)) if v.len() == 3
        ));
    }

    #[test]
    fn test_callee_forward_reference_allowed_then_resolved() {
        let ast = parse_ok("def g():\n    return helper()\ndef helper():\n    return 1\n");
        assert_eq!(ast.len(), 2);
    }

    #[test]
    fn test_unresolved_callee_fatal_at_eof() {
        let err = parse_err("x = missing()\n");
        assert!(matches!(err, CompileError::Semantic { .. }));
    }

    #[test]
    fn test_undefined_chain_base() {
        let err = parse_err("ghost.attr\n");
        assert!(matches!(err, CompileError::Semantic { .. }));
    }
}
