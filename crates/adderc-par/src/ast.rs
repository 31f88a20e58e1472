//! AST node definitions.
//!
//! The tree has three node shapes: scalar or structured [`Literal`]s,
//! identifier [`NameNode`]s, and [`OperatorNode`]s. An operator carries a
//! tag from the closed [`Operator`] set and an ordered map from
//! [`Operand`] slots to [`Child`] values; the map never grows past the
//! operator's declared adjacency cap.
//!
//! A handful of spine helpers implement the tree rewrites the grammar
//! needs: right-leaning growth of dotted attribute chains, detaching the
//! rightmost leaf when a chain turns out to be a method call, and
//! appending to the deepest ALTERNATIVE slot of a conditional chain.
//!
//! A missing or wrongly-shaped operand is a programmer error, never a
//! user diagnostic: the typed accessors panic.

use adderc_util::Symbol;
use indexmap::IndexMap;

/// An AST node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Literal(Literal),
    Name(NameNode),
    Operator(Box<OperatorNode>),
}

impl Node {
    /// Builds a name node.
    pub fn name(id: Symbol, line: u32) -> Node {
        Node::Name(NameNode { id, line })
    }

    /// The operator payload, if this is an operator node.
    pub fn as_operator(&self) -> Option<&OperatorNode> {
        match self {
            Node::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// Mutable operator payload, if this is an operator node.
    pub fn as_operator_mut(&mut self) -> Option<&mut OperatorNode> {
        match self {
            Node::Operator(op) => Some(op),
            _ => None,
        }
    }

    /// The name payload, if this is a name node.
    pub fn as_name(&self) -> Option<&NameNode> {
        match self {
            Node::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this node carries no children of its own.
    pub fn is_leaf(&self) -> bool {
        match self {
            Node::Operator(op) => op.operands.is_empty(),
            Node::Literal(literal) => literal.is_scalar(),
            Node::Name(_) => true,
        }
    }

    /// Collects every leaf node reachable from this one, left to right.
    pub fn leaves(&self) -> Vec<&Node> {
        if self.is_leaf() {
            return vec![self];
        }
        let mut leaves = Vec::new();
        match self {
            Node::Operator(op) => {
                for child in op.operands.values() {
                    child.collect_leaves(&mut leaves);
                }
            },
            Node::Literal(literal) => literal.collect_element_leaves(&mut leaves),
            Node::Name(_) => unreachable!("names are leaves"),
        }
        leaves
    }

    /// Splits off the rightmost leaf of a right-leaning chain.
    ///
    /// Returns the remaining chain and the detached leaf; the leaf's
    /// former parent collapses into its own LEFT child. This is the
    /// method-call promotion: for `x.y.z` it yields the `x.y` chain and
    /// the name `z`.
    ///
    /// Panics when called on a node without LEFT/RIGHT children.
    pub fn split_rightmost(self) -> (Node, Node) {
        match self {
            Node::Operator(mut op) => {
                let right = op.take_tree(Operand::Right);
                let descend = matches!(
                    &right,
                    Node::Operator(inner) if inner.operands.contains_key(&Operand::Right)
                );
                if descend {
                    let (remaining, leaf) = right.split_rightmost();
                    op.operands.insert(Operand::Right, Child::Tree(remaining));
                    (Node::Operator(op), leaf)
                } else {
                    let left = op.take_tree(Operand::Left);
                    (left, right)
                }
            },
            _ => panic!("split_rightmost on a node without a right spine"),
        }
    }
}

/// An identifier reference.
#[derive(Clone, Debug, PartialEq)]
pub struct NameNode {
    pub id: Symbol,
    /// Source line of the reference (1-based).
    pub line: u32,
}

/// A scalar value or a structured literal of element nodes.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    None,
    List(Vec<Node>),
    Tuple(Vec<Node>),
    Set(Vec<Node>),
    Dict(Vec<(Node, Node)>),
}

impl Literal {
    /// Whether this literal holds no element nodes.
    pub fn is_scalar(&self) -> bool {
        match self {
            Literal::Int(_)
            | Literal::Float(_)
            | Literal::Bool(_)
            | Literal::Str(_)
            | Literal::None => true,
            Literal::List(items) | Literal::Tuple(items) | Literal::Set(items) => {
                items.is_empty()
            },
            Literal::Dict(pairs) => pairs.is_empty(),
        }
    }

    fn collect_element_leaves<'a>(&'a self, leaves: &mut Vec<&'a Node>) {
        match self {
            Literal::List(items) | Literal::Tuple(items) | Literal::Set(items) => {
                for item in items {
                    leaves.extend(item.leaves());
                }
            },
            Literal::Dict(pairs) => {
                for (key, value) in pairs {
                    leaves.extend(key.leaves());
                    leaves.extend(value.leaves());
                }
            },
            _ => {},
        }
    }
}

/// Concrete binary, unary and compound-assignment operator symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpSym {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
    In,
    NotIn,
    Is,
    IsNot,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    FloorDivAssign,
    ModAssign,
    PowAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShlAssign,
    ShrAssign,
}

impl OpSym {
    /// The textual operator symbol.
    pub fn as_str(self) -> &'static str {
        match self {
            OpSym::Add => "+",
            OpSym::Sub => "-",
            OpSym::Mul => "*",
            OpSym::Div => "/",
            OpSym::FloorDiv => "//",
            OpSym::Mod => "%",
            OpSym::Pow => "**",
            OpSym::BitAnd => "&",
            OpSym::BitOr => "|",
            OpSym::BitXor => "^",
            OpSym::BitNot => "~",
            OpSym::Shl => "<<",
            OpSym::Shr => ">>",
            OpSym::Eq => "==",
            OpSym::Ne => "!=",
            OpSym::Lt => "<",
            OpSym::Le => "<=",
            OpSym::Gt => ">",
            OpSym::Ge => ">=",
            OpSym::And => "and",
            OpSym::Or => "or",
            OpSym::Not => "not",
            OpSym::In => "in",
            OpSym::NotIn => "not in",
            OpSym::Is => "is",
            OpSym::IsNot => "is not",
            OpSym::AddAssign => "+=",
            OpSym::SubAssign => "-=",
            OpSym::MulAssign => "*=",
            OpSym::DivAssign => "/=",
            OpSym::FloorDivAssign => "//=",
            OpSym::ModAssign => "%=",
            OpSym::PowAssign => "**=",
            OpSym::BitAndAssign => "&=",
            OpSym::BitOrAssign => "|=",
            OpSym::BitXorAssign => "^=",
            OpSym::ShlAssign => "<<=",
            OpSym::ShrAssign => ">>=",
        }
    }

    /// Whether this is a compound-assignment form.
    pub fn is_compound_assign(self) -> bool {
        matches!(
            self,
            OpSym::AddAssign
                | OpSym::SubAssign
                | OpSym::MulAssign
                | OpSym::DivAssign
                | OpSym::FloorDivAssign
                | OpSym::ModAssign
                | OpSym::PowAssign
                | OpSym::BitAndAssign
                | OpSym::BitOrAssign
                | OpSym::BitXorAssign
                | OpSym::ShlAssign
                | OpSym::ShrAssign
        )
    }
}

/// Operator tag of an [`OperatorNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Ternary,
    If,
    Elif,
    FunctionCall,
    MethodCall,
    AttributeCall,
    Slicing,
    Indexing,
    /// Re-assignment of a name already in scope.
    Assign,
    /// First assignment to a name in the current scope.
    VarDeclare,
    UnpackAssign,
    Return,
    While,
    For,
    FuncDeclare,
    ClassDeclare,
    Pass,
    Break,
    Continue,
    /// A concrete operator symbol, unary or binary by operand shape.
    Sym(OpSym),
}

impl Operator {
    /// The textual tag the emitter dispatches on.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Ternary => "ternary",
            Operator::If => "if",
            Operator::Elif => "elif",
            Operator::FunctionCall => "function_call",
            Operator::MethodCall => "method_call",
            Operator::AttributeCall => "attribute_call",
            Operator::Slicing => "slicing",
            Operator::Indexing => "indexing",
            Operator::Assign => "=",
            Operator::VarDeclare => "var_declare",
            Operator::UnpackAssign => "unpack_assign",
            Operator::Return => "return",
            Operator::While => "while",
            Operator::For => "for",
            Operator::FuncDeclare => "func_declare",
            Operator::ClassDeclare => "class_declare",
            Operator::Pass => "pass",
            Operator::Break => "break",
            Operator::Continue => "continue",
            Operator::Sym(sym) => sym.as_str(),
        }
    }

    /// Maximum number of operand slots this operator may carry.
    ///
    /// The cap counts the emitter-owned slots (UPDATE_ARGS, DONT_ELSE)
    /// where the lowering pass may attach them.
    pub fn max_operands(&self) -> usize {
        match self {
            Operator::Pass | Operator::Break | Operator::Continue => 0,
            Operator::Return => 2,
            Operator::If | Operator::Elif => 3,
            Operator::While => 4,
            Operator::For => 5,
            Operator::FuncDeclare | Operator::ClassDeclare => 3,
            Operator::Ternary
            | Operator::FunctionCall
            | Operator::MethodCall
            | Operator::AttributeCall
            | Operator::Slicing
            | Operator::Indexing
            | Operator::Assign
            | Operator::VarDeclare
            | Operator::UnpackAssign
            | Operator::Sym(_) => 2,
        }
    }
}

/// Child-slot keys of an operator node (closed set).
///
/// `Start`/`End` and `Argument`/`Default` are realized structurally by
/// [`Child::SliceRange`] and [`Param`]; `ElifChain` is accepted for
/// compatibility but conditional chains attach through `Alternative`.
/// `UpdateArgs` and `DontElse` are written by the emitter's lowering
/// pass, never by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    Left,
    Right,
    Center,
    Index,
    Instance,
    Slice,
    Start,
    End,
    Condition,
    Values,
    FunctionName,
    Arguments,
    Method,
    Body,
    ElifChain,
    Alternative,
    Symbols,
    ForLiteral,
    ClassName,
    ParentClass,
    UpdateArgs,
    DontElse,
    Argument,
    Default,
}

/// One declared parameter of a function.
///
/// Realizes the `{ARGUMENT, DEFAULT}` entry shape: positionals have no
/// default, defaulted parameters carry their literal.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: Node,
    pub default: Option<Node>,
}

/// The typed value of an operand slot.
#[derive(Clone, Debug, PartialEq)]
pub enum Child {
    /// A single subtree.
    Tree(Node),
    /// An ordered group of subtrees: bodies, call arguments, unpack
    /// targets, loop symbols, return values.
    Group(Vec<Node>),
    /// A declared parameter list.
    Params(Vec<Param>),
    /// Slice bounds; END is always present.
    SliceRange { start: Option<Node>, end: Node },
    /// The ternary VALUES pair, keyed by condition outcome.
    Branches { truthy: Node, falsy: Node },
}

impl Child {
    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Node>) {
        match self {
            Child::Tree(node) => leaves.extend(node.leaves()),
            Child::Group(nodes) => {
                for node in nodes {
                    leaves.extend(node.leaves());
                }
            },
            Child::Params(params) => {
                for param in params {
                    leaves.extend(param.name.leaves());
                    if let Some(default) = &param.default {
                        leaves.extend(default.leaves());
                    }
                }
            },
            Child::SliceRange { start, end } => {
                if let Some(start) = start {
                    leaves.extend(start.leaves());
                }
                leaves.extend(end.leaves());
            },
            Child::Branches { truthy, falsy } => {
                leaves.extend(truthy.leaves());
                leaves.extend(falsy.leaves());
            },
        }
    }
}

/// An operator node: a tag plus its operand map.
#[derive(Clone, Debug, PartialEq)]
pub struct OperatorNode {
    pub op: Operator,
    pub operands: IndexMap<Operand, Child>,
    /// Set when the source wrapped this node in parentheses.
    pub parenthesized: bool,
    /// Source line the operator starts on (1-based).
    pub line: u32,
}

impl OperatorNode {
    /// Creates an operator node with an empty operand map.
    pub fn new(op: Operator, line: u32) -> Self {
        Self {
            op,
            operands: IndexMap::new(),
            parenthesized: false,
            line,
        }
    }

    /// Wraps this operator into a [`Node`].
    pub fn into_node(self) -> Node {
        Node::Operator(Box::new(self))
    }

    /// Attaches a child under `tag`.
    ///
    /// Panics when the slot is taken or the adjacency cap is exceeded -
    /// both are parser bugs.
    pub fn insert(&mut self, tag: Operand, child: Child) {
        if self.operands.contains_key(&tag) {
            panic!("operator '{}' already has a {:?} operand", self.op.as_str(), tag);
        }
        if self.operands.len() >= self.op.max_operands() {
            panic!(
                "operator '{}' can't have more than {} operands",
                self.op.as_str(),
                self.op.max_operands()
            );
        }
        self.operands.insert(tag, child);
    }

    /// Attaches a single-subtree child under `tag`.
    pub fn set(&mut self, tag: Operand, node: Node) {
        self.insert(tag, Child::Tree(node));
    }

    /// The child under `tag`, if present.
    pub fn child(&self, tag: Operand) -> Option<&Child> {
        self.operands.get(&tag)
    }

    /// The subtree under `tag`; panics when absent or not a subtree.
    pub fn tree(&self, tag: Operand) -> &Node {
        match self.operands.get(&tag) {
            Some(Child::Tree(node)) => node,
            other => panic!(
                "operator '{}' has no {:?} subtree (found {:?})",
                self.op.as_str(),
                tag,
                other
            ),
        }
    }

    /// The group under `tag`; panics when absent or not a group.
    pub fn group(&self, tag: Operand) -> &[Node] {
        match self.operands.get(&tag) {
            Some(Child::Group(nodes)) => nodes,
            other => panic!(
                "operator '{}' has no {:?} group (found {:?})",
                self.op.as_str(),
                tag,
                other
            ),
        }
    }

    /// The parameter list under `tag`; panics when absent or not params.
    pub fn params(&self, tag: Operand) -> &[Param] {
        match self.operands.get(&tag) {
            Some(Child::Params(params)) => params,
            other => panic!(
                "operator '{}' has no {:?} params (found {:?})",
                self.op.as_str(),
                tag,
                other
            ),
        }
    }

    /// Removes and returns the subtree under `tag`; panics when absent.
    pub fn take_tree(&mut self, tag: Operand) -> Node {
        match self.operands.shift_remove(&tag) {
            Some(Child::Tree(node)) => node,
            other => panic!(
                "operator '{}' has no {:?} subtree to take (found {:?})",
                self.op.as_str(),
                tag,
                other
            ),
        }
    }

    /// The rightmost leaf of the RIGHT spine, this node included.
    pub fn rightmost_leaf(&self) -> &Node {
        let mut node = self;
        loop {
            match node.operands.get(&Operand::Right) {
                Some(Child::Tree(Node::Operator(inner)))
                    if inner.operands.contains_key(&Operand::Right) =>
                {
                    node = inner;
                },
                Some(Child::Tree(leaf)) => return leaf,
                _ => panic!(
                    "operator '{}' has no right spine",
                    node.op.as_str()
                ),
            }
        }
    }

    /// Grows a dotted chain by one `.NAME` suffix.
    ///
    /// A fresh attribute_call takes the chain's current rightmost leaf as
    /// LEFT and `name` as RIGHT, and is planted where that leaf was, so
    /// the chain stays a right-leaning spine.
    pub fn grow_right_spine(&mut self, name: Node, line: u32) {
        let mut node = self;
        loop {
            let descend = matches!(
                node.operands.get(&Operand::Right),
                Some(Child::Tree(Node::Operator(inner)))
                    if inner.operands.contains_key(&Operand::Right)
            );
            if !descend {
                break;
            }
            node = match node.operands.get_mut(&Operand::Right) {
                Some(Child::Tree(Node::Operator(inner))) => inner,
                _ => unreachable!(),
            };
        }

        let op_name = node.op.as_str();
        let slot = node
            .operands
            .get_mut(&Operand::Right)
            .unwrap_or_else(|| panic!("operator '{}' has no right spine", op_name));
        let leaf = match std::mem::replace(slot, Child::Tree(Node::Literal(Literal::None))) {
            Child::Tree(node) => node,
            other => panic!("right spine of '{}' holds {:?}", op_name, other),
        };

        let mut link = OperatorNode::new(Operator::AttributeCall, line);
        link.set(Operand::Left, leaf);
        link.set(Operand::Right, name);
        *slot = Child::Tree(link.into_node());
    }

    /// Appends `child` at the deepest open `tag` slot along the spine of
    /// operator children under `tag`.
    ///
    /// This is how `elif` arms and the terminal `else` body attach to a
    /// conditional chain.
    pub fn attach_deepest(&mut self, tag: Operand, child: Child) {
        let mut node = self;
        loop {
            let descend = matches!(
                node.operands.get(&tag),
                Some(Child::Tree(Node::Operator(_)))
            );
            if descend {
                node = match node.operands.get_mut(&tag) {
                    Some(Child::Tree(Node::Operator(inner))) => inner,
                    _ => unreachable!(),
                };
            } else {
                node.insert(tag, child);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(id: &str) -> Node {
        Node::name(Symbol::intern(id), 1)
    }

    fn chain(ids: &[&str]) -> OperatorNode {
        // builds a right-leaning attribute chain the way the parser does
        let mut root = OperatorNode::new(Operator::AttributeCall, 1);
        root.set(Operand::Left, name(ids[0]));
        root.set(Operand::Right, name(ids[1]));
        for id in &ids[2..] {
            root.grow_right_spine(name(id), 1);
        }
        root
    }

    #[test]
    fn test_insert_respects_cap() {
        let mut node = OperatorNode::new(Operator::Sym(OpSym::Add), 1);
        node.set(Operand::Left, name("a"));
        node.set(Operand::Right, name("b"));
        assert_eq!(node.operands.len(), 2);
    }

    #[test]
    #[should_panic(expected = "can't have more than")]
    fn test_insert_past_cap_panics() {
        let mut node = OperatorNode::new(Operator::Sym(OpSym::Add), 1);
        node.set(Operand::Left, name("a"));
        node.set(Operand::Right, name("b"));
        node.set(Operand::Center, name("c"));
    }

    #[test]
    #[should_panic(expected = "already has a")]
    fn test_duplicate_slot_panics() {
        let mut node = OperatorNode::new(Operator::Sym(OpSym::Add), 1);
        node.set(Operand::Left, name("a"));
        node.set(Operand::Left, name("b"));
    }

    #[test]
    fn test_zero_operand_operators() {
        let node = OperatorNode::new(Operator::Pass, 1);
        assert_eq!(node.op.max_operands(), 0);
        assert!(node.operands.is_empty());
    }

    #[test]
    fn test_chain_is_right_leaning() {
        let chain = chain(&["x", "y", "z"]);
        // x.y.z == attribute_call(x, attribute_call(y, z))
        assert_eq!(chain.tree(Operand::Left), &name("x"));
        let inner = chain.tree(Operand::Right).as_operator().unwrap();
        assert_eq!(inner.op, Operator::AttributeCall);
        assert_eq!(inner.tree(Operand::Left), &name("y"));
        assert_eq!(inner.tree(Operand::Right), &name("z"));
    }

    #[test]
    fn test_rightmost_leaf() {
        let chain = chain(&["x", "y", "z", "w"]);
        assert_eq!(chain.rightmost_leaf(), &name("w"));
    }

    #[test]
    fn test_split_rightmost_collapses_parent() {
        let (remaining, leaf) = chain(&["x", "y", "z"]).into_node().split_rightmost();
        assert_eq!(leaf, name("z"));

        let remaining = remaining.as_operator().expect("chain remains");
        assert_eq!(remaining.tree(Operand::Left), &name("x"));
        assert_eq!(remaining.tree(Operand::Right), &name("y"));
    }

    #[test]
    fn test_split_rightmost_single_link() {
        let (remaining, leaf) = chain(&["obj", "method"]).into_node().split_rightmost();
        assert_eq!(remaining, name("obj"));
        assert_eq!(leaf, name("method"));
    }

    #[test]
    fn test_leaves_of_chain() {
        let chain = chain(&["x", "y", "z"]).into_node();
        let leaves = chain.leaves();
        assert_eq!(leaves, vec![&name("x"), &name("y"), &name("z")]);
    }

    #[test]
    fn test_attach_deepest_walks_alternatives() {
        let mut root = OperatorNode::new(Operator::If, 1);
        root.set(Operand::Condition, name("a"));
        root.insert(Operand::Body, Child::Group(vec![]));

        let mut arm = OperatorNode::new(Operator::Elif, 2);
        arm.set(Operand::Condition, name("b"));
        arm.insert(Operand::Body, Child::Group(vec![]));
        root.attach_deepest(Operand::Alternative, Child::Tree(arm.into_node()));

        root.attach_deepest(Operand::Alternative, Child::Group(vec![name("c")]));

        let elif = root.tree(Operand::Alternative).as_operator().unwrap();
        assert_eq!(elif.op, Operator::Elif);
        assert_eq!(elif.group(Operand::Alternative), &[name("c")]);
    }

    #[test]
    fn test_operator_tags_round_trip() {
        assert_eq!(Operator::VarDeclare.as_str(), "var_declare");
        assert_eq!(Operator::Sym(OpSym::FloorDiv).as_str(), "//");
        assert_eq!(Operator::Sym(OpSym::NotIn).as_str(), "not in");
        assert_eq!(Operator::Sym(OpSym::ShrAssign).as_str(), ">>=");
    }

    #[test]
    #[should_panic(expected = "has no Condition subtree")]
    fn test_missing_operand_panics() {
        let node = OperatorNode::new(Operator::If, 1);
        node.tree(Operand::Condition);
    }
}
