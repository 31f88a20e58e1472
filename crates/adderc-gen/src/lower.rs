//! Pre-emission lowering.
//!
//! Two rewrites prepare the tree for text emission, both writing the
//! emitter-owned operand slots the parser leaves empty:
//!
//! - every `for`/`while` that carries an ALTERNATIVE gets a DONT_ELSE
//!   child naming a fresh guard flag; `break` emission clears the flag
//!   so a broken loop skips its else body;
//! - every function body gets the argument-refresh protocol: each
//!   `return` receives an UPDATE_ARGS copy of the parameter list, and a
//!   body with no return at all gets a synthetic `return None` appended.

use adderc_par::ast::{Child, Literal, Node, Operand, Operator, OperatorNode};
use adderc_util::Symbol;

/// Applies both rewrites to a whole program.
pub fn lower_program(program: &mut [Node]) {
    let mut flags = FlagNamer::default();
    for node in program.iter_mut() {
        lower_node(node, &mut flags);
    }
}

/// Source of unique loop-guard flag names.
#[derive(Default)]
struct FlagNamer {
    next: u32,
}

impl FlagNamer {
    fn fresh(&mut self) -> Symbol {
        let name = format!("loop_ran_out_{}", self.next);
        self.next += 1;
        Symbol::intern(&name)
    }
}

fn lower_node(node: &mut Node, flags: &mut FlagNamer) {
    let op = match node.as_operator_mut() {
        Some(op) => op,
        None => return,
    };

    match op.op {
        Operator::For | Operator::While => {
            if op.child(Operand::Alternative).is_some() && op.child(Operand::DontElse).is_none() {
                let flag = flags.fresh();
                let line = op.line;
                op.set(Operand::DontElse, Node::name(flag, line));
            }
        },
        Operator::FuncDeclare => {
            let params = op.params(Operand::Arguments).to_vec();
            let line = op.line;

            let mut returns_seen = false;
            if let Some(Child::Group(body)) = op.operands.get_mut(&Operand::Body) {
                attach_update_args(body, &params, &mut returns_seen);
                if !returns_seen {
                    let mut ret = OperatorNode::new(Operator::Return, line);
                    ret.set(Operand::Center, Node::Literal(Literal::None));
                    ret.insert(Operand::UpdateArgs, Child::Params(params.clone()));
                    body.push(ret.into_node());
                }
            }
        },
        _ => {},
    }

    // descend into every child slot; nested functions get their own
    // protocol when their func_declare is visited
    for child in op.operands.values_mut() {
        match child {
            Child::Tree(node) => lower_node(node, flags),
            Child::Group(nodes) => {
                for node in nodes {
                    lower_node(node, flags);
                }
            },
            Child::Params(params) => {
                for param in params {
                    if let Some(default) = &mut param.default {
                        lower_node(default, flags);
                    }
                }
            },
            Child::SliceRange { start, end } => {
                if let Some(start) = start {
                    lower_node(start, flags);
                }
                lower_node(end, flags);
            },
            Child::Branches { truthy, falsy } => {
                lower_node(truthy, flags);
                lower_node(falsy, flags);
            },
        }
    }
}

/// Threads UPDATE_ARGS through nested control flow to every return that
/// belongs to the current function (nested functions excluded).
fn attach_update_args(
    statements: &mut Vec<Node>,
    params: &[adderc_par::ast::Param],
    returns_seen: &mut bool,
) {
    for node in statements.iter_mut() {
        let op = match node.as_operator_mut() {
            Some(op) => op,
            None => continue,
        };

        match op.op {
            Operator::Return => {
                *returns_seen = true;
                if op.child(Operand::UpdateArgs).is_none() {
                    op.insert(Operand::UpdateArgs, Child::Params(params.to_vec()));
                }
            },
            // a nested function owns its returns
            Operator::FuncDeclare => {},
            _ => {
                for tag in [Operand::Body, Operand::Alternative] {
                    let holds_chain = matches!(op.operands.get(&tag), Some(Child::Tree(_)));
                    if holds_chain {
                        // an elif arm: recurse through the chain
                        attach_update_args_chain(op, tag, params, returns_seen);
                    } else if let Some(Child::Group(body)) = op.operands.get_mut(&tag) {
                        attach_update_args(body, params, returns_seen);
                    }
                }
            },
        }
    }
}

/// Recurses into an ALTERNATIVE chain held as a single operator child.
fn attach_update_args_chain(
    op: &mut OperatorNode,
    tag: Operand,
    params: &[adderc_par::ast::Param],
    returns_seen: &mut bool,
) {
    if let Some(Child::Tree(node)) = op.operands.get_mut(&tag) {
        let mut wrapper = vec![std::mem::replace(node, Node::Literal(Literal::None))];
        attach_update_args(&mut wrapper, params, returns_seen);
        *node = wrapper.pop().expect("chain node preserved");
    }
}
