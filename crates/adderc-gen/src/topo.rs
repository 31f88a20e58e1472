//! Function declaration ordering.
//!
//! The generated C++ defines every user function before `main`, ordered
//! so callees precede their callers; with no forward declarations in
//! the output, a topological sort of the caller→callee graph is the
//! whole story. A cycle (direct recursion included) cannot be ordered
//! and is a fatal error.

use adderc_par::ast::{Child, Node, Operand, Operator, OperatorNode};
use adderc_util::{Category, CompileError, Handler, Symbol};
use indexmap::{IndexMap, IndexSet};

/// All function declarations of a program, keyed by name in source
/// order. Nested declarations are hoisted into the same table.
pub fn collect_functions(program: &[Node]) -> IndexMap<Symbol, &OperatorNode> {
    let mut functions = IndexMap::new();
    for node in program {
        collect_into(node, &mut functions);
    }
    functions
}

fn collect_into<'a>(node: &'a Node, functions: &mut IndexMap<Symbol, &'a OperatorNode>) {
    let op = match node.as_operator() {
        Some(op) => op,
        None => return,
    };

    if op.op == Operator::FuncDeclare {
        let name = op
            .tree(Operand::FunctionName)
            .as_name()
            .expect("function name is a name node")
            .id;
        functions.insert(name, op);
    }

    for child in op.operands.values() {
        match child {
            Child::Tree(node) => collect_into(node, functions),
            Child::Group(nodes) => {
                for node in nodes {
                    collect_into(node, functions);
                }
            },
            Child::Params(params) => {
                for param in params {
                    if let Some(default) = &param.default {
                        collect_into(default, functions);
                    }
                }
            },
            Child::SliceRange { start, end } => {
                if let Some(start) = start {
                    collect_into(start, functions);
                }
                collect_into(end, functions);
            },
            Child::Branches { truthy, falsy } => {
                collect_into(truthy, functions);
                collect_into(falsy, functions);
            },
        }
    }
}

/// Orders function names so every callee comes before its callers.
///
/// Returns the emission order, or the cycle error.
pub fn emission_order(
    functions: &IndexMap<Symbol, &OperatorNode>,
    handler: &Handler,
) -> Result<Vec<Symbol>, CompileError> {
    // caller -> set of user-function callees
    let mut callees: IndexMap<Symbol, IndexSet<Symbol>> = IndexMap::new();
    for (name, op) in functions {
        let mut called = IndexSet::new();
        collect_callees(op.group(Operand::Body), functions, &mut called);
        callees.insert(*name, called);
    }

    let mut order = Vec::with_capacity(functions.len());
    let mut emitted: IndexSet<Symbol> = IndexSet::new();

    while order.len() < functions.len() {
        let mut progressed = false;
        for (name, called) in &callees {
            if emitted.contains(name) {
                continue;
            }
            if called.iter().all(|callee| emitted.contains(callee)) {
                order.push(*name);
                emitted.insert(*name);
                progressed = true;
            }
        }

        if !progressed {
            let stuck: Vec<&str> = callees
                .keys()
                .filter(|name| !emitted.contains(*name))
                .map(|name| name.as_str())
                .collect();
            let line = callees
                .keys()
                .find(|name| !emitted.contains(*name))
                .and_then(|name| functions.get(name))
                .map(|op| op.line)
                .unwrap_or(0);
            return Err(handler.fatal(
                Category::Semantic,
                format!("call graph cycle between function(s): {}", stuck.join(", ")),
                line,
            ));
        }
    }

    Ok(order)
}

/// Walks a body collecting calls to user functions.
fn collect_callees(
    statements: &[Node],
    functions: &IndexMap<Symbol, &OperatorNode>,
    called: &mut IndexSet<Symbol>,
) {
    for node in statements {
        collect_callees_node(node, functions, called);
    }
}

fn collect_callees_node(
    node: &Node,
    functions: &IndexMap<Symbol, &OperatorNode>,
    called: &mut IndexSet<Symbol>,
) {
    let op = match node.as_operator() {
        Some(op) => op,
        None => return,
    };

    if op.op == Operator::FunctionCall {
        let callee = op
            .tree(Operand::FunctionName)
            .as_name()
            .expect("callee is a name node")
            .id;
        if functions.contains_key(&callee) {
            called.insert(callee);
        }
    }

    for child in op.operands.values() {
        match child {
            Child::Tree(node) => collect_callees_node(node, functions, called),
            Child::Group(nodes) => collect_callees(nodes, functions, called),
            Child::Params(params) => {
                for param in params {
                    if let Some(default) = &param.default {
                        collect_callees_node(default, functions, called);
                    }
                }
            },
            Child::SliceRange { start, end } => {
                if let Some(start) = start {
                    collect_callees_node(start, functions, called);
                }
                collect_callees_node(end, functions, called);
            },
            Child::Branches { truthy, falsy } => {
                collect_callees_node(truthy, functions, called);
                collect_callees_node(falsy, functions, called);
            },
        }
    }
}
