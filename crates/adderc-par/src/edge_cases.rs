//! Edge case tests for adderc-par.

use adderc_util::CompileError;

use crate::ast::{Child, Literal, Node, OpSym, Operand, Operator};
use crate::test_util::{parse_err, parse_ok};

// ==================== STATEMENT EDGES ====================

#[test]
fn test_edge_empty_program() {
    assert!(parse_ok("").is_empty());
    assert!(parse_ok("\n\n\n").is_empty());
    assert!(parse_ok("# comments only\n# another\n").is_empty());
}

#[test]
fn test_edge_deeply_nested_suites() {
    let source = "\
x = 10
if x > 0:
    while x > 0:
        if x == 5:
            x = x - 2
        else:
            x = x - 1
";
    let ast = parse_ok(source);
    assert_eq!(ast.len(), 2);
    let outer = ast[1].as_operator().unwrap();
    let body = outer.group(Operand::Body);
    assert_eq!(body[0].as_operator().unwrap().op, Operator::While);
}

#[test]
fn test_edge_elif_ladder() {
    let source = "\
x = 3
if x == 1:
    y = 1
elif x == 2:
    y = 2
elif x == 3:
    y = 3
else:
    y = 0
";
    let ast = parse_ok(source);
    let first = ast[1].as_operator().unwrap();
    let second = first.tree(Operand::Alternative).as_operator().unwrap();
    assert_eq!(second.op, Operator::Elif);
    let third = second.tree(Operand::Alternative).as_operator().unwrap();
    assert_eq!(third.op, Operator::Elif);
    assert_eq!(third.group(Operand::Alternative).len(), 1);
}

#[test]
fn test_edge_docstring_statement() {
    let ast = parse_ok("\"\"\"module docstring\"\"\"\nx = 1\n");
    assert!(matches!(ast[0], Node::Literal(Literal::Str(_))));
}

#[test]
fn test_edge_bracketed_condition_spans_lines() {
    let source = "x = 1\nif (x == 1 or\n        x == 2):\n    y = 1\n";
    let ast = parse_ok(source);
    let cond = ast[1].as_operator().unwrap();
    assert_eq!(
        cond.tree(Operand::Condition).as_operator().unwrap().op,
        Operator::Sym(OpSym::Or)
    );
}

#[test]
fn test_edge_assignment_chain_mixed_dispositions() {
    // b exists, c does not: assign wraps var_declare
    let ast = parse_ok("b = 0\nb = c = 1\n");
    let outer = ast[1].as_operator().unwrap();
    assert_eq!(outer.op, Operator::Assign);
    let inner = outer.tree(Operand::Right).as_operator().unwrap();
    assert_eq!(inner.op, Operator::VarDeclare);
}

#[test]
fn test_edge_while_scope_leaks_names() {
    // if/while suites do not open a scope; their names survive
    let ast = parse_ok("x = 3\nwhile x > 0:\n    found = x\n    x = x - 1\ny = found\n");
    assert_eq!(ast.len(), 3);
}

#[test]
fn test_edge_method_call_on_literal_result() {
    let ast = parse_ok("text = \"a,b\"\nparts = text.split(\",\")\n");
    let declare = ast[1].as_operator().unwrap();
    assert_eq!(
        declare.tree(Operand::Right).as_operator().unwrap().op,
        Operator::MethodCall
    );
}

#[test]
fn test_edge_call_argument_is_call() {
    let ast = parse_ok("x = len(range(3))\n");
    let declare = ast[0].as_operator().unwrap();
    let outer = declare.tree(Operand::Right).as_operator().unwrap();
    assert_eq!(outer.op, Operator::FunctionCall);
    let args = outer.group(Operand::Arguments);
    assert_eq!(args[0].as_operator().unwrap().op, Operator::FunctionCall);
}

#[test]
fn test_edge_subscript_of_call() {
    let ast = parse_ok("first = list(range(3))[0]\n");
    let declare = ast[0].as_operator().unwrap();
    assert_eq!(
        declare.tree(Operand::Right).as_operator().unwrap().op,
        Operator::Indexing
    );
}

#[test]
fn test_edge_ternary_in_return() {
    let ast = parse_ok("def sign(n):\n    return 1 if n > 0 else -1\n");
    let body = ast[0].as_operator().unwrap().group(Operand::Body).to_vec();
    let ret = body[0].as_operator().unwrap();
    assert_eq!(
        ret.tree(Operand::Center).as_operator().unwrap().op,
        Operator::Ternary
    );
}

#[test]
fn test_edge_nested_ternary_right_leaning() {
    let ast = parse_ok("a = 1\nx = a if a else a if a else a\n");
    let declare = ast[1].as_operator().unwrap();
    let outer = declare.tree(Operand::Right).as_operator().unwrap();
    assert_eq!(outer.op, Operator::Ternary);
    match outer.child(Operand::Values) {
        Some(Child::Branches { falsy, .. }) => {
            assert_eq!(falsy.as_operator().unwrap().op, Operator::Ternary);
        },
        other => panic!("expected branches, found {:?}", other),
    }
}

// ==================== ERROR CATEGORY EDGES ====================

#[test]
fn test_edge_error_categories_distinct() {
    assert!(matches!(parse_err("a = `\n"), CompileError::Lex { .. }));
    assert!(matches!(
        parse_err("if x:\ny = 1\n"),
        CompileError::Indentation { .. }
    ));
    assert!(matches!(
        parse_err("x = = 1\n"),
        CompileError::Parse { .. }
    ));
    assert!(matches!(
        parse_err("x = ghost\n"),
        CompileError::Semantic { .. }
    ));
}

#[test]
fn test_edge_break_line_preserved() {
    let err = parse_err("x = 1\nif x:\n    break\n");
    assert!(matches!(err, CompileError::Semantic { .. }));
    assert_eq!(err.line(), 3);
}

#[test]
fn test_edge_suite_needs_newline() {
    // one-line suites are not in the grammar
    let err = parse_err("if True: x = 1\n");
    assert!(matches!(
        err,
        CompileError::Parse { .. } | CompileError::Indentation { .. }
    ));
}

#[test]
fn test_edge_dangling_else_rejected() {
    let err = parse_err("x = 1\nelse:\n    y = 1\n");
    assert!(matches!(err, CompileError::Parse { .. }));
}

#[test]
fn test_edge_unclosed_paren() {
    let err = parse_err("x = (1 + 2\n");
    assert!(matches!(err, CompileError::Parse { .. }));
}

#[test]
fn test_edge_first_error_aborts() {
    // both statements are bad; only the first is reported
    let handler = adderc_util::Handler::new();
    let tokens = adderc_lex::lex("a = ghost\nb = phantom\n", &handler).unwrap();
    let result = crate::Parser::new(tokens, &handler).parse();
    assert!(result.is_err());
    assert_eq!(handler.error_count(), 1);
}
