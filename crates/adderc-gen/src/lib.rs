//! adderc-gen - C++ emission for the Adder language.
//!
//! Walks the lowered AST and produces one C++ translation unit over the
//! boxed-value runtime: literals spawn runtime values, builtins live in
//! the `BF::` namespace, user functions in `UF::`, and every user call
//! routes its arguments through the `UF::pack_args` helper.
//!
//! User functions emit before `main`, ordered by [`topo::emission_order`]
//! so callees precede callers. The [`lower`] pass runs first and writes
//! the two emitter-owned operand slots: loop-else guard flags
//! (DONT_ELSE) and the argument-refresh parameter lists on returns
//! (UPDATE_ARGS).
//!
//! A malformed tree - a missing operand, a wrong child shape - panics
//! through the AST accessors; only call-graph cycles surface as user
//! diagnostics here.

pub mod lower;
pub mod topo;

use adderc_par::ast::{Child, Literal, Node, OpSym, Operand, Operator, OperatorNode};
use adderc_sem::builtins::is_builtin;
use adderc_util::{CompileError, Handler, Symbol};

/// C++ emitter for one lowered program.
pub struct Generator<'a> {
    handler: &'a Handler,
    /// Loop-else guard flags of the enclosing loops, innermost last.
    /// `None` marks a loop without an else clause.
    loop_flags: Vec<Option<Symbol>>,
    /// Counter for unpack temporaries.
    next_unpack: u32,
}

impl<'a> Generator<'a> {
    /// Creates a generator reporting through `handler`.
    pub fn new(handler: &'a Handler) -> Self {
        Self {
            handler,
            loop_flags: Vec::new(),
            next_unpack: 0,
        }
    }

    /// Lowers and emits a whole program.
    pub fn generate(&mut self, mut program: Vec<Node>) -> Result<String, CompileError> {
        lower::lower_program(&mut program);

        let functions = topo::collect_functions(&program);
        let order = topo::emission_order(&functions, self.handler)?;

        let mut out = String::new();
        out.push_str("// Generated by the adderc compiler.\n");
        out.push_str("#include \"runtime/Headers.hpp\"\n\n");

        if !order.is_empty() {
            out.push_str("namespace UF {\n");
            for name in &order {
                out.push_str(&self.emit_function(*name, functions[name]));
            }
            out.push_str("}  // namespace UF\n\n");
        }

        out.push_str("int main() {\n");
        out.push_str(&self.emit_statements(&program));
        out.push_str("return 0;\n}\n");
        Ok(out)
    }

    // ======================== function emission =========================

    /// Emits one user function definition.
    ///
    /// The body unpacks its parameters from the argument pack up front;
    /// lowering guarantees a terminal return that refreshes the pack.
    fn emit_function(&mut self, name: Symbol, op: &OperatorNode) -> String {
        let params = op.params(Operand::Arguments);

        let mut out = format!("Var {}(ArgPack& args) {{\n", name);
        for (index, param) in params.iter().enumerate() {
            let param_name = param.name.as_name().expect("parameter name").id;
            match &param.default {
                None => {
                    out.push_str(&format!("auto {} = args.at({});\n", param_name, index));
                },
                Some(default) => {
                    out.push_str(&format!(
                        "auto {} = args.size() > {} ? args.at({}) : {};\n",
                        param_name,
                        index,
                        index,
                        self.emit_expr(default)
                    ));
                },
            }
        }

        out.push_str(&self.emit_statements(op.group(Operand::Body)));
        out.push_str("}\n\n");
        out
    }

    // ======================== statement emission ========================

    /// Emits a statement group, one terminated line per statement.
    ///
    /// Bare literals and names at statement position have no effect and
    /// emit as comments, the way the original generator documents them.
    fn emit_statements(&mut self, statements: &[Node]) -> String {
        let mut out = String::new();
        for node in statements {
            match node {
                Node::Operator(op) => {
                    out.push_str(&self.emit_statement(op));
                    out.push_str(";\n");
                },
                other => {
                    out.push_str(&format!("// {}\n", self.emit_expr(other)));
                },
            }
        }
        out
    }

    /// Emits one statement-position operator.
    fn emit_statement(&mut self, op: &OperatorNode) -> String {
        match op.op {
            Operator::VarDeclare | Operator::Assign => self.emit_assignation(op),
            Operator::UnpackAssign => self.emit_unpack_assignation(op),
            Operator::If | Operator::Elif => self.emit_conditional(op),
            Operator::While => self.emit_while(op),
            Operator::For => self.emit_for(op),
            Operator::Return => self.emit_return(op),
            Operator::Pass => "// pass".to_string(),
            Operator::Break => self.emit_break(),
            Operator::Continue => "continue".to_string(),
            Operator::FuncDeclare => {
                let name = op.tree(Operand::FunctionName).as_name().expect("name").id;
                format!("// function '{}' is defined in namespace UF", name)
            },
            Operator::ClassDeclare => {
                let name = op.tree(Operand::ClassName).as_name().expect("name").id;
                format!("// class '{}' is not emitted yet", name)
            },
            Operator::Sym(sym) if sym.is_compound_assign() => self.emit_compound_assign(op, sym),
            _ => self.emit_operator_expr(op),
        }
    }

    /// Emits `var_declare` / `assign`, hoisting a chained assignment on
    /// the right into its own statement first.
    fn emit_assignation(&mut self, op: &OperatorNode) -> String {
        let left = self.emit_expr(op.tree(Operand::Left));
        let right = op.tree(Operand::Right);

        let mut code = String::new();
        let right_text = match right.as_operator() {
            Some(inner)
                if matches!(inner.op, Operator::VarDeclare | Operator::Assign) =>
            {
                code.push_str(&self.emit_statement(inner));
                code.push_str(";\n");
                self.emit_expr(inner.tree(Operand::Left))
            },
            _ => self.emit_expr(right),
        };

        let auto = if op.op == Operator::VarDeclare { "auto " } else { "" };
        code.push_str(&format!("{}{} = {}", auto, left, right_text));
        code
    }

    /// Emits `a, b, ... = value` through an unpack temporary.
    fn emit_unpack_assignation(&mut self, op: &OperatorNode) -> String {
        let value = self.emit_expr(op.tree(Operand::Right));
        let temp = format!("unpacked_{}", self.next_unpack);
        self.next_unpack += 1;

        let mut out = format!("auto {} = {};\n", temp, value);
        let targets = op.group(Operand::Left);
        for (index, target) in targets.iter().enumerate() {
            let name = self.emit_expr(target);
            out.push_str(&format!("auto {} = (*{})[{}]", name, temp, index));
            if index + 1 < targets.len() {
                out.push_str(";\n");
            }
        }
        out
    }

    /// Emits an if/elif chain with its alternatives.
    fn emit_conditional(&mut self, op: &OperatorNode) -> String {
        let condition = self.emit_expr(op.tree(Operand::Condition));
        let body = self.emit_statements(op.group(Operand::Body));

        let keyword = if op.op == Operator::If { "if" } else { "else if" };
        let mut out = format!("{} ({}) {{\n{}}}", keyword, condition, body);

        match op.child(Operand::Alternative) {
            None => {},
            Some(Child::Tree(arm)) => {
                let arm = arm.as_operator().expect("elif arm is an operator");
                out.push('\n');
                out.push_str(&self.emit_statement(arm));
            },
            Some(Child::Group(_)) => {
                let else_body = self.emit_statements(op.group(Operand::Alternative));
                out.push_str(&format!("\nelse {{\n{}}}", else_body));
            },
            other => panic!("conditional alternative holds {:?}", other),
        }
        out
    }

    /// Emits a while loop with its optional loop-else guard.
    fn emit_while(&mut self, op: &OperatorNode) -> String {
        let condition = self.emit_expr(op.tree(Operand::Condition));
        let flag = self.loop_flag(op);

        self.loop_flags.push(flag);
        let body = self.emit_statements(op.group(Operand::Body));
        self.loop_flags.pop();

        let mut out = String::new();
        if let Some(flag) = flag {
            out.push_str(&format!("bool {} = true;\n", flag));
        }
        out.push_str(&format!("while ({}) {{\n{}}}", condition, body));
        self.append_loop_else(&mut out, op, flag);
        out
    }

    /// Emits a for loop; a single symbol iterates directly, several
    /// symbols unpack each element.
    fn emit_for(&mut self, op: &OperatorNode) -> String {
        let iterable = self.emit_expr(op.tree(Operand::ForLiteral));
        let symbols = op.group(Operand::Symbols);
        let flag = self.loop_flag(op);

        self.loop_flags.push(flag);
        let body = self.emit_statements(op.group(Operand::Body));
        self.loop_flags.pop();

        let mut out = String::new();
        if let Some(flag) = flag {
            out.push_str(&format!("bool {} = true;\n", flag));
        }

        if symbols.len() == 1 {
            let symbol = self.emit_expr(&symbols[0]);
            out.push_str(&format!(
                "for (auto {} : *{}) {{\n{}}}",
                symbol, iterable, body
            ));
        } else {
            let mut unpack = String::new();
            for (index, symbol) in symbols.iter().enumerate() {
                unpack.push_str(&format!(
                    "auto {} = (*item_pack)[{}];\n",
                    self.emit_expr(symbol),
                    index
                ));
            }
            out.push_str(&format!(
                "for (auto item_pack : *{}) {{\n{}{}}}",
                iterable, unpack, body
            ));
        }

        self.append_loop_else(&mut out, op, flag);
        out
    }

    /// The guard flag the lowering pass attached, if any.
    fn loop_flag(&self, op: &OperatorNode) -> Option<Symbol> {
        op.child(Operand::DontElse)
            .map(|child| match child {
                Child::Tree(node) => node.as_name().expect("guard flag is a name").id,
                other => panic!("DONT_ELSE holds {:?}", other),
            })
    }

    /// Appends the guarded else body after a loop.
    fn append_loop_else(&mut self, out: &mut String, op: &OperatorNode, flag: Option<Symbol>) {
        if op.child(Operand::Alternative).is_none() {
            return;
        }
        let flag = flag.expect("lowering attached a flag to every loop with an else");
        let body = self.emit_statements(op.group(Operand::Alternative));
        out.push_str(&format!("\nif ({}) {{\n{}}}", flag, body));
    }

    /// Emits `break`, clearing the innermost loop's else guard first.
    fn emit_break(&mut self) -> String {
        match self.loop_flags.last() {
            Some(Some(flag)) => format!("{{ {} = false; break; }}", flag),
            _ => "break".to_string(),
        }
    }

    /// Emits `return`, refreshing the argument pack first.
    fn emit_return(&mut self, op: &OperatorNode) -> String {
        let mut out = String::new();
        if let Some(Child::Params(params)) = op.child(Operand::UpdateArgs) {
            let names: Vec<String> = params
                .iter()
                .map(|param| param.name.as_name().expect("parameter name").id.to_string())
                .collect();
            out.push_str(&format!("args.update({{{}}});\n", names.join(", ")));
        }

        let value = match op.child(Operand::Center) {
            Some(Child::Tree(node)) => self.emit_expr(node),
            Some(Child::Group(values)) => {
                let parts: Vec<String> =
                    values.iter().map(|value| self.emit_expr(value)).collect();
                format!("Tuple::spawn({{{}}})", parts.join(", "))
            },
            other => panic!("return value holds {:?}", other),
        };
        out.push_str(&format!("return {}", value));
        out
    }

    /// Emits `a op= b`; floor division and power have no C++ operator
    /// and expand through their BF helpers.
    fn emit_compound_assign(&mut self, op: &OperatorNode, sym: OpSym) -> String {
        let left = self.emit_expr(op.tree(Operand::Left));
        let right = self.emit_expr(op.tree(Operand::Right));
        match sym {
            OpSym::FloorDivAssign => {
                format!("{} = BF::floor_div({}, {})", left, left, right)
            },
            OpSym::PowAssign => format!("{} = BF::pow({}, {})", left, left, right),
            _ => format!("{} {} {}", left, sym.as_str(), right),
        }
    }

    // ======================= expression emission ========================

    /// Emits one expression-position node.
    fn emit_expr(&mut self, node: &Node) -> String {
        match node {
            Node::Literal(literal) => self.emit_literal(literal),
            Node::Name(name) => name.id.to_string(),
            Node::Operator(op) => self.emit_operator_expr(op),
        }
    }

    /// Emits a literal as a boxed runtime value.
    fn emit_literal(&mut self, literal: &Literal) -> String {
        match literal {
            Literal::Int(value) => format!("Number::spawn({})", value),
            Literal::Float(value) => format!("Number::spawn({:?})", value),
            Literal::Bool(value) => format!("Bool::spawn({})", value),
            Literal::Str(value) => format!("String::spawn(\"{}\")", value),
            Literal::None => "None::spawn()".to_string(),
            Literal::List(items) => format!("List::spawn({})", self.emit_elements(items)),
            Literal::Tuple(items) => format!("Tuple::spawn({})", self.emit_elements(items)),
            Literal::Set(items) => format!("Set::spawn({})", self.emit_elements(items)),
            Literal::Dict(pairs) => {
                if pairs.is_empty() {
                    return "Dictionary::spawn()".to_string();
                }
                let parts: Vec<String> = pairs
                    .iter()
                    .map(|(key, value)| {
                        format!("{{ {}, {} }}", self.emit_expr(key), self.emit_expr(value))
                    })
                    .collect();
                format!("Dictionary::spawn({{{}}})", parts.join(", "))
            },
        }
    }

    /// Emits a structure literal's element braces, or nothing when
    /// empty.
    fn emit_elements(&mut self, items: &[Node]) -> String {
        if items.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = items.iter().map(|item| self.emit_expr(item)).collect();
        format!("{{{}}}", parts.join(", "))
    }

    /// Emits an expression-position operator.
    fn emit_operator_expr(&mut self, op: &OperatorNode) -> String {
        match op.op {
            Operator::Ternary => self.emit_ternary(op),
            Operator::FunctionCall => self.emit_function_call(op),
            Operator::MethodCall => self.emit_method_call(op),
            Operator::AttributeCall => self.emit_attribute_call(op),
            Operator::Slicing => self.emit_slicing(op),
            Operator::Indexing => self.emit_indexing(op),
            Operator::Sym(sym) => self.emit_sym(op, sym),
            other => panic!("operator '{}' is not an expression", other.as_str()),
        }
    }

    fn emit_ternary(&mut self, op: &OperatorNode) -> String {
        let condition = self.emit_expr(op.tree(Operand::Condition));
        match op.child(Operand::Values) {
            Some(Child::Branches { truthy, falsy }) => {
                let truthy = self.emit_expr(truthy);
                let falsy = self.emit_expr(falsy);
                format!("({})? {} : {}", condition, truthy, falsy)
            },
            other => panic!("ternary values hold {:?}", other),
        }
    }

    /// Emits a call: builtins through `BF::` (reserved C++ names gain a
    /// trailing underscore), user functions through the pack helper.
    fn emit_function_call(&mut self, op: &OperatorNode) -> String {
        let name = op.tree(Operand::FunctionName).as_name().expect("callee").id;
        let arguments: Vec<String> = op
            .group(Operand::Arguments)
            .iter()
            .map(|argument| self.emit_expr(argument))
            .collect();
        let arguments = arguments.join(", ");

        if is_builtin(name.as_str()) {
            let mut text = name.to_string();
            if matches!(text.as_str(), "bool" | "float" | "int") {
                text.push('_');
            }
            format!("BF::{}({})", text, arguments)
        } else {
            format!("UF::{}(UF::pack_args({}))", name, arguments)
        }
    }

    /// Emits a method call on its instance.
    fn emit_method_call(&mut self, op: &OperatorNode) -> String {
        let instance = self.emit_expr(op.tree(Operand::Instance));
        let method = op.tree(Operand::Method).as_operator().expect("method call");

        let name = method
            .tree(Operand::FunctionName)
            .as_name()
            .expect("method name")
            .id;
        let arguments: Vec<String> = method
            .group(Operand::Arguments)
            .iter()
            .map(|argument| self.emit_expr(argument))
            .collect();
        format!("{}->{}({})", instance, name, arguments.join(", "))
    }

    /// Emits member access; nested chains flatten to `a->b->c`.
    fn emit_attribute_call(&mut self, op: &OperatorNode) -> String {
        let left = self.emit_expr(op.tree(Operand::Left));
        let right = self.emit_expr(op.tree(Operand::Right));
        format!("{}->{}", left, right)
    }

    fn emit_slicing(&mut self, op: &OperatorNode) -> String {
        let instance = self.emit_expr(op.tree(Operand::Instance));
        match op.child(Operand::Slice) {
            Some(Child::SliceRange { start, end }) => {
                let end = self.emit_expr(end);
                match start {
                    Some(start) => {
                        let start = self.emit_expr(start);
                        format!("(*{})[Slice({}, {})]", instance, start, end)
                    },
                    None => format!("(*{})[Slice({})]", instance, end),
                }
            },
            other => panic!("slicing holds {:?}", other),
        }
    }

    fn emit_indexing(&mut self, op: &OperatorNode) -> String {
        let instance = self.emit_expr(op.tree(Operand::Instance));
        let index = self.emit_expr(op.tree(Operand::Index));
        format!("(*{})[{}]", instance, index)
    }

    /// Emits a concrete operator symbol, unary when only CENTER is set.
    fn emit_sym(&mut self, op: &OperatorNode, sym: OpSym) -> String {
        if op.child(Operand::Center).is_some() {
            return self.emit_unary(op, sym);
        }

        let left = self.emit_expr(op.tree(Operand::Left));
        let right = self.emit_expr(op.tree(Operand::Right));

        let text = match sym {
            OpSym::Pow => return self.wrap(op, format!("BF::pow({}, {})", left, right)),
            OpSym::FloorDiv => {
                return self.wrap(op, format!("BF::floor_div({}, {})", left, right));
            },
            OpSym::In => return self.wrap(op, format!("{}->contains({})", right, left)),
            OpSym::NotIn => {
                return self.wrap(op, format!("!{}->contains({})", right, left));
            },
            OpSym::Is => {
                return self.wrap(op, format!("BF::id({}) == BF::id({})", left, right));
            },
            OpSym::IsNot => {
                return self.wrap(op, format!("BF::id({}) != BF::id({})", left, right));
            },
            OpSym::And => "&&",
            OpSym::Or => "||",
            _ => sym.as_str(),
        };

        self.wrap(op, format!("{} {} {}", left, text, right))
    }

    /// Emits a unary operator over its CENTER operand.
    fn emit_unary(&mut self, op: &OperatorNode, sym: OpSym) -> String {
        let operand = self.emit_expr(op.tree(Operand::Center));
        let text = match sym {
            OpSym::Not => "!",
            _ => sym.as_str(),
        };
        self.wrap(op, format!("{} {}", text, operand))
    }

    /// Reinstates source parentheses around an emitted expression.
    fn wrap(&self, op: &OperatorNode, text: String) -> String {
        if op.parenthesized {
            format!("({})", text)
        } else {
            text
        }
    }
}
