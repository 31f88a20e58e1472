//! adderc-drv - Pipeline façade.
//!
//! Ties the phases together: scan → indentation → finalize → parse →
//! emit. One [`Compiler`] services one source buffer per invocation;
//! state resets at the start of each call, so an instance can be reused
//! across compilations. The core performs no I/O: source comes in as a
//! string, C++ text goes out as a string, and the diagnostics list is
//! readable afterwards either way.

use adderc_gen::Generator;
use adderc_par::ast::Node;
use adderc_par::Parser;
use adderc_util::{CompileError, Diagnostic, Handler};

/// Front-to-back compiler for one source buffer at a time.
#[derive(Default)]
pub struct Compiler {
    handler: Handler,
}

impl Compiler {
    /// Creates a compiler with an empty diagnostics list.
    pub fn new() -> Self {
        Self {
            handler: Handler::new(),
        }
    }

    /// Runs the front end only: source text to top-level AST.
    pub fn parse(&self, source: &str) -> Result<Vec<Node>, CompileError> {
        self.handler.clear();
        let tokens = adderc_lex::lex(source, &self.handler)?;
        Parser::new(tokens, &self.handler).parse()
    }

    /// Runs the whole pipeline: source text to C++ text.
    pub fn compile(&self, source: &str) -> Result<String, CompileError> {
        let program = self.parse(source)?;
        Generator::new(&self.handler).generate(program)
    }

    /// Diagnostics recorded by the last `parse`/`compile` call.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.handler.diagnostics()
    }
}
