//! User-defined AST-rewriting macros (spec §4.4): a `define_macros` pass
//! strips `let name = macro(...) { ... }` statements out of a program into
//! a macro environment, then `expand_macros` rewrites every remaining call
//! site whose callee names a macro, replacing the call with whatever
//! quoted expression the macro's body evaluates to. Like `quote.rs`, this
//! reuses `ast::modifier` for the tree-walk rather than hand-rolling a
//! second one.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{modifier, Expression, Program, Statement};
use crate::evaluator::{eval_block, BuiltinTable};
use crate::object::{Environment, Value};

/// Removes every top-level `let name = macro(...) { ... }` statement from
/// `program`, binding each macro's parameters/body/defining-environment
/// into `macro_env` under `name`. Non-macro statements are left in place
/// and in their original order (spec §4.4: only literal macro definitions
/// at the top level are recognized).
pub fn define_macros(program: Program, macro_env: &Rc<RefCell<Environment>>) -> Program {
    let mut statements = Vec::with_capacity(program.statements.len());

    for statement in program.statements {
        if let Some((name, parameters, body)) = as_macro_definition(&statement) {
            let value = Value::Macro {
                parameters,
                body,
                env: Rc::clone(macro_env),
            };
            macro_env.borrow_mut().set(&name, value);
        } else {
            statements.push(statement);
        }
    }

    Program { statements }
}

fn as_macro_definition(statement: &Statement) -> Option<(String, Vec<String>, crate::ast::Block)> {
    match statement {
        Statement::Let {
            name,
            value: Expression::MacroLiteral { parameters, body },
        } => Some((name.clone(), parameters.clone(), body.clone())),
        _ => None,
    }
}

/// Rewrites every call site in `program` whose callee is an identifier
/// bound to a macro in `macro_env`, replacing the call with the literal
/// expression the macro expansion produced. Every argument reaches the
/// macro body unevaluated, wrapped as `Value::Quote`, so the macro can
/// inspect and rearrange the syntax its caller wrote (spec §4.4's `unless`
/// example: the branches are never evaluated out of order because they
/// never get evaluated at all until the rewritten call site does).
pub fn expand_macros(program: Program, macro_env: &Rc<RefCell<Environment>>, builtins: &BuiltinTable) -> Program {
    let mut expand_call_sites = |node: Expression| expand_if_macro_call(node, macro_env, builtins);
    modifier::modify_program(program, &mut expand_call_sites)
}

fn expand_if_macro_call(node: Expression, macro_env: &Rc<RefCell<Environment>>, builtins: &BuiltinTable) -> Expression {
    let Expression::Call { function, arguments } = &node else {
        return node;
    };
    let Expression::Identifier(name) = function.as_ref() else {
        return node;
    };
    let Some(Value::Macro { parameters, body, env }) = macro_env.borrow().get(name) else {
        return node;
    };

    let call_env = Rc::new(RefCell::new(Environment::new_enclosed(&env)));
    for (param, arg) in parameters.iter().zip(arguments.iter()) {
        call_env.borrow_mut().set(param, Value::Quote(arg.clone()));
    }

    // macro bodies use the same evaluator as user code (spec §4.3), so
    // host built-ins are resolved here exactly as they would be in a call,
    // and an explicit `return quote(...)` unwraps the same way it would at
    // a function-call boundary.
    let result = eval_block(&body, &call_env, builtins).map(crate::evaluator::unwrap_return);
    match result {
        Ok(Value::Quote(expr)) => expr,
        _ => {
            eprintln!("we only support returning AST-nodes from macros");
            node
        }
    }
}
