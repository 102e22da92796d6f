pub use monkey::{
    ast::{self, build::*, Program},
    eval,
    object::{Environment, Value},
    BuiltinTable,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Runs `program` through the macro pre-passes and the evaluator with an
/// empty built-in table, mirroring the teacher's `run_program` helper in
/// `tests/common.rs` but built from a hand-constructed `Program` rather
/// than parsed source text (this crate has no parser of its own).
pub fn run(program: Program) -> Value {
    run_with_builtins(program, &BuiltinTable::new())
}

pub fn run_with_builtins(program: Program, builtins: &BuiltinTable) -> Value {
    let macro_env = Rc::new(RefCell::new(Environment::new()));
    let stripped = monkey::macro_expand::define_macros(program, &macro_env);
    let expanded = monkey::macro_expand::expand_macros(stripped, &macro_env, builtins);

    let env = Rc::new(RefCell::new(Environment::new()));
    eval(&expanded, &env, builtins)
}
