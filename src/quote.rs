//! `quote`/`unquote` (spec §4.2-§4.3): `quote(expr)` suspends `expr`
//! unevaluated into a `Value::Quote`, except that any `unquote(x)` call
//! nested inside it is evaluated eagerly against the calling environment
//! and spliced back in as a literal AST node. Built directly on
//! `ast::modifier`'s post-order rewrite, the same way the macro expander in
//! `macro_expand.rs` reuses it for call-site rewriting — this crate has a
//! single tree-walk, used twice.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::{modifier, Expression};
use crate::evaluator::{eval_expression, BuiltinTable};
use crate::object::{Environment, Value};

/// Evaluates `expr` with every nested `unquote(x)` call replaced by the
/// literal node corresponding to evaluating `x` in `env`. Always succeeds:
/// an `unquote` argument that evaluates to anything other than an Integer,
/// Boolean, or Quote (including an Error) is left as-is, per spec §4.3 —
/// there is no error path for quote/unquote itself.
pub fn quote(expr: &Expression, env: &Rc<RefCell<Environment>>, builtins: &BuiltinTable) -> Value {
    let mut eval_unquote_calls = |node: Expression| eval_unquoted(node, env, builtins);
    let rewritten = modifier::modify_expression(expr.clone(), &mut eval_unquote_calls);
    Value::Quote(rewritten)
}

fn is_unquote_call(expr: &Expression) -> Option<&Expression> {
    match expr {
        Expression::Call { function, arguments } if arguments.len() == 1 => match function.as_ref() {
            Expression::Identifier(name) if name == "unquote" => Some(&arguments[0]),
            _ => None,
        },
        _ => None,
    }
}

fn eval_unquoted(node: Expression, env: &Rc<RefCell<Environment>>, builtins: &BuiltinTable) -> Expression {
    let Some(argument) = is_unquote_call(&node) else {
        return node;
    };

    match eval_expression(argument, env, builtins) {
        Ok(Value::Integer(i)) => Expression::IntegerLiteral(i),
        Ok(Value::Boolean(b)) => Expression::BooleanLiteral(b),
        Ok(Value::Quote(quoted)) => quoted,
        // anything else (String, Array, an Error, ...) has no literal AST
        // form to splice in, so the unquote call is left untouched.
        _ => node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::*;

    fn quote_in_fresh_env(expr: Expression) -> Value {
        let env = Rc::new(RefCell::new(Environment::new()));
        quote(&expr, &env, &BuiltinTable::new())
    }

    #[test]
    fn quote_without_unquote_is_left_untouched() {
        let expr = infix("+", int(1), int(2));
        match quote_in_fresh_env(expr.clone()) {
            Value::Quote(quoted) => assert_eq!(quoted, expr),
            other => panic!("expected Quote, got {:?}", other),
        }
    }

    #[test]
    fn unquote_splices_in_an_evaluated_integer() {
        // quote(4 + unquote(2 + 2))  ->  quote(4 + 4)
        let expr = infix("+", int(4), call(ident("unquote"), vec![infix("+", int(2), int(2))]));
        match quote_in_fresh_env(expr) {
            Value::Quote(quoted) => assert_eq!(quoted, infix("+", int(4), int(4))),
            other => panic!("expected Quote, got {:?}", other),
        }
    }

    #[test]
    fn unquote_can_reference_a_bound_identifier() {
        let env = Rc::new(RefCell::new(Environment::new()));
        env.borrow_mut().set("eight", Value::Integer(8));
        let expr = call(ident("unquote"), vec![ident("eight")]);
        match quote(&expr, &env, &BuiltinTable::new()) {
            Value::Quote(quoted) => assert_eq!(quoted, int(8)),
            other => panic!("expected Quote, got {:?}", other),
        }
    }

    #[test]
    fn unquote_can_splice_in_a_previously_quoted_expression() {
        let env = Rc::new(RefCell::new(Environment::new()));
        env.borrow_mut().set("quoted_infix_expr", Value::Quote(infix("+", int(1), int(1))));
        let expr = call(ident("unquote"), vec![ident("quoted_infix_expr")]);
        match quote(&expr, &env, &BuiltinTable::new()) {
            Value::Quote(quoted) => assert_eq!(quoted, infix("+", int(1), int(1))),
            other => panic!("expected Quote, got {:?}", other),
        }
    }

    #[test]
    fn unquote_of_a_string_value_is_left_as_is() {
        let env = Rc::new(RefCell::new(Environment::new()));
        env.borrow_mut().set("name", Value::String("bob".into()));
        let expr = call(ident("unquote"), vec![ident("name")]);
        let original = expr.clone();
        match quote(&expr, &env, &BuiltinTable::new()) {
            Value::Quote(quoted) => assert_eq!(quoted, original),
            other => panic!("expected Quote, got {:?}", other),
        }
    }
}
