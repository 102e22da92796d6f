//! Prefix and infix operator semantics (spec §4.1.1/§4.1.2), mirroring the
//! shape of the teacher's `interpreter/operations.rs`: one function per
//! fixity, matching on the operator token and dispatching on operand
//! variants, returning `Value::Error` (rather than the teacher's
//! `InterpreterError`) on failure so the caller can propagate it with `?`.

use crate::object::Value;

pub fn eval_prefix(operator: &str, right: Value) -> Value {
    match operator {
        "!" => eval_bang(right),
        "-" => eval_minus(right),
        _ => Value::error(format!("unknown operator: {}{}", operator, right.type_name())),
    }
}

fn eval_bang(right: Value) -> Value {
    match right {
        Value::Boolean(b) => Value::Boolean(!b),
        Value::Null => Value::Boolean(true),
        _ => Value::Boolean(false),
    }
}

fn eval_minus(right: Value) -> Value {
    match right {
        Value::Integer(i) => Value::Integer(-i),
        other => Value::error(format!("unknown operator: -{}", other.type_name())),
    }
}

pub fn eval_infix(operator: &str, left: Value, right: Value) -> Value {
    if std::mem::discriminant(&left) != std::mem::discriminant(&right) {
        return Value::error(format!(
            "type mismatch: {} {} {}",
            left.type_name(),
            operator,
            right.type_name()
        ));
    }

    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Value::String(l), Value::String(r)) => eval_string_infix(operator, l, r),
        _ => match operator {
            "==" => Value::Boolean(left == right),
            "!=" => Value::Boolean(left != right),
            _ => Value::Null,
        },
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => Value::Integer(left + right),
        "-" => Value::Integer(left - right),
        "*" => Value::Integer(left * right),
        "/" => match left.checked_div(right) {
            Some(quotient) => Value::Integer(quotient),
            None if right == 0 => Value::error("division by zero"),
            None => Value::error("integer overflow"),
        },
        "<" => Value::Boolean(left < right),
        ">" => Value::Boolean(left > right),
        "==" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),
        _ => Value::error(format!("unknown operator: Integer {} Integer", operator)),
    }
}

fn eval_string_infix(operator: &str, left: &str, right: &str) -> Value {
    match operator {
        "+" => Value::String(format!("{}{}", left, right)),
        _ => Value::error(format!("unknown operator: {}", operator)),
    }
}
