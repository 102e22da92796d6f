//! Generic post-order AST rewriter (spec §4.4), the single recursion point
//! `quote`'s unquote-splicing and the macro expander's call-site rewriting
//! both build on, so the tree-walk itself is written once (spec §9: "avoid
//! duplicating it across quote and macro paths").
//!
//! Every concrete use of this crate's modifier only ever replaces
//! *expressions* (an unquote call becomes a literal; a macro call becomes
//! whatever its expansion evaluates to), so the modifier function is typed
//! `Expression -> Expression`. Statements, blocks, and programs are walked
//! structurally — every field that can hold an expression is rewritten —
//! but are never themselves handed to the modifier, since nothing in this
//! crate ever needs to replace a whole statement.

use crate::ast::{Block, Expression, Program, Statement};

pub fn modify_program(program: Program, modifier: &mut dyn FnMut(Expression) -> Expression) -> Program {
    Program {
        statements: program
            .statements
            .into_iter()
            .map(|s| modify_statement(s, modifier))
            .collect(),
    }
}

pub fn modify_block(block: Block, modifier: &mut dyn FnMut(Expression) -> Expression) -> Block {
    Block {
        statements: block
            .statements
            .into_iter()
            .map(|s| modify_statement(s, modifier))
            .collect(),
    }
}

pub fn modify_statement(statement: Statement, modifier: &mut dyn FnMut(Expression) -> Expression) -> Statement {
    match statement {
        Statement::Let { name, value } => Statement::Let {
            name,
            value: modify_expression(value, modifier),
        },
        Statement::Return(value) => Statement::Return(modify_expression(value, modifier)),
        Statement::Expression(value) => Statement::Expression(modify_expression(value, modifier)),
    }
}

/// Rewrites children first, then hands the rebuilt node to `modifier`.
/// Leaves (literals, identifiers) have no children and go straight to
/// `modifier`, which is free to return them unchanged.
pub fn modify_expression(
    expression: Expression,
    modifier: &mut dyn FnMut(Expression) -> Expression,
) -> Expression {
    let rewritten = match expression {
        Expression::Prefix { operator, right } => Expression::Prefix {
            operator,
            right: Box::new(modify_expression(*right, modifier)),
        },
        Expression::Infix {
            operator,
            left,
            right,
        } => Expression::Infix {
            operator,
            left: Box::new(modify_expression(*left, modifier)),
            right: Box::new(modify_expression(*right, modifier)),
        },
        Expression::If {
            condition,
            consequence,
            alternative,
        } => Expression::If {
            condition: Box::new(modify_expression(*condition, modifier)),
            consequence: modify_block(consequence, modifier),
            alternative: alternative.map(|block| modify_block(block, modifier)),
        },
        Expression::FunctionLiteral { parameters, body } => Expression::FunctionLiteral {
            parameters,
            body: modify_block(body, modifier),
        },
        Expression::MacroLiteral { parameters, body } => Expression::MacroLiteral {
            parameters,
            body: modify_block(body, modifier),
        },
        Expression::Call {
            function,
            arguments,
        } => Expression::Call {
            function: Box::new(modify_expression(*function, modifier)),
            arguments: arguments
                .into_iter()
                .map(|arg| modify_expression(arg, modifier))
                .collect(),
        },
        Expression::ArrayLiteral(elements) => Expression::ArrayLiteral(
            elements
                .into_iter()
                .map(|e| modify_expression(e, modifier))
                .collect(),
        ),
        Expression::Index { left, index } => Expression::Index {
            left: Box::new(modify_expression(*left, modifier)),
            index: Box::new(modify_expression(*index, modifier)),
        },
        Expression::HashLiteral(pairs) => Expression::HashLiteral(
            pairs
                .into_iter()
                .map(|(k, v)| (modify_expression(k, modifier), modify_expression(v, modifier)))
                .collect(),
        ),
        leaf @ (Expression::IntegerLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::StringLiteral(_)
        | Expression::Identifier(_)) => leaf,
    };

    modifier(rewritten)
}
