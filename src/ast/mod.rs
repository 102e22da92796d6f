//! Abstract syntax tree types consumed by the evaluator.
//!
//! These types are the contract between this crate and whatever external
//! lexer/parser produces them (see spec §1/§6: the lexer and parser are
//! treated as given collaborators and are not part of this crate). The
//! evaluator only depends on the shape of these nodes, never on how they
//! were constructed, so the small `build` helpers below (used by tests and
//! by `quote`/the macro expander when synthesizing replacement nodes) are
//! just as legitimate a way to produce them as a real parser would be.

pub mod modifier;

/// A full program: an ordered sequence of top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// A sequence of statements forming the body of a block (if/function/macro).
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let { name: String, value: Expression },
    Return(Expression),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    IntegerLiteral(i64),
    BooleanLiteral(bool),
    StringLiteral(String),
    Identifier(String),
    Prefix {
        operator: String,
        right: Box<Expression>,
    },
    Infix {
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        consequence: Block,
        alternative: Option<Block>,
    },
    FunctionLiteral {
        parameters: Vec<String>,
        body: Block,
    },
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },
    ArrayLiteral(Vec<Expression>),
    Index {
        left: Box<Expression>,
        index: Box<Expression>,
    },
    HashLiteral(Vec<(Expression, Expression)>),
    MacroLiteral {
        parameters: Vec<String>,
        body: Block,
    },
}

impl Expression {
    /// The token literal used as the operator string in error messages,
    /// mirroring the role the teacher's `TermKind::Operator` token plays in
    /// `operations::infix`/`operations::unary`.
    pub fn token_literal(&self) -> &str {
        match self {
            Expression::Prefix { operator, .. } => operator,
            Expression::Infix { operator, .. } => operator,
            Expression::Identifier(name) => name,
            _ => "",
        }
    }
}

/// Constructor helpers. These play the role a parser's node-building code
/// would play; they exist so tests (and the quote/macro machinery, which
/// must synthesize literal nodes out of evaluated values) can build ASTs
/// without a textual front end.
pub mod build {
    use super::*;

    pub fn program(statements: Vec<Statement>) -> Program {
        Program { statements }
    }

    pub fn block(statements: Vec<Statement>) -> Block {
        Block { statements }
    }

    pub fn let_stmt(name: &str, value: Expression) -> Statement {
        Statement::Let {
            name: name.to_string(),
            value,
        }
    }

    pub fn return_stmt(value: Expression) -> Statement {
        Statement::Return(value)
    }

    pub fn expr_stmt(value: Expression) -> Statement {
        Statement::Expression(value)
    }

    pub fn int(n: i64) -> Expression {
        Expression::IntegerLiteral(n)
    }

    pub fn boolean(b: bool) -> Expression {
        Expression::BooleanLiteral(b)
    }

    pub fn string(s: &str) -> Expression {
        Expression::StringLiteral(s.to_string())
    }

    pub fn ident(name: &str) -> Expression {
        Expression::Identifier(name.to_string())
    }

    pub fn prefix(operator: &str, right: Expression) -> Expression {
        Expression::Prefix {
            operator: operator.to_string(),
            right: Box::new(right),
        }
    }

    pub fn infix(operator: &str, left: Expression, right: Expression) -> Expression {
        Expression::Infix {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn if_expr(
        condition: Expression,
        consequence: Block,
        alternative: Option<Block>,
    ) -> Expression {
        Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
        }
    }

    pub fn function(parameters: &[&str], body: Block) -> Expression {
        Expression::FunctionLiteral {
            parameters: parameters.iter().map(|s| s.to_string()).collect(),
            body,
        }
    }

    pub fn macro_literal(parameters: &[&str], body: Block) -> Expression {
        Expression::MacroLiteral {
            parameters: parameters.iter().map(|s| s.to_string()).collect(),
            body,
        }
    }

    pub fn call(function: Expression, arguments: Vec<Expression>) -> Expression {
        Expression::Call {
            function: Box::new(function),
            arguments,
        }
    }

    pub fn array(elements: Vec<Expression>) -> Expression {
        Expression::ArrayLiteral(elements)
    }

    pub fn index(left: Expression, index: Expression) -> Expression {
        Expression::Index {
            left: Box::new(left),
            index: Box::new(index),
        }
    }

    pub fn hash(pairs: Vec<(Expression, Expression)>) -> Expression {
        Expression::HashLiteral(pairs)
    }
}
