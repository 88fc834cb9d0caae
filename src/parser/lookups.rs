use std::{collections::HashMap, rc::Rc};

use crate::lexer::tokens::TokenKind;

use super::{expr::*, parser::Parser, registry::OperatorGroup, stmt::*};

/// Binding power levels, lowest to highest. Higher binds tighter.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub enum BindingPower {
    Lowest,
    Assignment,
    LogicalOr,
    LogicalAnd,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Prefix,
    Call,
    Member,
}

impl BindingPower {
    /// The level directly below this one; right-associative operators parse
    /// their right operand at this level.
    pub fn lower(self) -> Self {
        match self {
            BindingPower::Lowest | BindingPower::Assignment => BindingPower::Lowest,
            BindingPower::LogicalOr => BindingPower::Assignment,
            BindingPower::LogicalAnd => BindingPower::LogicalOr,
            BindingPower::Equality => BindingPower::LogicalAnd,
            BindingPower::Relational => BindingPower::Equality,
            BindingPower::Additive => BindingPower::Relational,
            BindingPower::Multiplicative => BindingPower::Additive,
            BindingPower::Prefix => BindingPower::Multiplicative,
            BindingPower::Call => BindingPower::Prefix,
            BindingPower::Member => BindingPower::Call,
        }
    }
}

/// Maps an operator token kind to its binding power.
#[derive(Debug, Default, Clone)]
pub struct PrecedenceTable {
    levels: HashMap<TokenKind, BindingPower>,
}

impl PrecedenceTable {
    pub fn new() -> Self {
        PrecedenceTable::default()
    }

    pub fn set(&mut self, kind: TokenKind, binding_power: BindingPower) {
        self.levels.insert(kind, binding_power);
    }

    /// Unregistered kinds bind at `Lowest`, so they never continue an expression.
    pub fn get(&self, kind: TokenKind) -> BindingPower {
        self.levels
            .get(&kind)
            .copied()
            .unwrap_or(BindingPower::Lowest)
    }
}

const ARITHMETIC: &[TokenKind] = &[
    TokenKind::Plus,
    TokenKind::Dash,
    TokenKind::Star,
    TokenKind::Slash,
    TokenKind::Percent,
];

const COMPARISON: &[TokenKind] = &[
    TokenKind::Equals,
    TokenKind::NotEquals,
    TokenKind::Less,
    TokenKind::LessEquals,
    TokenKind::Greater,
    TokenKind::GreaterEquals,
];

const LOGICAL: &[TokenKind] = &[TokenKind::And, TokenKind::Or];

pub fn create_token_lookups(parser: &mut Parser) {
    // One binary parser backs every arithmetic, comparison and logical operator
    let binary = Rc::new(BinaryOperatorParser);
    parser.led_group(OperatorGroup::new("arithmetic", ARITHMETIC, binary.clone()));
    parser.led_group(OperatorGroup::new("comparison", COMPARISON, binary.clone()));
    parser.led_group(OperatorGroup::new("logical", LOGICAL, binary));

    parser.precedence(TokenKind::Or, BindingPower::LogicalOr);
    parser.precedence(TokenKind::And, BindingPower::LogicalAnd);
    parser.precedence(TokenKind::Equals, BindingPower::Equality);
    parser.precedence(TokenKind::NotEquals, BindingPower::Equality);
    parser.precedence(TokenKind::Less, BindingPower::Relational);
    parser.precedence(TokenKind::LessEquals, BindingPower::Relational);
    parser.precedence(TokenKind::Greater, BindingPower::Relational);
    parser.precedence(TokenKind::GreaterEquals, BindingPower::Relational);
    parser.precedence(TokenKind::Plus, BindingPower::Additive);
    parser.precedence(TokenKind::Dash, BindingPower::Additive);
    parser.precedence(TokenKind::Star, BindingPower::Multiplicative);
    parser.precedence(TokenKind::Slash, BindingPower::Multiplicative);
    parser.precedence(TokenKind::Percent, BindingPower::Multiplicative);

    parser.led(TokenKind::Assignment, BindingPower::Assignment, parse_assignment_expr);
    parser.led(TokenKind::OpenParen, BindingPower::Call, parse_call_expr);
    parser.led(TokenKind::OpenBracket, BindingPower::Call, parse_index_expr);
    parser.led(TokenKind::Dot, BindingPower::Member, parse_member_expr);

    // Literals and symbols
    parser.nud(TokenKind::Integer, parse_integer_expr);
    parser.nud(TokenKind::String, parse_string_expr);
    parser.nud(TokenKind::True, parse_boolean_expr);
    parser.nud(TokenKind::False, parse_boolean_expr);
    parser.nud(TokenKind::Null, parse_null_expr);
    parser.nud(TokenKind::Identifier, parse_identifier_expr);
    parser.nud(TokenKind::This, parse_this_expr);
    parser.nud(TokenKind::Super, parse_super_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::Not, parse_prefix_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::OpenBracket, parse_array_expr);
    parser.nud(TokenKind::OpenCurly, parse_hash_expr);
    parser.nud(TokenKind::Fn, parse_function_expr);

    // Statements, tried in registration order before the expression statement
    parser.stmt(KeywordStatement::new(TokenKind::Let, parse_var_decl_stmt));
    parser.stmt(KeywordStatement::new(TokenKind::Return, parse_return_stmt));
    parser.stmt(KeywordStatement::new(TokenKind::If, parse_if_stmt));
    parser.stmt(KeywordStatement::new(TokenKind::While, parse_while_stmt));
    parser.stmt(KeywordStatement::new(TokenKind::For, parse_for_stmt));
    parser.stmt(KeywordStatement::new(TokenKind::Break, parse_loop_control_stmt));
    parser.stmt(KeywordStatement::new(TokenKind::Continue, parse_loop_control_stmt));
    parser.stmt(FunctionDeclaration);
    parser.stmt(KeywordStatement::new(TokenKind::Class, parse_class_decl_stmt));
    parser.stmt(KeywordStatement::new(TokenKind::OpenCurly, parse_block_stmt));
    parser.stmt(CompoundAssignment);
}
