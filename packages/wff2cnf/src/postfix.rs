//! Infix to postfix conversion.
//!
//! A shunting-yard pass extended for prefix unary operators: a unary
//! operator never pops anything when it arrives, and is emitted as soon as
//! the operand following it (a single symbol or a parenthesized group) has
//! been emitted.

use crate::{error::WffError, token::Token};

pub fn to_postfix(tokens: &[Token]) -> Result<Vec<Token>, WffError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<(Token, usize)> = Vec::new();

    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Variable(_) | Token::Constant(_) => {
                output.push(token.clone());
                pop_unary_operators(&mut stack, &mut output);
            }
            Token::Operator(operator) => {
                if !operator.is_unary() {
                    while let Some((Token::Operator(top), _)) = stack.last() {
                        if top.is_unary() || !top.has_higher_or_equal_precedence(operator) {
                            break;
                        }

                        if let Some((top, _)) = stack.pop() {
                            output.push(top);
                        }
                    }
                }

                stack.push((token.clone(), index));
            }
            Token::OpenParen => stack.push((token.clone(), index)),
            Token::CloseParen => {
                loop {
                    match stack.pop() {
                        Some((Token::OpenParen, _)) => break,
                        Some((top, _)) => output.push(top),
                        None => return Err(WffError::UnbalancedParenthesis { index }),
                    }
                }

                pop_unary_operators(&mut stack, &mut output);
            }
        }
    }

    while let Some((token, index)) = stack.pop() {
        if token == Token::OpenParen {
            return Err(WffError::UnbalancedParenthesis { index });
        }

        output.push(token);
    }

    Ok(output)
}

/// An operand just completed: every prefix operator waiting for it applies
/// now, innermost first.
fn pop_unary_operators(stack: &mut Vec<(Token, usize)>, output: &mut Vec<Token>) {
    while stack
        .last()
        .is_some_and(|(token, _)| token.is_unary_operator())
    {
        if let Some((token, _)) = stack.pop() {
            output.push(token);
        }
    }
}
