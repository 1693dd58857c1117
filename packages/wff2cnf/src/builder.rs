use crate::{
    ast::{Ast, Node},
    error::WffError,
    token::Token,
};

/// Deepest tree the builder accepts. Every tree walk recurses, so deeper
/// input is refused up front.
pub const MAX_DEPTH: usize = 1_000;

/// Builds a tree from a postfix token sequence. Each operator takes its
/// operands off the top of the node stack, the first popped becoming its
/// last child.
pub fn build(postfix: &[Token]) -> Result<Ast, WffError> {
    // Each node is stacked with the depth of the subtree it roots.
    let mut stack: Vec<(Node, usize)> = Vec::with_capacity(postfix.len());

    for (index, token) in postfix.iter().enumerate() {
        if matches!(token, Token::OpenParen | Token::CloseParen) {
            return Err(WffError::UnbalancedParenthesis { index });
        }

        let operand_count = token.operand_count();

        if stack.len() < operand_count {
            return Err(WffError::MissingOperand {
                operator: token.lexeme().to_owned(),
            });
        }

        let (children, depths): (Vec<_>, Vec<_>) = stack
            .split_off(stack.len() - operand_count)
            .into_iter()
            .unzip();
        let depth = depths.into_iter().max().unwrap_or(0) + 1;

        if depth > MAX_DEPTH {
            return Err(WffError::NestingTooDeep { limit: MAX_DEPTH });
        }

        stack.push((Node::new(token.clone(), children)?, depth));
    }

    match (stack.pop(), stack.is_empty()) {
        (Some((root, _)), true) => Ok(Ast::new(root)),
        (Some(_), false) => Err(WffError::DanglingOperands {
            count: stack.len() + 1,
        }),
        (None, _) => Err(WffError::EmptyFormula),
    }
}
