use brasa_ast::ExprId;
use brasa_type::span::Span;
use serde::Serialize;

use crate::BlockId;

/// A basic block: a straight-line sequence of uninterpreted statement
/// payloads ending with a single terminator.
#[derive(Debug, Clone, Serialize)]
pub struct Block {
  /// Unique label for this block (for debugging and dumps).
  pub label: String,
  /// Statement payloads, executed in order.
  pub statements: Vec<ExprId>,
  /// How control exits this block.
  pub terminator: Terminator,
  /// Source span covering the construct that created this block.
  pub span: Span,
}

impl Block {
  pub fn new(label: String) -> Self {
    Self {
      label,
      statements: Vec::new(),
      terminator: Terminator::Unreachable,
      span: Span::default(),
    }
  }

  /// Outgoing edges with their kind tags, derived from the terminator.
  pub fn successors(&self) -> Vec<(EdgeKind, BlockId)> {
    match &self.terminator {
      Terminator::Goto(target) => vec![(EdgeKind::Unconditional, *target)],
      Terminator::Branch {
        then_block, else_block, ..
      } => vec![
        (EdgeKind::TrueBranch, *then_block),
        (EdgeKind::FalseBranch, *else_block),
      ],
      Terminator::Return(_) | Terminator::Unreachable => Vec::new(),
    }
  }

  /// True when this block has a terminator other than the unset sentinel.
  pub fn is_terminated(&self) -> bool {
    !matches!(self.terminator, Terminator::Unreachable)
  }

  /// Exit blocks leave the function; they have no outgoing edges.
  pub fn is_exit(&self) -> bool {
    matches!(self.terminator, Terminator::Return(_))
  }
}

/// Block terminator: the single control transfer out of a basic block.
///
/// The closed sum guarantees that a block can never carry both an
/// unconditional edge and a conditional pair, nor more than two edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Terminator {
  /// Unconditional jump to a target block.
  Goto(BlockId),

  /// Conditional branch: if `condition` holds, go to `then_block`,
  /// else `else_block`. Both edges exist atomically.
  Branch {
    condition: ExprId,
    then_block: BlockId,
    else_block: BlockId,
  },

  /// Leave the function with an optional value payload.
  Return(Option<ExprId>),

  /// Terminator not set yet. Must not survive on any reachable block of a
  /// finished CFG; the validator reports it as `MissingTerminator`.
  Unreachable,
}

/// Kind tag on an outgoing edge, as seen by downstream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EdgeKind {
  Unconditional,
  TrueBranch,
  FalseBranch,
}
