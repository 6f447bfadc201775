use brasa_type::span::Span;

use crate::{ExprId, StmtId};

/// One statement node in the arena.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StmtNode {
  pub kind: StmtKind,
  pub span: Span,
}

/// The closed set of statement forms the mid-end understands.
///
/// Loop and branch forms are fixed; exhaustive matches in the lowerer catch
/// a missing case at build time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StmtKind {
  /// A plain expression statement (assignment, call, ...).
  Expr(ExprId),

  /// `{ s0; s1; ... }`
  Block(Vec<StmtId>),

  /// `if (C) THEN [else ELSE]`
  If {
    condition: ExprId,
    then_branch: StmtId,
    else_branch: Option<StmtId>,
  },

  /// `while (C) BODY` — pre-test loop.
  While { condition: ExprId, body: StmtId },

  /// `do BODY while (C)` — body runs at least once before the first test.
  DoWhile { body: StmtId, condition: ExprId },

  /// `for (INIT; C; STEP) BODY`. All three header slots are optional;
  /// a missing condition means the loop only exits via `break`.
  For {
    init: Option<ExprId>,
    condition: Option<ExprId>,
    step: Option<ExprId>,
    body: StmtId,
  },

  /// `break` out of the innermost enclosing loop.
  Break,

  /// `continue` the innermost enclosing loop.
  Continue,

  /// `return [E]`
  Return(Option<ExprId>),
}

impl StmtKind {
  /// True for the forms that push a loop frame during lowering.
  pub fn is_loop(&self) -> bool {
    matches!(self, StmtKind::While { .. } | StmtKind::DoWhile { .. } | StmtKind::For { .. })
  }
}
