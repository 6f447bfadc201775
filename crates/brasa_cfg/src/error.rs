use brasa_diagnostics::Diagnostic;
use brasa_type::span::Span;

use crate::BlockId;

/// Error code for `break` outside any loop.
pub const CODE_BREAK_OUTSIDE_LOOP: &str = "L0040";
/// Error code for `continue` outside any loop.
pub const CODE_CONTINUE_OUTSIDE_LOOP: &str = "L0041";
/// Warning code for statements that can never execute.
pub const CODE_UNREACHABLE_CODE: &str = "L0100";

/// Source-level errors: the input itself is malformed. Lowering of the
/// offending function aborts and no partial CFG is handed downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
  BreakOutsideLoop { span: Span },
  ContinueOutsideLoop { span: Span },
}

impl StructuralError {
  pub fn span(&self) -> &Span {
    match self {
      StructuralError::BreakOutsideLoop { span } => span,
      StructuralError::ContinueOutsideLoop { span } => span,
    }
  }

  pub fn to_diagnostic(&self) -> Diagnostic {
    match self {
      StructuralError::BreakOutsideLoop { span } => Diagnostic::error(
        "`break` outside of a loop",
        CODE_BREAK_OUTSIDE_LOOP,
        span.clone(),
      ),
      StructuralError::ContinueOutsideLoop { span } => Diagnostic::error(
        "`continue` outside of a loop",
        CODE_CONTINUE_OUTSIDE_LOOP,
        span.clone(),
      ),
    }
  }
}

impl std::fmt::Display for StructuralError {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>,
  ) -> std::fmt::Result {
    match self {
      StructuralError::BreakOutsideLoop { span } => {
        write!(f, "`break` outside of a loop at {}", span)
      },
      StructuralError::ContinueOutsideLoop { span } => {
        write!(f, "`continue` outside of a loop at {}", span)
      },
    }
  }
}

/// Defects in the lowerer itself. A CFG produced alongside one of these
/// cannot be trusted, so they are fatal for the invocation and never
/// silently swallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
  /// Payload appended to a block that already branched.
  AlreadyTerminated { block: BlockId },
  /// Second terminator set on the same block.
  DuplicateTerminator { block: BlockId },
  /// Loop frame popped with nothing on the stack.
  StackUnderflow,
  /// Loop frames left on the stack after lowering finished.
  UnbalancedLoopStack { depth: usize },
}

impl std::fmt::Display for InvariantViolation {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>,
  ) -> std::fmt::Result {
    match self {
      InvariantViolation::AlreadyTerminated { block } => {
        write!(f, "append to already-terminated block {}", block)
      },
      InvariantViolation::DuplicateTerminator { block } => {
        write!(f, "duplicate terminator on block {}", block)
      },
      InvariantViolation::StackUnderflow => {
        write!(f, "loop stack popped while empty")
      },
      InvariantViolation::UnbalancedLoopStack { depth } => {
        write!(f, "{} loop frame(s) left after lowering", depth)
      },
    }
  }
}

impl std::error::Error for StructuralError {}

impl std::error::Error for InvariantViolation {}

/// Any failure while lowering one function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LowerError {
  Structural(StructuralError),
  Invariant(InvariantViolation),
}

impl LowerError {
  pub fn as_structural(&self) -> Option<&StructuralError> {
    match self {
      LowerError::Structural(e) => Some(e),
      LowerError::Invariant(_) => None,
    }
  }
}

impl std::fmt::Display for LowerError {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>,
  ) -> std::fmt::Result {
    match self {
      LowerError::Structural(e) => write!(f, "{}", e),
      LowerError::Invariant(e) => write!(f, "internal invariant violation: {}", e),
    }
  }
}

impl std::error::Error for LowerError {}

impl From<StructuralError> for LowerError {
  fn from(e: StructuralError) -> Self {
    LowerError::Structural(e)
  }
}

impl From<InvariantViolation> for LowerError {
  fn from(e: InvariantViolation) -> Self {
    LowerError::Invariant(e)
  }
}
