//! Statement tree consumed by the CFG lowering.
//!
//! The tree is produced by the (external) parser: arena-allocated statement
//! nodes over opaque expression payloads. The lowering never interprets an
//! expression; it only moves `ExprId`s into basic blocks.

pub mod statement;

use brasa_type::{Id, Store, span::Span};

pub use statement::{StmtKind, StmtNode};

pub type StmtId = Id<StmtNode>;
pub type ExprId = Id<Expr>;

/// An uninterpreted expression or side-effecting statement payload.
///
/// The raw source text is kept only for display and diagnostics; nothing in
/// the mid-end reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr {
  pub text: String,
  pub span: Span,
}

/// Arena holding one function body's statements and expression payloads.
#[derive(Debug, Clone, Default)]
pub struct Ast {
  pub stmts: Store<StmtNode>,
  pub exprs: Store<Expr>,
}

impl Ast {
  pub fn new() -> Self {
    Self {
      stmts: Store::new(),
      exprs: Store::new(),
    }
  }

  pub fn stmt(
    &mut self,
    kind: StmtKind,
    span: Span,
  ) -> StmtId {
    self.stmts.alloc(StmtNode { kind, span })
  }

  pub fn expr(
    &mut self,
    text: impl Into<String>,
    span: Span,
  ) -> ExprId {
    self.exprs.alloc(Expr {
      text: text.into(),
      span,
    })
  }

  #[inline]
  pub fn get_stmt(
    &self,
    id: StmtId,
  ) -> &StmtNode {
    self.stmts.get(&id)
  }

  #[inline]
  pub fn get_expr(
    &self,
    id: ExprId,
  ) -> &Expr {
    self.exprs.get(&id)
  }

  /// Source text of an expression payload.
  pub fn expr_text(
    &self,
    id: ExprId,
  ) -> &str {
    &self.exprs.get(&id).text
  }
}
