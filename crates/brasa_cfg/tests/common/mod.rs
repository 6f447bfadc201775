#![allow(dead_code)]

use brasa_ast::{Ast, ExprId, StmtId, StmtKind};
use brasa_cfg::{BlockId, Cfg, LowerError, Lowered, Terminator, lower_function, verify_cfg};
use brasa_type::{BytePosition, file::FileId, span::Span};

/// Stand-in for the (out of scope) parser: builds statement trees over
/// opaque expression payloads, with synthetic but distinct spans.
pub struct FnBuilder {
  pub ast: Ast,
  pos: u32,
}

impl FnBuilder {
  pub fn new() -> Self {
    Self { ast: Ast::new(), pos: 0 }
  }

  fn next_span(&mut self) -> Span {
    let start = self.pos;
    self.pos += 1;
    Span::new(FileId::default(), BytePosition(start), BytePosition(self.pos))
  }

  pub fn expr(
    &mut self,
    text: &str,
  ) -> ExprId {
    let span = self.next_span();
    self.ast.expr(text, span)
  }

  pub fn expr_stmt(
    &mut self,
    text: &str,
  ) -> StmtId {
    let expr = self.expr(text);
    let span = self.next_span();
    self.ast.stmt(StmtKind::Expr(expr), span)
  }

  pub fn block(
    &mut self,
    statements: Vec<StmtId>,
  ) -> StmtId {
    let span = self.next_span();
    self.ast.stmt(StmtKind::Block(statements), span)
  }

  pub fn if_stmt(
    &mut self,
    condition: &str,
    then_branch: StmtId,
    else_branch: Option<StmtId>,
  ) -> StmtId {
    let condition = self.expr(condition);
    let span = self.next_span();
    self.ast.stmt(
      StmtKind::If {
        condition,
        then_branch,
        else_branch,
      },
      span,
    )
  }

  pub fn while_stmt(
    &mut self,
    condition: &str,
    body: StmtId,
  ) -> StmtId {
    let condition = self.expr(condition);
    let span = self.next_span();
    self.ast.stmt(StmtKind::While { condition, body }, span)
  }

  pub fn do_while_stmt(
    &mut self,
    body: StmtId,
    condition: &str,
  ) -> StmtId {
    let condition = self.expr(condition);
    let span = self.next_span();
    self.ast.stmt(StmtKind::DoWhile { body, condition }, span)
  }

  pub fn for_stmt(
    &mut self,
    init: Option<&str>,
    condition: Option<&str>,
    step: Option<&str>,
    body: StmtId,
  ) -> StmtId {
    let init = init.map(|t| self.expr(t));
    let condition = condition.map(|t| self.expr(t));
    let step = step.map(|t| self.expr(t));
    let span = self.next_span();
    self.ast.stmt(
      StmtKind::For {
        init,
        condition,
        step,
        body,
      },
      span,
    )
  }

  pub fn break_stmt(&mut self) -> StmtId {
    let span = self.next_span();
    self.ast.stmt(StmtKind::Break, span)
  }

  pub fn continue_stmt(&mut self) -> StmtId {
    let span = self.next_span();
    self.ast.stmt(StmtKind::Continue, span)
  }

  pub fn return_stmt(
    &mut self,
    value: Option<&str>,
  ) -> StmtId {
    let value = value.map(|t| self.expr(t));
    let span = self.next_span();
    self.ast.stmt(StmtKind::Return(value), span)
  }

  pub fn lower(
    &self,
    body: StmtId,
  ) -> Result<Lowered, LowerError> {
    lower_function(&self.ast, body, "test", Span::default(), None)
  }

  pub fn lower_ok(
    &self,
    body: StmtId,
  ) -> Lowered {
    match self.lower(body) {
      Ok(lowered) => lowered,
      Err(e) => panic!("lowering failed: {}", e),
    }
  }
}

/// All blocks whose label starts with `prefix`, in creation order.
pub fn blocks_with_prefix(
  cfg: &Cfg,
  prefix: &str,
) -> Vec<BlockId> {
  cfg
    .blocks
    .iter()
    .filter(|(_, b)| b.label.starts_with(prefix))
    .map(|(id, _)| id)
    .collect()
}

/// The unique block whose label starts with `prefix`.
pub fn block_with_prefix(
  cfg: &Cfg,
  prefix: &str,
) -> BlockId {
  let matches = blocks_with_prefix(cfg, prefix);
  assert_eq!(
    matches.len(),
    1,
    "expected exactly one block with prefix `{}`, found {}",
    prefix,
    matches.len()
  );
  matches[0]
}

/// Target of a block's unconditional edge. Panics if the block branches.
pub fn goto_target(
  cfg: &Cfg,
  block: BlockId,
) -> BlockId {
  match cfg.block(block).terminator {
    Terminator::Goto(target) => target,
    ref other => panic!(
      "expected `{}` to end in an unconditional edge, got {:?}",
      cfg.block(block).label,
      other
    ),
  }
}

/// Then/else targets of a block's conditional pair.
pub fn branch_targets(
  cfg: &Cfg,
  block: BlockId,
) -> (BlockId, BlockId) {
  match cfg.block(block).terminator {
    Terminator::Branch {
      then_block, else_block, ..
    } => (then_block, else_block),
    ref other => panic!(
      "expected `{}` to end in a conditional pair, got {:?}",
      cfg.block(block).label,
      other
    ),
  }
}

pub fn assert_verifies(cfg: &Cfg) {
  if let Err(errors) = verify_cfg(cfg) {
    panic!("expected CFG to verify, got: {:?}", errors);
  }
}
