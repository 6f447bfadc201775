mod builder;

use brasa_ast::{Ast, ExprId, StmtId, StmtKind};
use brasa_diagnostics::Diagnostic;
use brasa_log::{DebugTrace, LogConfig, trace_dbg};
use brasa_type::span::Span;

use crate::{
  BlockId, Cfg, InvariantViolation, LowerError, StructuralError, error::CODE_UNREACHABLE_CODE, verify::VerifyResult,
  verify::verify_cfg,
};

pub use builder::CfgBuilder;

/// Resolution targets for one lexically enclosing loop.
#[derive(Debug, Clone, Copy)]
struct LoopFrame {
  /// Block to jump to on `continue`. The test block for while/do-while,
  /// the step block for for-loops.
  continue_block: BlockId,
  /// Block to jump to on `break`: the loop's exit.
  break_block: BlockId,
}

/// Explicit stack of loop frames, one per enclosing loop statement.
///
/// `break`/`continue` resolve against the top frame only; there are no
/// labeled (multi-level) transfers.
#[derive(Debug, Default)]
struct LoopStack {
  frames: Vec<LoopFrame>,
}

impl LoopStack {
  fn push(
    &mut self,
    frame: LoopFrame,
  ) {
    self.frames.push(frame);
  }

  fn pop(&mut self) -> Result<LoopFrame, InvariantViolation> {
    self.frames.pop().ok_or(InvariantViolation::StackUnderflow)
  }

  fn current(&self) -> Option<&LoopFrame> {
    self.frames.last()
  }

  fn is_empty(&self) -> bool {
    self.frames.is_empty()
  }

  fn depth(&self) -> usize {
    self.frames.len()
  }
}

/// A successfully lowered function body.
#[derive(Debug)]
pub struct Lowered {
  pub cfg: Cfg,
  /// Non-fatal findings (unreachable-code warnings).
  pub diagnostics: Vec<Diagnostic>,
}

/// Context for lowering one statement tree to a CFG.
pub struct LoweringContext<'a> {
  /// The statement tree being lowered.
  ast: &'a Ast,
  /// Block arena and cursor.
  builder: CfgBuilder,
  /// Break/continue resolution targets, innermost last.
  loop_stack: LoopStack,
  /// Warnings collected along the way.
  diagnostics: Vec<Diagnostic>,
  /// Logging knobs; `None` means silent.
  config: Option<&'a LogConfig>,
}

impl<'a> LoweringContext<'a> {
  pub fn new(
    ast: &'a Ast,
    name: impl Into<String>,
    span: Span,
    config: Option<&'a LogConfig>,
  ) -> Self {
    Self {
      ast,
      builder: CfgBuilder::new(name, span),
      loop_stack: LoopStack::default(),
      diagnostics: Vec::new(),
      config,
    }
  }

  /// Lower the function body rooted at `body`.
  ///
  /// On a structural error no CFG escapes; on an invariant violation the
  /// invocation is poisoned and must be treated as a lowerer defect.
  pub fn lower(
    mut self,
    body: StmtId,
  ) -> Result<Lowered, LowerError> {
    self.lower_stmt(body)?;

    // Fall-through off the end of the body is an implicit return.
    if !self.builder.is_terminated() {
      self.builder.set_return(None)?;
    }

    if !self.loop_stack.is_empty() {
      return Err(
        InvariantViolation::UnbalancedLoopStack {
          depth: self.loop_stack.depth(),
        }
        .into(),
      );
    }

    if let Some(config) = self.config {
      trace_dbg!(
        config,
        DebugTrace::Lower,
        "lowered body: {} blocks, {} warning(s)",
        self.builder.block_count(),
        self.diagnostics.len()
      );
    }

    Ok(Lowered {
      cfg: self.builder.finish(),
      diagnostics: self.diagnostics,
    })
  }

  fn lower_stmt(
    &mut self,
    id: StmtId,
  ) -> Result<(), LowerError> {
    let node = self.ast.get_stmt(id).clone();

    match node.kind {
      StmtKind::Expr(expr) => {
        self.builder.append(expr)?;
        Ok(())
      },
      StmtKind::Block(statements) => self.lower_block(&statements),
      StmtKind::If {
        condition,
        then_branch,
        else_branch,
      } => self.lower_if(condition, then_branch, else_branch),
      StmtKind::While { condition, body } => self.lower_while(condition, body, node.span),
      StmtKind::DoWhile { body, condition } => self.lower_do_while(body, condition, node.span),
      StmtKind::For {
        init,
        condition,
        step,
        body,
      } => self.lower_for(init, condition, step, body, node.span),
      StmtKind::Break => self.lower_break(node.span),
      StmtKind::Continue => self.lower_continue(node.span),
      StmtKind::Return(value) => {
        self.builder.set_return(value)?;
        Ok(())
      },
    }
  }

  fn lower_block(
    &mut self,
    statements: &[StmtId],
  ) -> Result<(), LowerError> {
    for &stmt in statements {
      // Statements after an unconditional transfer can never execute. They
      // are parked in a fresh block nothing jumps to and flagged, never
      // appended to the terminated block.
      if self.builder.is_terminated() {
        let span = self.ast.get_stmt(stmt).span.clone();
        let dead = self.builder.create_block("dead");
        self.builder.switch_to_block(dead);
        self.builder.set_block_span(span.clone());
        self
          .diagnostics
          .push(Diagnostic::warning("unreachable code", CODE_UNREACHABLE_CODE, span));
      }

      self.lower_stmt(stmt)?;
    }

    Ok(())
  }

  fn lower_if(
    &mut self,
    condition: ExprId,
    then_branch: StmtId,
    else_branch: Option<StmtId>,
  ) -> Result<(), LowerError> {
    let Some(else_id) = else_branch else {
      // No else: the false edge falls straight through to the join.
      let then_block = self.builder.create_block("then");
      let join_block = self.builder.create_block("merge");

      self.builder.connect_conditional(condition, then_block, join_block)?;

      self.builder.switch_to_block(then_block);
      self.lower_stmt(then_branch)?;
      if !self.builder.is_terminated() {
        self.builder.connect_unconditional(join_block)?;
      }

      self.builder.switch_to_block(join_block);
      return Ok(());
    };

    let then_block = self.builder.create_block("then");
    let else_block = self.builder.create_block("else");

    self.builder.connect_conditional(condition, then_block, else_block)?;

    self.builder.switch_to_block(then_block);
    self.lower_stmt(then_branch)?;
    let then_end = (!self.builder.is_terminated()).then(|| self.builder.current_block());

    self.builder.switch_to_block(else_block);
    self.lower_stmt(else_id)?;
    let else_end = (!self.builder.is_terminated()).then(|| self.builder.current_block());

    // The join block exists only if some branch can reach it. When both
    // branches diverge the cursor stays terminated and the enclosing block
    // applies its dead-code handling.
    if then_end.is_some() || else_end.is_some() {
      let join_block = self.builder.create_block("merge");

      if let Some(block) = then_end {
        self.builder.switch_to_block(block);
        self.builder.connect_unconditional(join_block)?;
      }
      if let Some(block) = else_end {
        self.builder.switch_to_block(block);
        self.builder.connect_unconditional(join_block)?;
      }

      self.builder.switch_to_block(join_block);
    }

    Ok(())
  }

  fn lower_while(
    &mut self,
    condition: ExprId,
    body: StmtId,
    span: Span,
  ) -> Result<(), LowerError> {
    let test_block = self.builder.create_block("while_test");
    let exit_block = self.builder.create_block("while_exit");
    let body_block = self.builder.create_block("while_body");

    self.builder.connect_unconditional(test_block)?;

    self.builder.switch_to_block(test_block);
    self.builder.set_block_span(span);
    self.builder.connect_conditional(condition, body_block, exit_block)?;

    // `continue` in a while retests the condition directly.
    self.loop_stack.push(LoopFrame {
      continue_block: test_block,
      break_block: exit_block,
    });

    self.builder.switch_to_block(body_block);
    self.lower_stmt(body)?;
    if !self.builder.is_terminated() {
      self.builder.connect_unconditional(test_block)?;
    }

    self.loop_stack.pop()?;

    if let Some(config) = self.config {
      trace_dbg!(
        config,
        DebugTrace::Lower,
        "while loop: test={} body={} exit={}",
        test_block,
        body_block,
        exit_block
      );
    }

    self.builder.switch_to_block(exit_block);
    Ok(())
  }

  fn lower_do_while(
    &mut self,
    body: StmtId,
    condition: ExprId,
    span: Span,
  ) -> Result<(), LowerError> {
    let body_block = self.builder.create_block("do_body");
    let test_block = self.builder.create_block("do_test");
    let exit_block = self.builder.create_block("do_exit");

    self.builder.connect_unconditional(body_block)?;

    // Pushed before the body: `continue` must reach the test, not restart
    // the body directly.
    self.loop_stack.push(LoopFrame {
      continue_block: test_block,
      break_block: exit_block,
    });

    self.builder.switch_to_block(body_block);
    self.lower_stmt(body)?;
    if !self.builder.is_terminated() {
      self.builder.connect_unconditional(test_block)?;
    }

    self.loop_stack.pop()?;

    self.builder.switch_to_block(test_block);
    self.builder.set_block_span(span);
    self.builder.connect_conditional(condition, body_block, exit_block)?;

    if let Some(config) = self.config {
      trace_dbg!(
        config,
        DebugTrace::Lower,
        "do-while loop: body={} test={} exit={}",
        body_block,
        test_block,
        exit_block
      );
    }

    self.builder.switch_to_block(exit_block);
    Ok(())
  }

  fn lower_for(
    &mut self,
    init: Option<ExprId>,
    condition: Option<ExprId>,
    step: Option<ExprId>,
    body: StmtId,
    span: Span,
  ) -> Result<(), LowerError> {
    if let Some(init) = init {
      self.builder.append(init)?;
    }

    let test_block = self.builder.create_block("for_test");
    let exit_block = self.builder.create_block("for_exit");
    let step_block = self.builder.create_block("for_step");
    let body_block = self.builder.create_block("for_body");

    self.builder.connect_unconditional(test_block)?;

    self.builder.switch_to_block(test_block);
    self.builder.set_block_span(span);
    match condition {
      Some(condition) => {
        self.builder.connect_conditional(condition, body_block, exit_block)?;
      },
      None => {
        // No condition: the loop only exits via `break`.
        self.builder.connect_unconditional(body_block)?;
      },
    }

    // `continue` runs the step before retesting; it never skips it.
    self.loop_stack.push(LoopFrame {
      continue_block: step_block,
      break_block: exit_block,
    });

    self.builder.switch_to_block(body_block);
    self.lower_stmt(body)?;
    if !self.builder.is_terminated() {
      self.builder.connect_unconditional(step_block)?;
    }

    self.loop_stack.pop()?;

    // The step block is only ever reached when looping, so it always goes
    // back to the test.
    self.builder.switch_to_block(step_block);
    if let Some(step) = step {
      self.builder.append(step)?;
    }
    self.builder.connect_unconditional(test_block)?;

    if let Some(config) = self.config {
      trace_dbg!(
        config,
        DebugTrace::Lower,
        "for loop: test={} body={} step={} exit={}",
        test_block,
        body_block,
        step_block,
        exit_block
      );
    }

    self.builder.switch_to_block(exit_block);
    Ok(())
  }

  fn lower_break(
    &mut self,
    span: Span,
  ) -> Result<(), LowerError> {
    let frame = self
      .loop_stack
      .current()
      .ok_or_else(|| StructuralError::BreakOutsideLoop { span })?;
    let target = frame.break_block;
    self.builder.connect_unconditional(target)?;
    Ok(())
  }

  fn lower_continue(
    &mut self,
    span: Span,
  ) -> Result<(), LowerError> {
    let frame = self
      .loop_stack
      .current()
      .ok_or_else(|| StructuralError::ContinueOutsideLoop { span })?;
    let target = frame.continue_block;
    self.builder.connect_unconditional(target)?;
    Ok(())
  }
}

/// Lower one function body to a CFG.
pub fn lower_function(
  ast: &Ast,
  body: StmtId,
  name: impl Into<String>,
  span: Span,
  config: Option<&LogConfig>,
) -> Result<Lowered, LowerError> {
  LoweringContext::new(ast, name, span, config).lower(body)
}

/// Lower one function body and verify the result.
pub fn lower_and_verify(
  ast: &Ast,
  body: StmtId,
  name: impl Into<String>,
  span: Span,
  config: Option<&LogConfig>,
) -> Result<(Lowered, VerifyResult), LowerError> {
  let lowered = lower_function(ast, body, name, span, config)?;
  let verify_result = verify_cfg(&lowered.cfg);
  Ok((lowered, verify_result))
}
