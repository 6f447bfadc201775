use brasa_ast::ExprId;
use brasa_type::{Store, span::Span};

use crate::{Block, BlockId, Cfg, InvariantViolation, Terminator};

/// Builder for one function's CFG.
///
/// Holds the block arena and a cursor for the block control flow is
/// presently falling into. Append and connect operations fail once a block
/// has branched; a block becomes immutable the moment its terminator is set.
pub struct CfgBuilder {
  name: String,
  span: Span,

  blocks: Store<Block>,

  /// Currently active block being built.
  current_block: Option<BlockId>,

  /// Counter for generating unique block labels.
  block_counter: u32,
}

impl CfgBuilder {
  pub fn new(
    name: impl Into<String>,
    span: Span,
  ) -> Self {
    let mut builder = Self {
      name: name.into(),
      span,
      blocks: Store::new(),
      current_block: None,
      block_counter: 0,
    };

    // Create entry block
    let entry = builder.create_block("entry");
    builder.switch_to_block(entry);

    builder
  }

  /// Allocate a fresh, empty block with a labeled prefix.
  pub fn create_block(
    &mut self,
    prefix: &str,
  ) -> BlockId {
    let label = format!("{}_{}", prefix, self.block_counter);
    self.block_counter += 1;
    self.blocks.alloc(Block::new(label))
  }

  /// Switch the cursor to a different block.
  pub fn switch_to_block(
    &mut self,
    block: BlockId,
  ) {
    self.current_block = Some(block);
  }

  /// Get the current block ID.
  pub fn current_block(&self) -> BlockId {
    self.current_block.expect("no current block")
  }

  /// Append a statement payload to the current block.
  pub fn append(
    &mut self,
    payload: ExprId,
  ) -> Result<(), InvariantViolation> {
    let id = self.current_block();
    let block = self.blocks.get_mut(&id);

    if block.is_terminated() {
      return Err(InvariantViolation::AlreadyTerminated { block: id });
    }

    block.statements.push(payload);
    Ok(())
  }

  /// Add the single unconditional edge out of the current block.
  pub fn connect_unconditional(
    &mut self,
    to: BlockId,
  ) -> Result<(), InvariantViolation> {
    self.set_terminator(Terminator::Goto(to))
  }

  /// Add both branch edges out of the current block atomically.
  pub fn connect_conditional(
    &mut self,
    condition: ExprId,
    then_block: BlockId,
    else_block: BlockId,
  ) -> Result<(), InvariantViolation> {
    self.set_terminator(Terminator::Branch {
      condition,
      then_block,
      else_block,
    })
  }

  /// Terminate the current block with a function exit.
  pub fn set_return(
    &mut self,
    value: Option<ExprId>,
  ) -> Result<(), InvariantViolation> {
    self.set_terminator(Terminator::Return(value))
  }

  fn set_terminator(
    &mut self,
    term: Terminator,
  ) -> Result<(), InvariantViolation> {
    let id = self.current_block();
    let block = self.blocks.get_mut(&id);

    if block.is_terminated() {
      return Err(InvariantViolation::DuplicateTerminator { block: id });
    }

    block.terminator = term;
    Ok(())
  }

  /// Check if the current block is terminated.
  pub fn is_terminated(&self) -> bool {
    self.blocks.get(&self.current_block()).is_terminated()
  }

  /// Attach a source span to the current block.
  pub fn set_block_span(
    &mut self,
    span: Span,
  ) {
    let id = self.current_block();
    self.blocks.get_mut(&id).span = span;
  }

  pub fn block_count(&self) -> usize {
    self.blocks.len()
  }

  /// Finish building and return the completed graph.
  pub fn finish(self) -> Cfg {
    Cfg {
      name: self.name,
      blocks: self.blocks,
      entry_block: BlockId::new(0), // Entry is always first
      span: self.span,
    }
  }
}
