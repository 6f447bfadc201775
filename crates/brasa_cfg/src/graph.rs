use std::collections::HashSet;

use brasa_type::{Store, span::Span};
use serde::Serialize;

use crate::{Block, BlockId, EdgeKind};

/// A lowered function body: basic blocks linked by terminator edges.
///
/// Blocks are arena-allocated with stable handles, so back-edges (loops form
/// cycles) need no reference counting and the whole graph serializes freely.
#[derive(Debug, Clone, Serialize)]
pub struct Cfg {
  /// Function name, for dumps and verifier messages.
  pub name: String,
  /// All blocks, in creation order. Entry is always first.
  pub blocks: Store<Block>,
  /// The distinguished entry block.
  pub entry_block: BlockId,
  /// Span of the function body this graph was lowered from.
  pub span: Span,
}

impl Cfg {
  #[inline]
  pub fn block(
    &self,
    id: BlockId,
  ) -> &Block {
    self.blocks.get(&id)
  }

  /// Outgoing edges of a block with their kind tags.
  pub fn successors(
    &self,
    id: BlockId,
  ) -> Vec<(EdgeKind, BlockId)> {
    self.block(id).successors()
  }

  /// All blocks with an edge into `target`, with the edge kind taken.
  pub fn predecessors(
    &self,
    target: BlockId,
  ) -> Vec<(BlockId, EdgeKind)> {
    let mut preds = Vec::new();
    for (id, block) in self.blocks.iter() {
      for (kind, succ) in block.successors() {
        if succ == target {
          preds.push((id, kind));
        }
      }
    }
    preds
  }

  /// Blocks reachable from the entry block, by worklist traversal.
  pub fn reachable_blocks(&self) -> HashSet<BlockId> {
    let mut seen = HashSet::new();
    let mut worklist = vec![self.entry_block];

    while let Some(id) = worklist.pop() {
      if !seen.insert(id) {
        continue;
      }
      for (_, succ) in self.block(id).successors() {
        // Dangling targets are the validator's problem; don't chase them.
        if self.blocks.contains(&succ) && !seen.contains(&succ) {
          worklist.push(succ);
        }
      }
    }

    seen
  }

  /// Reachable blocks that leave the function, in creation order.
  pub fn exit_blocks(&self) -> Vec<BlockId> {
    let reachable = self.reachable_blocks();
    self
      .blocks
      .iter()
      .filter(|(id, block)| block.is_exit() && reachable.contains(id))
      .map(|(id, _)| id)
      .collect()
  }

  /// Find a block by its label. Labels are unique within one CFG.
  pub fn block_by_label(
    &self,
    label: &str,
  ) -> Option<BlockId> {
    self.blocks.iter().find(|(_, b)| b.label == label).map(|(id, _)| id)
  }
}
