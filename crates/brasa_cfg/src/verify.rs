use std::collections::HashSet;

use brasa_log::{DebugTrace, LogConfig, trace_dbg};

use crate::{BlockId, Cfg, Terminator};

/// Hard structural defects found in a finished CFG. Any of these means the
/// lowerer produced a graph downstream consumers cannot trust.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
  /// A reachable block still carries the unset terminator sentinel.
  MissingTerminator { block: BlockId, label: String },

  /// A terminator references a block outside the arena.
  InvalidBlockRef {
    block: BlockId,
    label: String,
    target: BlockId,
  },
}

impl std::fmt::Display for VerifyError {
  fn fmt(
    &self,
    f: &mut std::fmt::Formatter<'_>,
  ) -> std::fmt::Result {
    match self {
      VerifyError::MissingTerminator { label, .. } => {
        write!(f, "block `{}` is reachable but has no terminator", label)
      },
      VerifyError::InvalidBlockRef { label, target, .. } => {
        write!(f, "block `{}` targets non-existent block {}", label, target)
      },
    }
  }
}

/// Non-fatal findings. Unreachable blocks are legal, dead code is parked in
/// them deliberately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyWarning {
  UnreachableBlock { block: BlockId, label: String },
}

/// What a clean verification still wants to report.
#[derive(Debug, Clone, Default)]
pub struct VerifyOutcome {
  pub warnings: Vec<VerifyWarning>,
}

pub type VerifyResult = Result<VerifyOutcome, Vec<VerifyError>>;

/// Validator for finished CFGs.
pub struct CfgVerifier<'a> {
  cfg: &'a Cfg,
  errors: Vec<VerifyError>,
  warnings: Vec<VerifyWarning>,
}

impl<'a> CfgVerifier<'a> {
  pub fn new(cfg: &'a Cfg) -> Self {
    Self {
      cfg,
      errors: Vec::new(),
      warnings: Vec::new(),
    }
  }

  pub fn verify(mut self) -> VerifyResult {
    let reachable = self.cfg.reachable_blocks();

    for (id, block) in self.cfg.blocks.iter() {
      self.verify_targets(id, &block.terminator);

      if reachable.contains(&id) {
        if !block.is_terminated() {
          self.errors.push(VerifyError::MissingTerminator {
            block: id,
            label: block.label.clone(),
          });
        }
      } else {
        self.warnings.push(VerifyWarning::UnreachableBlock {
          block: id,
          label: block.label.clone(),
        });
      }
    }

    if self.errors.is_empty() {
      Ok(VerifyOutcome {
        warnings: self.warnings,
      })
    } else {
      Err(self.errors)
    }
  }

  fn verify_targets(
    &mut self,
    id: BlockId,
    term: &Terminator,
  ) {
    let mut targets: Vec<BlockId> = Vec::new();
    match term {
      Terminator::Goto(target) => targets.push(*target),
      Terminator::Branch {
        then_block, else_block, ..
      } => {
        targets.push(*then_block);
        targets.push(*else_block);
      },
      Terminator::Return(_) | Terminator::Unreachable => {},
    }

    for target in targets {
      if !self.cfg.blocks.contains(&target) {
        self.errors.push(VerifyError::InvalidBlockRef {
          block: id,
          label: self.cfg.block(id).label.clone(),
          target,
        });
      }
    }
  }
}

/// Verify a finished CFG.
pub fn verify_cfg(cfg: &Cfg) -> VerifyResult {
  CfgVerifier::new(cfg).verify()
}

/// Verify with trace logging of the findings.
pub fn verify_cfg_logged(
  cfg: &Cfg,
  config: &LogConfig,
) -> VerifyResult {
  let result = verify_cfg(cfg);

  match &result {
    Ok(outcome) => {
      trace_dbg!(
        config,
        DebugTrace::Verify,
        "cfg `{}` verified: {} block(s), {} warning(s)",
        cfg.name,
        cfg.blocks.len(),
        outcome.warnings.len()
      );
    },
    Err(errors) => {
      trace_dbg!(
        config,
        DebugTrace::Verify,
        "cfg `{}` failed verification with {} error(s)",
        cfg.name,
        errors.len()
      );
    },
  }

  result
}

/// Blocks with no path from the entry block.
pub fn unreachable_blocks(cfg: &Cfg) -> Vec<BlockId> {
  let reachable: HashSet<BlockId> = cfg.reachable_blocks();
  cfg
    .blocks
    .iter()
    .map(|(id, _)| id)
    .filter(|id| !reachable.contains(id))
    .collect()
}
