//! Lowering of structured statements (`if`, `while`, `do…while`, `for`,
//! `break`, `continue`, `return`) into a control-flow graph of basic blocks.
//!
//! The input tree comes from `brasa_ast`; expressions stay opaque payloads
//! throughout. The output [`Cfg`] is what code generation consumes.

pub mod block;
pub mod display;
pub mod error;
pub mod graph;
pub mod lowering;
pub mod verify;

use brasa_type::Id;

pub use block::{Block, EdgeKind, Terminator};
pub use error::{InvariantViolation, LowerError, StructuralError};
pub use graph::Cfg;
pub use lowering::{CfgBuilder, Lowered, LoweringContext, lower_and_verify, lower_function};
pub use verify::{VerifyError, VerifyOutcome, VerifyResult, VerifyWarning, verify_cfg};

/// Unique identifier for a basic block within a function's CFG.
pub type BlockId = Id<Block>;
