mod common;

use brasa_ast::StmtId;
use brasa_cfg::{LowerError, display::print_cfg, verify_cfg};
use common::FnBuilder;
use proptest::prelude::*;

/// Shape of a statement tree, materialized into an arena per test case.
#[derive(Debug, Clone)]
enum StmtShape {
  Expr,
  Break,
  Continue,
  Return,
  Block(Vec<StmtShape>),
  If(Box<StmtShape>, Option<Box<StmtShape>>),
  While(Box<StmtShape>),
  DoWhile(Box<StmtShape>),
  For(Box<StmtShape>),
}

fn stmt_shape() -> impl Strategy<Value = StmtShape> {
  let leaf = prop_oneof![
    Just(StmtShape::Expr),
    Just(StmtShape::Break),
    Just(StmtShape::Continue),
    Just(StmtShape::Return),
  ];

  leaf.prop_recursive(4, 48, 4, |inner| {
    prop_oneof![
      prop::collection::vec(inner.clone(), 0..4).prop_map(StmtShape::Block),
      (inner.clone(), prop::option::of(inner.clone()))
        .prop_map(|(t, e)| StmtShape::If(Box::new(t), e.map(Box::new))),
      inner.clone().prop_map(|b| StmtShape::While(Box::new(b))),
      inner.clone().prop_map(|b| StmtShape::DoWhile(Box::new(b))),
      inner.prop_map(|b| StmtShape::For(Box::new(b))),
    ]
  })
}

fn materialize(
  b: &mut FnBuilder,
  shape: &StmtShape,
) -> StmtId {
  match shape {
    StmtShape::Expr => b.expr_stmt("x = x + 1"),
    StmtShape::Break => b.break_stmt(),
    StmtShape::Continue => b.continue_stmt(),
    StmtShape::Return => b.return_stmt(None),
    StmtShape::Block(children) => {
      let children: Vec<_> = children.iter().map(|c| materialize(b, c)).collect();
      b.block(children)
    },
    StmtShape::If(then_branch, else_branch) => {
      let then_branch = materialize(b, then_branch);
      let else_branch = else_branch.as_ref().map(|e| materialize(b, e));
      b.if_stmt("cond", then_branch, else_branch)
    },
    StmtShape::While(body) => {
      let body = materialize(b, body);
      b.while_stmt("cond", body)
    },
    StmtShape::DoWhile(body) => {
      let body = materialize(b, body);
      b.do_while_stmt(body, "cond")
    },
    StmtShape::For(body) => {
      let body = materialize(b, body);
      b.for_stmt(Some("i = 0"), Some("i < n"), Some("i++"), body)
    },
  }
}

proptest! {
  /// Lowering any tree either succeeds or reports a structural error; an
  /// invariant violation is always a lowerer defect.
  #[test]
  fn lowering_never_reports_invariant_violations(shape in stmt_shape()) {
    let mut b = FnBuilder::new();
    let body = materialize(&mut b, &shape);

    match b.lower(body) {
      Ok(_) => {},
      Err(LowerError::Structural(_)) => {},
      Err(LowerError::Invariant(v)) => {
        prop_assert!(false, "invariant violation on well-formed input: {}", v);
      },
    }
  }

  /// Every successfully lowered tree passes verification; the only findings
  /// allowed are unreachable-block warnings.
  #[test]
  fn lowered_trees_always_verify(shape in stmt_shape()) {
    let mut b = FnBuilder::new();
    let body = materialize(&mut b, &shape);

    if let Ok(lowered) = b.lower(body) {
      let outcome = verify_cfg(&lowered.cfg);
      prop_assert!(outcome.is_ok(), "verification failed: {:?}", outcome.unwrap_err());
    }
  }

  /// Break/continue are always resolvable once a loop encloses the tree.
  #[test]
  fn any_tree_inside_a_loop_lowers(shape in stmt_shape()) {
    let mut b = FnBuilder::new();
    let inner = materialize(&mut b, &shape);
    let body = b.while_stmt("cond", inner);
    let function = b.block(vec![body]);

    let lowered = b.lower(function);
    prop_assert!(lowered.is_ok(), "lowering failed: {:?}", lowered.err());
  }

  /// Blocks never grow more than one conditional pair's worth of edges.
  #[test]
  fn edge_counts_stay_within_bounds(shape in stmt_shape()) {
    let mut b = FnBuilder::new();
    let inner = materialize(&mut b, &shape);
    let body = b.while_stmt("cond", inner);
    let function = b.block(vec![body]);

    let lowered = b.lower_ok(function);
    for (id, _) in lowered.cfg.blocks.iter() {
      prop_assert!(lowered.cfg.successors(id).len() <= 2);
    }
  }

  /// Lowering is deterministic: the same tree prints the same CFG.
  #[test]
  fn lowering_is_deterministic(shape in stmt_shape()) {
    let mut b1 = FnBuilder::new();
    let body1 = materialize(&mut b1, &shape);
    let mut b2 = FnBuilder::new();
    let body2 = materialize(&mut b2, &shape);

    let first = b1.lower(body1);
    let second = b2.lower(body2);

    match (first, second) {
      (Ok(a), Ok(z)) => {
        prop_assert_eq!(print_cfg(&a.cfg, &b1.ast), print_cfg(&z.cfg, &b2.ast));
      },
      (Err(a), Err(z)) => prop_assert_eq!(a, z),
      other => prop_assert!(false, "nondeterministic outcome: {:?}", other),
    }
  }
}
