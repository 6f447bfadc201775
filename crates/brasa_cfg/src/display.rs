use std::fmt::Write;

use brasa_ast::Ast;

use crate::{Block, Cfg, Terminator};

/// Pretty printer for lowered CFGs.
///
/// Output is deterministic (blocks in creation order) so it can be diffed
/// and asserted against in tests.
pub struct CfgPrinter<'a> {
  cfg: &'a Cfg,
  ast: &'a Ast,
  output: String,
}

impl<'a> CfgPrinter<'a> {
  pub fn new(
    cfg: &'a Cfg,
    ast: &'a Ast,
  ) -> Self {
    Self {
      cfg,
      ast,
      output: String::new(),
    }
  }

  pub fn print(mut self) -> String {
    let cfg = self.cfg;

    writeln!(self.output, "=== CFG ===\n").unwrap();
    writeln!(self.output, "fn {} {{", cfg.name).unwrap();

    for (id, block) in cfg.blocks.iter() {
      let entry_mark = if id == cfg.entry_block { " (entry)" } else { "" };
      writeln!(self.output, "\n  {}:{}", block.label, entry_mark).unwrap();
      self.print_block(block);
    }

    writeln!(self.output, "}}").unwrap();
    self.output
  }

  fn print_block(
    &mut self,
    block: &Block,
  ) {
    let cfg = self.cfg;
    let ast = self.ast;

    for &payload in &block.statements {
      writeln!(self.output, "    {}", ast.expr_text(payload)).unwrap();
    }

    match &block.terminator {
      Terminator::Goto(target) => {
        writeln!(self.output, "    goto {}", cfg.block(*target).label).unwrap();
      },
      Terminator::Branch {
        condition,
        then_block,
        else_block,
      } => {
        writeln!(
          self.output,
          "    if ({}) -> {} else {}",
          ast.expr_text(*condition),
          cfg.block(*then_block).label,
          cfg.block(*else_block).label
        )
        .unwrap();
      },
      Terminator::Return(value) => match value {
        Some(value) => writeln!(self.output, "    return {}", ast.expr_text(*value)).unwrap(),
        None => writeln!(self.output, "    return").unwrap(),
      },
      Terminator::Unreachable => {
        writeln!(self.output, "    unreachable").unwrap();
      },
    }
  }
}

/// Render a CFG as text.
pub fn print_cfg(
  cfg: &Cfg,
  ast: &Ast,
) -> String {
  CfgPrinter::new(cfg, ast).print()
}

/// Render a CFG as a Graphviz digraph, one node per block.
pub fn cfg_to_dot(
  cfg: &Cfg,
  ast: &Ast,
) -> String {
  let mut out = String::new();
  writeln!(out, "digraph \"{}\" {{", cfg.name).unwrap();
  writeln!(out, "  node [shape=box];").unwrap();

  for (id, block) in cfg.blocks.iter() {
    let mut body = String::new();
    for &payload in &block.statements {
      body.push_str(&escape(ast.expr_text(payload)));
      body.push_str("\\n");
    }
    if let Terminator::Return(value) = &block.terminator {
      match value {
        Some(value) => {
          body.push_str("return ");
          body.push_str(&escape(ast.expr_text(*value)));
          body.push_str("\\n");
        },
        None => body.push_str("return\\n"),
      }
    }

    writeln!(out, "  b{} [label=\"{}\\n{}\"];", id.index(), escape(&block.label), body).unwrap();
  }

  for (id, block) in cfg.blocks.iter() {
    match &block.terminator {
      Terminator::Goto(target) => {
        writeln!(out, "  b{} -> b{};", id.index(), target.index()).unwrap();
      },
      Terminator::Branch {
        condition,
        then_block,
        else_block,
      } => {
        let cond = escape(ast.expr_text(*condition));
        writeln!(out, "  b{} -> b{} [label=\"{}\"];", id.index(), then_block.index(), cond).unwrap();
        writeln!(out, "  b{} -> b{} [label=\"!({})\"];", id.index(), else_block.index(), cond).unwrap();
      },
      Terminator::Return(_) | Terminator::Unreachable => {},
    }
  }

  writeln!(out, "}}").unwrap();
  out
}

fn escape(s: &str) -> String {
  s.replace('\\', "\\\\").replace('"', "\\\"")
}
