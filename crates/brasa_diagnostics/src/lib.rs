pub mod diagnostic_report;

use brasa_type::file::SourceMap;
use colored::*;

pub use diagnostic_report::{Diagnostic, Label, Severity};

/// Render one diagnostic to stdout, with the source line and a caret.
pub fn render(
  diag: &Diagnostic,
  sm: &SourceMap,
) {
  print_header(diag);
  print_location(diag, sm);

  for label in &diag.labels {
    println!("  {} {}", "label:".yellow().bold(), label.message);
  }

  for note in &diag.notes {
    println!("  {} {}", "note:".cyan().bold(), note);
  }

  println!();
}

pub fn render_batch(
  diagnostics: &[Diagnostic],
  sm: &SourceMap,
) {
  for diag in diagnostics {
    render(diag, sm);
  }
}

fn print_header(diag: &Diagnostic) {
  let message = diag.message.bold();
  let code = diag.error_code.bold();

  match diag.severity {
    Severity::Info => {
      println!("{}[{}]: {}", "Info".blue().bold(), code.blue(), message)
    },
    Severity::Warning => {
      println!("{}[{}]: {}", "Warning".yellow().bold(), code.yellow(), message)
    },
    Severity::Error => {
      println!("{}[{}]: {}", "Error".red().bold(), code.red().bold(), message)
    },
    Severity::Hint => {
      println!("{}[{}]: {}", "Hint".cyan().bold(), code.cyan(), message)
    },
  }
}

fn print_location(
  diag: &Diagnostic,
  sm: &SourceMap,
) {
  let file = sm.get(&diag.primary_span.file);
  let (line, col) = sm.line_col(&diag.primary_span.file, diag.primary_span.start);

  println!(
    "{:2}{} {}:{}:{}",
    "",
    "-->".blue().bold(),
    file.path.display().to_string().bold(),
    line.to_string().bold(),
    col.to_string().bold(),
  );

  println!("{}", sm.snippet(&diag.primary_span));
}
