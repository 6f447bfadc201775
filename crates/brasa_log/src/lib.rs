//! Logging utilities for the Brasa mid-end.
//!
//! Provides verbosity-gated stderr macros:
//! - Debug traces by component (`trace_dbg!`)
//! - Verbose logging (`log_dbg!`, `log_trc!`)
//!
//! All output goes to stderr to avoid mixing with dumps/stdout.

/// Components that can be traced independently of the global verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugTrace {
  Ast,
  Lower,
  Verify,
}

/// Logging knobs. The surrounding driver (out of scope here) fills this in;
/// tests and library callers usually pass `None` and get silence.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
  pub quiet: bool,
  pub verbose: u8,
  pub debug: bool,
  pub debug_trace: Vec<DebugTrace>,
}

pub fn effective_verbose(config: &LogConfig) -> u8 {
  if config.quiet {
    return 0;
  }

  if config.debug && config.verbose < 2 {
    return 2;
  }

  config.verbose
}

pub fn log_debug(config: &LogConfig) -> bool {
  effective_verbose(config) >= 2
}

pub fn log_trace(config: &LogConfig) -> bool {
  effective_verbose(config) >= 3
}

pub fn debug_trace_enabled(
  config: &LogConfig,
  trace: DebugTrace,
) -> bool {
  !config.quiet && (config.debug || config.debug_trace.contains(&trace))
}

/// Returns lowercase name of a DebugTrace variant for log output.
pub fn trace_name(trace: DebugTrace) -> &'static str {
  match trace {
    DebugTrace::Ast => "ast",
    DebugTrace::Lower => "lower",
    DebugTrace::Verify => "verify",
  }
}

/// Painted `debug[component]` tag. Kept out of the macros so expansion
/// sites don't need `colored` in scope.
pub fn debug_tag(trace: DebugTrace) -> String {
  use colored::Colorize;
  format!("{}[{}]", "debug".cyan().bold(), trace_name(trace))
}

pub fn level_tag(level: &str) -> String {
  use colored::Colorize;
  level.cyan().bold().to_string()
}

/// Log a debug trace for a specific component.
///
/// Output format: `debug[component]: message`
///
/// # Examples
///
/// ```ignore
/// trace_dbg!(&config, DebugTrace::Lower, "lowered while loop, exit={}", exit);
/// ```
#[macro_export]
macro_rules! trace_dbg {
  ($config:expr, $trace:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
    if $crate::debug_trace_enabled($config, $trace) {
      eprintln!(
        "{}: {}",
        $crate::debug_tag($trace),
        format!($fmt $(, $arg)*)
      );
    }
  }};
}

/// Log a verbose debug message (verbosity >= 2).
#[macro_export]
macro_rules! log_dbg {
  ($config:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
    if $crate::log_debug($config) {
      eprintln!("{}: {}", $crate::level_tag("debug"), format!($fmt $(, $arg)*));
    }
  }};
}

/// Log a trace message (verbosity >= 3).
#[macro_export]
macro_rules! log_trc {
  ($config:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
    if $crate::log_trace($config) {
      eprintln!("{}: {}", $crate::level_tag("trace"), format!($fmt $(, $arg)*));
    }
  }};
}
