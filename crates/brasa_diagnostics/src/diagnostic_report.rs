use brasa_type::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Info,
  Warning,
  Error,
  Hint,
}

#[derive(Debug, Clone)]
pub struct Label {
  pub span: Span,
  pub message: String,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
  pub severity: Severity,
  pub message: String,
  pub error_code: String,
  pub primary_span: Span,
  pub labels: Vec<Label>,
  pub notes: Vec<String>,
}

impl Diagnostic {
  pub fn new(
    severity: Severity,
    message: String,
    error_code: String,
    primary_span: Span,
  ) -> Self {
    Self {
      severity,
      message,
      error_code,
      primary_span,
      labels: Vec::new(),
      notes: Vec::new(),
    }
  }

  pub fn error(
    message: impl Into<String>,
    error_code: impl Into<String>,
    primary_span: Span,
  ) -> Self {
    Self::new(Severity::Error, message.into(), error_code.into(), primary_span)
  }

  pub fn warning(
    message: impl Into<String>,
    error_code: impl Into<String>,
    primary_span: Span,
  ) -> Self {
    Self::new(Severity::Warning, message.into(), error_code.into(), primary_span)
  }

  pub fn with_label(
    mut self,
    span: Span,
    message: impl Into<String>,
  ) -> Self {
    self.labels.push(Label {
      span,
      message: message.into(),
    });
    self
  }

  pub fn with_note(
    mut self,
    note: impl Into<String>,
  ) -> Self {
    self.notes.push(note.into());
    self
  }

  pub fn is_error(&self) -> bool {
    self.severity == Severity::Error
  }
}
