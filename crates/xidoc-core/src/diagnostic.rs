use serde::Serialize;

use crate::source_map::Range;

pub const E_CODE_UNCLOSED: &str = "E_CODE_UNCLOSED";

pub const W_CODE_UNTAGGED: &str = "W_CODE_UNTAGGED";
pub const W_LANG_UNSUPPORTED: &str = "W_LANG_UNSUPPORTED";

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: DiagnosticSeverity,
    pub code: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        range: Range,
        severity: DiagnosticSeverity,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            range,
            severity,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }

    /// `line:col severity CODE message`, one-based.
    pub fn to_pretty(&self) -> String {
        format!(
            "{}:{}:{} {} {}",
            self.range.start.line + 1,
            self.range.start.character + 1,
            self.severity.label(),
            self.code,
            self.message
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl DiagnosticSeverity {
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        }
    }
}
