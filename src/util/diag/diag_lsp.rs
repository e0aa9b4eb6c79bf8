//! LSP diagnostic type conversion

use base::{
    ln::LineTable,
    span::{LineColumn, Span},
};

use crate::util::diag::{self, Diagnostic};

impl diag::Severity {
    pub fn into_lsp_type(self) -> lsp_types::DiagnosticSeverity {
        use lsp_types::DiagnosticSeverity as D;

        match self {
            diag::Severity::Error => D::ERROR,
            diag::Severity::Warning => D::WARNING,
            diag::Severity::Info => D::INFORMATION,
            diag::Severity::Hint => D::HINT,
        }
    }
}

pub fn ln_col_to_lsp_position(ln_col: LineColumn) -> lsp_types::Position {
    lsp_types::Position {
        line: ln_col.line0(),
        character: ln_col.column0(),
    }
}

pub fn span_to_lsp_range(ln_tbl: &LineTable, span: Span) -> lsp_types::Range {
    let (start, end) = ln_tbl.line_column_span(span);

    lsp_types::Range {
        start: self::ln_col_to_lsp_position(start),
        end: self::ln_col_to_lsp_position(end),
    }
}

pub fn to_lsp_diagnostic(diag: &impl Diagnostic, ln_tbl: &LineTable) -> lsp_types::Diagnostic {
    let reason = diag.reason();
    let message = if reason.is_empty() {
        diag.msg()
    } else {
        format!("{}: {}", diag.msg(), reason)
    };

    lsp_types::Diagnostic {
        range: self::span_to_lsp_range(ln_tbl, diag.span()),
        severity: Some(diag.severity().into_lsp_type()),
        code: Some(lsp_types::NumberOrString::String(diag.code().to_string())),
        source: Some("psi".to_string()),
        message,
        ..Default::default()
    }
}
