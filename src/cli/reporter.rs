use colored::Colorize;
use jsz_common::diagnostics::{Diagnostic, DiagnosticSeverity};
use jsz_common::position::LineMap;
use rustc_hash::FxHashMap;

/// Renders diagnostics with the offending source line underneath.
pub struct Reporter {
    color: bool,
    sources: FxHashMap<String, (String, LineMap)>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: FxHashMap::default(),
        }
    }

    /// Remember the text of `file` so its diagnostics can show snippets.
    pub fn add_source(&mut self, file: &str, text: &str) {
        self.sources
            .insert(file.to_string(), (text.to_string(), LineMap::build(text)));
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|diagnostic| self.format_diagnostic(diagnostic))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = match self.position_for(&diagnostic.file_name, diagnostic.span.start) {
            Some((line, column)) => format!("{}:{line}:{column}", diagnostic.file_name),
            None if diagnostic.file_name.is_empty() => "<unknown>".to_string(),
            None => diagnostic.file_name.clone(),
        };
        output.push_str(" - ");
        output.push_str(&self.format_severity(diagnostic.severity));
        if diagnostic.code != 0 {
            output.push(' ');
            output.push_str(&self.format_code(diagnostic.code));
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message);
        if let Some(snippet) = self.format_snippet(diagnostic) {
            output.push_str(&snippet);
        }
        output
    }

    /// Format a plain error message, for failures without a diagnostic.
    pub fn format_error(&self, message: &str) -> String {
        format!("{}: {message}", self.format_severity(DiagnosticSeverity::Error))
    }

    ///   3   var unused = 1;
    ///           ~~~~~~
    fn format_snippet(&self, diagnostic: &Diagnostic) -> Option<String> {
        let (source, _) = self.sources.get(&diagnostic.file_name)?;
        let (line, column) = self.position_for(&diagnostic.file_name, diagnostic.span.start)?;
        let line_text = source.lines().nth(line as usize - 1)?;

        let length = diagnostic.span.end.saturating_sub(diagnostic.span.start).max(1) as usize;
        let mut underline = String::new();
        for ch in line_text.chars().take(column as usize - 1) {
            underline.push(if ch == '\t' { '\t' } else { ' ' });
        }
        let available = line_text.chars().count().saturating_sub(column as usize - 1).max(1);
        underline.push_str(&"~".repeat(length.min(available)));

        let underline = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        Some(format!("\n  {line:>3}   {line_text}\n        {underline}"))
    }

    fn position_for(&self, file: &str, offset: u32) -> Option<(u32, u32)> {
        let (_, line_map) = self.sources.get(file)?;
        let position = line_map.offset_to_position(offset);
        Some((position.line + 1, position.column + 1))
    }

    fn format_severity(&self, severity: DiagnosticSeverity) -> String {
        let label = severity.name();
        if !self.color {
            return label.to_string();
        }
        match severity {
            DiagnosticSeverity::Error => label.red().bold().to_string(),
            DiagnosticSeverity::Warning => label.yellow().bold().to_string(),
            DiagnosticSeverity::Info => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("JSZ{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
