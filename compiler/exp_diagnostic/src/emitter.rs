//! Plain-text rendering with `file:line:col` locations and a caret line.

use std::fmt::Write;

use exp_ir::SourceFile;

use crate::Diagnostic;

/// Render one diagnostic against its source file. Locations come from
/// [`SourceFile::line_col`], which is 1-based.
///
/// ```text
/// error[E1001]: expected `;` at offset 8
///   --> main.exp:1:9
///    |
///  1 | return 1
///    |         ^ expected `;`
/// ```
pub fn render(diag: &Diagnostic, source: &SourceFile) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}[{}]: {}", diag.severity, diag.code, diag.message);

    for label in &diag.labels {
        let (line, col) = source.line_col(label.span.start);
        let arrow = if label.is_primary { "-->" } else { ":::" };
        let _ = writeln!(out, "  {arrow} {}:{line}:{col}", source.name());

        let line_text = source
            .text()
            .lines()
            .nth((line as usize).saturating_sub(1))
            .unwrap_or("");
        let gutter = line.to_string();
        let pad = " ".repeat(gutter.len());
        let width = label.span.len().max(1) as usize;
        let marker = if label.is_primary { "^" } else { "-" };
        let _ = writeln!(out, " {pad} |");
        let _ = writeln!(out, " {gutter} | {line_text}");
        let _ = writeln!(
            out,
            " {pad} | {}{} {}",
            " ".repeat((col as usize).saturating_sub(1)),
            marker.repeat(width),
            label.message
        );
    }

    for note in &diag.notes {
        let _ = writeln!(out, "  = note: {note}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expected_token;

    #[test]
    fn test_render_points_at_column() {
        let source = SourceFile::new("main.exp", "var a = 1;\nreturn a");
        let diag = expected_token(19, "`;`");
        let text = render(&diag, &source);
        assert!(text.contains("main.exp:2:9"), "{text}");
        assert!(text.contains(" 2 | return a"), "{text}");
        assert!(text.contains("        ^ expected `;`"), "{text}");
    }

    #[test]
    fn test_render_first_column_and_empty_source() {
        let source = SourceFile::new("main.exp", "x");
        let text = render(&expected_token(0, "`;`"), &source);
        assert!(text.contains("main.exp:1:1"), "{text}");
        assert!(text.contains("   | ^ expected `;`"), "{text}");

        let empty = SourceFile::new("empty.exp", "");
        let text = render(&expected_token(0, "statement"), &empty);
        assert!(text.contains("empty.exp:1:1"), "{text}");
        assert!(text.contains(" 1 | \n"), "{text}");
    }
}
