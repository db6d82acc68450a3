//! Terminal output: ariadne reports and hint rendering

use std::io::IsTerminal;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use sideonly_ast::Span;
use sideonly_checker::{Diagnostic, Hint, Severity};

/// A source file the graph was extracted from
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

impl SourceFile {
    /// 1-based line and column of a byte offset
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        let before = &self.text[..floor_char_boundary(&self.text, offset)];
        let line = before.matches('\n').count() + 1;
        let col = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        (line, col)
    }
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Print a diagnostic, with source context when the source is available
pub fn report(diagnostic: &Diagnostic, source: Option<&SourceFile>) {
    let Some(source) = source else {
        eprintln!("{}", diagnostic.format_simple());
        return;
    };

    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };
    let len = source.text.len();
    let name = source.name.clone();
    let primary = diagnostic.span.clamped(len);

    let mut builder = Report::build(kind, name.clone(), primary.start)
        .with_config(Config::default().with_color(std::io::stderr().is_terminal()))
        .with_code(&diagnostic.code)
        .with_message(diagnostic.message())
        .with_label(
            Label::new((name.clone(), primary))
                .with_message(diagnostic.message())
                .with_color(Color::Red),
        );
    for related in &diagnostic.related {
        builder = builder.with_label(
            Label::new((name.clone(), related.span.clamped(len)))
                .with_message(&related.message)
                .with_color(Color::Blue),
        );
    }
    if !diagnostic.explanation.is_empty() {
        builder = builder.with_note(&diagnostic.explanation);
    }
    for suggestion in &diagnostic.suggestions {
        builder = builder.with_help(suggestion.description());
    }

    if let Err(e) = builder
        .finish()
        .eprint((name, Source::from(source.text.as_str())))
    {
        tracing::warn!("failed to render report: {}", e);
        eprintln!("{}", diagnostic.format_simple());
    }
}

/// Where a hint belongs, for listing
pub fn hint_location(hint: &Hint, source: Option<&SourceFile>) -> String {
    match source {
        Some(source) if !hint.span.is_dummy() => {
            let (line, col) = source.line_col(hint.span.start);
            format!("{}:{}:{}", source.name, line, col)
        }
        _ => format!("{}..{}", hint.span.start, hint.span.end),
    }
}

/// The source with each hint inserted on its own line above the line its
/// declaration starts on
pub fn render_hints(text: &str, hints: &[Hint], indent_width: usize) -> String {
    let mut pending: Vec<(usize, String)> = hints
        .iter()
        .filter(|hint| !hint.span.is_dummy())
        .map(|hint| (line_start(text, hint.span.start), hint.line(indent_width)))
        .collect();
    pending.sort_by_key(|(start, _)| *start);

    let mut output = String::with_capacity(text.len() + pending.len() * 32);
    let mut next = pending.iter().peekable();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        while let Some((_, hint)) = next.next_if(|(start, _)| *start <= offset) {
            output.push_str(hint);
            output.push('\n');
        }
        output.push_str(line);
        offset += line.len();
    }
    // hints past the end of the text
    for (_, hint) in next {
        if !output.is_empty() && !output.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(hint);
        output.push('\n');
    }
    output
}

fn line_start(text: &str, offset: usize) -> usize {
    let offset = floor_char_boundary(text, offset.min(text.len()));
    text[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Byte range of a span for display, e.g. in the `sides` listing
pub fn span_label(span: Span) -> String {
    if span.is_dummy() {
        String::new()
    } else {
        format!("{}..{}", span.start, span.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sideonly_ast::SideSet;
    use sideonly_symbols::DeclId;

    fn hint(start: usize, depth: usize, text: &str) -> Hint {
        Hint {
            decl: DeclId(0),
            sides: SideSet::SERVER,
            text: text.to_string(),
            depth,
            span: Span::new(start, start + 1),
        }
    }

    #[test]
    fn inserts_above_declaration_line() {
        let text = "class A {\n    void m() {}\n}\n";
        let m = text.find("void").unwrap();
        let rendered = render_hints(
            text,
            &[hint(m, 1, "@SideOnly({Side.SERVER})"), hint(0, 0, "@SideOnly({Side.SERVER})")],
            4,
        );
        assert_eq!(
            rendered,
            "@SideOnly({Side.SERVER})\nclass A {\n    @SideOnly({Side.SERVER})\n    void m() {}\n}\n"
        );
    }

    #[test]
    fn skips_hints_without_location() {
        let mut h = hint(0, 0, "@SideOnly({})");
        h.span = Span::dummy();
        assert_eq!(render_hints("class A {}\n", &[h], 4), "class A {}\n");
    }

    #[test]
    fn line_and_column() {
        let source = SourceFile {
            name: "A.java".into(),
            text: "class A {\n  int f;\n}".into(),
        };
        assert_eq!(source.line_col(0), (1, 1));
        assert_eq!(source.line_col(12), (2, 3));
        assert_eq!(source.line_col(999), (3, 2));
        assert_eq!(hint_location(&hint(12, 1, ""), Some(&source)), "A.java:2:3");
        assert_eq!(hint_location(&hint(12, 1, ""), None), "12..13");
    }
}
