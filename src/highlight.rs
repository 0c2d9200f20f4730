use lazy_static::lazy_static;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use std::path::Path;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Only the head of large files is highlighted.
pub const MAX_PREVIEW_LINES: usize = 300;

const THEME_NAME: &str = "base16-eighties.dark";
const TAB: &str = "    ";

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

fn find_syntax(file_name: &str, content: &str) -> &'static SyntaxReference {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or(file_name);
    SYNTAX_SET
        .find_syntax_by_extension(extension)
        .or_else(|| SYNTAX_SET.find_syntax_by_first_line(content))
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
}

/// Color `content` for display, picking the language from `file_name`.
/// Unknown languages and highlighter failures fall back to plain lines.
pub fn highlight(content: &str, file_name: &str) -> Vec<Line<'static>> {
    let theme = match THEME_SET.themes.get(THEME_NAME) {
        Some(theme) => theme,
        None => return plain(content),
    };
    let syntax = find_syntax(file_name, content);
    log::debug!("highlight: {} as {}", file_name, syntax.name);

    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut lines = Vec::new();
    for line in LinesWithEndings::from(content).take(MAX_PREVIEW_LINES) {
        let ranges = match highlighter.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => ranges,
            Err(e) => {
                log::warn!("highlight: giving up on {}: {}", file_name, e);
                return plain(content);
            }
        };
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .map(|(style, text)| {
                let fg = style.foreground;
                Span::styled(clean(text), Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)))
            })
            .collect();
        lines.push(Line::from(spans));
    }
    lines
}

/// Uncolored lines, same truncation as [`highlight`].
pub fn plain(content: &str) -> Vec<Line<'static>> {
    content
        .lines()
        .take(MAX_PREVIEW_LINES)
        .map(|line| Line::raw(clean(line)))
        .collect()
}

fn clean(text: &str) -> String {
    text.trim_end_matches(['\n', '\r']).replace('\t', TAB)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_rust_source_is_colored() {
        let lines = highlight("fn main() {\n\tlet x = 1;\n}\n", "main.rs");
        assert_eq!(lines.len(), 3);
        assert_eq!(text_of(&lines[0]), "fn main() {");
        assert_eq!(text_of(&lines[1]), "    let x = 1;");
        assert!(lines[0]
            .spans
            .iter()
            .any(|span| matches!(span.style.fg, Some(Color::Rgb(..)))));
    }

    #[test]
    fn test_unknown_extension_passes_text_through() {
        let lines = highlight("just words\nmore words", "notes.unknownext");
        let texts: Vec<String> = lines.iter().map(text_of).collect();
        assert_eq!(texts, vec!["just words", "more words"]);
    }

    #[test]
    fn test_long_files_are_truncated() {
        let content = "x\n".repeat(MAX_PREVIEW_LINES + 50);
        assert_eq!(highlight(&content, "big.txt").len(), MAX_PREVIEW_LINES);
        assert_eq!(plain(&content).len(), MAX_PREVIEW_LINES);
    }
}
