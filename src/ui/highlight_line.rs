use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};
use syntect::highlighting::{FontStyle, Style as SyntectStyle, Theme};
use syntect::{
    easy::HighlightLines,
    parsing::{SyntaxReference, SyntaxSet},
};

/// Highlights a single line on its own; lines of a diff are not contiguous
/// source, so no parse state is carried between calls.
pub fn highlight_line_content<'a>(
    content: &'a str,
    syntax: Option<&SyntaxReference>,
    syntax_set: &SyntaxSet,
    theme: &Theme,
) -> Vec<Span<'a>> {
    let Some(syntax) = syntax else {
        return vec![Span::raw(content)];
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    match highlighter.highlight_line(content, syntax_set) {
        Ok(ranges) => ranges
            .into_iter()
            .map(|(style, text)| Span::styled(text, syntect_style_to_ratatui(style)))
            .collect(),
        Err(_) => vec![Span::raw(content)],
    }
}

pub fn with_background(spans: Vec<Span<'_>>, bg: Color) -> Vec<Span<'_>> {
    spans
        .into_iter()
        .map(|span| {
            let style = span.style.bg(bg);
            Span::styled(span.content, style)
        })
        .collect()
}

fn syntect_style_to_ratatui(syntect_style: SyntectStyle) -> Style {
    let fg_color = Color::Rgb(
        syntect_style.foreground.r,
        syntect_style.foreground.g,
        syntect_style.foreground.b,
    );

    let mut style = Style::default().fg(fg_color);

    for (font_style, modifier) in [
        (FontStyle::BOLD, Modifier::BOLD),
        (FontStyle::ITALIC, Modifier::ITALIC),
        (FontStyle::UNDERLINE, Modifier::UNDERLINED),
    ] {
        if syntect_style.font_style.contains(font_style) {
            style = style.add_modifier(modifier);
        }
    }

    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use syntect::highlighting::ThemeSet;

    #[test]
    fn test_plain_text_without_syntax() {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let themes = ThemeSet::load_defaults();
        let spans = highlight_line_content(
            "just text",
            None,
            &syntax_set,
            &themes.themes["base16-ocean.dark"],
        );

        assert_eq!(spans, vec![Span::raw("just text")]);
    }

    #[test]
    fn test_highlighting_keeps_text() {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let themes = ThemeSet::load_defaults();
        let syntax = syntax_set.find_syntax_by_extension("rs");
        let line = "fn main() { let x = 1; }";

        let spans = highlight_line_content(
            line,
            syntax,
            &syntax_set,
            &themes.themes["base16-ocean.dark"],
        );
        let joined: String = spans.iter().map(|s| s.content.as_ref()).collect();

        assert_eq!(joined, line);
        assert!(spans.len() > 1);
    }

    #[test]
    fn test_with_background() {
        let spans = with_background(vec![Span::raw("a"), Span::raw("b")], Color::Blue);
        assert!(spans.iter().all(|s| s.style.bg == Some(Color::Blue)));
    }
}
