//! Markdown → ratatui `Text` for message bodies.
//!
//! Answers from the backend are markdown. `pulldown_cmark` events are folded
//! into styled lines: headings, emphasis, inline code, fenced code (coloured
//! with syntect), lists, quotes, links and simple tables. Colours come from
//! the active [`Palette`] so both themes stay readable.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::tui::theme::Palette;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Render `content` with body text in `body_fg`. Output owns its strings.
pub fn render(content: &str, body_fg: Color, palette: &Palette) -> Text<'static> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_TABLES);

    let mut builder = TextBuilder::new(body_fg, palette);
    for event in Parser::new_ext(content, options) {
        builder.event(event);
    }
    builder.finish()
}

/// How code text is currently being emitted.
enum CodeMode {
    Off,
    Plain,
    Highlighted(Box<HighlightLines<'static>>),
}

struct TextBuilder<'p> {
    lines: Vec<Line<'static>>,
    body_fg: Color,
    palette: &'p Palette,
    /// Inline style stack; nested styles are patched onto their parent.
    styles: Vec<Style>,
    /// Prefix spans repeated at the start of every line (quotes, code gutter).
    gutters: Vec<Span<'static>>,
    /// One entry per open list: `None` bullets, `Some(n)` the next number.
    lists: Vec<Option<u64>>,
    code: CodeMode,
    pending_link: Option<String>,
    /// A block just closed; the next block starts after a blank line.
    gap: bool,
    /// Cells of the table row being built.
    row: Option<Vec<String>>,
}

impl<'p> TextBuilder<'p> {
    fn new(body_fg: Color, palette: &'p Palette) -> Self {
        Self {
            lines: Vec::new(),
            body_fg,
            palette,
            styles: Vec::new(),
            gutters: Vec::new(),
            lists: Vec::new(),
            code: CodeMode::Off,
            pending_link: None,
            gap: false,
            row: None,
        }
    }

    fn finish(self) -> Text<'static> {
        Text::from(self.lines)
    }

    fn current_style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.body_fg))
    }

    fn push_style(&mut self, style: Style) {
        let merged = self.current_style().patch(style);
        self.styles.push(merged);
    }

    fn new_line(&mut self, spans: Vec<Span<'static>>) {
        let mut all = self.gutters.clone();
        all.extend(spans);
        self.lines.push(Line::from(all));
    }

    fn append(&mut self, span: Span<'static>) {
        match self.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.new_line(vec![span]),
        }
    }

    fn start_block(&mut self) {
        if self.gap {
            self.new_line(Vec::new());
            self.gap = false;
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if let Some(row) = self.row.as_mut() {
                    if let Some(cell) = row.last_mut() {
                        cell.push_str(&code);
                    }
                    return;
                }
                let style = Style::default()
                    .fg(self.palette.code_fg)
                    .bg(self.palette.code_bg);
                self.append(Span::styled(code.to_string(), style));
            }
            Event::SoftBreak => self.append(Span::raw(" ")),
            Event::HardBreak => self.new_line(Vec::new()),
            Event::Rule => {
                self.start_block();
                let rule = Span::styled("─".repeat(32), self.palette.dim());
                self.new_line(vec![rule]);
                self.gap = true;
            }
            Event::TaskListMarker(done) => {
                self.append(Span::raw(if done { "[x] " } else { "[ ] " }));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.start_block();
                self.new_line(Vec::new());
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                let style = heading_style(self.body_fg, level);
                let marks = "#".repeat(level as usize);
                self.new_line(vec![Span::styled(format!("{marks} "), style)]);
                self.push_style(style);
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.gutters.push(Span::styled("▎ ", self.palette.dim()));
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => self.open_code(kind),
            Tag::List(first) => {
                if self.lists.is_empty() {
                    self.start_block();
                }
                self.lists.push(first);
            }
            Tag::Item => {
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{indent}{n}. ");
                        *n += 1;
                        m
                    }
                    _ => format!("{indent}• "),
                };
                let style = self.palette.dim();
                self.new_line(vec![Span::styled(marker, style)]);
            }
            Tag::Table(_) => self.start_block(),
            Tag::TableHead | Tag::TableRow => self.row = Some(Vec::new()),
            Tag::TableCell => {
                if let Some(row) = self.row.as_mut() {
                    row.push(String::new());
                }
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.pending_link = Some(dest_url.to_string());
                self.push_style(
                    Style::default()
                        .fg(self.palette.accent)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.gap = true,
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.gap = true;
            }
            TagEnd::BlockQuote(_) => {
                self.gutters.pop();
                self.styles.pop();
                self.gap = true;
            }
            TagEnd::CodeBlock => {
                self.code = CodeMode::Off;
                self.gutters.pop();
                self.new_line(vec![Span::styled("╰──", self.palette.dim())]);
                self.gap = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.gap = true;
                }
            }
            TagEnd::TableHead | TagEnd::TableRow => {
                let header = matches!(tag, TagEnd::TableHead);
                if let Some(cells) = self.row.take() {
                    let mut style = Style::default().fg(self.body_fg);
                    if header {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    let sep = Span::styled(" │ ", self.palette.dim());
                    let mut spans = Vec::new();
                    for (i, cell) in cells.into_iter().enumerate() {
                        if i > 0 {
                            spans.push(sep.clone());
                        }
                        spans.push(Span::styled(cell, style));
                    }
                    self.new_line(spans);
                }
            }
            TagEnd::Table => self.gap = true,
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(url) = self.pending_link.take() {
                    let style = self.palette.dim();
                    self.append(Span::styled(format!(" <{url}>"), style));
                }
            }
            _ => {}
        }
    }

    fn open_code(&mut self, kind: CodeBlockKind<'_>) {
        if !self.lines.is_empty() {
            self.new_line(Vec::new());
        }
        self.gap = false;
        let lang = match &kind {
            CodeBlockKind::Fenced(info) => info.split_whitespace().next().unwrap_or(""),
            CodeBlockKind::Indented => "",
        };

        let border = self.palette.dim();
        let mut header = vec![Span::styled("╭──", border)];
        if !lang.is_empty() {
            header.push(Span::styled(format!(" {lang} "), border.add_modifier(Modifier::BOLD)));
        }
        self.new_line(header);
        self.gutters.push(Span::styled("│ ", border));

        let syntax = (!lang.is_empty())
            .then(|| SYNTAXES.find_syntax_by_token(lang))
            .flatten();
        let theme = THEMES.themes.get(self.palette.syntax_theme);
        self.code = match (syntax, theme) {
            (Some(syntax), Some(theme)) => {
                CodeMode::Highlighted(Box::new(HighlightLines::new(syntax, theme)))
            }
            _ => CodeMode::Plain,
        };
    }

    fn text(&mut self, raw: &str) {
        // ratatui renders '\t' with zero width
        let text = raw.replace('\t', "    ");

        if let Some(row) = self.row.as_mut() {
            if let Some(cell) = row.last_mut() {
                cell.push_str(&text);
            }
            return;
        }

        match std::mem::replace(&mut self.code, CodeMode::Off) {
            CodeMode::Highlighted(mut highlighter) => {
                for line in LinesWithEndings::from(&text) {
                    let spans = match highlighter.highlight_line(line, &SYNTAXES) {
                        Ok(ranges) => ranges
                            .into_iter()
                            .filter_map(|(style, fragment)| {
                                let fragment = fragment.trim_end_matches('\n');
                                (!fragment.is_empty()).then(|| {
                                    let fg = Color::Rgb(
                                        style.foreground.r,
                                        style.foreground.g,
                                        style.foreground.b,
                                    );
                                    Span::styled(fragment.to_string(), Style::default().fg(fg))
                                })
                            })
                            .collect(),
                        Err(_) => vec![Span::raw(line.trim_end_matches('\n').to_string())],
                    };
                    self.new_line(spans);
                }
                self.code = CodeMode::Highlighted(highlighter);
            }
            CodeMode::Plain => {
                let style = Style::default().fg(self.palette.code_fg);
                for line in text.lines() {
                    self.new_line(vec![Span::styled(line.to_string(), style)]);
                }
                self.code = CodeMode::Plain;
            }
            CodeMode::Off => {
                let style = self.current_style();
                self.append(Span::styled(text, style));
            }
        }
    }
}

fn heading_style(fg: Color, level: HeadingLevel) -> Style {
    let base = Style::default().fg(fg).add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => base.add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => base,
        _ => base.add_modifier(Modifier::ITALIC),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Theme;

    fn plain(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn dark() -> Palette {
        Palette::for_theme(Theme::Dark)
    }

    #[test]
    fn heading_text_inherits_heading_style() {
        let text = render("## Summary", Color::Blue, &dark());
        let line = &text.lines[0];
        assert!(line.spans.len() >= 2, "expected >= 2 spans, got {:?}", line);
        let body = &line.spans[1];
        assert_eq!(body.content, "Summary");
        assert!(body.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(body.style.fg, Some(Color::Blue));
    }

    #[test]
    fn bold_text_is_bold() {
        let text = render("The **budget** grew", Color::Blue, &dark());
        let span = text.lines[0].spans.iter().find(|s| s.content == "budget").unwrap();
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn inline_code_uses_palette() {
        let palette = dark();
        let text = render("Call `fetch()` first", Color::Blue, &palette);
        let span = text.lines[0].spans.iter().find(|s| s.content == "fetch()").unwrap();
        assert_eq!(span.style.fg, Some(palette.code_fg));
        assert_eq!(span.style.bg, Some(palette.code_bg));
    }

    #[test]
    fn code_block_is_framed() {
        let lines = plain(&render("```\nline1\nline2\n```", Color::Blue, &dark()));
        assert!(lines[0].starts_with('╭'), "got {:?}", lines[0]);
        assert_eq!(lines[1], "│ line1");
        assert_eq!(lines[2], "│ line2");
        assert!(lines.last().unwrap().starts_with('╰'));
    }

    #[test]
    fn fenced_rust_is_highlighted_in_both_themes() {
        for theme in [Theme::Dark, Theme::Light] {
            let text = render("```rust\nfn main() {}\n```", Color::Blue, &Palette::for_theme(theme));
            let body = &text.lines[1];
            assert!(
                body.spans.iter().any(|s| matches!(s.style.fg, Some(Color::Rgb(..)))),
                "expected syntect colours for {theme:?}"
            );
        }
    }

    #[test]
    fn plain_text_uses_body_colour() {
        let text = render("hello", Color::Green, &dark());
        assert_eq!(text.lines[0].spans[0].style.fg, Some(Color::Green));
    }

    #[test]
    fn lists_get_markers() {
        let lines = plain(&render("- one\n- two\n\n1. first\n2. second", Color::Blue, &dark()));
        assert!(lines.contains(&"• one".to_string()), "got {lines:?}");
        assert!(lines.contains(&"1. first".to_string()), "got {lines:?}");
        assert!(lines.contains(&"2. second".to_string()), "got {lines:?}");
    }

    #[test]
    fn tables_render_as_rows() {
        let lines = plain(&render("| a | b |\n|---|---|\n| 1 | 2 |", Color::Blue, &dark()));
        assert!(lines.contains(&"a │ b".to_string()), "got {lines:?}");
        assert!(lines.contains(&"1 │ 2".to_string()), "got {lines:?}");
    }

    #[test]
    fn tabs_expanded_to_spaces() {
        let text = render("```\n\tindented\n```", Color::Blue, &dark());
        assert!(plain(&text).iter().all(|l| !l.contains('\t')));
        assert!(plain(&text).iter().any(|l| l.contains("    indented")));
    }
}
