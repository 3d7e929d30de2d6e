use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
};

/// Converts markdown text to ratatui Text for rendering in the terminal UI
///
/// Knowledge-base answers use a narrow slice of markdown: paragraphs, method
/// lists and fenced PowerShell examples. External model answers may be
/// richer, so headings, emphasis and inline code are handled too.
pub fn markdown_to_ratatui_text(markdown: &str) -> Text<'static> {
    let mut renderer = Renderer::default();
    for event in Parser::new_ext(markdown, Options::all()) {
        renderer.consume(event);
    }
    renderer.finish()
}

#[derive(Default)]
struct Renderer {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    style: Style,
    list_depth: usize,
}

impl Renderer {
    fn consume(&mut self, event: Event) {
        match event {
            Event::Text(text) => {
                self.current.push(Span::styled(text.to_string(), self.style));
            }
            Event::Code(code) => {
                self.current.push(Span::styled(
                    format!("`{}`", code),
                    Style::default().fg(Color::Green),
                ));
            }
            Event::Start(tag) => self.start(tag),
            Event::End(tag_end) => self.end(tag_end),
            Event::SoftBreak => self.current.push(Span::raw(" ")),
            Event::HardBreak => self.flush_line(),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag) {
        match tag {
            Tag::Heading { level, .. } => {
                let color = match level {
                    HeadingLevel::H1 => Color::Magenta,
                    HeadingLevel::H2 => Color::Cyan,
                    _ => Color::Blue,
                };
                self.style = Style::default().fg(color).add_modifier(Modifier::BOLD);
            }
            Tag::Paragraph => self.flush_line(),
            Tag::Strong => self.style = self.style.add_modifier(Modifier::BOLD),
            Tag::Emphasis => self.style = self.style.add_modifier(Modifier::ITALIC),
            Tag::CodeBlock(kind) => {
                self.flush_line();
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.lines.push(Line::from(Span::styled(
                            format!("[{}]", lang),
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                }
                self.style = Style::default().fg(Color::Green);
            }
            Tag::List(_) => self.list_depth += 1,
            Tag::Item => {
                let indent = "  ".repeat(self.list_depth.saturating_sub(1));
                self.current.push(Span::raw(format!("{indent}• ")));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::Heading(_) | TagEnd::Paragraph => {
                self.flush_line();
                self.lines.push(Line::from(""));
                self.style = Style::default();
            }
            TagEnd::Strong => self.style = self.style.remove_modifier(Modifier::BOLD),
            TagEnd::Emphasis => self.style = self.style.remove_modifier(Modifier::ITALIC),
            TagEnd::CodeBlock => {
                self.flush_code_block();
                self.lines.push(Line::from(""));
                self.style = Style::default();
            }
            TagEnd::List(_) => {
                self.list_depth = self.list_depth.saturating_sub(1);
                if self.list_depth == 0 {
                    self.flush_line();
                    self.lines.push(Line::from(""));
                }
            }
            TagEnd::Item => self.flush_line(),
            _ => {}
        }
    }

    /// Close the line under construction, if any
    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            let spans: Vec<Span> = self.current.drain(..).collect();
            self.lines.push(Line::from(spans));
        }
    }

    /// Code block text arrives as one event with embedded newlines; split it
    /// into display lines so scrolling and wrapping stay accurate
    fn flush_code_block(&mut self) {
        let spans: Vec<Span> = self.current.drain(..).collect();
        for span in spans {
            for piece in span.content.split('\n') {
                if !piece.is_empty() {
                    self.lines
                        .push(Line::from(Span::styled(piece.to_string(), span.style)));
                }
            }
        }
    }

    fn finish(mut self) -> Text<'static> {
        self.flush_line();
        Text::from(self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_lines(text: &Text<'static>) -> Vec<String> {
        text.lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn renders_list_items_with_bullets() {
        let text = markdown_to_ratatui_text("主なメソッド:\n\n- Start\n- Quit\n");
        let rendered = plain_lines(&text);
        assert!(rendered.iter().any(|l| l.contains("• Start")));
        assert!(rendered.iter().any(|l| l.contains("• Quit")));
    }

    #[test]
    fn splits_code_blocks_into_lines() {
        let text =
            markdown_to_ratatui_text("```powershell\n$d = [ChromeDriver]::new()\n$d.Start()\n```");
        let rendered = plain_lines(&text);
        assert!(rendered.iter().any(|l| l.contains("[powershell]")));
        assert!(rendered.iter().any(|l| l.contains("$d.Start()")));
    }

    #[test]
    fn plain_paragraph_survives() {
        let text = markdown_to_ratatui_text("こんにちは！");
        assert!(plain_lines(&text).iter().any(|l| l.contains("こんにちは")));
    }
}
