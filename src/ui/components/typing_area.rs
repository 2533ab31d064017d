use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

/// Target text coloured against what has been typed so far.
pub struct TypingArea<'a> {
    target: &'a str,
    typed: &'a str,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(target: &'a str, typed: &'a str, theme: &'a Theme) -> Self {
        Self {
            target,
            typed,
            theme,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CellStatus {
    Correct,
    Incorrect(char),
    Cursor,
    Pending,
}

/// Compare position by position, like the accuracy metric does.
fn cell_statuses(target: &[char], typed: &[char]) -> Vec<CellStatus> {
    target
        .iter()
        .enumerate()
        .map(|(i, &expected)| match typed.get(i) {
            Some(&actual) if actual == expected => CellStatus::Correct,
            Some(&actual) => CellStatus::Incorrect(actual),
            None if i == typed.len() => CellStatus::Cursor,
            None => CellStatus::Pending,
        })
        .collect()
}

/// How a target character is drawn. Line breaks get a visible marker.
fn glyph(ch: char) -> String {
    match ch {
        '\n' => "\u{21b5}".to_string(),
        '\t' => "\u{2192}   ".to_string(),
        _ => ch.to_string(),
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let target: Vec<char> = self.target.chars().collect();
        let typed: Vec<char> = self.typed.chars().collect();

        let mut lines: Vec<Vec<Span>> = vec![Vec::new()];
        for (i, status) in cell_statuses(&target, &typed).into_iter().enumerate() {
            let expected = target[i];
            let (display, style) = match status {
                CellStatus::Correct => (glyph(expected), Style::default().fg(colors.text_correct())),
                CellStatus::Incorrect(actual) => {
                    let shown = if expected.is_whitespace() || actual.is_control() {
                        glyph(expected)
                    } else {
                        actual.to_string()
                    };
                    (
                        shown,
                        Style::default()
                            .fg(colors.text_incorrect())
                            .bg(colors.text_incorrect_bg())
                            .add_modifier(Modifier::UNDERLINED),
                    )
                }
                CellStatus::Cursor => (
                    glyph(expected),
                    Style::default()
                        .fg(colors.text_cursor_fg())
                        .bg(colors.text_cursor_bg()),
                ),
                CellStatus::Pending => (glyph(expected), Style::default().fg(colors.text_pending())),
            };

            if let Some(line) = lines.last_mut() {
                line.push(Span::styled(display, style));
            }
            if expected == '\n' {
                lines.push(Vec::new());
            }
        }

        // Characters typed past the end of the target.
        if typed.len() > target.len() {
            let overflow: String = typed[target.len()..].iter().collect();
            if let Some(line) = lines.last_mut() {
                line.push(Span::styled(
                    overflow,
                    Style::default()
                        .fg(colors.text_incorrect())
                        .add_modifier(Modifier::CROSSED_OUT),
                ));
            }
        }

        let block = Block::bordered()
            .title(" Type the text below ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines.into_iter().map(Line::from).collect::<Vec<_>>())
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
