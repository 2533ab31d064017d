use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Row, Table, Widget};

use typemeter::session::SessionResult;

use crate::ui::theme::Theme;

pub const COLUMNS: [&str; 6] = ["#", "WPM", "Accuracy", "Hesitation", "Time", "Date"];

pub struct HistoryTable<'a> {
    history: &'a [SessionResult],
    theme: &'a Theme,
}

impl<'a> HistoryTable<'a> {
    pub fn new(history: &'a [SessionResult], theme: &'a Theme) -> Self {
        Self { history, theme }
    }
}

/// Display cells for one history entry; `index` is zero-based.
pub fn row_cells(index: usize, result: &SessionResult) -> [String; 6] {
    [
        (index + 1).to_string(),
        result.wpm.to_string(),
        format!("{}%", result.accuracy),
        format!("{} ms", result.avg_hesitation),
        format!("{} s", result.time_taken),
        result.date.clone(),
    ]
}

impl Widget for HistoryTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" History (newest first) ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        if self.history.is_empty() {
            Paragraph::new(Line::styled(
                " No sessions yet.",
                Style::default().fg(colors.text_pending()),
            ))
            .block(block)
            .render(area, buf);
            return;
        }

        let header = Row::new(COLUMNS).style(
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        );
        let rows = self
            .history
            .iter()
            .enumerate()
            .map(|(i, r)| Row::new(row_cells(i, r)).style(Style::default().fg(colors.fg())));

        Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Length(6),
                Constraint::Length(10),
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Min(19),
            ],
        )
        .header(header)
        .block(block)
        .render(area, buf);
    }
}
