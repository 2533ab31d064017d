use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use typemeter::engine::Issue;
use typemeter::session::SessionReport;

use crate::ui::theme::Theme;

/// Metrics, feedback and the generated drill for a finished session.
pub struct ResultPanel<'a> {
    report: &'a SessionReport,
    theme: &'a Theme,
}

impl<'a> ResultPanel<'a> {
    pub fn new(report: &'a SessionReport, theme: &'a Theme) -> Self {
        Self { report, theme }
    }
}

impl Widget for ResultPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let result = &self.report.result;

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(4),
                Constraint::Length(5),
            ])
            .split(area);

        let label = Style::default().fg(colors.text_pending());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);
        let metrics = Paragraph::new(Line::from(vec![
            Span::styled(" WPM ", label),
            Span::styled(result.wpm.to_string(), value),
            Span::styled("   Accuracy ", label),
            Span::styled(format!("{}%", result.accuracy), value),
            Span::styled("   Hesitation ", label),
            Span::styled(format!("{} ms", result.avg_hesitation), value),
            Span::styled("   Time ", label),
            Span::styled(format!("{} s", result.time_taken), value),
        ]))
        .block(
            Block::bordered()
                .title(" Results ")
                .border_style(Style::default().fg(colors.border())),
        );
        metrics.render(sections[0], buf);

        let issue_lines: Vec<Line> = self
            .report
            .issues
            .iter()
            .map(|issue| {
                let color = match issue {
                    Issue::NoMajorIssues => colors.success(),
                    Issue::StrugglingKeys(_) => colors.error(),
                    _ => colors.warning(),
                };
                Line::from(Span::styled(format!(" \u{2022} {issue}"), Style::default().fg(color)))
            })
            .collect();
        Paragraph::new(issue_lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .title(" Feedback ")
                    .border_style(Style::default().fg(colors.border())),
            )
            .render(sections[1], buf);

        Paragraph::new(Span::styled(
            self.report.practice.as_str(),
            Style::default().fg(colors.fg()),
        ))
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .title(" Practice ")
                .border_style(Style::default().fg(colors.border())),
        )
        .render(sections[2], buf);
    }
}
