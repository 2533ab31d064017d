use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    RandomPreset,
    PickPreset,
    CustomText,
    PracticeDrill,
    History,
    Quit,
}

pub struct MenuItem {
    pub key: char,
    pub label: &'static str,
    pub description: &'static str,
    pub action: MenuAction,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: vec![
                MenuItem {
                    key: '1',
                    label: "Quick Test",
                    description: "Type a random preset passage",
                    action: MenuAction::RandomPreset,
                },
                MenuItem {
                    key: '2',
                    label: "Choose Preset",
                    description: "Pick one of the built-in passages",
                    action: MenuAction::PickPreset,
                },
                MenuItem {
                    key: '3',
                    label: "Custom Text",
                    description: "Enter or paste your own target text",
                    action: MenuAction::CustomText,
                },
                MenuItem {
                    key: '4',
                    label: "Practice Drill",
                    description: "Drill the weak keys from your last test",
                    action: MenuAction::PracticeDrill,
                },
                MenuItem {
                    key: 'h',
                    label: "History",
                    description: "Your last 20 sessions",
                    action: MenuAction::History,
                },
                MenuItem {
                    key: 'q',
                    label: "Quit",
                    description: "",
                    action: MenuAction::Quit,
                },
            ],
            selected: 0,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        self.selected = self.selected.checked_sub(1).unwrap_or(self.items.len() - 1);
    }

    pub fn selected_action(&self) -> MenuAction {
        self.items[self.selected].action
    }

    pub fn action_for_key(&self, key: char) -> Option<MenuAction> {
        self.items.iter().find(|i| i.key == key).map(|i| i.action)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(inner);

        let title = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "typemeter",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Typing speed & accuracy trainer",
                Style::default().fg(colors.fg()),
            )),
        ])
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let mut lines = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let label_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(
                format!(" {indicator} [{}] {}", item.key, item.label),
                label_style,
            )));
            if !item.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("       {}", item.description),
                    Style::default().fg(colors.text_pending()),
                )));
            }
        }
        Paragraph::new(lines).render(layout[1], buf);
    }
}
