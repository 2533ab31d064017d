use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width at which the live stats get their own column.
const SIDEBAR_MIN_WIDTH: u16 = 90;

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(6),
                Constraint::Length(2),
            ])
            .split(area);

        if area.width >= SIDEBAR_MIN_WIDTH {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
                .split(vertical[1]);
            Self {
                header: vertical[0],
                main: horizontal[0],
                sidebar: Some(horizontal[1]),
                footer: vertical[2],
            }
        } else {
            Self {
                header: vertical[0],
                main: vertical[1],
                sidebar: None,
                footer: vertical[2],
            }
        }
    }
}

/// Greedily pack key hints into lines no wider than `width`.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let mut out: Vec<String> = Vec::new();
    let mut current = String::from(" ");

    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let candidate = if current.trim().is_empty() {
            format!("{current}{hint}")
        } else {
            format!("{current}  {hint}")
        };
        if candidate.chars().count() <= width || current.trim().is_empty() {
            current = candidate;
        } else {
            out.push(current);
            current = format!(" {hint}");
        }
    }

    if !current.trim().is_empty() {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_WIDTH: u16 = 48;
    const MIN_HEIGHT: u16 = 12;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_HEIGHT).min(area.height);

    let left = area.x + area.width.saturating_sub(target_w) / 2;
    let top = area.y + area.height.saturating_sub(target_h) / 2;

    Rect::new(left, top, target_w, target_h)
}
