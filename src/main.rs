mod app;
mod event;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use typemeter::config::Config;
use typemeter::generator::presets::PRESETS;
use typemeter::session::SessionResult;
use typemeter::store::{HistoryStore, JsonStore, MemoryStore};

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::components::history_table::{COLUMNS, HistoryTable, row_cells};
use ui::components::menu::MenuAction;
use ui::components::results::ResultPanel;
use ui::components::typing_area::TypingArea;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "typemeter",
    version,
    about = "Measure typing speed and accuracy, then drill your weakest keys"
)]
struct Cli {
    #[arg(short, long, help = "Target text to type", conflicts_with_all = ["file", "preset"])]
    text: Option<String>,

    #[arg(short, long, help = "Read the target text from a file", conflicts_with = "preset")]
    file: Option<PathBuf>,

    #[arg(short, long, help = "Start on a preset passage (1-based)")]
    preset: Option<usize>,

    #[arg(long, help = "Print the session history and exit")]
    history: bool,

    #[arg(long, help = "Directory for session history and the log file")]
    data_dir: Option<PathBuf>,

    #[arg(long, help = "Theme name")]
    theme: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.to_string_lossy().to_string());
    }
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }

    init_logging(&config);

    let store: Box<dyn HistoryStore> = match JsonStore::with_base_dir(config.data_dir()) {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(error = %e, "data directory unusable, history will not be kept");
            Box::new(MemoryStore::default())
        }
    };

    if cli.history {
        print_history(&store.load_history());
        return Ok(());
    }

    let initial_text = match (&cli.text, &cli.file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        _ => None,
    };

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(
            requested = %config.theme,
            available = ?Theme::available_themes(),
            "unknown theme, using default"
        );
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));
    let mut app = App::new(config, theme, store);

    if let Some(text) = initial_text {
        app.start_with_text(&text, None);
    } else if let Some(n) = cli.preset {
        match n.checked_sub(1).filter(|i| *i < PRESETS.len()) {
            Some(i) => app.start_preset(i),
            None => anyhow::bail!("preset must be between 1 and {}", PRESETS.len()),
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Log to a file in the data directory; the terminal belongs to the UI.
fn init_logging(config: &Config) {
    let dir = config.data_dir();
    let file = fs::create_dir_all(&dir).and_then(|_| {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("typemeter.log"))
    });
    let Ok(file) = file else {
        return;
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    info!(version = env!("CARGO_PKG_VERSION"), "typemeter starting");
}

fn print_history(history: &[SessionResult]) {
    if history.is_empty() {
        println!("No sessions yet.");
        return;
    }
    println!(
        "{:>3}  {:>4}  {:>8}  {:>10}  {:>6}  {}",
        COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4], COLUMNS[5]
    );
    for (i, result) in history.iter().enumerate() {
        let [n, wpm, acc, hes, time, date] = row_cells(i, result);
        println!("{n:>3}  {wpm:>4}  {acc:>8}  {hes:>10}  {time:>6}  {date}");
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => match app.screen {
                AppScreen::Typing => app.paste(&text, Instant::now()),
                AppScreen::TextEntry => app.text_input.insert_str(&text),
                _ => {}
            },
            // Redraw only; keeps the live WPM ticking.
            AppEvent::Tick => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::PresetSelect => handle_preset_key(app, key),
        AppScreen::TextEntry => app.handle_text_entry(key),
        AppScreen::Typing => app.handle_typing_key(key, Instant::now()),
        AppScreen::Result => handle_result_key(app, key),
        AppScreen::History => handle_history_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => app.run_menu_action(app.menu.selected_action()),
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                app.run_menu_action(action);
            }
        }
        _ => {}
    }
}

fn handle_preset_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Up | KeyCode::Char('k') => app.preset_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.preset_next(),
        KeyCode::Enter => app.start_preset(app.preset_selected),
        KeyCode::Char(ch) => {
            if let Some(i) = ch.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                app.start_preset(i);
            }
        }
        _ => {}
    }
}


fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.begin_session(),
        KeyCode::Char('p') => app.start_practice(),
        KeyCode::Char('n') => app.run_menu_action(MenuAction::RandomPreset),
        KeyCode::Char('h') => app.go_to_history(),
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn handle_history_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
        app.go_to_menu();
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    frame.render_widget(Block::default().style(Style::default().bg(colors.bg())), area);

    let layout = AppLayout::new(area);

    let state = app.session.state().label();
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " typemeter ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" Status: {state} "),
            Style::default()
                .fg(colors.text_pending())
                .bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let hints: &[&str] = match app.screen {
        AppScreen::Menu => &["[1-4] Start", "[h] History", "[j/k] Move", "[Enter] Select", "[q] Quit"],
        AppScreen::PresetSelect => &["[1-8] Pick", "[Enter] Start", "[Esc] Back"],
        AppScreen::TextEntry => &["[Enter] Start", "[Esc] Back", "[Ctrl+U] Clear"],
        AppScreen::Typing => &["[Esc] Finish", "[Ctrl+R] Reset"],
        AppScreen::Result => &["[r] Retry", "[p] Practice", "[n] New", "[h] History", "[q] Menu"],
        AppScreen::History => &["[Esc] Back"],
    };
    let mut footer_lines: Vec<Line> = Vec::new();
    if let Some(status) = &app.status {
        footer_lines.push(Line::styled(
            format!(" {status}"),
            Style::default().fg(colors.warning()),
        ));
    }
    footer_lines.extend(
        pack_hint_lines(hints, layout.footer.width as usize)
            .into_iter()
            .map(|l| Line::styled(l, Style::default().fg(colors.text_pending()))),
    );
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);

    match app.screen {
        AppScreen::Menu => {
            frame.render_widget(&app.menu, centered_rect(50, 80, layout.main));
        }
        AppScreen::PresetSelect => render_presets(frame, app, layout.main),
        AppScreen::TextEntry => render_text_entry(frame, app, layout.main),
        AppScreen::Typing => render_typing(frame, app, &layout),
        AppScreen::Result => {
            if let Some(report) = &app.last_report {
                frame.render_widget(ResultPanel::new(report, app.theme), layout.main);
            }
            if let Some(sidebar) = layout.sidebar {
                frame.render_widget(HistoryTable::new(&app.history, app.theme), sidebar);
            }
        }
        AppScreen::History => {
            frame.render_widget(HistoryTable::new(&app.history, app.theme), layout.main);
        }
    }
}

fn render_presets(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let lines: Vec<Line> = PRESETS
        .iter()
        .enumerate()
        .map(|(i, preset)| {
            let selected = i == app.preset_selected;
            let style = if selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            let indicator = if selected { ">" } else { " " };
            Line::styled(format!(" {indicator} [{}] {}", i + 1, preset.name), style)
        })
        .collect();

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(PRESETS.len() as u16 + 2), Constraint::Min(3)])
        .split(area);
    let block = Block::bordered()
        .title(" Presets ")
        .border_style(Style::default().fg(colors.border()));
    frame.render_widget(Paragraph::new(lines).block(block), sections[0]);

    let preview = PRESETS[app.preset_selected].text;
    frame.render_widget(
        Paragraph::new(preview)
            .style(Style::default().fg(colors.text_pending()))
            .wrap(Wrap { trim: true })
            .block(Block::bordered().border_style(Style::default().fg(colors.border()))),
        sections[1],
    );
}

fn render_text_entry(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let (before, at, after) = app.text_input.render_parts();
    let cursor_style = Style::default()
        .fg(colors.text_cursor_fg())
        .bg(colors.text_cursor_bg());
    let line = Line::from(vec![
        Span::styled(before, Style::default().fg(colors.fg())),
        Span::styled(at.map_or(" ".to_string(), |c| c.to_string()), cursor_style),
        Span::styled(after, Style::default().fg(colors.fg())),
    ]);
    let block = Block::bordered()
        .title(" Target text ")
        .border_style(Style::default().fg(colors.accent()));
    frame.render_widget(
        Paragraph::new(line).block(block).wrap(Wrap { trim: false }),
        centered_rect(80, 30, area),
    );
}

fn render_typing(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let colors = &app.theme.colors;
    let now = Instant::now();
    frame.render_widget(
        TypingArea::new(app.session.expected_text(), app.session.typed_text(), app.theme),
        layout.main,
    );

    let label = Style::default().fg(colors.text_pending());
    let value = Style::default().fg(colors.accent());
    let stats = vec![
        Line::from(vec![
            Span::styled(" WPM      ", label),
            Span::styled(app.session.live_wpm(now).to_string(), value),
        ]),
        Line::from(vec![
            Span::styled(" Progress ", label),
            Span::styled(format!("{:.0}%", app.session.progress() * 100.0), value),
        ]),
        Line::from(vec![
            Span::styled(" Time     ", label),
            Span::styled(format!("{:.1}s", app.session.elapsed_secs(now)), value),
        ]),
        Line::from(vec![
            Span::styled(" Mistakes ", label),
            Span::styled(app.session.key_stats().total_mistakes().to_string(), value),
        ]),
    ];

    match layout.sidebar {
        Some(sidebar) => {
            let title = app.target_name.as_deref().unwrap_or("Custom text");
            let block = Block::bordered()
                .title(format!(" {title} "))
                .border_style(Style::default().fg(colors.border()));
            frame.render_widget(Paragraph::new(stats).block(block), sidebar);
        }
        None => {
            let compact: Vec<Span> = stats.into_iter().flat_map(|l| l.spans).collect();
            frame.render_widget(Paragraph::new(Line::from(compact)), layout.header);
        }
    }
}
