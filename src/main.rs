use std::fs::OpenOptions;
use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};

use hoops_roster::card::{CardFace, PlayerCard};
use hoops_roster::config::AppConfig;
use hoops_roster::http_client::init_http_client;
use hoops_roster::model::{Field, PlayerFields};
use hoops_roster::photo::{HttpPhotoSource, NoPhotos, PLACEHOLDER_ART, PhotoSource};
use hoops_roster::photo_cache::PhotoCache;
use hoops_roster::state::{AppState, Focus};
use hoops_roster::{Roster, SqliteStore};

struct App {
    state: AppState<SqliteStore>,
    should_quit: bool,
}

impl App {
    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.state.card.is_some() {
            self.on_card_key(key);
            return;
        }
        match self.state.focus {
            Focus::Grid => self.on_grid_key(key),
            Focus::Filter(_) | Focus::Edit(_) => self.on_input_key(key),
        }
    }

    fn on_grid_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char(' ') => self.state.select_cursor(),
            KeyCode::Char('/') | KeyCode::Char('f') => self.state.focus_filters(),
            KeyCode::Char('e') => self.state.focus_fields(),
            KeyCode::Char('r') | KeyCode::F(5) => self.state.load(),
            KeyCode::Char('c') => self.state.clear_filters(),
            KeyCode::Char('a') => self.state.add_player(),
            KeyCode::Char('u') => self.state.update_player(),
            KeyCode::Char('d') | KeyCode::Delete => self.state.delete_player(),
            KeyCode::Enter => self.state.open_card(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn on_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.focus_grid(),
            KeyCode::Tab | KeyCode::Down => self.state.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.state.focus_prev(),
            KeyCode::Backspace => self.state.backspace(),
            KeyCode::Enter => match self.state.focus {
                Focus::Filter(_) => self.state.apply_filters(),
                Focus::Edit(_) => self.state.focus_next(),
                Focus::Grid => {}
            },
            KeyCode::Char(c) => self.state.input_char(c),
            _ => {}
        }
    }

    fn on_card_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Char('f') | KeyCode::Enter => {
                self.state.flip_card();
            }
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('q') => self.state.close_card(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config);
    init_http_client(config.http_timeout_secs)?;

    let store = SqliteStore::open(&config.db_path)
        .with_context(|| format!("open roster db {}", config.db_path.display()))?;
    let photos: Box<dyn PhotoSource> = if config.photos_enabled {
        let mut source = HttpPhotoSource::new(config.photo_url_template.clone());
        if let Some(dir) = &config.photo_cache_dir {
            source = source.with_cache(PhotoCache::new(dir));
        }
        Box::new(source)
    } else {
        Box::new(NoPhotos)
    };

    let mut state = AppState::new(Roster::new(store), photos);
    state.load();
    log::info!("roster ui started on {}", config.db_path.display());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App {
        state,
        should_quit: false,
    };
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

/// The terminal belongs to the UI, so log records go to a file.
fn init_logging(config: &AppConfig) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    let file = config.log_file.as_ref().and_then(|path| {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        OpenOptions::new().create(true).append(true).open(path).ok()
    });
    match file {
        Some(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let state = &app.state;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(8),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(34)])
        .split(chunks[1]);
    render_grid(frame, body[0], state);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(7)])
        .split(body[1]);
    render_form(
        frame,
        side[0],
        "Filters",
        state.roster.criteria(),
        match state.focus {
            Focus::Filter(f) => Some(f),
            _ => None,
        },
    );
    render_form(
        frame,
        side[1],
        "Player",
        state.roster.fields(),
        match state.focus {
            Focus::Edit(f) => Some(f),
            _ => None,
        },
    );

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if let Some(card) = &state.card {
        render_card(frame, frame.size(), card);
    }
    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState<SqliteStore>) -> String {
    let selected = state
        .roster
        .selected_player()
        .map(|p| format!("{} ({})", p.name, p.player_id))
        .unwrap_or_else(|| "none".to_string());
    format!(
        " HOOPS ROSTER | {} players | Selected: {selected}",
        state.players().len()
    )
}

fn footer_text(state: &AppState<SqliteStore>) -> String {
    if state.card.is_some() {
        return "Space/Enter Flip | Esc/b Close".to_string();
    }
    match state.focus {
        Focus::Grid => {
            "j/k Move | Enter Card | f Filters | e Edit | a Add | u Update | d Delete | c Clear | r Reload | ? Help | q Quit".to_string()
        }
        Focus::Filter(_) => "Type to edit | Tab/↑/↓ Field | Enter Apply | Esc Grid".to_string(),
        Focus::Edit(_) => "Type to edit | Tab/↑/↓ Field | Esc Grid (then a/u to save)".to_string(),
    }
}

fn render_grid(frame: &mut Frame, area: Rect, state: &AppState<SqliteStore>) {
    let block = Block::default().title("Players").borders(Borders::ALL);
    let players = state.players();
    if players.is_empty() {
        let empty = Paragraph::new("No players to show")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(["Key", "Player ID", "Name", "Age", "Team", "Season"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let selected_key = state.roster.selected();
    let rows = players.iter().map(|p| {
        let style = if Some(p.player_key) == selected_key {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Row::new(vec![
            Cell::from(p.player_key.to_string()),
            Cell::from(p.player_id.clone()),
            Cell::from(p.name.clone()),
            Cell::from(p.age.map(|a| a.to_string()).unwrap_or_default()),
            Cell::from(p.team.clone().unwrap_or_default()),
            Cell::from(p.season.map(|s| s.to_string()).unwrap_or_default()),
        ])
        .style(style)
    });
    let widths = [
        Constraint::Length(5),
        Constraint::Length(11),
        Constraint::Min(16),
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Length(7),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut table_state = TableState::default();
    table_state.select(Some(state.cursor));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn render_form(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    fields: &PlayerFields,
    focused: Option<Field>,
) {
    let lines: Vec<Line> = Field::ALL
        .iter()
        .map(|field| {
            let active = focused == Some(*field);
            let label_style = if active {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let cursor = if active { "_" } else { "" };
            Line::from(vec![
                Span::styled(format!("{:>10}: ", field.label()), label_style),
                Span::raw(format!("{}{cursor}", fields.get(*field))),
            ])
        })
        .collect();

    let border = if focused.is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let form = Paragraph::new(lines).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(form, area);
}

fn console_text(state: &AppState<SqliteStore>) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_card(frame: &mut Frame, area: Rect, card: &PlayerCard) {
    let popup = centered_rect(70, 80, area);
    frame.render_widget(Clear, popup);

    let title = format!(
        " {} ({}) | [{}] ",
        card.player_name(),
        card.player_id(),
        card.flip_label()
    );
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    match card.face() {
        CardFace::Front => render_photo(frame, inner, card),
        CardFace::Back => render_stats(frame, inner, card),
    }
}

fn render_photo(frame: &mut Frame, area: Rect, card: &PlayerCard) {
    // Each cell shows two stacked pixels using the upper half block.
    let thumb = card
        .photo()
        .thumbnail(area.width as u32, (area.height as u32).saturating_mul(2));
    let Some(img) = thumb else {
        let art = Paragraph::new(PLACEHOLDER_ART)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(art, area);
        return;
    };

    let mut lines = Vec::new();
    for y in (0..img.height()).step_by(2) {
        let mut spans = Vec::with_capacity(img.width() as usize);
        for x in 0..img.width() {
            let top = img.get_pixel(x, y);
            let bottom = if y + 1 < img.height() {
                *img.get_pixel(x, y + 1)
            } else {
                *top
            };
            spans.push(Span::styled(
                "▀",
                Style::default()
                    .fg(Color::Rgb(top[0], top[1], top[2]))
                    .bg(Color::Rgb(bottom[0], bottom[1], bottom[2])),
            ));
        }
        lines.push(Line::from(spans));
    }
    let photo = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(photo, area);
}

fn render_stats(frame: &mut Frame, area: Rect, card: &PlayerCard) {
    let table = card.stat_table();
    if table.is_empty() {
        let empty = Paragraph::new("No season stats recorded")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let widths: Vec<Constraint> = table
        .headers
        .iter()
        .map(|h| match *h {
            "Team" => Constraint::Length(5),
            _ => Constraint::Length(6),
        })
        .collect();
    let header = Row::new(table.headers.iter().copied())
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = table.rows.iter().map(|r| Row::new(r.clone()));
    frame.render_widget(Table::new(rows, widths).header(header), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Hoops Roster - Help",
        "",
        "Grid:",
        "  j/k or ↑/↓   Move and select",
        "  Enter        Open player card",
        "  f or /       Edit filters (Enter applies)",
        "  c            Clear filters",
        "  e            Edit player fields",
        "  a / u / d    Add / Update / Delete",
        "  r / F5       Reload",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Card:",
        "  Space/Enter  Flip photo/stats",
        "  Esc / b      Close",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
