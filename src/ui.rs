use crate::client::AppSnapshot;
use color_eyre::eyre::{
    Result,
    eyre,
};
use crossterm::{
    event::{
        Event,
        EventStream,
        KeyCode,
        KeyEvent,
        KeyEventKind,
        KeyModifiers,
    },
    terminal::{
        disable_raw_mode,
        enable_raw_mode,
    },
};
use futures::StreamExt;
use itertools::Itertools;
use ratatui::{
    prelude::*,
    widgets::*,
};
use std::io::stdout;
use treasure_box::{
    BOX_COUNT,
    Phase,
};
use unicode_width::UnicodeWidthStr;

const GRID_COLUMNS: usize = 3;
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BoxTint {
    from: Color,
    to: Color,
}

// one gradient per box slot, same order as the board
const BOX_PALETTE: [BoxTint; BOX_COUNT] = [
    BoxTint {
        from: Color::Rgb(168, 85, 247),
        to: Color::Rgb(236, 72, 153),
    },
    BoxTint {
        from: Color::Rgb(59, 130, 246),
        to: Color::Rgb(6, 182, 212),
    },
    BoxTint {
        from: Color::Rgb(34, 197, 94),
        to: Color::Rgb(16, 185, 129),
    },
    BoxTint {
        from: Color::Rgb(234, 179, 8),
        to: Color::Rgb(249, 115, 22),
    },
    BoxTint {
        from: Color::Rgb(239, 68, 68),
        to: Color::Rgb(236, 72, 153),
    },
    BoxTint {
        from: Color::Rgb(99, 102, 241),
        to: Color::Rgb(168, 85, 247),
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserEvent {
    Quit,
    StartNewGame,
    SelectBox(usize),
    PlayAgain,
    Reset,
    Redraw,
}

#[derive(Debug)]
pub struct UiState {
    mode: Mode,
    cursor: usize,
    terminal: Option<Terminal<CrosstermBackend<std::io::Stdout>>>,
}

impl Default for UiState {
    fn default() -> Self {
        UiState {
            mode: Mode::Normal,
            cursor: 0,
            terminal: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum Mode {
    #[default]
    Normal,
    QuitModal,
}

pub type InputEventReceiver = EventStream;

pub fn input_event_stream() -> InputEventReceiver {
    EventStream::new()
}

pub async fn next_raw_event(events: &mut InputEventReceiver) -> Result<Event> {
    match events.next().await {
        Some(event) => Ok(event?),
        None => Err(eyre!("terminal input stream closed")),
    }
}

pub fn terminal_enter(state: &mut UiState) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    // Create a single persistent Terminal to preserve buffers across draws
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    state.terminal = Some(terminal);
    Ok(())
}

pub fn terminal_exit() -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
    Ok(())
}

fn first_open_box(used: &[usize]) -> Option<usize> {
    (0..BOX_COUNT).find(|i| !used.contains(i))
}

pub fn draw(state: &mut UiState, snap: &AppSnapshot) -> Result<()> {
    // keep the cursor off boxes that are already open
    if snap.phase == Phase::Playing && snap.used_boxes.contains(&state.cursor) {
        state.cursor = first_open_box(&snap.used_boxes).unwrap_or(0);
    }
    if let Some(mut term) = state.terminal.take() {
        term.draw(|f| ui(f, state, snap))?;
        state.terminal = Some(term);
    }
    Ok(())
}

fn is_ctrl_c(k: &KeyEvent) -> bool {
    k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn interpret_event(
    state: &mut UiState,
    snap: &AppSnapshot,
    event: Event,
) -> Option<UserEvent> {
    let k = match event {
        Event::Key(k) => k,
        Event::Resize(_, _) => return Some(UserEvent::Redraw),
        _ => return None,
    };
    if k.kind != KeyEventKind::Press {
        return None;
    }
    // raw mode swallows SIGINT, so Ctrl-C arrives as a key
    if is_ctrl_c(&k) {
        return Some(UserEvent::Quit);
    }

    if state.mode == Mode::QuitModal {
        return match k.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(UserEvent::Quit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                state.mode = Mode::Normal;
                Some(UserEvent::Redraw)
            }
            _ => None,
        };
    }

    match k.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            state.mode = Mode::QuitModal;
            return Some(UserEvent::Redraw);
        }
        KeyCode::Char('r') | KeyCode::Char('R') => return Some(UserEvent::Reset),
        _ => {}
    }

    match snap.phase {
        Phase::Menu => match k.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('s') => {
                Some(UserEvent::StartNewGame)
            }
            _ => None,
        },
        Phase::Playing => {
            if snap.selected_box.is_some() {
                // opening in progress
                return None;
            }
            match k.code {
                KeyCode::Char(c @ '1'..='6') => {
                    let idx = (c as u8 - b'1') as usize;
                    state.cursor = idx;
                    Some(UserEvent::SelectBox(idx))
                }
                KeyCode::Enter | KeyCode::Char(' ') => Some(UserEvent::SelectBox(state.cursor)),
                KeyCode::Left | KeyCode::Char('h') => {
                    if state.cursor % GRID_COLUMNS > 0 {
                        state.cursor -= 1;
                    }
                    Some(UserEvent::Redraw)
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    if state.cursor % GRID_COLUMNS < GRID_COLUMNS - 1 {
                        state.cursor += 1;
                    }
                    Some(UserEvent::Redraw)
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    if state.cursor >= GRID_COLUMNS {
                        state.cursor -= GRID_COLUMNS;
                    }
                    Some(UserEvent::Redraw)
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if state.cursor + GRID_COLUMNS < BOX_COUNT {
                        state.cursor += GRID_COLUMNS;
                    }
                    Some(UserEvent::Redraw)
                }
                _ => None,
            }
        }
        Phase::Result => match k.code {
            KeyCode::Enter | KeyCode::Char('n') | KeyCode::Char(' ') => {
                Some(UserEvent::PlayAgain)
            }
            _ => None,
        },
    }
}

fn ui(f: &mut Frame, state: &UiState, snap: &AppSnapshot) {
    // Clear the whole frame to avoid leftover fragments
    f.render_widget(Clear, f.area());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // title
            Constraint::Min(14),    // current screen
            Constraint::Length(3),  // status
            Constraint::Length(3),  // help
        ])
        .split(f.area());

    draw_title(f, chunks[0]);
    match snap.phase {
        Phase::Menu => draw_menu(f, chunks[1]),
        Phase::Playing => draw_playing(f, state, chunks[1], snap),
        Phase::Result => draw_result(f, chunks[1], snap),
    }
    draw_status(f, chunks[2], snap);
    draw_help(f, chunks[3], snap);
    draw_modals(f, state);
}

fn draw_title(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::styled(
            "👑 STREAMER BOX 👑",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled("powered by Pestilence", Style::default().fg(Color::Gray)),
    ];
    let title = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, area);
}

fn draw_menu(f: &mut Frame, area: Rect) {
    let panel = centered_rect(70, 80, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Yellow));
    let lines = vec![
        Line::from("🎁"),
        Line::from(""),
        Line::styled(
            "Benvenuto Streamer!",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::styled(
            "Qualcuno ha fatto una sub! È ora di aprire una Treasure Box e scoprire quale sfida ti aspetta!",
            Style::default().fg(Color::Gray),
        ),
        Line::from(""),
        Line::styled(
            "[Enter] 🎮 INIZIA NUOVO GIOCO",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(p, panel);
}

fn counter_line(used: &[usize]) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("Box usate: {}/{}", used.len(), BOX_COUNT),
        Style::default().fg(Color::Gray),
    )];
    if !used.is_empty() {
        spans.push(Span::styled(
            format!(" (Puoi sceglierne ancora {})", BOX_COUNT - used.len()),
            Style::default().fg(Color::Yellow),
        ));
        let opened = used.iter().map(|i| i + 1).join(", ");
        spans.push(Span::styled(
            format!(" | Aperte: {opened}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn draw_playing(f: &mut Frame, state: &UiState, area: Rect, snap: &AppSnapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .split(inner);

    let heading = if snap.selected_box.is_none() {
        "Scegli una Treasure Box!"
    } else {
        "Aprendo la box..."
    };
    let heading = Paragraph::new(Line::styled(
        heading,
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(heading, rows[0]);

    match snap.selected_box {
        None => draw_grid(f, state, rows[1], snap),
        Some(idx) => draw_opening(f, rows[1], idx, snap.frame),
    }

    f.render_widget(
        Paragraph::new(counter_line(&snap.used_boxes)).alignment(Alignment::Center),
        rows[2],
    );
}

fn draw_grid(f: &mut Frame, state: &UiState, area: Rect, snap: &AppSnapshot) {
    let grid = centered_rect(80, 100, area);
    let row_count = BOX_COUNT.div_ceil(GRID_COLUMNS);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, row_count as u32); row_count])
        .split(grid);
    for (r, row) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(*row);
        for (c, cell) in cols.iter().enumerate() {
            let idx = r * GRID_COLUMNS + c;
            if idx >= BOX_COUNT {
                break;
            }
            let used = snap.used_boxes.contains(&idx);
            draw_box_cell(f, *cell, idx, used, state.cursor == idx);
        }
    }
}

fn draw_box_cell(f: &mut Frame, area: Rect, idx: usize, used: bool, focused: bool) {
    let tint = BOX_PALETTE[idx];
    let (border_style, title_style, body) = if used {
        let dim = Style::default().fg(Color::DarkGray);
        (dim, dim, "❌")
    } else {
        (
            Style::default().fg(tint.from),
            Style::default().fg(tint.to).add_modifier(Modifier::BOLD),
            "🎁",
        )
    };
    let title = if focused && !used {
        format!("▶ Box {}", idx + 1)
    } else {
        format!("Box {}", idx + 1)
    };
    let border_type = if focused && !used {
        BorderType::Double
    } else {
        BorderType::Rounded
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .title(Span::styled(title, title_style));
    let inner = block.inner(area);
    f.render_widget(block, area);
    let mid = Rect::new(
        inner.x,
        inner.y + inner.height.saturating_sub(1) / 2,
        inner.width,
        inner.height.min(1),
    );
    f.render_widget(Paragraph::new(body).alignment(Alignment::Center), mid);
}

fn draw_opening(f: &mut Frame, area: Rect, idx: usize, frame: u64) {
    let tint = BOX_PALETTE.get(idx).copied().unwrap_or(BOX_PALETTE[0]);
    let spinner = SPINNER[(frame % SPINNER.len() as u64) as usize];
    let rect = centered_rect(30, 70, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(tint.from))
        .title(Span::styled(
            format!("Box {}", idx + 1),
            Style::default().fg(tint.to).add_modifier(Modifier::BOLD),
        ));
    let lines = vec![
        Line::from(""),
        Line::styled(
            format!("{spinner} ⭐ {spinner}"),
            Style::default().fg(tint.to),
        ),
        Line::from(""),
        Line::styled(
            "Preparati alla sorpresa...",
            Style::default().fg(Color::Yellow),
        ),
    ];
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(p, rect);
}

fn banner_rect(text: &str, area: Rect) -> Rect {
    let width = (text.width() as u16).saturating_add(6).min(area.width);
    let x = area.x + (area.width - width) / 2;
    Rect::new(x, area.y, width, area.height.min(3))
}

fn draw_result(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Green));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(inner);

    let header = Paragraph::new(vec![
        Line::from("🎉"),
        Line::from(""),
        Line::styled(
            "LA TUA SFIDA È:",
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, rows[0]);

    let reward = Paragraph::new(Line::styled(
        snap.current_reward,
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(249, 115, 22))),
    );
    f.render_widget(reward, banner_rect(snap.current_reward, rows[1]));

    let mut actions = vec![Line::from("")];
    if snap.used_boxes.len() < BOX_COUNT {
        actions.push(Line::styled(
            "[Enter] 🎲 APRI UN'ALTRA BOX",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    } else {
        actions.push(Line::styled(
            "[Enter] Tutte le box sono aperte: torna al menu",
            Style::default().fg(Color::Cyan),
        ));
    }
    actions.push(Line::styled(
        "[r] ↺ RICOMINCIA DA CAPO",
        Style::default().fg(Color::Gray),
    ));
    actions.push(Line::from(""));
    actions.push(counter_line(&snap.used_boxes));
    f.render_widget(
        Paragraph::new(actions).alignment(Alignment::Center),
        rows[2],
    );
}

fn draw_status(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let text = if snap.status.trim().is_empty() {
        "Pronto"
    } else {
        snap.status.as_str()
    };
    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Stato"))
        .style(Style::default().fg(Color::Green));
    f.render_widget(status, area);
}

fn help_text(snap: &AppSnapshot) -> &'static str {
    match snap.phase {
        Phase::Menu => "Enter/Space start | q/Esc quit",
        Phase::Playing if snap.selected_box.is_some() => "opening... | r reset | q/Esc quit",
        Phase::Playing => "1-6 open box | ←/→/↑/↓ move | Enter open | r reset | q/Esc quit",
        Phase::Result => "Enter/n next box | r reset | q/Esc quit",
    }
}

fn draw_help(f: &mut Frame, area: Rect, snap: &AppSnapshot) {
    let help = Paragraph::new(help_text(snap))
        .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(help, area);
}

fn draw_modals(f: &mut Frame, state: &UiState) {
    if state.mode == Mode::QuitModal {
        let area = centered_rect(40, 20, f.area());
        let block = Block::default().borders(Borders::ALL).title("Uscire?");
        let p = Paragraph::new("Vuoi chiudere Streamer Box?\ny = esci  n/Esc = annulla");
        f.render_widget(Clear, area);
        f.render_widget(block.clone(), area);
        f.render_widget(p, block.inner(area));
    }
}

fn centered_rect(w_percent: u16, h_percent: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - h_percent) / 2),
            Constraint::Percentage(h_percent),
            Constraint::Percentage((100 - h_percent) / 2),
        ])
        .split(r);

    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - w_percent) / 2),
            Constraint::Percentage(w_percent),
            Constraint::Percentage((100 - w_percent) / 2),
        ])
        .split(popup_layout[1]);

    vertical[1]
}
