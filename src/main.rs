use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use wk_poule::config::AppConfig;
use wk_poule::form::PredictionForm;
use wk_poule::gateway::{Gateway, UnconfiguredGateway};
use wk_poule::leaderboard::{EMPTY_LEADERBOARD, ranked_rows};
use wk_poule::rest::RestGateway;
use wk_poule::rounds::Round;
use wk_poule::session::SessionStore;
use wk_poule::state::{
    AppState, Command, Delta, FormScreen, FormTab, LoginField, PasswordField, Screen, Status,
    Tone, apply_delta,
};
use wk_poule::worker::Worker;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<Command>>,
    leaderboard_refresh: Duration,
    last_leaderboard_refresh: Instant,
}

impl App {
    fn new(state: AppState, cmd_tx: Option<mpsc::Sender<Command>>, refresh: Duration) -> Self {
        Self {
            state,
            should_quit: false,
            cmd_tx,
            leaderboard_refresh: refresh,
            last_leaderboard_refresh: Instant::now()
                .checked_sub(refresh)
                .unwrap_or_else(Instant::now),
        }
    }

    fn send(&mut self, cmd: Command, what: &str) -> bool {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log(format!("[WARN] {what} unavailable"));
            return false;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log(format!("[ERROR] {what} request failed"));
            return false;
        }
        true
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.state.help_overlay {
            self.state.help_overlay = false;
            return;
        }
        match self.state.screen {
            Screen::Login => self.on_login_key(key),
            Screen::ChangePassword => self.on_password_key(key),
            Screen::Leaderboard => self.on_leaderboard_key(key),
            Screen::Account => self.on_account_key(key),
            Screen::Predictions | Screen::Admin => self.on_form_key(key),
        }
    }

    fn on_login_key(&mut self, key: KeyEvent) {
        let login = &mut self.state.login;
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
                login.focus = match login.focus {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
            KeyCode::Backspace => {
                match login.focus {
                    LoginField::Email => login.email.pop(),
                    LoginField::Password => login.password.pop(),
                };
            }
            KeyCode::Char(ch) => match login.focus {
                LoginField::Email => login.email.push(ch),
                LoginField::Password => login.password.push(ch),
            },
            KeyCode::Enter => self.request_login(),
            _ => {}
        }
    }

    fn on_password_key(&mut self, key: KeyEvent) {
        let form = &mut self.state.password;
        match key.code {
            KeyCode::Esc => self.state.screen = Screen::Account,
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::Backspace => {
                form.field_mut().pop();
            }
            KeyCode::Char(ch) => form.field_mut().push(ch),
            KeyCode::Enter => self.request_password_change(),
            _ => {}
        }
    }

    fn on_leaderboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('r') => self.request_leaderboard(true),
            KeyCode::Char('p') => self.open_predictions(),
            KeyCode::Char('a') => self.open_admin(),
            KeyCode::Char('c') => self.open_account(),
            KeyCode::Char('o') => {
                self.send(Command::Logout, "Logout");
            }
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn on_account_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Char('b') => self.state.screen = Screen::Leaderboard,
            KeyCode::Char('w') => {
                self.state.password = Default::default();
                self.state.screen = Screen::ChangePassword;
            }
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') => {
                self.state.screen = Screen::Leaderboard;
                return;
            }
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('s') => {
                self.request_save();
                return;
            }
            KeyCode::Char('?') => {
                self.state.help_overlay = true;
                return;
            }
            _ => {}
        }

        let Some(screen) = self.state.form_screen_mut() else {
            return;
        };
        let mut warning = None;
        match key.code {
            KeyCode::Tab => screen.toggle_tab(),
            KeyCode::Char('j') | KeyCode::Down => screen.select_next(),
            KeyCode::Char('k') | KeyCode::Up => screen.select_prev(),
            KeyCode::Char('l') | KeyCode::Right => screen.column_next(),
            KeyCode::Char('h') | KeyCode::Left => screen.column_prev(),
            KeyCode::Char(' ') | KeyCode::Enter => warning = screen.toggle_selected(),
            KeyCode::Char(ch) if ch.is_ascii_digit() => screen.type_digit(ch),
            KeyCode::Backspace | KeyCode::Delete => screen.erase_digit(),
            _ => {}
        }
        if let Some(warning) = warning {
            self.state.push_log(format!("[WARN] {warning}"));
        }
    }

    fn request_login(&mut self) {
        if self.state.login.inflight {
            return;
        }
        let cmd = Command::Login {
            email: self.state.login.email.clone(),
            password: self.state.login.password.clone(),
        };
        if self.send(cmd, "Login") {
            self.state.login.inflight = true;
            self.state.login.status = Some(Status::new(Tone::Info, "Logging in..."));
        }
    }

    fn request_password_change(&mut self) {
        if self.state.password.inflight {
            return;
        }
        let change = self.state.password.change.clone();
        if self.send(Command::ChangePassword(change), "Password change") {
            self.state.password.inflight = true;
            self.state.password.status = Some(Status::new(Tone::Info, "Bezig met verifiëren..."));
        }
    }

    fn request_leaderboard(&mut self, announce: bool) {
        self.last_leaderboard_refresh = Instant::now();
        let Some(cmd) = self.state.leaderboard_command() else {
            return;
        };
        if !self.send(cmd, "Leaderboard") {
            self.state.leaderboard_loading = false;
            return;
        }
        if announce {
            self.state.push_log("[INFO] Leaderboard request sent");
        }
    }

    fn open_predictions(&mut self) {
        self.state.screen = Screen::Predictions;
        let user = self.state.session.clone();
        if self.send(Command::LoadPredictions { user }, "Predictions") {
            self.state.predictions.loading = true;
        }
    }

    fn open_admin(&mut self) {
        let Some(user) = self.state.session.clone() else {
            self.state.screen = Screen::Login;
            return;
        };
        self.state.screen = Screen::Admin;
        if self.send(Command::LoadAdmin { user }, "Admin") {
            self.state.admin.loading = true;
        }
    }

    fn open_account(&mut self) {
        let Some(user) = self.state.session.clone() else {
            self.state.screen = Screen::Login;
            return;
        };
        self.state.screen = Screen::Account;
        self.send(Command::LoadProfile { user }, "Profile");
    }

    fn request_save(&mut self) {
        let Some(cmd) = self.state.save_command() else {
            return;
        };
        if !self.send(cmd, "Save")
            && let Some(screen) = self.state.form_screen_mut()
        {
            screen.saving = false;
            screen.status = None;
        }
    }

    fn maybe_refresh_leaderboard(&mut self) {
        if self.state.screen != Screen::Leaderboard || self.state.leaderboard_loading {
            return;
        }
        if self.last_leaderboard_refresh.elapsed() >= self.leaderboard_refresh {
            self.request_leaderboard(false);
        }
    }
}

fn main() -> io::Result<()> {
    let config = AppConfig::load();
    let sessions = SessionStore::from_override(config.session_file.clone());

    let gateway: Arc<dyn Gateway> = match config.gateway.clone() {
        Ok(cfg) => match RestGateway::new(&cfg) {
            Ok(rest) => Arc::new(rest),
            Err(err) => Arc::new(UnconfiguredGateway::new(err)),
        },
        Err(err) => Arc::new(UnconfiguredGateway::new(err)),
    };

    let mut state = AppState::with_session(sessions.load());
    state.config_warning = config.config_warning();
    if let Some(warning) = state.config_warning.clone() {
        state.push_log(format!("[ERROR] {warning}"));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    Worker::new(gateway, config.schema.contract(), sessions).spawn(tx, cmd_rx);

    let mut app = App::new(state, Some(cmd_tx), config.leaderboard_poll);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.maybe_refresh_leaderboard();

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
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let state = &app.state;
    match state.screen {
        Screen::Login => render_login(frame, chunks[1], state),
        Screen::Leaderboard => render_leaderboard(frame, chunks[1], state),
        Screen::Predictions => render_form(frame, chunks[1], &state.predictions, "Voorspellingen"),
        Screen::Admin => render_form(frame, chunks[1], &state.admin, "Admin"),
        Screen::Account => render_account(frame, chunks[1], state),
        Screen::ChangePassword => render_password(frame, chunks[1], state),
    }

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Login => "WK POULE | Inloggen",
        Screen::Leaderboard => "WK POULE | Ranglijst",
        Screen::Predictions => "WK POULE | Voorspellingen",
        Screen::Admin => "WK POULE | Admin",
        Screen::Account => "WK POULE | Account",
        Screen::ChangePassword => "WK POULE | Wachtwoord wijzigen",
    };
    let who = state
        .session
        .as_ref()
        .map(|u| u.display_name().or(u.email()).unwrap_or("?").to_string())
        .unwrap_or_else(|| "niet ingelogd".to_string());
    let line1 = format!("  .-.  {title}");
    let line2 = format!(" /___\\ {who}");
    let line3 = match &state.config_warning {
        Some(warning) => format!("  |_|  ⚠️ {warning}"),
        None => "  |_|".to_string(),
    };
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> &'static str {
    match state.screen {
        Screen::Login => "Tab Field | Enter Login | Esc Quit",
        Screen::ChangePassword => "Tab Field | Enter Submit | Esc Back",
        Screen::Leaderboard => {
            "p Predictions | a Admin | c Account | r Refresh | o Logout | ? Help | q Quit"
        }
        Screen::Account => "w Change password | b/Esc Back | ? Help | q Quit",
        Screen::Predictions | Screen::Admin => {
            concat!(
                "Tab Matches/Knockout | j/k/↑/↓ Move | h/l/←/→ Column | ",
                "0-9 Score | Space Toggle | s Save | b/Esc Back"
            )
        }
    }
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Info => Style::default().fg(Color::Gray),
        Tone::Success => Style::default().fg(Color::Green),
        Tone::Warning => Style::default().fg(Color::Yellow),
        Tone::Error => Style::default().fg(Color::Red),
    }
}

fn render_status(frame: &mut Frame, area: Rect, status: Option<&Status>) {
    let Some(status) = status else {
        return;
    };
    let paragraph = Paragraph::new(status.text.as_str()).style(tone_style(status.tone));
    frame.render_widget(paragraph, area);
}

fn input_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let style = if focused {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::styled(format!("{marker}{label:<22}{value}"), style)
}

fn masked(value: &str) -> String {
    "*".repeat(value.chars().count())
}

fn render_login(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(60, 50, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(2)])
        .split(popup);

    let login = &state.login;
    let lines = vec![
        input_line("E-mail", &login.email, login.focus == LoginField::Email),
        input_line(
            "Wachtwoord",
            &masked(&login.password),
            login.focus == LoginField::Password,
        ),
    ];
    let form =
        Paragraph::new(lines).block(Block::default().title("Inloggen").borders(Borders::ALL));
    frame.render_widget(form, rows[0]);
    render_status(frame, rows[1], login.status.as_ref());
}

fn render_password(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(70, 60, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(2)])
        .split(popup);

    let form = &state.password;
    let change = &form.change;
    let lines = vec![
        input_line("E-mail", &change.email, form.focus == PasswordField::Email),
        input_line(
            "Oud wachtwoord",
            &masked(&change.old_password),
            form.focus == PasswordField::Old,
        ),
        input_line(
            "Nieuw wachtwoord",
            &masked(&change.new_password),
            form.focus == PasswordField::New,
        ),
        input_line(
            "Bevestig wachtwoord",
            &masked(&change.confirm_password),
            form.focus == PasswordField::Confirm,
        ),
    ];
    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Wachtwoord wijzigen").borders(Borders::ALL));
    frame.render_widget(paragraph, rows[0]);
    render_status(frame, rows[1], form.status.as_ref());
}

fn render_leaderboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Ranglijst").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    if state.leaderboard.is_empty() {
        let text = if state.leaderboard_loading {
            "Laden..."
        } else {
            EMPTY_LEADERBOARD
        };
        let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let rows = ranked_rows(&state.leaderboard);
    let mut lines = vec![Line::styled(
        format!("{:>4}  {:<30} {:>8}", "#", "Speler", "Punten"),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    let visible = inner.height.saturating_sub(1) as usize;
    for row in rows.iter().take(visible) {
        lines.push(Line::raw(format!(
            "{:>4}  {:<30} {:>8}",
            row.rank, row.name, row.points
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_account(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = match &state.profile {
        Some(profile) => format!(
            "Naam\n  {}\n\nE-mailadres\n  {}",
            profile.name_label(),
            profile.email_label()
        ),
        None => "Laden...".to_string(),
    };
    let paragraph =
        Paragraph::new(text).block(Block::default().title("Mijn account").borders(Borders::ALL));
    frame.render_widget(paragraph, centered_rect(60, 60, area));
}

fn render_form(frame: &mut Frame, area: Rect, screen: &FormScreen, title: &str) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let tab = match screen.tab {
        FormTab::Matches => "Wedstrijden",
        FormTab::Knockout => "Knock-out",
    };
    let block = Block::default()
        .title(format!("{title} | {tab}"))
        .borders(Borders::ALL);
    let inner = block.inner(rows[0]);
    frame.render_widget(block, rows[0]);

    match &screen.form {
        None => {
            let text = if screen.loading { "Laden..." } else { "Geen gegevens" };
            let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, inner);
        }
        Some(form) => {
            let (selected_line, lines) = match screen.tab {
                FormTab::Matches => match_lines(form, screen),
                FormTab::Knockout => knockout_lines(form, screen),
            };
            let visible = inner.height as usize;
            let (start, end) = visible_range(selected_line, lines.len(), visible);
            let window: Vec<Line> = lines[start..end].to_vec();
            frame.render_widget(Paragraph::new(window), inner);
        }
    }

    render_status(frame, rows[1], screen.status.as_ref());
}

fn cell(text: &str, width: usize, selected: bool) -> Span<'static> {
    let shown = if text.is_empty() { "-" } else { text };
    let style = if selected {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default()
    };
    Span::styled(format!("{shown:^width$}"), style)
}

/// Lines for the group cards; returns the line index of the cursor row too.
fn match_lines(form: &PredictionForm, screen: &FormScreen) -> (usize, Vec<Line<'static>>) {
    let mut lines = Vec::new();
    let mut selected_line = 0;
    let mut idx = 0;
    for group in &form.groups {
        lines.push(Line::styled(
            format!("Groep {}", group.label),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        for m in &group.matches {
            let selected = idx == screen.row;
            if selected {
                selected_line = lines.len();
            }
            let prefix = if selected { "> " } else { "  " };
            lines.push(Line::from(vec![
                Span::raw(format!("{prefix}{:>22} ", m.home)),
                cell(&m.score.home, 4, selected && screen.column == 0),
                Span::raw(" - "),
                cell(&m.score.away, 4, selected && screen.column == 1),
                Span::raw(format!(" {:<22}", m.away)),
            ]));
            idx += 1;
        }
    }
    if lines.is_empty() {
        lines.push(Line::raw("Geen wedstrijden"));
    }
    (selected_line, lines)
}

fn knockout_lines(form: &PredictionForm, screen: &FormScreen) -> (usize, Vec<Line<'static>>) {
    let mut header = format!("  {:<24}", "Land");
    for round in Round::ALL {
        header.push_str(&format!("{:^5}", round.short_label()));
    }
    let mut lines = vec![Line::styled(
        header,
        Style::default().add_modifier(Modifier::BOLD),
    )];
    let mut selected_line = 0;
    for (idx, country) in form.countries.iter().enumerate() {
        let selected = idx == screen.row;
        if selected {
            selected_line = lines.len();
        }
        let prefix = if selected { "> " } else { "  " };
        let mut spans = vec![Span::raw(format!("{prefix}{:<24}", country.name))];
        for (col, round) in Round::ALL.into_iter().enumerate() {
            let on = form.is_flagged(country.id, round);
            let mark = match (round.is_exclusive(), on) {
                (true, true) => "(•)",
                (true, false) => "( )",
                (false, true) => "[x]",
                (false, false) => "[ ]",
            };
            spans.push(cell(mark, 5, selected && screen.column == col));
        }
        lines.push(Line::from(spans));
    }
    let mut counts = format!("  {:<24}", "Gekozen");
    for round in Round::ALL {
        counts.push_str(&format!(
            "{:^5}",
            format!("{}/{}", form.board.count(round.column()), round.capacity())
        ));
    }
    lines.push(Line::styled(counts, Style::default().fg(Color::DarkGray)));
    (selected_line, lines)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "WK Poule - Help",
        "",
        "Ranglijst:",
        "  p            Voorspellingen",
        "  a            Admin",
        "  c            Account",
        "  r            Refresh",
        "  o            Logout",
        "",
        "Voorspellingen / Admin:",
        "  Tab          Wedstrijden / Knock-out",
        "  j/k or ↑/↓   Move",
        "  h/l or ←/→   Column",
        "  0-9, Bksp    Edit score",
        "  Space        Toggle round",
        "  s            Save",
        "",
        "  Ctrl-C       Quit",
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
