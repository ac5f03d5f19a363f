use std::collections::VecDeque;

use crate::auth::PasswordChange;
use crate::controller::{LOGIN_PROMPT, LOGIN_REQUIRED, SubmitStatus};
use crate::form::{PredictionForm, Side};
use crate::model::{CountryId, LeaderboardEntry, MatchId, SessionUser};
use crate::profile::ProfileView;
use crate::rounds::{Round, ToggleOutcome};

const MAX_LOGS: usize = 200;
const SAVING: &str = "⌛ Bezig met opslaan...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Leaderboard,
    Predictions,
    Admin,
    Account,
    ChangePassword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTab {
    Matches,
    Knockout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub tone: Tone,
}

impl Status {
    pub fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub status: Option<Status>,
    pub inflight: bool,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: LoginField::Email,
            status: None,
            inflight: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordField {
    Email,
    Old,
    New,
    Confirm,
}

impl PasswordField {
    fn next(self) -> Self {
        match self {
            PasswordField::Email => PasswordField::Old,
            PasswordField::Old => PasswordField::New,
            PasswordField::New => PasswordField::Confirm,
            PasswordField::Confirm => PasswordField::Email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordForm {
    pub change: PasswordChange,
    pub focus: PasswordField,
    pub status: Option<Status>,
    pub inflight: bool,
}

impl Default for PasswordForm {
    fn default() -> Self {
        Self {
            change: PasswordChange::default(),
            focus: PasswordField::Email,
            status: None,
            inflight: false,
        }
    }
}

impl PasswordForm {
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.focus {
            PasswordField::Email => &mut self.change.email,
            PasswordField::Old => &mut self.change.old_password,
            PasswordField::New => &mut self.change.new_password,
            PasswordField::Confirm => &mut self.change.confirm_password,
        }
    }
}

/// One editable screen (user predictions or admin results) plus its cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormScreen {
    pub form: Option<PredictionForm>,
    pub tab: FormTab,
    pub row: usize,
    pub column: usize,
    pub status: Option<Status>,
    pub loading: bool,
    pub saving: bool,
}

impl Default for FormScreen {
    fn default() -> Self {
        Self {
            form: None,
            tab: FormTab::Matches,
            row: 0,
            column: 0,
            status: None,
            loading: false,
            saving: false,
        }
    }
}

impl FormScreen {
    pub fn toggle_tab(&mut self) {
        self.tab = match self.tab {
            FormTab::Matches => FormTab::Knockout,
            FormTab::Knockout => FormTab::Matches,
        };
        self.row = 0;
        self.column = 0;
    }

    fn row_count(&self) -> usize {
        let Some(form) = &self.form else {
            return 0;
        };
        match self.tab {
            FormTab::Matches => form.match_count(),
            FormTab::Knockout => form.countries.len(),
        }
    }

    fn column_count(&self) -> usize {
        match self.tab {
            FormTab::Matches => 2,
            FormTab::Knockout => Round::ALL.len(),
        }
    }

    pub fn select_next(&mut self) {
        let total = self.row_count();
        if total > 0 && self.row + 1 < total {
            self.row += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    pub fn column_next(&mut self) {
        if self.column + 1 < self.column_count() {
            self.column += 1;
        }
    }

    pub fn column_prev(&mut self) {
        self.column = self.column.saturating_sub(1);
    }

    pub fn selected_side(&self) -> Side {
        if self.column == 0 { Side::Home } else { Side::Away }
    }

    pub fn selected_round(&self) -> Round {
        Round::ALL[self.column.min(Round::ALL.len() - 1)]
    }

    pub fn selected_match_id(&self) -> Option<MatchId> {
        self.form
            .as_ref()?
            .match_lines()
            .nth(self.row)
            .map(|line| line.match_id)
    }

    pub fn selected_country_id(&self) -> Option<CountryId> {
        self.form.as_ref()?.countries.get(self.row).map(|c| c.id)
    }

    pub fn type_digit(&mut self, ch: char) {
        if self.tab != FormTab::Matches {
            return;
        }
        let side = self.selected_side();
        if let (Some(id), Some(form)) = (self.selected_match_id(), self.form.as_mut()) {
            form.push_digit(id, side, ch);
        }
    }

    pub fn erase_digit(&mut self) {
        if self.tab != FormTab::Matches {
            return;
        }
        let side = self.selected_side();
        if let (Some(id), Some(form)) = (self.selected_match_id(), self.form.as_mut()) {
            form.pop_digit(id, side);
        }
    }

    /// Flips the flag under the cursor; a refused change leaves a warning.
    pub fn toggle_selected(&mut self) -> Option<String> {
        if self.tab != FormTab::Knockout {
            return None;
        }
        let round = self.selected_round();
        let id = self.selected_country_id()?;
        let form = self.form.as_mut()?;
        match form.toggle(id, round.column()) {
            ToggleOutcome::Reverted { warning } => {
                self.status = Some(Status::new(Tone::Warning, warning.clone()));
                Some(warning)
            }
            ToggleOutcome::Applied | ToggleOutcome::Ignored => None,
        }
    }

    /// Marks a save as outstanding. False while the previous one is still running.
    pub fn begin_save(&mut self) -> bool {
        if self.saving {
            return false;
        }
        self.saving = true;
        self.status = Some(Status::new(Tone::Info, SAVING));
        true
    }

    fn set_form(&mut self, form: PredictionForm) {
        self.form = Some(form);
        self.loading = false;
        let total = self.row_count();
        if total == 0 {
            self.row = 0;
        } else if self.row >= total {
            self.row = total - 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub session: Option<SessionUser>,
    pub config_warning: Option<String>,
    pub login: LoginForm,
    pub password: PasswordForm,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub leaderboard_loading: bool,
    pub predictions: FormScreen,
    pub admin: FormScreen,
    pub profile: Option<ProfileView>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Login,
            session: None,
            config_warning: None,
            login: LoginForm::default(),
            password: PasswordForm::default(),
            leaderboard: Vec::new(),
            leaderboard_loading: false,
            predictions: FormScreen::default(),
            admin: FormScreen::default(),
            profile: None,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    /// Starts on the leaderboard when a cached session exists.
    pub fn with_session(session: Option<SessionUser>) -> Self {
        let mut state = Self::new();
        if let Some(user) = session {
            state.session = Some(user);
            state.screen = Screen::Leaderboard;
        }
        state
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn form_screen_mut(&mut self) -> Option<&mut FormScreen> {
        match self.screen {
            Screen::Predictions => Some(&mut self.predictions),
            Screen::Admin => Some(&mut self.admin),
            _ => None,
        }
    }

    /// The next leaderboard fetch, unless one is still outstanding.
    pub fn leaderboard_command(&mut self) -> Option<Command> {
        if self.leaderboard_loading {
            return None;
        }
        self.leaderboard_loading = true;
        Some(Command::FetchLeaderboard)
    }

    /// The save for the form on screen. At most one save per form is in flight.
    pub fn save_command(&mut self) -> Option<Command> {
        let admin = match self.screen {
            Screen::Predictions => false,
            Screen::Admin => true,
            _ => return None,
        };
        let Some(user) = self.session.clone() else {
            if !admin {
                self.predictions.status = Some(Status::new(Tone::Warning, LOGIN_REQUIRED));
            }
            return None;
        };
        let screen = if admin {
            &mut self.admin
        } else {
            &mut self.predictions
        };
        let form = screen.form.clone()?;
        if !screen.begin_save() {
            self.push_log("[INFO] Save already in progress");
            return None;
        }
        Some(if admin {
            Command::SaveAdmin { user, form }
        } else {
            Command::SavePredictions {
                user: Some(user),
                form,
            }
        })
    }

    pub fn form_screen(&self) -> Option<&FormScreen> {
        match self.screen {
            Screen::Predictions => Some(&self.predictions),
            Screen::Admin => Some(&self.admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Command {
    Login { email: String, password: String },
    Logout,
    FetchLeaderboard,
    LoadPredictions { user: Option<SessionUser> },
    SavePredictions { user: Option<SessionUser>, form: PredictionForm },
    LoadAdmin { user: SessionUser },
    SaveAdmin { user: SessionUser, form: PredictionForm },
    LoadProfile { user: SessionUser },
    ChangePassword(PasswordChange),
}

#[derive(Debug, Clone)]
pub enum Delta {
    LoggedIn(SessionUser),
    LoginFailed(String),
    LoggedOut,
    SetLeaderboard(Vec<LeaderboardEntry>),
    PredictionsLoginRequired,
    SetPredictions(PredictionForm),
    PredictionsSaved(SubmitStatus),
    AdminDenied(String),
    SetAdmin(PredictionForm),
    AdminSaved(Result<String, String>),
    SetProfile(ProfileView),
    PasswordChanged(Result<String, String>),
    Log(String),
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::LoggedIn(user) => {
            let name = user
                .display_name()
                .or(user.email())
                .unwrap_or("gebruiker")
                .to_string();
            state.session = Some(user);
            state.login = LoginForm::default();
            state.screen = Screen::Leaderboard;
            state.push_log(format!("[INFO] Ingelogd als {name}"));
        }
        Delta::LoginFailed(msg) => {
            state.login.inflight = false;
            state.login.status = Some(Status::new(Tone::Error, msg.clone()));
            state.push_log(format!("[WARN] Login failed: {msg}"));
        }
        Delta::LoggedOut => {
            state.session = None;
            state.predictions = FormScreen::default();
            state.admin = FormScreen::default();
            state.profile = None;
            state.screen = Screen::Login;
            state.push_log("[INFO] Uitgelogd");
        }
        Delta::SetLeaderboard(entries) => {
            state.leaderboard = entries;
            state.leaderboard_loading = false;
        }
        Delta::PredictionsLoginRequired => {
            state.predictions = FormScreen::default();
            state.predictions.status = Some(Status::new(Tone::Warning, LOGIN_PROMPT));
        }
        Delta::SetPredictions(form) => {
            state.predictions.set_form(form);
            if let Some(user) = &state.session {
                let who = user.email().unwrap_or("onbekend").to_string();
                state.predictions.status =
                    Some(Status::new(Tone::Success, format!("✅ Ingelogd als {who}")));
            }
        }
        Delta::PredictionsSaved(status) => {
            state.predictions.saving = false;
            let tone = if status.is_success() {
                Tone::Success
            } else {
                Tone::Error
            };
            let text = status.message();
            match &status {
                SubmitStatus::Saved { matches, countries } => state.push_log(format!(
                    "[INFO] Saved {matches} match and {countries} tournament predictions"
                )),
                _ => state.push_log(format!("[WARN] {text}")),
            }
            state.predictions.status = Some(Status::new(tone, text));
        }
        Delta::AdminDenied(reason) => {
            state.admin = FormScreen::default();
            state.screen = Screen::Leaderboard;
            state.push_log(format!("[WARN] {reason} Redirecting..."));
        }
        Delta::SetAdmin(form) => {
            state.admin.set_form(form);
            state.admin.status = Some(Status::new(
                Tone::Info,
                "Pas resultaten aan en klik op alles opslaan hieronder.",
            ));
        }
        Delta::AdminSaved(result) => {
            state.admin.saving = false;
            match result {
                Ok(msg) => {
                    state.push_log("[INFO] Admin data saved");
                    state.admin.status = Some(Status::new(Tone::Success, msg));
                }
                Err(msg) => {
                    state.push_log(format!("[WARN] Admin save failed: {msg}"));
                    state.admin.status = Some(Status::new(Tone::Error, msg));
                }
            }
        }
        Delta::SetProfile(view) => {
            state.profile = Some(view);
        }
        Delta::PasswordChanged(result) => {
            state.password.inflight = false;
            match result {
                Ok(msg) => {
                    state.password = PasswordForm::default();
                    state.session = None;
                    state.screen = Screen::Login;
                    state.login.status = Some(Status::new(Tone::Success, msg));
                    state.push_log("[INFO] Password changed, logged out");
                }
                Err(msg) => {
                    state.password.status = Some(Status::new(Tone::Error, msg));
                }
            }
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
