use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::admin::{AdminAccess, AdminController};
use crate::auth::{self, LoginOutcome};
use crate::controller::{LoadOutcome, PredictionController};
use crate::gateway::Gateway;
use crate::leaderboard;
use crate::profile;
use crate::schema::Schema;
use crate::session::SessionStore;
use crate::state::{Command, Delta};

/// Everything the background thread needs, handed over once at startup.
pub struct Worker {
    gateway: Arc<dyn Gateway>,
    predictions: PredictionController,
    admin: AdminController,
    sessions: SessionStore,
}

impl Worker {
    pub fn new(gateway: Arc<dyn Gateway>, schema: Schema, sessions: SessionStore) -> Self {
        Self {
            predictions: PredictionController::new(gateway.clone(), schema),
            admin: AdminController::new(gateway.clone()),
            gateway,
            sessions,
        }
    }

    pub fn spawn(self, tx: Sender<Delta>, cmd_rx: Receiver<Command>) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                for delta in self.handle(cmd) {
                    if tx.send(delta).is_err() {
                        return;
                    }
                }
            }
        })
    }

    /// Runs one command to completion. Every failure comes back as a delta.
    pub fn handle(&self, cmd: Command) -> Vec<Delta> {
        let gateway = self.gateway.as_ref();
        match cmd {
            Command::Login { email, password } => {
                let mut warnings = Vec::new();
                let outcome = auth::login(gateway, &email, &password, &mut warnings);
                let mut out: Vec<Delta> = warnings.into_iter().map(Delta::Log).collect();
                match outcome {
                    LoginOutcome::LoggedIn(user) => {
                        if let Err(err) = self.sessions.save(&user) {
                            out.push(Delta::Log(format!("[WARN] Session not cached: {err:#}")));
                        }
                        out.push(Delta::LoggedIn(user));
                    }
                    LoginOutcome::Rejected(msg) => out.push(Delta::LoginFailed(msg)),
                }
                out
            }
            Command::Logout => self.logout(),
            Command::FetchLeaderboard => match leaderboard::fetch_leaderboard(gateway) {
                Ok(entries) => vec![Delta::SetLeaderboard(entries)],
                Err(err) => vec![
                    Delta::Log(format!("[WARN] Leaderboard fetch error: {err}")),
                    Delta::SetLeaderboard(Vec::new()),
                ],
            },
            Command::LoadPredictions { user } => match self.predictions.load(user.as_ref()) {
                LoadOutcome::LoginRequired => vec![Delta::PredictionsLoginRequired],
                LoadOutcome::Loaded { form, warnings } => {
                    let mut out: Vec<Delta> = warnings.into_iter().map(Delta::Log).collect();
                    out.push(Delta::SetPredictions(form));
                    out
                }
            },
            Command::SavePredictions { user, form } => {
                vec![Delta::PredictionsSaved(
                    self.predictions.submit(user.as_ref(), &form),
                )]
            }
            Command::LoadAdmin { user } => match self.admin.check_access(&user) {
                AdminAccess::Denied(reason) => vec![Delta::AdminDenied(reason)],
                AdminAccess::Granted => {
                    let (form, warnings) = self.admin.load();
                    let mut out: Vec<Delta> = warnings.into_iter().map(Delta::Log).collect();
                    out.push(Delta::SetAdmin(form));
                    out
                }
            },
            Command::SaveAdmin { user, form } => match self.admin.check_access(&user) {
                AdminAccess::Denied(reason) => vec![Delta::AdminDenied(reason)],
                AdminAccess::Granted => vec![Delta::AdminSaved(self.admin.save(&user, &form))],
            },
            Command::LoadProfile { user } => {
                vec![Delta::SetProfile(profile::load_profile(gateway, &user))]
            }
            Command::ChangePassword(change) => match auth::change_password(gateway, &change) {
                Ok(msg) => {
                    let mut out = self.clear_session_logs();
                    out.push(Delta::PasswordChanged(Ok(msg)));
                    out
                }
                Err(msg) => vec![Delta::PasswordChanged(Err(msg))],
            },
        }
    }

    fn logout(&self) -> Vec<Delta> {
        let mut out = self.clear_session_logs();
        out.push(Delta::LoggedOut);
        out
    }

    fn clear_session_logs(&self) -> Vec<Delta> {
        match self.sessions.clear() {
            Ok(()) => Vec::new(),
            Err(err) => vec![Delta::Log(format!("[WARN] Session not removed: {err:#}"))],
        }
    }
}
