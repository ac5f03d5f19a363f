use serde_json::json;

use crate::gateway::{Gateway, Select, first_row, is_truthy};
use crate::model::SessionUser;
use crate::schema;

pub const MISSING_CREDENTIALS: &str = "Please provide both email and password.";
pub const BAD_CREDENTIALS: &str = "Email of wachtwoord is incorrect.";
pub const SERVER_VERIFICATION_FAILED: &str = concat!(
    "Gebruiker gevonden, maar inloggen mislukt (server verificatie). ",
    "Neem contact op met de beheerder."
);
pub const PASSWORD_MISMATCH: &str = "Nieuwe wachtwoorden komen niet overeen.";
pub const PASSWORD_REJECTED: &str = "E-mail of wachtwoord is onjuist.";
pub const PASSWORD_CHANGED: &str = "Wachtwoord succesvol gewijzigd! Je wordt nu uitgelogd...";

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    LoggedIn(SessionUser),
    Rejected(String),
}

/// Verification happens in `login_user`. When it refuses, a lookup by email
/// only picks the message; no password is ever checked here. A failing
/// procedure call is reported in `warnings`.
pub fn login(
    gateway: &dyn Gateway,
    email: &str,
    password: &str,
    warnings: &mut Vec<String>,
) -> LoginOutcome {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return LoginOutcome::Rejected(MISSING_CREDENTIALS.to_string());
    }

    let rpc = gateway.rpc(
        schema::RPC_LOGIN,
        json!({ "login_email": email, "login_password": password }),
    );
    match rpc {
        Ok(data) => {
            if let Some(user) = first_row(data).and_then(SessionUser::from_value) {
                return LoginOutcome::LoggedIn(user);
            }
        }
        Err(err) => warnings.push(format!("[WARN] {} failed: {err}", schema::RPC_LOGIN)),
    }

    let lookup = gateway.select(
        &Select::from(schema::USERS)
            .columns("id")
            .eq("email", email)
            .limit(1),
    );
    match lookup {
        Ok(rows) if !rows.is_empty() => {
            LoginOutcome::Rejected(SERVER_VERIFICATION_FAILED.to_string())
        }
        _ => LoginOutcome::Rejected(BAD_CREDENTIALS.to_string()),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChange {
    pub email: String,
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub fn change_password(gateway: &dyn Gateway, change: &PasswordChange) -> Result<String, String> {
    if change.new_password != change.confirm_password {
        return Err(PASSWORD_MISMATCH.to_string());
    }
    let args = json!({
        "p_email": change.email.trim(),
        "p_old_password": change.old_password,
        "p_new_password": change.new_password,
    });
    match gateway.rpc(schema::RPC_CHANGE_PASSWORD, args) {
        Ok(data) if is_truthy(&data) => Ok(PASSWORD_CHANGED.to_string()),
        Ok(_) => Err(PASSWORD_REJECTED.to_string()),
        Err(err) => Err(err.to_string()),
    }
}
