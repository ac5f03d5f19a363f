use serde_json::json;

use crate::gateway::{Gateway, Select, first_row, select_as};
use crate::model::{Profile, SessionUser};
use crate::schema;

pub const NOT_PROVIDED: &str = "Niet opgegeven";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    Rpc,
    UserById,
    UserByEmail,
    Cached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub name: Option<String>,
    pub email: Option<String>,
    pub source: ProfileSource,
}

impl ProfileView {
    pub fn name_label(&self) -> &str {
        self.name.as_deref().unwrap_or(NOT_PROVIDED)
    }

    pub fn email_label(&self) -> &str {
        self.email.as_deref().unwrap_or(NOT_PROVIDED)
    }
}

/// Tries the backend sources in order and ends at the cached session, so
/// this never fails.
pub fn load_profile(gateway: &dyn Gateway, user: &SessionUser) -> ProfileView {
    let rpc = gateway
        .rpc(schema::RPC_PROFILE, json!({ "p_user_id": user.id }))
        .ok()
        .and_then(first_row)
        .and_then(|row| serde_json::from_value::<Profile>(row).ok());
    if let Some(profile) = rpc.filter(has_content) {
        return view(profile, ProfileSource::Rpc);
    }

    let by_id = select_as::<Profile>(
        gateway,
        &Select::from(schema::USERS)
            .columns("email, full_name")
            .eq("id", &user.id)
            .limit(1),
    );
    if let Some(profile) = by_id.ok().and_then(|rows| rows.into_iter().next()) {
        return view(profile, ProfileSource::UserById);
    }

    if let Some(email) = user.email() {
        let by_email = select_as::<Profile>(
            gateway,
            &Select::from(schema::USERS)
                .columns("email, full_name")
                .ilike("email", email)
                .limit(1),
        );
        if let Some(profile) = by_email.ok().and_then(|rows| rows.into_iter().next()) {
            return view(profile, ProfileSource::UserByEmail);
        }
    }

    ProfileView {
        name: user.display_name().map(str::to_string),
        email: user.email().map(str::to_string),
        source: ProfileSource::Cached,
    }
}

fn has_content(profile: &Profile) -> bool {
    profile.full_name.is_some() || profile.email.is_some()
}

fn view(profile: Profile, source: ProfileSource) -> ProfileView {
    let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    ProfileView {
        name: clean(profile.full_name),
        email: clean(profile.email),
        source,
    }
}
