use super::AccountId;

/// Who, if anyone, is logged in.
///
/// On disk the session is a single string; the empty string means nobody.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn(AccountId),
}

impl SessionState {
    pub fn from_slot(slot: String) -> Self {
        if slot.is_empty() {
            SessionState::LoggedOut
        } else {
            SessionState::LoggedIn(slot)
        }
    }

    pub fn into_slot(self) -> String {
        match self {
            SessionState::LoggedOut => String::new(),
            SessionState::LoggedIn(id) => id,
        }
    }

    pub fn account(&self) -> Option<&str> {
        match self {
            SessionState::LoggedOut => None,
            SessionState::LoggedIn(id) => Some(id),
        }
    }

    pub fn into_account(self) -> Option<AccountId> {
        match self {
            SessionState::LoggedOut => None,
            SessionState::LoggedIn(id) => Some(id),
        }
    }
}
