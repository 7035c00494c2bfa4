use std::sync::{Arc, RwLock};
use crate::core::store::IdentityProvider;

// Process-wide signed-in identity. Cloned handles share the same state; the
// repository only ever reads it, through the IdentityProvider trait.
#[derive(Clone)]
pub struct Session {
    user: Arc<RwLock<Option<String>>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            user: Arc::new(RwLock::new(None)),
        }
    }

    pub fn sign_in(&self, user_id: &str) {
        match self.user.write() {
            Ok(mut guard) => *guard = Some(user_id.to_string()),
            Err(poisoned) => *poisoned.into_inner() = Some(user_id.to_string()),
        }
    }

    pub fn sign_out(&self) {
        match self.user.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl IdentityProvider for Session {
    fn current_user_id(&self) -> Option<String> {
        match self.user.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
