use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::store::SessionStore;

/// Page identifiers used by the default manifest
pub mod pages {
    pub const LOGIN: &str = "login";
    pub const REGISTER: &str = "register";
    pub const CUSTOMERS: &str = "customers";
    pub const ORDERS: &str = "orders";
}

/// Pause between a successful login and the redirect, so the welcome message is seen
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Protected,
}

/// Declares which pages can be viewed without a session.
///
/// Pages missing from the manifest are treated as protected.
#[derive(Debug, Clone)]
pub struct PageManifest {
    pages: HashMap<String, Access>,
    login_page: String,
    landing_page: String,
}

impl PageManifest {
    pub fn new(login_page: impl Into<String>, landing_page: impl Into<String>) -> Self {
        let login_page = login_page.into();
        let landing_page = landing_page.into();
        let mut pages = HashMap::new();
        pages.insert(login_page.clone(), Access::Public);
        pages.insert(landing_page.clone(), Access::Protected);
        Self {
            pages,
            login_page,
            landing_page,
        }
    }

    pub fn page(mut self, id: impl Into<String>, access: Access) -> Self {
        self.pages.insert(id.into(), access);
        self
    }

    pub fn access(&self, page: &str) -> Access {
        self.pages.get(page).copied().unwrap_or(Access::Protected)
    }

    pub fn is_public(&self, page: &str) -> bool {
        self.access(page) == Access::Public
    }

    pub fn login_page(&self) -> &str {
        &self.login_page
    }

    pub fn landing_page(&self) -> &str {
        &self.landing_page
    }
}

impl Default for PageManifest {
    fn default() -> Self {
        PageManifest::new(pages::LOGIN, pages::CUSTOMERS)
            .page(pages::REGISTER, Access::Public)
            .page(pages::ORDERS, Access::Protected)
    }
}

/// A navigation decided by the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
}

/// Performs navigation on behalf of the guard. Supplied by the front end.
pub trait Navigator: Send + Sync {
    fn navigate(&self, page: &str);
}

/// Gates page access on the presence of a session credential.
#[derive(Clone)]
pub struct SessionGuard {
    pub(super) store: Arc<dyn SessionStore>,
    pub(super) manifest: PageManifest,
    pub(super) navigator: Arc<dyn Navigator>,
    pub(super) redirect_delay: Duration,
}

impl SessionGuard {
    pub fn new(
        store: Arc<dyn SessionStore>,
        manifest: PageManifest,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            store,
            manifest,
            navigator,
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }

    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    pub fn manifest(&self) -> &PageManifest {
        &self.manifest
    }

    /// Whether a credential is currently stored. Unreadable stores count as logged out.
    pub fn has_credential(&self) -> bool {
        match self.store.token() {
            Ok(token) => token.is_some(),
            Err(e) => {
                warn!(error = %e, "Could not read session store, treating as logged out");
                false
            }
        }
    }

    /// Decide where a visitor to `page` belongs, without navigating.
    pub fn decide(&self, page: &str) -> Option<Redirect> {
        let authenticated = self.has_credential();
        let public = self.manifest.is_public(page);

        let target = match (authenticated, public) {
            (false, false) => Some(self.manifest.login_page()),
            (true, true) => Some(self.manifest.landing_page()),
            (false, true) | (true, false) => None,
        };

        target.map(|to| Redirect { to: to.to_string() })
    }

    /// Run once per page load, before any protected logic.
    pub fn check_auth(&self, page: &str) -> Option<Redirect> {
        let decision = self.decide(page);
        match &decision {
            Some(redirect) => {
                debug!(from = page, to = %redirect.to, "Session guard redirect");
                self.navigator.navigate(&redirect.to);
            }
            None => debug!(page, "Session guard allowed page"),
        }
        decision
    }

    /// Erase the session and return to the login page.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear_token() {
            warn!(error = %e, "Failed to clear session token");
        }
        if let Err(e) = self.store.clear_username() {
            warn!(error = %e, "Failed to clear stored username");
        }
        info!("Logged out");
        self.navigator.navigate(self.manifest.login_page());
    }
}
