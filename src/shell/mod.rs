//! Session-aware application shell.
//!
//! Owns the current route and wires the session gate, the category list and
//! the two entry forms together. Every navigation to the dashboard goes
//! through the gate and, when permitted, reloads the category list.

use std::sync::Arc;

use crate::api::{ApiClient, AuthApi, CategoryApi};
use crate::categories::CategoryList;
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::forms::{LoginForm, SignupForm, SubmitOutcome};
use crate::model::LoginUser;
use crate::route::Route;
use crate::session::{GateDecision, SessionGate};

pub struct App {
    gate: SessionGate,
    categories: CategoryList,
    login: LoginForm,
    signup: SignupForm,
    route: Route,
    redirected_from: Option<Route>,
}

impl App {
    pub fn new(categories: Arc<dyn CategoryApi>, auth: Arc<dyn AuthApi>, gate: SessionGate) -> Self {
        Self {
            categories: CategoryList::new(categories),
            login: LoginForm::login(Arc::clone(&auth), gate.clone()),
            signup: SignupForm::signup(auth),
            gate,
            route: Route::Login,
            redirected_from: None,
        }
    }

    /// One HTTP client for every endpoint
    pub fn with_client(client: ApiClient, gate: SessionGate) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client, gate)
    }

    /// App against the configured server, using the process-wide session
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let client = ApiClient::from_config(config)?;
        Ok(Self::with_client(client, SessionGate::from_config(config)))
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Where the last redirect to the login page came from
    pub fn redirected_from(&self) -> Option<Route> {
        self.redirected_from
    }

    pub fn is_authenticated(&self) -> bool {
        self.gate.is_authenticated()
    }

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    pub fn categories(&self) -> &CategoryList {
        &self.categories
    }

    pub fn login_form(&self) -> &LoginForm {
        &self.login
    }

    pub fn signup_form(&self) -> &SignupForm {
        &self.signup
    }

    /// Open the application at its root
    pub async fn start(&mut self) -> Route {
        self.navigate(Route::Dashboard).await
    }

    /// Go to `requested`, subject to the session gate. Returns where we ended up.
    pub async fn navigate(&mut self, requested: Route) -> Route {
        match self.gate.require_session(requested) {
            GateDecision::Permit => {
                self.route = requested;
                if requested == Route::Dashboard {
                    self.mount_dashboard().await;
                }
            }
            GateDecision::Redirect { to, from } => {
                self.route = to;
                self.redirected_from = Some(from);
            }
        }
        tracing::debug!("route is now {}", self.route);
        self.route
    }

    async fn mount_dashboard(&mut self) {
        // A failed load keeps whatever was shown before; the list logs it
        let _ = self.categories.load().await;
    }

    /// Submit the login form; on success the dashboard opens
    pub async fn submit_login(&mut self) -> SubmitOutcome<LoginUser> {
        let outcome = self.login.submit().await;
        if outcome.is_success() {
            self.navigate(Route::Dashboard).await;
        }
        outcome
    }

    /// Submit the registration form; success leaves a confirmation pending
    pub async fn submit_signup(&mut self) -> SubmitOutcome<()> {
        self.signup.submit().await
    }

    /// Close the registration confirmation and go to the login page
    pub async fn acknowledge_registration(&mut self) -> Route {
        self.signup.acknowledge();
        self.navigate(Route::Login).await
    }

    /// Drop the credential and return to the login page. No network call.
    pub async fn logout(&mut self) -> Route {
        self.gate.clear();
        tracing::info!("logged out");
        self.navigate(Route::Login).await
    }
}
