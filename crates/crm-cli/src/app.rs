//! Application state for the CRM command-line client.
//!
//! `App` wires the session guard and API client together and renders each
//! page. The guard runs before every command; a redirect replaces the
//! requested page with the one the guard chose.

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info};

use crm_core::auth::{pages, Navigator, PageManifest, SessionGuard, SessionStore};
use crm_core::models::{CustomerInput, LoginRequest, OrderInput};
use crm_core::{ApiClient, Config};

use crate::command::{Command, CustomerAction, OrderAction, USAGE};
use crate::render::{render_customers, render_orders};

/// Remembers the last page the guard asked for until the app follows it
#[derive(Default)]
pub struct CliNavigator {
    pending: Mutex<Option<String>>,
    current: Mutex<Option<String>>,
}

impl CliNavigator {
    pub fn take(&self) -> Option<String> {
        self.pending.lock().ok().and_then(|mut p| p.take())
    }

    /// Page the user was last sent to
    pub fn current(&self) -> Option<String> {
        self.current.lock().ok().and_then(|c| c.clone())
    }
}

impl Navigator for CliNavigator {
    fn navigate(&self, page: &str) {
        debug!(page, "Navigate");
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(page.to_string());
        }
        if let Ok(mut current) = self.current.lock() {
            *current = Some(page.to_string());
        }
    }
}

pub struct App {
    api: ApiClient,
    guard: SessionGuard,
    navigator: Arc<CliNavigator>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let store = config.open_store().context("Failed to open session store")?;
        let api = ApiClient::from_config(config, store.clone())
            .context("Failed to create API client")?;
        let navigator = Arc::new(CliNavigator::default());
        let guard = SessionGuard::new(store, PageManifest::default(), navigator.clone())
            .with_redirect_delay(config.login_redirect_delay());

        Ok(Self {
            api,
            guard,
            navigator,
        })
    }

    pub async fn run(&self, command: Command) -> Result<()> {
        if command == Command::Help {
            println!("{}", USAGE);
            return Ok(());
        }

        if self.guard.check_auth(command.page()).is_some() {
            return self.follow_navigation().await;
        }

        match command {
            Command::Help => Ok(()),
            Command::Login { username } => self.login(username).await,
            Command::Register { username } => self.register(username).await,
            Command::Logout => {
                self.guard.logout();
                println!("Logged out.");
                self.follow_navigation().await
            }
            Command::Customers(action) => self.customers(action).await,
            Command::Orders(action) => self.orders(action).await,
        }
    }

    /// Render whatever page the guard last navigated to
    async fn follow_navigation(&self) -> Result<()> {
        let Some(page) = self.navigator.take() else {
            return Ok(());
        };
        match page.as_str() {
            pages::CUSTOMERS => self.show_customers().await,
            pages::LOGIN => {
                println!("Please log in: crm login <username>");
                Ok(())
            }
            other => {
                println!("Continue at: {}", other);
                Ok(())
            }
        }
    }

    // ===== Login page =====

    fn prompt_username(&self) -> Result<String> {
        let last = self.api.store().username().ok().flatten();
        match &last {
            Some(name) => print!("Username [{}]: ", name),
            None => print!("Username: "),
        }
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let entered = line.trim();

        match (entered.is_empty(), last) {
            (false, _) => Ok(entered.to_string()),
            (true, Some(name)) => Ok(name),
            (true, None) => bail!("A username is required"),
        }
    }

    async fn login(&self, username: Option<String>) -> Result<()> {
        let username = match username {
            Some(name) => name,
            None => self.prompt_username()?,
        };
        let password =
            rpassword::prompt_password("Password: ").context("Failed to read password")?;

        println!("Signing in...");
        let status = self
            .guard
            .login(&self.api, &LoginRequest::new(username, password))
            .await;
        if !status.is_success() {
            return Err(anyhow!(status.message()));
        }

        info!("Login succeeded");
        println!("{}", status.message());
        self.follow_navigation().await
    }

    async fn register(&self, username: Option<String>) -> Result<()> {
        let username = match username {
            Some(name) => name,
            None => self.prompt_username()?,
        };

        let status = self.guard.register(&self.api, &username).await;
        if !status.is_success() {
            return Err(anyhow!(status.message()));
        }

        println!("{}", status.message());
        self.follow_navigation().await
    }

    // ===== Customers page =====

    async fn show_customers(&self) -> Result<()> {
        let customers = self
            .api
            .list_customers()
            .await
            .context("Failed to load customers")?;
        println!("{}", render_customers(&customers));
        Ok(())
    }

    async fn customers(&self, action: CustomerAction) -> Result<()> {
        match action {
            CustomerAction::List => return self.show_customers().await,
            CustomerAction::Add { name, email } => {
                let input = CustomerInput::new(&name, &email)?;
                let created = self
                    .api
                    .create_customer(&input)
                    .await
                    .context("Failed to create customer")?;
                println!("Created {}", created.summary());
            }
            CustomerAction::Edit { id, name, email } => {
                let input = CustomerInput::new(&name, &email)?;
                self.api
                    .update_customer(&id, &input)
                    .await
                    .with_context(|| format!("Failed to update customer {}", id))?;
                println!("Updated customer {}", id);
            }
            CustomerAction::Delete { id } => {
                self.api
                    .delete_customer(&id)
                    .await
                    .with_context(|| format!("Failed to delete customer {}", id))?;
                println!("Deleted customer {}", id);
            }
        }
        self.show_customers().await
    }

    // ===== Orders page =====

    async fn show_orders(&self, customer_id: &str) -> Result<()> {
        let orders = self
            .api
            .fetch_customer_orders(customer_id)
            .await
            .with_context(|| format!("Failed to load orders for customer {}", customer_id))?;
        println!("{}", render_orders(&orders));
        Ok(())
    }

    async fn orders(&self, action: OrderAction) -> Result<()> {
        match action {
            OrderAction::List { customer_id } => self.show_orders(customer_id.trim()).await,
            OrderAction::Add {
                customer_id,
                product_name,
                price,
            } => {
                let input = OrderInput::parse(&customer_id, &product_name, &price)?;
                match self.api.create_order(&input).await {
                    Ok(_) => println!("Order created"),
                    Err(e) if e.is_not_found() => {
                        bail!("Customer with ID \"{}\" does not exist", input.customer_id)
                    }
                    Err(e) => return Err(e).context("Failed to create order"),
                }
                self.show_orders(&input.customer_id).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crm_core::config::StoreKind;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn app_for(server: &MockServer) -> App {
        let config = Config {
            base_url: server.uri(),
            store: StoreKind::Memory,
            login_redirect_delay_ms: 0,
            ..Config::default()
        };
        App::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_customers_without_session_lands_on_login() {
        let server = MockServer::start().await;
        let app = app_for(&server);

        app.run(Command::Customers(CustomerAction::List)).await.unwrap();

        assert_eq!(app.navigator.current().as_deref(), Some(pages::LOGIN));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_login_with_session_shows_customers_instead() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customers"))
            .and(header("authorization", "Bearer abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"customers": []})))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_for(&server);
        app.api.store().set_token("abc123").unwrap();

        app.run(Command::Login {
            username: Some("ann".to_string()),
        })
        .await
        .unwrap();

        assert_eq!(app.navigator.current().as_deref(), Some(pages::CUSTOMERS));
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url.path(), "/customers");
    }

    #[test]
    fn test_navigator_keeps_latest_page_until_taken() {
        let navigator = CliNavigator::default();
        assert_eq!(navigator.take(), None);

        navigator.navigate(pages::LOGIN);
        navigator.navigate(pages::CUSTOMERS);
        assert_eq!(navigator.take().as_deref(), Some(pages::CUSTOMERS));
        assert_eq!(navigator.take(), None);
        assert_eq!(navigator.current().as_deref(), Some(pages::CUSTOMERS));
    }
}
