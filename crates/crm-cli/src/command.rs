//! Command-line parsing. Each command maps to one page of the client.

use anyhow::{bail, Result};
use crm_core::auth::pages;

#[derive(Debug, Clone, PartialEq)]
pub enum CustomerAction {
    List,
    Add { name: String, email: String },
    Edit { id: String, name: String, email: String },
    Delete { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    List { customer_id: String },
    Add { customer_id: String, product_name: String, price: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { username: Option<String> },
    Register { username: Option<String> },
    Logout,
    Customers(CustomerAction),
    Orders(OrderAction),
    Help,
}

pub const USAGE: &str = "\
Usage: crm <command>

  login [username]                          Sign in (password is prompted)
  register [username]                       Create an account and sign in
  logout                                    Forget the stored session
  customers                                 List customers
  customers add <name> <email>              Create a customer
  customers edit <id> <name> <email>        Update a customer
  customers delete <id>                     Delete a customer
  orders <customer_id>                      List a customer's orders
  orders add <customer_id> <product> <price>
                                            Create an order

Set CRM_BASE_URL to point at a different gateway.";

impl Command {
    /// Page the command renders, used by the session guard
    pub fn page(&self) -> &'static str {
        match self {
            Command::Login { .. } | Command::Help => pages::LOGIN,
            Command::Register { .. } => pages::REGISTER,
            Command::Logout | Command::Customers(_) => pages::CUSTOMERS,
            Command::Orders(_) => pages::ORDERS,
        }
    }

    pub fn parse(args: &[String]) -> Result<Self> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let command = match args.as_slice() {
            [] | ["help"] | ["--help"] | ["-h"] => Command::Help,
            ["login"] => Command::Login { username: None },
            ["login", username] => Command::Login {
                username: Some(username.to_string()),
            },
            ["register"] => Command::Register { username: None },
            ["register", username] => Command::Register {
                username: Some(username.to_string()),
            },
            ["logout"] => Command::Logout,
            ["customers"] | ["customers", "list"] => Command::Customers(CustomerAction::List),
            ["customers", "add", name, email] => Command::Customers(CustomerAction::Add {
                name: name.to_string(),
                email: email.to_string(),
            }),
            ["customers", "edit", id, name, email] => Command::Customers(CustomerAction::Edit {
                id: id.to_string(),
                name: name.to_string(),
                email: email.to_string(),
            }),
            ["customers", "delete", id] => Command::Customers(CustomerAction::Delete {
                id: id.to_string(),
            }),
            ["orders", "add", customer_id, product_name, price] => {
                Command::Orders(OrderAction::Add {
                    customer_id: customer_id.to_string(),
                    product_name: product_name.to_string(),
                    price: price.to_string(),
                })
            }
            ["orders", customer_id] if *customer_id != "add" => Command::Orders(OrderAction::List {
                customer_id: customer_id.to_string(),
            }),
            _ => bail!("Unrecognized command: {}\n\n{}", args.join(" "), USAGE),
        };
        Ok(command)
    }
}
