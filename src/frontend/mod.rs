//! Headless frontend: a state controller, its client, and derived views.
//!
//! ```ignore
//! use phonebook::frontend::{HttpClient, PhonebookApp, Outcome};
//!
//! let client = HttpClient::new("http://localhost:3001/persons");
//! let mut app = PhonebookApp::new();
//! app.load(&client).await;
//!
//! app.set_form_name("Ada Lovelace");
//! app.set_form_number("12345");
//! if app.submit(&client).await == Outcome::AwaitingConfirmation {
//!     println!("{}", app.pending().unwrap().prompt());
//!     app.confirm(&client).await;
//! }
//! print!("{}", app.view());
//! ```

pub mod client;
pub mod state;
pub mod view;

#[cfg(feature = "client")]
pub use client::HttpClient;
pub use client::{ClientError, PhonebookClient};
pub use state::{Alert, Notification, Outcome, PendingAction, PhonebookApp, NOTIFICATION_TTL};
pub use view::{filter_contacts, ContactListView, ContactRow, PageView, RowAction};
