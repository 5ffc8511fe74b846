//! User-level flows composed from the stores and the API client.
//!
//! Services own the glue between screens and state: sign-in feeding the
//! session store, add-to-cart snapshotting stock, submission clearing the
//! cart. Front-ends call these instead of wiring stores together themselves.

mod account;
mod catalog;
mod requests;

pub use account::{AccountError, AccountService};
pub use catalog::{CatalogError, CatalogService};
pub use requests::{RequestService, SubmitError};
