pub mod client;
pub mod error;
pub mod models;

pub use client::{ContactApi, HttpContactApi};
pub use error::ApiError;
pub use models::{ContactPage, ContactProperties, ContactRecord, CreatedContact, NewContact};
