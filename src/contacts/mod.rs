//! Client-side state machines over the remote contact collection.

pub mod form;
pub mod list;

pub use form::{ContactForm, Field, FormDraft, FormState, SubmissionOutcome};
pub use list::{ContactList, ListState, PAGE_SIZE};

#[cfg(test)]
pub(crate) mod fake {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use crate::api::{ApiError, ContactApi, ContactPage, ContactProperties, ContactRecord, CreatedContact, NewContact};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        List { limit: u32, after: Option<String> },
        Create(NewContact),
        Delete(String),
    }

    /// Scripted API: answers are queued up front and handed out in order.
    /// Every call yields once before answering so callers observe a pending
    /// request.
    #[derive(Default)]
    pub struct FakeApi {
        pages: RefCell<VecDeque<Result<ContactPage, ApiError>>>,
        creates: RefCell<VecDeque<Result<CreatedContact, ApiError>>>,
        deletes: RefCell<VecDeque<Result<(), ApiError>>>,
        calls: RefCell<Vec<Call>>,
    }

    impl FakeApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_page(&self, page: Result<ContactPage, ApiError>) -> &Self {
            self.pages.borrow_mut().push_back(page);
            self
        }

        pub fn push_create(&self, created: Result<CreatedContact, ApiError>) -> &Self {
            self.creates.borrow_mut().push_back(created);
            self
        }

        pub fn push_delete(&self, deleted: Result<(), ApiError>) -> &Self {
            self.deletes.borrow_mut().push_back(deleted);
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }

        fn unscripted<T>() -> Result<T, ApiError> {
            Err(ApiError::Network("no scripted response".into()))
        }
    }

    impl ContactApi for FakeApi {
        async fn list_contacts(&self, limit: u32, after: Option<&str>) -> Result<ContactPage, ApiError> {
            self.calls.borrow_mut().push(Call::List { limit, after: after.map(str::to_string) });
            let answer = self.pages.borrow_mut().pop_front().unwrap_or_else(Self::unscripted);
            tokio::task::yield_now().await;
            answer
        }

        async fn create_contact(&self, contact: &NewContact) -> Result<CreatedContact, ApiError> {
            self.calls.borrow_mut().push(Call::Create(contact.clone()));
            let answer = self.creates.borrow_mut().pop_front().unwrap_or_else(Self::unscripted);
            tokio::task::yield_now().await;
            answer
        }

        async fn delete_contact(&self, id: &str) -> Result<(), ApiError> {
            self.calls.borrow_mut().push(Call::Delete(id.to_string()));
            let answer = self.deletes.borrow_mut().pop_front().unwrap_or_else(Self::unscripted);
            tokio::task::yield_now().await;
            answer
        }
    }

    pub fn record(id: &str, email: &str) -> ContactRecord {
        ContactRecord {
            id: id.to_string(),
            properties: ContactProperties {
                email: Some(email.to_string()),
                ..Default::default()
            },
        }
    }

    pub fn page(ids: &[&str], after: Option<&str>) -> ContactPage {
        ContactPage {
            results: ids.iter().map(|id| record(id, &format!("{id}@example.com"))).collect(),
            after: after.map(str::to_string),
        }
    }
}
