use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::str::FromStr;

use thiserror::Error;

use crate::api::{ApiError, ContactApi, NewContact};
use crate::prefs::PreferenceContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::FirstName, Field::LastName, Field::Email];

    pub const fn name(self) -> &'static str {
        match self {
            Self::FirstName => "firstname",
            Self::LastName => "lastname",
            Self::Email => "email",
        }
    }

    pub const fn label_key(self) -> &'static str {
        match self {
            Self::FirstName => "name_label",
            Self::LastName => "lastname_label",
            Self::Email => "email_label",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field {0:?}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Values typed into the create form, not yet submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

impl FormDraft {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.firstname,
            Field::LastName => &self.lastname,
            Field::Email => &self.email,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        match field {
            Field::FirstName => self.firstname = value,
            Field::LastName => self.lastname = value,
            Field::Email => self.email = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.into_iter().all(|f| self.get(f).is_empty())
    }

    fn to_request(&self) -> NewContact {
        NewContact {
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    #[default]
    Editing,
    Submitting,
    Succeeded,
    Failed,
}

/// Result of one submit attempt. Replaced by the next attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Success(String),
    ValidationFailure(String),
    RemoteFailure(String),
    NetworkFailure(String),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Structural `local@domain.tld` check: no whitespace, a non-empty local
/// part, and a domain with a dot that has text on both sides.
pub fn is_plausible_email(input: &str) -> bool {
    if input.is_empty() || input.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = input.rsplit_once('@') else { return false };
    if local.is_empty() {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Create-contact form: draft, validation and the submit lifecycle.
///
/// The change callback fires after submit transitions and resets, not on
/// field edits, so a view can push the draft back into its inputs without
/// looping.
pub struct ContactForm<A> {
    api: A,
    prefs: Rc<PreferenceContext>,
    draft: RefCell<FormDraft>,
    state: Cell<FormState>,
    outcome: RefCell<Option<SubmissionOutcome>>,
    generation: Cell<u64>,
    active: Cell<bool>,
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
}

impl<A: ContactApi> ContactForm<A> {
    pub fn new(api: A, prefs: Rc<PreferenceContext>) -> Self {
        Self {
            api,
            prefs,
            draft: RefCell::new(FormDraft::default()),
            state: Cell::new(FormState::Editing),
            outcome: RefCell::new(None),
            generation: Cell::new(0),
            active: Cell::new(true),
            on_change: RefCell::new(None),
        }
    }

    /// Validates the draft and, if it passes, sends it.
    ///
    /// A successful create clears the draft; any failure keeps it so the user
    /// can correct and resend. Validation failures never reach the network
    /// and leave the form state alone.
    pub async fn submit(&self) -> SubmissionOutcome {
        self.outcome.replace(None);
        let request = match self.validate() {
            Ok(request) => request,
            Err(message) => {
                let outcome = SubmissionOutcome::ValidationFailure(message);
                self.outcome.replace(Some(outcome.clone()));
                self.notify();
                return outcome;
            }
        };

        let ticket = self.generation.get() + 1;
        self.generation.set(ticket);
        self.state.set(FormState::Submitting);
        self.notify();

        let outcome = match self.api.create_contact(&request).await {
            Ok(created) => SubmissionOutcome::Success(created.id),
            Err(ApiError::Remote { message, .. }) => SubmissionOutcome::RemoteFailure(message),
            Err(ApiError::Network(detail)) => SubmissionOutcome::NetworkFailure(format!(
                "{}: {detail}",
                self.prefs.translate("network_error")
            )),
        };

        if ticket != self.generation.get() || !self.active.get() {
            log::debug!("discarding create response for a reset or torn-down form");
            return outcome;
        }
        match &outcome {
            SubmissionOutcome::Success(id) => {
                log::info!("created contact {id}");
                self.state.set(FormState::Succeeded);
                self.draft.replace(FormDraft::default());
            }
            failure => {
                log::warn!("create contact failed: {failure:?}");
                self.state.set(FormState::Failed);
            }
        }
        self.outcome.replace(Some(outcome.clone()));
        self.notify();
        outcome
    }
}

impl<A> ContactForm<A> {
    pub fn update_field(&self, field: Field, value: impl Into<String>) {
        self.draft.borrow_mut().set(field, value.into());
    }

    /// Clears the draft and status. A submission still in flight is ignored
    /// when it completes.
    pub fn reset(&self) {
        self.draft.replace(FormDraft::default());
        self.outcome.replace(None);
        self.state.set(FormState::Editing);
        self.generation.set(self.generation.get() + 1);
        self.notify();
    }

    pub fn deactivate(&self) {
        self.active.set(false);
        self.generation.set(self.generation.get() + 1);
        self.on_change.replace(None);
    }

    pub fn connect_changed(&self, callback: impl Fn() + 'static) {
        self.on_change.replace(Some(Rc::new(callback)));
    }

    fn notify(&self) {
        let callback = self.on_change.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    pub fn draft(&self) -> FormDraft {
        self.draft.borrow().clone()
    }

    pub fn field(&self, field: Field) -> String {
        self.draft.borrow().get(field).to_string()
    }

    pub fn state(&self) -> FormState {
        self.state.get()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.get() == FormState::Submitting
    }

    pub fn outcome(&self) -> Option<SubmissionOutcome> {
        self.outcome.borrow().clone()
    }

    /// Line shown under the form for the last outcome, in the active locale.
    pub fn status_message(&self) -> Option<String> {
        self.outcome.borrow().as_ref().map(|outcome| match outcome {
            SubmissionOutcome::Success(id) => {
                format!("{}: {id}", self.prefs.translate("save_button_full"))
            }
            SubmissionOutcome::ValidationFailure(m)
            | SubmissionOutcome::RemoteFailure(m)
            | SubmissionOutcome::NetworkFailure(m) => m.clone(),
        })
    }

    fn validate(&self) -> Result<NewContact, String> {
        let draft = self.draft.borrow();
        if draft.firstname.trim().is_empty() || draft.lastname.trim().is_empty() {
            return Err(self.prefs.translate("required_field"));
        }
        if !is_plausible_email(&draft.email) {
            return Err(self.prefs.translate("invalid_email"));
        }
        Ok(draft.to_request())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CreatedContact;
    use crate::contacts::fake::{Call, FakeApi};
    use crate::i18n::Locale;
    use crate::storage::MemoryStore;

    fn form() -> (Rc<FakeApi>, ContactForm<Rc<FakeApi>>) {
        let api = Rc::new(FakeApi::new());
        let prefs = PreferenceContext::load(MemoryStore::new());
        prefs.set_locale(Locale::En);
        (api.clone(), ContactForm::new(api, prefs))
    }

    fn fill(form: &ContactForm<Rc<FakeApi>>, email: &str) {
        form.update_field(Field::FirstName, "Ada");
        form.update_field(Field::LastName, "Lovelace");
        form.update_field(Field::Email, email);
    }

    fn created(id: &str) -> Result<CreatedContact, ApiError> {
        Ok(CreatedContact { id: id.into(), updated: false })
    }

    #[test]
    fn email_shape() {
        for ok in ["a@b.co", "first.last@sub.example.org", "x@y.z"] {
            assert!(is_plausible_email(ok), "{ok}");
        }
        for bad in ["", "not-an-email", "@b.co", "a@", "a@b", "a@.co", "a@b.", "a b@c.d", "a@b .co"] {
            assert!(!is_plausible_email(bad), "{bad}");
        }
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("email".parse::<Field>(), Ok(Field::Email));
        assert_eq!("firstname".parse::<Field>(), Ok(Field::FirstName));
        assert!("phone".parse::<Field>().is_err());
    }

    #[tokio::test]
    async fn invalid_email_never_reaches_the_network() {
        let (api, form) = form();
        fill(&form, "not-an-email");

        let outcome = form.submit().await;
        assert_eq!(outcome, SubmissionOutcome::ValidationFailure("Invalid email".into()));
        assert_eq!(form.state(), FormState::Editing);
        assert!(api.calls().is_empty());
        assert_eq!(form.field(Field::Email), "not-an-email");
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let (api, form) = form();
        form.update_field(Field::Email, "a@b.co");
        let outcome = form.submit().await;
        assert_eq!(
            outcome,
            SubmissionOutcome::ValidationFailure("First and last name are required".into())
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn success_clears_the_draft() {
        let (api, form) = form();
        api.push_create(created("901"));
        fill(&form, "a@b.co");

        let outcome = form.submit().await;
        assert_eq!(outcome, SubmissionOutcome::Success("901".into()));
        assert_eq!(form.state(), FormState::Succeeded);
        assert!(form.draft().is_empty());
        assert_eq!(form.status_message().as_deref(), Some("Save to HubSpot: 901"));
        assert_eq!(
            api.calls(),
            vec![Call::Create(NewContact {
                firstname: "Ada".into(),
                lastname: "Lovelace".into(),
                email: "a@b.co".into(),
            })]
        );
    }

    #[tokio::test]
    async fn validation_failure_does_not_lock_the_form() {
        let (api, form) = form();
        api.push_create(created("7"));
        fill(&form, "bad");
        assert!(matches!(form.submit().await, SubmissionOutcome::ValidationFailure(_)));

        form.update_field(Field::Email, "a@b.com");
        assert_eq!(form.submit().await, SubmissionOutcome::Success("7".into()));
    }

    #[tokio::test]
    async fn remote_failure_keeps_the_draft() {
        let (api, form) = form();
        api.push_create(Err(ApiError::Remote { status: 409, message: "Conflict creating contact".into() }));
        fill(&form, "a@b.co");

        let outcome = form.submit().await;
        assert_eq!(outcome, SubmissionOutcome::RemoteFailure("Conflict creating contact".into()));
        assert_eq!(form.state(), FormState::Failed);
        assert_eq!(form.field(Field::FirstName), "Ada");
        assert_eq!(form.field(Field::Email), "a@b.co");
    }

    #[tokio::test]
    async fn network_failure_is_prefixed_and_keeps_the_draft() {
        let (api, form) = form();
        api.push_create(Err(ApiError::Network("connection refused".into())));
        fill(&form, "a@b.co");

        let outcome = form.submit().await;
        assert_eq!(outcome, SubmissionOutcome::NetworkFailure("Network error: connection refused".into()));
        assert_eq!(form.state(), FormState::Failed);
        assert!(!form.draft().is_empty());
    }

    #[tokio::test]
    async fn submitting_state_is_visible_while_in_flight() {
        let (api, form) = form();
        api.push_create(created("1"));
        fill(&form, "a@b.co");

        tokio::join!(form.submit(), async {
            assert!(form.is_submitting());
            form.update_field(Field::LastName, "Byron");
        });
        assert_eq!(form.state(), FormState::Succeeded);
    }

    #[tokio::test]
    async fn reset_discards_pending_result() {
        let (api, form) = form();
        api.push_create(created("1"));
        fill(&form, "a@b.co");

        let (outcome, _) = tokio::join!(form.submit(), async {
            form.reset();
            form.update_field(Field::FirstName, "Grace");
        });
        assert!(outcome.is_success());
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(form.outcome(), None);
        assert_eq!(form.field(Field::FirstName), "Grace");
    }

    #[tokio::test]
    async fn teardown_discards_pending_result() {
        let (api, form) = form();
        api.push_create(created("1"));
        let form = Rc::new(form);
        let notified = Rc::new(Cell::new(0));
        {
            let notified = notified.clone();
            form.connect_changed(move || notified.set(notified.get() + 1));
        }
        fill(&form, "a@b.co");

        let (outcome, _) = tokio::join!(form.submit(), async { form.deactivate() });
        assert!(outcome.is_success());
        assert_eq!(notified.get(), 1);
        assert_eq!(form.state(), FormState::Submitting);
        assert_eq!(form.outcome(), None);
        assert_eq!(form.field(Field::FirstName), "Ada");
        assert_eq!(form.field(Field::Email), "a@b.co");
    }

    #[tokio::test]
    async fn change_callback_tracks_submit_lifecycle() {
        let (api, form) = form();
        api.push_create(created("5"));
        let form = Rc::new(form);
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = seen.clone();
            let weak = Rc::downgrade(&form);
            form.connect_changed(move || {
                if let Some(form) = weak.upgrade() {
                    seen.borrow_mut().push(form.state());
                }
            });
        }
        fill(&form, "a@b.co");
        form.submit().await;
        assert_eq!(*seen.borrow(), vec![FormState::Submitting, FormState::Succeeded]);

        form.deactivate();
        form.reset();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn reset_clears_everything() {
        let (_api, form) = form();
        fill(&form, "a@b.co");
        form.reset();
        assert!(form.draft().is_empty());
        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(form.status_message(), None);
    }
}
