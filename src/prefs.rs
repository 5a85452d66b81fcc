//! Active display language, shared by every view.
//!
//! The context is created once at startup from a [`PreferenceStore`], read
//! by the engines and views through an `Rc`, and written only by the
//! language selector. Writes go through to the store; a store that cannot
//! be written never stops the in-memory change.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::i18n::{self, Locale};
use crate::storage::PreferenceStore;

/// Store key holding the locale token.
pub const LOCALE_KEY: &str = "lang";

type Listener = Rc<dyn Fn(Locale)>;
type Listeners = RefCell<Vec<(u64, Listener)>>;

pub struct PreferenceContext {
    locale: Cell<Locale>,
    store: Box<dyn PreferenceStore>,
    listeners: Rc<Listeners>,
    next_listener: Cell<u64>,
}

impl PreferenceContext {
    /// Reads the persisted locale once. Missing, unreadable or unknown values
    /// fall back to [`Locale::default`].
    pub fn load(store: impl PreferenceStore + 'static) -> Rc<Self> {
        let locale = match store.get(LOCALE_KEY) {
            Ok(Some(token)) => token.parse().unwrap_or_else(|e| {
                log::warn!("ignoring stored preference: {e}");
                Locale::default()
            }),
            Ok(None) => Locale::default(),
            Err(e) => {
                log::warn!("preferences unavailable, using default locale: {e}");
                Locale::default()
            }
        };
        log::debug!("active locale: {locale}");
        Rc::new(Self {
            locale: Cell::new(locale),
            store: Box::new(store),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_listener: Cell::new(0),
        })
    }

    pub fn locale(&self) -> Locale {
        self.locale.get()
    }

    /// Switches the active locale, persists it, and notifies every subscriber
    /// before returning.
    pub fn set_locale(&self, locale: Locale) {
        self.locale.set(locale);
        if let Err(e) = self.store.set(LOCALE_KEY, locale.as_str()) {
            log::warn!("could not persist locale {locale}: {e}");
        }
        // Snapshot so callbacks may subscribe or drop subscriptions.
        let listeners: Vec<Listener> =
            self.listeners.borrow().iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            listener(locale);
        }
    }

    pub fn translate(&self, key: &str) -> String {
        i18n::lookup(self.locale(), key)
    }

    pub fn translate_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        i18n::lookup_with(self.locale(), key, args)
    }

    /// Registers `listener` for locale changes until the returned guard drops.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(Locale) + 'static) -> Subscription {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        Subscription { id, listeners: Rc::downgrade(&self.listeners) }
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

pub struct Subscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}
