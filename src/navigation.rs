//! View switching and the Escape-to-home shortcut.
//!
//! The window owns one [`KeyHub`] and feeds it every key press. Views that
//! want the shortcut hold a [`CancelShortcut`] for as long as they are shown;
//! dropping it unregisters the observer, so a hidden view can never
//! navigate.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Home,
    Contacts,
    AddContact,
}

impl View {
    pub const ALL: [View; 3] = [View::Home, View::Contacts, View::AddContact];

    /// Stable page name, also used as the stack child name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Contacts => "view",
            Self::AddContact => "add",
        }
    }
}

pub trait Navigator {
    fn navigate(&self, view: View);
}

impl<F: Fn(View)> Navigator for F {
    fn navigate(&self, view: View) {
        self(view)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Other(String),
}

type Handler = Rc<dyn Fn(&Key)>;
type Observers = RefCell<Vec<(u64, Handler)>>;

/// Window-wide key observer registry.
#[derive(Clone, Default)]
pub struct KeyHub {
    observers: Rc<Observers>,
    next_id: Rc<Cell<u64>>,
}

impl KeyHub {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "the observer is detached when the guard drops"]
    pub fn attach(&self, handler: impl Fn(&Key) + 'static) -> KeyObserver {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.observers.borrow_mut().push((id, Rc::new(handler)));
        log::trace!("key observer {id} attached");
        KeyObserver { id, observers: Rc::downgrade(&self.observers) }
    }

    /// Delivers one key press to every attached observer. Returns whether
    /// anyone was listening.
    pub fn dispatch(&self, key: &Key) -> bool {
        // Handlers may navigate, which detaches observers mid-dispatch.
        let handlers: Vec<Handler> =
            self.observers.borrow().iter().map(|(_, h)| h.clone()).collect();
        for handler in &handlers {
            handler(key);
        }
        !handlers.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }
}

pub struct KeyObserver {
    id: u64,
    observers: Weak<Observers>,
}

impl Drop for KeyObserver {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            observers.borrow_mut().retain(|(id, _)| *id != self.id);
            log::trace!("key observer {} detached", self.id);
        }
    }
}

/// Escape navigates home while this guard is alive.
pub struct CancelShortcut {
    _observer: KeyObserver,
}

impl CancelShortcut {
    pub fn install(hub: &KeyHub, navigator: impl Navigator + 'static) -> Self {
        let observer = hub.attach(move |key| {
            if *key == Key::Escape {
                log::debug!("escape pressed, returning home");
                navigator.navigate(View::Home);
            }
        });
        Self { _observer: observer }
    }
}
