use std::cell::{Cell, RefCell};
use std::rc::Rc;

use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;
use gtk4::gdk;

use crate::api::HttpContactApi;
use crate::i18n::Locale;
use crate::navigation::{Key, KeyHub, View};
use crate::prefs::{PreferenceContext, Subscription};
use crate::ui::{Page, PageContext};

struct Shell {
    ctx: PageContext,
    stack: gtk::Stack,
    title: gtk::Label,
    language: gtk::DropDown,
    footer: gtk::Label,
    relabeling: Cell<bool>,
    current: RefCell<Option<(View, Box<dyn Page>)>>,
    locale_sub: RefCell<Option<Subscription>>,
}

impl Shell {
    fn navigate(&self, view: View) {
        // Tear the old page down first: its shortcut and engines go with it.
        if let Some((old, page)) = self.current.replace(None) {
            self.stack.remove(&page.widget());
            log::debug!("left view {}", old.name());
        }
        let page: Box<dyn Page> = match view {
            View::Home => Box::new(crate::ui::home::HomePage::new(&self.ctx)),
            View::Contacts => Box::new(crate::ui::contacts_view::ContactsPage::new(&self.ctx)),
            View::AddContact => Box::new(crate::ui::add_contact::AddContactPage::new(&self.ctx)),
        };
        self.stack.add_named(&page.widget(), Some(view.name()));
        self.stack.set_visible_child_name(view.name());
        self.current.replace(Some((view, page)));
        log::debug!("entered view {}", view.name());
    }

    fn retranslate(&self) {
        self.title.set_label(&self.ctx.t("home_title"));
        self.footer.set_label(&format!("{} · {}", self.ctx.t("footer_brand"), self.ctx.t("footer_sub")));

        self.relabeling.set(true);
        let labels: Vec<String> = Locale::ALL.iter().map(|l| self.ctx.t(l.label_key())).collect();
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        self.language.set_model(Some(&gtk::StringList::new(&labels)));
        self.language.set_selected(locale_index(self.ctx.prefs.locale()));
        self.relabeling.set(false);
    }
}

fn locale_index(locale: Locale) -> u32 {
    Locale::ALL.iter().position(|l| *l == locale).unwrap_or(0) as u32
}

fn key_from_gdk(keyval: gdk::Key) -> Key {
    if keyval == gdk::Key::Escape {
        Key::Escape
    } else if keyval == gdk::Key::Return || keyval == gdk::Key::KP_Enter {
        Key::Enter
    } else {
        Key::Other(keyval.name().map(|n| n.to_string()).unwrap_or_default())
    }
}

pub fn show_main_window(app: &Application, api: HttpContactApi, prefs: Rc<PreferenceContext>) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Contacts")
        .default_width(960)
        .default_height(640)
        .build();

    let overlay = adw::ToastOverlay::new();
    let stack = gtk::Stack::builder()
        .transition_type(gtk::StackTransitionType::Crossfade)
        .vexpand(true)
        .hexpand(true)
        .build();

    let content = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let scroller = gtk::ScrolledWindow::builder().vexpand(true).hexpand(true).build();
    scroller.set_child(Some(&stack));
    content.append(&scroller);
    let footer = crate::ui::label(&["dim-label"]);
    footer.set_halign(gtk::Align::Center);
    footer.set_margin_top(6);
    footer.set_margin_bottom(6);
    content.append(&footer);
    overlay.set_child(Some(&content));

    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = gtk::Label::new(None);
    header.set_title_widget(Some(&title));
    let language = gtk::DropDown::from_strings(&[]);
    header.pack_end(&language);
    container.append(&header);
    container.append(&overlay);
    window.set_content(Some(&container));

    let shell = Rc::new_cyclic(|weak: &std::rc::Weak<Shell>| {
        let weak = weak.clone();
        // Deferred so a page is never torn down from inside its own handler.
        let navigate: Rc<dyn Fn(View)> = Rc::new(move |view| {
            let weak = weak.clone();
            glib::idle_add_local_once(move || {
                if let Some(shell) = weak.upgrade() {
                    shell.navigate(view);
                }
            });
        });
        Shell {
            ctx: PageContext {
                window: window.clone(),
                overlay: overlay.clone(),
                api,
                prefs: prefs.clone(),
                keys: KeyHub::new(),
                navigate,
            },
            stack,
            title,
            language: language.clone(),
            footer,
            relabeling: Cell::new(false),
            current: RefCell::new(None),
            locale_sub: RefCell::new(None),
        }
    });

    {
        let weak = Rc::downgrade(&shell);
        let sub = prefs.subscribe(move |locale| {
            log::info!("locale switched to {locale}");
            if let Some(shell) = weak.upgrade() {
                shell.retranslate();
            }
        });
        shell.locale_sub.replace(Some(sub));
    }

    {
        let prefs = prefs.clone();
        let weak = Rc::downgrade(&shell);
        language.connect_selected_notify(move |dropdown| {
            let relabeling = weak.upgrade().map(|s| s.relabeling.get()).unwrap_or(false);
            if relabeling {
                return;
            }
            let Some(locale) = Locale::ALL.get(dropdown.selected() as usize).copied() else { return };
            if locale != prefs.locale() {
                prefs.set_locale(locale);
            }
        });
    }

    // The key controller lives as long as the window and keeps the shell alive.
    let keys = gtk::EventControllerKey::new();
    keys.set_propagation_phase(gtk::PropagationPhase::Capture);
    {
        let shell = shell.clone();
        keys.connect_key_pressed(move |_, keyval, _keycode, _state| {
            let key = key_from_gdk(keyval);
            let observed = shell.ctx.keys.dispatch(&key);
            if observed && key == Key::Escape {
                glib::Propagation::Stop
            } else {
                glib::Propagation::Proceed
            }
        });
    }
    window.add_controller(keys);

    shell.retranslate();
    shell.navigate(View::Home);
    window.present();
}
