pub mod add_contact;
pub mod contacts_view;
pub mod home;
pub mod main_window;

use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::api::HttpContactApi;
use crate::navigation::{KeyHub, View};
use crate::prefs::PreferenceContext;

/// Everything a page needs from the window that hosts it.
#[derive(Clone)]
pub struct PageContext {
    pub window: adw::ApplicationWindow,
    pub overlay: adw::ToastOverlay,
    pub api: HttpContactApi,
    pub prefs: Rc<PreferenceContext>,
    pub keys: KeyHub,
    pub navigate: Rc<dyn Fn(View)>,
}

impl PageContext {
    pub fn t(&self, key: &str) -> String {
        self.prefs.translate(key)
    }

    pub fn toast(&self, message: &str) {
        self.overlay.add_toast(adw::Toast::new(message));
    }

    pub fn navigator(&self) -> impl Fn(View) + 'static {
        let navigate = self.navigate.clone();
        move |view| navigate(view)
    }
}

/// A page shown in the window's stack. Dropping it tears the page down.
pub trait Page {
    fn widget(&self) -> gtk::Widget;
}

pub(crate) fn page_box() -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);
    root
}

pub(crate) fn label(css: &[&str]) -> gtk::Label {
    let label = gtk::Label::new(None);
    label.set_halign(gtk::Align::Start);
    label.set_wrap(true);
    for class in css {
        label.add_css_class(class);
    }
    label
}

/// Breadcrumb row with a home link plus the Escape hint.
pub(crate) struct PageHeader {
    pub root: gtk::Box,
    home: gtk::Button,
    current: gtk::Label,
    hint: gtk::Label,
    current_key: &'static str,
}

impl PageHeader {
    pub fn new(ctx: &PageContext, current_key: &'static str) -> Self {
        let root = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let home = gtk::Button::new();
        home.add_css_class("flat");
        {
            let navigate = ctx.navigator();
            home.connect_clicked(move |_| navigate(View::Home));
        }
        let sep = gtk::Label::new(Some("/"));
        sep.add_css_class("dim-label");
        let current = label(&["heading"]);
        let hint = label(&["dim-label"]);
        hint.set_hexpand(true);
        hint.set_halign(gtk::Align::End);

        root.append(&home);
        root.append(&sep);
        root.append(&current);
        root.append(&hint);

        let header = Self { root, home, current, hint, current_key };
        header.retranslate(ctx);
        header
    }

    pub fn retranslate(&self, ctx: &PageContext) {
        self.home.set_label(&ctx.t("breadcrumb_home"));
        self.current.set_label(&ctx.t(self.current_key));
        self.hint.set_label(&ctx.t("kbd_hint"));
    }
}

pub(crate) fn clear_grid(grid: &gtk::Grid) {
    while let Some(child) = grid.first_child() {
        grid.remove(&child);
    }
}
