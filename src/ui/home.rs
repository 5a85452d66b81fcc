use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::navigation::View;
use crate::prefs::Subscription;
use crate::ui::{Page, PageContext};

struct Widgets {
    root: gtk::Box,
    title: gtk::Label,
    lead: gtk::Label,
    view_btn: gtk::Button,
    add_btn: gtk::Button,
    note: gtk::Label,
}

impl Widgets {
    fn retranslate(&self, ctx: &PageContext) {
        self.title.set_label(&ctx.t("hero_title"));
        self.lead.set_label(&ctx.t("hero_lead"));
        self.view_btn.set_label(&ctx.t("view_contacts"));
        self.add_btn.set_label(&ctx.t("add_contact"));
        self.note.set_label(&ctx.t("app_note"));
    }
}

pub struct HomePage {
    widgets: Rc<Widgets>,
    _locale: Subscription,
}

impl HomePage {
    pub fn new(ctx: &PageContext) -> Self {
        let root = crate::ui::page_box();
        root.set_valign(gtk::Align::Center);
        root.set_halign(gtk::Align::Center);

        let title = crate::ui::label(&["title-1"]);
        let lead = crate::ui::label(&["dim-label"]);
        root.append(&title);
        root.append(&lead);

        let actions = gtk::Box::new(gtk::Orientation::Horizontal, 12);
        actions.set_margin_top(12);
        let view_btn = gtk::Button::new();
        view_btn.add_css_class("suggested-action");
        let add_btn = gtk::Button::new();
        actions.append(&view_btn);
        actions.append(&add_btn);
        root.append(&actions);

        let note = crate::ui::label(&["caption", "dim-label"]);
        note.set_margin_top(24);
        root.append(&note);

        {
            let navigate = ctx.navigator();
            view_btn.connect_clicked(move |_| navigate(View::Contacts));
        }
        {
            let navigate = ctx.navigator();
            add_btn.connect_clicked(move |_| navigate(View::AddContact));
        }

        let widgets = Rc::new(Widgets { root, title, lead, view_btn, add_btn, note });
        widgets.retranslate(ctx);

        let locale = {
            let weak = Rc::downgrade(&widgets);
            let ctx = ctx.clone();
            ctx.prefs.clone().subscribe(move |_| {
                if let Some(widgets) = weak.upgrade() {
                    widgets.retranslate(&ctx);
                }
            })
        };
        Self { widgets, _locale: locale }
    }
}

impl Page for HomePage {
    fn widget(&self) -> gtk::Widget {
        self.widgets.root.clone().upcast()
    }
}
