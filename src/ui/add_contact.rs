use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::api::HttpContactApi;
use crate::contacts::{ContactForm, Field};
use crate::navigation::CancelShortcut;
use crate::prefs::Subscription;
use crate::ui::{Page, PageContext, PageHeader};

struct Inner {
    ctx: PageContext,
    form: ContactForm<HttpContactApi>,
    root: gtk::Box,
    header: PageHeader,
    title: gtk::Label,
    subtitle: gtk::Label,
    fields: Vec<(Field, gtk::Label, gtk::Entry)>,
    submit: gtk::Button,
    clear: gtk::Button,
    status: gtk::Label,
}

/// Create-contact form page.
pub struct AddContactPage {
    inner: Rc<Inner>,
    _shortcut: CancelShortcut,
    _locale: Subscription,
}

impl AddContactPage {
    pub fn new(ctx: &PageContext) -> Self {
        let root = crate::ui::page_box();
        root.set_halign(gtk::Align::Center);
        root.set_width_request(480);

        let header = PageHeader::new(ctx, "breadcrumb_add");
        root.append(&header.root);
        let title = crate::ui::label(&["title-2"]);
        let subtitle = crate::ui::label(&["dim-label"]);
        root.append(&title);
        root.append(&subtitle);

        let mut fields = Vec::new();
        for field in Field::ALL {
            let caption = crate::ui::label(&["caption-heading"]);
            let entry = gtk::Entry::new();
            entry.set_hexpand(true);
            if field == Field::Email {
                entry.set_input_purpose(gtk::InputPurpose::Email);
            }
            root.append(&caption);
            root.append(&entry);
            fields.push((field, caption, entry));
        }

        let actions = gtk::Box::new(gtk::Orientation::Horizontal, 8);
        actions.set_halign(gtk::Align::End);
        actions.set_margin_top(12);
        let clear = gtk::Button::new();
        clear.add_css_class("flat");
        let submit = gtk::Button::new();
        submit.add_css_class("suggested-action");
        actions.append(&clear);
        actions.append(&submit);
        root.append(&actions);

        let status = crate::ui::label(&[]);
        status.set_visible(false);
        root.append(&status);

        let inner = Rc::new(Inner {
            ctx: ctx.clone(),
            form: ContactForm::new(ctx.api.clone(), ctx.prefs.clone()),
            root,
            header,
            title,
            subtitle,
            fields,
            submit,
            clear,
            status,
        });

        for (field, _, entry) in &inner.fields {
            let field = *field;
            let weak = Rc::downgrade(&inner);
            entry.connect_changed(move |entry| {
                if let Some(inner) = weak.upgrade() {
                    inner.form.update_field(field, entry.text().to_string());
                }
            });
            let weak = Rc::downgrade(&inner);
            entry.connect_activate(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.submit();
                }
            });
        }
        {
            let weak = Rc::downgrade(&inner);
            inner.submit.connect_clicked(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.submit();
                }
            });
        }
        {
            let weak = Rc::downgrade(&inner);
            inner.clear.connect_clicked(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.form.reset();
                }
            });
        }
        {
            let weak = Rc::downgrade(&inner);
            inner.form.connect_changed(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.refresh();
                }
            });
        }

        let shortcut = CancelShortcut::install(&ctx.keys, ctx.navigator());
        let locale = {
            let weak = Rc::downgrade(&inner);
            ctx.prefs.subscribe(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.retranslate();
                }
            })
        };
        inner.retranslate();
        if let Some((_, _, first)) = inner.fields.first() {
            first.grab_focus();
        }
        Self { inner, _shortcut: shortcut, _locale: locale }
    }
}

impl Drop for AddContactPage {
    fn drop(&mut self) {
        self.inner.form.deactivate();
    }
}

impl Page for AddContactPage {
    fn widget(&self) -> gtk::Widget {
        self.inner.root.clone().upcast()
    }
}

impl Inner {
    fn submit(self: &Rc<Self>) {
        // The button is insensitive while submitting; Enter in an entry is not.
        if self.form.is_submitting() {
            return;
        }
        let inner = self.clone();
        glib::spawn_future_local(async move {
            inner.form.submit().await;
        });
    }

    fn retranslate(&self) {
        self.header.retranslate(&self.ctx);
        self.title.set_label(&self.ctx.t("panel_create_title"));
        self.subtitle.set_label(&self.ctx.t("panel_create_sub"));
        for (field, caption, _) in &self.fields {
            caption.set_label(&self.ctx.t(field.label_key()));
        }
        self.clear.set_label(&self.ctx.t("clear_button"));
        self.refresh();
    }

    fn refresh(&self) {
        let submitting = self.form.is_submitting();
        self.submit.set_sensitive(!submitting);
        self.submit.set_label(&self.ctx.t(if submitting { "submitting" } else { "save_button" }));

        // Only touch entries that differ, so the cursor stays put while typing.
        let draft = self.form.draft();
        for (field, _, entry) in &self.fields {
            let value = draft.get(*field);
            if entry.text().as_str() != value {
                entry.set_text(value);
            }
        }

        match (self.form.outcome(), self.form.status_message()) {
            (Some(outcome), Some(message)) => {
                let ok = outcome.is_success();
                self.status.set_label(&message);
                self.status.remove_css_class(if ok { "error" } else { "success" });
                self.status.add_css_class(if ok { "success" } else { "error" });
                self.status.set_visible(true);
            }
            _ => self.status.set_visible(false),
        }
    }
}
