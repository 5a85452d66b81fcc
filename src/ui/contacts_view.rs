use std::rc::{Rc, Weak};

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::api::{ContactRecord, HttpContactApi};
use crate::contacts::list::delete_target;
use crate::contacts::ContactList;
use crate::navigation::CancelShortcut;
use crate::prefs::Subscription;
use crate::ui::{Page, PageContext, PageHeader};

struct Inner {
    ctx: PageContext,
    list: ContactList<HttpContactApi>,
    root: gtk::Box,
    header: PageHeader,
    title: gtk::Label,
    subtitle: gtk::Label,
    error: gtk::Label,
    grid: gtk::Grid,
    more: gtk::Button,
    end: gtk::Label,
}

/// Paginated table of contacts with per-row delete.
pub struct ContactsPage {
    inner: Rc<Inner>,
    _shortcut: CancelShortcut,
    _locale: Subscription,
}

impl ContactsPage {
    pub fn new(ctx: &PageContext) -> Self {
        let root = crate::ui::page_box();
        let header = PageHeader::new(ctx, "breadcrumb_contacts");
        root.append(&header.root);

        let title = crate::ui::label(&["title-2"]);
        let subtitle = crate::ui::label(&["dim-label"]);
        let error = crate::ui::label(&["error"]);
        error.set_visible(false);
        root.append(&title);
        root.append(&subtitle);
        root.append(&error);

        let grid = gtk::Grid::builder().row_spacing(6).column_spacing(18).margin_top(12).build();
        root.append(&grid);

        let footer = gtk::Box::new(gtk::Orientation::Horizontal, 10);
        footer.set_margin_top(14);
        let more = gtk::Button::new();
        let end = crate::ui::label(&["dim-label"]);
        footer.append(&more);
        footer.append(&end);
        root.append(&footer);

        let inner = Rc::new(Inner {
            ctx: ctx.clone(),
            list: ContactList::new(ctx.api.clone()),
            root,
            header,
            title,
            subtitle,
            error,
            grid,
            more,
            end,
        });

        {
            let weak = Rc::downgrade(&inner);
            inner.list.connect_changed(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.refresh();
                }
            });
        }
        {
            let weak = Rc::downgrade(&inner);
            inner.more.connect_clicked(move |_| {
                if let Some(inner) = weak.upgrade() {
                    glib::spawn_future_local(async move { inner.list.load_next_page().await });
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
        {
            let inner = inner.clone();
            glib::spawn_future_local(async move { inner.list.load_first_page().await });
        }
        Self { inner, _shortcut: shortcut, _locale: locale }
    }
}

impl Drop for ContactsPage {
    fn drop(&mut self) {
        self.inner.list.deactivate();
    }
}

impl Page for ContactsPage {
    fn widget(&self) -> gtk::Widget {
        self.inner.root.clone().upcast()
    }
}

impl Inner {
    fn retranslate(self: &Rc<Self>) {
        self.header.retranslate(&self.ctx);
        self.title.set_label(&self.ctx.t("list_title"));
        self.subtitle.set_label(&self.ctx.t("list_sub"));
        self.refresh();
    }

    fn refresh(self: &Rc<Self>) {
        let ctx = &self.ctx;
        let busy = self.list.is_busy();

        match self.list.error() {
            Some(message) => {
                self.error.set_label(&format!("{}: {message}", ctx.t("error_prefix")));
                self.error.set_visible(true);
            }
            None => self.error.set_visible(false),
        }

        crate::ui::clear_grid(&self.grid);
        let headings = [
            "ID".to_string(),
            ctx.t("name_label"),
            ctx.t("lastname_label"),
            ctx.t("email_label"),
            ctx.t("actions"),
        ];
        for (col, text) in headings.iter().enumerate() {
            let cell = crate::ui::label(&["heading"]);
            cell.set_label(text);
            self.grid.attach(&cell, col as i32, 0, 1, 1);
        }

        let records = self.list.records();
        if records.is_empty() && !busy {
            let empty = crate::ui::label(&["dim-label"]);
            empty.set_label(&ctx.t("no_contacts"));
            self.grid.attach(&empty, 0, 1, 5, 1);
        }
        for (i, record) in records.iter().enumerate() {
            self.attach_row(i as i32 + 1, record);
        }

        let has_more = self.list.has_more();
        self.more.set_visible(has_more);
        self.more.set_sensitive(!busy);
        self.more.set_label(&ctx.t(if busy { "loading" } else { "load_more" }));
        self.end.set_visible(!has_more);
        self.end.set_label(&ctx.t(if busy { "loading" } else { "end_of_list" }));
    }

    fn attach_row(self: &Rc<Self>, row: i32, record: &ContactRecord) {
        let cells = [
            record.id.as_str(),
            record.firstname().unwrap_or("-"),
            record.lastname().unwrap_or("-"),
            record.email().unwrap_or("-"),
        ];
        for (col, text) in cells.into_iter().enumerate() {
            let cell = crate::ui::label(&[]);
            cell.set_label(text);
            cell.set_selectable(true);
            self.grid.attach(&cell, col as i32, row, 1, 1);
        }

        let delete = gtk::Button::with_label(&self.ctx.t("delete_button"));
        delete.add_css_class("flat");
        delete.add_css_class("destructive-action");
        let weak = Rc::downgrade(self);
        let id = record.id.clone();
        let target = delete_target(record).to_string();
        delete.connect_clicked(move |_| confirm_delete(weak.clone(), id.clone(), target.clone()));
        self.grid.attach(&delete, 4, row, 1, 1);
    }
}

fn confirm_delete(weak: Weak<Inner>, id: String, target: String) {
    let Some(inner) = weak.upgrade() else { return };
    let ctx = &inner.ctx;

    let dialog = gtk::Dialog::builder()
        .title(ctx.t("delete_button"))
        .transient_for(&ctx.window)
        .modal(true)
        .build();
    let prompt = crate::ui::label(&[]);
    prompt.set_label(&ctx.prefs.translate_with("confirm_delete", &[("target", target.as_str())]));
    prompt.set_margin_top(12);
    prompt.set_margin_bottom(12);
    prompt.set_margin_start(12);
    prompt.set_margin_end(12);
    dialog.content_area().append(&prompt);

    let _ = dialog.add_button(&ctx.t("cancel_button"), gtk::ResponseType::Cancel);
    let ok_btn = dialog.add_button(&ctx.t("delete_button"), gtk::ResponseType::Accept);
    ok_btn.add_css_class("destructive-action");
    dialog.set_default_response(gtk::ResponseType::Cancel);

    dialog.connect_response(move |dlg, resp| {
        dlg.close();
        if resp != gtk::ResponseType::Accept {
            return;
        }
        let Some(inner) = weak.upgrade() else { return };
        let id = id.clone();
        glib::spawn_future_local(async move {
            if let Err(err) = inner.list.remove_record(&id).await {
                log::warn!("delete of {id} failed: {err}");
                inner.ctx.toast(&format!("{}: {err}", inner.ctx.t("delete_error")));
            }
        });
    });
    dialog.present();
}
