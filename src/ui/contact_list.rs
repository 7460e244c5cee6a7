use super::Dispatch;
use crate::api::models::Contact;
use crate::app::{Action, AppState, SortKey, SortOrder};
use gtk4 as gtk;
use gtk4::prelude::*;
use std::cell::RefCell;
use uuid::Uuid;

pub struct ContactListView {
    root: gtk::Box,
    count: gtk::Label,
    loading: gtk::Box,
    spinner: gtk::Spinner,
    controls: gtk::Box,
    sort_by: gtk::DropDown,
    order: gtk::Button,
    empty: gtk::Label,
    scroller: gtk::ScrolledWindow,
    list: gtk::ListBox,
    dispatch: Dispatch,
    rendered: RefCell<Option<Vec<Uuid>>>,
}

impl ContactListView {
    pub fn new(dispatch: Dispatch) -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 8);
        root.set_margin_bottom(12);
        root.set_margin_start(12);
        root.set_margin_end(12);

        let count = gtk::Label::new(None);
        count.add_css_class("dim-label");
        count.set_halign(gtk::Align::Start);
        root.append(&count);

        let controls = gtk::Box::new(gtk::Orientation::Horizontal, 8);
        let sort_label = gtk::Label::new(Some("Sort by"));
        let labels: Vec<&str> = SortKey::ALL.iter().map(|k| k.label()).collect();
        let sort_by = gtk::DropDown::from_strings(&labels);
        {
            let dispatch = dispatch.clone();
            sort_by.connect_selected_notify(move |dd| {
                if let Some(key) = SortKey::ALL.get(dd.selected() as usize) {
                    dispatch(Action::SortBy(*key));
                }
            });
        }
        let order = gtk::Button::new();
        order.add_css_class("flat");
        {
            let dispatch = dispatch.clone();
            order.connect_clicked(move |_| dispatch(Action::ToggleSortOrder));
        }
        controls.append(&sort_label);
        controls.append(&sort_by);
        controls.append(&order);
        root.append(&controls);

        let loading = gtk::Box::new(gtk::Orientation::Vertical, 6);
        loading.set_valign(gtk::Align::Center);
        loading.set_vexpand(true);
        let spinner = gtk::Spinner::new();
        loading.append(&spinner);
        let loading_text = gtk::Label::new(Some("Loading contacts..."));
        loading_text.add_css_class("dim-label");
        loading.append(&loading_text);
        root.append(&loading);

        let empty = gtk::Label::new(Some("No contacts yet. Add your first contact!"));
        empty.add_css_class("dim-label");
        empty.set_vexpand(true);
        root.append(&empty);

        let list = gtk::ListBox::new();
        list.set_selection_mode(gtk::SelectionMode::None);
        list.add_css_class("boxed-list");
        let scroller = gtk::ScrolledWindow::builder()
            .vexpand(true)
            .hexpand(true)
            .child(&list)
            .build();
        root.append(&scroller);

        Self {
            root,
            count,
            loading,
            spinner,
            controls,
            sort_by,
            order,
            empty,
            scroller,
            list,
            dispatch,
            rendered: RefCell::new(None),
        }
    }

    pub fn widget(&self) -> &gtk::Box {
        &self.root
    }

    pub fn render(&self, state: &AppState) {
        self.count.set_label(&format!("Contacts ({})", state.contacts.len()));

        self.loading.set_visible(state.loading);
        self.spinner.set_spinning(state.loading);
        let has_contacts = !state.contacts.is_empty();
        self.empty.set_visible(!state.loading && !has_contacts);
        self.controls.set_visible(!state.loading && has_contacts);
        self.scroller.set_visible(!state.loading && has_contacts);

        let selected = SortKey::ALL
            .iter()
            .position(|k| *k == state.sort_key)
            .unwrap_or_default() as u32;
        if self.sort_by.selected() != selected {
            self.sort_by.set_selected(selected);
        }
        self.order.set_label(state.sort_order.arrow());
        self.order.set_tooltip_text(Some(match state.sort_order {
            SortOrder::Asc => "Sort Ascending",
            SortOrder::Desc => "Sort Descending",
        }));

        let sorted = state.sorted_contacts();
        let ids: Vec<Uuid> = sorted.iter().map(|c| c.id).collect();
        if self.rendered.borrow().as_ref() == Some(&ids) {
            return;
        }
        while let Some(child) = self.list.first_child() {
            self.list.remove(&child);
        }
        for contact in sorted {
            self.list.append(&self.row(contact));
        }
        self.rendered.replace(Some(ids));
    }

    fn row(&self, contact: &Contact) -> gtk::ListBoxRow {
        let row = gtk::ListBoxRow::new();
        let body = gtk::Box::new(gtk::Orientation::Horizontal, 12);
        body.set_margin_top(8);
        body.set_margin_bottom(8);
        body.set_margin_start(8);
        body.set_margin_end(8);

        let details = gtk::Box::new(gtk::Orientation::Vertical, 2);
        details.set_hexpand(true);
        let name = gtk::Label::new(Some(&contact.name));
        name.add_css_class("heading");
        name.set_halign(gtk::Align::Start);
        details.append(&name);
        for line in [
            format!("Email: {}", contact.email),
            format!("Phone: {}", contact.phone),
        ] {
            let lbl = gtk::Label::new(Some(&line));
            lbl.set_halign(gtk::Align::Start);
            details.append(&lbl);
        }
        let message = if contact.message.is_empty() {
            let lbl = gtk::Label::new(Some("No message"));
            lbl.add_css_class("dim-label");
            lbl
        } else {
            gtk::Label::new(Some(&format!("Message: {}", contact.message)))
        };
        message.set_halign(gtk::Align::Start);
        message.set_wrap(true);
        details.append(&message);
        body.append(&details);

        let delete = gtk::Button::with_label("Delete");
        delete.add_css_class("destructive-action");
        delete.set_valign(gtk::Align::Center);
        let id = contact.id;
        let dispatch = self.dispatch.clone();
        delete.connect_clicked(move |_| dispatch(Action::RequestDelete(id)));
        body.append(&delete);

        row.set_child(Some(&body));
        row
    }
}
