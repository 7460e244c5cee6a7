use super::Dispatch;
use super::contact_form::ContactFormView;
use super::contact_list::ContactListView;
use super::widgets::card;
use crate::api::client::ApiClient;
use crate::api::models::Contact;
use crate::app::{Action, AppState, Effect, perform};
use crate::utils::spawn_async;
use adw::prelude::*;
use gtk4 as gtk;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

pub struct Window {
    state: RefCell<AppState>,
    rendering: Cell<bool>,
    client: ApiClient,
    dispatch: Dispatch,
    window: adw::ApplicationWindow,
    overlay: adw::ToastOverlay,
    form: ContactFormView,
    list: ContactListView,
    toast: RefCell<Option<(u64, adw::Toast)>>,
    confirm: RefCell<Option<gtk::Dialog>>,
}

impl Window {
    pub fn new(app: &adw::Application, client: ApiClient) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Window>| {
            let weak = weak.clone();
            let dispatch: Dispatch = Rc::new(move |action: Action| {
                if let Some(window) = weak.upgrade() {
                    window.dispatch(action);
                }
            });

            let window = adw::ApplicationWindow::builder()
                .application(app)
                .title("Contact Management")
                .default_width(1100)
                .default_height(720)
                .build();

            let form = ContactFormView::new(dispatch.clone());
            let list = ContactListView::new(dispatch.clone());

            let columns = gtk::Box::new(gtk::Orientation::Horizontal, 0);
            columns.set_homogeneous(true);
            let form_scroll = gtk::ScrolledWindow::builder()
                .child(form.widget())
                .vexpand(true)
                .build();
            columns.append(&card("Add New Contact", &form_scroll));
            columns.append(&card("Contact List", list.widget()));

            let overlay = adw::ToastOverlay::new();
            overlay.set_child(Some(&columns));

            let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
            let header = adw::HeaderBar::new();
            header.set_title_widget(Some(&gtk::Label::new(Some("Contact Management"))));
            let refresh = gtk::Button::from_icon_name("view-refresh-symbolic");
            refresh.set_tooltip_text(Some("Reload contacts"));
            {
                let dispatch = dispatch.clone();
                refresh.connect_clicked(move |_| dispatch(Action::Load));
            }
            header.pack_end(&refresh);
            container.append(&header);
            container.append(&overlay);
            window.set_content(Some(&container));

            Window {
                state: RefCell::new(AppState::new()),
                rendering: Cell::new(false),
                client,
                dispatch,
                window,
                overlay,
                form,
                list,
                toast: RefCell::new(None),
                confirm: RefCell::new(None),
            }
        })
    }

    pub fn present(self: &Rc<Self>) {
        // The toplevel keeps its controller alive until it closes.
        let keep = Rc::clone(self);
        self.window.connect_close_request(move |_| {
            log::debug!("closing window ({} contacts)", keep.state.borrow().contacts.len());
            glib::Propagation::Proceed
        });
        self.render();
        self.window.present();
        self.dispatch(Action::Load);
    }

    fn dispatch(self: &Rc<Self>, action: Action) {
        // Widget signals raised while syncing widgets to state are echoes.
        if self.rendering.get() {
            return;
        }
        log::debug!("action: {action:?}");
        let effects = self.state.borrow_mut().update(action);
        self.render();
        for effect in effects {
            self.run(effect);
        }
    }

    fn run(self: &Rc<Self>, effect: Effect) {
        let this = Rc::downgrade(self);
        match effect {
            Effect::ExpireToast { id, after } => {
                glib::timeout_add_local_once(after, move || {
                    if let Some(this) = this.upgrade() {
                        this.dispatch(Action::ToastExpired(id));
                    }
                });
            }
            effect => {
                let client = self.client.clone();
                let handle = spawn_async(async move { perform(&client, effect).await });
                glib::MainContext::default().spawn_local(async move {
                    match handle.await {
                        Ok(Some(action)) => {
                            if let Some(this) = this.upgrade() {
                                this.dispatch(action);
                            }
                        }
                        Ok(None) => {}
                        Err(e) => log::error!("request task failed: {}", e),
                    }
                });
            }
        }
    }

    fn render(&self) {
        self.rendering.set(true);
        {
            let state = self.state.borrow();
            self.form.render(&state);
            self.list.render(&state);
            self.render_toast(&state);
            self.render_confirmation(&state);
        }
        self.rendering.set(false);
    }

    fn render_toast(&self, state: &AppState) {
        let wanted = state.toast.as_ref().map(|t| t.id);
        let shown = self.toast.borrow().as_ref().map(|(id, _)| *id);
        if wanted == shown {
            return;
        }
        if let Some((_, old)) = self.toast.take() {
            old.dismiss();
        }
        let Some(toast) = &state.toast else {
            return;
        };
        let widget = adw::Toast::new(&toast.message);
        // Expiry is driven by state, not by the overlay.
        widget.set_timeout(0);
        let id = toast.id;
        let dispatch = self.dispatch.clone();
        widget.connect_dismissed(move |_| dispatch(Action::DismissToast(id)));
        self.overlay.add_toast(widget.clone());
        self.toast.replace(Some((id, widget)));
    }

    fn render_confirmation(&self, state: &AppState) {
        let pending = state.pending_contact();
        let open = self.confirm.borrow().is_some();
        match (pending, open) {
            (Some(contact), false) => {
                let dialog = confirmation_dialog(contact);
                dialog.set_transient_for(Some(&self.window));
                let dispatch = self.dispatch.clone();
                dialog.connect_response(move |_, resp| dispatch(confirmation_action(resp)));
                dialog.present();
                self.confirm.replace(Some(dialog));
            }
            (None, true) => {
                if let Some(dialog) = self.confirm.take() {
                    dialog.close();
                }
            }
            _ => {}
        }
    }
}

/// Modal asking to confirm a delete. Answers come back through `response`.
fn confirmation_dialog(contact: &Contact) -> gtk::Dialog {
    let dialog = gtk::Dialog::builder()
        .title("Delete Contact")
        .modal(true)
        .build();
    let content = gtk::Box::new(gtk::Orientation::Vertical, 8);
    content.set_margin_top(12);
    content.set_margin_bottom(12);
    content.set_margin_start(12);
    content.set_margin_end(12);
    let question = gtk::Label::new(Some("Are you sure you want to delete this contact?"));
    question.set_halign(gtk::Align::Start);
    content.append(&question);
    let who = gtk::Label::new(Some(&format!("{} <{}>", contact.name, contact.email)));
    who.add_css_class("dim-label");
    who.set_halign(gtk::Align::Start);
    content.append(&who);
    // The dialog's own child holds the action area; replacing it would orphan the buttons.
    dialog.content_area().append(&content);

    let _ = dialog.add_button("Cancel", gtk::ResponseType::Cancel);
    let delete = dialog.add_button("Delete", gtk::ResponseType::Accept);
    delete.add_css_class("destructive-action");
    dialog.set_default_response(gtk::ResponseType::Cancel);
    dialog
}

fn confirmation_action(resp: gtk::ResponseType) -> Action {
    if resp == gtk::ResponseType::Accept {
        Action::ConfirmDelete
    } else {
        Action::CancelDelete
    }
}
