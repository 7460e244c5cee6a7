use super::Dispatch;
use super::widgets::{Banner, FieldInput};
use crate::app::{Action, AppState};
use crate::validation::Field;
use gtk4 as gtk;
use gtk4::prelude::*;

pub struct ContactFormView {
    root: gtk::Box,
    inputs: Vec<(Field, FieldInput)>,
    banner: Banner,
    submit: gtk::Button,
}

impl ContactFormView {
    pub fn new(dispatch: Dispatch) -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
        root.set_margin_bottom(12);
        root.set_margin_start(12);
        root.set_margin_end(12);

        let inputs = vec![
            (Field::Name, FieldInput::line("Name", "Enter your name", true)),
            (Field::Email, FieldInput::line("Email", "Enter your email", true)),
            (Field::Phone, FieldInput::line("Phone", "Enter your phone number", true)),
            (Field::Message, FieldInput::multi_line("Message (optional)")),
        ];
        for (field, input) in &inputs {
            let field = *field;
            root.append(input.widget());
            {
                let dispatch = dispatch.clone();
                input.connect_changed(move |text| dispatch(Action::FieldChanged(field, text)));
            }
            {
                let dispatch = dispatch.clone();
                input.connect_blur(move || dispatch(Action::FieldBlurred(field)));
            }
            {
                let dispatch = dispatch.clone();
                input.connect_activate(move || dispatch(Action::Submit));
            }
        }

        let banner = {
            let dispatch = dispatch.clone();
            Banner::new().with_close(move || dispatch(Action::DismissSubmitStatus))
        };
        root.append(banner.widget());

        let submit = gtk::Button::with_label("Submit Contact");
        submit.add_css_class("suggested-action");
        submit.add_css_class("pill");
        submit.connect_clicked(move |_| dispatch(Action::Submit));
        root.append(&submit);

        Self {
            root,
            inputs,
            banner,
            submit,
        }
    }

    pub fn widget(&self) -> &gtk::Box {
        &self.root
    }

    pub fn render(&self, state: &AppState) {
        for (field, input) in &self.inputs {
            input.set_text(state.form.value(*field));
            input.set_error(state.errors.get(field).map(String::as_str));
        }
        self.banner.set(state.submit_status.as_ref());
        self.submit.set_label(state.submit_label());
        self.submit.set_sensitive(state.can_submit());
    }
}
