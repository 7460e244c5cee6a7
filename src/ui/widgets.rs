use crate::app::{Notice, Severity};
use gtk4 as gtk;
use gtk4::prelude::*;

pub fn severity_css(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "success",
        Severity::Error => "error",
    }
}

pub fn card(title: &str, child: &impl IsA<gtk::Widget>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.add_css_class("card");
    root.set_margin_top(12);
    root.set_margin_bottom(12);
    root.set_margin_start(12);
    root.set_margin_end(12);
    root.set_hexpand(true);
    root.set_vexpand(true);

    let heading = gtk::Label::new(Some(title));
    heading.add_css_class("title-2");
    heading.set_halign(gtk::Align::Start);
    heading.set_margin_top(12);
    heading.set_margin_start(12);
    root.append(&heading);
    root.append(child);
    root
}

enum Editor {
    Line(gtk::Entry),
    Multi(gtk::TextView),
}

/// Labelled text input with an error line underneath.
pub struct FieldInput {
    root: gtk::Box,
    editor: Editor,
    error: gtk::Label,
}

impl FieldInput {
    pub fn line(label: &str, placeholder: &str, required: bool) -> Self {
        let entry = gtk::Entry::new();
        entry.set_placeholder_text(Some(placeholder));
        entry.set_hexpand(true);
        Self::build(label, required, Editor::Line(entry))
    }

    pub fn multi_line(label: &str) -> Self {
        let view = gtk::TextView::new();
        view.set_wrap_mode(gtk::WrapMode::WordChar);
        view.set_height_request(96);
        view.add_css_class("card");
        Self::build(label, false, Editor::Multi(view))
    }

    fn build(label: &str, required: bool, editor: Editor) -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 4);
        let text = if required { format!("{label} *") } else { label.to_string() };
        let title = gtk::Label::new(Some(&text));
        title.set_halign(gtk::Align::Start);
        title.add_css_class("heading");
        root.append(&title);
        match &editor {
            Editor::Line(entry) => root.append(entry),
            Editor::Multi(view) => root.append(view),
        }
        let error = gtk::Label::new(None);
        error.set_halign(gtk::Align::Start);
        error.add_css_class("error");
        error.add_css_class("caption");
        error.set_visible(false);
        root.append(&error);
        Self { root, editor, error }
    }

    pub fn widget(&self) -> &gtk::Box {
        &self.root
    }

    pub fn text(&self) -> String {
        match &self.editor {
            Editor::Line(entry) => entry.text().to_string(),
            Editor::Multi(view) => {
                let buffer = view.buffer();
                buffer.text(&buffer.start_iter(), &buffer.end_iter(), false).to_string()
            }
        }
    }

    /// Only touches the widget when the text differs, so the cursor stays put
    /// while the user types.
    pub fn set_text(&self, value: &str) {
        if self.text() == value {
            return;
        }
        match &self.editor {
            Editor::Line(entry) => entry.set_text(value),
            Editor::Multi(view) => view.buffer().set_text(value),
        }
    }

    pub fn set_error(&self, message: Option<&str>) {
        self.error.set_label(message.unwrap_or_default());
        self.error.set_visible(message.is_some());
        let target: gtk::Widget = match &self.editor {
            Editor::Line(entry) => entry.clone().upcast(),
            Editor::Multi(view) => view.clone().upcast(),
        };
        if message.is_some() {
            target.add_css_class("error");
        } else {
            target.remove_css_class("error");
        }
    }

    pub fn connect_changed<F: Fn(String) + 'static>(&self, f: F) {
        match &self.editor {
            Editor::Line(entry) => {
                entry.connect_changed(move |e| f(e.text().to_string()));
            }
            Editor::Multi(view) => {
                view.buffer().connect_changed(move |b| {
                    f(b.text(&b.start_iter(), &b.end_iter(), false).to_string())
                });
            }
        }
    }

    pub fn connect_blur<F: Fn() + 'static>(&self, f: F) {
        let focus = gtk::EventControllerFocus::new();
        focus.connect_leave(move |_| f());
        match &self.editor {
            Editor::Line(entry) => entry.add_controller(focus),
            Editor::Multi(view) => view.add_controller(focus),
        }
    }

    pub fn connect_activate<F: Fn() + 'static>(&self, f: F) {
        if let Editor::Line(entry) = &self.editor {
            entry.connect_activate(move |_| f());
        }
    }
}

/// Dismissible inline alert.
pub struct Banner {
    root: gtk::Box,
    label: gtk::Label,
    shown: std::cell::Cell<Option<Severity>>,
}

impl Banner {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Horizontal, 8);
        root.add_css_class("card");
        let label = gtk::Label::new(None);
        label.set_hexpand(true);
        label.set_halign(gtk::Align::Start);
        label.set_wrap(true);
        label.set_margin_top(8);
        label.set_margin_bottom(8);
        label.set_margin_start(8);
        root.append(&label);
        root.set_visible(false);
        Self {
            root,
            label,
            shown: std::cell::Cell::new(None),
        }
    }

    pub fn widget(&self) -> &gtk::Box {
        &self.root
    }

    pub fn with_close<F: Fn() + 'static>(self, on_close: F) -> Self {
        let close = gtk::Button::from_icon_name("window-close-symbolic");
        close.add_css_class("flat");
        close.set_tooltip_text(Some("Close"));
        close.connect_clicked(move |_| on_close());
        self.root.append(&close);
        self
    }

    pub fn set(&self, notice: Option<&Notice>) {
        if let Some(prev) = self.shown.take() {
            self.label.remove_css_class(severity_css(prev));
        }
        match notice {
            Some(notice) => {
                self.label.set_label(&notice.message);
                self.label.add_css_class(severity_css(notice.severity));
                self.shown.set(Some(notice.severity));
                self.root.set_visible(true);
            }
            None => self.root.set_visible(false),
        }
    }
}
