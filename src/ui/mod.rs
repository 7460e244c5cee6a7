pub mod contact_form;
pub mod contact_list;
pub mod main_window;
pub mod widgets;

use crate::api::client::ApiClient;
use crate::app::Action;
use std::rc::Rc;

/// Feeds an [`Action`] back into the window's state.
pub type Dispatch = Rc<dyn Fn(Action)>;

pub fn build_ui(app: &adw::Application, client: ApiClient) {
    let window = main_window::Window::new(app, client);
    window.present();
}
