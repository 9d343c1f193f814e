use std::{cell::RefCell, rc::Rc};

use crate::{chain::ListChain, ui_manager::UiManager, AppWindow};

#[derive(Clone)]
pub(crate) struct AppSharedState {
    pub(crate) ui_handle: slint::Weak<AppWindow>,
    pub(crate) chain: Rc<RefCell<ListChain>>,
    pub(crate) ui_manager: UiManager,
}
