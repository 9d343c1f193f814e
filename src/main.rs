mod app_callbacks;
mod app_context;
mod chain;
mod config;
mod config_persistence;
mod db_manager;
mod error;
mod linked_list;
mod protocol;
mod query;
#[cfg(test)]
mod test_fixtures;
mod ui;
mod ui_manager;

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use app_context::AppSharedState;
use chain::ListChain;
use db_manager::DbManager;
use linked_list::ListState;
use log::{info, warn};
use slint::{ComponentHandle, LogicalSize};
use ui_manager::UiManager;

slint::include_modules!();

/// Row counts per pane, shown under the lists. Panes that were cleared rather
/// than queried show `-`.
fn status_line(chain: &ListChain) -> String {
    chain
        .stages()
        .iter()
        .map(|stage| match stage.state() {
            ListState::Empty => format!("{}: -", stage.title()),
            ListState::Populated => format!("{}: {}", stage.title(), stage.rows().len()),
        })
        .collect::<Vec<_>>()
        .join("  |  ")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Debug);
    clog.init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));

    if std::env::var_os("SLINT_BACKEND").is_none() {
        std::env::set_var("SLINT_BACKEND", "winit-software");
        info!("SLINT_BACKEND not set. Defaulting to winit-software");
    }

    let config_file = config_persistence::config_file_path();
    if let Err(err) = config_persistence::ensure_config_file(&config_file) {
        warn!("{}", err);
    }
    let config = config_persistence::load_config_file(&config_file);

    let database_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.database.path));
    let db = DbManager::open(&database_path)?;
    let chain = ListChain::from_config(db, &config.stages)?;

    let ui = AppWindow::new()?;
    ui.window().set_size(LogicalSize::new(
        config.ui.window_width as f32,
        config.ui.window_height as f32,
    ));
    ui.set_window_title(config.ui.window_title.clone().into());

    let ui_manager = UiManager::new(chain.stages());
    ui.set_panes(ui_manager.panes_model());

    let shared_state = AppSharedState {
        ui_handle: ui.as_weak(),
        chain: Rc::new(RefCell::new(chain)),
        ui_manager,
    };
    {
        let mut chain = shared_state.chain.borrow_mut();
        chain.start(&mut shared_state.ui_manager.clone())?;
        ui.set_status_text(status_line(&chain).into());
    }
    app_callbacks::selection::register_selection_callbacks(&ui, &shared_state);

    ui.run()?;
    drop(ui);

    let AppSharedState { chain, .. } = shared_state;
    match Rc::try_unwrap(chain) {
        Ok(chain) => chain.into_inner().into_db().close()?,
        Err(_) => warn!("Chain still referenced at shutdown; database closes on drop"),
    }

    info!("Application exiting");
    Ok(())
}
