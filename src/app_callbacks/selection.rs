use log::{debug, warn};

use crate::{app_context::AppSharedState, AppWindow};

/// Routes list selection changes into the chain.
pub(crate) fn register_selection_callbacks(ui: &AppWindow, shared_state: &AppSharedState) {
    let chain = shared_state.chain.clone();
    let ui_manager = shared_state.ui_manager.clone();
    let ui_handle_clone = shared_state.ui_handle.clone();
    ui.on_selection_changed(move |stage, index| {
        let Ok(stage) = usize::try_from(stage) else {
            warn!("Selection changed on invalid stage {}", stage);
            return;
        };
        // Pane model updates can bounce a current-item change back while the chain is busy.
        let Ok(mut chain) = chain.try_borrow_mut() else {
            debug!(
                "Selection {} on stage {} ignored: chain busy",
                index, stage
            );
            return;
        };
        debug!("Selection changed: stage={} index={}", stage, index);
        let mut observer = ui_manager.clone();
        match chain.select(stage, index, &mut observer) {
            Ok(outcome) => {
                debug!("Selection outcome on stage {}: {:?}", stage, outcome);
                if let Some(ui) = ui_handle_clone.upgrade() {
                    ui.set_status_text(crate::status_line(&chain).into());
                }
            }
            Err(err) => warn!("Selection on stage {} failed: {}", stage, err),
        }
    });
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use i_slint_backend_testing::ElementHandle;
    use slint::{ComponentHandle, LogicalSize, Model};

    use super::register_selection_callbacks;
    use crate::{
        app_context::AppSharedState, chain::ListChain, config::default_stages,
        test_fixtures::music_db, ui_manager::UiManager, AppWindow,
    };

    const ALBUMS: usize = 1;
    const SONGS: usize = 2;

    fn browser_window() -> (AppWindow, AppSharedState) {
        i_slint_backend_testing::init_no_event_loop();
        let chain = ListChain::from_config(music_db(), &default_stages()).expect("chain");
        let ui = AppWindow::new().expect("window");
        ui.window().set_size(LogicalSize::new(1024.0, 768.0));
        let ui_manager = UiManager::new(chain.stages());
        ui.set_panes(ui_manager.panes_model());

        let shared_state = AppSharedState {
            ui_handle: ui.as_weak(),
            chain: Rc::new(RefCell::new(chain)),
            ui_manager,
        };
        shared_state
            .chain
            .borrow_mut()
            .start(&mut shared_state.ui_manager.clone())
            .expect("start");
        register_selection_callbacks(&ui, &shared_state);
        ui.show().expect("show window");
        (ui, shared_state)
    }

    fn click(ui: &AppWindow, label: &str) {
        let matches: Vec<ElementHandle> =
            ElementHandle::find_by_accessible_label(ui, label).collect();
        assert!(!matches.is_empty(), "no list item labelled {label:?}");
        // The item's inner text shares its label; its default action is a no-op.
        for element in matches {
            element.invoke_accessible_default_action();
        }
    }

    fn pane_labels(ui: &AppWindow, stage: usize) -> Vec<String> {
        let pane = ui.get_panes().row_data(stage).expect("pane");
        pane.items.iter().map(|item| item.text.to_string()).collect()
    }

    fn pane_current(ui: &AppWindow, stage: usize) -> i32 {
        ui.get_panes().row_data(stage).expect("pane").current
    }

    // One test per thread: the headless platform can only be installed once.
    #[test]
    fn test_reselecting_first_row_of_repopulated_pane_propagates() {
        let (ui, _shared_state) = browser_window();

        click(&ui, "Bowie");
        assert_eq!(pane_labels(&ui, ALBUMS), vec!["Low"]);

        click(&ui, "Low");
        assert_eq!(pane_current(&ui, ALBUMS), 0);
        assert_eq!(
            pane_labels(&ui, SONGS),
            vec!["Speed of Life", "Breaking Glass"]
        );

        click(&ui, "Queen");
        assert_eq!(pane_labels(&ui, ALBUMS), vec!["A Night at the Opera"]);
        assert_eq!(pane_current(&ui, ALBUMS), -1);
        assert!(pane_labels(&ui, SONGS).is_empty());

        click(&ui, "A Night at the Opera");
        assert_eq!(pane_current(&ui, ALBUMS), 0);
        assert_eq!(pane_labels(&ui, SONGS), vec!["Bohemian Rhapsody"]);
    }
}
