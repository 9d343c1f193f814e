//! Mirrors chain events into the Slint pane models.

use std::rc::Rc;

use slint::{Model, ModelRc, StandardListViewItem, VecModel};

use crate::linked_list::LinkedQueryList;
use crate::protocol::{ChainEvent, ChainObserver, StageId};
use crate::PaneData;

/// Owns one `PaneData` row per chain stage. Cloning shares the same model.
#[derive(Clone)]
pub struct UiManager {
    panes: Rc<VecModel<PaneData>>,
}

impl UiManager {
    pub fn new(stages: &[LinkedQueryList]) -> Self {
        let panes: Vec<PaneData> = stages
            .iter()
            .map(|stage| PaneData {
                title: stage.title().into(),
                hint: stage.empty_hint().into(),
                items: empty_items(),
                current: -1,
            })
            .collect();
        Self {
            panes: Rc::new(VecModel::from(panes)),
        }
    }

    pub fn panes_model(&self) -> ModelRc<PaneData> {
        ModelRc::from(self.panes.clone())
    }

    fn update_pane(&self, stage: StageId, items: ModelRc<StandardListViewItem>) {
        let Some(mut pane) = self.panes.row_data(stage) else {
            log::warn!("Chain event for stage {} has no pane", stage);
            return;
        };
        pane.items = items;
        pane.current = -1;
        self.panes.set_row_data(stage, pane);
    }
}

fn empty_items() -> ModelRc<StandardListViewItem> {
    ModelRc::from(Rc::new(VecModel::<StandardListViewItem>::default()))
}

impl ChainObserver for UiManager {
    fn on_chain_event(&mut self, event: &ChainEvent) {
        match event {
            ChainEvent::Cleared { stage } => self.update_pane(*stage, empty_items()),
            ChainEvent::Populated { stage, labels } => {
                let items: Vec<StandardListViewItem> = labels
                    .iter()
                    .map(|label| StandardListViewItem::from(label.as_str()))
                    .collect();
                self.update_pane(*stage, ModelRc::from(Rc::new(VecModel::from(items))));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use slint::Model;

    use super::UiManager;
    use crate::config::default_stages;
    use crate::linked_list::LinkedQueryList;
    use crate::protocol::{ChainEvent, ChainObserver};

    fn music_panes() -> UiManager {
        let stages: Vec<LinkedQueryList> = default_stages()
            .iter()
            .map(|stage| LinkedQueryList::from_config(stage).expect("valid stage"))
            .collect();
        UiManager::new(&stages)
    }

    fn pane_labels(manager: &UiManager, stage: usize) -> Vec<String> {
        let pane = manager.panes.row_data(stage).expect("pane");
        pane.items.iter().map(|item| item.text.to_string()).collect()
    }

    #[test]
    fn test_panes_start_empty_with_titles_and_hints() {
        let manager = music_panes();

        assert_eq!(manager.panes.row_count(), 3);
        let albums = manager.panes.row_data(1).expect("albums pane");
        assert_eq!(albums.title.as_str(), "Albums");
        assert_eq!(albums.hint.as_str(), "Choose an artist");
        assert_eq!(albums.items.row_count(), 0);
        assert_eq!(albums.current, -1);
    }

    #[test]
    fn test_populated_then_cleared_updates_items() {
        let mut manager = music_panes();

        manager.on_chain_event(&ChainEvent::Populated {
            stage: 0,
            labels: vec!["Bowie".to_string(), "Queen".to_string()],
        });
        assert_eq!(pane_labels(&manager, 0), vec!["Bowie", "Queen"]);

        manager.on_chain_event(&ChainEvent::Cleared { stage: 0 });
        assert!(pane_labels(&manager, 0).is_empty());
        assert_eq!(manager.panes.row_data(0).expect("pane").current, -1);
    }

    #[test]
    fn test_clones_share_the_same_panes() {
        let manager = music_panes();
        let mut observer = manager.clone();

        observer.on_chain_event(&ChainEvent::Populated {
            stage: 2,
            labels: vec!["Speed of Life".to_string()],
        });
        assert_eq!(pane_labels(&manager, 2), vec!["Speed of Life"]);
    }

    #[test]
    fn test_event_for_unknown_stage_is_ignored() {
        let mut manager = music_panes();
        manager.on_chain_event(&ChainEvent::Cleared { stage: 9 });
        assert_eq!(manager.panes.row_count(), 3);
    }
}
