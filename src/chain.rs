//! Composition root for linked query lists.
//!
//! The chain owns every stage and the database connection. Stages refer to
//! their downstream neighbour by index only, so all cross-stage mutation
//! (clearing the tail, requerying the next stage) happens here.

use log::{debug, warn};

use crate::config::StageConfig;
use crate::db_manager::DbManager;
use crate::error::{BrowserError, BrowserResult};
use crate::linked_list::LinkedQueryList;
use crate::protocol::{
    ChainEvent, ChainObserver, NotPropagatedReason, RowId, SelectionOutcome, StageId,
};
use crate::query::Identifier;

pub struct ListChain {
    db: DbManager,
    stages: Vec<LinkedQueryList>,
}

impl ListChain {
    pub fn new(db: DbManager) -> Self {
        Self {
            db,
            stages: Vec::new(),
        }
    }

    /// Builds stages in config order and links each one to the next through
    /// the next stage's `link_column`.
    pub fn from_config(db: DbManager, stages: &[StageConfig]) -> BrowserResult<Self> {
        let mut chain = Self::new(db);
        for stage in stages {
            chain.add_stage(LinkedQueryList::from_config(stage)?);
        }
        for (index, stage) in stages.iter().enumerate().skip(1) {
            let link_column = stage
                .link_column
                .as_deref()
                .ok_or(BrowserError::MissingLinkColumn(index))?;
            chain.link(index - 1, index, link_column)?;
        }
        Ok(chain)
    }

    pub fn add_stage(&mut self, list: LinkedQueryList) -> StageId {
        self.stages.push(list);
        self.stages.len() - 1
    }

    pub fn stages(&self) -> &[LinkedQueryList] {
        &self.stages
    }

    #[cfg(test)]
    pub fn labels(&self, stage: StageId) -> Vec<String> {
        self.stages
            .get(stage)
            .map(LinkedQueryList::labels)
            .unwrap_or_default()
    }

    fn upstream_of(&self, stage: StageId) -> Option<StageId> {
        self.stages
            .iter()
            .position(|list| list.downstream() == Some(stage))
    }

    fn check_stage(&self, stage: StageId) -> BrowserResult<()> {
        if stage < self.stages.len() {
            Ok(())
        } else {
            Err(BrowserError::UnknownStage(stage))
        }
    }

    /// Makes `upstream` feed `downstream`, filtering it on `link_column`.
    ///
    /// Each stage has at most one upstream and one downstream, and links may
    /// not form a cycle.
    pub fn link(
        &mut self,
        upstream: StageId,
        downstream: StageId,
        link_column: &str,
    ) -> BrowserResult<()> {
        self.check_stage(upstream)?;
        self.check_stage(downstream)?;
        let invalid = |reason| BrowserError::InvalidLink {
            upstream,
            downstream,
            reason,
        };
        if upstream == downstream {
            return Err(invalid("a stage cannot feed itself"));
        }
        if self.stages[upstream].downstream().is_some() {
            return Err(invalid("upstream already feeds another stage"));
        }
        if self.upstream_of(downstream).is_some() {
            return Err(invalid("downstream already has an upstream"));
        }
        let mut cursor = Some(downstream);
        while let Some(stage) = cursor {
            if stage == upstream {
                return Err(invalid("link would form a cycle"));
            }
            cursor = self.stages[stage].downstream();
        }

        let link_column = Identifier::parse(link_column)?;
        self.stages[upstream].set_downstream(downstream);
        self.stages[downstream].set_link_column(link_column);
        Ok(())
    }

    /// Populates every root stage. Query errors here mean the schema does not
    /// match the configuration and are returned to the caller.
    pub fn start(&mut self, observer: &mut dyn ChainObserver) -> BrowserResult<()> {
        let roots: Vec<StageId> = (0..self.stages.len())
            .filter(|stage| self.upstream_of(*stage).is_none())
            .collect();
        for root in roots {
            self.requery(root, None, observer)?;
        }
        Ok(())
    }

    pub fn clear(&mut self, stage: StageId, observer: &mut dyn ChainObserver) -> BrowserResult<()> {
        self.check_stage(stage)?;
        self.stages[stage].clear();
        observer.on_chain_event(&ChainEvent::Cleared { stage });
        Ok(())
    }

    /// Requeries one stage, then clears (without requerying) its downstream.
    pub fn requery(
        &mut self,
        stage: StageId,
        filter: Option<RowId>,
        observer: &mut dyn ChainObserver,
    ) -> BrowserResult<()> {
        self.check_stage(stage)?;
        let list = &mut self.stages[stage];
        if let Err(err) = list.requery(self.db.connection(), filter) {
            observer.on_chain_event(&ChainEvent::Cleared { stage });
            return Err(err);
        }
        observer.on_chain_event(&ChainEvent::Populated {
            stage,
            labels: list.labels(),
        });

        if let Some(downstream) = list.downstream() {
            self.clear(downstream, observer)?;
        }
        Ok(())
    }

    fn clear_from(&mut self, first: StageId, observer: &mut dyn ChainObserver) {
        let mut cursor = Some(first);
        while let Some(stage) = cursor {
            self.stages[stage].clear();
            observer.on_chain_event(&ChainEvent::Cleared { stage });
            cursor = self.stages[stage].downstream();
        }
    }

    /// Handles a "selection changed" event from the UI.
    ///
    /// Every stage below `stage` is cleared before anything is resolved, so a
    /// selection that cannot be propagated still leaves no stale rows. Only an
    /// unknown `stage` is an error; everything else is reported as an outcome.
    pub fn select(
        &mut self,
        stage: StageId,
        index: i32,
        observer: &mut dyn ChainObserver,
    ) -> BrowserResult<SelectionOutcome> {
        self.check_stage(stage)?;
        let Some(downstream) = self.stages[stage].downstream() else {
            return Ok(SelectionOutcome::NoDownstream);
        };
        self.clear_from(downstream, observer);

        let resolved = usize::try_from(index)
            .map_err(|_| NotPropagatedReason::NoSelection)
            .and_then(|index| self.stages[stage].resolve_selection(self.db.connection(), index));
        let filter = match resolved {
            Ok(filter) => filter,
            Err(reason) => {
                debug!(
                    "Selection {} on stage {} not propagated: {:?}",
                    index, stage, reason
                );
                return Ok(SelectionOutcome::NotPropagated(reason));
            }
        };

        if let Err(err) = self.requery(downstream, Some(filter), observer) {
            warn!(
                "Requery of stage {} for selection {} on stage {} failed: {}",
                downstream, index, stage, err
            );
            return Ok(SelectionOutcome::NotPropagated(
                NotPropagatedReason::QueryFailed,
            ));
        }
        Ok(SelectionOutcome::Propagated { downstream, filter })
    }

    /// Hands the connection back for an orderly close at shutdown.
    pub fn into_db(self) -> DbManager {
        self.db
    }
}
