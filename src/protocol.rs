//! Events and outcomes exchanged between the list chain and its observers.

/// Position of a stage in the chain, upstream first.
pub type StageId = usize;

/// Primary key value of a displayed row, passed downstream as a filter value.
pub type RowId = i64;

/// Visible change to one stage's rows, emitted in the order it happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainEvent {
    Cleared { stage: StageId },
    Populated { stage: StageId, labels: Vec<String> },
}

/// Receives chain events; the UI implements this to mirror rows into its models.
pub trait ChainObserver {
    fn on_chain_event(&mut self, event: &ChainEvent);
}

/// Observer for callers that do not display anything.
impl ChainObserver for () {
    fn on_chain_event(&mut self, _event: &ChainEvent) {}
}

/// Result of handling a selection on one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The stage feeds nothing.
    NoDownstream,
    /// `downstream` was requeried with `filter`.
    Propagated { downstream: StageId, filter: RowId },
    /// Downstream stages were cleared but not requeried.
    NotPropagated(NotPropagatedReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotPropagatedReason {
    /// Negative index, the UI's "nothing selected".
    NoSelection,
    /// Index past the end of the current rows.
    StaleIndex,
    /// Label lookup matched no row.
    NoMatch,
    /// Lookup or downstream query failed.
    QueryFailed,
}
