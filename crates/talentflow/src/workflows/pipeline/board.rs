//! Client-side half of the status transition workflow.
//!
//! The board is modelled as an explicit reducer over an immutable state
//! snapshot so the optimistic move and its rollback can be tested without a
//! rendering layer. A drag gesture becomes a [`MoveCommand`] that applies
//! speculatively, then either confirms or rolls back once the status update
//! resolves.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::domain::{ApplicationCard, ApplicationId, ApplicationStatus};
use super::notices::{Notice, NoticeLevel, NoticePublisher};
use super::service::PipelineView;

/// Mapping from each of the five statuses to an ordered list of cards.
/// Every status is always present, even when its column is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap {
    columns: BTreeMap<ApplicationStatus, Vec<ApplicationCard>>,
}

impl ColumnMap {
    pub fn empty() -> Self {
        let mut columns = BTreeMap::new();
        for status in ApplicationStatus::ordered() {
            columns.insert(status, Vec::new());
        }
        Self { columns }
    }

    /// Rebuild the map from a server response.
    pub fn from_view(view: &PipelineView) -> Self {
        let mut map = Self::empty();
        for column in &view.columns {
            map.columns
                .insert(column.status, column.applications.clone());
        }
        map
    }

    pub fn column(&self, status: ApplicationStatus) -> &[ApplicationCard] {
        self.columns
            .get(&status)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn count(&self, status: ApplicationStatus) -> usize {
        self.column(status).len()
    }

    pub fn total(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// Locate a card anywhere on the board.
    pub fn position(&self, id: &ApplicationId) -> Option<(ApplicationStatus, usize)> {
        for (status, cards) in &self.columns {
            if let Some(index) = cards.iter().position(|card| &card.id == id) {
                return Some((*status, index));
            }
        }
        None
    }

    fn take_card(
        &mut self,
        status: ApplicationStatus,
        id: &ApplicationId,
    ) -> Option<ApplicationCard> {
        let cards = self.columns.get_mut(&status)?;
        let index = cards.iter().position(|card| &card.id == id)?;
        Some(cards.remove(index))
    }

    fn prepend(&mut self, status: ApplicationStatus, card: ApplicationCard) {
        if let Some(cards) = self.columns.get_mut(&status) {
            cards.insert(0, card);
        }
    }
}

/// Value object capturing one optimistic move: the pre-move snapshot plus the
/// gesture itself. Applying is speculative; a failed request restores the
/// captured snapshot exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveCommand {
    pub application_id: ApplicationId,
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
    before: ColumnMap,
}

impl MoveCommand {
    pub fn capture(
        columns: &ColumnMap,
        application_id: ApplicationId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Self {
        Self {
            application_id,
            from,
            to,
            before: columns.clone(),
        }
    }

    /// Remove the card from the source column and prepend it to the
    /// destination, updating the card's own status to match.
    pub fn apply(&self, columns: &mut ColumnMap) {
        if let Some(mut card) = columns.take_card(self.from, &self.application_id) {
            card.status = self.to;
            columns.prepend(self.to, card);
        }
    }

    /// Restore the column mapping captured before the move.
    pub fn rollback(&self) -> ColumnMap {
        self.before.clone()
    }

    /// Commit the speculative state and discard the snapshot.
    pub fn confirm(self) {}
}

/// Actions consumed by the board reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardAction {
    MoveStart {
        application_id: ApplicationId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    MoveSuccess {
        application_id: ApplicationId,
    },
    MoveFailure {
        application_id: ApplicationId,
        message: String,
        failed_at: DateTime<Utc>,
    },
}

/// Reasons a move gesture is rejected before any mutation or network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejected {
    #[error("card is already in its destination column")]
    NoOp,
    #[error("a move for this application is still pending")]
    AlreadyInFlight,
    #[error("card not present in the source column")]
    CardMissing,
    #[error("board is read only for this member")]
    ReadOnly,
}

/// Immutable board snapshot: columns, pending optimistic moves, and
/// transient notices.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    pub columns: ColumnMap,
    pending: BTreeMap<ApplicationId, MoveCommand>,
    pub notices: Vec<Notice>,
    notice_duration: Duration,
}

impl BoardState {
    pub fn empty(notice_duration: Duration) -> Self {
        Self {
            columns: ColumnMap::empty(),
            pending: BTreeMap::new(),
            notices: Vec::new(),
            notice_duration,
        }
    }

    pub fn from_view(view: &PipelineView, notice_duration: Duration) -> Self {
        Self {
            columns: ColumnMap::from_view(view),
            pending: BTreeMap::new(),
            notices: Vec::new(),
            notice_duration,
        }
    }

    pub fn notice_duration(&self) -> Duration {
        self.notice_duration
    }

    /// Whether a status update for this application is still unresolved.
    pub fn in_flight(&self, id: &ApplicationId) -> bool {
        self.pending.contains_key(id)
    }

    pub fn pending_moves(&self) -> usize {
        self.pending.len()
    }

    /// Gate applied before dispatching `MoveStart`. A no-op gesture, a card
    /// with an unresolved move, or a stale source column all reject here,
    /// leaving the state untouched and issuing no network call.
    pub fn validate_move(
        &self,
        id: &ApplicationId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<(), MoveRejected> {
        if from == to {
            return Err(MoveRejected::NoOp);
        }
        if self.in_flight(id) {
            return Err(MoveRejected::AlreadyInFlight);
        }
        if !self.columns.column(from).iter().any(|card| &card.id == id) {
            return Err(MoveRejected::CardMissing);
        }
        Ok(())
    }

    /// Reducer: consume an action and produce the next state. Total over all
    /// actions; an action that does not apply returns the state unchanged.
    pub fn apply(&self, action: BoardAction) -> BoardState {
        let mut next = self.clone();
        match action {
            BoardAction::MoveStart {
                application_id,
                from,
                to,
            } => {
                if next.validate_move(&application_id, from, to).is_err() {
                    return next;
                }
                let command =
                    MoveCommand::capture(&next.columns, application_id.clone(), from, to);
                command.apply(&mut next.columns);
                next.pending.insert(application_id, command);
            }
            BoardAction::MoveSuccess { application_id } => {
                if let Some(command) = next.pending.remove(&application_id) {
                    command.confirm();
                }
            }
            BoardAction::MoveFailure {
                application_id,
                message,
                failed_at,
            } => {
                if let Some(command) = next.pending.remove(&application_id) {
                    next.columns = command.rollback();
                    next.notices.push(Notice {
                        level: NoticeLevel::Error,
                        message,
                        expires_at: failed_at + next.notice_duration,
                    });
                }
            }
        }
        next
    }

    /// Drop notices whose display window has elapsed.
    pub fn prune_notices(&mut self, now: DateTime<Utc>) {
        self.notices.retain(|notice| notice.expires_at > now);
    }
}

/// Transport for the single-field status update behind a move.
#[async_trait]
pub trait StatusGateway: Send + Sync {
    async fn update_status(
        &self,
        application_id: &ApplicationId,
        to: ApplicationStatus,
    ) -> Result<(), GatewayError>;
}

/// Failure of the status update request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("status update rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
}

/// Terminal outcome of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResolution {
    Committed,
    RolledBack,
}

/// Drives a move end to end: validate, apply optimistically, resolve against
/// the gateway, then confirm or roll back. One request per application may be
/// in flight at a time; distinct applications may overlap.
pub struct BoardController<G, N> {
    state: BoardState,
    gateway: Arc<G>,
    notices: Arc<N>,
    editable: bool,
}

impl<G, N> BoardController<G, N>
where
    G: StatusGateway + 'static,
    N: NoticePublisher + 'static,
{
    pub fn new(state: BoardState, gateway: Arc<G>, notices: Arc<N>, editable: bool) -> Self {
        Self {
            state,
            gateway,
            notices,
            editable,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Accept or reject the gesture and, on acceptance, apply the optimistic
    /// mutation before any request goes out.
    pub fn begin_move(
        &mut self,
        application_id: ApplicationId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<(), MoveRejected> {
        if !self.editable {
            return Err(MoveRejected::ReadOnly);
        }
        self.state.validate_move(&application_id, from, to)?;
        debug!(
            application = %application_id.0,
            from = from.as_str(),
            to = to.as_str(),
            "optimistic move applied"
        );
        self.state = self.state.apply(BoardAction::MoveStart {
            application_id,
            from,
            to,
        });
        Ok(())
    }

    /// Resolve a pending move with the gateway outcome. Success keeps the
    /// speculative state; failure restores the pre-move snapshot and emits
    /// exactly one transient error notice.
    pub fn complete_move(
        &mut self,
        application_id: &ApplicationId,
        outcome: Result<(), GatewayError>,
        now: DateTime<Utc>,
    ) -> MoveResolution {
        match outcome {
            Ok(()) => {
                self.state = self.state.apply(BoardAction::MoveSuccess {
                    application_id: application_id.clone(),
                });
                MoveResolution::Committed
            }
            Err(error) => {
                let message = format!("could not move application: {error}");
                warn!(application = %application_id.0, %error, "move rolled back");
                self.state = self.state.apply(BoardAction::MoveFailure {
                    application_id: application_id.clone(),
                    message: message.clone(),
                    failed_at: now,
                });
                // Fire-and-forget toast; a dead transport must not break the board.
                let _ = self.notices.publish(Notice {
                    level: NoticeLevel::Error,
                    message,
                    expires_at: now + self.state.notice_duration(),
                });
                MoveResolution::RolledBack
            }
        }
    }

    /// Full drag-end gesture: speculative apply, one request, then commit or
    /// rollback. No automatic retry; the user re-drags to try again.
    pub async fn move_application(
        &mut self,
        application_id: ApplicationId,
        from: ApplicationStatus,
        to: ApplicationStatus,
    ) -> Result<MoveResolution, MoveRejected> {
        self.begin_move(application_id.clone(), from, to)?;
        let outcome = self.gateway.update_status(&application_id, to).await;
        Ok(self.complete_move(&application_id, outcome, Utc::now()))
    }
}
