//! Project/chat lifecycle transition rules.
//!
//! The database is the source of truth for state; these functions are the
//! pure guards the repositories and handlers consult before mutating it.
//! Keeping them here makes the state machine unit-testable without a pool.

use crate::error::CoreError;
use crate::status::ProjectStatus;
use crate::types::DbId;

/// The lifecycle-relevant slice of a project row.
#[derive(Debug, Clone, Copy)]
pub struct ProjectState {
    pub status: ProjectStatus,
    pub owner_id: DbId,
    pub selected_freelancer_id: Option<DbId>,
    pub confirmed: bool,
}

/// Which party of a chat is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseRole {
    Client,
    Freelancer,
}

/// The pair of ready-to-close flags on a chat.
///
/// A flag can only move false -> true through [`CloseFlags::with`]; the
/// only way out of the handshake is the withdraw-confirmation flow, which
/// closes the chat outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CloseFlags {
    pub client: bool,
    pub freelancer: bool,
}

impl CloseFlags {
    /// Return the flags with the given party's flag set. Idempotent.
    pub fn with(self, role: CloseRole) -> Self {
        match role {
            CloseRole::Client => Self {
                client: true,
                ..self
            },
            CloseRole::Freelancer => Self {
                freelancer: true,
                ..self
            },
        }
    }

    /// Both parties have signalled completion: the chat closes and the
    /// project is marked Completed.
    pub fn both_set(self) -> bool {
        self.client && self.freelancer
    }
}

/// A freelancer may apply only to an Open project they do not own.
pub fn check_apply(state: ProjectState, applicant_id: DbId) -> Result<(), CoreError> {
    if applicant_id == state.owner_id {
        return Err(CoreError::Forbidden(
            "Cannot apply to your own project".into(),
        ));
    }
    if state.status != ProjectStatus::Open {
        return Err(CoreError::Conflict(
            "Project is not open for applications".into(),
        ));
    }
    Ok(())
}

/// The owner may accept (or re-accept) an applicant while the assignment
/// is unconfirmed. Re-acceptance overwrites the previous selection.
pub fn check_accept(state: ProjectState, caller_id: DbId) -> Result<(), CoreError> {
    if caller_id != state.owner_id {
        return Err(CoreError::Forbidden(
            "Only the project owner can accept an applicant".into(),
        ));
    }
    if state.confirmed {
        return Err(CoreError::Conflict(
            "Assignment is already confirmed".into(),
        ));
    }
    if !matches!(
        state.status,
        ProjectStatus::Open | ProjectStatus::Pending | ProjectStatus::InProgress
    ) {
        return Err(CoreError::Conflict(
            "Project can no longer accept applicants".into(),
        ));
    }
    Ok(())
}

/// Only the selected freelancer may confirm, exactly once.
pub fn check_confirm(state: ProjectState, caller_id: DbId) -> Result<(), CoreError> {
    match state.selected_freelancer_id {
        Some(id) if id == caller_id => {}
        Some(_) => {
            return Err(CoreError::Forbidden(
                "Only the selected freelancer can confirm".into(),
            ))
        }
        None => {
            return Err(CoreError::Conflict(
                "No freelancer has been accepted yet".into(),
            ))
        }
    }
    if state.confirmed {
        return Err(CoreError::Conflict("Project is already confirmed".into()));
    }
    Ok(())
}

/// Only the selected freelancer may withdraw a confirmed assignment.
/// The project resets to Open rather than being deleted. Completed is
/// terminal: a finished project cannot be reopened this way.
pub fn check_withdraw_confirmation(state: ProjectState, caller_id: DbId) -> Result<(), CoreError> {
    if state.selected_freelancer_id != Some(caller_id) {
        return Err(CoreError::Forbidden(
            "Only the selected freelancer can withdraw the confirmation".into(),
        ));
    }
    if !state.confirmed {
        return Err(CoreError::Conflict("Project is not confirmed".into()));
    }
    if state.status == ProjectStatus::Completed {
        return Err(CoreError::Conflict(
            "A completed project cannot be reopened".into(),
        ));
    }
    Ok(())
}

/// The owner may delete a project only while the assignment is unconfirmed.
pub fn check_delete(state: ProjectState, caller_id: DbId) -> Result<(), CoreError> {
    if caller_id != state.owner_id {
        return Err(CoreError::Forbidden(
            "Only the project owner can delete it".into(),
        ));
    }
    if state.confirmed {
        return Err(CoreError::Conflict(
            "A confirmed project cannot be deleted".into(),
        ));
    }
    Ok(())
}
