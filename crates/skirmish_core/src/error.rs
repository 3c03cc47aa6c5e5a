//! Error types for the game simulation.

use thiserror::Error;

use crate::entity::EntityId;
use crate::player::PlayerId;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all game simulation errors.
///
/// Speculative commands (out-of-range attacks, gathering from a node that is
/// already gone) are not errors; they resolve to "no effect" outcomes. These
/// variants cover caller mistakes and invariant violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    /// The entity is not in the registry (never spawned, or already destroyed).
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// Invalid player reference.
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// The entity has no health and cannot take damage.
    #[error("Entity {0} is not a combatant")]
    NotCombatant(EntityId),

    /// The entity lacks the capability the command needs.
    #[error("Entity {entity} cannot {capability}")]
    MissingCapability {
        /// Entity the command was issued to.
        entity: EntityId,
        /// Capability that was required.
        capability: &'static str,
    },

    /// Zero damage or extraction amount.
    #[error("Invalid amount for {operation}: {amount}")]
    InvalidAmount {
        /// Operation that rejected the amount.
        operation: &'static str,
        /// The rejected amount.
        amount: u32,
    },

    /// Rules failed validation.
    #[error("Invalid rules: {0}")]
    InvalidRules(String),

    /// Rules text could not be parsed.
    #[error("Failed to parse rules: {0}")]
    RulesParse(String),
}
