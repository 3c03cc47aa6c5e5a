//! Production queues for unit-producing buildings.
//!
//! A queue is a FIFO of unit requests plus one progress counter. Only the
//! head request advances; when its progress reaches the production interval
//! the head is popped and handed back to the world, which spawns the unit.
//!
//! All calculations use integer tick counts for deterministic simulation.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Unit types a building can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    /// Attacking infantry.
    Soldier,
    /// Resource gatherer.
    Miner,
}

impl UnitType {
    /// Lowercase name used in logs and snapshots.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Soldier => "soldier",
            Self::Miner => "miner",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Observable state of a production queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductionState {
    /// Nothing queued.
    Idle,
    /// The head request is advancing.
    Producing {
        /// Type at the head of the queue.
        unit_type: UnitType,
        /// Ticks accumulated toward the head request.
        progress: u32,
    },
}

/// Production queue component for buildings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductionQueue {
    queue: VecDeque<UnitType>,
    interval: u32,
    progress: u32,
}

impl ProductionQueue {
    /// Create an idle queue that produces one unit every `interval` ticks.
    ///
    /// `interval` must be at least one; [`GameRules::validate`] rejects
    /// rule sets that would break this.
    ///
    /// [`GameRules::validate`]: crate::rules::GameRules::validate
    #[must_use]
    pub fn new(interval: u32) -> Self {
        debug_assert!(interval > 0, "production interval must be positive");
        Self {
            queue: VecDeque::new(),
            interval,
            progress: 0,
        }
    }

    /// Append a request. Valid whether idle or producing.
    pub fn enqueue(&mut self, unit_type: UnitType) {
        self.queue.push_back(unit_type);
    }

    /// Check if the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of pending requests, including the one in progress.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Ticks accumulated toward the head request.
    #[must_use]
    pub const fn progress(&self) -> u32 {
        self.progress
    }

    /// Ticks needed per unit.
    #[must_use]
    pub const fn interval(&self) -> u32 {
        self.interval
    }

    /// Pending requests in the order they will be served.
    pub fn pending(&self) -> impl Iterator<Item = UnitType> + '_ {
        self.queue.iter().copied()
    }

    /// Current state of the queue.
    #[must_use]
    pub fn state(&self) -> ProductionState {
        match self.queue.front() {
            Some(&unit_type) => ProductionState::Producing {
                unit_type,
                progress: self.progress,
            },
            None => ProductionState::Idle,
        }
    }

    /// Advance the head request by one tick.
    ///
    /// Returns the finished unit type when the interval completes. Progress
    /// is back at zero by the time this returns. An idle queue does nothing.
    pub fn tick(&mut self) -> Option<UnitType> {
        if self.queue.is_empty() {
            return None;
        }

        self.progress += 1;
        if self.progress < self.interval {
            return None;
        }

        self.progress = 0;
        self.queue.pop_front()
    }
}

/// A unit finished production this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductionComplete {
    /// Building that produced the unit.
    pub building: EntityId,
    /// Type that was produced.
    pub unit_type: UnitType,
    /// The newly spawned unit.
    pub unit: EntityId,
}
