use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;
use crate::error::{invalid_state_error, Error};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub origin: Coordinates,
    pub destinations: Vec<Coordinates>,
    pub origin_marker_id: Uuid,
    pub generation: u64,
    pub status: Status,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Status {
    Idle,
    Recomputing {
        generation: u64,
        started_at: DateTime<Utc>,
    },
    Failed {
        generation: u64,
        reason: String,
        failed_at: DateTime<Utc>,
    },
}

impl Status {
    pub fn name(&self) -> String {
        match self {
            Self::Idle => "idle".into(),
            Self::Recomputing { .. } => "recomputing".into(),
            Self::Failed { .. } => "failed".into(),
        }
    }
}

/// Inputs captured for one recomputation.
#[derive(Clone, Debug)]
pub struct Recomputation {
    pub generation: u64,
    pub origin: Coordinates,
    pub destinations: Vec<Coordinates>,
}

impl Session {
    pub fn new(origin: Coordinates, origin_marker_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            destinations: Vec::new(),
            origin_marker_id,
            generation: 0,
            status: Status::Idle,
        }
    }

    pub fn add_destination(&mut self, destination: Coordinates) {
        self.destinations.push(destination);
    }

    pub fn move_origin(&mut self, origin: Coordinates) {
        self.origin = origin;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Bumps the generation; any result tagged with an older one is stale.
    #[tracing::instrument(skip(self), fields(session_id = %self.id))]
    pub fn begin_recomputation(&mut self) -> Recomputation {
        self.generation += 1;
        self.status = Status::Recomputing {
            generation: self.generation,
            started_at: Utc::now(),
        };

        Recomputation {
            generation: self.generation,
            origin: self.origin,
            destinations: self.destinations.clone(),
        }
    }

    pub fn complete(&mut self, generation: u64) -> Result<(), Error> {
        match self.status {
            Status::Recomputing { generation: g, .. } if g == generation => {
                self.status = Status::Idle;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    pub fn fail(&mut self, generation: u64, reason: String) -> Result<(), Error> {
        match self.status {
            Status::Recomputing { generation: g, .. } if g == generation => {
                self.status = Status::Failed {
                    generation,
                    reason,
                    failed_at: Utc::now(),
                };
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }
}

#[test]
fn newer_recomputation_supersedes_older() {
    let mut session = Session::new(Coordinates::new(15.645881, 46.55465), Uuid::new_v4());
    session.add_destination(Coordinates::new(15.7, 46.6));

    let first = session.begin_recomputation();
    session.add_destination(Coordinates::new(15.8, 46.5));
    let second = session.begin_recomputation();

    assert!(!session.is_current(first.generation));
    assert!(session.is_current(second.generation));
    assert_eq!(first.destinations.len(), 1);
    assert_eq!(second.destinations.len(), 2);

    assert!(session.complete(first.generation).is_err());
    assert!(session.complete(second.generation).is_ok());
    assert_eq!(session.status, Status::Idle);
}

#[test]
fn failure_is_recorded_for_current_generation() {
    let mut session = Session::new(Coordinates::new(0.0, 0.0), Uuid::new_v4());
    let run = session.begin_recomputation();

    session.fail(run.generation, "upstream error".into()).unwrap();

    assert_eq!(session.status.name(), "failed");
    assert!(session.fail(run.generation, "again".into()).is_err());
}
