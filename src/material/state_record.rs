use crate::base::Stage;

/// Holds the trial and the last committed values of a material state
///
/// `S` is the law-specific state (strain, stress, tangent and history variables).
/// Every evaluation must start with [StateRecord::begin_trial], which copies the
/// committed state into the trial state; therefore, the law is always evaluated
/// against the committed history and repeated trials with the same strain yield
/// the same results.
#[derive(Clone, Debug)]
pub struct StateRecord<S: Clone> {
    /// Holds the trial state
    trial: S,

    /// Holds the last committed state
    committed: S,

    /// Holds the lifecycle stage
    stage: Stage,
}

impl<S: Clone> StateRecord<S> {
    /// Allocates a new instance with trial = committed = virgin
    pub fn new(virgin: S) -> Self {
        StateRecord {
            trial: virgin.clone(),
            committed: virgin,
            stage: Stage::Virgin,
        }
    }

    /// Allocates a new instance from a committed state (e.g., received from a buffer)
    pub fn from_committed(committed: S) -> Self {
        StateRecord {
            trial: committed.clone(),
            committed,
            stage: Stage::Committed,
        }
    }

    /// Returns the trial state
    pub fn trial(&self) -> &S {
        &self.trial
    }

    /// Returns the last committed state
    pub fn committed(&self) -> &S {
        &self.committed
    }

    /// Returns the lifecycle stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Resets the trial state to the committed state and returns it for the new evaluation
    pub fn begin_trial(&mut self) -> &mut S {
        self.trial.clone_from(&self.committed);
        self.stage = Stage::Trial;
        &mut self.trial
    }

    /// Returns the committed state (read-only) and the trial state (mutable) at the same time
    ///
    /// **Note:** Call [StateRecord::begin_trial] first.
    pub fn split(&mut self) -> (&S, &mut S) {
        (&self.committed, &mut self.trial)
    }

    /// Copies the trial state into the committed state
    pub fn commit(&mut self) {
        self.committed.clone_from(&self.trial);
        self.stage = Stage::Committed;
    }

    /// Discards the trial state
    pub fn revert(&mut self) {
        self.trial.clone_from(&self.committed);
        if self.stage == Stage::Trial {
            self.stage = Stage::Committed;
        }
    }

    /// Resets both states to a freshly derived virgin state
    pub fn reset(&mut self, virgin: S) {
        self.trial.clone_from(&virgin);
        self.committed = virgin;
        self.stage = Stage::Virgin;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
