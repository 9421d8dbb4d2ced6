//! Port for the compliance trial log.
//!
//! Each executed command is appended as one [`TrialRecord`]. Like the
//! `tracing` output this must never disturb a run, so [`TrialLog::append`]
//! is synchronous and infallible; adapters report their own failures.

use pilot_domain::TrialRecord;

pub trait TrialLog: Send + Sync {
    fn append(&self, record: &TrialRecord);
}

/// No-op implementation for tests and when trial logging is disabled.
pub struct NoTrialLog;

impl TrialLog for NoTrialLog {
    fn append(&self, _record: &TrialRecord) {}
}
