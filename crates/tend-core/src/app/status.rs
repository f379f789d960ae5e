//! Status - スケジューラの実行状況（カウンタ）
//!
//! ログを追わなくても「最後のパスで何が起きたか」を説明できるようにします。

use serde::{Deserialize, Serialize};

use super::scheduler::PassOutcome;

/// SchedulerStatus はパスの累計と直近の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerStatus {
    pub passes: u64,
    pub submitted: u64,
    pub failed_items: u64,
    pub skipped_unauthorized: u64,
    pub skipped_disabled: u64,
    pub aborted: u64,
    pub failed_passes: u64,
    pub last_outcome: Option<PassOutcome>,
}

impl SchedulerStatus {
    pub(crate) fn record(&mut self, outcome: &PassOutcome) {
        self.passes += 1;
        match outcome {
            PassOutcome::Unauthorized => self.skipped_unauthorized += 1,
            PassOutcome::Disabled => self.skipped_disabled += 1,
            PassOutcome::AbortedDisabled => self.aborted += 1,
            PassOutcome::Submitted { submitted, failed } => {
                self.submitted += *submitted as u64;
                self.failed_items += *failed as u64;
            }
        }
        self.last_outcome = Some(outcome.clone());
    }

    pub(crate) fn record_failure(&mut self) {
        self.passes += 1;
        self.failed_passes += 1;
        self.last_outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut status = SchedulerStatus::default();
        status.record(&PassOutcome::Submitted { submitted: 3, failed: 1 });
        status.record(&PassOutcome::Unauthorized);
        status.record_failure();

        assert_eq!(status.passes, 3);
        assert_eq!(status.submitted, 3);
        assert_eq!(status.failed_items, 1);
        assert_eq!(status.skipped_unauthorized, 1);
        assert_eq!(status.failed_passes, 1);
        assert_eq!(status.last_outcome, None);
    }
}
