//! CareService - ユーザー操作（完了・スキップ・予定変更）の入口
//!
//! ストアに書き込んだあと、スケジューラに再計算を依頼します。

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::driver::{Trigger, TriggerHandle};
use crate::domain::ids::TaskId;
use crate::domain::recurrence::RecurrenceRule;
use crate::domain::task::Task;
use crate::ports::{Clock, StoreError, TaskStore};

/// RescheduleOutcome は予定変更の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RescheduleOutcome {
    Rescheduled(Task),
    /// The task was not Due; nothing changed. `message` is meant for the user.
    Ignored { message: String },
}

pub struct CareService {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    trigger: TriggerHandle,
}

impl CareService {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>, trigger: TriggerHandle) -> Self {
        Self {
            store,
            clock,
            trigger,
        }
    }

    pub async fn mark_done(&self, task_id: TaskId) -> Result<Task, StoreError> {
        let today = self.clock.today();
        let task = self.store.mark_done(task_id, today).await?;
        info!(task = %task_id, next_due = ?task.due_date(), "care recorded");
        self.notify();
        Ok(task)
    }

    pub async fn mark_skipped(&self, task_id: TaskId) -> Result<Task, StoreError> {
        let today = self.clock.today();
        let task = self.store.mark_skipped(task_id, today).await?;
        info!(task = %task_id, next_due = ?task.due_date(), "care skipped");
        self.notify();
        Ok(task)
    }

    pub async fn reschedule(
        &self,
        task_id: TaskId,
        rule: RecurrenceRule,
        starting_on: NaiveDate,
    ) -> Result<RescheduleOutcome, StoreError> {
        let today = self.clock.today();
        match self.store.reschedule(task_id, rule, starting_on, today).await {
            Ok(task) => {
                info!(task = %task_id, %rule, %starting_on, "task rescheduled");
                self.notify();
                Ok(RescheduleOutcome::Rescheduled(task))
            }
            Err(StoreError::Stale(stale)) => {
                info!(task = %task_id, next_due = %stale.next_due, "reschedule ignored");
                Ok(RescheduleOutcome::Ignored {
                    message: stale.to_string(),
                })
            }
            Err(err) => Err(err),
        }
    }

    fn notify(&self) {
        if !self.trigger.fire(Trigger::TasksChanged) {
            debug!("scheduler driver gone; no reschedule requested");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::scheduler::tests::{date, harness, today};
    use crate::ports::FixedClock;

    #[tokio::test]
    async fn mark_done_persists_and_triggers() {
        let h = harness(1, 64).await;
        let (trigger, mut rx) = TriggerHandle::channel();
        let care = CareService::new(h.store.clone(), Arc::new(FixedClock::on(today())), trigger);

        let task = care.mark_done(h.first_task).await.unwrap();

        assert_eq!(task.due_date(), Some(date(2026, 10, 24)));
        assert_eq!(task.last_completed_date(), Some(today()));
        assert_eq!(rx.try_recv().unwrap(), Trigger::TasksChanged);
    }

    #[tokio::test]
    async fn mark_skipped_is_not_care() {
        let h = harness(1, 64).await;
        let (trigger, mut rx) = TriggerHandle::channel();
        let care = CareService::new(h.store.clone(), Arc::new(FixedClock::on(today())), trigger);

        let task = care.mark_skipped(h.first_task).await.unwrap();

        assert_eq!(task.last_completed_date(), None);
        assert_eq!(rx.try_recv().unwrap(), Trigger::TasksChanged);
    }

    #[tokio::test]
    async fn stale_reschedule_becomes_a_message() {
        let h = harness(1, 64).await;
        let (trigger, mut rx) = TriggerHandle::channel();
        let care = CareService::new(h.store.clone(), Arc::new(FixedClock::on(today())), trigger);
        care.mark_done(h.first_task).await.unwrap();
        rx.try_recv().unwrap();

        let outcome = care
            .reschedule(h.first_task, RecurrenceRule::daily(2).unwrap(), date(2026, 10, 20))
            .await
            .unwrap();

        let RescheduleOutcome::Ignored { message } = outcome else {
            panic!("expected the reschedule to be ignored");
        };
        assert!(message.contains("not due again until 2026-10-24"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn reschedule_while_due_replaces_the_schedule() {
        let h = harness(1, 64).await;
        let (trigger, _rx) = TriggerHandle::channel();
        let care = CareService::new(h.store.clone(), Arc::new(FixedClock::on(today())), trigger);

        let outcome = care
            .reschedule(h.first_task, RecurrenceRule::weekly([1]).unwrap(), date(2026, 10, 18))
            .await
            .unwrap();

        let RescheduleOutcome::Rescheduled(task) = outcome else {
            panic!("expected a rescheduled task");
        };
        assert_eq!(task.due_date(), Some(date(2026, 10, 18)));
    }

    #[tokio::test]
    async fn unknown_task_is_an_error() {
        let h = harness(1, 64).await;
        let (trigger, _rx) = TriggerHandle::channel();
        let care = CareService::new(h.store.clone(), Arc::new(FixedClock::on(today())), trigger);
        let missing = TaskId::from_ulid(ulid::Ulid::from(999u128));

        assert_eq!(
            care.mark_done(missing).await.unwrap_err(),
            StoreError::TaskNotFound(missing)
        );
    }
}
