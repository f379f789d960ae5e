//! InMemoryTaskStore - 開発・テスト用のタスクストア
//!
//! # 実装詳細
//! - `tokio::sync::Mutex<BTreeMap<PlantId, Plant>>` で排他制御（await を跨いでロックしない）
//! - 書き込みのたびに `watch` のリビジョンを進め、購読側（スケジューラのトリガー）に知らせる
//! - `set_available(false)` で障害を注入できる

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{Mutex, watch};

use crate::domain::ids::{PlantId, TaskId};
use crate::domain::plant::{Plant, TaskRow};
use crate::domain::recurrence::RecurrenceRule;
use crate::domain::task::Task;
use crate::ports::{StoreError, TaskStore};

pub struct InMemoryTaskStore {
    plants: Mutex<BTreeMap<PlantId, Plant>>,
    revision: watch::Sender<u64>,
    available: AtomicBool,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            plants: Mutex::new(BTreeMap::new()),
            revision,
            available: AtomicBool::new(true),
        }
    }

    /// Receives the store revision after every write.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Inserts or replaces a plant with its tasks.
    pub async fn upsert_plant(&self, plant: Plant) {
        self.plants.lock().await.insert(plant.id, plant);
        self.bump();
    }

    pub async fn add_task(&self, task: Task) -> Result<(), StoreError> {
        {
            let mut plants = self.plants.lock().await;
            let plant = plants
                .get_mut(&task.plant_id())
                .ok_or(StoreError::PlantNotFound(task.plant_id()))?;
            plant.tasks.push(task);
        }
        self.bump();
        Ok(())
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store switched off".to_string()))
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    /// Applies `change` to the task and returns the stored result.
    async fn update<E>(
        &self,
        task_id: TaskId,
        change: impl FnOnce(&mut Task) -> Result<(), E>,
    ) -> Result<Task, StoreError>
    where
        StoreError: From<E>,
    {
        self.check_available()?;
        let updated = {
            let mut plants = self.plants.lock().await;
            let task = plants
                .values_mut()
                .flat_map(|plant| plant.tasks.iter_mut())
                .find(|task| task.id() == task_id)
                .ok_or(StoreError::TaskNotFound(task_id))?;
            change(task)?;
            task.clone()
        };
        self.bump();
        Ok(updated)
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn fetch_due_tasks(&self, _as_of: NaiveDate) -> Result<Vec<TaskRow>, StoreError> {
        self.check_available()?;
        let plants = self.plants.lock().await;
        Ok(plants
            .values()
            .flat_map(|plant| plant.rows())
            .filter(|row| row.task.due_date().is_some())
            .collect())
    }

    async fn fetch_all_tasks(&self, plant_id: PlantId) -> Result<Vec<Task>, StoreError> {
        self.check_available()?;
        let plants = self.plants.lock().await;
        plants
            .get(&plant_id)
            .map(|plant| plant.tasks.clone())
            .ok_or(StoreError::PlantNotFound(plant_id))
    }

    async fn mark_done(&self, task_id: TaskId, on: NaiveDate) -> Result<Task, StoreError> {
        self.update(task_id, |task| {
            task.mark_done(on);
            Ok::<_, StoreError>(())
        })
        .await
    }

    async fn mark_skipped(&self, task_id: TaskId, on: NaiveDate) -> Result<Task, StoreError> {
        self.update(task_id, |task| {
            task.mark_skipped(on);
            Ok::<_, StoreError>(())
        })
        .await
    }

    async fn reschedule(
        &self,
        task_id: TaskId,
        rule: RecurrenceRule,
        starting_on: NaiveDate,
        today: NaiveDate,
    ) -> Result<Task, StoreError> {
        self.update(task_id, |task| task.reschedule(rule, starting_on, today))
            .await
    }
}
