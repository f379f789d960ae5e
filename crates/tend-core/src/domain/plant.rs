//! Plant - 読み取り専用のグルーピング文脈
//!
//! Plant 自体はストア側が所有します。エンジンは表示名とタスク一覧を読むだけです。

use serde::{Deserialize, Serialize};

use super::ids::PlantId;
use super::task::Task;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    pub id: PlantId,
    pub nickname: Option<String>,
    pub common_name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Plant {
    pub fn new(id: PlantId, common_name: impl Into<String>) -> Self {
        Self {
            id,
            nickname: None,
            common_name: common_name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Nickname when set (and not blank), else the common name.
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(self.common_name.as_str())
    }

    /// Task rows as handed to the engine.
    pub fn rows(&self) -> impl Iterator<Item = TaskRow> + '_ {
        self.tasks.iter().map(|task| TaskRow {
            plant_id: self.id,
            plant_name: self.display_name().to_string(),
            task: task.clone(),
        })
    }
}

/// TaskRow はストアがエンジンに渡す 1 行（タスク + 植物の表示名）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRow {
    pub plant_id: PlantId,
    pub plant_name: String,
    pub task: Task,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    #[test]
    fn display_name_prefers_nickname() {
        let plant = Plant::new(PlantId::from_ulid(Ulid::from(1u128)), "Monstera deliciosa");
        assert_eq!(plant.display_name(), "Monstera deliciosa");

        let plant = plant.with_nickname("Monty");
        assert_eq!(plant.display_name(), "Monty");
    }

    #[test]
    fn blank_nickname_falls_back_to_common_name() {
        let plant = Plant::new(PlantId::from_ulid(Ulid::from(1u128)), "Boston fern").with_nickname("  ");
        assert_eq!(plant.display_name(), "Boston fern");
    }
}
