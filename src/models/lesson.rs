use serde::{Deserialize, Serialize};

use super::Id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: Id,
    #[serde(default, alias = "course_id")]
    pub course_id: Option<Id>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "video_url")]
    pub video_url: Option<String>,
    #[serde(default, alias = "order_index")]
    pub order_index: i32,
    #[serde(default, alias = "duration_minutes")]
    pub duration_minutes: Option<u32>,
    #[serde(default, alias = "is_free_preview")]
    pub is_free_preview: bool,
}
