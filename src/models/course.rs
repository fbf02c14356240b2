use serde::{Deserialize, Serialize};

use super::{Id, Lesson};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default, alias = "thumbnail_url")]
    pub thumbnail_url: Option<String>,
    #[serde(
        default,
        alias = "organization_id",
        alias = "organisationId",
        alias = "organisation_id"
    )]
    pub organization_id: Option<Id>,
    #[serde(default, alias = "publish_status")]
    pub publish_status: PublishStatus,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default, alias = "instructor_ids")]
    pub instructor_ids: Vec<Id>,
}

impl Course {
    /// A missing price is treated the same as zero.
    pub fn is_free(&self) -> bool {
        match self.price {
            None => true,
            Some(p) => p == 0.0,
        }
    }

    pub fn is_paid(&self) -> bool {
        matches!(self.price, Some(p) if p > 0.0)
    }

    pub fn is_published(&self) -> bool {
        self.publish_status == PublishStatus::Published
    }
}
