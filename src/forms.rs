//! Form payloads for the dashboard, each checked against a declarative schema before submission.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Course, Id, Lesson, PublishStatus};

/// Field errors keyed by wire field name. Every failing rule is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for messages in self.fields.values() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                f.write_str(message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLen(usize),
    MaxLen(usize),
    NonNegative,
    HttpUrl,
    Slug,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(Option<&'a str>),
    Number(Option<f64>),
}

impl FieldValue<'_> {
    fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(t) => t.is_none_or(|s| s.trim().is_empty()),
            FieldValue::Number(n) => n.is_none(),
        }
    }
}

pub fn text(value: &str) -> FieldValue<'_> {
    FieldValue::Text(Some(value))
}

pub fn opt_text(value: &Option<String>) -> FieldValue<'_> {
    FieldValue::Text(value.as_deref())
}

/// Collects rule violations field by field.
#[derive(Debug, Default)]
pub struct Schema {
    errors: ValidationErrors,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(
        mut self,
        name: &'static str,
        label: &str,
        value: FieldValue<'_>,
        rules: &[Rule],
    ) -> Self {
        if value.is_blank() {
            if rules.contains(&Rule::Required) {
                self.errors.add(name, format!("{} is required", label));
            }
            return self;
        }

        for rule in rules {
            if let Some(message) = apply(*rule, label, value) {
                self.errors.add(name, message);
            }
        }
        self
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

fn apply(rule: Rule, label: &str, value: FieldValue<'_>) -> Option<String> {
    match (rule, value) {
        (Rule::Required, _) => None,
        (Rule::MinLen(min), FieldValue::Text(Some(s))) if s.trim().chars().count() < min => {
            Some(format!("{} must be at least {} characters", label, min))
        }
        (Rule::MaxLen(max), FieldValue::Text(Some(s))) if s.chars().count() > max => {
            Some(format!("{} must be at most {} characters", label, max))
        }
        (Rule::NonNegative, FieldValue::Number(Some(n))) if !(n >= 0.0) => {
            Some(format!("{} cannot be negative", label))
        }
        (Rule::HttpUrl, FieldValue::Text(Some(s))) if !is_http_url(s) => {
            Some(format!("{} must be a valid http(s) URL", label))
        }
        (Rule::Slug, FieldValue::Text(Some(s))) if !is_slug(s) => Some(format!(
            "{} may only contain lowercase letters, numbers and hyphens",
            label
        )),
        _ => None,
    }
}

fn is_http_url(s: &str) -> bool {
    let rest = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"));
    match rest {
        Some(rest) => {
            let host = rest.split(['/', '?', '#']).next().unwrap_or("");
            !host.is_empty() && !rest.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn is_slug(s: &str) -> bool {
    !s.starts_with('-')
        && !s.ends_with('-')
        && s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Derives a URL slug from a display name: `"Acme Academy!"` becomes `"acme-academy"`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseForm {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub organization_id: Option<Id>,
    pub publish_status: PublishStatus,
}

impl CourseForm {
    /// Prefills the edit form from a loaded course.
    pub fn from_course(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
            price: course.price,
            thumbnail_url: course.thumbnail_url.clone(),
            organization_id: course.organization_id.clone(),
            publish_status: course.publish_status,
        }
    }
}

impl Validate for CourseForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Schema::new()
            .field(
                "title",
                "Title",
                text(&self.title),
                &[Rule::Required, Rule::MinLen(3), Rule::MaxLen(120)],
            )
            .field(
                "description",
                "Description",
                opt_text(&self.description),
                &[Rule::MaxLen(5000)],
            )
            .field(
                "price",
                "Price",
                FieldValue::Number(self.price),
                &[Rule::NonNegative],
            )
            .field(
                "thumbnailUrl",
                "Thumbnail URL",
                opt_text(&self.thumbnail_url),
                &[Rule::HttpUrl],
            )
            .field(
                "organizationId",
                "Organization",
                FieldValue::Text(self.organization_id.as_ref().map(Id::as_str)),
                &[Rule::Required],
            )
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<Id>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub order_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    pub is_free_preview: bool,
}

impl LessonForm {
    pub fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            course_id: lesson.course_id.clone(),
            title: lesson.title.clone(),
            description: lesson.description.clone(),
            video_url: lesson.video_url.clone(),
            order_index: lesson.order_index,
            duration_minutes: lesson.duration_minutes,
            is_free_preview: lesson.is_free_preview,
        }
    }
}

impl Validate for LessonForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Schema::new()
            .field(
                "title",
                "Lesson title",
                text(&self.title),
                &[Rule::Required, Rule::MaxLen(200)],
            )
            .field(
                "videoUrl",
                "Video URL",
                opt_text(&self.video_url),
                &[Rule::HttpUrl],
            )
            .field(
                "orderIndex",
                "Order",
                FieldValue::Number(Some(f64::from(self.order_index))),
                &[Rule::NonNegative],
            )
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationForm {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OrganizationForm {
    /// Starts a form whose slug follows the name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: slugify(name),
            description: None,
        }
    }
}

impl Validate for OrganizationForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Schema::new()
            .field(
                "name",
                "Organization name",
                text(&self.name),
                &[Rule::Required, Rule::MinLen(2), Rule::MaxLen(100)],
            )
            .field(
                "slug",
                "Slug",
                text(&self.slug),
                &[Rule::Required, Rule::Slug, Rule::MaxLen(100)],
            )
            .field(
                "description",
                "Description",
                opt_text(&self.description),
                &[Rule::MaxLen(2000)],
            )
            .finish()
    }
}
