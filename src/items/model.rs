use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub const MAX_TITLE_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 2000;

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Unsaved item built from a submitted form. The id stays nil until
    /// the store assigns one.
    pub fn draft(form: ItemForm) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::nil(),
            title: form.title,
            description: form.description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, form: ItemForm) {
        self.title = form.title;
        self.description = form.description;
    }

    /// Field-level checks run by the store before any write.
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        if self.title.trim().is_empty() {
            errors.add("title", "Title can not be blank.");
        } else if self.title.chars().count() > MAX_TITLE_LEN {
            errors.add("title", format!("Title must be at most {MAX_TITLE_LEN} characters."));
        }

        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                errors.add(
                    "description",
                    format!("Description must be at most {MAX_DESCRIPTION_LEN} characters."),
                );
            }
        }

        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
}

/// Messages per field, in field order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn has_any(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(|v| v.as_slice())
    }
}

// PAGINATION

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// Saturates, so a page past any real table size reads as empty.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total_entries: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(params: PageParams, total_entries: i64) -> Self {
        let per_page = params.per_page();
        Self {
            page: params.page(),
            per_page,
            total_entries,
            total_pages: (total_entries + per_page - 1) / per_page,
        }
    }
}
