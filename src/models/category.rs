//! Category model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;
use crate::utils::errors::{Result, SeminarHubError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon_name: Option<String>,
    pub color_code: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub icon_name: Option<String>,
    pub color_code: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CategoryRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            icon_name: None,
            color_code: None,
            display_order: 0,
            is_active: true,
        }
    }

    /// Trim the name and reject blank or malformed values
    pub fn normalized(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(SeminarHubError::InvalidInput("Category name is required".to_string()));
        }

        if let Some(color) = self.color_code.as_deref() {
            let valid = color.len() == 7
                && color.starts_with('#')
                && color[1..].chars().all(|c| c.is_ascii_hexdigit());
            if !valid {
                return Err(SeminarHubError::InvalidInput(format!("Invalid color code: {}", color)));
            }
        }

        Ok(self)
    }
}
