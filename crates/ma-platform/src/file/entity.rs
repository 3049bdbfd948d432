//! File Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: String,
    /// Original upload name
    pub name: String,
    /// Storage path relative to the files base URL
    pub path: String,
    pub created_at: DateTime<Utc>,
}

impl File {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: crate::TsidGenerator::generate(),
            name: name.into(),
            path: path.into(),
            created_at: Utc::now(),
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    pub fn view(&self, base_url: &str) -> FileView {
        FileView {
            id: self.id.clone(),
            path: self.path.clone(),
            url: self.url(base_url),
        }
    }
}

/// Banner projection returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileView {
    pub id: String,
    pub path: String,
    pub url: String,
}
