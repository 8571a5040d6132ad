use std::{collections::BTreeSet, path::Path};

use anyhow::Context as _;

use crate::foundation::error::{FolioError, FolioResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicationCategory {
    Academic,
    NonAcademic,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Publication {
    pub id: u32,
    pub year: u16,
    pub title: String,
    pub journal: String,
    pub authors: String,
    pub category: PublicationCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Publication {
    /// `https://doi.org/<doi>` when a DOI is given, otherwise the explicit link.
    pub fn href(&self) -> Option<String> {
        match (&self.doi, &self.link) {
            (Some(doi), _) => Some(format!("https://doi.org/{doi}")),
            (None, Some(link)) => Some(link.clone()),
            (None, None) => None,
        }
    }
}

/// Ordered, read-only publication list, loaded once.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Publications {
    items: Vec<Publication>,
}

impl Publications {
    pub fn new(items: Vec<Publication>) -> FolioResult<Self> {
        let list = Self { items };
        list.validate()?;
        Ok(list)
    }

    pub fn validate(&self) -> FolioResult<()> {
        let mut seen = BTreeSet::new();
        for p in &self.items {
            if !seen.insert(p.id) {
                return Err(FolioError::validation(format!(
                    "duplicate publication id {}",
                    p.id
                )));
            }
            if p.title.trim().is_empty() {
                return Err(FolioError::validation(format!(
                    "publication {} has an empty title",
                    p.id
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> FolioResult<Self> {
        let list: Self = serde_json::from_str(s)?;
        list.validate()?;
        Ok(list)
    }

    pub fn load(path: &Path) -> FolioResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read publications '{}'", path.display()))?;
        let list = Self::from_json_str(&text)?;
        tracing::debug!(count = list.len(), path = %path.display(), "publications loaded");
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Publication> {
        self.items.iter()
    }

    /// Publications in `category`, source order preserved.
    pub fn filter(&self, category: PublicationCategory) -> impl Iterator<Item = &Publication> {
        self.items.iter().filter(move |p| p.category == category)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/publications.rs"]
mod tests;
