//! Author registry loaded from the site's authors file

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One entry in the authors file, keyed by author id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorEntry {
    pub github: Option<String>,
    pub avatar: Option<String>,
}

/// A post author resolved against the registry
#[derive(Debug, Clone, Serialize)]
pub struct Author {
    pub id: String,
    pub github: Option<String>,
    pub avatar: Option<String>,
}

impl Author {
    /// Profile URL for the author's github handle, when one is set
    pub fn github_url(&self) -> Option<String> {
        self.github
            .as_ref()
            .map(|handle| format!("https://github.com/{}", handle))
    }
}

/// All authors known to the site, in file order
#[derive(Debug, Clone, Default)]
pub struct AuthorRegistry {
    authors: IndexMap<String, AuthorEntry>,
}

impl AuthorRegistry {
    /// Load the registry from a YAML file; a missing file means no authors
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let authors: IndexMap<String, AuthorEntry> = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        Ok(Self { authors })
    }

    /// Look up an author id, cloning the entry into a resolved `Author`
    pub fn resolve(&self, id: &str) -> Option<Author> {
        self.authors.get(id).map(|entry| Author {
            id: id.to_string(),
            github: entry.github.clone(),
            avatar: entry.avatar.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AuthorEntry)> {
        self.authors.iter().map(|(id, entry)| (id.as_str(), entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("authors.yml");
        std::fs::write(
            &path,
            "jane:\n  github: janedoe\n  avatar: /images/jane.png\nbob:\n  github: bobsmith\n",
        )
        .unwrap();

        let registry = AuthorRegistry::load(&path).unwrap();
        assert_eq!(registry.len(), 2);

        let jane = registry.resolve("jane").unwrap();
        assert_eq!(jane.id, "jane");
        assert_eq!(
            jane.github_url().as_deref(),
            Some("https://github.com/janedoe")
        );
        assert_eq!(jane.avatar.as_deref(), Some("/images/jane.png"));

        assert!(registry.resolve("nobody").is_none());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = AuthorRegistry::load(&dir.path().join("authors.yml")).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_github_url_absent_without_handle() {
        let author = Author {
            id: "jane".to_string(),
            github: None,
            avatar: None,
        };
        assert!(author.github_url().is_none());
    }
}
