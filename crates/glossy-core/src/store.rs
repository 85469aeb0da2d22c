use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::page::Page;
use crate::settings::AiSettings;

/// Environment variable overriding the data root.
pub const HOME_ENV: &str = "GLOSSY_HOME";

/// On-disk home of pages, media and settings.
///
/// ```text
/// <root>/pages/<name>.json
/// <root>/media/
/// <root>/settings.json
/// ```
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$GLOSSY_HOME` if set, otherwise `~/.glossy`.
    pub fn open_default() -> Self {
        let root = std::env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".glossy")
            });
        Self::new(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.root.join("pages")
    }

    pub fn media_dir(&self) -> PathBuf {
        self.root.join("media")
    }

    fn page_path(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(self.pages_dir().join(format!("{}.json", name)))
    }

    /// List all page names (without .json extension), sorted.
    pub fn list_pages(&self) -> Result<Vec<String>> {
        let dir = self.pages_dir();
        if !dir.exists() {
            return Ok(vec![]);
        }
        let mut names: Vec<String> = fs::read_dir(&dir)?
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let name = entry.file_name().to_string_lossy().to_string();
                name.strip_suffix(".json")
                    .filter(|n| !n.starts_with('.'))
                    .map(|n| n.to_string())
            })
            .collect();
        names.sort();
        Ok(names)
    }

    pub fn page_exists(&self, name: &str) -> bool {
        self.page_path(name).map(|p| p.exists()).unwrap_or(false)
    }

    pub fn read_page(&self, name: &str) -> Result<Page> {
        let path = self.page_path(name)?;
        if !path.exists() {
            return Err(Error::PageNotFound(name.to_string()));
        }
        let raw = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write a page with temp file + rename, so readers never see a
    /// half-written document.
    pub fn write_page(&self, name: &str, page: &Page) -> Result<()> {
        let path = self.page_path(name)?;
        let dir = self.pages_dir();
        fs::create_dir_all(&dir)?;
        let tmp = dir.join(format!(".{}.json.tmp", name));
        let json = serde_json::to_string_pretty(page)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        info!(page = name, objects = page.layout.len(), "page written");
        Ok(())
    }

    pub fn delete_page(&self, name: &str) -> Result<()> {
        let path = self.page_path(name)?;
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn settings_path(&self) -> PathBuf {
        self.root.join("settings.json")
    }

    /// Missing or unreadable settings fall back to defaults.
    pub fn read_settings(&self) -> AiSettings {
        fs::read_to_string(self.settings_path())
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn write_settings(&self, settings: &AiSettings) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(self.settings_path(), json)?;
        Ok(())
    }
}

/// Page names become file names: letters, digits, '-' and '_' only.
fn validate_name(name: &str) -> Result<()> {
    let ok = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LayoutKind, LayoutObject};

    #[test]
    fn write_then_list_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path());
        assert!(store.list_pages().unwrap().is_empty());

        let mut page = Page::new("spring", "Spring Issue");
        page.layout.push(LayoutObject::new(LayoutKind::Text, 0));
        store.write_page("spring", &page).unwrap();
        store.write_page("autumn", &Page::new("autumn", "Autumn")).unwrap();

        assert_eq!(store.list_pages().unwrap(), vec!["autumn", "spring"]);
        let back = store.read_page("spring").unwrap();
        assert_eq!(back, page);
        assert!(!store.pages_dir().join(".spring.json.tmp").exists());
    }

    #[test]
    fn missing_page_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path());
        assert!(matches!(store.read_page("nope"), Err(Error::PageNotFound(_))));
    }

    #[test]
    fn rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path());
        let page = Page::new("x", "X");
        assert!(matches!(
            store.write_page("../escape", &page),
            Err(Error::InvalidName(_))
        ));
        assert!(matches!(store.read_page(""), Err(Error::InvalidName(_))));
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path());
        store.write_page("gone", &Page::new("gone", "Gone")).unwrap();
        store.delete_page("gone").unwrap();
        store.delete_page("gone").unwrap();
        assert!(!store.page_exists("gone"));
    }

    #[test]
    fn settings_default_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path());
        assert_eq!(store.read_settings().provider, "");

        let settings = AiSettings {
            provider: "ollama".into(),
            api_key: String::new(),
            model: "llama3.1".into(),
        };
        store.write_settings(&settings).unwrap();
        assert_eq!(store.read_settings().model, "llama3.1");
    }
}
