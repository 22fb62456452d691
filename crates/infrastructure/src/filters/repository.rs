use async_trait::async_trait;
use listwarden_application::ports::{FilterListRepository, FilterListSnapshot};
use listwarden_domain::{DomainError, FilterEntry};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use toml_edit::{value, Array, ArrayOfTables, DocumentMut, Item, Table, Value};
use tracing::{debug, instrument};

/// Writes the filter collections back into the `[filtering]` section of
/// the TOML config file.
///
/// Only `filtering.filters`, `filtering.whitelist_filters` and
/// `filtering.user_rules` are rewritten by `save`, and only
/// `filtering.enabled` and `filtering.update_interval_hours` by
/// `save_settings`. Every other key, comment and layout detail of the file
/// is preserved. The file is replaced by rename so a crash never leaves it
/// half-written.
pub struct TomlFilterListRepository {
    path: PathBuf,
}

impl TomlFilterListRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FilterListRepository for TomlFilterListRepository {
    #[instrument(skip(self, snapshot), fields(path = %self.path.display()))]
    async fn save(&self, snapshot: &FilterListSnapshot) -> Result<(), DomainError> {
        let path = self.path.clone();
        let owned = snapshot.clone();

        tokio::task::spawn_blocking(move || rewrite(&path, |existing| render(existing, &owned)))
            .await
            .map_err(|e| DomainError::IoError(e.to_string()))??;

        debug!(
            blocklists = snapshot.filters.len(),
            allowlists = snapshot.whitelist_filters.len(),
            user_rules = snapshot.user_rules.len(),
            "Filter lists persisted"
        );
        Ok(())
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn save_settings(&self, enabled: bool, update_interval_hours: u32) -> Result<(), DomainError> {
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || {
            rewrite(&path, |existing| {
                render_settings(existing, enabled, update_interval_hours)
            })
        })
        .await
        .map_err(|e| DomainError::IoError(e.to_string()))??;

        debug!("Filtering settings persisted");
        Ok(())
    }
}

fn rewrite(
    path: &Path,
    apply: impl FnOnce(&str) -> Result<String, DomainError>,
) -> Result<(), DomainError> {
    let existing = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(DomainError::IoError(format!("{}: {}", path.display(), e))),
    };

    let rendered = apply(&existing)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(rendered.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path)
        .map_err(|e| DomainError::IoError(format!("{}: {}", path.display(), e.error)))?;
    Ok(())
}

fn edit_filtering(
    existing: &str,
    edit: impl FnOnce(&mut Table),
) -> Result<String, DomainError> {
    let mut doc: DocumentMut = existing
        .parse()
        .map_err(|e: toml_edit::TomlError| DomainError::ConfigError(e.to_string()))?;

    if !doc.contains_key("filtering") {
        doc["filtering"] = Item::Table(Table::new());
    }
    let filtering = doc["filtering"]
        .as_table_mut()
        .ok_or_else(|| DomainError::ConfigError("`filtering` is not a table".to_string()))?;

    edit(filtering);
    Ok(doc.to_string())
}

/// Merge the snapshot into an existing document.
pub fn render(existing: &str, snapshot: &FilterListSnapshot) -> Result<String, DomainError> {
    edit_filtering(existing, |filtering| {
        let mut rules = Array::new();
        for rule in &snapshot.user_rules {
            rules.push(rule.as_str());
        }
        filtering["user_rules"] = value(rules);
        filtering["filters"] = entries_item(&snapshot.filters);
        filtering["whitelist_filters"] = entries_item(&snapshot.whitelist_filters);
    })
}

pub fn render_settings(
    existing: &str,
    enabled: bool,
    update_interval_hours: u32,
) -> Result<String, DomainError> {
    edit_filtering(existing, |filtering| {
        filtering["enabled"] = value(enabled);
        filtering["update_interval_hours"] = value(i64::from(update_interval_hours));
    })
}

// An empty array of tables renders as nothing, which would bring back the
// default subscriptions on the next start.
fn entries_item(entries: &[FilterEntry]) -> Item {
    if entries.is_empty() {
        return Item::Value(Value::Array(Array::new()));
    }

    let mut tables = ArrayOfTables::new();
    for entry in entries {
        let mut table = Table::new();
        table["id"] = value(entry.id);
        table["enabled"] = value(entry.enabled);
        table["url"] = value(entry.url.as_str());
        table["name"] = value(entry.name.as_str());
        tables.push(table);
    }
    Item::ArrayOfTables(tables)
}
