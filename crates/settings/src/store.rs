use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{Settings, SettingsError};

use serde::{de::DeserializeOwned, Serialize};
use toml::{Table, Value};

/// Convert any serializable section model into a TOML table.
fn to_table<T: Serialize>(value: &T) -> Result<Table, SettingsError> {
    match Value::try_from(value)? {
        Value::Table(table) => Ok(table),
        _ => Err(SettingsError::Invalid("section must serialize to a table")),
    }
}

fn from_table<T: DeserializeOwned>(table: &Table) -> Result<T, SettingsError> {
    Ok(Value::Table(table.clone()).try_into::<T>()?)
}

/// Merge default + delta recursively (tables only).
fn merge_tables(default: &Table, delta: &Table) -> Table {
    let mut merged = default.clone();
    for (key, delta_value) in delta {
        let combined = match (merged.get(key), delta_value) {
            (Some(Value::Table(def)), Value::Table(sub)) => Value::Table(merge_tables(def, sub)),
            _ => delta_value.clone(),
        };
        merged.insert(key.clone(), combined);
    }
    merged
}

/// Recursive diff (new vs default). Keys equal to their default are dropped.
fn diff_tables(new: &Table, default: &Table) -> Table {
    let mut out = Table::new();
    for (key, new_value) in new {
        match (default.get(key), new_value) {
            (Some(Value::Table(def)), Value::Table(sub)) => {
                let nested = diff_tables(sub, def);
                if !nested.is_empty() {
                    out.insert(key.clone(), Value::Table(nested));
                }
            }
            (Some(def), value) if def == value => {}
            _ => {
                out.insert(key.clone(), new_value.clone());
            }
        }
    }
    out
}

fn read_deltas(path: &Path) -> Result<Table, SettingsError> {
    if !path.exists() {
        return Ok(Table::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Table::new());
    }
    Ok(toml::from_str::<Table>(&content)?)
}

/// Builder for `SettingsStore` (single delta file).
#[derive(Default)]
pub struct SettingsStoreBuilder {
    settings_file: Option<PathBuf>,
}

impl SettingsStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.settings_file = Some(path.into());
        self
    }

    pub fn build(self) -> Result<SettingsStore, SettingsError> {
        let file_path = self
            .settings_file
            .ok_or(SettingsError::Invalid("settings file not specified"))?;

        let deltas = read_deltas(&file_path)?;

        Ok(SettingsStore {
            file_path,
            deltas: RwLock::new(deltas),
            defaults: RwLock::new(HashMap::new()),
            values: RwLock::new(HashMap::new()),
        })
    }
}

/// Settings store (thread-safe).
///
/// - Each registered section keeps its full default table.
/// - The effective value is `default` merged with the user's delta.
/// - Updates persist only the recursive diff against the defaults.
/// - `reload` re-reads the delta file and re-merges every section.
pub struct SettingsStore {
    file_path: PathBuf,
    deltas: RwLock<Table>,                         // section -> delta table
    defaults: RwLock<HashMap<&'static str, Table>>, // section -> full default table
    values: RwLock<HashMap<&'static str, Table>>,   // section -> effective merged table
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, SettingsError> {
    lock.read().map_err(|_| SettingsError::Poisoned)
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, SettingsError> {
    lock.write().map_err(|_| SettingsError::Poisoned)
}

impl SettingsStore {
    pub fn builder() -> SettingsStoreBuilder {
        SettingsStoreBuilder::new()
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn is_registered<T: Settings>(&self) -> bool {
        read(&self.values)
            .map(|values| values.contains_key(T::name()))
            .unwrap_or(false)
    }

    /// Register a section type (loads defaults and applies the existing delta if present).
    pub fn register<T>(&self) -> Result<(), SettingsError>
    where
        T: Settings + Default + Serialize + DeserializeOwned,
    {
        let section = T::name();
        if read(&self.values)?.contains_key(section) {
            return Err(SettingsError::AlreadyRegistered(section));
        }

        let default_table = to_table(&T::default())?;
        let merged = match read(&self.deltas)?.get(section) {
            Some(Value::Table(delta)) => merge_tables(&default_table, delta),
            Some(_) => return Err(SettingsError::Invalid("section delta must be a table")),
            None => default_table.clone(),
        };

        // Reject deltas that no longer fit the model before exposing them
        from_table::<T>(&merged)?;

        write(&self.defaults)?.insert(section, default_table);
        write(&self.values)?.insert(section, merged);
        Ok(())
    }

    /// Snapshot get (Arc).
    pub fn get<T>(&self) -> Result<Arc<T>, SettingsError>
    where
        T: Settings + DeserializeOwned,
    {
        self.try_get::<T>()?
            .ok_or(SettingsError::NotRegistered(T::name()))
    }

    /// Optional variant: None if not registered.
    pub fn try_get<T>(&self) -> Result<Option<Arc<T>>, SettingsError>
    where
        T: Settings + DeserializeOwned,
    {
        let values = read(&self.values)?;
        let Some(table) = values.get(T::name()) else {
            return Ok(None);
        };
        Ok(Some(Arc::new(from_table::<T>(table)?)))
    }

    /// Update via mutable closure. Only the delta (recursive) is persisted.
    pub fn update<T, F>(&self, mutator: F) -> Result<(), SettingsError>
    where
        T: Settings + Default + Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let section = T::name();
        let mut current: T = {
            let values = read(&self.values)?;
            let table = values
                .get(section)
                .ok_or(SettingsError::NotRegistered(section))?;
            from_table(table)?
        };
        mutator(&mut current);
        let new_table = to_table(&current)?;

        let diff = {
            let defaults = read(&self.defaults)?;
            let default_table = defaults
                .get(section)
                .ok_or(SettingsError::NotRegistered(section))?;
            diff_tables(&new_table, default_table)
        };

        write(&self.values)?.insert(section, new_table);
        {
            let mut deltas = write(&self.deltas)?;
            if diff.is_empty() {
                deltas.remove(section);
            } else {
                deltas.insert(section.to_string(), Value::Table(diff));
            }
        }

        self.persist_deltas()
    }

    /// Reload deltas from disk and re-merge all registered sections.
    pub fn reload(&self) -> Result<(), SettingsError> {
        let new_deltas = read_deltas(&self.file_path)?;

        let defaults = read(&self.defaults)?;
        let mut values = write(&self.values)?;
        for (section, default_table) in defaults.iter() {
            let merged = match new_deltas.get(*section) {
                Some(Value::Table(delta)) => merge_tables(default_table, delta),
                _ => default_table.clone(),
            };
            values.insert(*section, merged);
        }

        *write(&self.deltas)? = new_deltas;
        Ok(())
    }

    fn persist_deltas(&self) -> Result<(), SettingsError> {
        let clean: Table = read(&self.deltas)?
            .iter()
            .filter(|(_, value)| !matches!(value, Value::Table(t) if t.is_empty()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if let Some(dir) = self.file_path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let text = toml::to_string_pretty(&clean)?;
        let tmp = self.file_path.with_extension("tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.file_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(src: &str) -> Table {
        toml::from_str(src).expect("valid toml")
    }

    #[test]
    fn merge_keeps_defaults_and_overrides_nested() {
        let default = table("a = 1\n[nested]\nx = true\ny = 2\n");
        let delta = table("[nested]\ny = 5\n");
        let merged = merge_tables(&default, &delta);
        assert_eq!(merged, table("a = 1\n[nested]\nx = true\ny = 5\n"));
    }

    #[test]
    fn diff_drops_unchanged_keys() {
        let default = table("a = 1\n[nested]\nx = true\ny = 2\n");
        let new = table("a = 1\n[nested]\nx = false\ny = 2\n");
        assert_eq!(diff_tables(&new, &default), table("[nested]\nx = false\n"));
    }

    #[test]
    fn diff_of_identical_tables_is_empty() {
        let default = table("a = 1\nlist = [\"x\", \"y\"]\n");
        assert!(diff_tables(&default, &default).is_empty());
    }
}
