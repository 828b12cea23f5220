//! File-based storage media.
//!
//! Layout under a base directory:
//!
//! ```text
//! <base>/<family>/<id>                         # JSON-encoded entity
//! <base>/<family>/<relation>/<parent>/<child>  # empty marker: attachment
//! ```
//!
//! For example `<base>/networks/clusters/<networkID>/<clusterID>`.

use crate::backend::{Backend, MarkerSet, Table};
use crate::error::{StorageError, StorageResult};
use crate::relation::{validate_id, Relation};
use infracat_entities::Entity;
use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Suffix of in-flight writes. Names starting with a dot are never valid ids,
/// so temp files cannot collide with entities.
const TEMP_SUFFIX: &str = ".tmp";

/// An entity table storing one JSON file per entity.
///
/// Writes go to a hidden temp file which is then renamed over the target,
/// so a single entity write is all-or-nothing at the file-system level.
/// The directory is created on first write.
#[derive(Debug)]
pub struct FileTable<T> {
    dir: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> FileTable<T> {
    /// Creates a table rooted at `<base>/<family>`.
    pub fn new(base: &Path) -> Self {
        Self {
            dir: base.join(T::FAMILY),
            _marker: PhantomData,
        }
    }

    /// Returns the directory holding the entity files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> StorageResult<PathBuf> {
        validate_id(id)?;
        Ok(self.dir.join(id))
    }

    fn read_file(path: &Path) -> StorageResult<Option<T>> {
        let content = match fs::read(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::io(path, e)),
        };
        let value = serde_json::from_slice(&content).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Failed to decode stored entity");
            StorageError::unmarshal(path, e)
        })?;
        Ok(Some(value))
    }
}

impl<T: Entity> Table<T> for FileTable<T> {
    fn get(&self, id: &str) -> StorageResult<Option<T>> {
        let path = self.path_for(id)?;
        Self::read_file(&path)
    }

    fn contains(&self, id: &str) -> bool {
        self.path_for(id).is_ok_and(|path| path.is_file())
    }

    fn put(&mut self, value: T) -> StorageResult<()> {
        let path = self.path_for(value.id())?;
        let content = serde_json::to_vec_pretty(&value).map_err(|e| StorageError::Marshal {
            kind: T::KIND,
            id: value.id().to_string(),
            source: e,
        })?;

        fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;

        let temp_path = self.dir.join(format!(".{}{}", value.id(), TEMP_SUFFIX));
        fs::write(&temp_path, content).map_err(|e| StorageError::io(&temp_path, e))?;
        fs::rename(&temp_path, &path).map_err(|e| StorageError::io(&path, e))?;
        Ok(())
    }

    fn remove(&mut self, id: &str) -> StorageResult<bool> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(&path, e)),
        }
    }

    fn values(&self) -> StorageResult<Vec<T>> {
        let mut paths = Vec::new();
        for path in list_entries(&self.dir)? {
            if path.is_dir() || is_hidden(&path) {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        let mut values = Vec::with_capacity(paths.len());
        for path in paths {
            // A file removed between listing and reading is simply skipped.
            if let Some(value) = Self::read_file(&path)? {
                values.push(value);
            }
        }
        Ok(values)
    }

    fn clear(&mut self) -> StorageResult<()> {
        for path in list_entries(&self.dir)? {
            if path.is_dir() {
                continue;
            }
            fs::remove_file(&path).map_err(|e| StorageError::io(&path, e))?;
        }
        Ok(())
    }
}

/// Relation markers stored as empty files.
#[derive(Debug)]
pub struct FileMarkers {
    dir: PathBuf,
}

impl FileMarkers {
    /// Creates a marker set rooted at `<base>/<family>/<relation>`.
    pub fn new(base: &Path, family: &str, relation: Relation) -> Self {
        Self {
            dir: base.join(family).join(relation.dir_name()),
        }
    }

    /// Returns the directory holding one subdirectory per parent.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn marker_path(&self, parent: &str, child: &str) -> StorageResult<PathBuf> {
        validate_id(parent)?;
        validate_id(child)?;
        Ok(self.dir.join(parent).join(child))
    }
}

impl MarkerSet for FileMarkers {
    fn insert(&mut self, parent: &str, child: &str) -> StorageResult<()> {
        let path = self.marker_path(parent, child)?;
        let parent_dir = self.dir.join(parent);
        fs::create_dir_all(&parent_dir).map_err(|e| StorageError::io(&parent_dir, e))?;
        fs::File::create(&path).map_err(|e| StorageError::io(&path, e))?;
        Ok(())
    }

    fn remove(&mut self, parent: &str, child: &str) -> StorageResult<bool> {
        let path = self.marker_path(parent, child)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(&path, e)),
        }
    }

    fn contains(&self, parent: &str, child: &str) -> bool {
        self.marker_path(parent, child)
            .is_ok_and(|path| path.is_file())
    }

    fn children(&self, parent: &str) -> StorageResult<Vec<String>> {
        validate_id(parent)?;
        let mut children: Vec<String> = list_entries(&self.dir.join(parent))?
            .into_iter()
            .filter(|path| path.is_file())
            .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        children.sort();
        Ok(children)
    }

    fn clear(&mut self) -> StorageResult<()> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(&self.dir, e)),
        }
    }
}

/// Builds file-based media under a base directory.
///
/// Safe for one process holding one store per family; there is no
/// cross-process locking.
///
/// # Example
///
/// ```no_run
/// use infracat_entities::Network;
/// use infracat_storage::{EntityProvider, EntityStore, FileBackend};
///
/// let backend = FileBackend::new("/var/lib/infracat");
/// let store = EntityStore::<Network>::with_backend(&backend).unwrap();
/// store.add(Network::new("n1", "lab")).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    base: PathBuf,
}

impl FileBackend {
    /// Creates a backend rooted at `base`. Nothing is created until the
    /// first table is opened.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Returns the base directory.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl Backend for FileBackend {
    fn table<T: Entity>(&self) -> StorageResult<Box<dyn Table<T>>> {
        let table = FileTable::<T>::new(&self.base);
        fs::create_dir_all(table.dir()).map_err(|e| StorageError::io(table.dir(), e))?;
        Ok(Box::new(table))
    }

    fn markers(&self, family: &str, relation: Relation) -> StorageResult<Box<dyn MarkerSet>> {
        Ok(Box::new(FileMarkers::new(&self.base, family, relation)))
    }
}

/// Lists the entries of `dir`, treating a missing directory as empty.
fn list_entries(dir: &Path) -> StorageResult<Vec<PathBuf>> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StorageError::io(dir, e)),
    };

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StorageError::io(dir, e))?;
        paths.push(entry.path());
    }
    Ok(paths)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind as StorageErrorKind;
    use infracat_entities::{Cluster, ClusterType, Network};
    use tempfile::tempdir;

    #[test]
    fn file_put_and_get() {
        let dir = tempdir().unwrap();
        let mut table = FileTable::<Network>::new(dir.path());

        table.put(Network::new("n1", "lab")).unwrap();

        assert!(dir.path().join("networks").join("n1").is_file());
        assert_eq!(table.get("n1").unwrap(), Some(Network::new("n1", "lab")));
    }

    #[test]
    fn file_get_missing_is_none() {
        let dir = tempdir().unwrap();
        let table = FileTable::<Network>::new(dir.path());
        assert!(table.get("ghost").unwrap().is_none());
        assert!(!table.contains("ghost"));
    }

    #[test]
    fn file_persistence() {
        let dir = tempdir().unwrap();

        {
            let mut table = FileTable::<Cluster>::new(dir.path());
            table
                .put(Cluster::new("n1", "c1", "edge-a", ClusterType::Edge))
                .unwrap();
        }

        {
            let table = FileTable::<Cluster>::new(dir.path());
            let cluster = table.get("c1").unwrap().unwrap();
            assert_eq!(cluster.name, "edge-a");
        }
    }

    #[test]
    fn file_put_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let mut table = FileTable::<Network>::new(dir.path());
        table.put(Network::new("n1", "one")).unwrap();
        table.put(Network::new("n1", "two")).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path().join("networks"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["n1".to_string()]);
    }

    #[test]
    fn file_values_skip_relation_directories() {
        let dir = tempdir().unwrap();
        let mut table = FileTable::<Network>::new(dir.path());
        let mut markers = FileMarkers::new(dir.path(), "networks", Relation::NetworkClusters);

        table.put(Network::new("n1", "lab")).unwrap();
        markers.insert("n1", "c1").unwrap();

        let values = table.values().unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].network_id, "n1");
    }

    #[test]
    fn file_corrupt_entry_poisons_values() {
        let dir = tempdir().unwrap();
        let mut table = FileTable::<Network>::new(dir.path());
        table.put(Network::new("n1", "lab")).unwrap();
        fs::write(dir.path().join("networks").join("n2"), b"{not json").unwrap();

        let err = table.values().unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::Unmarshal);
        assert!(table.get("n1").is_ok());
    }

    #[test]
    fn file_rejects_path_escapes() {
        let dir = tempdir().unwrap();
        let table = FileTable::<Network>::new(dir.path());

        let err = table.get("../etc").unwrap_err();
        assert_eq!(err.kind(), StorageErrorKind::InvalidId);
        assert!(!table.contains("../etc"));
    }

    #[test]
    fn file_remove_missing_is_false() {
        let dir = tempdir().unwrap();
        let mut table = FileTable::<Network>::new(dir.path());
        assert!(!table.remove("ghost").unwrap());
    }

    #[test]
    fn file_clear_keeps_markers() {
        let dir = tempdir().unwrap();
        let mut table = FileTable::<Network>::new(dir.path());
        let mut markers = FileMarkers::new(dir.path(), "networks", Relation::NetworkClusters);
        table.put(Network::new("n1", "lab")).unwrap();
        markers.insert("n1", "c1").unwrap();

        table.clear().unwrap();

        assert!(table.values().unwrap().is_empty());
        assert!(markers.contains("n1", "c1"));
    }

    #[test]
    fn markers_layout_on_disk() {
        let dir = tempdir().unwrap();
        let mut markers = FileMarkers::new(dir.path(), "networks", Relation::NetworkAppDescriptors);
        markers.insert("n1", "d1").unwrap();

        let path = dir.path().join("networks/appdesc/n1/d1");
        assert!(path.is_file());
        assert_eq!(fs::metadata(path).unwrap().len(), 0);
    }

    #[test]
    fn markers_children_and_remove() {
        let dir = tempdir().unwrap();
        let mut markers = FileMarkers::new(dir.path(), "clusters", Relation::ClusterNodes);
        markers.insert("c1", "node-b").unwrap();
        markers.insert("c1", "node-a").unwrap();

        assert_eq!(markers.children("c1").unwrap(), vec!["node-a", "node-b"]);
        assert!(markers.remove("c1", "node-a").unwrap());
        assert!(!markers.remove("c1", "node-a").unwrap());
        assert!(markers.children("ghost").unwrap().is_empty());
    }

    #[test]
    fn markers_clear_removes_relation_dir() {
        let dir = tempdir().unwrap();
        let mut markers = FileMarkers::new(dir.path(), "clusters", Relation::ClusterNodes);
        markers.insert("c1", "node-1").unwrap();

        markers.clear().unwrap();
        markers.clear().unwrap();

        assert!(!markers.dir().exists());
    }

    #[test]
    fn backend_creates_family_dir() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("nested"));
        let _table = backend.table::<Network>().unwrap();

        assert!(dir.path().join("nested").join("networks").is_dir());
        assert_eq!(backend.base(), dir.path().join("nested"));
    }
}
