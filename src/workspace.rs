//! # Workspace
//!
//! Applies a [`Scaffold`] to the project files as one transaction.
//!
//! A scaffold declares up front which files and folders it may touch. The
//! workspace locks every declared path exclusively and every folder between
//! it and the data directory shared, so a folder lock also covers the files
//! inside it. Locks are taken in path order, so two scaffolds never wait on
//! each other in opposite order. The scaffold then stages its reads,
//! patches, creations and deletions, and only then is anything written:
//!
//! 1.  Every modified file is fingerprinted again. If it changed on disk since
//!     it was read, nothing is written.
//! 2.  Files and folders to delete are moved aside first, then modified
//!     files are replaced atomically and new files are created. If one step
//!     fails, files already written are restored and moved paths are put
//!     back. The moved paths are only dropped once everything succeeded.

use crate::diff::render_diff;
use crate::layout::ProjectLayout;
use crate::permissions;
use crate::scaffolds::Scaffold;
use anyhow::{Context, Result, anyhow, bail};
use sha1::{Digest, Sha1};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

fn fingerprint(content: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn short_hash(hash: &str) -> &str {
    &hash[..8.min(hash.len())]
}

fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| anyhow!("'{}' has no parent directory", path.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create a temporary file in '{}'", dir.display()))?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    Ok(())
}

/// Topmost ancestor of `dir` that does not exist yet.
fn first_missing_ancestor(dir: &Path) -> Option<PathBuf> {
    let mut missing = None;
    let mut current = Some(dir);
    while let Some(path) = current {
        if path.as_os_str().is_empty() || path.exists() {
            break;
        }
        missing = Some(path.to_path_buf());
        current = path.parent();
    }
    missing
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Modified,
    Created,
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ChangeKind::Modified => "modified",
            ChangeKind::Created => "created",
            ChangeKind::Deleted => "deleted",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct FileChange {
    pub kind: ChangeKind,
    pub path: PathBuf,
    pub old_hash: Option<String>,
    pub new_hash: Option<String>,
    pub diff: Option<String>,
}

/// What a scaffold changed, or would change in a dry run.
#[derive(Debug, Clone)]
pub struct CommitReport {
    pub scaffold: String,
    pub dry_run: bool,
    pub changes: Vec<FileChange>,
}

impl CommitReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Renders the report with paths relative to `root`.
    pub fn render(&self, root: &Path, show_diff: bool) -> String {
        let mut lines = Vec::new();
        let verb = if self.dry_run { "Would apply" } else { "Applied" };
        lines.push(format!("{verb} '{}':", self.scaffold));

        if self.changes.is_empty() {
            lines.push("  no changes".to_string());
        }
        for change in &self.changes {
            let path = change.path.strip_prefix(root).unwrap_or(&change.path);
            let hashes = match (&change.old_hash, &change.new_hash) {
                (Some(old), Some(new)) => format!(" ({} -> {})", short_hash(old), short_hash(new)),
                (None, Some(new)) => format!(" ({})", short_hash(new)),
                _ => String::new(),
            };
            lines.push(format!("  {} {}{hashes}", change.kind, path.display()));
            if show_diff && let Some(diff) = &change.diff {
                lines.push(diff.clone());
            }
        }
        lines.join("\n")
    }
}

impl fmt::Display for CommitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Path::new(""), true))
    }
}

struct StagedFile {
    original: String,
    fingerprint: String,
    current: String,
}

enum Removal {
    File(PathBuf),
    Dir(PathBuf),
}

impl Removal {
    fn path(&self) -> &Path {
        match self {
            Removal::File(path) | Removal::Dir(path) => path,
        }
    }
}

/// The staged changes of one scaffold run.
pub struct Transaction<'a> {
    layout: &'a ProjectLayout,
    targets: Vec<PathBuf>,
    staged: BTreeMap<PathBuf, StagedFile>,
    created: BTreeMap<PathBuf, String>,
    removals: Vec<Removal>,
}

impl<'a> Transaction<'a> {
    fn new(layout: &'a ProjectLayout, targets: Vec<PathBuf>) -> Self {
        Self {
            layout,
            targets,
            staged: BTreeMap::new(),
            created: BTreeMap::new(),
            removals: Vec::new(),
        }
    }

    pub fn layout(&self) -> &'a ProjectLayout {
        self.layout
    }

    /// A path may be touched when it is a declared target or lies inside one.
    fn check(&self, path: &Path) -> Result<()> {
        if !self.targets.iter().any(|target| path.starts_with(target)) {
            bail!(
                "'{}' is not one of the files this scaffold declared",
                path.display()
            );
        }
        permissions::ensure_within(path, &self.layout.data_dir())
    }

    fn is_removed(&self, path: &Path) -> bool {
        self.removals.iter().any(|removal| path.starts_with(removal.path()))
    }

    /// Whether `path` exists once the staged changes are applied.
    pub fn exists(&self, path: &Path) -> bool {
        self.created.contains_key(path) || (path.exists() && !self.is_removed(path))
    }

    /// Returns the staged content of `path`, reading it on first access.
    pub fn read(&mut self, path: &Path) -> Result<String> {
        self.check(path)?;
        if let Some(content) = self.created.get(path) {
            return Ok(content.clone());
        }
        if let Some(file) = self.staged.get(path) {
            return Ok(file.current.clone());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        debug!(path = %path.display(), "staged for reading");
        self.staged.insert(
            path.to_path_buf(),
            StagedFile {
                original: content.clone(),
                fingerprint: fingerprint(&content),
                current: content.clone(),
            },
        );
        Ok(content)
    }

    /// Replaces the staged content of `path` with `patch(content)`.
    pub fn update<F>(&mut self, path: &Path, patch: F) -> Result<()>
    where
        F: FnOnce(&str) -> Result<String>,
    {
        let content = self.read(path)?;
        let updated = patch(&content).with_context(|| format!("Failed to update '{}'", path.display()))?;
        if let Some(created) = self.created.get_mut(path) {
            *created = updated;
        } else if let Some(file) = self.staged.get_mut(path) {
            file.current = updated;
        }
        Ok(())
    }

    /// Stages a new file. Existing files are never overwritten.
    pub fn create(&mut self, path: &Path, content: impl Into<String>) -> Result<()> {
        self.check(path)?;
        if self.exists(path) {
            bail!("'{}' already exists", path.display());
        }
        debug!(path = %path.display(), "staged for creation");
        self.created.insert(path.to_path_buf(), content.into());
        Ok(())
    }

    pub fn delete_file(&mut self, path: &Path) -> Result<()> {
        self.check(path)?;
        if !path.is_file() {
            bail!("'{}' is not a file", path.display());
        }
        self.removals.push(Removal::File(path.to_path_buf()));
        Ok(())
    }

    /// Stages the removal of a folder and everything in it.
    pub fn delete_dir(&mut self, path: &Path) -> Result<()> {
        self.check(path)?;
        if !path.is_dir() {
            bail!("'{}' is not a directory", path.display());
        }
        self.removals.push(Removal::Dir(path.to_path_buf()));
        Ok(())
    }

    fn report(&self, scaffold: String, dry_run: bool) -> CommitReport {
        let mut changes = Vec::new();
        for (path, file) in &self.staged {
            if file.current == file.original {
                continue;
            }
            changes.push(FileChange {
                kind: ChangeKind::Modified,
                path: path.clone(),
                old_hash: Some(file.fingerprint.clone()),
                new_hash: Some(fingerprint(&file.current)),
                diff: Some(render_diff(&file.original, &file.current)),
            });
        }
        for (path, content) in &self.created {
            changes.push(FileChange {
                kind: ChangeKind::Created,
                path: path.clone(),
                old_hash: None,
                new_hash: Some(fingerprint(content)),
                diff: None,
            });
        }
        for removal in &self.removals {
            changes.push(FileChange {
                kind: ChangeKind::Deleted,
                path: removal.path().to_path_buf(),
                old_hash: None,
                new_hash: None,
                diff: None,
            });
        }
        CommitReport {
            scaffold,
            dry_run,
            changes,
        }
    }

    fn commit(self, scaffold: String) -> Result<CommitReport> {
        let report = self.report(scaffold, false);
        let modified: Vec<(&PathBuf, &StagedFile)> = self
            .staged
            .iter()
            .filter(|(_, file)| file.current != file.original)
            .collect();

        for (path, file) in &modified {
            let on_disk = fs::read_to_string(path)
                .with_context(|| format!("Failed to re-read '{}'", path.display()))?;
            if fingerprint(&on_disk) != file.fingerprint {
                bail!(
                    "'{}' was changed on disk while '{}' was planned. Nothing was written.",
                    path.display(),
                    report.scaffold
                );
            }
        }

        let trash = Trash::move_aside(&self.removals)
            .with_context(|| format!("Applying '{}' failed, nothing was written", report.scaffold))?;

        let mut written: Vec<(&Path, &str)> = Vec::new();
        let mut created: Vec<PathBuf> = Vec::new();
        let result = (|| -> Result<()> {
            for (path, file) in &modified {
                write_atomic(path, &file.current)?;
                written.push((path.as_path(), file.original.as_str()));
                info!(path = %path.display(), "updated");
            }
            for (path, content) in &self.created {
                if let Some(parent) = path.parent() {
                    let missing = first_missing_ancestor(parent);
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create '{}'", parent.display()))?;
                    created.extend(missing);
                }
                write_atomic(path, content)?;
                created.push(path.clone());
                info!(path = %path.display(), "created");
            }
            Ok(())
        })();

        if let Err(err) = result {
            rollback(&written, &created);
            trash.restore();
            return Err(err.context(format!(
                "Applying '{}' failed, already written files were restored",
                report.scaffold
            )));
        }

        trash.purge();
        Ok(report)
    }
}

/// Files and folders staged for deletion, moved into a hidden sibling folder
/// until every write of the commit succeeded.
struct Trash {
    moved: Vec<(PathBuf, PathBuf, tempfile::TempDir)>,
}

impl Trash {
    fn move_aside(removals: &[Removal]) -> Result<Self> {
        let mut trash = Trash { moved: Vec::new() };
        for removal in removals {
            let path = removal.path();
            let covered = removals
                .iter()
                .any(|other| other.path() != path && path.starts_with(other.path()));
            if covered {
                continue;
            }
            if let Err(err) = trash.move_one(path) {
                trash.restore();
                return Err(err);
            }
        }
        Ok(trash)
    }

    fn move_one(&mut self, path: &Path) -> Result<()> {
        let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
            bail!("Cannot delete '{}'", path.display());
        };
        let holder = tempfile::Builder::new()
            .prefix(".worldsmith-removed-")
            .tempdir_in(parent)
            .with_context(|| format!("Failed to delete '{}'", path.display()))?;
        let aside = holder.path().join(name);
        fs::rename(path, &aside).with_context(|| format!("Failed to delete '{}'", path.display()))?;
        self.moved.push((path.to_path_buf(), aside, holder));
        Ok(())
    }

    fn restore(self) {
        for (original, aside, _holder) in self.moved.into_iter().rev() {
            if let Err(err) = fs::rename(&aside, &original) {
                warn!(path = %original.display(), "failed to restore: {err}");
            }
        }
    }

    fn purge(self) {
        for (original, _aside, holder) in self.moved {
            match holder.close() {
                Ok(()) => info!(path = %original.display(), "deleted"),
                Err(err) => warn!(path = %original.display(), "failed to clean up: {err}"),
            }
        }
    }
}

fn rollback(written: &[(&Path, &str)], created: &[PathBuf]) {
    for (path, original) in written {
        if let Err(err) = write_atomic(path, original) {
            warn!(path = %path.display(), "failed to restore: {err:#}");
        }
    }
    for path in created.iter().rev() {
        let removed = if path.is_dir() {
            fs::remove_dir_all(path)
        } else {
            fs::remove_file(path)
        };
        if let Err(err) = removed
            && err.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %path.display(), "failed to remove: {err}");
        }
    }
}

/// How a path is locked while a scaffold runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// A folder above a declared path: it must not be deleted meanwhile.
    Shared,
    /// A declared path and everything inside it.
    Exclusive,
}

/// Guards held for the duration of one scaffold run.
struct HeldLocks<'a> {
    _shared: Vec<RwLockReadGuard<'a, ()>>,
    _exclusive: Vec<RwLockWriteGuard<'a, ()>>,
}

fn acquire(handles: &[(Arc<RwLock<()>>, Access)]) -> Result<HeldLocks<'_>> {
    let mut held = HeldLocks {
        _shared: Vec::new(),
        _exclusive: Vec::new(),
    };
    for (handle, access) in handles {
        match access {
            Access::Shared => held._shared.push(
                handle
                    .read()
                    .map_err(|_| anyhow!("A file lock is poisoned"))?,
            ),
            Access::Exclusive => held._exclusive.push(
                handle
                    .write()
                    .map_err(|_| anyhow!("A file lock is poisoned"))?,
            ),
        }
    }
    Ok(held)
}

/// Runs scaffolds against one project, one writer per file at a time.
pub struct Workspace {
    layout: ProjectLayout,
    locks: Mutex<HashMap<PathBuf, Arc<RwLock<()>>>>,
}

impl Workspace {
    pub fn new(layout: ProjectLayout) -> Self {
        Self {
            layout,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    /// Locks for `targets` in path order: each target exclusively, each
    /// folder between a target and the data directory shared.
    fn path_locks(&self, targets: &[PathBuf]) -> Result<Vec<(Arc<RwLock<()>>, Access)>> {
        let data_dir = permissions::resolve(&self.layout.data_dir())?;
        let mut plan: BTreeMap<PathBuf, Access> = BTreeMap::new();
        for target in targets {
            let key = permissions::resolve(target)?;
            for ancestor in key.ancestors().skip(1) {
                if ancestor == data_dir || !ancestor.starts_with(&data_dir) {
                    break;
                }
                plan.entry(ancestor.to_path_buf()).or_insert(Access::Shared);
            }
            plan.insert(key, Access::Exclusive);
        }

        let mut table = self
            .locks
            .lock()
            .map_err(|_| anyhow!("The workspace lock table is poisoned"))?;
        Ok(plan
            .into_iter()
            .map(|(key, access)| (table.entry(key).or_default().clone(), access))
            .collect())
    }

    fn run(&self, scaffold: &dyn Scaffold, dry_run: bool) -> Result<CommitReport> {
        let name = scaffold.name();
        let targets = scaffold.targets(&self.layout);
        let handles = self.path_locks(&targets)?;
        let _held = acquire(&handles)?;

        debug!(scaffold = %name, targets = targets.len(), "planning");
        let mut tx = Transaction::new(&self.layout, targets);
        scaffold
            .plan(&mut tx)
            .with_context(|| format!("'{name}' failed, nothing was written"))?;

        if dry_run {
            Ok(tx.report(name, true))
        } else {
            tx.commit(name)
        }
    }

    /// Plans and writes `scaffold`.
    pub fn apply(&self, scaffold: &dyn Scaffold) -> Result<CommitReport> {
        self.run(scaffold, false)
    }

    /// Plans `scaffold` and reports what it would change, without writing.
    pub fn preview(&self, scaffold: &dyn Scaffold) -> Result<CommitReport> {
        self.run(scaffold, true)
    }
}
