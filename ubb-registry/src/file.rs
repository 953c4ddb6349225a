//! File-based academic registry with persistence.
//!
//! Keeps the registry in memory and persists whole-state snapshots to disk.
//! Suitable for single-node deployments where durability is needed.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use ubb_core::constants::{SNAPSHOT_HEADER_SIZE, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
use ubb_core::error::{RegistryError, Result};
use ubb_core::traits::AcademicRegistry;
use ubb_core::types::{
    EthAddress, Faculty, RegistrySnapshot, RegistryStats, SpecializationView, Student,
};

use crate::MemoryRegistry;

/// File-based academic registry.
///
/// Uses a memory registry internally with persistence to disk once more than
/// `auto_save_threshold` successful mutations are pending.
///
/// A mutation is committed once it is applied in memory. A failed automatic
/// save does not undo it: the registry stays dirty and the error surfaces
/// from the next [`FileRegistry::flush`] or [`FileRegistry::save`].
///
/// # File Format
///
/// ```text
/// magic (4 bytes): "UBBR"
/// version (1 byte): 1
/// count (8 bytes, LE): number of records across all collections
/// snapshot (variable): JSON-serialized RegistrySnapshot
/// ```
pub struct FileRegistry {
    /// Path to the storage file
    path: PathBuf,
    /// In-memory storage
    memory: MemoryRegistry,
    /// Auto-save threshold (save once more than this many writes are pending)
    auto_save_threshold: u64,
    /// Committed writes since the registry was loaded
    generation: AtomicU64,
    /// Highest generation known to be on disk
    saved_generation: AtomicU64,
    /// Serializes saves so snapshots reach disk in order
    save_lock: Mutex<()>,
}

impl FileRegistry {
    /// Creates a file registry at the given path, administered by `owner`.
    ///
    /// If the file exists it is loaded and its owner must equal `owner`.
    /// Otherwise an empty registry is created and the file is written on
    /// first save.
    pub async fn new(path: impl AsRef<Path>, owner: EthAddress) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let memory = if fs::try_exists(&path).await? {
            let snapshot = Self::read_snapshot(&path).await?;
            if snapshot.owner != owner {
                return Err(RegistryError::OwnerMismatch {
                    stored: snapshot.owner,
                    requested: owner,
                });
            }
            MemoryRegistry::from_snapshot(snapshot)?
        } else {
            MemoryRegistry::new(owner)
        };

        Ok(Self::from_parts(path, memory))
    }

    /// Opens an existing registry file, adopting the owner stored in it.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = Self::read_snapshot(&path).await?;
        let memory = MemoryRegistry::from_snapshot(snapshot)?;
        Ok(Self::from_parts(path, memory))
    }

    /// Creates a file registry with custom auto-save threshold.
    pub async fn with_auto_save(
        path: impl AsRef<Path>,
        owner: EthAddress,
        threshold: u64,
    ) -> Result<Self> {
        let mut registry = Self::new(path, owner).await?;
        registry.auto_save_threshold = threshold;
        Ok(registry)
    }

    /// Sets the auto-save threshold.
    pub fn set_auto_save(&mut self, threshold: u64) {
        self.auto_save_threshold = threshold;
    }

    fn from_parts(path: PathBuf, memory: MemoryRegistry) -> Self {
        Self {
            path,
            memory,
            auto_save_threshold: 100,
            generation: AtomicU64::new(0),
            saved_generation: AtomicU64::new(0),
            save_lock: Mutex::new(()),
        }
    }

    /// Reads and decodes a snapshot file.
    #[instrument]
    async fn read_snapshot(path: &Path) -> Result<RegistrySnapshot> {
        let mut file = fs::File::open(path).await.map_err(|e| {
            RegistryError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to open registry file: {}", e),
            ))
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).await?;

        if contents.len() < SNAPSHOT_HEADER_SIZE {
            return Err(RegistryError::CorruptSnapshot("File too short".into()));
        }

        // Verify magic
        if &contents[0..4] != SNAPSHOT_MAGIC {
            return Err(RegistryError::CorruptSnapshot("Invalid magic bytes".into()));
        }

        // Check version
        let version = contents[4];
        if version != SNAPSHOT_VERSION {
            return Err(RegistryError::VersionMismatch {
                expected: SNAPSHOT_VERSION,
                actual: version,
            });
        }

        let mut count_bytes = [0u8; 8];
        count_bytes.copy_from_slice(&contents[5..SNAPSHOT_HEADER_SIZE]);
        let count = u64::from_le_bytes(count_bytes);

        let snapshot: RegistrySnapshot = serde_json::from_slice(&contents[SNAPSHOT_HEADER_SIZE..])
            .map_err(|e| RegistryError::CorruptSnapshot(e.to_string()))?;

        if snapshot.record_count() as u64 != count {
            return Err(RegistryError::CorruptSnapshot(format!(
                "header declares {} records, snapshot holds {}",
                count,
                snapshot.record_count()
            )));
        }

        info!(count, owner = %snapshot.owner, "Loaded registry from file");
        Ok(snapshot)
    }

    /// Saves the registry to the file.
    pub async fn save(&self) -> Result<()> {
        let _guard = self.save_lock.lock().await;
        self.write_snapshot().await
    }

    /// Writes the current state. Callers hold `save_lock`.
    #[instrument(skip(self))]
    async fn write_snapshot(&self) -> Result<()> {
        // Read before the snapshot so the snapshot holds at least this many writes
        let generation = self.generation.load(Ordering::SeqCst);
        let snapshot = self.memory.snapshot();
        let count = snapshot.record_count() as u64;

        info!(count, path = ?self.path, "Saving registry to file");

        let serialized = serde_json::to_vec(&snapshot)?;

        // Build file contents
        let mut contents = Vec::with_capacity(SNAPSHOT_HEADER_SIZE + serialized.len());
        contents.extend_from_slice(SNAPSHOT_MAGIC);
        contents.push(SNAPSHOT_VERSION);
        contents.extend_from_slice(&count.to_le_bytes());
        contents.extend_from_slice(&serialized);

        // Write atomically (write to temp, then rename)
        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&contents).await?;
        file.sync_all().await?;

        fs::rename(&temp_path, &self.path).await?;

        self.saved_generation.fetch_max(generation, Ordering::SeqCst);

        debug!(generation, "Registry saved successfully");
        Ok(())
    }

    /// Checks if there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.pending_writes() > 0
    }

    fn pending_writes(&self) -> u64 {
        self.generation
            .load(Ordering::SeqCst)
            .saturating_sub(self.saved_generation.load(Ordering::SeqCst))
    }

    /// Forces a save if dirty.
    pub async fn flush(&self) -> Result<()> {
        let _guard = self.save_lock.lock().await;
        if self.is_dirty() {
            self.write_snapshot().await?;
        }
        Ok(())
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the underlying memory registry for direct access.
    pub fn memory(&self) -> &MemoryRegistry {
        &self.memory
    }

    /// Returns the number of students.
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns true if the registry holds no records.
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Records a committed write and saves once the threshold is exceeded.
    ///
    /// Save failures are logged, not returned: the write is already visible
    /// in memory and stays pending for the next save.
    async fn after_write(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if self.pending_writes() <= self.auto_save_threshold {
            return;
        }

        let _guard = self.save_lock.lock().await;
        // A save that ran while we waited may already cover this write
        if self.saved_generation.load(Ordering::SeqCst) >= generation {
            return;
        }
        if let Err(e) = self.write_snapshot().await {
            warn!(path = ?self.path, error = %e, "Auto-save failed; changes remain pending");
        }
    }
}

impl Drop for FileRegistry {
    fn drop(&mut self) {
        // Saving needs the async runtime, so only report here
        if self.is_dirty() {
            warn!(path = ?self.path, "FileRegistry dropped with unsaved changes");
        }
    }
}

#[async_trait]
impl AcademicRegistry for FileRegistry {
    fn owner(&self) -> EthAddress {
        self.memory.owner()
    }

    async fn add_faculty(&self, caller: &EthAddress, name: &str, symbol: &str) -> Result<()> {
        self.memory.add_faculty(caller, name, symbol).await?;
        self.after_write().await;
        Ok(())
    }

    async fn get_faculty(&self, symbol: &str) -> Result<Option<Faculty>> {
        self.memory.get_faculty(symbol).await
    }

    async fn add_specialization(
        &self,
        caller: &EthAddress,
        name: &str,
        duration_years: u32,
        faculty_symbol: &str,
    ) -> Result<()> {
        self.memory
            .add_specialization(caller, name, duration_years, faculty_symbol)
            .await?;
        self.after_write().await;
        Ok(())
    }

    async fn get_specialization(&self, name: &str) -> Result<Option<SpecializationView>> {
        self.memory.get_specialization(name).await
    }

    async fn add_student(
        &self,
        caller: &EthAddress,
        address: &EthAddress,
        name: &str,
        national_id: &str,
        specialization: &str,
    ) -> Result<()> {
        self.memory
            .add_student(caller, address, name, national_id, specialization)
            .await?;
        self.after_write().await;
        Ok(())
    }

    async fn verify_by_address(&self, address: &EthAddress) -> Result<Option<Student>> {
        self.memory.verify_by_address(address).await
    }

    async fn verify_by_national_id(&self, national_id: &str) -> Result<Option<Student>> {
        self.memory.verify_by_national_id(national_id).await
    }

    async fn mark_finished(&self, caller: &EthAddress, national_id: &str) -> Result<()> {
        self.memory.mark_finished(caller, national_id).await?;
        self.after_write().await;
        Ok(())
    }

    async fn mark_suspended(&self, caller: &EthAddress, national_id: &str) -> Result<()> {
        self.memory.mark_suspended(caller, national_id).await?;
        self.after_write().await;
        Ok(())
    }

    async fn stats(&self) -> Result<RegistryStats> {
        self.memory.stats().await
    }
}
