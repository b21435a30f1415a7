//! Store implementation backed by redb.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use redb::{Database, DatabaseError, ReadableTable, Table, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::codec::{CborCodec, Codec};
use crate::error::{Error, Result};
use crate::logging::{debug, error, info, trace, warn};

use super::absent::is_absent;
use super::options::Options;

/// Key and value type of a bucket table: raw bytes, ordered lexicographically.
type Bytes = &'static [u8];

/// A typed key-value store over one bucket of a redb database file.
///
/// Values are encoded with the store's [`Codec`] (CBOR unless another codec
/// is given to [`open_with`](Self::open_with)). Every operation runs its own
/// transaction to completion before returning.
///
/// # Example
///
/// ```ignore
/// use bucketkv::Store;
///
/// let store = Store::open("data.db", "scores")?;
///
/// store.put("harry", &1u32)?;
///
/// let mut score = 0u32;
/// store.get("harry", Some(&mut score))?;
/// assert_eq!(score, 1);
///
/// // Existence check without decoding
/// store.get::<u32>("harry", None)?;
///
/// store.delete("harry")?;
/// store.close()?;
/// ```
///
/// # Locking
///
/// Only one handle may hold the file open at a time. A second
/// [`open`](Self::open) of the same path, from this process or another,
/// waits up to the configured lock timeout (50ms by default) and then fails
/// with [`Error::LockTimeout`].
///
/// # Concurrency
///
/// `Store` is `Send + Sync`. Write transactions are serialized by the engine;
/// readers run concurrently and see a consistent snapshot. A long write
/// transaction started through [`database`](Self::database) blocks `put` and
/// `delete` until it finishes.
pub struct Store<C = CborCodec> {
    db: Database,
    bucket: String,
    path: PathBuf,
    codec: C,
}

impl Store<CborCodec> {
    /// Open (or create) the database at `path` and ensure `bucket` exists.
    ///
    /// The parent directory must already exist.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use bucketkv::Store;
    ///
    /// // Works with &str, String, &Path, PathBuf
    /// let store = Store::open("/var/lib/app/kv.db", "sessions")?;
    /// ```
    pub fn open(path: impl AsRef<Path>, bucket: &str) -> Result<Self> {
        Self::open_with(path, bucket, &Options::default(), CborCodec)
    }
}

impl<C: Codec> Store<C> {
    /// Open with explicit options and codec.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use std::time::Duration;
    /// use bucketkv::{JsonCodec, Options, Store};
    ///
    /// let options = Options::new().lock_timeout(Duration::from_secs(1));
    /// let store = Store::open_with("kv.db", "events", &options, JsonCodec)?;
    /// ```
    pub fn open_with(
        path: impl AsRef<Path>,
        bucket: &str,
        options: &Options,
        codec: C,
    ) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), bucket = bucket, codec = codec.name(), "opening store");

        if bucket.is_empty() {
            error!(path = %path.display(), "empty bucket name");
            return Err(Error::EmptyBucketName);
        }

        let db = acquire(path, options)?;

        let store = Self {
            db,
            bucket: bucket.to_string(),
            path: path.to_path_buf(),
            codec,
        };

        // Opening a table inside a write transaction creates it if missing.
        store.update(|_| Ok(()))?;

        info!(path = %path.display(), bucket = bucket, "store opened");
        Ok(store)
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// `None` and `()` are rejected with [`Error::BadValue`] before anything is
    /// encoded or written. Codec failures are returned as [`Error::Encode`].
    pub fn put<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        debug!(key = key, "put");

        if is_absent(value) {
            debug!(key = key, "refusing to store an absent value");
            return Err(Error::BadValue);
        }

        let bytes = self.codec.encode(value).map_err(Error::Encode)?;
        trace!(key = key, len = bytes.len(), "value encoded");

        self.update(|table| {
            table.insert(key.as_bytes(), bytes.as_slice())?;
            Ok(())
        })
    }

    /// Look up `key`.
    ///
    /// With `Some(dest)` the stored value is decoded into `dest`; `dest` is left
    /// untouched if decoding fails. With `None` only existence is checked and
    /// nothing is decoded. Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn get<T>(&self, key: &str, dest: Option<&mut T>) -> Result<()>
    where
        T: DeserializeOwned,
    {
        debug!(key = key, decode = dest.is_some(), "get");

        let txn = self.db.begin_read()?;
        let table = txn.open_table(self.table_definition())?;

        seek(&table, key, |bytes| match dest {
            Some(dest) => {
                *dest = self.codec.decode(bytes).map_err(Error::Decode)?;
                Ok(())
            }
            None => Ok(()),
        })
    }

    /// Decode and return the value stored under `key`.
    pub fn fetch<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(key = key, "fetch");

        let txn = self.db.begin_read()?;
        let table = txn.open_table(self.table_definition())?;

        seek(&table, key, |bytes| self.codec.decode(bytes).map_err(Error::Decode))
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> Result<bool> {
        match self.get::<serde::de::IgnoredAny>(key, None) {
            Ok(()) => Ok(true),
            Err(Error::KeyNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Remove `key`. Returns [`Error::KeyNotFound`] if it is absent.
    pub fn delete(&self, key: &str) -> Result<()> {
        debug!(key = key, "delete");

        self.update(|table| {
            seek(&*table, key, |_| Ok(()))?;
            table.remove(key.as_bytes())?;
            Ok(())
        })
    }

    /// Release the database file and its lock.
    pub fn close(self) -> Result<()> {
        info!(path = %self.path.display(), bucket = %self.bucket, "closing store");
        drop(self);
        Ok(())
    }

    /// The underlying database, for transactions this API does not cover.
    ///
    /// ```ignore
    /// let txn = store.database().begin_read()?;
    /// let table = txn.open_table(store.table_definition())?;
    /// let count = table.len()?;
    /// ```
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Table definition of this store's bucket.
    pub fn table_definition(&self) -> TableDefinition<'_, Bytes, Bytes> {
        TableDefinition::new(&self.bucket)
    }

    /// The bucket name.
    pub fn bucket_name(&self) -> &[u8] {
        self.bucket.as_bytes()
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The codec used for values.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Run `op` against the bucket in a write transaction and commit if it
    /// succeeds. On error the transaction is dropped, which rolls it back.
    fn update<R>(&self, op: impl FnOnce(&mut Table<'_, Bytes, Bytes>) -> Result<R>) -> Result<R> {
        let txn = self.db.begin_write()?;
        let out = {
            let mut table = txn.open_table(self.table_definition())?;
            op(&mut table)?
        };
        txn.commit()?;
        Ok(out)
    }
}

impl<C: Codec> fmt::Debug for Store<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("bucket", &self.bucket)
            .field("codec", &self.codec.name())
            .finish_non_exhaustive()
    }
}

/// Position at the first key `>= key` and hand its value to `read` if it is an
/// exact match. Relies on the table ordering keys byte-lexicographically.
fn seek<T, R>(table: &T, key: &str, read: impl FnOnce(&[u8]) -> Result<R>) -> Result<R>
where
    T: ReadableTable<Bytes, Bytes>,
{
    let mut range = table.range(key.as_bytes()..)?;
    match range.next() {
        Some(entry) => {
            let (found, value) = entry?;
            if found.value() == key.as_bytes() {
                read(value.value())
            } else {
                Err(Error::key_not_found(key))
            }
        }
        None => Err(Error::key_not_found(key)),
    }
}

/// Open the backing file and hand it to redb, retrying while another handle
/// holds the lock.
fn acquire(path: &Path, options: &Options) -> Result<Database> {
    let started = Instant::now();
    let budget = options.lock_budget();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let file = open_backing_file(path, options)?;

        let mut builder = Database::builder();
        if let Some(size) = options.cache_size {
            builder.set_cache_size(size);
        }

        match builder.create_file(file) {
            Ok(db) => {
                trace!(path = %path.display(), attempts = attempts, "lock acquired");
                return Ok(db);
            }
            Err(DatabaseError::DatabaseAlreadyOpen) => {
                let waited = started.elapsed();
                if attempts == 1 {
                    warn!(path = %path.display(), "database file is locked, waiting");
                }

                let pause = match budget {
                    Some(budget) if waited >= budget => {
                        error!(path = %path.display(), waited = ?waited, "timed out waiting for lock");
                        return Err(Error::LockTimeout {
                            path: path.to_path_buf(),
                            waited,
                        });
                    }
                    Some(budget) => options.poll_interval().min(budget - waited),
                    None => options.poll_interval(),
                };

                trace!(path = %path.display(), attempts = attempts, "lock busy, retrying");
                thread::sleep(pause);
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to open database");
                return Err(e.into());
            }
        }
    }
}

fn open_backing_file(path: &Path, options: &Options) -> Result<File> {
    let mut open = OpenOptions::new();
    open.read(true).write(true).create(true).truncate(false);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        open.mode(options.file_mode);
    }
    #[cfg(not(unix))]
    let _ = options;

    Ok(open.open(path)?)
}
