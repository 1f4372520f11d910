//! Conty Storage
//!
//! Folder-backed pack repository. A library root holds one sub-folder per
//! pack; the folder's data file tells the schema apart:
//!
//! - `story.json`: studio pack, assets under `assets/`
//! - `nodes.json` (+ optional `metadata.json`): Telmi pack, assets under
//!   `audios/` and `images/`
//!
//! Graph repairs made during a session are never written back.
//!
//! # Example
//!
//! ```rust,no_run
//! use conty_core::PackRepository;
//! use conty_storage::FolderPackRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repository = FolderPackRepository::new("/packs");
//! for pack in repository.list_packs().await? {
//!     println!("{} ({:?})", pack.title(), pack.kind);
//! }
//! let loaded = repository.load_pack("forest-tales").await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod folder;
mod repository;

pub use error::{Result, StorageError};
pub use folder::{detect_kind, load_pack_folder, TELMI_METADATA_FILE, THUMBNAIL_FILE};
pub use repository::FolderPackRepository;
