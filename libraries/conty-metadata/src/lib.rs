//! Conty Metadata
//!
//! Reads the native length of pack audio assets with `lofty`, for stages
//! that do not declare a duration.
//!
//! # Example
//!
//! ```rust,no_run
//! use conty_core::{DurationProbe, Pack, PackKind, PackMetadata};
//! use conty_metadata::LoftyDurationProbe;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pack = Pack::new("forest", PackKind::Studio, "/packs/forest", PackMetadata::default());
//! let probe = LoftyDurationProbe::for_pack(&pack);
//! let millis = probe.probe_duration("fox.mp3")?;
//! # Ok(())
//! # }
//! ```

mod error;
mod probe;

pub use error::{MetadataError, Result};
pub use probe::{read_duration_ms, LoftyDurationProbe};
