//! Expiry records and sweeping for generated previews.
//!
//! Every preview directory carries a `metadata.json` record with its creation
//! and expiry time. [`sweep`] scans a preview root and removes the
//! directories whose record says they have expired. Records that cannot be
//! read count as expired so stale output never lingers.

pub mod record;
pub mod sweep;

pub use record::{is_expired, ArtifactRecord, RecordError, METADATA_FILE};
pub use sweep::{remove_artifact, sweep, ArtifactInfo, SweepError, SweepReport};
