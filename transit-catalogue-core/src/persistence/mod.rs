// Binary snapshots of the catalogue, render settings and routing state

pub mod codec;
pub mod file;
pub mod messages;

pub use codec::{FORMAT_VERSION, Restored, SnapshotMode, deserialize, serialize};
pub use file::{load_snapshot, save_snapshot};
