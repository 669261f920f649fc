//! Sparse per-chunk edit overlay: brush strokes, accumulation, undo/redo,
//! and binary persistence, kept independent from the procedural generator.

pub mod io;
pub mod overlay;
pub mod types;

pub use io::{load_edits_from_bytes, load_edits_from_file, save_edits_to_bytes, save_edits_to_file, EditIoError};
pub use overlay::{EditEventSink, EditManager};
pub use types::{BrushFalloff, BrushParams, BrushShape, EditLayer, EditOp, EditOperation, EditSource, VoxelEdit};
