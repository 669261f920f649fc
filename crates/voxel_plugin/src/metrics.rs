//! Engine-agnostic metrics collection for the streaming pipeline.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//! [`ChunkManager`](crate::chunk_manager::ChunkManager) records into a
//! [`WorldMetrics`] on every meshing completion and unload; hosts read it to
//! feed their own debug overlay (the teacher's `iyes_perf_ui` panel, trimmed
//! from this crate per DESIGN.md, is exactly that kind of consumer).

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
  buffer: VecDeque<T>,
  capacity: usize,
}

impl<T> RollingWindow<T> {
  /// Create a new rolling window with the given capacity.
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: T) {
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  /// Get the number of values in the window.
  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  /// Check if the window is empty.
  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  /// Clear all values.
  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Iterate over values (oldest to newest).
  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.buffer.iter()
  }

  /// Get the most recent value.
  pub fn last(&self) -> Option<&T> {
    self.buffer.back()
  }

  /// Get all values as a slice (for histogram rendering).
  pub fn as_slice(&self) -> &VecDeque<T> {
    &self.buffer
  }
}

impl<T: Copy + Default + std::ops::Add<Output = T>> RollingWindow<T> {
  /// Compute the sum of all values.
  pub fn sum(&self) -> T {
    self.buffer.iter().copied().fold(T::default(), |acc, x| acc + x)
  }
}

impl RollingWindow<u64> {
  /// Compute the average of all values.
  pub fn average(&self) -> f64 {
    if self.buffer.is_empty() {
      0.0
    } else {
      self.sum() as f64 / self.buffer.len() as f64
    }
  }

  /// Get min and max values.
  pub fn min_max(&self) -> Option<(u64, u64)> {
    if self.buffer.is_empty() {
      None
    } else {
      let min = *self.buffer.iter().min().unwrap();
      let max = *self.buffer.iter().max().unwrap();
      Some((min, max))
    }
  }
}

impl Default for RollingWindow<u64> {
  fn default() -> Self {
    Self::new(128) // Default to 128 samples (~2 seconds at 60fps)
  }
}

/// Streaming-pipeline statistics, updated as chunks move through the state
/// machine. Indexed by [`crate::config`]'s `LODBands.lod_level` (clamped to
/// 15 — the closed set tops out at 7 per §6, so this leaves headroom).
#[derive(Debug, Clone)]
pub struct WorldMetrics {
  /// Count of Loaded chunks at each LOD level (index = LOD).
  pub chunks_per_lod: [u32; 16],
  /// Vertex count summed over Loaded chunks at each LOD level.
  pub vertices_per_lod: [u64; 16],
  /// Index count summed over Loaded chunks at each LOD level.
  pub indices_per_lod: [u64; 16],

  /// Number of currently loaded chunks across all LODs.
  pub loaded_chunks: u32,
  /// Total triangles across all loaded chunks (indices / 3).
  pub loaded_triangles: u64,

  /// Approximate mesh memory usage (vertices + indices), in bytes.
  pub mesh_memory_bytes: u64,

  /// Rolling window of meshing-phase durations in microseconds.
  pub mesh_timings: RollingWindow<u64>,
  /// Rolling window of generation-phase (noise sampling) durations in microseconds.
  pub generation_timings: RollingWindow<u64>,

  /// Last meshing-phase duration in microseconds.
  pub last_mesh_us: u64,
  /// Last generation-phase duration in microseconds.
  pub last_generation_us: u64,
  /// Total chunks generated this session (cumulative, never decremented).
  pub total_chunks_generated: u64,
}

impl Default for WorldMetrics {
  fn default() -> Self {
    Self {
      chunks_per_lod: [0; 16],
      vertices_per_lod: [0; 16],
      indices_per_lod: [0; 16],
      loaded_chunks: 0,
      loaded_triangles: 0,
      mesh_memory_bytes: 0,
      mesh_timings: RollingWindow::new(128),
      generation_timings: RollingWindow::new(128),
      last_mesh_us: 0,
      last_generation_us: 0,
      total_chunks_generated: 0,
    }
  }
}

impl WorldMetrics {
  /// Create new metrics with default values.
  pub fn new() -> Self {
    Self::default()
  }

  /// Reset all per-frame/per-chunk counters to zero. `total_chunks_generated`
  /// is cumulative and survives a reset.
  pub fn reset(&mut self) {
    self.chunks_per_lod.fill(0);
    self.vertices_per_lod.fill(0);
    self.indices_per_lod.fill(0);
    self.loaded_chunks = 0;
    self.loaded_triangles = 0;
    self.mesh_memory_bytes = 0;
    self.mesh_timings.clear();
    self.generation_timings.clear();
    self.last_mesh_us = 0;
    self.last_generation_us = 0;
  }

  /// Record a meshing-phase timing.
  pub fn record_mesh_timing(&mut self, timing_us: u64) {
    if is_enabled() {
      self.mesh_timings.push(timing_us);
      self.last_mesh_us = timing_us;
    }
  }

  /// Record a generation-phase (noise sampling) timing.
  pub fn record_generation_timing(&mut self, timing_us: u64) {
    if is_enabled() {
      self.generation_timings.push(timing_us);
      self.last_generation_us = timing_us;
    }
  }

  /// Record a chunk reaching `Loaded`, per §4.6's meshing-completion step.
  pub fn on_chunk_loaded(&mut self, lod: i32, vertex_count: u32, index_count: u32) {
    if !is_enabled() {
      return;
    }

    let lod_idx = (lod.max(0) as usize).min(15);
    self.chunks_per_lod[lod_idx] += 1;
    self.vertices_per_lod[lod_idx] += vertex_count as u64;
    self.indices_per_lod[lod_idx] += index_count as u64;

    // Approximate memory: 32 bytes per vertex (positions+normals+uv0+secondary_uv+color), 4 bytes per index.
    let chunk_memory = (vertex_count as u64 * 32) + (index_count as u64 * 4);
    self.mesh_memory_bytes += chunk_memory;

    self.loaded_chunks += 1;
    self.loaded_triangles += (index_count / 3) as u64;
    self.total_chunks_generated += 1;
  }

  /// Record a chunk's removal, per the unload phase.
  pub fn on_chunk_unloaded(&mut self, lod: i32, vertex_count: u32, index_count: u32) {
    if !is_enabled() {
      return;
    }

    let lod_idx = (lod.max(0) as usize).min(15);
    self.chunks_per_lod[lod_idx] = self.chunks_per_lod[lod_idx].saturating_sub(1);
    self.vertices_per_lod[lod_idx] = self.vertices_per_lod[lod_idx].saturating_sub(vertex_count as u64);
    self.indices_per_lod[lod_idx] = self.indices_per_lod[lod_idx].saturating_sub(index_count as u64);

    let chunk_memory = (vertex_count as u64 * 32) + (index_count as u64 * 4);
    self.mesh_memory_bytes = self.mesh_memory_bytes.saturating_sub(chunk_memory);

    self.loaded_chunks = self.loaded_chunks.saturating_sub(1);
    self.loaded_triangles = self.loaded_triangles.saturating_sub((index_count / 3) as u64);
  }

  /// Get the total vertex count across all LODs.
  pub fn total_vertices(&self) -> u64 {
    self.vertices_per_lod.iter().sum()
  }

  /// Get the total index count across all LODs.
  pub fn total_indices(&self) -> u64 {
    self.indices_per_lod.iter().sum()
  }

  /// Get average meshing timing in microseconds.
  pub fn avg_mesh_timing_us(&self) -> f64 {
    self.mesh_timings.average()
  }

  /// Get average generation timing in microseconds.
  pub fn avg_generation_timing_us(&self) -> f64 {
    self.generation_timings.average()
  }

  /// Format mesh memory as a human-readable string.
  pub fn mesh_memory_mb(&self) -> f64 {
    self.mesh_memory_bytes as f64 / 1_048_576.0
  }
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
  use super::*;

  #[test]
  fn test_rolling_window() {
    let mut window = RollingWindow::new(3);
    assert!(window.is_empty());

    window.push(10u64);
    window.push(20);
    window.push(30);
    assert_eq!(window.len(), 3);
    assert_eq!(window.sum(), 60);
    assert_eq!(window.average(), 20.0);

    // Push one more, oldest should be evicted
    window.push(40);
    assert_eq!(window.len(), 3);
    assert_eq!(window.sum(), 90);
    assert_eq!(window.average(), 30.0);

    let (min, max) = window.min_max().unwrap();
    assert_eq!(min, 20);
    assert_eq!(max, 40);
  }

  #[test]
  fn test_world_metrics() {
    let mut metrics = WorldMetrics::new();

    metrics.on_chunk_loaded(0, 1000, 3000);
    metrics.on_chunk_loaded(1, 500, 1500);
    metrics.on_chunk_loaded(0, 800, 2400);

    assert_eq!(metrics.chunks_per_lod[0], 2);
    assert_eq!(metrics.chunks_per_lod[1], 1);
    assert_eq!(metrics.loaded_chunks, 3);

    metrics.on_chunk_unloaded(0, 1000, 3000);
    assert_eq!(metrics.chunks_per_lod[0], 1);
    assert_eq!(metrics.loaded_chunks, 2);
  }

  #[test]
  fn test_timing_recording() {
    let mut metrics = WorldMetrics::new();

    metrics.record_mesh_timing(1000);
    metrics.record_mesh_timing(2000);
    metrics.record_mesh_timing(3000);

    assert_eq!(metrics.mesh_timings.len(), 3);
    assert_eq!(metrics.avg_mesh_timing_us(), 2000.0);
    assert_eq!(metrics.last_mesh_us, 3000);
  }
}
