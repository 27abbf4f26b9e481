//! Background mesh rebuilds.
//!
//! Each submission snapshots the map into an owned [`VoxelGrid`] and runs
//! [`build_mesh`] on rayon's global pool. Results come back over a channel
//! tagged with the epoch they were submitted under; only results newer than
//! the last delivered one are ever handed out.
//!
//! ```text
//!  submit(map) ── snapshot ── epoch N ──► rayon::spawn ──► build_mesh
//!                                                             │
//!  poll() ◄── newest epoch > delivered ◄── channel ◄──────────┘
//! ```

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use web_time::Instant;

use crate::error::Result;
use crate::library::ShapeLibraries;
use crate::map::{VoxelGrid, VoxelMap};
use crate::mesh::{build_mesh, MeshBuild};
use crate::types::{AssemblyConfig, ClassificationConfig};

/// Finished rebuild.
#[derive(Clone, Debug)]
pub struct RebuildResult {
  pub epoch: u64,
  pub build: MeshBuild,
  /// Planning plus assembly time in microseconds.
  pub timing_us: u64,
}

/// Plan and assemble one snapshot, timing the whole build.
pub fn rebuild_snapshot(
  epoch: u64,
  snapshot: &VoxelGrid,
  config: &ClassificationConfig,
  libraries: &ShapeLibraries,
  assembly: &AssemblyConfig,
) -> RebuildResult {
  let start = Instant::now();
  let build = build_mesh(snapshot, config, libraries, assembly);
  let timing_us = start.elapsed().as_micros() as u64;

  RebuildResult {
    epoch,
    build,
    timing_us,
  }
}

/// Runs mesh rebuilds off the calling thread.
pub struct RebuildWorker {
  config: ClassificationConfig,
  assembly: AssemblyConfig,
  libraries: Arc<ShapeLibraries>,
  sender: Sender<RebuildResult>,
  receiver: Receiver<RebuildResult>,
  next_epoch: u64,
  delivered: Option<u64>,
  in_flight: usize,
}

impl RebuildWorker {
  pub fn new(config: ClassificationConfig, assembly: AssemblyConfig, libraries: Arc<ShapeLibraries>) -> Self {
    let (sender, receiver) = crossbeam_channel::unbounded();
    Self {
      config,
      assembly,
      libraries,
      sender,
      receiver,
      next_epoch: 0,
      delivered: None,
      in_flight: 0,
    }
  }

  pub fn config(&self) -> &ClassificationConfig {
    &self.config
  }

  /// Used by submissions made after this call.
  pub fn set_config(&mut self, config: ClassificationConfig) {
    self.config = config;
  }

  pub fn set_libraries(&mut self, libraries: Arc<ShapeLibraries>) {
    self.libraries = libraries;
  }

  /// Submissions whose result has not been received yet.
  pub fn in_flight(&self) -> usize {
    self.in_flight
  }

  pub fn is_busy(&self) -> bool {
    self.in_flight > 0
  }

  /// Epoch of the last result handed out by [`poll`](Self::poll) or
  /// [`wait`](Self::wait).
  pub fn delivered_epoch(&self) -> Option<u64> {
    self.delivered
  }

  /// Snapshot `map` and queue a rebuild. Returns the submission's epoch.
  pub fn submit<M: VoxelMap + ?Sized>(&mut self, map: &M) -> Result<u64> {
    let snapshot = VoxelGrid::snapshot(map)?;
    Ok(self.submit_snapshot(snapshot))
  }

  /// Queue a rebuild of an already owned snapshot.
  pub fn submit_snapshot(&mut self, snapshot: VoxelGrid) -> u64 {
    let epoch = self.next_epoch;
    self.next_epoch += 1;
    self.in_flight += 1;

    let config = self.config;
    let assembly = self.assembly;
    let libraries = Arc::clone(&self.libraries);
    let sender = self.sender.clone();
    rayon::spawn(move || {
      let result = rebuild_snapshot(epoch, &snapshot, &config, &libraries, &assembly);
      // The worker may be gone; nobody wants the result then.
      let _ = sender.send(result);
    });

    epoch
  }

  /// Newest finished result, if it is newer than anything delivered so far.
  /// Never blocks.
  pub fn poll(&mut self) -> Option<RebuildResult> {
    let received: Vec<RebuildResult> = self.receiver.try_iter().collect();
    self.take_newest(received)
  }

  /// Block until every submission has finished, then return the newest
  /// undelivered result.
  pub fn wait(&mut self) -> Option<RebuildResult> {
    let mut received: Vec<RebuildResult> = Vec::with_capacity(self.in_flight);
    while received.len() < self.in_flight {
      match self.receiver.recv() {
        Ok(result) => received.push(result),
        Err(_) => break,
      }
    }
    self.take_newest(received)
  }

  fn take_newest(&mut self, received: Vec<RebuildResult>) -> Option<RebuildResult> {
    self.in_flight = self.in_flight.saturating_sub(received.len());

    #[cfg(feature = "tracing")]
    let received_count = received.len();
    let newest = received
      .into_iter()
      .filter(|result| self.delivered.map_or(true, |d| result.epoch > d))
      .max_by_key(|result| result.epoch);

    // Everything received that is not delivered is stale.
    #[cfg(feature = "tracing")]
    {
      let stale = received_count - usize::from(newest.is_some());
      if stale > 0 {
        tracing::debug!(stale, "discarded stale rebuild results");
      }
    }

    if let Some(result) = &newest {
      self.delivered = Some(result.epoch);
      #[cfg(feature = "tracing")]
      tracing::debug!(
        epoch = result.epoch,
        timing_us = result.timing_us,
        triangles = result.build.buffers.triangle_count(),
        "rebuild ready"
      );
    }
    newest
  }
}

#[cfg(test)]
#[path = "rebuild_test.rs"]
mod rebuild_test;
