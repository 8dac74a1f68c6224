//! Asynchronous cave carving on a worker thread pool.
//!
//! Callers hand over owned chunk buffers; workers carve them with a shared
//! [`CaveGenerator`] and send them back through a bounded channel. Each buffer
//! is owned by exactly one worker while it is being carved.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;
use delve_voxel::{ChunkBuffer, ChunkCoord, VoxelBuffer};

use crate::biome::BiomeLookup;
use crate::error::CaveError;
use crate::generator::{CaveGenerator, CaveStats};

/// Biome source shared by all workers.
pub type SharedBiomes = Arc<dyn BiomeLookup + Send + Sync>;

/// A buffer returned by a worker.
#[derive(Debug)]
pub struct CarvedChunk {
    /// The chunk the buffer belongs to.
    pub coord: ChunkCoord,
    /// The buffer, carved up to the point of any error.
    pub buffer: ChunkBuffer,
    /// Generation summary, or the error that stopped it.
    pub outcome: Result<CaveStats, CaveError>,
    /// Carving time in microseconds (for profiling).
    pub generation_time_us: u64,
}

/// Internal wrapper that carries the buffer and its cancellation flag.
struct PendingChunk {
    buffer: ChunkBuffer,
    cancelled: Arc<AtomicBool>,
}

/// Manages asynchronous cave carving across a thread pool.
pub struct AsyncCaveGenerator {
    task_sender: Sender<PendingChunk>,
    result_receiver: Receiver<CarvedChunk>,
    /// Cancellation flag per submitted chunk.
    active_tasks: Arc<DashMap<ChunkCoord, Arc<AtomicBool>>>,
    /// Queued or executing chunks.
    in_flight: Arc<AtomicU64>,
}

impl AsyncCaveGenerator {
    /// Spawns `thread_count` workers.
    ///
    /// - `max_concurrent`: submissions beyond twice this many queued chunks are rejected.
    /// - `result_capacity`: bounded channel capacity for carved chunks.
    pub fn new(
        generator: Arc<CaveGenerator>,
        biomes: SharedBiomes,
        thread_count: usize,
        max_concurrent: usize,
        result_capacity: usize,
    ) -> Self {
        let (task_sender, task_receiver) = bounded::<PendingChunk>(max_concurrent * 2);
        let (result_sender, result_receiver) = bounded::<CarvedChunk>(result_capacity);
        let in_flight = Arc::new(AtomicU64::new(0));

        for index in 0..thread_count {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);
            let generator = Arc::clone(&generator);
            let biomes = Arc::clone(&biomes);

            std::thread::Builder::new()
                .name(format!("cave-worker-{index}"))
                .spawn(move || {
                    while let Ok(pending) = receiver.recv() {
                        if pending.cancelled.load(Ordering::Relaxed) {
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let mut buffer = pending.buffer;
                        let start = Instant::now();
                        let outcome = generator.generate(&mut buffer, biomes.as_ref());
                        let elapsed = start.elapsed().as_micros() as u64;

                        if !pending.cancelled.load(Ordering::Relaxed) {
                            let _ = sender.send(CarvedChunk {
                                coord: buffer.coord(),
                                buffer,
                                outcome,
                                generation_time_us: elapsed,
                            });
                        }

                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })
                .expect("Failed to spawn cave worker thread");
        }

        Self {
            task_sender,
            result_receiver,
            active_tasks: Arc::new(DashMap::new()),
            in_flight,
        }
    }

    /// Creates a pool sized from the CPU count, leaving two cores free.
    pub fn with_defaults(generator: Arc<CaveGenerator>, biomes: SharedBiomes) -> Self {
        let cpus = num_cpus::get().max(2);
        let threads = (cpus - 2).max(1);
        Self::new(generator, biomes, threads, 64, 128)
    }

    /// Queues `buffer` for carving.
    ///
    /// Returns the buffer back if the queue is full.
    #[allow(clippy::result_large_err)]
    pub fn submit(&self, buffer: ChunkBuffer) -> Result<(), ChunkBuffer> {
        let coord = buffer.coord();
        let cancelled = Arc::new(AtomicBool::new(false));
        self.active_tasks.insert(coord, Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        self.task_sender
            .try_send(PendingChunk { buffer, cancelled })
            .map_err(|e| {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                self.active_tasks.remove(&coord);
                e.into_inner().buffer
            })
    }

    /// Cancels a queued or running chunk. Its buffer is dropped.
    ///
    /// No-op if the chunk already finished.
    pub fn cancel(&self, coord: &ChunkCoord) {
        if let Some((_, cancelled)) = self.active_tasks.remove(coord) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Collects every carved chunk available right now.
    pub fn drain_results(&self) -> Vec<CarvedChunk> {
        let mut results = Vec::new();
        while let Ok(chunk) = self.result_receiver.try_recv() {
            self.active_tasks.remove(&chunk.coord);
            results.push(chunk);
        }
        results
    }

    /// Number of chunks currently queued or being carved.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns `true` if `coord` was submitted and not yet drained or cancelled.
    pub fn is_pending(&self, coord: &ChunkCoord) -> bool {
        self.active_tasks.contains_key(coord)
    }
}
