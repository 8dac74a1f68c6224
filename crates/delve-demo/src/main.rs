//! Delve: carves cave systems into a square of test-terrain chunks.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.

mod terrain;

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use delve_caves::{AsyncCaveGenerator, CaveGenerator, CaveStats, SharedBiomes};
use delve_config::{CliArgs, Config, default_config_dir};
use delve_voxel::{
    CHUNK_SIZE, ChunkBuffer, ChunkCoord, StandardMaterials, VoxelBuffer, VoxelTypeRegistry,
};
use tracing::{debug, error, info, warn};

use crate::terrain::TestTerrain;

/// Chunks of the requested square, row by row.
fn chunk_square(config: &Config) -> Vec<ChunkCoord> {
    let r = config.world.chunk_radius as i32;
    let origin = ChunkCoord::new(config.world.origin_x, config.world.origin_z);
    (-r..=r)
        .flat_map(|dz| (-r..=r).map(move |dx| origin.offset(dx, dz)))
        .collect()
}

fn worker_count(config: &Config) -> usize {
    match config.generation.worker_threads {
        0 => (num_cpus::get().max(2) - 2).max(1),
        n => n,
    }
}

/// Submits every chunk and collects the carved buffers, retrying submissions
/// the pool rejects while its queue is full. Gives up once `timeout` elapses.
fn carve_all(
    pool: &AsyncCaveGenerator,
    mut backlog: Vec<ChunkBuffer>,
    timeout: Duration,
) -> Result<BTreeMap<(i32, i32), ChunkBuffer>, String> {
    let expected = backlog.len();
    let deadline = Instant::now() + timeout;
    let mut carved = BTreeMap::new();
    let mut total = CaveStats::default();
    let mut failures = 0;

    backlog.reverse();
    while carved.len() + failures < expected {
        if Instant::now() >= deadline {
            return Err(format!(
                "timed out after {timeout:?} with {} of {expected} chunks carved",
                carved.len()
            ));
        }

        while let Some(buffer) = backlog.pop() {
            if let Err(buffer) = pool.submit(buffer) {
                backlog.push(buffer);
                break;
            }
        }

        for chunk in pool.drain_results() {
            match chunk.outcome {
                Ok(stats) => {
                    debug!(
                        "chunk {}: {} requests, {} voxels carved in {} us",
                        chunk.coord,
                        stats.requests,
                        stats.carve.voxels_carved,
                        chunk.generation_time_us
                    );
                    total += stats;
                    carved.insert((chunk.coord.z, chunk.coord.x), chunk.buffer);
                }
                Err(e) => {
                    error!("chunk {} failed: {e}", chunk.coord);
                    failures += 1;
                }
            }
        }
        std::thread::sleep(Duration::from_millis(5));
    }

    info!(
        "Carved {} chunks: {} walks, {} forks, {} caverns, {} voxels emptied, {} liquid skips",
        carved.len(),
        total.carve.walks,
        total.carve.forks,
        total.carve.caverns,
        total.carve.voxels_carved,
        total.carve.liquid_skips
    );

    if failures > 0 {
        return Err(format!("{failures} chunks failed"));
    }
    Ok(carved)
}

/// Prints a horizontal cross-section at `y` across all chunks.
fn print_slice(
    terrain: &TestTerrain,
    chunks: &BTreeMap<(i32, i32), ChunkBuffer>,
    config: &Config,
    y: i32,
) {
    let r = config.world.chunk_radius as i32;
    println!("Cross-section at y = {y}");
    for dz in -r..=r {
        let cz = config.world.origin_z + dz;
        for lz in 0..CHUNK_SIZE {
            let mut line = String::new();
            for dx in -r..=r {
                let cx = config.world.origin_x + dx;
                match chunks.get(&(cz, cx)) {
                    Some(buffer) => {
                        line.extend((0..CHUNK_SIZE).map(|lx| terrain.glyph(buffer.get(lx, y, lz))))
                    }
                    None => line.extend(std::iter::repeat_n('?', CHUNK_SIZE as usize)),
                }
            }
            println!("{line}");
        }
    }
}

fn run(config: &Config) -> Result<(), String> {
    let registry = VoxelTypeRegistry::with_standard_materials();
    let materials = StandardMaterials::resolve(&registry)
        .ok_or_else(|| "standard materials missing from registry".to_string())?;
    let terrain = TestTerrain::new(materials);

    let generator = CaveGenerator::new(config.caves.clone(), config.world.seed, &registry)
        .map_err(|e| e.to_string())?;
    let height = config.caves.world_height_cap as u32;

    let coords = chunk_square(config);
    info!(
        "Generating {} chunks around [{}, {}] with seed {}",
        coords.len(),
        config.world.origin_x,
        config.world.origin_z,
        config.world.seed
    );

    let threads = worker_count(config);
    let biomes: SharedBiomes = Arc::new(terrain);
    let pool = AsyncCaveGenerator::new(
        Arc::new(generator),
        biomes,
        threads,
        config.generation.max_in_flight.max(1),
        config.generation.result_capacity.max(1),
    );
    info!("Started {threads} cave workers");

    let buffers = coords.iter().map(|&c| terrain.chunk(c, height)).collect();
    let timeout = Duration::from_secs(config.generation.timeout_secs);
    let carved = carve_all(&pool, buffers, timeout)?;
    if pool.in_flight_count() > 0 {
        warn!("{} chunks still in flight at exit", pool.in_flight_count());
    }

    if let Some(y) = config.debug.ascii_slice_y {
        print_slice(&terrain, &carved, config, y);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config.log_dir(&config_dir);
    delve_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
