//! Cave Placement Planner: how many cave systems start in a chunk, where, and
//! of which shape.

use std::f32::consts::PI;

use delve_voxel::{CHUNK_SIZE, ChunkCoord};
use glam::DVec3;
use rand::Rng;

use crate::carver::CarveTask;
use crate::params::CaveParams;
use crate::seed::{nested_int, next_f32, number_in_range};

/// Depth of the nested sampler for start counts and clustered altitudes.
const NESTING: u32 = 3;

/// Shape of one planned carve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CarveShape {
    /// One wide, single-pass chamber that never forks.
    Cavern {
        /// Horizontal radius multiplier, in `[1, 7)`.
        radius_scale: f32,
    },
    /// A wandering tunnel that may fork once into two narrower tunnels.
    Tunnel {
        /// Horizontal radius multiplier, in `[0, 3)`.
        radius_scale: f32,
        /// Heading in radians.
        yaw: f32,
        /// Initial slope in radians, within ±1/8.
        pitch: f32,
    },
}

/// One root carve emitted by the planner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CarveRequest {
    /// Seed of the carve's private random stream.
    pub seed: u64,
    /// World-space start point.
    pub origin: DVec3,
    /// What to carve.
    pub shape: CarveShape,
}

impl CarveRequest {
    /// The carver task that realises this request.
    pub fn into_task(self) -> CarveTask {
        match self.shape {
            CarveShape::Cavern { radius_scale } => {
                CarveTask::cavern(self.seed, self.origin, radius_scale)
            }
            CarveShape::Tunnel {
                radius_scale,
                yaw,
                pitch,
            } => CarveTask::tunnel(self.seed, self.origin, radius_scale, yaw, pitch),
        }
    }
}

/// Plans the cave systems that start in `coord`.
///
/// Every draw comes from `rng`, in a fixed order, so the plan is a pure function
/// of the stream's seed. Requests are returned in draw order. Disabled
/// parameters (`cave_frequency` or `cave_rarity` at zero) yield no requests and
/// consume no randomness.
pub fn plan_caves<R: Rng + ?Sized>(
    coord: ChunkCoord,
    params: &CaveParams,
    rng: &mut R,
) -> Vec<CarveRequest> {
    let mut requests = Vec::new();
    if params.is_disabled() {
        return requests;
    }

    let mut starts = nested_int(rng, params.cave_frequency, NESTING);
    if params.even_cave_distribution {
        starts = params.cave_frequency;
    }
    if rng.random_range(0..100) >= params.cave_rarity {
        starts = 0;
    }

    for _ in 0..starts {
        let x = coord.block_x() + rng.random_range(0..CHUNK_SIZE);
        let y = if params.even_cave_distribution {
            number_in_range(rng, params.cave_min_altitude, params.cave_max_altitude)
        } else {
            let spread = params.cave_max_altitude - params.cave_min_altitude + 1;
            nested_int(rng, spread, NESTING) + params.cave_min_altitude
        };
        let z = coord.block_z() + rng.random_range(0..CHUNK_SIZE);
        let origin = DVec3::new(f64::from(x), f64::from(y), f64::from(z));

        let mut tunnels = params.cave_system_frequency;

        let cavern = rng.random_range(0..100) < params.individual_cave_rarity;
        if cavern {
            let seed = rng.random::<u64>();
            let radius_scale = 1.0 + next_f32(rng) * 6.0;
            requests.push(CarveRequest {
                seed,
                origin,
                shape: CarveShape::Cavern { radius_scale },
            });
        }

        if cavern || rng.random_range(0..100) < params.cave_system_pocket_chance {
            tunnels += number_in_range(
                rng,
                params.cave_system_pocket_min_size,
                params.cave_system_pocket_max_size,
            );
        }

        for _ in 0..tunnels {
            let yaw = next_f32(rng) * PI * 2.0;
            let pitch = (next_f32(rng) - 0.5) * 2.0 / 8.0;
            let radius_scale = next_f32(rng) * 2.0 + next_f32(rng);
            let seed = rng.random::<u64>();
            requests.push(CarveRequest {
                seed,
                origin,
                shape: CarveShape::Tunnel {
                    radius_scale,
                    yaw,
                    pitch,
                },
            });
        }
    }

    requests
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn single_tunnel_params() -> CaveParams {
        CaveParams {
            cave_frequency: 1,
            cave_rarity: 100,
            even_cave_distribution: true,
            cave_min_altitude: 40,
            cave_max_altitude: 40,
            cave_system_frequency: 1,
            individual_cave_rarity: 0,
            cave_system_pocket_chance: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_disabled_params_plan_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for params in [
            CaveParams {
                cave_frequency: 0,
                ..single_tunnel_params()
            },
            CaveParams {
                cave_rarity: 0,
                ..single_tunnel_params()
            },
        ] {
            assert!(plan_caves(ChunkCoord::new(0, 0), &params, &mut rng).is_empty());
        }
    }

    #[test]
    fn test_single_tunnel_plan() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let coord = ChunkCoord::new(2, -1);
        let plan = plan_caves(coord, &single_tunnel_params(), &mut rng);
        assert_eq!(plan.len(), 1);

        let request = plan[0];
        assert_eq!(request.origin.y, 40.0);
        assert!((32.0..48.0).contains(&request.origin.x));
        assert!((-16.0..0.0).contains(&request.origin.z));
        let CarveShape::Tunnel {
            radius_scale,
            yaw,
            pitch,
        } = request.shape
        else {
            panic!("expected a tunnel, got {:?}", request.shape);
        };
        assert!((0.0..3.0).contains(&radius_scale));
        assert!((0.0..2.0 * PI).contains(&yaw));
        assert!(pitch.abs() <= 0.125);
    }

    #[test]
    fn test_certain_cavern_is_emitted_first() {
        let params = CaveParams {
            individual_cave_rarity: 100,
            cave_system_frequency: 0,
            cave_system_pocket_min_size: 0,
            cave_system_pocket_max_size: 0,
            ..single_tunnel_params()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let plan = plan_caves(ChunkCoord::new(0, 0), &params, &mut rng);
        assert_eq!(plan.len(), 1);
        let CarveShape::Cavern { radius_scale } = plan[0].shape else {
            panic!("expected a cavern");
        };
        assert!((1.0..7.0).contains(&radius_scale));
    }

    #[test]
    fn test_cavern_triggers_pockets() {
        let params = CaveParams {
            individual_cave_rarity: 100,
            cave_system_frequency: 0,
            cave_system_pocket_min_size: 3,
            cave_system_pocket_max_size: 3,
            ..single_tunnel_params()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let plan = plan_caves(ChunkCoord::new(0, 0), &params, &mut rng);
        assert_eq!(plan.len(), 4);
        assert!(matches!(plan[0].shape, CarveShape::Cavern { .. }));
        assert!(
            plan[1..]
                .iter()
                .all(|r| matches!(r.shape, CarveShape::Tunnel { .. }))
        );
        assert!(plan.iter().all(|r| r.origin == plan[0].origin));
    }

    #[test]
    fn test_pocket_chance_adds_tunnels() {
        let params = CaveParams {
            cave_system_frequency: 2,
            cave_system_pocket_chance: 100,
            cave_system_pocket_min_size: 1,
            cave_system_pocket_max_size: 1,
            ..single_tunnel_params()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let plan = plan_caves(ChunkCoord::new(0, 0), &params, &mut rng);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_even_distribution_uses_full_frequency() {
        let params = CaveParams {
            cave_frequency: 5,
            cave_min_altitude: 10,
            cave_max_altitude: 60,
            ..single_tunnel_params()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let plan = plan_caves(ChunkCoord::new(0, 0), &params, &mut rng);
        assert_eq!(plan.len(), 5);
        assert!(plan.iter().all(|r| (10.0..=60.0).contains(&r.origin.y)));
    }

    #[test]
    fn test_clustered_altitudes_stay_in_range() {
        let params = CaveParams {
            cave_frequency: 30,
            even_cave_distribution: false,
            cave_min_altitude: 20,
            cave_max_altitude: 100,
            ..single_tunnel_params()
        };
        let mut low = 0;
        let mut total = 0;
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for request in plan_caves(ChunkCoord::new(0, 0), &params, &mut rng) {
                assert!((20.0..=100.0).contains(&request.origin.y));
                total += 1;
                if request.origin.y < 50.0 {
                    low += 1;
                }
            }
        }
        assert!(total > 0);
        assert!(low * 2 > total, "altitudes should cluster low: {low}/{total}");
    }

    #[test]
    fn test_rarity_gate_suppresses_most_chunks() {
        let params = CaveParams {
            cave_frequency: 10,
            cave_rarity: 5,
            ..single_tunnel_params()
        };
        let with_caves = (0..1000)
            .filter(|&seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                !plan_caves(ChunkCoord::new(0, 0), &params, &mut rng).is_empty()
            })
            .count();
        assert!(with_caves > 0 && with_caves < 150, "with_caves={with_caves}");
    }

    #[test]
    fn test_seeds_are_distinct() {
        let params = CaveParams {
            cave_frequency: 4,
            cave_system_frequency: 3,
            ..single_tunnel_params()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let plan = plan_caves(ChunkCoord::new(0, 0), &params, &mut rng);
        assert_eq!(plan.len(), 12);
        let mut seeds: Vec<u64> = plan.iter().map(|r| r.seed).collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), 12);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let params = CaveParams::default();
        let plan = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            plan_caves(ChunkCoord::new(4, 4), &params, &mut rng)
        };
        for seed in 0..50 {
            assert_eq!(plan(seed), plan(seed));
        }
    }
}
