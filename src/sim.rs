use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::direction::Direction;
use crate::roll::{Pose, RollState};

/// Height of the cube center above the floor when at rest.
pub const CUBE_HALF_HEIGHT: f32 = 0.5;

/// Height coins hover at.
pub const COIN_HEIGHT: f32 = 0.4;

/// Tunable constants for the toy. The defaults are the shipped game.
#[derive(Debug, Clone, Copy)]
pub struct SimParams {
    /// Edge length of the square floor.
    pub floor_size: f32,
    /// Number of coins scattered at startup.
    pub coin_count: usize,
    /// Tumble progress per second of real time.
    pub roll_rate: f32,
    /// Decorative coin spin in radians per second.
    pub coin_spin_rate: f32,
    /// Cube-to-coin distance below which a coin is collected.
    pub pickup_radius: f32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            floor_size: 10.0,
            coin_count: 6,
            roll_rate: 3.0,
            coin_spin_rate: 2.0,
            pickup_radius: 0.7,
        }
    }
}

impl SimParams {
    /// Furthest cell center the cube may occupy on each horizontal axis.
    pub fn boundary(&self) -> f32 {
        self.floor_size / 2.0 - 1.0
    }
}

/// A collectible token hovering over the floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coin {
    pub id: u32,
    pub position: Vec3,
    pub spin: f32,
}

/// Observable outcomes of one frame step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameEvents {
    /// Ids of coins collected this frame, in scan order.
    pub picked: Vec<u32>,
}

impl FrameEvents {
    fn merge(&mut self, other: FrameEvents) {
        self.picked.extend(other.picked);
    }
}

/// Complete state of the toy, advanced once per frame by [`Simulation::step`].
///
/// Holds no rendering, audio, or windowing types, so it runs the same with
/// or without a window.
#[derive(Debug, Clone)]
pub struct Simulation {
    pub params: SimParams,
    pub cube: Pose,
    pub coins: Vec<Coin>,
    pub roll: RollState,
}

impl Simulation {
    /// Builds the starting state with coins scattered from the given seed.
    ///
    /// Coins land anywhere within one cell of the floor edge; a coin may
    /// spawn next to the cube and be collected on the first frame.
    pub fn new(params: SimParams, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let extent = (params.floor_size - 2.0) / 2.0;
        let coins = (0..params.coin_count)
            .map(|id| Coin {
                id: id as u32,
                position: Vec3::new(
                    rng.gen_range(-extent..extent),
                    COIN_HEIGHT,
                    rng.gen_range(-extent..extent),
                ),
                spin: 0.0,
            })
            .collect();
        Self {
            params,
            cube: Pose::new(Vec3::new(0.0, CUBE_HALF_HEIGHT, 0.0), Quat::IDENTITY),
            coins,
            roll: RollState::Idle,
        }
    }

    /// Feeds a movement intent to the roll controller.
    ///
    /// Returns whether a tumble started. Intents arriving while a tumble
    /// is in flight, or that would cross the boundary, are dropped.
    pub fn try_roll(&mut self, direction: Direction) -> bool {
        self.roll
            .begin(self.cube, direction, self.params.boundary())
    }

    /// Advances the toy by `delta` seconds of real time.
    pub fn step(&mut self, delta: f32) -> FrameEvents {
        for coin in &mut self.coins {
            coin.spin += delta * self.params.coin_spin_rate;
        }

        if let Some(pose) = self.roll.advance(delta * self.params.roll_rate) {
            self.cube = pose;
        }

        // Two-phase scan: collect ids first, remove afterwards.
        let picked: Vec<u32> = self
            .coins
            .iter()
            .filter(|coin| self.cube.position.distance(coin.position) < self.params.pickup_radius)
            .map(|coin| coin.id)
            .collect();
        self.coins.retain(|coin| !picked.contains(&coin.id));

        FrameEvents { picked }
    }

    /// Steps at a fixed interval until the active tumble finishes.
    ///
    /// Returns immediately when idle. Used by the windowless driver.
    pub fn settle(&mut self, frame_dt: f32) -> FrameEvents {
        let mut events = FrameEvents::default();
        while self.roll.is_rolling() {
            events.merge(self.step(frame_dt));
        }
        events
    }
}
