use glam::{Mat4, Vec3};

use crate::sim::Simulation;

/// Visual radius from the coin center to the middle of its tube.
pub const COIN_RING_RADIUS: f32 = 0.3;
/// Thickness of the coin tube.
pub const COIN_TUBE_RADIUS: f32 = 0.1;
/// Cross-section resolution of the coin torus.
pub const COIN_TUBE_SEGMENTS: usize = 16;
/// Resolution around the coin ring.
pub const COIN_RING_SEGMENTS: usize = 100;

const FLOOR_COLOR: Vec3 = Vec3::new(0.2, 0.2, 0.2);
const CUBE_COLOR: Vec3 = Vec3::ONE;
const COIN_COLOR: Vec3 = Vec3::new(1.0, 0.84, 0.0);

/// Which of the fixed primitives a node is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Floor,
    Cube,
    Coin,
}

/// One entry of the per-frame draw list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneNode {
    pub kind: MeshKind,
    pub model: Mat4,
    pub color: Vec3,
}

/// Retained draw list handed to the renderer.
///
/// The renderer reads nothing but this snapshot, so the simulation types
/// never cross into GPU code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneSnapshot {
    pub nodes: Vec<SceneNode>,
}

impl SceneSnapshot {
    /// Builds the draw list for the current simulation state.
    pub fn build(sim: &Simulation) -> Self {
        let mut nodes = Vec::with_capacity(2 + sim.coins.len());
        nodes.push(SceneNode {
            kind: MeshKind::Floor,
            model: Mat4::from_scale(Vec3::new(sim.params.floor_size, 1.0, sim.params.floor_size)),
            color: FLOOR_COLOR,
        });
        nodes.push(SceneNode {
            kind: MeshKind::Cube,
            model: Mat4::from_rotation_translation(sim.cube.orientation, sim.cube.position),
            color: CUBE_COLOR,
        });
        for coin in &sim.coins {
            nodes.push(SceneNode {
                kind: MeshKind::Coin,
                model: Mat4::from_translation(coin.position) * Mat4::from_rotation_y(coin.spin),
                color: COIN_COLOR,
            });
        }
        Self { nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Coin, SimParams, COIN_HEIGHT};

    #[test]
    fn snapshot_lists_floor_cube_and_coins() {
        let sim = Simulation::new(SimParams::default(), 5);
        let snapshot = SceneSnapshot::build(&sim);
        assert_eq!(snapshot.nodes.len(), 2 + sim.coins.len());
        assert_eq!(snapshot.nodes[0].kind, MeshKind::Floor);
        assert_eq!(snapshot.nodes[1].kind, MeshKind::Cube);
        let coins = &snapshot.nodes[2..];
        assert!(coins.iter().all(|node| node.kind == MeshKind::Coin));
    }

    #[test]
    fn cube_node_carries_the_simulation_pose() {
        let mut sim = Simulation::new(SimParams::default(), 5);
        sim.cube.position = Vec3::new(2.0, 0.5, -1.0);
        let snapshot = SceneSnapshot::build(&sim);
        let placed = snapshot.nodes[1].model.transform_point3(Vec3::ZERO);
        assert!((placed - sim.cube.position).length() < 1e-6);
    }

    #[test]
    fn collected_coins_drop_out_of_the_snapshot() {
        let mut sim = Simulation::new(SimParams::default(), 5);
        sim.coins = vec![
            Coin {
                id: 0,
                position: Vec3::new(0.1, COIN_HEIGHT, 0.1),
                spin: 0.0,
            },
            Coin {
                id: 1,
                position: Vec3::new(3.0, COIN_HEIGHT, 3.0),
                spin: 0.0,
            },
        ];
        assert_eq!(SceneSnapshot::build(&sim).nodes.len(), 4);
        sim.step(1.0 / 60.0);
        assert_eq!(SceneSnapshot::build(&sim).nodes.len(), 3);
    }

    #[test]
    fn coin_spin_turns_the_node_about_y() {
        let mut sim = Simulation::new(SimParams::default(), 5);
        sim.coins = vec![Coin {
            id: 0,
            position: Vec3::new(3.0, COIN_HEIGHT, 3.0),
            spin: std::f32::consts::FRAC_PI_2,
        }];
        let snapshot = SceneSnapshot::build(&sim);
        let turned = snapshot.nodes[2].model.transform_vector3(Vec3::X);
        assert!((turned - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }
}
