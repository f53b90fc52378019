//! Core modules for the tumbling cube toy.
//!
//! The crate separates the game itself from its hosting concerns.  The
//! simulation ([`sim`], [`roll`], [`direction`]) advances purely from
//! elapsed time and movement intents, so the whole game can run and be
//! tested without a window, a GPU, or an audio device.  The remaining
//! modules adapt that state to the screen and the speakers.

pub mod app;
pub mod audio;
pub mod camera;
pub mod direction;
pub mod mesh;
pub mod render;
pub mod roll;
pub mod scene;
pub mod sim;

pub use audio::{Chime, ChimeError};
pub use camera::OrbitCamera;
pub use direction::Direction;
pub use render::{CameraParams, LightParams, Renderer};
pub use roll::{Pose, RollState};
pub use scene::{MeshKind, SceneNode, SceneSnapshot};
pub use sim::{Coin, FrameEvents, SimParams, Simulation};
