//! Mass-spring cloth simulation with Verlet integration.
//!
//! `weft` advances a rectangular grid of particles linked by distance
//! constraints, under gravity, wind, rain and scripted motion, and resolves
//! contact with a floor, a moving sphere and an axis-aligned box. It owns
//! only particle state; rendering and input stay with the caller.
//!
//! # Features
//!
//! - **Verlet integration**: Position-based dynamics with implicit velocity
//! - **Spring network**: Border, structural, shear and bending constraints, de-duplicated
//! - **Force generators**: Gravity, gusting wind, rain impacts, edge waves, custom effects
//! - **Collisions**: Floor, sphere (with contact friction) and box, plus optional self-collision
//! - **Observable**: Monitor each phase of a step via the `StepObserver` trait
//! - **`no_std` compatible**: Disable the default `std` feature; only `alloc` is required
//!
//! # Example
//! ```
//! use weft::{ClothConfig, ClothNetwork, ForceConfig, Frame, NoOpStepObserver};
//! use weft::obstacle::{Floor, Obstacles};
//!
//! let mut cloth: ClothNetwork<f32> = ClothNetwork::new(ClothConfig::new().with_grid(8, 8))?;
//! let forces = ForceConfig::new();
//! let obstacles = Obstacles::none().with_floor(Floor::new(-100.0));
//! let mut frame = Frame::new(0.0, 1.0 / 60.0);
//! for _ in 0..10 {
//!     cloth.step(frame, &forces, &obstacles, &mut NoOpStepObserver);
//!     frame = frame.next();
//! }
//! assert!(cloth.positions().iter().all(|p| p.y < 0.0));
//! # Ok::<(), weft::ClothError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod collision;
pub mod obstacle;
pub mod constraint;
pub mod topology;
pub mod grid;
pub mod forces;
pub mod self_collision;
pub mod network;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec3;
pub use particle::Particle;
pub use collision::{CollisionPolicy, Contact};
pub use obstacle::{Cuboid, Floor, Obstacles, Sphere};
pub use constraint::{ConstraintKind, DistanceConstraint};
pub use topology::SpringToggles;
pub use grid::ParticleGrid;
pub use forces::{CustomForce, Edge, ForceConfig, Frame, Pulse, RainConfig, WaveConfig, WindConfig};
pub use network::ClothNetwork;
pub use config::{ClothConfig, SelfCollision};
pub use observer::{NoOpStepObserver, StepObserver, StepStats};
pub use error::ClothError;
