//! Lenia world engine.
//!
//! A toroidal activation field evolved by convolution with a normalized
//! radial kernel and a polynomial growth rule, plus seeding, optional
//! post-step effects, snapshots and colour mapping for renderers.

pub mod field;
pub mod kernel;
pub mod seed;
pub mod effects;
pub mod simulation;
pub mod snapshot;
pub mod palette;

pub use field::Field;
pub use kernel::{Kernel, Tap};
pub use effects::{AppliedEffects, JitterMove};
pub use simulation::{RunSummary, Simulator};
pub use snapshot::Snapshot;
pub use palette::{Gradient, Palette, PaletteKind, TrailBuffer};
