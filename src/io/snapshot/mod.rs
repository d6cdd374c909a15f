//! Trajectory snapshots written by the fiber engine.
//!
//! A snapshot interleaves several record kinds and timepoints. Only `FILAMENT`
//! blocks are read: a header `FILAMENT <id> <type> <length> <delta_l> <delta_r>`
//! followed by one line of `3 * N` coordinates.

pub mod reader;
