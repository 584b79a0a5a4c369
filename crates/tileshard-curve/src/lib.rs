//! Space-filling curve over arbitrary rectangles.
//!
//! A generalized Hilbert curve visits every cell of a `width x height`
//! rectangle once, stepping between neighbouring cells, without requiring
//! power-of-two or square sides. Ranking a cell along the curve turns a 2D
//! tile position into a 1D key that keeps nearby tiles close together.

pub mod gilbert;

pub use gilbert::{rank, GilbertRect, MAX_SIDE};
