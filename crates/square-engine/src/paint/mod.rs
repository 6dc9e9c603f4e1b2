//! Colors used by the square pass.

pub mod color;

pub use color::Color;
