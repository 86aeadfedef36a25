/// Builtin function implementations.
///
/// Contains the mathematical functions registered by default: rounding,
/// min/max/clamp, roots, logarithms and trigonometry. Rounding and selection
/// functions carry native decimal implementations; the others are computed in
/// binary floating point in both modes.
pub mod builtin;

/// Function definitions and the registry the parser resolves calls against.
pub mod core;
