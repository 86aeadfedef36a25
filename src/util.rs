/// Numeric conversion helpers.
///
/// This module provides the conversions between binary floats and decimal
/// numbers used by both evaluation modes. Conversions that can fail return an
/// `Option`, so callers attach their own error and source position.
pub mod num;
