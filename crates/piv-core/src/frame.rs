use ndarray::Array2;
use num_traits::AsPrimitive;

/// A single grayscale recording of the flow.
///
/// Intensities are kept in whatever range the source provides; windows are
/// normalised before correlation so the absolute scale does not matter.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
    /// Original bit depth of the source samples (8, 16, 32 or 64)
    pub original_bit_depth: u8,
}

impl Frame {
    pub fn new(data: Array2<f32>, bit_depth: u8) -> Self {
        Self {
            data,
            original_bit_depth: bit_depth,
        }
    }

    /// Build a frame from any numeric array (`u8`, `u16`, `i32`, `f64`, ...).
    pub fn from_array<T>(data: &Array2<T>) -> Self
    where
        T: AsPrimitive<f32>,
    {
        let bit_depth = (std::mem::size_of::<T>() * 8).min(u8::MAX as usize) as u8;
        Self::new(data.mapv(|v| v.as_()), bit_depth)
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// (height, width)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Smallest and largest intensity, or `None` for an empty frame.
    pub fn intensity_range(&self) -> Option<(f32, f32)> {
        if self.data.is_empty() {
            return None;
        }
        let (lo, hi) = self
            .data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        Some((lo, hi))
    }
}
