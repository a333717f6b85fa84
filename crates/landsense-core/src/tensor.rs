//! Model input tensor and normalization constants
//!
//! The layout and constants here must match the training-time preprocessing
//! exactly. A deviation does not raise an error, it only degrades accuracy.

use crate::error::{Error, Result};

/// Spatial size of the model input (height and width)
pub const INPUT_SIZE: usize = 224;

/// Number of color channels fed to the model
pub const CHANNELS: usize = 3;

/// Values per channel plane
pub const PLANE_LEN: usize = INPUT_SIZE * INPUT_SIZE;

/// Total tensor length
pub const TENSOR_LEN: usize = CHANNELS * PLANE_LEN;

/// Per-channel normalization applied after scaling intensities to [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationParams {
    mean: [f32; CHANNELS],
    std: [f32; CHANNELS],
}

impl NormalizationParams {
    /// ImageNet statistics, used by the EuroSAT training pipeline
    pub const IMAGENET: Self = Self {
        mean: [0.485, 0.456, 0.406],
        std: [0.229, 0.224, 0.225],
    };

    /// Per-channel means
    pub fn mean(&self) -> [f32; CHANNELS] {
        self.mean
    }

    /// Per-channel standard deviations
    pub fn std(&self) -> [f32; CHANNELS] {
        self.std
    }

    /// Normalize one 8-bit intensity of channel `c`
    #[inline]
    pub fn apply(&self, c: usize, intensity: u8) -> f32 {
        let value = intensity as f32 / 255.0;
        (value - self.mean[c]) / self.std[c]
    }
}

impl Default for NormalizationParams {
    fn default() -> Self {
        Self::IMAGENET
    }
}

/// Normalized image in channel-major layout, logical shape `[1, 3, 224, 224]`
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Vec<f32>,
}

impl ImageTensor {
    /// Shape expected by the model
    pub const SHAPE: [usize; 4] = [1, CHANNELS, INPUT_SIZE, INPUT_SIZE];

    /// Wrap a flat buffer, which must hold exactly `3 * 224 * 224` values
    pub fn from_vec(data: Vec<f32>) -> Result<Self> {
        if data.len() != TENSOR_LEN {
            return Err(Error::internal(format!(
                "tensor must hold {} values, got {}",
                TENSOR_LEN,
                data.len()
            )));
        }
        Ok(Self { data })
    }

    /// All-zero tensor
    pub fn zeros() -> Self {
        Self {
            data: vec![0.0; TENSOR_LEN],
        }
    }

    /// Flat index of channel `c`, row `h`, column `w`
    #[inline]
    pub const fn index(c: usize, h: usize, w: usize) -> usize {
        c * PLANE_LEN + h * INPUT_SIZE + w
    }

    /// Value at channel `c`, row `h`, column `w`
    pub fn get(&self, c: usize, h: usize, w: usize) -> f32 {
        self.data[Self::index(c, h, w)]
    }

    /// One channel plane
    pub fn channel(&self, c: usize) -> &[f32] {
        &self.data[c * PLANE_LEN..(c + 1) * PLANE_LEN]
    }

    /// Flat values
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Number of values (always `TENSOR_LEN`)
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume into the flat buffer
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}
