//! Image decoding and tensor preprocessing
//!
//! Turns arbitrary raster bytes into the normalized, channel-major tensor the
//! land-cover model was trained on:
//! decode -> RGB8 -> resize to 224x224 -> scale to [0, 1] -> ImageNet normalize.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, RgbImage};
use landsense_core::tensor::{CHANNELS, INPUT_SIZE, TENSOR_LEN};
use landsense_core::{Error, ImageTensor, NormalizationParams, Result};
use std::io::Cursor;

/// Resampling filter used to reach the model input size (bilinear, deterministic)
pub const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// Converts encoded images into model-ready tensors
#[derive(Debug, Clone, Copy, Default)]
pub struct TensorPreprocessor {
    params: NormalizationParams,
}

impl TensorPreprocessor {
    /// Preprocessor with ImageNet normalization
    pub fn new() -> Self {
        Self::default()
    }

    /// Preprocessor with custom normalization
    pub fn with_params(params: NormalizationParams) -> Self {
        Self { params }
    }

    /// Normalization in use
    pub fn params(&self) -> &NormalizationParams {
        &self.params
    }

    /// Decode, resize, and normalize an encoded image
    pub fn preprocess(&self, bytes: &[u8]) -> Result<ImageTensor> {
        let image = decode(bytes)?;
        let resized = resize_to_input(&image.to_rgb8());
        self.tensor_from_rgb(&resized)
    }

    /// Same as [`preprocess`](Self::preprocess), on the blocking thread pool
    pub async fn preprocess_async(&self, bytes: Vec<u8>) -> Result<ImageTensor> {
        let preprocessor = *self;
        tokio::task::spawn_blocking(move || preprocessor.preprocess(&bytes))
            .await
            .map_err(|e| Error::internal(format!("preprocessing task failed: {}", e)))?
    }

    /// Normalize an RGB image that is already 224x224
    pub fn tensor_from_rgb(&self, image: &RgbImage) -> Result<ImageTensor> {
        let (width, height) = image.dimensions();
        if width as usize != INPUT_SIZE || height as usize != INPUT_SIZE {
            return Err(Error::decode(format!(
                "expected a {}x{} image, got {}x{}",
                INPUT_SIZE, INPUT_SIZE, width, height
            )));
        }

        let mut data = vec![0.0f32; TENSOR_LEN];
        for (x, y, pixel) in image.enumerate_pixels() {
            let (h, w) = (y as usize, x as usize);
            for c in 0..CHANNELS {
                data[ImageTensor::index(c, h, w)] = self.params.apply(c, pixel[c]);
            }
        }

        ImageTensor::from_vec(data)
    }
}

/// Decode, resize, and normalize with ImageNet statistics
pub fn preprocess(bytes: &[u8]) -> Result<ImageTensor> {
    TensorPreprocessor::new().preprocess(bytes)
}

/// Decode an encoded image of any supported format
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(Error::decode("empty image data"));
    }

    let image = image::load_from_memory(bytes).map_err(|e| Error::decode(e.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::decode(format!(
            "invalid image dimensions: {}x{}",
            image.width(),
            image.height()
        )));
    }

    Ok(image)
}

/// Resample to the model input size
pub fn resize_to_input(image: &RgbImage) -> RgbImage {
    let size = INPUT_SIZE as u32;
    imageops::resize(image, size, size, RESIZE_FILTER)
}

/// Check that the bytes carry a readable image header, without decoding pixels.
///
/// Returns the image dimensions.
pub fn validate_image(bytes: &[u8]) -> Result<(u32, u32)> {
    if bytes.is_empty() {
        return Err(Error::decode("empty image data"));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| Error::decode(e.to_string()))?;

    if reader.format().is_none() {
        return Err(Error::decode("unrecognized image format"));
    }

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| Error::decode(e.to_string()))?;

    if width == 0 || height == 0 {
        return Err(Error::decode(format!(
            "invalid image dimensions: {}x{}",
            width, height
        )));
    }

    Ok((width, height))
}
