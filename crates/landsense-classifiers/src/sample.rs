//! Synthetic sample images for trying the pipeline without real imagery

use image::{ImageFormat, Rgb, RgbImage};
use landsense_core::{Error, Result, INPUT_SIZE};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

const TEXTURE_RECTS: usize = 50;
const TEXTURE_MAX_ALPHA: f32 = 0.3;
const TEXTURE_MAX_SIZE: f32 = 20.0;

/// Kind of landscape to paint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    Forest,
    Farm,
    City,
    Water,
}

impl SampleKind {
    /// Every sample kind
    pub const ALL: [SampleKind; 4] = [Self::Forest, Self::Farm, Self::City, Self::Water];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Forest => "forest",
            Self::Farm => "farm",
            Self::City => "city",
            Self::Water => "water",
        }
    }

    /// Gradient stops at 0, 0.5 and 1
    fn palette(&self) -> [[u8; 3]; 3] {
        match self {
            Self::Forest => [[0x22, 0x8B, 0x22], [0x32, 0xCD, 0x32], [0x00, 0x64, 0x00]],
            Self::Farm => [[0xDA, 0xA5, 0x20], [0xFF, 0xD7, 0x00], [0xB8, 0x86, 0x0B]],
            Self::City => [[0x69, 0x69, 0x69], [0x80, 0x80, 0x80], [0xA9, 0xA9, 0xA9]],
            Self::Water => [[0x41, 0x69, 0xE1], [0x1E, 0x90, 0xFF], [0x87, 0xCE, 0xEB]],
        }
    }
}

impl fmt::Display for SampleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SampleKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "forest" => Ok(Self::Forest),
            "farm" => Ok(Self::Farm),
            "city" => Ok(Self::City),
            "water" => Ok(Self::Water),
            other => Err(Error::config(format!(
                "unknown sample kind '{}', expected forest, farm, city or water",
                other
            ))),
        }
    }
}

/// Paint a 224x224 sample: a diagonal gradient with light speckles on top
pub fn render<R: Rng + ?Sized>(kind: SampleKind, rng: &mut R) -> RgbImage {
    let size = INPUT_SIZE as u32;
    let stops = kind.palette();
    let span = (2 * INPUT_SIZE) as f32;

    let mut image = RgbImage::from_fn(size, size, |x, y| {
        let t = (x + y + 1) as f32 / span;
        Rgb(gradient(&stops, t))
    });

    for _ in 0..TEXTURE_RECTS {
        let alpha = rng.gen_range(0.0..TEXTURE_MAX_ALPHA);
        let x0 = rng.gen_range(0.0..INPUT_SIZE as f32);
        let y0 = rng.gen_range(0.0..INPUT_SIZE as f32);
        let w = rng.gen_range(0.0..TEXTURE_MAX_SIZE);
        let h = rng.gen_range(0.0..TEXTURE_MAX_SIZE);

        let x1 = ((x0 + w).round() as u32).min(size);
        let y1 = ((y0 + h).round() as u32).min(size);
        for y in (y0.round() as u32)..y1 {
            for x in (x0.round() as u32)..x1 {
                let pixel = image.get_pixel_mut(x, y);
                for channel in pixel.0.iter_mut() {
                    *channel = blend_white(*channel, alpha);
                }
            }
        }
    }

    image
}

/// Render and encode a sample as PNG
pub fn render_png<R: Rng + ?Sized>(kind: SampleKind, rng: &mut R) -> Result<Vec<u8>> {
    encode_png(&render(kind, rng))
}

/// Encode an RGB image as PNG bytes
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| Error::internal(format!("PNG encoding failed: {}", e)))?;
    Ok(out.into_inner())
}

fn gradient(stops: &[[u8; 3]; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let (from, to, local) = if t <= 0.5 {
        (stops[0], stops[1], t * 2.0)
    } else {
        (stops[1], stops[2], (t - 0.5) * 2.0)
    };

    let mut rgb = [0u8; 3];
    for c in 0..3 {
        let v = from[c] as f32 + (to[c] as f32 - from[c] as f32) * local;
        rgb[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    rgb
}

fn blend_white(channel: u8, alpha: f32) -> u8 {
    let v = channel as f32 * (1.0 - alpha) + 255.0 * alpha;
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_kinds() {
        assert_eq!("forest".parse::<SampleKind>().unwrap(), SampleKind::Forest);
        assert_eq!("Water".parse::<SampleKind>().unwrap(), SampleKind::Water);
        assert!("desert".parse::<SampleKind>().is_err());

        for kind in SampleKind::ALL {
            assert_eq!(kind.name().parse::<SampleKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_render_size_and_palette() {
        let mut rng = StdRng::seed_from_u64(3);
        let image = render(SampleKind::Forest, &mut rng);
        assert_eq!(image.dimensions(), (224, 224));

        // Speckles only lighten, so green stays the dominant channel
        let Rgb([r, g, b]) = *image.get_pixel(112, 112);
        assert!(g > r && g > b);
    }

    #[test]
    fn test_gradient_endpoints() {
        let stops = SampleKind::Farm.palette();
        assert_eq!(gradient(&stops, 0.0), stops[0]);
        assert_eq!(gradient(&stops, 0.5), stops[1]);
        assert_eq!(gradient(&stops, 1.0), stops[2]);
    }

    #[test]
    fn test_seeded_render_is_reproducible() {
        let a = render(SampleKind::City, &mut StdRng::seed_from_u64(9));
        let b = render(SampleKind::City, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_png_feeds_the_preprocessor() {
        let png = render_png(SampleKind::Water, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(preprocess::validate_image(&png).unwrap(), (224, 224));

        let tensor = preprocess::preprocess(&png).unwrap();
        // Water is blue-heavy: the blue plane's mean exceeds the red plane's
        let mean = |c: usize| tensor.channel(c).iter().sum::<f32>() / tensor.channel(c).len() as f32;
        assert!(mean(2) > mean(0));
    }
}
