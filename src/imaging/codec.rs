//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait is the only place pixels enter or leave the
//! program: `decode` turns a source file into a [`DecodedImage`] (pixels plus
//! EXIF orientation) and `encode` writes a finished image to disk. Resizing
//! and rotation happen in between on plain `DynamicImage`s (see
//! [`operations`](super::operations)).
//!
//! The production implementation is
//! [`RustCodec`](super::rust_codec::RustCodec). Tests use a recording mock
//! that never touches the filesystem for output.

use super::orientation::Orientation;
use super::params::EncodeParams;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// A decoded source image.
///
/// `orientation` is `None` when the file has no usable EXIF orientation.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub pixels: DynamicImage,
    pub orientation: Option<Orientation>,
}

impl DecodedImage {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.pixels)
    }
}

/// Decode/encode capability the pipeline is written against.
///
/// `Sync` so a single codec can serve every worker of the parallel mode.
pub trait ImageCodec: Sync {
    /// Read and decode a source image.
    fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError>;

    /// Encode an image to `params.output`.
    fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), CodecError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::{OutputFormat, Quality};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Mock codec that fabricates source images and records encodes.
    ///
    /// Sources are looked up by file name; unknown names fail to decode.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockCodec {
        sources: HashMap<String, (Dimensions, Option<Orientation>)>,
        failing_outputs: Vec<String>,
        pub encodes: Mutex<Vec<RecordedEncode>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedEncode {
        pub output: PathBuf,
        pub width: u32,
        pub height: u32,
        pub quality: u8,
        pub format: OutputFormat,
    }

    impl MockCodec {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_image(mut self, file_name: &str, width: u32, height: u32) -> Self {
            self.sources
                .insert(file_name.to_string(), (Dimensions { width, height }, None));
            self
        }

        pub fn with_oriented_image(
            mut self,
            file_name: &str,
            width: u32,
            height: u32,
            orientation: Orientation,
        ) -> Self {
            self.sources.insert(
                file_name.to_string(),
                (Dimensions { width, height }, Some(orientation)),
            );
            self
        }

        /// Make encoding fail for outputs whose file name contains `needle`.
        pub fn failing_output(mut self, needle: &str) -> Self {
            self.failing_outputs.push(needle.to_string());
            self
        }

        pub fn get_encodes(&self) -> Vec<RecordedEncode> {
            self.encodes.lock().unwrap().clone()
        }

        /// Recorded output file names, in encode order.
        pub fn output_names(&self) -> Vec<String> {
            self.get_encodes()
                .iter()
                .map(|e| e.output.file_name().unwrap().to_string_lossy().to_string())
                .collect()
        }
    }

    impl ImageCodec for MockCodec {
        fn decode(&self, path: &Path) -> Result<DecodedImage, CodecError> {
            let name = path.file_name().unwrap().to_string_lossy().to_string();
            let (dims, orientation) = self
                .sources
                .get(&name)
                .copied()
                .ok_or_else(|| CodecError::Decode(format!("corrupt image {}", path.display())))?;
            Ok(DecodedImage {
                pixels: DynamicImage::new_rgb8(dims.width, dims.height),
                orientation,
            })
        }

        fn encode(&self, image: &DynamicImage, params: &EncodeParams) -> Result<(), CodecError> {
            let name = params.output.to_string_lossy();
            if self.failing_outputs.iter().any(|n| name.contains(n.as_str())) {
                return Err(CodecError::Encode(format!("disk full: {name}")));
            }
            self.encodes.lock().unwrap().push(RecordedEncode {
                output: params.output.clone(),
                width: image.width(),
                height: image.height(),
                quality: params.quality.value(),
                format: params.format,
            });
            Ok(())
        }
    }

    #[test]
    fn mock_decodes_known_images() {
        let codec = MockCodec::new().with_image("a.jpg", 800, 600);
        let decoded = codec.decode(Path::new("/photos/a.jpg")).unwrap();
        assert_eq!(
            decoded.dimensions(),
            Dimensions {
                width: 800,
                height: 600
            }
        );
        assert_eq!(decoded.orientation, None);
    }

    #[test]
    fn mock_rejects_unknown_images() {
        let codec = MockCodec::new();
        let result = codec.decode(Path::new("/photos/broken.jpg"));
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn mock_records_encode() {
        let codec = MockCodec::new();
        codec
            .encode(
                &DynamicImage::new_rgb8(320, 240),
                &EncodeParams {
                    output: "/photos/a@sm_1x.webp".into(),
                    format: OutputFormat::Webp,
                    quality: Quality::new(80),
                },
            )
            .unwrap();

        let encodes = codec.get_encodes();
        assert_eq!(encodes.len(), 1);
        assert!(matches!(
            &encodes[0],
            RecordedEncode {
                width: 320,
                height: 240,
                quality: 80,
                format: OutputFormat::Webp,
                ..
            }
        ));
        assert_eq!(codec.output_names(), vec!["a@sm_1x.webp"]);
    }

    #[test]
    fn mock_fails_selected_outputs() {
        let codec = MockCodec::new().failing_output("@md");
        let result = codec.encode(
            &DynamicImage::new_rgb8(1, 1),
            &EncodeParams {
                output: "/photos/a@md_1x.webp".into(),
                format: OutputFormat::Webp,
                quality: Quality::MAX,
            },
        );
        assert!(matches!(result, Err(CodecError::Encode(_))));
        assert!(codec.get_encodes().is_empty());
    }
}
