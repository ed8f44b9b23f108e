//! Transform service on real image files.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use devkit_adapters::{ImageRsCodec, LocalFilesystem};
use devkit_core::prelude::*;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::TempDir;

fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 3 % 256) as u8, 90, 255])
    });
    img.save(dir.join(name)).unwrap();
}

fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 40]));
    DynamicImage::ImageRgb8(img)
        .save_with_format(dir.join(name), image::ImageFormat::Jpeg)
        .unwrap();
}

fn service() -> TransformService<ImageRsCodec> {
    TransformService::new(ImageRsCodec::new(), Box::new(LocalFilesystem::new()))
}

/// Compressor that always answers with the same error and remembers the
/// uploads it saw.
struct RejectingCompressor {
    error: CompressionError,
    uploads: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl ImageCompressor for RejectingCompressor {
    fn compress(&self, source: &Path) -> Result<Vec<u8>, CompressionError> {
        self.uploads.lock().unwrap().push(fs::read(source).unwrap());
        Err(self.error.clone())
    }
}

struct ShrinkingCompressor;

impl ImageCompressor for ShrinkingCompressor {
    fn compress(&self, source: &Path) -> Result<Vec<u8>, CompressionError> {
        let bytes = fs::read(source).unwrap();
        Ok(bytes[..bytes.len() / 2].to_vec())
    }
}

#[test]
fn test_every_output_is_target_size() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(input.path(), "landscape.png", 192, 108);
    write_png(input.path(), "portrait.PNG", 50, 200);
    write_jpeg(input.path(), "square.jpeg", 64, 64);
    write_png(input.path(), "exact.png", 1242, 2688);
    fs::write(input.path().join("notes.txt"), "skip").unwrap();

    let report = service()
        .run_batch(input.path(), &output.path().join("out"), |_| {})
        .unwrap();

    assert_eq!(report.files.len(), 4);
    assert_eq!(report.saved(), 4);
    for file in &report.files {
        let img = image::open(output.path().join("out").join(&file.name)).unwrap();
        assert_eq!(img.dimensions(), (1242, 2688), "{}", file.name);
    }
    assert!(!output.path().join("out/notes.txt").exists());
}

#[test]
fn test_output_keeps_input_format() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_jpeg(input.path(), "photo.jpg", 30, 60);

    service()
        .run_batch(input.path(), output.path(), |_| {})
        .unwrap();

    let bytes = fs::read(output.path().join("photo.jpg")).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_corrupt_file_does_not_stop_batch() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    fs::write(input.path().join("broken.png"), b"not an image").unwrap();
    write_png(input.path(), "good.png", 20, 40);

    let mut seen = Vec::new();
    let report = service()
        .run_batch(input.path(), output.path(), |outcome| {
            seen.push((outcome.name.clone(), outcome.is_saved()))
        })
        .unwrap();

    seen.sort();
    assert_eq!(
        seen,
        vec![("broken.png".to_string(), false), ("good.png".to_string(), true)]
    );
    assert_eq!(report.failed(), 1);
    assert!(output.path().join("good.png").is_file());
    assert!(!output.path().join("broken.png").exists());
}

#[test]
fn test_rejected_compression_saves_uncompressed_crop() {
    let input = TempDir::new().unwrap();
    let plain_out = TempDir::new().unwrap();
    let fallback_out = TempDir::new().unwrap();
    write_png(input.path(), "shot.png", 100, 150);

    service()
        .run_batch(input.path(), plain_out.path(), |_| {})
        .unwrap();

    for error in [
        CompressionError::Unauthorized,
        CompressionError::RateLimited,
        CompressionError::BadRequest {
            message: "bad".into(),
        },
    ] {
        let uploads = Arc::new(Mutex::new(Vec::new()));
        let report = service()
            .with_compressor(Box::new(RejectingCompressor {
                error: error.clone(),
                uploads: uploads.clone(),
            }))
            .run_batch(input.path(), fallback_out.path(), |_| {})
            .unwrap();

        let expected = fs::read(plain_out.path().join("shot.png")).unwrap();
        let actual = fs::read(fallback_out.path().join("shot.png")).unwrap();
        assert_eq!(actual, expected, "fallback for {error}");
        assert_eq!(uploads.lock().unwrap().as_slice(), &[expected]);
        assert!(matches!(
            &report.files[0].status,
            FileStatus::Saved {
                compression: CompressionOutcome::FellBack { .. },
                ..
            }
        ));
        assert!(!fallback_out.path().join("shot.png.tmp").exists());
    }
}

#[test]
fn test_compressed_bytes_are_written() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_png(input.path(), "shot.png", 80, 80);

    let report = service()
        .with_compressor(Box::new(ShrinkingCompressor))
        .run_batch(input.path(), output.path(), |_| {})
        .unwrap();

    let FileStatus::Saved {
        compression:
            CompressionOutcome::Compressed {
                original_bytes,
                compressed_bytes,
            },
        ..
    } = report.files[0].status
    else {
        panic!("expected compressed outcome: {:?}", report.files[0]);
    };
    assert_eq!(compressed_bytes, original_bytes / 2);
    assert_eq!(
        fs::metadata(output.path().join("shot.png")).unwrap().len(),
        compressed_bytes
    );
    assert!(!output.path().join("shot.png.tmp").exists());
}
