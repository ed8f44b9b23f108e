//! Transform Service - batch cover-fit, center crop and optional compression.
//!
//! Every supported image in the input directory is decoded, scaled so it
//! covers the target size, center-cropped to exactly the target size and
//! written under the same name in the output directory. With a compressor
//! configured, the encoded crop is uploaded first and the compressed bytes are
//! written instead; any service failure falls back to the uncompressed crop.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ports::{Filesystem, ImageCodec, ImageCompressor},
        report::{BatchReport, CompressionOutcome, FileOutcome, FileStatus},
        services::scratch::Scratch,
    },
    domain::{DomainError, Dimensions, ImageKind, ResizePlan, TARGET_SIZE},
    error::DevkitResult,
};

/// Batch image transformer.
pub struct TransformService<C: ImageCodec> {
    codec: C,
    filesystem: Box<dyn Filesystem>,
    compressor: Option<Box<dyn ImageCompressor>>,
    target: Dimensions,
}

impl<C: ImageCodec> TransformService<C> {
    /// Service producing [`TARGET_SIZE`] images without compression.
    pub fn new(codec: C, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            codec,
            filesystem,
            compressor: None,
            target: TARGET_SIZE,
        }
    }

    /// Upload every crop to `compressor` before saving.
    pub fn with_compressor(mut self, compressor: Box<dyn ImageCompressor>) -> Self {
        self.compressor = Some(compressor);
        self
    }

    /// Override the output size.
    pub fn with_target(mut self, target: Dimensions) -> Self {
        self.target = target;
        self
    }

    pub fn target(&self) -> Dimensions {
        self.target
    }

    pub fn compresses(&self) -> bool {
        self.compressor.is_some()
    }

    /// Supported image names in `input_dir`, in listing order.
    pub fn collect_inputs(&self, input_dir: &Path) -> DevkitResult<Vec<String>> {
        let names = self.filesystem.list_entry_names(input_dir)?;
        Ok(names
            .into_iter()
            .filter(|name| ImageKind::is_supported(name))
            .collect())
    }

    /// Process every supported image in `input_dir`.
    ///
    /// The output directory is created first. `on_file` is called after each
    /// file with its outcome, before the next file starts. A failing file is
    /// recorded and the batch moves on; only listing the input directory or
    /// creating the output directory fail the whole call.
    #[instrument(
        skip_all,
        fields(input = %input_dir.display(), output = %output_dir.display())
    )]
    pub fn run_batch(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        mut on_file: impl FnMut(&FileOutcome),
    ) -> DevkitResult<BatchReport> {
        self.filesystem.create_dir_all(output_dir)?;
        let names = self.collect_inputs(input_dir)?;
        let total = names.len();
        info!(total, target = %self.target, "Starting batch");

        let mut report = BatchReport {
            input_dir: input_dir.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            target: self.target,
            files: Vec::with_capacity(total),
        };

        for (i, name) in names.into_iter().enumerate() {
            let input = input_dir.join(&name);
            let output = output_dir.join(&name);

            let status = match self.process_file(&input, &output) {
                Ok(compression) => FileStatus::Saved {
                    output,
                    compression,
                },
                Err(e) => {
                    warn!(file = %name, error = %e, "File failed");
                    FileStatus::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            let outcome = FileOutcome {
                index: i + 1,
                total,
                name,
                status,
            };
            on_file(&outcome);
            report.files.push(outcome);
        }

        info!(saved = report.saved(), failed = report.failed(), "Batch finished");
        Ok(report)
    }

    /// Transform one image from `input` to `output`.
    #[instrument(skip_all, fields(input = %input.display()))]
    pub fn process_file(&self, input: &Path, output: &Path) -> DevkitResult<CompressionOutcome> {
        let kind = file_kind(input)?;
        let image = self.codec.decode(input)?;

        let plan = ResizePlan::new(self.codec.dimensions(&image), self.target)?;
        debug!(
            source = %plan.source,
            scaled = %plan.scaled,
            left = plan.crop.left,
            top = plan.crop.top,
            "Resize plan"
        );

        let scaled = self.codec.resize(&image, plan.scaled);
        let cropped = self.codec.crop(&scaled, plan.crop);
        let encoded = self.codec.encode(&cropped, kind)?;

        match &self.compressor {
            None => {
                self.filesystem.write_file(output, &encoded)?;
                Ok(CompressionOutcome::Disabled)
            }
            Some(compressor) => self.save_compressed(compressor.as_ref(), &encoded, output),
        }
    }

    /// Upload through a scratch file next to `output`, falling back to the
    /// uncompressed bytes on any service failure.
    fn save_compressed(
        &self,
        compressor: &dyn ImageCompressor,
        encoded: &[u8],
        output: &Path,
    ) -> DevkitResult<CompressionOutcome> {
        let scratch = Scratch::file(self.filesystem.as_ref(), scratch_path(output));
        self.filesystem.write_file(scratch.path(), encoded)?;

        let result = compressor.compress(scratch.path());
        if let Err(e) = scratch.remove() {
            warn!(error = %e, "Failed to remove upload scratch file");
        }

        match result {
            Ok(compressed) => {
                self.filesystem.write_file(output, &compressed)?;
                let outcome = CompressionOutcome::Compressed {
                    original_bytes: encoded.len() as u64,
                    compressed_bytes: compressed.len() as u64,
                };
                info!(
                    original = encoded.len(),
                    compressed = compressed.len(),
                    "Compressed"
                );
                Ok(outcome)
            }
            Err(reason) => {
                warn!(error = %reason, "Compression failed, saving uncompressed image");
                self.filesystem.write_file(output, encoded)?;
                Ok(CompressionOutcome::FellBack {
                    reason: reason.to_string(),
                })
            }
        }
    }
}

fn file_kind(path: &Path) -> DevkitResult<ImageKind> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    ImageKind::from_file_name(&name).ok_or_else(|| DomainError::UnsupportedImage(name).into())
}

/// `<output>.tmp`, in the output directory.
fn scratch_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    output.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::sync::{Arc, Mutex};

    use mockall::predicate::*;

    use super::*;
    use crate::application::ApplicationError;
    use crate::application::CompressionError;
    use crate::application::ports::{MockFilesystem, MockImageCompressor};
    use crate::domain::CropBox;

    /// Codec over plain sizes: "decoding" reads the size from the file name
    /// (`w x h` before the extension), anything else fails.
    #[derive(Default)]
    struct SizeCodec {
        resized: RefCell<Vec<Dimensions>>,
    }

    impl ImageCodec for SizeCodec {
        type Image = Dimensions;

        fn decode(&self, path: &Path) -> DevkitResult<Dimensions> {
            let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
            let parsed = stem
                .split_once('x')
                .and_then(|(w, h)| Some(Dimensions::new(w.parse().ok()?, h.parse().ok()?)));
            parsed.ok_or_else(|| {
                ApplicationError::ImageCodec {
                    path: path.to_path_buf(),
                    reason: "corrupt".into(),
                }
                .into()
            })
        }

        fn dimensions(&self, image: &Dimensions) -> Dimensions {
            *image
        }

        fn resize(&self, _image: &Dimensions, size: Dimensions) -> Dimensions {
            self.resized.borrow_mut().push(size);
            size
        }

        fn crop(&self, _image: &Dimensions, area: CropBox) -> Dimensions {
            area.size()
        }

        fn encode(&self, image: &Dimensions, kind: ImageKind) -> DevkitResult<Vec<u8>> {
            Ok(format!("{kind}:{image}").into_bytes())
        }
    }

    fn recording_fs(names: &[&str]) -> (MockFilesystem, Arc<Mutex<Vec<(PathBuf, Vec<u8>)>>>) {
        let written = Arc::new(Mutex::new(Vec::new()));
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();

        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_list_entry_names()
            .returning(move |_| Ok(names.clone()));
        let sink = Arc::clone(&written);
        fs.expect_write_file().returning(move |path, bytes| {
            sink.lock().unwrap().push((path.to_path_buf(), bytes.to_vec()));
            Ok(())
        });
        (fs, written)
    }

    #[test]
    fn every_saved_file_has_target_size() {
        let (fs, written) = recording_fs(&["1920x1080.png", "1080x1920.jpg", "1x1.JPEG"]);
        let service = TransformService::new(SizeCodec::default(), Box::new(fs));

        let report = service
            .run_batch(Path::new("in"), Path::new("out"), |_| {})
            .unwrap();

        assert_eq!(report.saved(), 3);
        let written = written.lock().unwrap();
        assert_eq!(written.len(), 3);
        assert_eq!(written[0].0, PathBuf::from("out/1920x1080.png"));
        assert_eq!(written[0].1, b"png:1242x2688".to_vec());
        assert_eq!(written[1].1, b"jpeg:1242x2688".to_vec());
        assert_eq!(written[2].1, b"jpeg:1242x2688".to_vec());
    }

    #[test]
    fn resize_uses_cover_fit_size() {
        let (fs, _) = recording_fs(&["1920x1080.png"]);
        let service = TransformService::new(SizeCodec::default(), Box::new(fs));
        service
            .run_batch(Path::new("in"), Path::new("out"), |_| {})
            .unwrap();
        assert_eq!(
            *service.codec.resized.borrow(),
            vec![Dimensions::new(4779, 2688)]
        );
    }

    #[test]
    fn unsupported_names_are_not_listed() {
        let (fs, written) = recording_fs(&["notes.txt", "10x10.gif", "10x20.png"]);
        let service = TransformService::new(SizeCodec::default(), Box::new(fs));

        let report = service
            .run_batch(Path::new("in"), Path::new("out"), |_| {})
            .unwrap();

        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].name, "10x20.png");
        assert_eq!(written.lock().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_file_does_not_stop_batch() {
        let (fs, written) = recording_fs(&["good1x2.png", "corrupt.png", "30x40.png"]);
        let service = TransformService::new(SizeCodec::default(), Box::new(fs));

        let mut seen = Vec::new();
        let report = service
            .run_batch(Path::new("in"), Path::new("out"), |f| {
                seen.push((f.index, f.total, f.is_saved()))
            })
            .unwrap();

        // "good1x2" fails to parse too; only the last file is valid
        assert_eq!(seen, vec![(1, 3, false), (2, 3, false), (3, 3, true)]);
        assert_eq!(report.failed(), 2);
        match &report.files[1].status {
            FileStatus::Failed { reason } => assert!(reason.contains("corrupt")),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(written.lock().unwrap().len(), 1);
    }

    #[test]
    fn empty_directory_yields_empty_report() {
        let (fs, written) = recording_fs(&[]);
        let service = TransformService::new(SizeCodec::default(), Box::new(fs));
        let report = service
            .run_batch(Path::new("in"), Path::new("out"), |_| {})
            .unwrap();
        assert!(report.is_empty());
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn compressed_bytes_replace_output_and_scratch_is_removed() {
        let (mut fs, written) = recording_fs(&["100x200.png"]);
        fs.expect_exists()
            .with(eq(PathBuf::from("out/100x200.png.tmp")))
            .returning(|_| true);
        fs.expect_remove_file()
            .with(eq(PathBuf::from("out/100x200.png.tmp")))
            .times(1)
            .returning(|_| Ok(()));

        let mut compressor = MockImageCompressor::new();
        compressor
            .expect_compress()
            .with(eq(PathBuf::from("out/100x200.png.tmp")))
            .times(1)
            .returning(|_| Ok(b"tiny".to_vec()));

        let service = TransformService::new(SizeCodec::default(), Box::new(fs))
            .with_compressor(Box::new(compressor));
        let report = service
            .run_batch(Path::new("in"), Path::new("out"), |_| {})
            .unwrap();

        match &report.files[0].status {
            FileStatus::Saved { compression, .. } => assert_eq!(
                compression,
                &CompressionOutcome::Compressed {
                    original_bytes: 13,
                    compressed_bytes: 4
                }
            ),
            other => panic!("unexpected: {other:?}"),
        }

        let written = written.lock().unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(written[0].0, PathBuf::from("out/100x200.png.tmp"));
        assert_eq!(written[1], (PathBuf::from("out/100x200.png"), b"tiny".to_vec()));
    }

    #[test]
    fn compression_failures_fall_back_to_uncompressed_crop() {
        for error in [
            CompressionError::Unauthorized,
            CompressionError::RateLimited,
            CompressionError::BadRequest {
                message: "Input file is empty".into(),
            },
        ] {
            let (mut fs, written) = recording_fs(&["100x200.png"]);
            fs.expect_exists().returning(|_| true);
            fs.expect_remove_file().times(1).returning(|_| Ok(()));

            let expected_reason = error.to_string();
            let mut compressor = MockImageCompressor::new();
            compressor
                .expect_compress()
                .returning(move |_| Err(error.clone()));

            let service = TransformService::new(SizeCodec::default(), Box::new(fs))
                .with_compressor(Box::new(compressor));
            let report = service
                .run_batch(Path::new("in"), Path::new("out"), |_| {})
                .unwrap();

            assert_eq!(
                report.files[0].status,
                FileStatus::Saved {
                    output: PathBuf::from("out/100x200.png"),
                    compression: CompressionOutcome::FellBack {
                        reason: expected_reason
                    },
                }
            );
            let written = written.lock().unwrap();
            assert_eq!(
                written.last().unwrap(),
                &(PathBuf::from("out/100x200.png"), b"png:1242x2688".to_vec())
            );
        }
    }

    #[test]
    fn custom_target_is_honoured() {
        let (fs, written) = recording_fs(&["40x30.jpg"]);
        let service = TransformService::new(SizeCodec::default(), Box::new(fs))
            .with_target(Dimensions::new(12, 26));
        service
            .run_batch(Path::new("in"), Path::new("out"), |_| {})
            .unwrap();
        assert_eq!(written.lock().unwrap()[0].1, b"jpeg:12x26".to_vec());
    }

    #[test]
    fn scratch_path_appends_suffix() {
        assert_eq!(
            scratch_path(Path::new("out/a.PNG")),
            PathBuf::from("out/a.PNG.tmp")
        );
    }
}
