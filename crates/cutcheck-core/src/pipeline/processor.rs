//! Pipeline orchestration: wires every stage together for one file.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, LimitsConfig, ReportConfig};
use crate::error::{ConfigError, PipelineError, PipelineResult};
use crate::types::{SubmissionSpec, ValidationReport};

use super::decode::{ContainerDecoder, LayeredDecoder};
use super::dispatch::FormatDispatcher;
use super::hash::Hasher;
use super::metadata::MetadataExtractor;
use super::pixels::PixelClassifier;
use super::preview::PreviewRenderer;
use super::report::ReportBuilder;
use super::state::{PipelineRun, PipelineState};
use super::validate::DimensionValidator;

/// Runs the check pipeline against one submission profile.
///
/// Every finding ends up as a row in the returned [`ValidationReport`]. The
/// only `Err` a check can produce is a layered-decode timeout, for which no
/// report data exists.
pub struct Checker {
    decoder: ContainerDecoder,
    validator: DimensionValidator,
    classifier: PixelClassifier,
    preview: PreviewRenderer,
    limits: LimitsConfig,
    report: ReportConfig,
}

impl Checker {
    /// Create a checker for the config's active profile.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let spec = config.active_spec()?.clone();
        Ok(Self::with_spec(config, spec))
    }

    /// Create a checker for an explicit profile.
    pub fn with_spec(config: &Config, spec: SubmissionSpec) -> Self {
        Self {
            decoder: ContainerDecoder::new(&config.limits),
            validator: DimensionValidator::new(spec),
            classifier: PixelClassifier::new(config.pixels.tolerance),
            preview: PreviewRenderer::new(config.preview.clone()),
            limits: config.limits.clone(),
            report: config.report.clone(),
        }
    }

    /// Replace the layered-document decoding capability.
    pub fn with_layered_decoder(mut self, layered: Arc<dyn LayeredDecoder>) -> Self {
        self.decoder = ContainerDecoder::with_layered_decoder(&self.limits, layered);
        self
    }

    pub fn spec(&self) -> &SubmissionSpec {
        self.validator.spec()
    }

    /// Check a file already read into memory.
    pub async fn check(
        &self,
        file_name: &str,
        bytes: impl Into<Arc<[u8]>>,
    ) -> PipelineResult<ValidationReport> {
        let bytes: Arc<[u8]> = bytes.into();
        let start = Instant::now();
        let mut run = PipelineRun::new(file_name);

        run.advance(PipelineState::Dispatching);
        let mut builder = ReportBuilder::new(file_name, bytes.len() as u64, &self.spec().id)
            .with_config(&self.limits, &self.report);
        builder.content_hash(Hasher::content_hash_from_bytes(&bytes));

        let (container, format_row) = FormatDispatcher::outcome(file_name);
        builder.format(container, format_row);
        let Some(kind) = container else {
            run.advance(PipelineState::RejectedFormat);
            tracing::info!(file = file_name, "rejected: unsupported format");
            return Ok(builder.build(run.state()));
        };

        run.advance(PipelineState::Decoding);
        let decode_start = Instant::now();
        let decoded = match self.decoder.decode(kind, file_name, bytes).await {
            Ok(decoded) => decoded,
            Err(e @ PipelineError::DecodeTimeout { .. }) => {
                run.advance(PipelineState::DecodeTimedOut);
                return Err(e);
            }
            // a decoder that gave up on its cancel token ran out of time
            Err(PipelineError::Cancelled { file }) => {
                run.advance(PipelineState::DecodeTimedOut);
                return Err(PipelineError::DecodeTimeout {
                    file,
                    timeout_ms: self.limits.layered_decode_timeout_ms,
                });
            }
            Err(e) => {
                let message = match e {
                    PipelineError::Decode { message, .. } => message,
                    other => other.to_string(),
                };
                builder.decode_failure(&message);
                run.advance(PipelineState::ReportReady);
                let report = builder.build(run.state());
                tracing::info!(file = file_name, blocked = true, "decode failed");
                return Ok(report);
            }
        };
        tracing::trace!("  Decode: {:?}", decode_start.elapsed());

        if let Some(info) = &decoded.layered {
            builder.metadata(MetadataExtractor::outcomes(info));
            run.advance(PipelineState::MetadataExtracted);
        }

        builder.dimensions(self.validator.validate(decoded.width, decoded.height));
        run.advance(PipelineState::DimensionChecked);

        let scan_start = Instant::now();
        builder.tally(self.classifier.classify(&decoded.pixels));
        run.advance(PipelineState::PixelClassified);
        tracing::trace!("  Pixel scan: {:?}", scan_start.elapsed());

        builder.preview(self.preview.render(&decoded.pixels));
        run.advance(PipelineState::ReportReady);

        let report = builder.build(run.state());
        tracing::info!(
            file = file_name,
            width = decoded.width,
            height = decoded.height,
            blocked = report.has_blocking_error,
            "checked in {:?}",
            start.elapsed()
        );
        Ok(report)
    }

    /// Read a file from disk and check it.
    pub async fn check_path(&self, path: &Path) -> PipelineResult<ValidationReport> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PipelineError::FileNotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(PipelineError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        self.check(&file_name, bytes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::cancel::CancelToken;
    use crate::pipeline::decode::LayeredDocument;
    use crate::pipeline::psd::test_support::{LayerSpec, PsdBuilder};
    use crate::types::{Field, FieldStatus};
    use async_trait::async_trait;

    fn checker() -> Checker {
        let mut config = Config::default();
        config.preview.enabled = false;
        Checker::with_spec(&config, SubmissionSpec::new("TEST", 8, 4))
    }

    fn status(report: &ValidationReport, field: Field) -> FieldStatus {
        report.field(field).unwrap().status
    }

    #[tokio::test]
    async fn test_grayscale_flattened_document() {
        let bytes = PsdBuilder::grayscale(8, 4, 100).build();
        let report = checker().check("page.psd", bytes).await.unwrap();

        assert_eq!(report.state, PipelineState::ReportReady);
        assert_eq!(status(&report, Field::ColorMode), FieldStatus::Ok);
        assert_eq!(status(&report, Field::Layers), FieldStatus::Ok);
        assert_eq!(status(&report, Field::Width), FieldStatus::Ok);
        assert_eq!(status(&report, Field::Height), FieldStatus::Ok);
        assert!(!report.has_blocking_error);
        assert!(report.advisories.is_empty());
        assert!(report.can_submit());
    }

    #[tokio::test]
    async fn test_rgb_with_three_layers_warns() {
        let bytes = PsdBuilder::rgb(8, 4, [200, 10, 10])
            .layer(LayerSpec::pixel("Background"))
            .layer(LayerSpec::pixel("Ink"))
            .layer(LayerSpec::text("Title"))
            .build();
        let report = checker().check("page.psd", bytes).await.unwrap();

        let mode = report.field(Field::ColorMode).unwrap();
        assert_eq!(mode.value, "RGBColor");
        assert_eq!(mode.status, FieldStatus::Warn);
        let layers = report.field(Field::Layers).unwrap();
        assert_eq!(layers.value, "3");
        assert_eq!(layers.status, FieldStatus::Warn);
        assert!(!report.has_blocking_error);

        let tally = report.tally.unwrap();
        assert_eq!(tally.color, 32);
        assert_eq!(report.advisories.len(), 1);
    }

    #[tokio::test]
    async fn test_lab_document_blocks() {
        let bytes = PsdBuilder::lab(8, 4, [128, 128, 128]).build();
        let report = checker().check("page.psd", bytes).await.unwrap();
        assert_eq!(status(&report, Field::ColorMode), FieldStatus::Error);
        assert!(report.has_blocking_error);
        assert!(!report.can_submit());
    }

    #[tokio::test]
    async fn test_malformed_document_reports_decode_failure() {
        let report = checker()
            .check("page.psd", b"8BPS\x00\x07".to_vec())
            .await
            .unwrap();
        assert_eq!(report.state, PipelineState::ReportReady);
        assert_eq!(status(&report, Field::Image), FieldStatus::Error);
        assert!(report.field(Field::Width).is_none());
        assert!(report.tally.is_none());
        assert!(report.has_blocking_error);
    }

    #[tokio::test]
    async fn test_unsupported_extension_skips_decode() {
        let report = checker()
            .check("anim.gif", b"GIF89a".to_vec())
            .await
            .unwrap();
        assert_eq!(report.state, PipelineState::RejectedFormat);
        assert_eq!(report.errors().count(), 1);
        assert_eq!(report.errors().next().unwrap().field, Field::Format);
        assert!(report.tally.is_none());
        assert!(report.has_blocking_error);
    }

    struct StalledDecoder;

    #[async_trait]
    impl LayeredDecoder for StalledDecoder {
        async fn decode(
            &self,
            _file: &str,
            _bytes: Arc<[u8]>,
            _cancel: CancelToken,
        ) -> Result<LayeredDocument, PipelineError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_layered_timeout_is_the_only_err() {
        let checker = checker().with_layered_decoder(Arc::new(StalledDecoder));
        let err = checker.check("slow.psd", b"8BPS".to_vec()).await.unwrap_err();
        assert!(matches!(err, PipelineError::DecodeTimeout { .. }));
    }

    /// Stops at once, as if its cancel token had already tripped.
    struct GivingUpDecoder;

    #[async_trait]
    impl LayeredDecoder for GivingUpDecoder {
        async fn decode(
            &self,
            file: &str,
            _bytes: Arc<[u8]>,
            _cancel: CancelToken,
        ) -> Result<LayeredDocument, PipelineError> {
            Err(PipelineError::Cancelled {
                file: file.to_string(),
            })
        }
    }

    /// Fails with an error kind that is not a decode error.
    struct MissingResourceDecoder;

    #[async_trait]
    impl LayeredDecoder for MissingResourceDecoder {
        async fn decode(
            &self,
            _file: &str,
            _bytes: Arc<[u8]>,
            _cancel: CancelToken,
        ) -> Result<LayeredDocument, PipelineError> {
            Err(PipelineError::FileNotFound("/fonts/missing.ttf".into()))
        }
    }

    #[tokio::test]
    async fn test_cancelled_decoder_ends_as_timeout() {
        let checker = checker().with_layered_decoder(Arc::new(GivingUpDecoder));
        match checker.check("slow.psd", b"8BPS".to_vec()).await.unwrap_err() {
            PipelineError::DecodeTimeout { file, timeout_ms } => {
                assert_eq!(file, "slow.psd");
                assert_eq!(timeout_ms, 10_000);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_decoder_errors_become_image_rows() {
        let checker = checker().with_layered_decoder(Arc::new(MissingResourceDecoder));
        let report = checker.check("page.psd", b"8BPS".to_vec()).await.unwrap();

        assert_eq!(report.state, PipelineState::ReportReady);
        let image = report.field(Field::Image).unwrap();
        assert_eq!(image.status, FieldStatus::Error);
        assert!(image.note.as_deref().unwrap().contains("missing.ttf"));
        assert!(report.has_blocking_error);
    }

    #[tokio::test]
    async fn test_document_over_alloc_budget_is_reported() {
        let mut config = Config::default();
        config.preview.enabled = false;
        config.limits.max_alloc_bytes = 64;
        let checker = Checker::with_spec(&config, SubmissionSpec::new("TEST", 8, 4));
        let bytes = PsdBuilder::grayscale(8, 4, 0).rle().build();

        let report = checker.check("page.psd", bytes).await.unwrap();
        assert_eq!(report.state, PipelineState::ReportReady);
        assert_eq!(status(&report, Field::Image), FieldStatus::Error);
        assert!(report.tally.is_none());
        assert!(!report.can_submit());
    }

    #[tokio::test]
    async fn test_check_path_unreadable_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = checker().check_path(dir.path()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Read { .. }));
    }

    #[tokio::test]
    async fn test_check_path_missing_file() {
        let err = checker()
            .check_path(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_preview_attached_when_enabled() {
        let config = Config::default();
        let checker = Checker::with_spec(&config, SubmissionSpec::new("TEST", 8, 4));
        let report = checker
            .check("page.psd", PsdBuilder::grayscale(8, 4, 0).build())
            .await
            .unwrap();
        assert!(report.preview.is_some());
    }
}
