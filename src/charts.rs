use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::GenericImageView;

use crate::backend::{BackendError, SentimentCounts, SentimentPoint};
use crate::data::ChartService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Distribution,
    Trend,
    WordCloud,
}

impl ChartKind {
    /// Fixed render order; each entry fails independently of the others.
    pub const ALL: [ChartKind; 3] = [
        ChartKind::Distribution,
        ChartKind::Trend,
        ChartKind::WordCloud,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ChartKind::Distribution => "sentiment_distribution",
            ChartKind::Trend => "sentiment_trend",
            ChartKind::WordCloud => "wordcloud",
        }
    }

    pub fn section_title(&self) -> &'static str {
        match self {
            ChartKind::Distribution => "Sentiment Analysis Results",
            ChartKind::Trend => "Sentiment Trend Over Time",
            ChartKind::WordCloud => "Comment Wordcloud",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            ChartKind::Distribution => "Error fetching chart image.",
            ChartKind::Trend => "Error fetching trend graph image.",
            ChartKind::WordCloud => "Error fetching word cloud image.",
        }
    }
}

pub struct ChartInputs<'a> {
    pub counts: &'a SentimentCounts,
    pub points: &'a [SentimentPoint],
    pub texts: &'a [String],
}

#[derive(Debug)]
pub struct SavedChart {
    pub kind: ChartKind,
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("decode chart image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("write chart image: {0}")]
    Io(#[from] io::Error),
}

pub fn fetch(
    service: &dyn ChartService,
    kind: ChartKind,
    inputs: &ChartInputs<'_>,
) -> Result<Vec<u8>, BackendError> {
    match kind {
        ChartKind::Distribution => service.render_distribution(inputs.counts),
        ChartKind::Trend => service.render_trend(inputs.points),
        ChartKind::WordCloud => service.render_wordcloud(inputs.texts),
    }
}

/// Validates that the payload decodes as an image, then writes the original
/// bytes to `<out_dir>/<video_id>_<slug>.<ext>` with the extension taken from
/// the sniffed format.
pub fn save(
    kind: ChartKind,
    video_id: &str,
    bytes: &[u8],
    out_dir: &Path,
) -> Result<SavedChart, ChartError> {
    let format = image::guess_format(bytes)?;
    let decoded = image::load_from_memory(bytes)?;
    let (width, height) = decoded.dimensions();
    let ext = format.extensions_str().first().copied().unwrap_or("png");

    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(format!("{video_id}_{}.{ext}", kind.slug()));
    fs::write(&path, bytes)?;

    Ok(SavedChart {
        kind,
        path,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::ImageFormat;

    use super::*;
    use crate::data::MockChartService;

    fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
        let mut cursor = Cursor::new(Vec::new());
        img.write_to(&mut cursor, format).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn saves_png_payload_under_the_slugged_name() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = encoded_image(2, 1, ImageFormat::Png);
        let saved = save(ChartKind::Distribution, "dQw4w9WgXcQ", &bytes, dir.path()).unwrap();
        assert_eq!(
            saved.path.file_name().unwrap().to_str().unwrap(),
            "dQw4w9WgXcQ_sentiment_distribution.png"
        );
        assert_eq!((saved.width, saved.height), (2, 1));
        assert_eq!(fs::read(&saved.path).unwrap(), bytes);
    }

    #[test]
    fn extension_follows_the_sniffed_format() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = encoded_image(1, 1, ImageFormat::Jpeg);
        let saved = save(ChartKind::WordCloud, "vid", &bytes, dir.path()).unwrap();
        let name = saved.path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("vid_wordcloud."), "{name}");
        assert!(name.ends_with(".jpg") || name.ends_with(".jpeg"), "{name}");
    }

    #[test]
    fn rejects_payloads_that_are_not_images() {
        let dir = tempfile::tempdir().unwrap();
        let err = save(ChartKind::Trend, "vid", b"<html>busy</html>", dir.path()).unwrap_err();
        assert!(matches!(err, ChartError::Decode(_)));
    }

    #[test]
    fn each_kind_fetches_from_its_own_endpoint_and_fails_alone() {
        let service = MockChartService::failing("renderer down");
        let counts = SentimentCounts::default();
        let inputs = ChartInputs {
            counts: &counts,
            points: &[],
            texts: &[],
        };
        for kind in ChartKind::ALL {
            let err = fetch(&service, kind, &inputs).unwrap_err();
            assert_eq!(err.to_string(), "renderer down");
        }
    }
}
