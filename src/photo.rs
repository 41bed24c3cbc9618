use futures::FutureExt;
use image::ImageReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// An image file on disk whose header decoded successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: Option<String>,
}

impl Photo {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn describe(&self) -> String {
        format!(
            "{} ({}x{}{})",
            self.file_name(),
            self.width,
            self.height,
            self.format
                .as_deref()
                .map(|f| format!(", {f}"))
                .unwrap_or_default()
        )
    }
}

#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("photo loader stopped before answering")]
    Interrupted,
}

/// Result of one trip through the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Selected(Photo),
    Cancelled,
}

impl PickOutcome {
    /// Applies the outcome to a form's photo slot. A cancelled pick keeps what was there.
    pub fn apply(self, slot: &mut Option<Photo>) {
        if let PickOutcome::Selected(photo) = self {
            *slot = Some(photo);
        }
    }
}

/// Reads the image header at `path` and reports its dimensions.
pub fn load_photo(path: &Path) -> Result<Photo, PhotoError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|source| PhotoError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    let format = reader.format().map(|f| format!("{f:?}").to_lowercase());
    let (width, height) = reader
        .into_dimensions()
        .map_err(|source| PhotoError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(Photo {
        path: path.to_path_buf(),
        width,
        height,
        format,
    })
}

/// A pick in flight. Polled from the UI loop until the loader answers.
pub struct PendingPick {
    rx: oneshot::Receiver<Result<PickOutcome, PhotoError>>,
}

impl PendingPick {
    /// Non-blocking check. `None` while the loader is still working.
    pub fn poll_ready(&mut self) -> Option<Result<PickOutcome, PhotoError>> {
        match (&mut self.rx).now_or_never() {
            Some(Ok(result)) => Some(result),
            Some(Err(_)) => Some(Err(PhotoError::Interrupted)),
            None => None,
        }
    }

    pub async fn wait(self) -> Result<PickOutcome, PhotoError> {
        self.rx.await.unwrap_or(Err(PhotoError::Interrupted))
    }
}

/// Starts a pick for the path typed by the user. `None` (prompt dismissed)
/// answers `Cancelled` without touching the disk.
///
/// Must be called from inside a tokio runtime.
pub fn pick_photo(choice: Option<PathBuf>) -> PendingPick {
    let (tx, rx) = oneshot::channel();

    match choice {
        None => {
            debug!("photo pick cancelled");
            let _ = tx.send(Ok(PickOutcome::Cancelled));
        }
        Some(path) => {
            tokio::task::spawn_blocking(move || {
                let result = load_photo(&path).map(PickOutcome::Selected);
                if let Err(e) = &result {
                    warn!(error = %e, "failed to load photo");
                }
                let _ = tx.send(result);
            });
        }
    }

    PendingPick { rx }
}

/// Folds a finished pick into a form's photo slot; failures leave it alone.
pub fn settle(result: Result<PickOutcome, PhotoError>, slot: &mut Option<Photo>) {
    match result {
        Ok(outcome) => outcome.apply(slot),
        Err(e) => debug!(error = %e, "photo pick failed, keeping previous selection"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn write_png(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
        let path = dir.join(name);
        RgbImage::new(w, h)
            .save_with_format(&path, ImageFormat::Png)
            .expect("write png");
        path
    }

    fn sample_photo() -> Photo {
        Photo {
            path: PathBuf::from("/tmp/old.png"),
            width: 1,
            height: 1,
            format: Some("png".into()),
        }
    }

    #[test]
    fn load_photo_reads_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "beach.png", 4, 3);

        let photo = load_photo(&path).unwrap();
        assert_eq!((photo.width, photo.height), (4, 3));
        assert_eq!(photo.format.as_deref(), Some("png"));
        assert_eq!(photo.file_name(), "beach.png");
        assert_eq!(photo.describe(), "beach.png (4x3, png)");
    }

    #[test]
    fn load_photo_rejects_missing_and_garbage_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_photo(&dir.path().join("nope.png")),
            Err(PhotoError::Open { .. })
        ));

        let junk = dir.path().join("junk.png");
        std::fs::write(&junk, b"definitely not an image").unwrap();
        assert!(load_photo(&junk).is_err());
    }

    #[test]
    fn cancelled_outcome_keeps_prior_selection() {
        let mut slot = Some(sample_photo());
        PickOutcome::Cancelled.apply(&mut slot);
        assert_eq!(slot, Some(sample_photo()));

        let mut empty = None;
        PickOutcome::Cancelled.apply(&mut empty);
        assert_eq!(empty, None);
    }

    #[test]
    fn failed_pick_keeps_prior_selection() {
        let mut slot = Some(sample_photo());
        settle(Err(PhotoError::Interrupted), &mut slot);
        assert_eq!(slot, Some(sample_photo()));
    }

    #[tokio::test]
    async fn dismissed_prompt_answers_cancelled_immediately() {
        let mut pending = pick_photo(None);
        assert!(matches!(pending.poll_ready(), Some(Ok(PickOutcome::Cancelled))));
    }

    #[tokio::test]
    async fn pick_selects_photo_over_the_channel() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "sunset.png", 2, 5);

        let outcome = pick_photo(Some(path.clone())).wait().await.unwrap();
        let mut slot = Some(sample_photo());
        outcome.apply(&mut slot);

        let photo = slot.unwrap();
        assert_eq!(photo.path, path);
        assert_eq!((photo.width, photo.height), (2, 5));
    }

    #[tokio::test]
    async fn pick_of_missing_file_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = pick_photo(Some(dir.path().join("gone.jpg"))).wait().await;
        assert!(result.is_err());
    }
}
