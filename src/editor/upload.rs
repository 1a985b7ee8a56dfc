use std::path::{Path, PathBuf};
use std::sync::mpsc;

use image::RgbaImage;

use super::{EditorError, EditorResult};
use crate::geometry::SurfaceSize;
use crate::render;

/// Identifies one upload request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UploadTicket(u64);

impl UploadTicket {
    pub(super) const fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    pub const fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub enum UploadOutcome {
    Applied,
    /// A newer upload was started after this one; the result was dropped.
    Superseded,
    Failed(EditorError),
}

pub fn decode_image(bytes: &[u8]) -> EditorResult<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|decoded| decoded.to_rgba8())
        .map_err(EditorError::Decode)
}

pub fn read_image(path: &Path) -> EditorResult<RgbaImage> {
    let bytes = std::fs::read(path).map_err(|source| EditorError::ReadSource {
        path: path.to_path_buf(),
        source,
    })?;
    decode_image(&bytes)
}

/// Reads, decodes and stretches `path` to the surface, ready to become the background.
pub fn read_background(path: &Path, surface: SurfaceSize) -> EditorResult<RgbaImage> {
    read_image(path).map(|decoded| render::stretch_to_surface(&decoded, surface))
}

#[derive(Debug)]
pub enum UploadPoll {
    Pending,
    Ready(EditorResult<RgbaImage>),
    /// The worker went away without producing a result.
    Abandoned,
}

/// Decode running on a worker thread, tagged with the ticket it was started for.
#[derive(Debug)]
pub struct PendingUpload {
    ticket: UploadTicket,
    receiver: mpsc::Receiver<EditorResult<RgbaImage>>,
}

impl PendingUpload {
    pub fn ticket(&self) -> UploadTicket {
        self.ticket
    }

    pub fn poll(&self) -> UploadPoll {
        match self.receiver.try_recv() {
            Ok(result) => UploadPoll::Ready(result),
            Err(mpsc::TryRecvError::Empty) => UploadPoll::Pending,
            Err(mpsc::TryRecvError::Disconnected) => UploadPoll::Abandoned,
        }
    }

    /// Blocks until the worker finishes. Used by headless callers.
    pub fn wait(self) -> Option<EditorResult<RgbaImage>> {
        self.receiver.recv().ok()
    }
}

/// Reads, decodes and stretches `path` to `surface` off the calling thread.
///
/// Dropping the returned [`PendingUpload`] discards the result once the
/// worker finishes; decoding itself cannot be interrupted.
pub fn spawn_decode(ticket: UploadTicket, path: PathBuf, surface: SurfaceSize) -> PendingUpload {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = read_background(&path, surface);
        if let Err(err) = &result {
            tracing::debug!(ticket = ticket.sequence(), %err, "background decode failed");
        }
        let _ = tx.send(result);
    });
    PendingUpload {
        ticket,
        receiver: rx,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("png encode should work");
        bytes
    }

    #[test]
    fn decode_image_accepts_png_bytes() {
        let decoded = decode_image(&png_bytes(3, 2)).expect("valid png should decode");
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(*decoded.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn decode_image_rejects_non_image_bytes() {
        let err = decode_image(b"definitely not an image").expect_err("garbage should fail");
        assert!(matches!(err, EditorError::Decode(_)));
    }

    #[test]
    fn read_image_reports_missing_file_path() {
        let path = std::env::temp_dir().join("yeti-goggles-missing-upload.png");
        let _ = std::fs::remove_file(&path);

        let err = read_image(&path).expect_err("missing file should fail");
        assert!(matches!(err, EditorError::ReadSource { path: ref failed, .. } if *failed == path));
    }

    #[test]
    fn spawn_decode_delivers_surface_sized_result_for_its_ticket() {
        let path = std::env::temp_dir().join("yeti-goggles-spawn-decode.png");
        std::fs::write(&path, png_bytes(64, 48)).expect("write fixture");

        let pending = spawn_decode(UploadTicket::new(7), path.clone(), SurfaceSize::square(40));
        assert_eq!(pending.ticket().sequence(), 7);
        let prepared = pending
            .wait()
            .expect("worker should send a result")
            .expect("fixture should decode");
        assert_eq!(prepared.dimensions(), (40, 40));
        assert_eq!(*prepared.get_pixel(39, 39), Rgba([10, 20, 30, 255]));

        let _ = std::fs::remove_file(path);
    }
}
