use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::editor::{upload, OverlayEditor, UploadOutcome};
use crate::error::AppResult;
use crate::storage::ExportService;

use gtk4::prelude::*;
use gtk4::{ApplicationWindow, Button, DrawingArea, Label, ResponseType};

use super::worker::poll_pending_upload;

#[derive(Clone)]
pub(super) struct EditorShell {
    pub(super) window: ApplicationWindow,
    pub(super) canvas: DrawingArea,
    pub(super) editor: Rc<RefCell<OverlayEditor>>,
    pub(super) export_service: Rc<Option<ExportService>>,
    pub(super) status_label: Label,
    pub(super) help_label: Label,
    pub(super) download_button: Button,
    #[allow(deprecated)]
    pub(super) open_dialog: Rc<RefCell<Option<gtk4::FileChooserNative>>>,
}

impl EditorShell {
    fn set_status(&self, message: impl AsRef<str>) {
        self.status_label.set_text(message.as_ref());
    }

    fn reveal_loaded_controls(&self) {
        self.help_label.set_visible(true);
        self.download_button.set_visible(true);
    }
}

#[allow(deprecated)]
pub(super) fn open_image_dialog(shell: &EditorShell) {
    if shell.open_dialog.borrow().is_some() {
        return;
    }
    let dialog = gtk4::FileChooserNative::new(
        Some("Open image"),
        Some(&shell.window),
        gtk4::FileChooserAction::Open,
        Some("_Open"),
        Some("_Cancel"),
    );
    let filter = gtk4::FileFilter::new();
    filter.set_name(Some("Images"));
    filter.add_mime_type("image/*");
    dialog.add_filter(&filter);

    let shell_for_response = shell.clone();
    dialog.connect_response(move |dialog, response| {
        let selected = (response == ResponseType::Accept)
            .then(|| dialog.file().and_then(|file| file.path()))
            .flatten();
        shell_for_response.open_dialog.borrow_mut().take();
        match selected {
            Some(path) => start_background_upload(&shell_for_response, path),
            None => tracing::debug!("no image selected"),
        }
    });
    dialog.show();
    shell.open_dialog.borrow_mut().replace(dialog);
}

pub(super) fn start_background_upload(shell: &EditorShell, path: PathBuf) {
    let (ticket, surface_size) = {
        let mut editor = shell.editor.borrow_mut();
        (editor.begin_upload(), editor.surface_size())
    };
    shell.set_status(format!("Loading {}", path.display()));
    let pending = upload::spawn_decode(ticket, path, surface_size);

    let shell = shell.clone();
    poll_pending_upload(pending, move |ticket, result| {
        let outcome = shell.editor.borrow_mut().finish_upload(ticket, result);
        match outcome {
            UploadOutcome::Applied => {
                shell.set_status("Image loaded");
                shell.reveal_loaded_controls();
                shell.canvas.queue_draw();
            }
            UploadOutcome::Superseded => {}
            UploadOutcome::Failed(err) => {
                shell.set_status(format!("Could not load image: {err}"));
            }
        }
    });
}

pub(super) fn download_current_frame(shell: &EditorShell) {
    let Some(service) = shell.export_service.as_ref() else {
        shell.set_status("Export unavailable: no export directory");
        return;
    };
    match export_current_frame(&shell.editor, service) {
        Ok(path) => shell.set_status(format!("Saved {}", path.display())),
        Err(err) => {
            tracing::warn!(%err, "export failed");
            shell.set_status(format!("Export failed: {err}"));
        }
    }
}

fn export_current_frame(
    editor: &RefCell<OverlayEditor>,
    service: &ExportService,
) -> AppResult<PathBuf> {
    let bytes = editor.borrow_mut().export_png()?;
    Ok(service.save(&bytes)?)
}
