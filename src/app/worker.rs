use std::time::Duration;

use crate::editor::{EditorResult, PendingUpload, UploadPoll, UploadTicket};
use image::RgbaImage;

pub(super) const UPLOAD_POLL_INTERVAL: Duration = Duration::from_millis(24);

/// Hands a finished background decode back to the GTK main loop.
pub(super) fn poll_pending_upload<H>(pending: PendingUpload, mut on_result: H)
where
    H: FnMut(UploadTicket, EditorResult<RgbaImage>) + 'static,
{
    gtk4::glib::timeout_add_local(UPLOAD_POLL_INTERVAL, move || match pending.poll() {
        UploadPoll::Ready(result) => {
            on_result(pending.ticket(), result);
            gtk4::glib::ControlFlow::Break
        }
        UploadPoll::Pending => gtk4::glib::ControlFlow::Continue,
        UploadPoll::Abandoned => {
            tracing::warn!(
                ticket = pending.ticket().sequence(),
                "decode worker exited without a result"
            );
            gtk4::glib::ControlFlow::Break
        }
    });
}
