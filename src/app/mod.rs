use std::cell::RefCell;
use std::rc::Rc;

use crate::config::AppConfig;
use crate::editor::{OverlayAsset, OverlayEditor};
use crate::error::{AppError, AppResult};
use crate::storage::ExportService;
use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow, Box as GtkBox, Button, Frame, Label, Orientation};

mod actions;
mod canvas;
mod gestures;
mod input_bridge;
mod worker;

use self::actions::*;
use self::canvas::*;
use self::gestures::*;

const APPLICATION_ID: &str = "io.github.yeti_goggles.Overlay";
const WINDOW_TITLE: &str = "Yeti Goggles Overlay";
const HELP_TEXT: &str =
    "Drag to move | Shift+Drag to resize | Alt+Drag to rotate | Pinch/Rotate with two fingers on touch screens";
const LAYOUT_SPACING: i32 = 12;

pub struct App {
    config: AppConfig,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn start(self) -> AppResult<()> {
        let overlay = OverlayAsset::load_or_empty(&self.config.overlay_path());
        let surface_size = self.config.surface_size();
        let export_service = match ExportService::from_config(&self.config) {
            Ok(service) => Some(service),
            Err(err) => {
                tracing::warn!(%err, "export directory unavailable; download disabled");
                None
            }
        };

        tracing::info!(
            width = surface_size.width,
            height = surface_size.height,
            overlay_loaded = !overlay.is_empty(),
            "starting gtk runtime"
        );
        let application = Application::new(
            Some(APPLICATION_ID),
            gtk4::gio::ApplicationFlags::NON_UNIQUE,
        );

        let editor = Rc::new(RefCell::new(OverlayEditor::new(surface_size, overlay)));
        let export_service = Rc::new(export_service);
        application.connect_activate(move |app| {
            let window = ApplicationWindow::new(app);
            window.set_title(Some(WINDOW_TITLE));
            window.set_resizable(false);

            let shell = build_editor_shell(&window, editor.clone(), export_service.clone());
            window.present();
            tracing::debug!(
                has_background = shell.editor.borrow().has_background(),
                "editor window presented"
            );
        });

        let exit_code = application.run_with_args::<&str>(&[]);
        tracing::info!(?exit_code, "gtk runtime finished");
        check_exit_code(exit_code)
    }
}

fn check_exit_code(exit_code: gtk4::glib::ExitCode) -> AppResult<()> {
    if exit_code == gtk4::glib::ExitCode::SUCCESS {
        Ok(())
    } else {
        Err(AppError::GtkExit {
            code: exit_code.value(),
        })
    }
}

fn build_editor_shell(
    window: &ApplicationWindow,
    editor: Rc<RefCell<OverlayEditor>>,
    export_service: Rc<Option<ExportService>>,
) -> EditorShell {
    let root = GtkBox::new(Orientation::Vertical, LAYOUT_SPACING);
    root.set_margin_top(LAYOUT_SPACING * 2);
    root.set_margin_bottom(LAYOUT_SPACING * 2);
    root.set_margin_start(LAYOUT_SPACING * 2);
    root.set_margin_end(LAYOUT_SPACING * 2);

    let title = Label::new(Some(WINDOW_TITLE));
    title.add_css_class("title-1");
    root.append(&title);

    let open_button = Button::with_label("Open image");
    open_button.set_halign(gtk4::Align::Center);
    root.append(&open_button);

    let canvas = build_editor_canvas(&editor);
    let canvas_frame = Frame::new(None);
    canvas_frame.set_halign(gtk4::Align::Center);
    canvas_frame.set_child(Some(&canvas));
    root.append(&canvas_frame);

    let help_label = Label::new(Some(HELP_TEXT));
    help_label.add_css_class("dim-label");
    help_label.set_wrap(true);
    help_label.set_visible(false);
    root.append(&help_label);

    let download_button = Button::with_label("Download image");
    download_button.add_css_class("suggested-action");
    download_button.set_halign(gtk4::Align::Center);
    download_button.set_visible(false);
    root.append(&download_button);

    let status_label = Label::new(Some("Open an image to get started."));
    status_label.set_xalign(0.0);
    root.append(&status_label);

    window.set_child(Some(&root));

    let shell = EditorShell {
        window: window.clone(),
        canvas: canvas.clone(),
        editor: editor.clone(),
        export_service,
        status_label,
        help_label,
        download_button: download_button.clone(),
        open_dialog: Rc::new(RefCell::new(None)),
    };

    let gesture_context = CanvasGestureContext { canvas, editor };
    connect_canvas_drag_gesture(gesture_context.clone());
    connect_canvas_pinch_gesture(gesture_context);

    let shell_for_open = shell.clone();
    open_button.connect_clicked(move |_| open_image_dialog(&shell_for_open));
    let shell_for_download = shell.clone();
    download_button.connect_clicked(move |_| download_current_frame(&shell_for_download));

    shell
}
