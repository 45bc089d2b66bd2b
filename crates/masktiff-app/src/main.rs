use iced::widget::{
    button, checkbox, column, container, image, pick_list, row, slider, text, text_input,
};
use iced::{Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::{Path, PathBuf};

use masktiff_core::preview::{render_preview, ViewSettings};
use masktiff_core::session::Session;
use masktiff_core::transform::MaskAlignment;

/// Quarter-turn choices offered in the rotation picker.
const QUARTER_TURNS: [u8; 4] = [0, 1, 2, 3];

/// Main application state
struct MaskTiff {
    /// The alignment session holding data, mask and the current selection
    session: Session,
    /// Preview rendering settings (resolution and contrast window)
    view: ViewSettings,
    /// Rendered preview handed to the image widget
    preview: Option<image::Handle>,
    /// Status message to display to the user
    status: String,
    /// Loaded file names for display
    data_name: String,
    mask_name: String,
    /// Text field contents (parsed on submit)
    shift_text: String,
    resolution_text: String,
    /// Contrast slider positions; crop factors are 10^(value / 10)
    scale_low: i32,
    scale_high: i32,
    /// Directory of the last file the user picked
    default_dir: Option<PathBuf>,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Load TIFF..."
    LoadData,
    /// User clicked "Load mask..."
    LoadMask,
    /// User clicked "Save masked TIFF..."
    SaveMasked,
    /// User picked a number of quarter turns for the mask
    QuarterTurnsPicked(u8),
    /// User toggled the vertical mask flip
    FlipVerticalToggled(bool),
    /// User toggled the horizontal mask flip
    FlipHorizontalToggled(bool),
    /// User edited the intensity shift field
    ShiftInput(String),
    /// User submitted the intensity shift field
    ShiftSubmitted,
    /// User edited the plot resolution field
    ResolutionInput(String),
    /// User submitted the plot resolution field
    ResolutionSubmitted,
    /// User moved the low-intensity contrast slider
    ScaleLowChanged(i32),
    /// User moved the high-intensity contrast slider
    ScaleHighChanged(i32),
}

impl MaskTiff {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        (
            MaskTiff {
                session: Session::new(),
                view: ViewSettings::default(),
                preview: None,
                status: "Load a diffraction TIFF and a mask to begin.".to_string(),
                data_name: "Not set".to_string(),
                mask_name: "Not set".to_string(),
                shift_text: "0.0".to_string(),
                resolution_text: ViewSettings::default().max_edge.to_string(),
                scale_low: 0,
                scale_high: 0,
                default_dir: None,
            },
            Task::none(),
        )
    }

    /// Window title, tracking the loaded data file
    fn title(&self) -> String {
        if self.data_name == "Not set" {
            "MaskTiff".to_string()
        } else {
            format!("MaskTiff: {}", self.data_name)
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::LoadData => {
                if let Some(path) = self
                    .file_dialog("Select a tiff file...")
                    .add_filter("TIFF images", &["tif", "tiff"])
                    .pick_file()
                {
                    match self.session.load_data_file(&path) {
                        Ok(()) => {
                            self.data_name = display_name(&path);
                            self.remember_dir(&path);
                            self.status = format!("Loaded data {}.", self.data_name);
                            self.check_negative_intensities();
                        }
                        Err(e) => self.status = format!("Failed to load data: {e}"),
                    }
                    self.refresh_preview();
                }
            }
            Message::LoadMask => {
                if let Some(path) = self
                    .file_dialog("Select your mask...")
                    .add_filter("Masks", &["mask", "tif", "tiff", "png", "edf"])
                    .pick_file()
                {
                    match self.session.load_mask_file(&path) {
                        Ok(()) => {
                            self.mask_name = display_name(&path);
                            self.remember_dir(&path);
                            self.status = format!("Loaded mask {}.", self.mask_name);
                            self.check_negative_intensities();
                        }
                        Err(e) => self.status = format!("Failed to load mask: {e}"),
                    }
                    self.refresh_preview();
                }
            }
            Message::SaveMasked => {
                if self.session.data().is_none() || self.session.mask().is_none() {
                    self.status = "Data or mask is missing. Nothing to save.".to_string();
                    return Task::none();
                }
                if let Some(path) = self
                    .file_dialog("Save new data as...")
                    .add_filter("TIFF images", &["tif", "tiff"])
                    .save_file()
                {
                    match self.session.save_masked_file(&path) {
                        Ok(()) => {
                            self.remember_dir(&path);
                            self.status = format!("Saved masked data to {}.", display_name(&path));
                        }
                        Err(e) => self.status = format!("Failed to save: {e}"),
                    }
                }
            }
            Message::QuarterTurnsPicked(turns) => {
                let alignment = MaskAlignment {
                    quarter_turns: turns,
                    ..self.session.alignment()
                };
                self.session.set_alignment(alignment);
                self.refresh_preview();
            }
            Message::FlipVerticalToggled(flip) => {
                let alignment = MaskAlignment {
                    flip_vertical: flip,
                    ..self.session.alignment()
                };
                self.session.set_alignment(alignment);
                self.refresh_preview();
            }
            Message::FlipHorizontalToggled(flip) => {
                let alignment = MaskAlignment {
                    flip_horizontal: flip,
                    ..self.session.alignment()
                };
                self.session.set_alignment(alignment);
                self.refresh_preview();
            }
            Message::ShiftInput(value) => {
                self.shift_text = value;
            }
            Message::ShiftSubmitted => match self.shift_text.trim().parse::<f64>() {
                Ok(shift) => {
                    self.session.set_intensity_shift(shift);
                    self.status = format!("Intensity shift set to {shift}.");
                    self.check_negative_intensities();
                }
                Err(_) => {
                    self.status = format!("Not a valid intensity shift: {}", self.shift_text);
                }
            },
            Message::ResolutionInput(value) => {
                self.resolution_text = value;
            }
            Message::ResolutionSubmitted => match self.resolution_text.trim().parse::<u32>() {
                Ok(resolution) if resolution > 0 => {
                    self.view.max_edge = resolution;
                    self.refresh_preview();
                }
                _ => {
                    self.status = format!("Not a valid resolution: {}", self.resolution_text);
                }
            },
            Message::ScaleLowChanged(value) => {
                self.scale_low = value;
                self.view.crop_factor_low = 10f64.powf(f64::from(value) / 10.0);
                self.refresh_preview();
            }
            Message::ScaleHighChanged(value) => {
                self.scale_high = value;
                self.view.crop_factor_high = 10f64.powf(f64::from(value) / 10.0);
                self.refresh_preview();
            }
        }

        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let alignment = self.session.alignment();

        let controls = column![
            button("Load TIFF...").on_press(Message::LoadData).padding(8),
            button("Load mask...").on_press(Message::LoadMask).padding(8),
            button("Save masked TIFF...")
                .on_press(Message::SaveMasked)
                .padding(8),
            text("Color shift (low intensities)").size(14),
            slider(-20..=20, self.scale_low, Message::ScaleLowChanged),
            text("Color shift (high intensities)").size(14),
            slider(-20..=20, self.scale_high, Message::ScaleHighChanged),
            text("Intensity shift on data").size(14),
            text_input("0.0", &self.shift_text)
                .on_input(Message::ShiftInput)
                .on_submit(Message::ShiftSubmitted),
            text("N. 90\u{b0} rotations on mask").size(14),
            pick_list(
                QUARTER_TURNS,
                Some(alignment.quarter_turns),
                Message::QuarterTurnsPicked,
            ),
            checkbox("Flip mask vertically", alignment.flip_vertical)
                .on_toggle(Message::FlipVerticalToggled),
            checkbox("Flip mask horizontally", alignment.flip_horizontal)
                .on_toggle(Message::FlipHorizontalToggled),
            text(format!("Data file: {}", self.data_name)).size(14),
            text(format!("Mask file: {}", self.mask_name)).size(14),
            text("Plot resolution (pixels)").size(14),
            text_input("1500", &self.resolution_text)
                .on_input(Message::ResolutionInput)
                .on_submit(Message::ResolutionSubmitted),
        ]
        .spacing(10)
        .width(Length::Fixed(240.0));

        let preview: Element<Message> = match &self.preview {
            Some(handle) => image(handle.clone()).into(),
            None => text("Load a TIFF to begin").size(20).into(),
        };

        let content = column![
            row![
                controls,
                container(preview)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .center_x(Length::Fill)
                    .center_y(Length::Fill),
            ]
            .spacing(20),
            text(&self.status).size(14),
        ]
        .spacing(10)
        .padding(16);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// A native file dialog starting in the last used directory
    fn file_dialog(&self, title: &str) -> FileDialog {
        let mut dialog = FileDialog::new().set_title(title);
        if let Some(dir) = &self.default_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog
    }

    /// Remember the directory of the last picked file
    fn remember_dir(&mut self, path: &Path) {
        self.default_dir = path.parent().map(Path::to_path_buf);
    }

    /// Re-render the preview from the session's current state
    fn refresh_preview(&mut self) {
        let Some(data) = self.session.data() else {
            self.preview = None;
            return;
        };
        let mask = self.session.aligned_mask();
        let rendered = render_preview(data, mask.as_ref(), &self.view);
        self.preview = Some(image::Handle::from_rgba(
            rendered.width,
            rendered.height,
            rendered.pixels,
        ));
    }

    /// Warn when unmasked intensities would be saved negative.
    ///
    /// Negative unmasked values confuse the downstream refinement, so the
    /// warning includes the minimum shift that avoids them.
    fn check_negative_intensities(&mut self) {
        if self.session.data().is_none() || self.session.mask().is_none() {
            return;
        }
        match self.session.negative_intensity_report() {
            Ok(Some(recommended)) => {
                self.status = format!(
                    "Negative intensities in un-masked data. Minimum intensity shift to avoid this: {recommended:.1}"
                );
            }
            Ok(None) => {}
            Err(e) => eprintln!("Could not check for negative intensities: {e}"),
        }
    }
}

fn main() -> iced::Result {
    iced::application(MaskTiff::title, MaskTiff::update, MaskTiff::view)
        .theme(MaskTiff::theme)
        .centered()
        .run_with(MaskTiff::new)
}

/// File name portion of a path, for titles and status lines
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Path::new("/data/run42/pattern.tif")), "pattern.tif");
        assert_eq!(display_name(Path::new("mask.tiff")), "mask.tiff");
    }

    #[test]
    fn test_crop_factor_scale() {
        // Slider value 0 leaves the contrast window at its default.
        assert_eq!(10f64.powf(0.0 / 10.0), 1.0);
        // Value 10 widens it by a decade.
        assert_eq!(10f64.powf(10.0 / 10.0), 10.0);
    }
}
