use log::{debug, info, warn};
use std::fs;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    canvas::{Colour, Paint},
    error,
    posture::DEFAULT_DEVIATION_RATIO,
    Point2D,
};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OverlayConfig {
    // -------- SIZES
    /// Radius of the circle drawn on each key point
    pub circle_radius: f32,

    /// Width of lines connecting key points (and of the correction markers)
    pub line_width: f32,

    /// Text size of the person id, shown only when a tracker is available
    pub person_id_text_size: f32,

    /// Gap between the person id and the top of the bounding box
    pub person_id_margin: f32,

    /// Text size of correction messages
    pub text_size: f32,

    // -------- CORRECTION MESSAGES
    /// Left edge of all message text
    pub text_x: f32,

    /// Vertical distance between stacked correction messages
    pub line_spacing: f32,

    /// Shown instead of correction messages when every checked joint is in line
    pub all_clear_text: String,

    pub all_clear_y: f32,

    /// A joint is out of line when further than 1/deviationRatio of the
    /// wrist-to-ankle distance from that line
    pub deviation_ratio: f32,

    // -------- OPTIONAL ANNOTATIONS
    /// Draw person ids and bounding boxes
    pub tracker_enabled: bool,

    /// Print the hip-knee-ankle angle of the selected side
    pub show_knee_angle: bool,

    /// Distance of the knee angle text from the bottom of the image
    pub knee_angle_margin_bottom: f32,

    /// Centres of the two bike wheels, if known. When set, the line between
    /// them is drawn and the knee-to-ankle angle against it is printed
    pub wheel_centres: Option<(Point2D, Point2D)>,

    /// Distance of the perpendicular angle text from the bottom of the image
    pub perpendicular_margin_bottom: f32,

    /// Max difference from 90 degrees still shown as good
    pub perpendicular_tolerance: f32,

    // -------- COLOURS ("#rrggbb")
    pub joint_colour: String,
    pub line_colour: String,
    pub reference_colour: String,
    pub good_colour: String,
    pub bad_colour: String,
    pub warning_text_colour: String,
    pub ok_text_colour: String,

    /// TrueType font used for all text; text is skipped if not set
    pub font_path: Option<String>,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            circle_radius: 6.,
            line_width: 4.,
            person_id_text_size: 20.,
            person_id_margin: 6.,
            text_size: 20.,
            text_x: 50.,
            line_spacing: 50.,
            all_clear_text: String::from("Perfect!"),
            all_clear_y: 50.,
            deviation_ratio: DEFAULT_DEVIATION_RATIO,
            tracker_enabled: false,
            show_knee_angle: false,
            knee_angle_margin_bottom: 60.,
            wheel_centres: None,
            perpendicular_margin_bottom: 30.,
            perpendicular_tolerance: 10.,
            joint_colour: String::from("#ffff00"),
            line_colour: String::from("#ffff00"),
            reference_colour: String::from("#0000ff"),
            good_colour: String::from("#00ff00"),
            bad_colour: String::from("#ff0000"),
            warning_text_colour: String::from("#ff0000"),
            ok_text_colour: String::from("#00ff00"),
            font_path: None,
        }
    }
}

/// Every paint used by one render pass, built from an [`OverlayConfig`]
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayPaints {
    pub joint: Paint,
    pub line: Paint,
    pub reference: Paint,
    pub good: Paint,
    pub bad: Paint,
    pub person_id_text: Paint,
    pub warning_text: Paint,
    pub ok_text: Paint,
    pub good_text: Paint,
    pub bad_text: Paint,
}

impl OverlayConfig {
    pub fn paints(&self) -> error::Result<OverlayPaints> {
        let line_colour = Colour::from_hex(&self.line_colour)?;
        let warning_colour = Colour::from_hex(&self.warning_text_colour)?;
        let good_colour = Colour::from_hex(&self.good_colour)?;
        let bad_colour = Colour::from_hex(&self.bad_colour)?;
        Ok(OverlayPaints {
            joint: Paint::fill(Colour::from_hex(&self.joint_colour)?),
            line: Paint::stroke(line_colour, self.line_width),
            reference: Paint::stroke(Colour::from_hex(&self.reference_colour)?, self.line_width),
            good: Paint::stroke(good_colour, self.line_width),
            bad: Paint::stroke(bad_colour, self.line_width),
            person_id_text: Paint::text(warning_colour, self.person_id_text_size),
            warning_text: Paint::text(warning_colour, self.text_size),
            ok_text: Paint::text(Colour::from_hex(&self.ok_text_colour)?, self.text_size),
            good_text: Paint::text(good_colour, self.text_size),
            bad_text: Paint::text(bad_colour, self.text_size),
        })
    }

    pub fn write_config_to_file(&self, config_file_path: &str) -> Result<()> {
        debug!("Current state of config: {:?}", self);
        let text = serde_json::to_string_pretty(self)?;
        fs::write(config_file_path, text)
            .map_err(|e| anyhow!("Error writing config to \"{}\": {}", config_file_path, e))?;
        info!("Wrote config to file: {:?}", config_file_path);
        Ok(())
    }
}

pub fn parse_config(text: &str) -> Result<OverlayConfig> {
    // serde would also accept a JSON array here, filling fields by position
    let value = serde_json::from_str::<Value>(text)
        .map_err(|e| anyhow!("Failed to parse config data: {}", e))?;
    if !value.is_object() {
        return Err(anyhow!("Config must be a JSON object, got: {}", value));
    }
    let config = serde_json::from_value::<OverlayConfig>(value)
        .map_err(|e| anyhow!("Failed to parse config data: {}", e))?;
    if config.deviation_ratio <= 0. {
        return Err(anyhow!(
            "deviationRatio must be above 0, got {}",
            config.deviation_ratio
        ));
    }
    Ok(config)
}

pub fn load_config_from_file(config_file_path: &str) -> Result<OverlayConfig> {
    match fs::read_to_string(config_file_path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(
                "Overlay config file not found at {}; using defaults",
                &config_file_path
            );
            Ok(OverlayConfig::default())
        }
        Err(e) => Err(anyhow!(
            "Failed to load overlay config from \"{}\": {}",
            config_file_path,
            e
        )),
        Ok(s) => {
            info!("Loaded overlay config OK from \"{}\"", config_file_path);
            let config = parse_config(&s)?;
            debug!("Config parsed data from file: {:?}", &config);
            Ok(config)
        }
    }
}
