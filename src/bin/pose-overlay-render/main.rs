use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info, warn};

use pose_overlay::body::load_persons_from_file;
use pose_overlay::overlay::draw_body_keypoints;
use pose_overlay::overlay_config::load_config_from_file;
use pose_overlay::raster::load_font;

mod cli;

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger from the environment

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    debug!("Started; args: {:?}", cli);

    let mut config = load_config_from_file(&cli.config_path)?;
    if cli.tracker_enabled {
        config.tracker_enabled = true;
    }
    if let Some(font_path) = &cli.font_path {
        config.font_path = Some(font_path.clone());
    }
    if cli.write_config {
        config.write_config_to_file(&cli.config_path)?;
    }

    let font = match &config.font_path {
        Some(path) => Some(load_font(path)?),
        None => {
            warn!("No font configured; text annotations will be skipped");
            None
        }
    };

    let input = image::open(&cli.input_path)
        .with_context(|| format!("failed to open input image \"{}\"", cli.input_path))?
        .to_rgba8();
    let persons = load_persons_from_file(&cli.persons_path)?;

    info!(
        "Rendering {} person(s) onto {}x{} image",
        persons.len(),
        input.width(),
        input.height()
    );
    let output = draw_body_keypoints(&input, &persons, &config, font.as_ref())?;

    output
        .save(&cli.output_path)
        .with_context(|| format!("failed to write output image \"{}\"", cli.output_path))?;
    info!("Wrote overlay to \"{}\"", cli.output_path);

    Ok(())
}
