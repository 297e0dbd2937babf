use clap::{command, Parser};

// Some defaults; some of which can be overriden via CLI args
const CONFIG_FILE_PATH: &str = "./overlay.json";
const OUTPUT_FILE_PATH: &str = "./overlay.png";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Image to draw onto
    #[arg(long = "input")]
    pub input_path: String,

    /// JSON list of detected persons, as produced by the pose detector
    #[arg(long = "persons")]
    pub persons_path: String,

    /// Where to write the rendered image; format is chosen by extension
    #[arg(long="output",default_value_t=String::from(OUTPUT_FILE_PATH))]
    pub output_path: String,

    /// Where to load overlay config; defaults are used if the file does not exist
    #[arg(long="configPath",default_value_t=String::from(CONFIG_FILE_PATH))]
    pub config_path: String,

    /// TrueType font for text annotations (overrides fontPath in the config)
    #[arg(long = "fontPath")]
    pub font_path: Option<String>,

    /// Draw person ids and bounding boxes, even if the config disables them
    #[arg(long = "trackerEnabled")]
    pub tracker_enabled: bool,

    /// Save the effective config (after CLI overrides) to configPath
    #[arg(long = "writeConfig")]
    pub write_config: bool,

    #[arg(long = "loglevel",default_value_t=String::from("info"))]
    pub log_level: String,
}
