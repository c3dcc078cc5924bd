use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use lumen_core::projector::moving_head::fixture_radius;
use lumen_core::projector::{head_angles, Projection};
use lumen_core::{
    enumerate_audio_devices, is_audio_file, probe_duration, AudioBackend, BoxedPlacement, ChannelFrame,
    ConfigManager, FixtureProjector, PlaylistItem, PlaylistItemAudio, RenderOptions, Rgba,
    Settings, ShowManager,
};
use lumen_fixtures::{Attributes, DmxStyle, FixtureLibrary, MovingHeadConfig};

mod play;

/// Moving-head preview projection and playlist audio playback.
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Lumen show preview and playback tools")]
struct Args {
    /// Configuration file (defaults to lumen/config.json in the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project a moving head into preview geometry
    Project {
        /// Fixture profile from the built-in library
        #[arg(long, conflicts_with = "attr")]
        profile: Option<String>,

        /// Fixture attribute, e.g. DmxPanChannel=1 (repeatable)
        #[arg(long, value_parser = parse_key_val)]
        attr: Vec<(String, String)>,

        /// Load the fixture from a show file
        #[arg(long, requires = "fixture", conflicts_with_all = ["profile", "attr"])]
        show: Option<PathBuf>,

        /// Fixture name within the show file
        #[arg(long)]
        fixture: Option<String>,

        /// Override the drawing style ("Moving Head Top" or "Moving Head Side")
        #[arg(long)]
        style: Option<String>,

        /// Channel levels, comma separated, starting at channel 1
        #[arg(long, value_delimiter = ',')]
        dmx: Vec<u8>,

        /// Fixture size in preview units
        #[arg(long, default_value_t = 100.0)]
        size: f32,

        /// Draw as selected in the layout view, with the beam off
        #[arg(long)]
        selected: bool,

        /// Override colour for a silhouette pass, e.g. #000000
        #[arg(long, value_parser = parse_color)]
        override_color: Option<Rgba>,

        /// Print the projected vertices as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the length of audio files
    Probe {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Play an audio file as a playlist item (space pause, r restart, q stop)
    Play {
        file: PathBuf,

        /// Volume percentage (defaults to the configured volume)
        #[arg(long)]
        volume: Option<u32>,

        /// Output device (defaults to the configured device)
        #[arg(long)]
        device: Option<String>,
    },

    /// List audio output devices
    Devices,

    /// Inspect or change the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Create or list show files
    Show {
        #[command(subcommand)]
        action: ShowAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the current settings
    Show,
    /// Print every option with its default and valid range
    Schema,
    /// Check the configuration file against the schema
    Validate,
    /// Restore the default settings
    Reset,
}

#[derive(Subcommand, Debug)]
enum ShowAction {
    /// Write a new show file into the show directory
    Create {
        name: String,

        /// Fixture to patch as NAME=PROFILE (repeatable)
        #[arg(long, value_parser = parse_key_val)]
        fixture: Vec<(String, String)>,

        /// Audio file to add to the playlist (repeatable)
        #[arg(long)]
        audio: Vec<PathBuf>,

        /// Write to this path instead of the show directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List show files in the show directory
    List,
}

fn parse_color(s: &str) -> Result<Rgba, String> {
    Rgba::from_hex(s).ok_or_else(|| format!("Expected a colour like #rrggbb, got '{}'", s))
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Expected KEY=VALUE, got '{}'", s))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = ConfigManager::new(args.config);

    match args.command {
        Command::Config { action } => run_config(&mut config, action),
        Command::Project {
            profile,
            attr,
            show,
            fixture,
            style,
            dmx,
            size,
            selected,
            override_color,
            json,
        } => {
            let settings = config.load()?;
            let (mut fixture_config, placement) =
                resolve_fixture(&settings, profile, attr, show, fixture, size)?;
            if let Some(style) = style {
                fixture_config.style = DmxStyle::from_name(&style);
            }
            let mut options = settings.render_options_for(selected);
            options.override_color = override_color;
            run_project(&options, &fixture_config, &placement, &dmx, json)
        }
        Command::Probe { files } => run_probe(&files),
        Command::Play {
            file,
            volume,
            device,
        } => {
            let settings = config.load()?;
            let device = device.unwrap_or_else(|| settings.audio_device.clone());
            let volume = volume.unwrap_or(settings.default_volume);
            play::run(&file, &device, volume, settings.frame_interval_ms())
        }
        Command::Devices => run_devices(&config.load()?),
        Command::Show { action } => run_show(&config.load()?, action),
    }
}

fn resolve_fixture(
    settings: &Settings,
    profile: Option<String>,
    attr: Vec<(String, String)>,
    show: Option<PathBuf>,
    fixture: Option<String>,
    size: f32,
) -> anyhow::Result<(MovingHeadConfig, BoxedPlacement)> {
    let centered = BoxedPlacement::centered(
        settings.preview_width as f32 / 2.0,
        settings.preview_height as f32 / 2.0,
        size,
    );

    if let Some(path) = show {
        let name = fixture.ok_or_else(|| anyhow!("--fixture is required with --show"))?;
        let mut manager = ShowManager::new(&settings.show_directory);
        let loaded = manager.load_show(&path)?;
        let patched = loaded
            .fixture(&name)
            .ok_or_else(|| anyhow!("No fixture named '{}' in {}", name, path.display()))?;
        return Ok((patched.config.clone(), patched.placement));
    }

    if let Some(id) = profile {
        let library = FixtureLibrary::new();
        let profile = library.get(&id).ok_or_else(|| {
            anyhow!(
                "Unknown fixture profile '{}'. Available: {}",
                id,
                library.ids().join(", ")
            )
        })?;
        return Ok((profile.moving_head_config(DmxStyle::default()), centered));
    }

    let attrs: Attributes = attr.into_iter().collect();
    Ok((MovingHeadConfig::from_attributes(&attrs), centered))
}

fn run_project(
    options: &RenderOptions,
    config: &MovingHeadConfig,
    placement: &BoxedPlacement,
    dmx: &[u8],
    json: bool,
) -> anyhow::Result<()> {
    if let Err(errors) = config.validate() {
        for error in errors {
            log::warn!("{}", error);
        }
    }

    let frame = if dmx.is_empty() {
        ChannelFrame::from_dmx(&vec![0; config.node_count()])
    } else {
        ChannelFrame::from_dmx(dmx)
    };

    let projector = FixtureProjector::new(*options);

    match projector.project(config, &frame, placement) {
        Projection::Skip => {
            println!(
                "Skipped: channels of this {} fixture don't fit {} channel levels",
                config.style,
                frame.node_count()
            );
        }
        Projection::Geometry(geometry) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&geometry)?);
            } else {
                println!("Style: {}", config.style);
                if let Some(angles) = head_angles(config, &frame, fixture_radius(placement)) {
                    println!("Pan: {:.2} deg", angles.pan);
                    println!("Tilt: {:.2} deg", angles.tilt);
                }
                println!(
                    "Geometry: {} vertices, {} triangles",
                    geometry.vertices.len(),
                    geometry.triangle_count()
                );
            }
        }
    }

    Ok(())
}

fn run_probe(files: &[PathBuf]) -> anyhow::Result<()> {
    for file in files {
        if !is_audio_file(file) {
            log::warn!("{} doesn't have an audio file extension", file.display());
        }
        match probe_duration(file) {
            Ok(duration) => println!("{}: {} ms", file.display(), duration.as_millis()),
            Err(e) => println!("{}: {}", file.display(), e),
        }
    }
    Ok(())
}

fn run_devices(settings: &Settings) -> anyhow::Result<()> {
    for device in enumerate_audio_devices()? {
        let mut line = device.name.clone();
        if device.is_default {
            line.push_str(" (default)");
        }
        if device.name == settings.audio_device {
            line.push_str(" [configured]");
        }
        println!("{}", line);
    }
    Ok(())
}

fn run_config(config: &mut ConfigManager, action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let settings = config.load()?;
            println!("# {}", config.config_path().display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Schema => {
            println!("{}", serde_json::to_string_pretty(&ConfigManager::schema())?);
        }
        ConfigAction::Validate => {
            config.load()?;
            println!("{} is valid", config.config_path().display());
        }
        ConfigAction::Reset => {
            config.reset_to_defaults()?;
            println!("Reset {}", config.config_path().display());
        }
    }
    Ok(())
}

fn run_show(settings: &Settings, action: ShowAction) -> anyhow::Result<()> {
    let mut manager = ShowManager::new(&settings.show_directory);

    match action {
        ShowAction::Create {
            name,
            fixture,
            audio,
            output,
        } => {
            let library = FixtureLibrary::new();
            let spacing = settings.preview_width as f32 / (fixture.len() + 1) as f32;
            let center_y = settings.preview_height as f32 / 2.0;
            // Probing only needs the header reader; nothing is opened here.
            let backend: Rc<dyn AudioBackend> = Rc::new(ProbeOnly);

            let show = manager.new_show(name);
            for (i, (fixture_name, profile_id)) in fixture.iter().enumerate() {
                let profile = library
                    .get(profile_id)
                    .ok_or_else(|| anyhow!("Unknown fixture profile '{}'", profile_id))?;
                let placement =
                    BoxedPlacement::centered(spacing * (i + 1) as f32, center_y, spacing / 2.0);
                show.patch_fixture(
                    fixture_name,
                    profile.moving_head_config(DmxStyle::default()),
                    placement,
                );
            }
            for file in &audio {
                let mut item = PlaylistItemAudio::new(Rc::clone(&backend));
                item.set_audio_file(file);
                if !item.controls_timing() {
                    log::warn!("{} has no readable length", file.display());
                }
                show.add_audio_item(&item);
            }

            let path = match output {
                Some(path) => manager.save_show_as(path),
                None => manager.save_show(),
            }
            .context("Failed to save show")?;
            println!("Wrote {}", path.display());
        }
        ShowAction::List => {
            for path in manager.list_shows()? {
                println!("{}", path.display());
            }
        }
    }
    Ok(())
}

/// Backend for building playlists offline: it can read lengths but never plays.
struct ProbeOnly;

impl AudioBackend for ProbeOnly {
    fn open(&self, path: &Path) -> Result<Box<dyn lumen_core::AudioHandle>, lumen_core::AudioError> {
        Err(lumen_core::AudioError::Output(format!(
            "{} can't be played while building a show",
            path.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("DmxPanChannel = 1").unwrap(),
            ("DmxPanChannel".to_string(), "1".to_string())
        );
        assert!(parse_key_val("DmxPanChannel").is_err());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#000000").unwrap(), Rgba::BLACK);
        assert!(parse_color("black").is_err());
    }
}
