use anyhow::Result;
use serde_json::{from_reader, to_writer_pretty};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::show::Show;

/// File extension used for show files.
pub const SHOW_EXTENSION: &str = "lumen";

pub struct ShowManager {
    shows_directory: PathBuf,
    current_show: Option<Show>,
    current_path: Option<PathBuf>,
}

impl ShowManager {
    pub fn new<P: Into<PathBuf>>(shows_directory: P) -> Self {
        Self {
            shows_directory: shows_directory.into(),
            current_show: None,
            current_path: None,
        }
    }

    pub fn new_show(&mut self, name: String) -> &mut Show {
        self.current_path = None;
        self.current_show.insert(Show::new(name))
    }

    pub fn current_show(&self) -> Option<&Show> {
        self.current_show.as_ref()
    }

    /// Write the current show to its file, naming a new one after the show.
    pub fn save_show(&mut self) -> Result<PathBuf> {
        let Some(show) = self.current_show.as_mut() else {
            return Err(anyhow::anyhow!("No show is currently loaded"));
        };
        show.modified_at = SystemTime::now();

        let path = match &self.current_path {
            Some(path) => path.clone(),
            None => {
                let sanitized_name = show.name.replace(' ', "_").to_lowercase();
                self.shows_directory
                    .join(format!("{}.{}", sanitized_name, SHOW_EXTENSION))
            }
        };

        let file = File::create(&path)?;
        to_writer_pretty(file, &*show)?;
        log::info!("Saved show '{}' to {}", show.name, path.display());

        self.current_path = Some(path.clone());
        Ok(path)
    }

    pub fn save_show_as(&mut self, path: PathBuf) -> Result<PathBuf> {
        self.current_path = Some(path);
        self.save_show()
    }

    pub fn load_show(&mut self, path: &Path) -> Result<&Show> {
        let file = File::open(path)?;
        let show: Show = from_reader(file)?;
        log::info!(
            "Loaded show '{}' ({} fixtures, {} audio items)",
            show.name,
            show.fixtures.len(),
            show.audio_items.len()
        );

        self.current_path = Some(path.to_path_buf());
        Ok(self.current_show.insert(show))
    }

    pub fn list_shows(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.shows_directory)?;

        let mut shows = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && path.extension().map_or(false, |ext| ext == SHOW_EXTENSION) {
                shows.push(path);
            }
        }
        shows.sort();

        Ok(shows)
    }
}
