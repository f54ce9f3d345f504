use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::scaling::Viewport;

/// Cascade looked up when none is given on the command line.
pub const CASCADE_FILE_NAME: &str = "haarcascade_frontalface_default.xml";

/// Extensions offered by the open dialog. The decoder has the final say.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

const OPENCV_CASCADE_DIRS: [&str; 3] = [
    "/usr/share/opencv4/haarcascades",
    "/usr/local/share/opencv4/haarcascades",
    "/usr/share/opencv/haarcascades",
];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cascade_path: PathBuf,
    pub viewport: Viewport,
    pub verbose: bool,
}

impl AppConfig {
    /// Build the configuration, locating the cascade file.
    pub fn resolve(cascade: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let cascade_path = match cascade {
            Some(path) if path.is_file() => path,
            Some(path) => bail!("cascade file {} does not exist", path.display()),
            None => match find_existing(&cascade_search_paths()) {
                Some(path) => path,
                None => bail!(
                    "could not find {CASCADE_FILE_NAME}; pass its location with --cascade"
                ),
            },
        };

        Ok(Self {
            cascade_path,
            viewport: Viewport::default(),
            verbose,
        })
    }
}

/// Places searched for the default cascade, most specific first.
pub fn cascade_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from(CASCADE_FILE_NAME),
        Path::new("data").join(CASCADE_FILE_NAME),
    ];
    if let Some(exe_dir) = std::env::current_exe().ok().as_deref().and_then(Path::parent) {
        paths.push(exe_dir.join(CASCADE_FILE_NAME));
    }
    paths.extend(
        OPENCV_CASCADE_DIRS
            .iter()
            .map(|dir| Path::new(dir).join(CASCADE_FILE_NAME)),
    );
    paths
}

pub fn find_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    let found = candidates.iter().find(|p| p.is_file()).cloned();
    match &found {
        Some(path) => log::debug!("using cascade {}", path.display()),
        None => log::debug!("no cascade among {} search paths", candidates.len()),
    }
    found
}
