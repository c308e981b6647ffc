use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub map_zoom_level: u8,
    pub max_body_size: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let data_dir = std::env::var("DATA_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));

        let map_zoom_level = std::env::var("MAP_ZOOM_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(13);

        let max_body_size_kb: usize = std::env::var("MAX_BODY_SIZE_KB")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(16);

        Self {
            port,
            data_dir,
            map_zoom_level,
            max_body_size: max_body_size_kb * 1024,
        }
    }
}
