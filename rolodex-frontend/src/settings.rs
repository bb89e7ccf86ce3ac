use std::{path::PathBuf, time::Duration};

#[derive(Debug)]
pub struct Settings {
    pub api_url: String,
    pub debounce: Duration,
    pub demo: bool,
    pub ignored_paths: Vec<String>,
    pub initial_state: Option<PathBuf>,
    pub location: String,
    pub origin: String,
    pub templates: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080/api".to_string(),
            debounce: Duration::from_millis(500),
            demo: false,
            ignored_paths: vec!["/api".to_string()],
            initial_state: None,
            location: "/".to_string(),
            origin: "http://localhost:8080".to_string(),
            templates: None,
        }
    }
}
