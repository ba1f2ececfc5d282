use directories::ProjectDirs;
use std::path::PathBuf;

/// Per-user data dir, or the working dir when the platform has no home.
pub fn data_root() -> PathBuf {
    ProjectDirs::from("com", "dialogcards", "DialogCards")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Session file and backup dir for one piece of content, keyed by its name.
pub fn default_state_file(content_key: &str) -> (PathBuf, PathBuf) {
    let root = data_root().join("sessions");
    let file = root.join(format!("{content_key}.json"));
    let backups = root.join("backups").join(content_key);
    (file, backups)
}
