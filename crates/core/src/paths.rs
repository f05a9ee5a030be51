use std::path::{Path, PathBuf};

/// Get the reportview directory under the platform config dir
pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reportview")
}

/// Get the default config file path
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.json")
}

/// Get the path a rendered file is written to next to its input
pub fn get_output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_sits_next_to_input() {
        assert_eq!(
            get_output_path(Path::new("/data/summary.json"), "html"),
            PathBuf::from("/data/summary.html")
        );
    }

    #[test]
    fn config_path_is_namespaced() {
        let path = get_config_path();
        assert!(path.ends_with("reportview/config.json"));
    }
}
