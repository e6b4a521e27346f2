use crate::detector::DetectorParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the CLI writes its results.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// JSON array with the systems of every input page.
    pub json_out: Option<PathBuf>,
    /// Directory receiving the run-length image of every page.
    pub debug_dir: Option<PathBuf>,
}

/// Pages to process, output locations and detector parameters.
#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub inputs: Vec<PathBuf>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub params: DetectorParams,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&contents).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

/// Parse a configuration document; relative paths are kept as written.
pub fn parse_config(contents: &str) -> Result<RuntimeConfig, String> {
    serde_json::from_str(contents).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config(r#"{"inputs": ["page.png"]}"#).unwrap();
        assert_eq!(cfg.inputs, vec![PathBuf::from("page.png")]);
        assert!(cfg.output.json_out.is_none());
        assert_eq!(cfg.params, DetectorParams::default());
    }

    #[test]
    fn nested_params_are_read() {
        let cfg = parse_config(
            r#"{
                "inputs": ["a.png", "b.png"],
                "output": {"json_out": "out/systems.json", "debug_dir": "out/debug"},
                "params": {"num_line": 4, "line_fit_distance": 0.0, "postprocess": {"max_gap_factor": 1.0}}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.inputs.len(), 2);
        assert_eq!(cfg.output.debug_dir, Some(PathBuf::from("out/debug")));
        assert_eq!(cfg.params.num_line, 4);
        assert_eq!(cfg.params.postprocess.max_gap_factor, 1.0);
    }

    #[test]
    fn missing_inputs_is_an_error() {
        assert!(parse_config(r#"{"params": {}}"#).is_err());
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = load_config(Path::new("/nonexistent/staff.json")).unwrap_err();
        assert!(err.contains("/nonexistent/staff.json"));
    }
}
