//! TOML configuration: label options and severity-group lookup tables.
//!
//! Severity maps key the raw group code (as a string) to its bucket:
//!
//! ```toml
//! [apache_ii]
//! "98" = 2
//!
//! [apache_iv]
//! "1201" = 2
//! ```

use std::path::Path;

use tracing::debug;

use icu_model::{LabelOptions, SeverityMaps};

use crate::error::{IngestError, Result};

/// Read and validate label options; absent keys keep their defaults.
pub fn load_label_options(path: &Path) -> Result<LabelOptions> {
    let text = read_config(path)?;
    let options: LabelOptions = toml::from_str(&text).map_err(|source| IngestError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    options.validate()?;
    debug!(
        path = %path.display(),
        steps_per_hour = options.steps_per_hour,
        policy = ?options.window_policy,
        "label options loaded"
    );
    Ok(options)
}

pub fn load_severity_maps(path: &Path) -> Result<SeverityMaps> {
    let text = read_config(path)?;
    let maps = parse_severity_maps(&text).map_err(|source| IngestError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        apache_ii = maps.apache_ii.len(),
        apache_iv = maps.apache_iv.len(),
        "severity maps loaded"
    );
    Ok(maps)
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_severity_maps(text: &str) -> std::result::Result<SeverityMaps, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use icu_model::{PhenotypeBucket, WindowPolicy};
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn loads_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("severity.toml");
        std::fs::write(
            &path,
            "[apache_ii]\n\"98\" = 2\n\"114\" = 7\n\n[apache_iv]\n\"1201\" = 2\n",
        )
        .unwrap();
        let maps = load_severity_maps(&path).unwrap();
        assert_eq!(maps.apache_ii.len(), 2);
        assert_eq!(maps.apache_iv.bucket_for(Some(1201.0)), Some(PhenotypeBucket(2)));
    }

    #[test]
    fn non_numeric_group_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("severity.toml");
        std::fs::write(&path, "[apache_ii]\n\"cardio\" = 1\n").unwrap();
        assert!(matches!(
            load_severity_maps(&path),
            Err(IngestError::Config { .. })
        ));
    }

    #[test]
    fn partial_options_keep_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("labels.toml");
        std::fs::write(
            &path,
            "steps_per_hour = 60\nwindow_policy = \"onset_only\"\n\n[windows]\nurine_hours = 4\n",
        )
        .unwrap();
        let options = load_label_options(&path).unwrap();
        assert_eq!(options.steps_per_hour, 60);
        assert_eq!(options.window_policy, WindowPolicy::OnsetOnly);
        assert_eq!(options.windows.urine_hours, 4);
        assert_eq!(options.windows.mortality_horizon_hours, 24);
        assert_eq!(options.sources.urine, "vm24");
    }

    #[test]
    fn invalid_options_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("labels.toml");
        std::fs::write(&path, "steps_per_hour = 0\n").unwrap();
        assert!(matches!(
            load_label_options(&path),
            Err(IngestError::Model(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_severity_maps(&dir.path().join("absent.toml")),
            Err(IngestError::Io { .. })
        ));
    }
}
