//! JSON file input and output.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

use uav_core::Scenario;

pub fn read_scenario(path: &Path) -> Result<Scenario> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse scenario {}", path.display()))?;
    Ok(scenario.normalized())
}

/// Pretty-print `value` to `output`, or to stdout when no path is given.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json).context("failed to write to stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uav_core::{Point, PointRole};

    #[test]
    fn test_scenario_file_round_trip() {
        let path = std::env::temp_dir().join(format!("uav-cli-io-{}.json", std::process::id()));
        let scenario = Scenario {
            targets: vec![Point::target(1.0, 2.0)],
            uavs: Vec::new(),
        };
        write_json(&scenario, Some(&path)).expect("write scenario");

        let loaded = read_scenario(&path).expect("read scenario");
        assert_eq!(loaded.targets, scenario.targets);
        assert_eq!(loaded.targets[0].role, PointRole::Target);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_scenario(Path::new("/nonexistent/scenario.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/scenario.json"));
    }
}
