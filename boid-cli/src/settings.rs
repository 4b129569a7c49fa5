use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use boid_core::{SeparationRange, SimulationConfig, Vector3D};
use boid_shared::{Point3, SeparationMode, SimulationSettings};

pub fn load_settings(path: &Path) -> Result<SimulationSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    SimulationSettings::from_json(&text)
        .with_context(|| format!("Invalid settings in {}", path.display()))
}

pub fn write_template(path: &Path) -> Result<()> {
    let json = SimulationSettings::default().to_json_pretty()?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote settings template to {}", path.display());
    Ok(())
}

/// Core configuration from on-disk settings. Validation happens at initialize.
pub fn to_config(settings: &SimulationSettings) -> SimulationConfig {
    SimulationConfig {
        detection_radius: settings.detection_radius,
        max_speed: settings.max_speed,
        max_force: settings.max_force,
        bounds: to_vector(settings.bounds),
        boundary_multiplier: settings.boundary_multiplier,
        seek_interval: settings.seek_interval,
        seek_epsilon: settings.seek_epsilon,
        initial_speed: settings.initial_speed,
        separation_range: match settings.separation {
            SeparationMode::All => SeparationRange::All,
            SeparationMode::WithinRadius => SeparationRange::WithinRadius,
        },
        seed: settings.seed,
    }
}

pub fn to_vector(p: Point3) -> Vector3D {
    Vector3D::new(p.x, p.y, p.z)
}

pub fn to_point(v: Vector3D) -> Point3 {
    Point3::new(v.x, v.y, v.z)
}
