use serde::{Deserialize, Serialize};

/// A 3D point or direction in world units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Which agents contribute separation force
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeparationMode {
    All,
    WithinRadius,
}

/// Flock settings as stored on disk.
///
/// Every field must be present; missing or unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimulationSettings {
    pub population: usize,
    pub detection_radius: f32,
    pub max_speed: f32,
    pub max_force: f32,
    /// Half-extents of the bounding box on each axis
    pub bounds: Point3,
    pub boundary_multiplier: f32,
    pub seek_interval: f32,
    pub seek_epsilon: f32,
    pub initial_speed: f32,
    pub separation: SeparationMode,
    pub seed: u64,
}

impl SimulationSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Starting template written by `boid-sim --write-template`.
impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            population: 300,
            detection_radius: 5.0,
            max_speed: 6.0,
            max_force: 3.0,
            bounds: Point3::new(25.0, 15.0, 25.0),
            boundary_multiplier: 4.0,
            seek_interval: 3.0,
            seek_epsilon: 0.1,
            initial_speed: 2.0,
            separation: SeparationMode::All,
            seed: 123,
        }
    }
}

/// State of one agent at the end of a tick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentSnapshot {
    pub id: usize,
    pub position: Point3,
    pub velocity: Point3,
    pub heading: Point3,
}

/// Per-tick summary emitted by the headless runner, one JSON object per line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub elapsed: f64,
    pub mean_speed: f32,
    pub max_speed: f32,
    pub centroid: Point3,
    pub outside_bounds: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents: Option<Vec<AgentSnapshot>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_parse() {
        let json = r#"{
            "population": 10,
            "detection_radius": 2.0,
            "max_speed": 4.0,
            "max_force": 1.0,
            "bounds": { "x": 5.0, "y": 5.0, "z": 5.0 },
            "boundary_multiplier": 2.0,
            "seek_interval": 1.5,
            "seek_epsilon": 0.1,
            "initial_speed": 0.0,
            "separation": "within_radius",
            "seed": 9
        }"#;
        let settings = SimulationSettings::from_json(json).unwrap();
        assert_eq!(settings.population, 10);
        assert_eq!(settings.separation, SeparationMode::WithinRadius);
        assert_eq!(settings.bounds, Point3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let json = r#"{ "population": 10 }"#;
        assert!(SimulationSettings::from_json(json).is_err());
    }

    #[test]
    fn test_template_survives_json() {
        let template = SimulationSettings::default();
        let json = template.to_json_pretty().unwrap();
        assert_eq!(SimulationSettings::from_json(&json).unwrap(), template);
    }

    #[test]
    fn test_report_omits_agents_when_absent() {
        let report = TickReport {
            tick: 1,
            elapsed: 0.5,
            mean_speed: 1.0,
            max_speed: 2.0,
            centroid: Point3::new(0.0, 0.0, 0.0),
            outside_bounds: 0,
            agents: None,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("agents"));
    }
}
