use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::mesh::sphere;

pub const SETTINGS_FILE: &str = "settings.json";

/// Largest shadow map edge accepted from the settings file.
const MAX_SHADOW_MAP_SIZE: u32 = 8192;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoSettings {
    #[serde(default = "DemoSettings::default_shadow_map_size")]
    pub shadow_map_size: u32,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default)]
    pub present_mode: PresentModeSetting,
    #[serde(default)]
    pub animation: AnimationSettings,
    #[serde(default)]
    pub pcf_mode: u32,
    #[serde(default)]
    pub tessellation: Tessellation,
    /// WGSL file replacing the built-in shader.
    #[serde(default)]
    pub shader_path: Option<PathBuf>,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            shadow_map_size: Self::default_shadow_map_size(),
            resolution: Resolution::default(),
            present_mode: PresentModeSetting::default(),
            animation: AnimationSettings::default(),
            pcf_mode: 0,
            tessellation: Tessellation::default(),
            shader_path: None,
        }
    }
}

impl DemoSettings {
    pub fn load() -> Self {
        Self::load_from_path(SETTINGS_FILE)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents, path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("Settings file {:?} not found. Using default settings.", path);
                Self::default()
            }
            Err(err) => {
                warn!(
                    "Failed to read {:?} ({}). Falling back to default settings.",
                    path, err
                );
                Self::default()
            }
        }
    }

    fn from_json(contents: &str, origin: &Path) -> Self {
        match serde_json::from_str::<DemoSettings>(contents) {
            Ok(settings) => {
                info!("Loaded settings from {:?}", origin);
                settings.validate()
            }
            Err(err) => {
                warn!(
                    "Failed to parse {:?} ({}). Falling back to default settings.",
                    origin, err
                );
                Self::default()
            }
        }
    }

    fn validate(mut self) -> Self {
        if self.shadow_map_size == 0 || self.shadow_map_size > MAX_SHADOW_MAP_SIZE {
            warn!(
                "Shadow map size {} is outside 1..={}. Using default value.",
                self.shadow_map_size, MAX_SHADOW_MAP_SIZE
            );
            self.shadow_map_size = Self::default_shadow_map_size();
        }

        if self.resolution.width == 0 || self.resolution.height == 0 {
            warn!("Resolution must be greater than zero. Using default resolution.");
            self.resolution = Resolution::default();
        }

        if self.pcf_mode > 2 {
            warn!("PCF mode {} does not exist. Using 0.", self.pcf_mode);
            self.pcf_mode = 0;
        }

        let rate = self.animation.reference_rate;
        if !rate.is_finite() || rate <= 0.0 {
            warn!("Animation reference rate must be positive. Using default.");
            self.animation.reference_rate = AnimationSettings::default().reference_rate;
        }

        self.tessellation = self.tessellation.validate();
        self
    }

    pub fn present_mode(&self, available: &[wgpu::PresentMode]) -> wgpu::PresentMode {
        let desired = self.present_mode.to_wgpu();
        if available.contains(&desired) {
            return desired;
        }

        warn!(
            "Requested present mode {:?} is not supported. Falling back to FIFO.",
            desired
        );

        if available.contains(&wgpu::PresentMode::Fifo) {
            wgpu::PresentMode::Fifo
        } else {
            available
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo)
        }
    }

    const fn default_shadow_map_size() -> u32 {
        512
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentModeSetting {
    #[default]
    Fifo,
    FifoRelaxed,
    Immediate,
    Mailbox,
    AutoVsync,
    AutoNoVsync,
}

impl PresentModeSetting {
    fn to_wgpu(self) -> wgpu::PresentMode {
        match self {
            PresentModeSetting::Fifo => wgpu::PresentMode::Fifo,
            PresentModeSetting::FifoRelaxed => wgpu::PresentMode::FifoRelaxed,
            PresentModeSetting::Immediate => wgpu::PresentMode::Immediate,
            PresentModeSetting::Mailbox => wgpu::PresentMode::Mailbox,
            PresentModeSetting::AutoVsync => wgpu::PresentMode::AutoVsync,
            PresentModeSetting::AutoNoVsync => wgpu::PresentMode::AutoNoVsync,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMode {
    /// Every redraw advances the animation by one fixed step.
    #[default]
    PerFrame,
    /// Steps are scaled by elapsed time relative to `reference_rate`.
    TimeScaled,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSettings {
    #[serde(default)]
    pub step_mode: StepMode,
    #[serde(default = "AnimationSettings::default_reference_rate")]
    pub reference_rate: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            step_mode: StepMode::default(),
            reference_rate: Self::default_reference_rate(),
        }
    }
}

impl AnimationSettings {
    const fn default_reference_rate() -> f32 {
        60.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tessellation {
    pub sphere_rings: u32,
    pub sphere_sectors: u32,
    pub teapot_grid: u32,
    pub torus_sides: u32,
    pub torus_rings: u32,
    pub plane_divisions: u32,
}

impl Default for Tessellation {
    fn default() -> Self {
        Self {
            sphere_rings: 20,
            sphere_sectors: 30,
            teapot_grid: 5,
            torus_sides: 20,
            torus_rings: 40,
            plane_divisions: 2,
        }
    }
}

impl Tessellation {
    fn validate(self) -> Self {
        let defaults = Self::default();
        let check = |name: &str, value: u32, min: u32, default: u32| {
            if value < min {
                warn!("Tessellation `{name}` must be at least {min}, got {value}. Using {default}.");
                default
            } else {
                value
            }
        };

        Self {
            sphere_rings: check("sphere_rings", self.sphere_rings, sphere::MIN_COUNT, defaults.sphere_rings),
            sphere_sectors: check("sphere_sectors", self.sphere_sectors, sphere::MIN_COUNT, defaults.sphere_sectors),
            teapot_grid: check("teapot_grid", self.teapot_grid, 1, defaults.teapot_grid),
            torus_sides: check("torus_sides", self.torus_sides, 3, defaults.torus_sides),
            torus_rings: check("torus_rings", self.torus_rings, 3, defaults.torus_rings),
            plane_divisions: check(
                "plane_divisions",
                self.plane_divisions,
                1,
                defaults.plane_divisions,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_settings() -> DemoSettings {
        DemoSettings {
            shadow_map_size: 0,
            resolution: Resolution {
                width: 0,
                height: 0,
            },
            present_mode: PresentModeSetting::Immediate,
            animation: AnimationSettings {
                step_mode: StepMode::TimeScaled,
                reference_rate: -1.0,
            },
            pcf_mode: 7,
            tessellation: Tessellation {
                sphere_rings: 1,
                teapot_grid: 0,
                ..Tessellation::default()
            },
            shader_path: None,
        }
    }

    #[test]
    fn validate_replaces_invalid_values_with_defaults() {
        let validated = invalid_settings().validate();
        let defaults = DemoSettings::default();

        assert_eq!(validated.shadow_map_size, defaults.shadow_map_size);
        assert_eq!(validated.resolution, defaults.resolution);
        assert_eq!(validated.pcf_mode, 0);
        assert_eq!(validated.animation.reference_rate, 60.0);
        assert_eq!(validated.animation.step_mode, StepMode::TimeScaled);
        assert_eq!(validated.tessellation, Tessellation::default());
        assert_eq!(validated.present_mode, PresentModeSetting::Immediate);
    }

    #[test]
    fn validate_preserves_valid_values() {
        let valid = DemoSettings {
            shadow_map_size: 2048,
            resolution: Resolution {
                width: 1920,
                height: 1080,
            },
            pcf_mode: 2,
            tessellation: Tessellation {
                teapot_grid: 10,
                ..Tessellation::default()
            },
            ..DemoSettings::default()
        };

        assert_eq!(valid.clone().validate(), valid);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let settings = DemoSettings::from_json(
            r#"{ "shadow_map_size": 1024, "animation": { "step_mode": "time_scaled" },
                 "tessellation": { "teapot_grid": 8 } }"#,
            Path::new("inline"),
        );

        assert_eq!(settings.shadow_map_size, 1024);
        assert_eq!(settings.animation.step_mode, StepMode::TimeScaled);
        assert_eq!(settings.animation.reference_rate, 60.0);
        assert_eq!(settings.tessellation.teapot_grid, 8);
        assert_eq!(settings.tessellation.torus_rings, 40);
        assert_eq!(settings.resolution, Resolution::default());
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        let settings = DemoSettings::from_json("{ not json", Path::new("inline"));
        assert_eq!(settings, DemoSettings::default());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let settings = DemoSettings::load_from_path("definitely/not/here/settings.json");
        assert_eq!(settings, DemoSettings::default());
    }

    #[test]
    fn sphere_counts_below_minimum_are_replaced() {
        let settings = DemoSettings::from_json(
            r#"{ "tessellation": { "sphere_rings": 2, "sphere_sectors": 2 } }"#,
            Path::new("inline"),
        );
        let tessellation = settings.tessellation;
        assert_eq!(tessellation.sphere_rings, Tessellation::default().sphere_rings);
        assert_eq!(tessellation.sphere_sectors, Tessellation::default().sphere_sectors);

        let at_minimum = Tessellation {
            sphere_rings: sphere::MIN_COUNT,
            sphere_sectors: sphere::MIN_COUNT,
            ..Tessellation::default()
        }
        .validate();
        let mesh = crate::mesh::sphere(1.0, at_minimum.sphere_rings, at_minimum.sphere_sectors);
        assert!(!mesh.triangulated().is_empty());
    }

    #[test]
    fn present_mode_falls_back_to_fifo_then_first_available() {
        use wgpu::PresentMode::{Fifo, Immediate, Mailbox};

        let cases: [(&[wgpu::PresentMode], wgpu::PresentMode); 3] = [
            (&[Fifo, Mailbox, Immediate], Mailbox),
            (&[Fifo, Immediate], Fifo),
            (&[Immediate], Immediate),
        ];
        let settings = DemoSettings {
            present_mode: PresentModeSetting::Mailbox,
            ..DemoSettings::default()
        };

        for (available, expected) in cases {
            assert_eq!(settings.present_mode(available), expected, "{available:?}");
        }
    }
}
