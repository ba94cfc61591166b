use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::AnimationConfig;
use crate::assets::LoaderOptions;
use crate::errors::Result;
use crate::head_look::HeadLookConfig;

/// Everything an [`AvatarViewer`](crate::viewer::AvatarViewer) needs to know
/// up front. Missing JSON fields fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// File path or http(s) URL of the model.
    pub model_source: String,
    pub loader: LoaderOptions,
    pub camera: CameraConfig,
    /// Where the model root is placed after loading.
    pub model_position: Vec3,
    /// Added to the model's bounds centre to get the camera's aim point.
    pub look_offset: Vec3,
    /// Device pixel ratio cap forwarded to the renderer.
    pub max_pixel_ratio: f32,
    pub animation: AnimationConfig,
    pub head_look: HeadLookConfig,
    pub stage: StageConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_source: "models/character.glb".to_string(),
            loader: LoaderOptions::default(),
            camera: CameraConfig::default(),
            model_position: Vec3::new(1.5, 0.0, 0.0),
            look_offset: Vec3::new(0.5, 0.4, 0.0),
            max_pixel_ratio: 2.0,
            animation: AnimationConfig::default(),
            head_look: HeadLookConfig::default(),
            stage: StageConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 50.0,
            near: 0.1,
            far: 1000.0,
            position: Vec3::new(1.5, 1.7, 2.5),
        }
    }
}

// ============================================================================
// Stage
// ============================================================================

/// Lights and ground handed to the renderer once, before the first frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Clear to transparent so the page shows through.
    pub transparent_background: bool,
    pub ambient: AmbientLightConfig,
    pub key_light: DirectionalLightConfig,
    pub fill_light: DirectionalLightConfig,
    pub shadow_catcher: Option<ShadowCatcherConfig>,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            transparent_background: true,
            ambient: AmbientLightConfig::default(),
            key_light: DirectionalLightConfig {
                color: Vec3::ONE,
                intensity: 0.8,
                position: Vec3::new(5.0, 10.0, 5.0),
                shadow: Some(ShadowConfig::default()),
            },
            fill_light: DirectionalLightConfig {
                color: Vec3::ONE,
                intensity: 0.3,
                position: Vec3::new(-5.0, 5.0, -5.0),
                shadow: None,
            },
            shadow_catcher: Some(ShadowCatcherConfig::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientLightConfig {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for AmbientLightConfig {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightConfig {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub shadow: Option<ShadowConfig>,
}

impl Default for DirectionalLightConfig {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.0,
            position: Vec3::new(5.0, 10.0, 5.0),
            shadow: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub map_size: u32,
    pub near: f32,
    pub far: f32,
    /// Half-size of the orthographic shadow frustum.
    pub extent: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_size: 2048,
            near: 0.5,
            far: 50.0,
            extent: 10.0,
        }
    }
}

/// Horizontal plane that only shows received shadows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowCatcherConfig {
    pub size: f32,
    pub height: f32,
    pub opacity: f32,
}

impl Default for ShadowCatcherConfig {
    fn default() -> Self {
        Self {
            size: 20.0,
            height: 0.0,
            opacity: 0.3,
        }
    }
}
