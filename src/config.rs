//! Render configuration.
//!
//! [`RenderConfig`] is a plain value passed into every render call. It can
//! be deserialized from JSON; every field is optional and falls back to its
//! default. The camelCase debug flag names used by older configuration
//! files are accepted as aliases.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::DensityChannel;
use crate::density_ramp::RampSampling;
use crate::error::{LandscapeError, Result};
use crate::image_accessors::EdgePolicy;
use crate::rasterizer::{MarkerShape, DEFAULT_RADIUS};
use crate::rendering_buffer::SpanBlend;

/// Default blur spread.
pub const DEFAULT_SIGMA: f64 = 1.0;

/// Runtime-tunable rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Blur spread: spacing of kernel taps in texels.
    pub sigma: f64,
    /// Marker radius in pixels.
    pub radius: f64,
    /// Present the raw marker pass, skipping both blur passes.
    #[serde(alias = "debugRenderParticlesOnly", alias = "particlesOnly")]
    pub particles_only: bool,
    /// Render on every tick regardless of the dirty flag.
    #[serde(alias = "debugFullBlast", alias = "forceRender")]
    pub force_render: bool,
    pub marker: MarkerShape,
    pub marker_blend: SpanBlend,
    pub edge_policy: EdgePolicy,
    pub ramp_sampling: RampSampling,
    pub density_channel: DensityChannel,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            radius: DEFAULT_RADIUS,
            particles_only: false,
            force_render: false,
            marker: MarkerShape::Disk,
            marker_blend: SpanBlend::Replace,
            edge_policy: EdgePolicy::Clamp,
            ramp_sampling: RampSampling::Linear,
            density_channel: DensityChannel::Red,
        }
    }
}

impl RenderConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LandscapeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject parameters that would make the passes undefined.
    pub fn validate(&self) -> Result<()> {
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(LandscapeError::InvalidConfig(format!(
                "sigma must be finite and non-negative, got {}",
                self.sigma
            )));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(LandscapeError::InvalidConfig(format!(
                "radius must be finite and non-negative, got {}",
                self.radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = RenderConfig::default();
        assert_eq!(c.sigma, 1.0);
        assert_eq!(c.radius, 10.0);
        assert!(!c.particles_only);
        assert!(!c.force_render);
        assert_eq!(c.edge_policy, EdgePolicy::Clamp);
        assert_eq!(c.ramp_sampling, RampSampling::Linear);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c = RenderConfig::from_json_str(r#"{"sigma": 2.5}"#).unwrap();
        assert_eq!(c.sigma, 2.5);
        assert_eq!(c.radius, 10.0);
        assert_eq!(c.marker, MarkerShape::Disk);
    }

    #[test]
    fn test_debug_flag_aliases() {
        let c = RenderConfig::from_json_str(
            r#"{"debugRenderParticlesOnly": true, "debugFullBlast": true}"#,
        )
        .unwrap();
        assert!(c.particles_only);
        assert!(c.force_render);
    }

    #[test]
    fn test_enum_fields_snake_case() {
        let c = RenderConfig::from_json_str(
            r#"{"marker": "textured", "edge_policy": "mirror", "ramp_sampling": "nearest",
                "density_channel": "alpha", "marker_blend": "additive"}"#,
        )
        .unwrap();
        assert_eq!(c.marker, MarkerShape::Textured);
        assert_eq!(c.edge_policy, EdgePolicy::Mirror);
        assert_eq!(c.ramp_sampling, RampSampling::Nearest);
        assert_eq!(c.density_channel, DensityChannel::Alpha);
        assert_eq!(c.marker_blend, SpanBlend::Additive);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = RenderConfig::from_json_str(r#"{"sigma": -1.0}"#).unwrap_err();
        assert!(matches!(err, LandscapeError::InvalidConfig(_)));

        let c = RenderConfig {
            radius: f64::NAN,
            ..RenderConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = RenderConfig::from_json_str("{sigma:").unwrap_err();
        assert!(matches!(err, LandscapeError::Json(_)));
    }
}
