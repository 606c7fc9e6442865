//! Parameters of the layout computation.

use crate::layout::LayoutError;
use serde::{Deserialize, Serialize};

/// Default drag of internal vertices toward their parent
pub const DEFAULT_DRAG: f64 = 0.2;

/// Default longitude range of the spherical projection (±120°)
pub const DEFAULT_LONGITUDE_LIMITS: (f64, f64) = (-2.0 * std::f64::consts::PI / 3.0, 2.0 * std::f64::consts::PI / 3.0);

/// Default latitude range of the spherical projection (±60°)
pub const DEFAULT_LATITUDE_LIMITS: (f64, f64) = (-std::f64::consts::PI / 3.0, std::f64::consts::PI / 3.0);

/// How a child is connected to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchStyle {
    /// Right-angled dendrogram lines: one horizontal segment per child and one
    /// vertical segment spanning the children of each internal vertex
    #[default]
    Rectangular,
    /// A straight segment from parent to child
    Diagonal,
}

/// Parameters of [TreeLayouter](crate::layout::TreeLayouter).
///
/// Every field has a default, so a JSON parameter file only needs to list
/// what differs:
/// ```
/// use cosmic_tree::layout::{BranchStyle, LayoutParams};
///
/// let params: LayoutParams =
///     serde_json::from_str(r#"{"drag": 0.5, "branch_style": "diagonal"}"#).unwrap();
/// assert_eq!(params.drag, 0.5);
/// assert_eq!(params.branch_style, BranchStyle::Diagonal);
/// assert_eq!(params.z_scale, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Pull of an internal vertex toward its parent, in `[0, 1]`
    pub drag: f64,
    /// Factor from height to z
    pub z_scale: f64,
    /// Take z of leaves from the coordinate source instead of the height
    pub use_provided_z: bool,
    /// Project the layout onto a pseudo-sphere; ignored with `use_provided_z`
    pub spherical_layout: bool,
    pub branch_style: BranchStyle,
    /// Drop leaves not matched between tree and coordinates instead of failing
    pub ignore_missing: bool,
    /// Place every leaf at the maximum height
    pub ultrametric: bool,
    /// Factor on x (depth) of topology layouts
    pub branch_scaling_factor: f64,
    /// Factor on y (leaf rank) of topology layouts
    pub taxon_scaling_factor: f64,
    /// Target longitude range in radians
    pub longitude_limits: (f64, f64),
    /// Target latitude range in radians
    pub latitude_limits: (f64, f64),
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            drag: DEFAULT_DRAG,
            z_scale: 1.0,
            use_provided_z: false,
            spherical_layout: false,
            branch_style: BranchStyle::Rectangular,
            ignore_missing: false,
            ultrametric: false,
            branch_scaling_factor: 1.0,
            taxon_scaling_factor: 1.0,
            longitude_limits: DEFAULT_LONGITUDE_LIMITS,
            latitude_limits: DEFAULT_LATITUDE_LIMITS,
        }
    }
}

// ============================================================================
// Builder-style setters (pub)
// ============================================================================
impl LayoutParams {
    pub fn with_drag(mut self, drag: f64) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_z_scale(mut self, z_scale: f64) -> Self {
        self.z_scale = z_scale;
        self
    }

    pub fn with_provided_z(mut self, use_provided_z: bool) -> Self {
        self.use_provided_z = use_provided_z;
        self
    }

    pub fn with_spherical_layout(mut self, spherical_layout: bool) -> Self {
        self.spherical_layout = spherical_layout;
        self
    }

    pub fn with_branch_style(mut self, branch_style: BranchStyle) -> Self {
        self.branch_style = branch_style;
        self
    }

    pub fn with_ignore_missing(mut self, ignore_missing: bool) -> Self {
        self.ignore_missing = ignore_missing;
        self
    }

    pub fn with_ultrametric(mut self, ultrametric: bool) -> Self {
        self.ultrametric = ultrametric;
        self
    }

    pub fn with_branch_scaling_factor(mut self, factor: f64) -> Self {
        self.branch_scaling_factor = factor;
        self
    }

    pub fn with_taxon_scaling_factor(mut self, factor: f64) -> Self {
        self.taxon_scaling_factor = factor;
        self
    }

    /// Sets longitude and latitude ranges, in radians.
    pub fn with_sphere_limits(mut self, longitude: (f64, f64), latitude: (f64, f64)) -> Self {
        self.longitude_limits = longitude;
        self.latitude_limits = latitude;
        self
    }
}

// ============================================================================
// Validation (pub)
// ============================================================================
impl LayoutParams {
    /// Checks parameter ranges.
    ///
    /// # Errors
    /// [LayoutError::Configuration] if `drag` is outside `[0, 1]` or any
    /// factor or limit is not finite.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(0.0..=1.0).contains(&self.drag) {
            return Err(LayoutError::configuration(format!(
                "drag must be between 0.0 and 1.0, got {}",
                self.drag
            )));
        }

        let factors = [
            ("z_scale", self.z_scale),
            ("branch_scaling_factor", self.branch_scaling_factor),
            ("taxon_scaling_factor", self.taxon_scaling_factor),
            ("longitude_limits", self.longitude_limits.0),
            ("longitude_limits", self.longitude_limits.1),
            ("latitude_limits", self.latitude_limits.0),
            ("latitude_limits", self.latitude_limits.1),
        ];
        if let Some((name, value)) = factors.iter().find(|(_, value)| !value.is_finite()) {
            return Err(LayoutError::configuration(format!(
                "{name} must be finite, got {value}"
            )));
        }

        Ok(())
    }

    /// Whether the spherical projection actually applies.
    pub fn projects_spherically(&self) -> bool {
        self.spherical_layout && !self.use_provided_z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_bounds_are_inclusive() {
        assert!(LayoutParams::default().with_drag(0.0).validate().is_ok());
        assert!(LayoutParams::default().with_drag(1.0).validate().is_ok());
    }

    #[test]
    fn test_drag_out_of_range() {
        for drag in [-0.01, 1.01, f64::NAN] {
            let err = LayoutParams::default().with_drag(drag).validate().unwrap_err();
            assert!(matches!(err, LayoutError::Configuration(_)), "drag {drag}");
        }
    }

    #[test]
    fn test_infinite_scale() {
        let err = LayoutParams::default()
            .with_z_scale(f64::INFINITY)
            .validate()
            .unwrap_err();
        assert!(err.message().contains("z_scale"));
    }

    #[test]
    fn test_spherical_is_ignored_with_provided_z() {
        let params = LayoutParams::default()
            .with_spherical_layout(true)
            .with_provided_z(true);
        assert!(!params.projects_spherically());
    }
}
