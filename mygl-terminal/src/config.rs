/// Viewer configuration and command-line arguments
use clap::Parser;

pub const DEFAULT_FOVY: f64 = 45.0;
pub const DEFAULT_NEAR: f64 = 0.1;
pub const DEFAULT_FAR: f64 = 50.0;
pub const DEFAULT_SIZE: f64 = 2.0;
pub const DEFAULT_ROTATE_STEP: f64 = 4.0;
pub const DEFAULT_PAN_STEP: f64 = 0.08;
pub const DEFAULT_ZOOM_STEP: f64 = 0.4;

/// Projection parameters and input sensitivity
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Vertical field of view in degrees.
    pub fovy: f64,
    pub near: f64,
    pub far: f64,
    /// Cube edge length.
    pub size: f64,
    /// Degrees per cell of drag.
    pub rotate_step: f64,
    pub pan_step: f64,
    pub zoom_step: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fovy: DEFAULT_FOVY,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            size: DEFAULT_SIZE,
            rotate_step: DEFAULT_ROTATE_STEP,
            pan_step: DEFAULT_PAN_STEP,
            zoom_step: DEFAULT_ZOOM_STEP,
        }
    }
}

/// Interactive terminal viewer for the MyGL matrix pipeline
#[derive(Debug, Parser)]
#[command(name = "mygl-terminal", version, about)]
pub struct Args {
    /// Vertical field of view in degrees
    #[arg(long, default_value_t = DEFAULT_FOVY)]
    pub fovy: f64,

    /// Near clip plane distance
    #[arg(long, default_value_t = DEFAULT_NEAR)]
    pub near: f64,

    /// Far clip plane distance
    #[arg(long, default_value_t = DEFAULT_FAR)]
    pub far: f64,

    /// Cube edge length
    #[arg(long, default_value_t = DEFAULT_SIZE)]
    pub size: f64,

    /// Rotation in degrees per cell of mouse drag or per arrow key
    #[arg(long, default_value_t = DEFAULT_ROTATE_STEP)]
    pub rotate_step: f64,

    /// Pan distance per cell of middle-button drag
    #[arg(long, default_value_t = DEFAULT_PAN_STEP)]
    pub pan_step: f64,

    /// Zoom distance per cell of right-button drag, wheel notch or +/- key
    #[arg(long, default_value_t = DEFAULT_ZOOM_STEP)]
    pub zoom_step: f64,

    /// Aspect ratio for --print-matrices (the interactive view uses the terminal size)
    #[arg(long, default_value_t = 1.0)]
    pub aspect: f64,

    /// Print the projection and model-view matrices of the default view and exit
    #[arg(long)]
    pub print_matrices: bool,
}

impl Args {
    pub fn config(&self) -> ViewerConfig {
        ViewerConfig {
            fovy: self.fovy,
            near: self.near,
            far: self.far,
            size: self.size,
            rotate_step: self.rotate_step,
            pan_step: self.pan_step,
            zoom_step: self.zoom_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config() {
        let args = Args::parse_from(["mygl-terminal"]);
        assert_eq!(args.config(), ViewerConfig::default());
        assert!(!args.print_matrices);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from(["mygl-terminal", "--fovy", "60", "--far", "200", "--print-matrices"]);
        let config = args.config();
        assert_eq!(config.fovy, 60.0);
        assert_eq!(config.far, 200.0);
        assert!(args.print_matrices);
    }
}
