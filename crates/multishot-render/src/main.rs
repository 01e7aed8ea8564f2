//! Render the reference figure from one or more camera angles and write
//! each view as a PNG, exactly as the composition step would capture it.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;
use multishot_core::{AspectRatio, MAX_COMPOSITIONS, OrbitCamera, RenderError, Viewport};

/// Render composition snapshots of the reference figure without a browser.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Frame shape: "1:1", "16:9" or "9:16".
    #[arg(short, long, value_name = "RATIO", default_value = "1:1")]
    aspect_ratio: AspectRatio,

    /// Camera placement as "AZ,EL[,DIST]": azimuth and elevation in
    /// degrees, optional distance from the figure. Repeat for up to three
    /// views.
    #[arg(long = "angle", value_name = "AZ,EL[,DIST]", required = true)]
    angles: Vec<Angle>,

    /// Directory the `composition-<n>.png` files are written to.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("at most {MAX_COMPOSITIONS} angles may be given, got {0}")]
    TooManyAngles(usize),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Camera angles
// ---------------------------------------------------------------------------

/// One `--angle` value.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Angle {
    azimuth: f32,
    elevation: f32,
    /// Falls back to the default camera distance.
    distance: Option<f32>,
}

impl Angle {
    fn camera(self) -> OrbitCamera {
        let distance = self
            .distance
            .unwrap_or_else(|| OrbitCamera::default().distance());
        OrbitCamera::from_angles(self.azimuth, self.elevation, distance)
    }
}

impl FromStr for Angle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let parse = |name: &str, value: &str| -> Result<f32, String> {
            let n: f32 = value
                .parse()
                .map_err(|e| format!("invalid {name} '{value}': {e}"))?;
            if n.is_finite() {
                Ok(n)
            } else {
                Err(format!("{name} must be finite, got '{value}'"))
            }
        };

        match parts.as_slice() {
            [az, el] => Ok(Self {
                azimuth: parse("azimuth", az)?,
                elevation: parse("elevation", el)?,
                distance: None,
            }),
            [az, el, dist] => {
                let distance = parse("distance", dist)?;
                if distance <= 0.0 {
                    return Err(format!("distance must be positive, got '{dist}'"));
                }
                Ok(Self {
                    azimuth: parse("azimuth", az)?,
                    elevation: parse("elevation", el)?,
                    distance: Some(distance),
                })
            }
            _ => Err(format!("angle must be 'AZ,EL' or 'AZ,EL,DIST', got: '{s}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_all(args: &Args) -> Result<Vec<PathBuf>, CliError> {
    if args.angles.len() > MAX_COMPOSITIONS {
        return Err(CliError::TooManyAngles(args.angles.len()));
    }

    let mut written = Vec::with_capacity(args.angles.len());
    for (i, angle) in args.angles.iter().enumerate() {
        let mut viewport = Viewport::new(args.aspect_ratio).with_camera(angle.camera());
        let shot = viewport.capture()?;

        let path = args.output_dir.join(format!("composition-{}.png", i + 1));
        write_file(&path, shot.image().bytes())?;
        tracing::info!(
            azimuth = angle.azimuth,
            elevation = angle.elevation,
            distance = viewport.camera().distance(),
            "wrote {}",
            path.display()
        );
        written.push(path);
    }
    Ok(written)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, bytes).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = Args::parse();
    let size = args.aspect_ratio.viewport_size();
    tracing::info!(
        "rendering {} view(s) at {}x{} ({})",
        args.angles.len(),
        size.width,
        size.height,
        args.aspect_ratio
    );

    std::fs::create_dir_all(&args.output_dir)?;
    let written = render_all(&args)?;

    tracing::info!("done, {} file(s) written", written.len());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_part_angle() {
        let angle: Angle = "45, 30".parse().unwrap();
        assert_eq!(
            angle,
            Angle {
                azimuth: 45.0,
                elevation: 30.0,
                distance: None
            }
        );
    }

    #[test]
    fn parses_distance() {
        let angle: Angle = "-90,10,6.5".parse().unwrap();
        assert_eq!(angle.distance, Some(6.5));
        assert!((angle.camera().distance() - 6.5).abs() < 1e-5);
    }

    #[test]
    fn rejects_malformed_angles() {
        assert!("45".parse::<Angle>().is_err());
        assert!("45,30,5,1".parse::<Angle>().is_err());
        assert!("east,30".parse::<Angle>().is_err());
        assert!("45,30,0".parse::<Angle>().is_err());
        assert!("45,NaN".parse::<Angle>().is_err());
    }

    #[test]
    fn missing_distance_uses_default_camera_distance() {
        let angle: Angle = "0,0".parse().unwrap();
        let expected = OrbitCamera::default().distance();
        assert!((angle.camera().distance() - expected).abs() < 1e-5);
    }

    #[test]
    fn cli_requires_at_least_one_angle() {
        assert!(Args::try_parse_from(["multishot-render"]).is_err());
        let args =
            Args::try_parse_from(["multishot-render", "-a", "16:9", "--angle", "0,20"]).unwrap();
        assert_eq!(args.aspect_ratio, AspectRatio::Landscape);
        assert_eq!(args.angles.len(), 1);
    }

    #[test]
    fn too_many_angles_is_rejected_before_rendering() {
        let args = Args::try_parse_from([
            "multishot-render",
            "--angle",
            "0,0",
            "--angle",
            "90,0",
            "--angle",
            "180,0",
            "--angle",
            "270,0",
        ])
        .unwrap();
        assert!(matches!(render_all(&args), Err(CliError::TooManyAngles(4))));
    }

    #[test]
    fn writes_one_png_per_angle() {
        let dir = std::env::temp_dir().join(format!("multishot-render-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let args = Args {
            aspect_ratio: AspectRatio::Portrait,
            angles: vec!["30,20".parse().unwrap(), "210,-10,8".parse().unwrap()],
            output_dir: dir.clone(),
        };

        let written = render_all(&args).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[1].ends_with("composition-2.png"));
        for path in &written {
            let bytes = std::fs::read(path).unwrap();
            assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
