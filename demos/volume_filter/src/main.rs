use argh::FromArgs;
use std::path::PathBuf;

use volfilt::{
    filter::{
        border::BorderMode,
        filter::{self, CorrelationOptions},
        parallel::ExecutionStrategy,
    },
    io::raw,
};

#[derive(FromArgs)]
/// Apply a separable 3D filter to a raw volume
struct Args {
    /// path to the input volume header (.json)
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path to the output volume header (.json)
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// the filter to apply: gaussian, sobel or magnitude
    #[argh(option, default = "String::from(\"gaussian\")")]
    filter: String,

    /// the sigma for the gaussian filter
    #[argh(option, default = "1.0")]
    sigma: f64,

    /// the sobel derivative axis: 0 rows, 1 columns, 2 depth
    #[argh(option, default = "0")]
    axis: usize,

    /// border mode code: 0 constant, 1 replicate, 2 reflect, 3 reflect101
    #[argh(option, default = "1")]
    border: i32,

    /// the fill value of the constant border
    #[argh(option, default = "0.0")]
    fill: f64,

    /// absolute tolerance of the kernel symmetry detection
    #[argh(option, default = "1e-6")]
    tolerance: f64,

    /// run the filters on the current thread only
    #[argh(switch)]
    serial: bool,

    /// interpret sigma in physical units, divided by the spacing of each axis
    #[argh(switch)]
    physical: bool,
}

/// Convert a sigma in physical units to per-axis sigmas in samples.
///
/// `spacing` is `[row, col, slice]`, the result is ordered `[row, col, depth]`.
fn physical_sigmas(sigma: f64, spacing: [f64; 3]) -> [f64; 3] {
    spacing.map(|s| sigma / s)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let border = BorderMode::from_code(args.border, args.fill)?;
    let options = CorrelationOptions {
        symmetry_tolerance: args.tolerance,
        strategy: if args.serial {
            ExecutionStrategy::Serial
        } else {
            ExecutionStrategy::Auto
        },
    };

    let series = raw::read_raw_series(&args.input)?;
    log::info!(
        "loaded volume {} with spacing {:?}",
        series.volume().size(),
        series.spacing()
    );

    let filtered = match args.filter.to_lowercase().as_str() {
        "gaussian" => {
            let sigmas = if args.physical {
                physical_sigmas(args.sigma, series.spacing())
            } else {
                [args.sigma; 3]
            };
            log::info!("gaussian filter with sigmas {:?} (row, col, depth)", sigmas);
            filter::gaussian_filter3d_with_options(series.volume(), sigmas, border, &options)?
        }
        "sobel" => {
            log::info!("sobel filter along axis {}", args.axis);
            filter::sobel3d_with_options(series.volume(), args.axis, border, &options)?
        }
        "magnitude" => {
            log::info!("sobel gradient magnitude");
            filter::sobel_magnitude3d_with_options(series.volume(), border, &options)?
        }
        _ => {
            return Err(format!("Invalid filter: {}", args.filter).into());
        }
    };

    let series = series.with_volume(filtered)?;
    raw::write_raw_series(&args.output, &series)?;

    log::info!("wrote {}", args.output.display());

    Ok(())
}
