use std::{
    fs,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use volfilt_volume::{VolumeError, VolumeSize};

use crate::{
    conv_utils::{convert_buf_u16_u8_le, convert_buf_u8_u16_le},
    error::IoError,
    series::{PixelSpacing, SlicePlane, SliceSeries},
};

/// Header of a raw volume container.
///
/// The header is stored as JSON next to a payload of `depth * height * width`
/// little endian `u16` samples, slice by slice, rows in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawHeader {
    /// The volume size as `[depth, height, width]`.
    pub size: [usize; 3],
    /// The physical spacing as `[row, col, slice]`.
    pub spacing: [f64; 3],
    /// One position per slice.
    pub positions: Vec<f64>,
    /// The payload file name, relative to the header.
    pub payload: String,
}

/// Read a raw volume container.
///
/// # Arguments
///
/// * `header_path` - The path to the JSON header.
///
/// # Returns
///
/// The slice series stored in the container. The stored spacing is used as
/// pixel spacing and slice thickness.
pub fn read_raw_series(header_path: impl AsRef<Path>) -> Result<SliceSeries<()>, IoError> {
    let header_path = header_path.as_ref();

    // verify the file exists
    if !header_path.exists() {
        return Err(IoError::FileDoesNotExist(header_path.to_path_buf()));
    }

    let header: RawHeader = serde_json::from_reader(BufReader::new(File::open(header_path)?))?;
    let size = VolumeSize::from(header.size);

    let payload_len = size
        .checked_num_samples()
        .and_then(|n| n.checked_mul(2))
        .ok_or(VolumeError::SizeOverflow(size))?;

    if header.positions.len() != size.depth {
        return Err(VolumeError::SliceCountMismatch(size.depth, header.positions.len()).into());
    }

    let payload_path = header_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(&header.payload);
    if !payload_path.exists() {
        return Err(IoError::FileDoesNotExist(payload_path));
    }

    let bytes = fs::read(&payload_path)?;
    if bytes.len() != payload_len {
        return Err(IoError::InvalidPayloadLength(bytes.len(), payload_len));
    }

    log::debug!(
        "reading raw volume {} from {}",
        size,
        payload_path.display()
    );

    let samples = convert_buf_u8_u16_le(&bytes);
    let planes = samples
        .chunks_exact(size.slice_len().max(1))
        .zip(header.positions.iter())
        .map(|(pixels, &position)| SlicePlane {
            position,
            rows: size.height,
            cols: size.width,
            pixels: pixels.to_vec(),
            meta: (),
        })
        .collect::<Vec<_>>();

    let [row, col, slice] = header.spacing;
    let spacing = PixelSpacing {
        pixel_spacing: Some([row, col]),
        slice_thickness: Some(slice),
    };

    Ok(SliceSeries::from_planes(planes, spacing)?)
}

/// Path of the payload written next to `header_path`.
///
/// The header extension is replaced by `raw`, or by `payload.raw` when the
/// header itself already has the `raw` extension.
fn payload_path_for(header_path: &Path) -> PathBuf {
    let payload_path = header_path.with_extension("raw");
    if payload_path == header_path {
        header_path.with_extension("payload.raw")
    } else {
        payload_path
    }
}

/// Write a slice series as a raw volume container.
///
/// The payload is written next to the header, see [`read_raw_series`] for the
/// layout. Samples are narrowed with [`SliceSeries::to_u16_planes`].
///
/// # Arguments
///
/// * `header_path` - The path to the JSON header.
/// * `series` - The series to write.
pub fn write_raw_series<M: Clone>(
    header_path: impl AsRef<Path>,
    series: &SliceSeries<M>,
) -> Result<(), IoError> {
    let header_path = header_path.as_ref();
    let payload_path = payload_path_for(header_path);
    let payload = payload_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let planes = series.to_u16_planes();
    let samples = planes
        .iter()
        .flat_map(|plane| plane.pixels.iter().copied())
        .collect::<Vec<_>>();

    let header = RawHeader {
        size: series.volume().size().into(),
        spacing: series.spacing(),
        positions: series.positions(),
        payload,
    };

    log::debug!(
        "writing raw volume {} to {}",
        series.volume().size(),
        payload_path.display()
    );

    fs::write(&payload_path, convert_buf_u16_u8_le(&samples))?;
    serde_json::to_writer_pretty(File::create(header_path)?, &header)?;

    Ok(())
}
