use volfilt_volume::{Volume, VolumeError, VolumeSize};

/// Spacing below which a distance is treated as missing.
pub const MIN_SPACING: f64 = 0.01;

/// One acquired slice: a `u16` plane with its position and opaque metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct SlicePlane<M> {
    /// Position of the slice along the stacking direction.
    pub position: f64,
    /// Number of rows of the plane.
    pub rows: usize,
    /// Number of columns of the plane.
    pub cols: usize,
    /// Row-major samples, `rows * cols` values.
    pub pixels: Vec<u16>,
    /// Metadata carried along with the slice, never read by the filters.
    pub meta: M,
}

/// In-plane spacing and slice thickness as reported by the acquisition.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PixelSpacing {
    /// Distance between rows and between columns, `[row, col]`.
    pub pixel_spacing: Option<[f64; 2]>,
    /// Nominal slice thickness.
    pub slice_thickness: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
struct SliceRecord<M> {
    position: f64,
    meta: M,
}

/// A stack of slices as a single `f64` volume plus its per-slice records.
///
/// The record at index `z` belongs to slice `z` of the volume.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceSeries<M> {
    volume: Volume<f64>,
    spacing: [f64; 3],
    records: Vec<SliceRecord<M>>,
}

impl<M> SliceSeries<M> {
    /// Assemble a series from unordered slice planes.
    ///
    /// The planes are sorted by position and widened to `f64`.
    ///
    /// # Arguments
    ///
    /// * `planes` - The acquired planes, in any order.
    /// * `pixel_spacing` - The acquisition spacing.
    ///
    /// # Errors
    ///
    /// * [`VolumeError::EmptyVolume`] if there are no planes.
    /// * [`VolumeError::InvalidDataLength`] if a plane holds a wrong number of pixels.
    /// * [`VolumeError::RaggedSlice`] if the planes do not share the same shape.
    ///
    /// # Example
    ///
    /// ```rust
    /// use volfilt_io::series::{PixelSpacing, SlicePlane, SliceSeries};
    ///
    /// let plane = |position: f64, value: u16| SlicePlane {
    ///     position,
    ///     rows: 1,
    ///     cols: 2,
    ///     pixels: vec![value; 2],
    ///     meta: (),
    /// };
    ///
    /// let series = SliceSeries::from_planes(
    ///     vec![plane(2.5, 20), plane(0.0, 10)],
    ///     PixelSpacing::default(),
    /// ).unwrap();
    ///
    /// assert_eq!(series.volume().as_slice(), &[10.0, 10.0, 20.0, 20.0]);
    /// assert_eq!(series.spacing(), [1.0, 1.0, 2.5]);
    /// ```
    pub fn from_planes(
        mut planes: Vec<SlicePlane<M>>,
        pixel_spacing: PixelSpacing,
    ) -> Result<Self, VolumeError> {
        let Some(first) = planes.first() else {
            return Err(VolumeError::EmptyVolume);
        };
        let (rows, cols) = (first.rows, first.cols);
        let plane_len = rows
            .checked_mul(cols)
            .ok_or(VolumeError::SizeOverflow([1, rows, cols].into()))?;

        for (z, plane) in planes.iter().enumerate() {
            if plane.rows != rows || plane.cols != cols {
                return Err(VolumeError::RaggedSlice(z, plane.rows, plane.cols, rows, cols));
            }
            if plane.pixels.len() != plane_len {
                return Err(VolumeError::InvalidDataLength(plane.pixels.len(), plane_len));
            }
        }

        planes.sort_by(|a, b| a.position.total_cmp(&b.position));

        let size = VolumeSize {
            depth: planes.len(),
            height: rows,
            width: cols,
        };

        let mut pixels = Vec::with_capacity(planes.len() * plane_len);
        let mut records = Vec::with_capacity(planes.len());
        for plane in planes {
            pixels.extend_from_slice(&plane.pixels);
            records.push(SliceRecord {
                position: plane.position,
                meta: plane.meta,
            });
        }

        let positions = records.iter().map(|r| r.position).collect::<Vec<_>>();
        let spacing = estimate_spacing(&pixel_spacing, &positions);

        log::debug!("assembled series of size {}, spacing {:?}", size, spacing);

        Ok(Self {
            volume: Volume::<u16>::new(size, pixels)?.cast::<f64>()?,
            spacing,
            records,
        })
    }

    /// The volume samples, slice `z` is the `z`-th slice by position.
    pub fn volume(&self) -> &Volume<f64> {
        &self.volume
    }

    /// The physical spacing `[row, col, slice]`.
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing
    }

    /// The slice positions in volume order.
    pub fn positions(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.position).collect()
    }

    /// The slice metadata in volume order.
    pub fn metadata(&self) -> impl Iterator<Item = &M> {
        self.records.iter().map(|r| &r.meta)
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the series has no slices.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the volume, typically with a filtered version of it.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::SliceCountMismatch`] if the depth of `volume`
    /// differs from the number of slices.
    pub fn with_volume(self, volume: Volume<f64>) -> Result<Self, VolumeError> {
        if volume.depth() != self.records.len() {
            return Err(VolumeError::SliceCountMismatch(
                volume.depth(),
                self.records.len(),
            ));
        }
        Ok(Self { volume, ..self })
    }

    /// Narrow the volume back to `u16` planes.
    ///
    /// Each sample is clamped to `[0, 65535]` and rounded to the nearest
    /// integer. Metadata is cloned onto the plane of its slice.
    pub fn to_u16_planes(&self) -> Vec<SlicePlane<M>>
    where
        M: Clone,
    {
        let size = self.volume.size();
        self.volume
            .as_slice()
            .chunks_exact(size.slice_len().max(1))
            .zip(self.records.iter())
            .map(|(slice, record)| SlicePlane {
                position: record.position,
                rows: size.height,
                cols: size.width,
                pixels: slice.iter().map(|&v| to_u16(v)).collect(),
                meta: record.meta.clone(),
            })
            .collect()
    }
}

/// Narrow a sample to `u16`, clamping to the representable range.
///
/// NaN maps to 0.
pub fn to_u16(value: f64) -> u16 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, u16::MAX as f64).round() as u16
}

/// Estimate the physical spacing `[row, col, slice]` of a series.
///
/// In-plane spacing defaults to `1.0` when missing. The slice spacing is the
/// slice thickness when above [`MIN_SPACING`], else the distance between the
/// first two positions when above [`MIN_SPACING`], else `1.0`.
pub fn estimate_spacing(pixel_spacing: &PixelSpacing, positions: &[f64]) -> [f64; 3] {
    let [row, col] = pixel_spacing.pixel_spacing.unwrap_or_else(|| {
        log::warn!("pixel spacing is missing, using 1.0");
        [1.0, 1.0]
    });

    let slice = match pixel_spacing.slice_thickness {
        Some(thickness) if thickness > MIN_SPACING => thickness,
        _ => match positions {
            [p0, p1, ..] if (p1 - p0).abs() > MIN_SPACING => (p1 - p0).abs(),
            _ => {
                log::warn!("slice spacing can not be estimated, using 1.0");
                1.0
            }
        },
    };

    [row, col, slice]
}
