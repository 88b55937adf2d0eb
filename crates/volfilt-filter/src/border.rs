use volfilt_volume::VolumeError;

/// A border type for synthesizing samples beyond the volume extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BorderMode {
    /// This border type fills the border with a single, constant value.
    ///
    /// Example: ...d c b a | v v v v...
    Constant(f64),

    /// This border type takes the outermost sample and repeats it into the padded region.
    ///
    /// Example: ...d c b a | a a a a...
    #[default]
    Replicate,

    /// This border type mirrors the samples at the boundary, starting with the edge sample itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,

    /// This border type mirrors the samples at the boundary, starting with the
    /// sample 'next' to the edge.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,
}

impl BorderMode {
    /// Build a border mode from its integer code.
    ///
    /// `0=Constant, 1=Replicate, 2=Reflect, 3=Reflect101`. The `fill` value is
    /// only kept for the constant mode.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::InvalidBorderCode`] for any other code.
    ///
    /// # Example
    ///
    /// ```rust
    /// use volfilt_filter::border::BorderMode;
    ///
    /// assert_eq!(BorderMode::from_code(0, 7.0).unwrap(), BorderMode::Constant(7.0));
    /// assert_eq!(BorderMode::from_code(3, 7.0).unwrap(), BorderMode::Reflect101);
    /// assert!(BorderMode::from_code(4, 0.0).is_err());
    /// ```
    pub fn from_code(code: i32, fill: f64) -> Result<Self, VolumeError> {
        match code {
            0 => Ok(BorderMode::Constant(fill)),
            1 => Ok(BorderMode::Replicate),
            2 => Ok(BorderMode::Reflect),
            3 => Ok(BorderMode::Reflect101),
            _ => Err(VolumeError::InvalidBorderCode(code)),
        }
    }

    /// The integer code of the border mode.
    pub fn code(&self) -> i32 {
        match self {
            BorderMode::Constant(_) => 0,
            BorderMode::Replicate => 1,
            BorderMode::Reflect => 2,
            BorderMode::Reflect101 => 3,
        }
    }

    /// The fill value, if this is the constant mode.
    pub fn fill_value(&self) -> Option<f64> {
        match self {
            BorderMode::Constant(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i - 1;
            } else {
                i = 2 * len - i - 1;
            }
        }
        i as usize
    }

    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }

    /// Maps index `i` to a valid index i.e. within `[0, len)` according to the border mode.
    ///
    /// - `Replicate`: clamp to edge
    /// - `Reflect`: mirror including edge
    /// - `Reflect101`: mirror excluding edge
    /// - `Constant`: returns 0, the caller substitutes the fill value
    ///
    /// The reflection is repeated until the index lands inside the axis, so
    /// offsets farther than `len` from the edge still resolve.
    /// A zero-length axis maps everything to 0.
    ///
    /// # Example
    ///
    /// ```rust
    /// use volfilt_filter::border::BorderMode;
    ///
    /// assert_eq!(BorderMode::Replicate.map_index(-3, 4), 0);
    /// assert_eq!(BorderMode::Reflect.map_index(-1, 4), 0);
    /// assert_eq!(BorderMode::Reflect101.map_index(-1, 4), 1);
    /// assert_eq!(BorderMode::Reflect.map_index(4, 4), 3);
    /// assert_eq!(BorderMode::Reflect101.map_index(4, 4), 2);
    /// ```
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match self {
            BorderMode::Replicate => i.clamp(0, len as isize - 1) as usize,
            BorderMode::Reflect => Self::reflect(i, len),
            BorderMode::Reflect101 => Self::reflect101(i, len),
            BorderMode::Constant(_) => 0,
        }
    }
}
