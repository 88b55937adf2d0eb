use volfilt_volume::VolumeError;

/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to parse or write the container header.
    #[error("Failed to process the volume header. {0}")]
    HeaderError(#[from] serde_json::Error),

    /// The payload does not hold one `u16` per sample of the header size.
    #[error("Payload has {0} bytes, expected {1}")]
    InvalidPayloadLength(usize, usize),

    /// Error to create the volume.
    #[error("Failed to create volume. {0}")]
    VolumeCreationError(#[from] VolumeError),
}
