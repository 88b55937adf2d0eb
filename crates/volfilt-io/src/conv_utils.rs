/// Convert a little endian byte buffer to `u16` samples.
///
/// A trailing odd byte is ignored.
pub fn convert_buf_u8_u16_le(buf: &[u8]) -> Vec<u16> {
    buf.chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect()
}

/// Convert `u16` samples to a little endian byte buffer.
pub fn convert_buf_u16_u8_le(buf: &[u16]) -> Vec<u8> {
    let mut buf_u8: Vec<u8> = Vec::with_capacity(buf.len() * 2);

    for sample in buf {
        buf_u8.extend_from_slice(&sample.to_le_bytes());
    }

    buf_u8
}
