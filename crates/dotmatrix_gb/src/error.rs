use snafu::prelude::*;

/// Reasons a ROM image is refused at load time.
///
/// These are the only fatal conditions in the core; everything that can go
/// wrong once the machine is running resolves to a defined value instead.
#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum InvalidRom {
    #[snafu(display("ROM image is {len} bytes, shorter than the 0x0150-byte header"))]
    TooShort { len: usize },
    #[snafu(display("unsupported ROM size code {code:#04x} at 0x0148"))]
    UnsupportedRomSize { code: u8 },
    #[snafu(display(
        "header declares {declared} ROM banks ({expected_len} bytes) but the image holds {len} bytes"
    ))]
    Truncated {
        declared: usize,
        expected_len: usize,
        len: usize,
    },
    #[snafu(display("header checksum mismatch: stored {stored:#04x}, computed {computed:#04x}"))]
    HeaderChecksum { stored: u8, computed: u8 },
}
