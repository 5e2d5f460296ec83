use std::fmt;

/// Direction of the access that faulted.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Access {
    Read,
    Write,
}

/// Which image a loader was asked to accept.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImageKind {
    Rom,
    Bios,
}

/// Errors produced by the bus and the image loaders.
#[derive(Debug)]
pub enum GbaError {
    /// The address lies outside every range of the memory map.
    BadAddress { address: u32, access: Access },
    /// The address decodes to a known region that has no backing storage in
    /// the current configuration.
    UnimplementedRegion { region: &'static str, address: u32 },
    /// A ROM or BIOS image was missing, truncated or oversized.
    ImageLoad { image: ImageKind, reason: String },
    /// Reading an image from disk failed.
    Io { image: ImageKind, source: std::io::Error },
}

pub type GbaResult<T> = Result<T, GbaError>;

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageKind::Rom => write!(f, "ROM"),
            ImageKind::Bios => write!(f, "BIOS"),
        }
    }
}

impl fmt::Display for GbaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GbaError::BadAddress { address, access } => {
                let op = match access {
                    Access::Read => "read",
                    Access::Write => "write",
                };
                write!(f, "Bad memory {} at 0x{:08X}", op, address)
            }
            GbaError::UnimplementedRegion { region, address } => {
                write!(f, "{} access at 0x{:08X} is not implemented", region, address)
            }
            GbaError::ImageLoad { image, reason } => {
                write!(f, "Failed to load {} image: {}", image, reason)
            }
            GbaError::Io { image, source } => {
                write!(f, "Failed to read {} image: {}", image, source)
            }
        }
    }
}

impl std::error::Error for GbaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GbaError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
