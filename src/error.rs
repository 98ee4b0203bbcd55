use std::fmt;

/// A recoverable failure while parsing a single box or descriptor.
///
/// Any of these is caught at the granularity of one box: the driver
/// reports the message and the absolute offset, hex-dumps whatever is left of the box,
/// and moves on to the next sibling.
#[derive(Debug, Clone)]
pub enum DissectError
{
    /// Read past the end of the current region.
    Eof
    {
        wanted: u64, available: u64
    },
    /// A byte-aligned read was attempted with the bit cursor mid-byte.
    Misaligned,
    /// A declared size/count exceeds what the region can actually hold.
    Overflow(String),
    /// Any other grammar-specific failure (reserved-field violation, bad tag, etc).
    Custom(String)
}

impl fmt::Display for DissectError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self
        {
            | DissectError::Eof { wanted, available } => write!(f, "unexpected end of region (wanted {wanted} bytes, {available} available)"),
            | DissectError::Misaligned => write!(f, "byte-aligned read attempted on a non-byte-aligned bit cursor"),
            | DissectError::Overflow(msg) => write!(f, "declared size overflow: {msg}"),
            | DissectError::Custom(msg) => write!(f, "{msg}")
        }
    }
}

impl std::error::Error for DissectError {}

impl From<String> for DissectError
{
    fn from(msg: String) -> Self
    {
        DissectError::Custom(msg)
    }
}

impl From<&str> for DissectError
{
    fn from(msg: &str) -> Self
    {
        DissectError::Custom(msg.to_string())
    }
}

/// Lets box/descriptor grammars use `?` directly on `Emitter` calls (which return
/// `io::Result`, since the only fallible step there is the underlying `Write`) without
/// every grammar needing its own `.map_err(...)`.
impl From<std::io::Error> for DissectError
{
    fn from(err: std::io::Error) -> Self
    {
        DissectError::Custom(err.to_string())
    }
}

/// A failure that aborts the whole run: the input cannot be
/// opened, or the very first top-level box header cannot be read at all.
#[derive(Debug)]
pub struct FatalError(pub String);

impl fmt::Display for FatalError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for FatalError {}

impl From<std::io::Error> for FatalError
{
    fn from(err: std::io::Error) -> Self
    {
        FatalError(err.to_string())
    }
}
