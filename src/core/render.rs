use std::io::{self, Write};
use std::path::Path;

/// What follows each reported path.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Terminator {
    #[default]
    Newline,
    Nul,
}

impl Terminator {
    fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Newline => b"\n",
            Self::Nul => b"\0",
        }
    }
}

pub fn write_path<W: Write>(writer: &mut W, path: &Path, terminator: Terminator) -> io::Result<()> {
    writer.write_all(path_bytes(path).as_ref())?;
    writer.write_all(terminator.as_bytes())
}

#[cfg(unix)]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn path_bytes(path: &Path) -> std::borrow::Cow<'_, [u8]> {
    match path.to_string_lossy() {
        std::borrow::Cow::Borrowed(s) => std::borrow::Cow::Borrowed(s.as_bytes()),
        std::borrow::Cow::Owned(s) => std::borrow::Cow::Owned(s.into_bytes()),
    }
}
