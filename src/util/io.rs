use crate::util::BoxedError;
use std::{
    fmt::Display,
    fs::File,
    io::{self, BufRead, BufReader, ErrorKind, Read},
    path::Path,
    str::FromStr,
};

/// Easy way to return something that's error-like wrapped in an `std::io::Error`
#[inline]
pub fn io_err<T, E: Into<BoxedError>>(kind: ErrorKind, err: E) -> io::Result<T> {
    Err(io::Error::new(kind, err))
}

/// Wrap an error in a `std::io::Error` representing invalid data.
pub fn invalid_data<E: Into<BoxedError>>(err: E) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, err)
}

/// Open a file at some path, returning a buffered reader.
///
/// Returns a more helpful error if the file cannot be opened.
pub fn buf_open<P: AsRef<Path>>(path: P) -> io::Result<impl BufRead> {
    let path: &Path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("Could not open file {}: {}", path.display(), err),
        )
    })?;
    Ok(BufReader::new(file))
}

/// Parse something from a string but fail with a `std::io::Error` and some sort of helpful message
///
/// Example:
///
/// ```
/// use henhouse::util;
/// // fails with: "I was expecting an i32: <underlying FromStr error>"
/// let x: std::io::Result<i32> = util::parse_diagnostic("q", &"I was expecting an i32");
/// assert!(x.is_err());
/// ```
#[inline]
pub fn parse_diagnostic<F: FromStr<Err = E>, E: Into<BoxedError>, D: Display>(
    s: &str,
    diagnostic: &D,
) -> io::Result<F> {
    s.parse()
        .map_err(|err: F::Err| invalid_data(format!("{}: {}", diagnostic, err.into())))
}

#[inline]
pub fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes).map_err(|err| {
        if err.kind() == ErrorKind::UnexpectedEof {
            io::Error::new(ErrorKind::UnexpectedEof, "Could not read enough bytes")
        } else {
            err
        }
    })?;
    Ok(u32::from_le_bytes(bytes))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_little_endian() {
        let mut cursor = Cursor::new([0x44, 0x44, 0x53, 0x20, 0x01]);
        assert_eq!(0x2053_4444, read_u32(&mut cursor).unwrap());
        let err = read_u32(&mut cursor).unwrap_err();
        assert_eq!(ErrorKind::UnexpectedEof, err.kind());
    }

    #[test]
    fn diagnostics_name_the_value() {
        let err = parse_diagnostic::<f32, _, _>("abc", &"line 3: fov").unwrap_err();
        assert_eq!(ErrorKind::InvalidData, err.kind());
        assert!(err.to_string().starts_with("line 3: fov"));
        let ok: u32 = parse_diagnostic("42", &"width").unwrap();
        assert_eq!(42, ok);
    }
}
