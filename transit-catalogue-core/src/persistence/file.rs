use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::Error;

/// Writes snapshot bytes to `path`, replacing any previous file
pub fn save_snapshot(path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), Error> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(bytes)?;
    writer.flush()?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Vec<u8>, Error> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let result = load_snapshot("/nonexistent/transit/snapshot.bin");
        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn bytes_are_written_verbatim() {
        let path =
            std::env::temp_dir().join(format!("transit-snapshot-{}.bin", std::process::id()));
        save_snapshot(&path, &[1, 2, 3, 250]).unwrap();
        assert_eq!(load_snapshot(&path).unwrap(), vec![1, 2, 3, 250]);
        std::fs::remove_file(&path).unwrap();
    }
}
