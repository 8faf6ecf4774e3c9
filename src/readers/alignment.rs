use std::io::{ErrorKind, Read, Seek, SeekFrom};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::LINE_TERMINATOR;

const ALIGNMENT_CHUNK: usize = 128;

/// Position `reader` at the first line start at or after `offset` and return it.
///
/// Offset 0 is always a line start. Otherwise the search begins at
/// `offset - 1`, so an offset that already follows a terminator is kept.
/// Reaching end of file inside the window yields the file length (an empty
/// tail). No terminator within `lookahead` bytes is a hard failure.
pub fn find_line_start<R: Read + Seek>(reader: &mut R, offset: u64, lookahead: u64) -> Result<u64> {
    if offset == 0 {
        reader.seek(SeekFrom::Start(0))?;
        return Ok(0);
    }

    let origin = offset - 1;
    reader.seek(SeekFrom::Start(origin))?;

    let mut buffer = [0u8; ALIGNMENT_CHUNK];
    let mut searched: u64 = 0;
    while searched < lookahead {
        let want = (lookahead - searched).min(ALIGNMENT_CHUNK as u64) as usize;
        let read = match reader.read(&mut buffer[..want]) {
            Ok(0) => {
                let end = origin + searched;
                reader.seek(SeekFrom::Start(end))?;
                return Ok(end);
            }
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        if let Some(i) = buffer[..read].iter().position(|&b| b == LINE_TERMINATOR) {
            let aligned = origin + searched + i as u64 + 1;
            reader.seek(SeekFrom::Start(aligned))?;
            return Ok(aligned);
        }
        searched += read as u64;
    }

    Err(ProcessingError::LineAlignment { offset, lookahead })
}

/// In-memory counterpart of [`find_line_start`] for mapped files.
pub fn find_line_start_in(data: &[u8], offset: u64, lookahead: u64) -> Result<u64> {
    if offset == 0 {
        return Ok(0);
    }

    let origin = (offset - 1) as usize;
    let len = data.len();
    if origin >= len {
        return Ok(len as u64);
    }

    let window = (origin as u64).saturating_add(lookahead);
    let window_end = window.min(len as u64) as usize;
    match data[origin..window_end].iter().position(|&b| b == LINE_TERMINATOR) {
        Some(i) => Ok((origin + i + 1) as u64),
        None if window > len as u64 => Ok(len as u64),
        None => Err(ProcessingError::LineAlignment { offset, lookahead }),
    }
}
