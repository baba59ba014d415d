//! Chunked range reader
//!
//! Converts an assigned byte sub-range of the source file into complete,
//! terminator-delimited lines, reading in fixed 10 MiB buffers rather than
//! one syscall per line. Several readers over disjoint ranges partition a
//! file so that every physical line is produced by exactly one of them:
//!
//! - a reader whose range starts past the beginning of the data region
//!   discards the partial line at its head (it belongs to the previous
//!   range), and
//! - a reader keeps scanning past its range end until the terminator of the
//!   line that began inside the range, so the final line is never truncated.
//!
//! A reader owns exactly the lines whose first byte lies inside its range.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

/// Fixed read buffer size (10 MiB).
pub const BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// Lazy line reader over a byte sub-range of a file.
///
/// Finite and not restartable; construct a fresh reader to re-scan.
pub struct ChunkedLineReader {
    file: File,
    buf: Vec<u8>,
    buf_len: usize,
    buf_pos: usize,
    /// Absolute file offset of `buf[0]`.
    buf_abs: u64,
    /// Absolute offset of the first byte of the next line to emit.
    line_start: u64,
    /// Range end: lines starting at or past this offset belong to the next reader.
    end: u64,
    /// Partial line carried across buffer refills.
    carry: Vec<u8>,
    done: bool,
}

impl ChunkedLineReader {
    /// Create a reader over `[start, end)` of `file`.
    ///
    /// When `start > 0` the scan begins one byte early, at `start - 1`, and
    /// discards everything up to the first terminator. A range that begins
    /// exactly on a line boundary therefore sees the previous line's
    /// terminator immediately and skips nothing.
    pub fn new(mut file: File, start: u64, end: u64) -> io::Result<Self> {
        // An empty range owns no lines; don't seek or allocate for it.
        let empty = start >= end;
        let scan_from = start.saturating_sub(1);
        if !empty {
            file.seek(SeekFrom::Start(scan_from))?;
        }

        let mut reader = Self {
            file,
            buf: if empty { Vec::new() } else { vec![0u8; BUFFER_SIZE] },
            buf_len: 0,
            buf_pos: 0,
            buf_abs: scan_from,
            line_start: scan_from,
            end,
            carry: Vec::new(),
            done: empty,
        };
        if !empty && start > 0 {
            reader.skip_partial_head()?;
        }
        Ok(reader)
    }

    /// Next complete line owned by this range, or `None` when exhausted.
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        if self.done || self.line_start >= self.end {
            return Ok(None);
        }
        loop {
            if self.buf_pos >= self.buf_len && !self.refill()? {
                // EOF: the carry, if any, is a final line without terminator.
                self.done = true;
                if self.carry.is_empty() {
                    return Ok(None);
                }
                let line = std::mem::take(&mut self.carry);
                return Ok(Some(finish_line(line)));
            }

            match self.buf[self.buf_pos..self.buf_len]
                .iter()
                .position(|&b| b == b'\n')
            {
                Some(i) => {
                    let term = self.buf_pos + i;
                    self.carry.extend_from_slice(&self.buf[self.buf_pos..term]);
                    self.buf_pos = term + 1;
                    self.line_start = self.buf_abs + self.buf_pos as u64;
                    let line = std::mem::take(&mut self.carry);
                    return Ok(Some(finish_line(line)));
                }
                None => {
                    self.carry
                        .extend_from_slice(&self.buf[self.buf_pos..self.buf_len]);
                    self.buf_pos = self.buf_len;
                }
            }
        }
    }

    /// Discard bytes up to and including the first terminator at or after
    /// `start - 1`; the skipped line is owned by the previous range.
    fn skip_partial_head(&mut self) -> io::Result<()> {
        loop {
            if self.buf_pos >= self.buf_len && !self.refill()? {
                self.done = true;
                return Ok(());
            }
            match self.buf[self.buf_pos..self.buf_len]
                .iter()
                .position(|&b| b == b'\n')
            {
                Some(i) => {
                    self.buf_pos += i + 1;
                    self.line_start = self.buf_abs + self.buf_pos as u64;
                    return Ok(());
                }
                None => self.buf_pos = self.buf_len,
            }
        }
    }

    /// Refill the buffer from the file; returns false at EOF.
    fn refill(&mut self) -> io::Result<bool> {
        self.buf_abs += self.buf_len as u64;
        self.buf_len = self.file.read(&mut self.buf)?;
        self.buf_pos = 0;
        Ok(self.buf_len > 0)
    }
}

/// Strip a trailing carriage return and decode, tolerating invalid UTF-8.
fn finish_line(mut bytes: Vec<u8>) -> String {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// Offset of the first data byte: one past the header line's terminator.
///
/// A file without any terminator is all header; the data region is empty.
pub(crate) fn data_start(file: &mut File) -> io::Result<u64> {
    file.seek(SeekFrom::Start(0))?;
    let mut buf = vec![0u8; 64 * 1024];
    let mut pos = 0u64;
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            return Ok(pos);
        }
        if let Some(i) = buf[..n].iter().position(|&b| b == b'\n') {
            return Ok(pos + i as u64 + 1);
        }
        pos += n as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("events.csv");
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn read_range(path: &std::path::Path, start: u64, end: u64) -> Vec<String> {
        let file = File::open(path).unwrap();
        let mut reader = ChunkedLineReader::new(file, start, end).unwrap();
        let mut lines = Vec::new();
        while let Some(line) = reader.next_line().unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn test_full_range_reads_all_lines() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "alpha\nbeta\ngamma\n");
        let len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(read_range(&path, 0, len), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_final_line_without_terminator() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "alpha\nbeta");
        let len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(read_range(&path, 0, len), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_crlf_terminators_stripped() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "alpha\r\nbeta\r\n");
        let len = std::fs::metadata(&path).unwrap().len();
        assert_eq!(read_range(&path, 0, len), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_every_split_point_partitions_lines_exactly_once() {
        // Boundary ownership: for any split offset, the union of the two
        // readers' output must be the full line set with no duplicates.
        let dir = tempdir().unwrap();
        let contents = "first\nsecond line\nthird\nfourth record here\nfifth\n";
        let path = write_file(&dir, contents);
        let len = std::fs::metadata(&path).unwrap().len();
        let expected: Vec<&str> = contents.lines().collect();

        for split in 1..len {
            let mut lines = read_range(&path, 0, split);
            lines.extend(read_range(&path, split, len));
            assert_eq!(lines, expected, "split at byte {split}");
        }
    }

    #[test]
    fn test_three_way_split() {
        let dir = tempdir().unwrap();
        let contents = "one\ntwo\nthree\nfour\nfive\nsix\nseven\n";
        let path = write_file(&dir, contents);
        let len = std::fs::metadata(&path).unwrap().len();
        let expected: Vec<&str> = contents.lines().collect();

        let a = len / 3;
        let b = 2 * len / 3;
        let mut lines = read_range(&path, 0, a);
        lines.extend(read_range(&path, a, b));
        lines.extend(read_range(&path, b, len));
        assert_eq!(lines, expected);
    }

    #[test]
    fn test_empty_range_yields_nothing() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "alpha\nbeta\n");
        assert!(read_range(&path, 3, 3).is_empty());
        assert!(read_range(&path, 0, 0).is_empty());
        // Empty ranges past EOF occur when a short region is split across
        // more workers than it has bytes; they must also be inert.
        assert!(read_range(&path, 100, 100).is_empty());
    }

    #[test]
    fn test_data_start_skips_header() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "h1,h2,h3\ndata\n");
        let mut file = File::open(&path).unwrap();
        assert_eq!(data_start(&mut file).unwrap(), 9);
    }

    #[test]
    fn test_data_start_of_header_only_file() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "just a header, no terminator");
        let len = std::fs::metadata(&path).unwrap().len();
        let mut file = File::open(&path).unwrap();
        assert_eq!(data_start(&mut file).unwrap(), len);
    }
}
