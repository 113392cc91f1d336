use crate::compare::LineComparator;
use crate::error::{SortContext, SortError, SortResult};
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Read, Write};
use std::ops::Deref;
use std::path::Path;

/// Offset/length view of one line inside the owned buffer, newline excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineDescriptor {
    pub offset: usize,
    pub length: usize,
}

impl LineDescriptor {
    #[inline]
    fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// File contents, either read onto the heap or mapped read-only
pub enum Buffer {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Buffer::Owned(bytes) => bytes,
            Buffer::Mapped(mmap) => mmap,
        }
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Buffer::Owned(_) => "Owned",
            Buffer::Mapped(_) => "Mapped",
        };
        f.debug_struct("Buffer")
            .field("kind", &kind)
            .field("len", &self.len())
            .finish()
    }
}

/// Whole-file buffer plus a permutable index of its lines.
///
/// The buffer never changes after construction. Sorting only reorders the
/// descriptors in `index`; each descriptor keeps the offset and length
/// computed by the initial scan.
#[derive(Debug)]
pub struct LineStore {
    buffer: Buffer,
    index: Vec<LineDescriptor>,
}

impl LineStore {
    /// Build a store over bytes already in memory
    pub fn load(bytes: Vec<u8>) -> Self {
        Self::from_buffer(Buffer::Owned(bytes))
    }

    /// Read everything from `reader` and index it
    pub fn from_reader<R: Read>(reader: R) -> SortResult<Self> {
        let bytes = read_all(reader, None)?;
        Ok(Self::load(bytes))
    }

    /// Load a file, memory-mapping it when it is at least `mmap_threshold` bytes.
    /// A threshold of 0 always reads into memory.
    pub fn from_path(path: &Path, mmap_threshold: u64) -> SortResult<Self> {
        let name = path.display().to_string();
        let file = File::open(path).with_file_context(&name)?;
        let metadata = file.metadata().with_file_context(&name)?;
        if metadata.is_dir() {
            return Err(SortError::is_directory(&name));
        }

        let file_size = metadata.len();
        if mmap_threshold > 0 && file_size > 0 && file_size >= mmap_threshold {
            // SAFETY: the map is read-only and owned by the store; the input
            // file must not be truncated by another process while we run.
            let mmap = unsafe { Mmap::map(&file) }.with_target(&name)?;
            return Ok(Self::from_buffer(Buffer::Mapped(mmap)));
        }

        let expected = usize::try_from(file_size).ok();
        let bytes = read_all(file, expected).with_target(&name)?;
        Ok(Self::load(bytes))
    }

    fn from_buffer(buffer: Buffer) -> Self {
        let index = scan_lines(&buffer);
        Self { buffer, index }
    }

    /// Number of lines, always `newline count + 1`
    pub fn line_count(&self) -> usize {
        self.index.len()
    }

    /// Size of the loaded content in bytes
    pub fn byte_len(&self) -> usize {
        self.buffer.len()
    }

    /// True if the content was memory-mapped
    pub fn is_mapped(&self) -> bool {
        matches!(self.buffer, Buffer::Mapped(_))
    }

    /// Bytes of the line currently at position `i`
    pub fn line(&self, i: usize) -> SortResult<&[u8]> {
        let descriptor = self.descriptor(i)?;
        Ok(&self.buffer[descriptor.offset..descriptor.end()])
    }

    /// Length of the line currently at position `i`
    pub fn line_length(&self, i: usize) -> SortResult<usize> {
        Ok(self.descriptor(i)?.length)
    }

    /// Descriptor at position `i`
    pub fn descriptor(&self, i: usize) -> SortResult<LineDescriptor> {
        self.index
            .get(i)
            .copied()
            .ok_or_else(|| SortError::index_out_of_bounds(i, self.index.len()))
    }

    /// Exchange the descriptors at `i` and `j`; the buffer is untouched
    pub fn swap(&mut self, i: usize, j: usize) -> SortResult<()> {
        let count = self.index.len();
        if i >= count {
            return Err(SortError::index_out_of_bounds(i, count));
        }
        if j >= count {
            return Err(SortError::index_out_of_bounds(j, count));
        }
        self.index.swap(i, j);
        Ok(())
    }

    /// Lines in current index order
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.index
            .iter()
            .map(move |d| &self.buffer[d.offset..d.end()])
    }

    /// True if no line strictly precedes the line before it. Adjacent lines
    /// `cmp` cannot tell apart, such as duplicates, count as ordered.
    pub fn is_ordered_by<C>(&self, cmp: &C) -> bool
    where
        C: LineComparator + ?Sized,
    {
        let mut lines = self.lines();
        let Some(mut prev) = lines.next() else {
            return true;
        };
        for line in lines {
            if cmp.precedes(line, prev) && !cmp.precedes(prev, line) {
                return false;
            }
            prev = line;
        }
        true
    }

    /// Write every line in current order, each followed by one `\n`.
    ///
    /// The last line is newline-terminated even when the input was not.
    /// The first failed or short write aborts; lines already written stay written.
    pub fn write_to<W: Write>(&self, mut sink: W) -> SortResult<()> {
        self.write_lines(&mut sink)
            .map_err(|e| SortError::write("output", e))
    }

    fn write_lines<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        for line in self.lines() {
            sink.write_all(line)?;
            sink.write_all(b"\n")?;
        }
        sink.flush()
    }
}

/// Two passes over the buffer: count newlines to size the index, then record
/// each segment's offset and length.
fn scan_lines(data: &[u8]) -> Vec<LineDescriptor> {
    let line_count = memchr::memchr_iter(b'\n', data).count() + 1;
    let mut index = Vec::with_capacity(line_count);

    let mut start = 0;
    for newline in memchr::memchr_iter(b'\n', data) {
        index.push(LineDescriptor {
            offset: start,
            length: newline - start,
        });
        start = newline + 1;
    }

    // Last segment runs to the end of the buffer and may be empty
    index.push(LineDescriptor {
        offset: start,
        length: data.len() - start,
    });

    debug_assert_eq!(index.len(), line_count);
    index
}

/// Read until end of input. Every read error, including an interrupted read,
/// is fatal. When the expected size is known, ending early is a short read.
fn read_all<R: Read>(mut reader: R, expected: Option<usize>) -> SortResult<Vec<u8>> {
    const CHUNK_SIZE: usize = 64 * 1024;

    let mut bytes = Vec::with_capacity(expected.unwrap_or(CHUNK_SIZE));
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => bytes.extend_from_slice(&chunk[..n]),
            Err(e) => return Err(SortError::load("input", e)),
        }
    }

    if let Some(expected) = expected {
        if bytes.len() < expected {
            return Err(SortError::short_read("input", expected, bytes.len()));
        }
    }

    Ok(bytes)
}
