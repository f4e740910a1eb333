// file is called peeker poker
// because it's the lingo[1] that ptrace
// uses to refer to reading/writing
// from/to a tracee's memory
//
// [1]: https://en.wikipedia.org/wiki/PEEK_and_POKE
//
// only the peeking half survives here, decoders never write into a tracee

use std::{ffi::c_void, io::IoSliceMut, sync::LazyLock};

use nix::{
    libc::{sysconf, _SC_PAGESIZE},
    sys::{
        ptrace,
        uio::{process_vm_readv, RemoteIoVec},
    },
    unistd::Pid,
};

pub static PAGE_SIZE: LazyLock<usize> = LazyLock::new(|| {
    let size = unsafe { sysconf(_SC_PAGESIZE) };
    if size > 0 {
        size as usize
    } else {
        4096
    }
});

/// Outcome of reading a range of the tracee's address space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fetched {
    /// every requested byte was read
    Full(Vec<u8>),
    /// a prefix was readable, the rest of the range is not mapped
    Short(Vec<u8>),
    /// nothing could be read
    Inaccessible,
}

impl Fetched {
    pub fn full(self) -> Option<Vec<u8>> {
        match self {
            Fetched::Full(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// whatever was readable, empty for `Inaccessible`
    pub fn readable(&self) -> &[u8] {
        match self {
            Fetched::Full(bytes) | Fetched::Short(bytes) => bytes,
            Fetched::Inaccessible => &[],
        }
    }
}

/// A NUL-terminated string read from the tracee.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchedStr {
    pub bytes: Vec<u8>,
    /// false when `max_len` bytes were read without meeting a NUL
    pub terminated: bool,
}

/// Read-only window onto a traced process.
pub trait TraceeMemory {
    fn fetch(&self, addr: u64, len: usize) -> Fetched;

    /// Reads up to `max_len` bytes, stopping at the first NUL.
    ///
    /// Reads never span a page boundary in one go, a string ending right
    /// before an unmapped page is still returned whole.
    fn fetch_cstring(&self, addr: u64, max_len: usize) -> Option<FetchedStr> {
        let page = *PAGE_SIZE as u64;
        let mut bytes = Vec::new();
        let mut cursor = addr;
        while bytes.len() < max_len {
            let to_page_end = (page - cursor % page) as usize;
            let chunk_len = to_page_end.min(max_len - bytes.len());
            let fetched = self.fetch(cursor, chunk_len);
            let chunk = fetched.readable();
            if chunk.is_empty() {
                if bytes.is_empty() {
                    return None;
                }
                break;
            }
            if let Some(nul) = chunk.iter().position(|byte| *byte == b'\0') {
                bytes.extend_from_slice(&chunk[..nul]);
                return Some(FetchedStr {
                    bytes,
                    terminated: true,
                });
            }
            bytes.extend_from_slice(chunk);
            if chunk.len() < chunk_len {
                break;
            }
            cursor = cursor.wrapping_add(chunk_len as u64);
        }
        Some(FetchedStr {
            bytes,
            terminated: false,
        })
    }
}

/// The address space of a live tracee, read with process_vm_readv(2)
/// and falling back to PTRACE_PEEKDATA when that is refused.
pub struct ProcessMemory {
    pub pid: Pid,
}

impl ProcessMemory {
    pub fn new(pid: Pid) -> Self {
        ProcessMemory { pid }
    }

    fn read_vm(&self, addr: u64, len: usize) -> Option<Vec<u8>> {
        // Note, however, that these system calls
        // do not check the memory regions in the remote process
        // until just before doing the read/write.
        // Consequently, a partial read/write (see RETURN VALUE) may result
        // if one of the remote_iov elements points to an invalid memory region in the remote process.
        // No further reads/writes will be attempted beyond that point.
        //
        // so the range is split at page boundaries and the read count tells
        // exactly where the mapping ended
        let page = *PAGE_SIZE as u64;
        let mut remote = Vec::new();
        let mut cursor = addr;
        let mut left = len;
        while left > 0 {
            let to_page_end = (page - cursor % page) as usize;
            let piece = to_page_end.min(left);
            remote.push(RemoteIoVec {
                base: cursor as usize,
                len: piece,
            });
            cursor = cursor.checked_add(piece as u64)?;
            left -= piece;
        }
        let mut bytes_buffer = vec![0u8; len];
        let read = process_vm_readv(
            self.pid,
            &mut [IoSliceMut::new(&mut bytes_buffer)],
            &remote,
        )
        .ok()?;
        bytes_buffer.truncate(read);
        Some(bytes_buffer)
    }

    fn read_peekdata(&self, addr: u64, len: usize) -> Vec<u8> {
        const WORD: usize = size_of::<nix::libc::c_long>();
        let mut data = Vec::with_capacity(len);
        let misalign = (addr % WORD as u64) as usize;
        let mut word_addr = addr - misalign as u64;
        let mut skip = misalign;
        while data.len() < len {
            let Ok(word) = ptrace::read(self.pid, word_addr as *mut c_void) else {
                break;
            };
            let bytes = word.to_ne_bytes();
            let wanted = (len - data.len()).min(WORD - skip);
            data.extend_from_slice(&bytes[skip..skip + wanted]);
            skip = 0;
            word_addr = word_addr.wrapping_add(WORD as u64);
        }
        data
    }
}

impl TraceeMemory for ProcessMemory {
    fn fetch(&self, addr: u64, len: usize) -> Fetched {
        if len == 0 {
            return Fetched::Full(Vec::new());
        }
        if addr.checked_add(len as u64).is_none() {
            return Fetched::Inaccessible;
        }
        let bytes = match self.read_vm(addr, len) {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => {
                tracing::trace!(pid = %self.pid, addr, len, "process_vm_readv refused, peeking");
                self.read_peekdata(addr, len)
            }
        };
        classify(bytes, len)
    }
}

fn classify(bytes: Vec<u8>, wanted: usize) -> Fetched {
    if bytes.is_empty() {
        Fetched::Inaccessible
    } else if bytes.len() < wanted {
        Fetched::Short(bytes)
    } else {
        Fetched::Full(bytes)
    }
}

/// An in-memory picture of a tracee's address space: a set of mapped
/// regions, everything else unmapped. Used for replaying recorded calls
/// and for exercising the decoders without a live process.
#[derive(Clone, Debug, Default)]
pub struct MemoryImage {
    regions: Vec<(u64, Vec<u8>)>,
}

impl MemoryImage {
    pub fn new() -> Self {
        MemoryImage::default()
    }

    /// Maps `bytes` at `addr`; later mappings win where they overlap.
    pub fn map(&mut self, addr: u64, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.regions.push((addr, bytes.into()));
        self
    }

    pub fn with(mut self, addr: u64, bytes: impl Into<Vec<u8>>) -> Self {
        self.map(addr, bytes);
        self
    }

    fn byte_at(&self, addr: u64) -> Option<u8> {
        self.regions.iter().rev().find_map(|(base, bytes)| {
            let offset = addr.checked_sub(*base)?;
            bytes.get(usize::try_from(offset).ok()?).copied()
        })
    }
}

impl TraceeMemory for MemoryImage {
    fn fetch(&self, addr: u64, len: usize) -> Fetched {
        if len == 0 {
            return Fetched::Full(Vec::new());
        }
        let mut bytes = Vec::with_capacity(len);
        for index in 0..len as u64 {
            let Some(cursor) = addr.checked_add(index) else {
                break;
            };
            match self.byte_at(cursor) {
                Some(byte) => bytes.push(byte),
                None => break,
            }
        }
        classify(bytes, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_reads_full_short_and_nothing() {
        let image = MemoryImage::new().with(0x1000, vec![1, 2, 3, 4]);
        assert_eq!(image.fetch(0x1000, 4), Fetched::Full(vec![1, 2, 3, 4]));
        assert_eq!(image.fetch(0x1002, 4), Fetched::Short(vec![3, 4]));
        assert_eq!(image.fetch(0x2000, 4), Fetched::Inaccessible);
        assert_eq!(image.fetch(0x2000, 0), Fetched::Full(vec![]));
    }

    #[test]
    fn adjacent_regions_read_as_one() {
        let image = MemoryImage::new()
            .with(0x1000, vec![1, 2])
            .with(0x1002, vec![3]);
        assert_eq!(image.fetch(0x1000, 3), Fetched::Full(vec![1, 2, 3]));
    }

    #[test]
    fn cstring_stops_at_nul_or_limit() {
        let image = MemoryImage::new().with(0x1000, b"hello\0world".to_vec());
        let hello = image.fetch_cstring(0x1000, 32).unwrap();
        assert_eq!(hello.bytes, b"hello");
        assert!(hello.terminated);

        let cut = image.fetch_cstring(0x1000, 3).unwrap();
        assert_eq!(cut.bytes, b"hel");
        assert!(!cut.terminated);

        // runs into unmapped memory without a NUL
        let tail = image.fetch_cstring(0x1006, 32).unwrap();
        assert_eq!(tail.bytes, b"world");
        assert!(!tail.terminated);

        assert_eq!(image.fetch_cstring(0x5000, 8), None);
    }

    #[test]
    fn cstring_crosses_pages() {
        let page = *PAGE_SIZE as u64;
        let start = page - 2;
        let image = MemoryImage::new().with(start, b"abcd\0".to_vec());
        let text = image.fetch_cstring(start, 16).unwrap();
        assert_eq!(text.bytes, b"abcd");
        assert!(text.terminated);
    }
}
