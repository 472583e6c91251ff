//! Mock implementations for testing
//!
//! This module provides in-memory implementations of all platform traits
//! for use in unit and integration tests across the workspace.
//!
//! - [`MemFs`]: a directory tree shared by [`MemStorage`] and [`MemCatalog`]
//!   handles, so the engine and the navigator can hold separate handles onto
//!   the same card.
//! - [`MockOutput`]: records every acquisition and written byte; the paired
//!   [`OutputProbe`] inspects it while the engine owns the output.
//! - [`MockInput`]: a scripted encoder event queue.

#![cfg(any(test, feature = "std"))]
// Test support: plain arithmetic and slicing on host-sized buffers.
#![allow(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation
)]

use std::ops::ControlFlow;
use std::sync::{Arc, Mutex, MutexGuard};

use embassy_time::{Duration, Timer};

use crate::catalog::{file_name, parent, CatalogProvider, DirEntry, EntryKind};
use crate::*;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// ── In-memory card ───────────────────────────────────────────────────────────

/// Errors from the in-memory card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemError {
    /// No entry at the path
    NotFound,
    /// The path names a directory
    IsDirectory,
    /// The path names a file
    NotDirectory,
    /// Injected read failure
    Io,
}

#[derive(Debug, Clone)]
enum NodeData {
    Dir,
    File(Arc<Vec<u8>>),
}

#[derive(Debug, Clone)]
struct Node {
    path: String,
    data: NodeData,
    listed_as: EntryKind,
}

#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<Node>,
    opened: Vec<String>,
    failing_reads: Vec<String>,
}

impl Tree {
    fn find(&self, path: &str) -> Option<&Node> {
        let path = path.trim_end_matches('/');
        self.nodes.iter().find(|n| n.path == path)
    }

    fn ensure_dir(&mut self, path: &str) {
        let path = path.trim_end_matches('/');
        if path.is_empty() || self.find(path).is_some() {
            return;
        }
        if let Some(up) = parent(path) {
            self.ensure_dir(up);
        }
        self.nodes.push(Node {
            path: path.to_string(),
            data: NodeData::Dir,
            listed_as: EntryKind::Directory,
        });
    }
}

/// In-memory directory tree standing in for the card.
///
/// Entries are listed in insertion order. Parent directories are created on
/// demand.
#[derive(Debug, Clone, Default)]
pub struct MemFs {
    tree: Arc<Mutex<Tree>>,
}

impl MemFs {
    /// Empty card
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory (and its parents).
    pub fn add_dir(&self, path: &str) -> &Self {
        lock(&self.tree).ensure_dir(path);
        self
    }

    /// Add or replace a file.
    pub fn add_file(&self, path: &str, data: impl Into<Vec<u8>>) -> &Self {
        let mut tree = lock(&self.tree);
        if let Some(up) = parent(path) {
            tree.ensure_dir(up);
        }
        tree.nodes.retain(|n| n.path != path);
        tree.nodes.push(Node {
            path: path.to_string(),
            data: NodeData::File(Arc::new(data.into())),
            listed_as: EntryKind::File,
        });
        self
    }

    /// Make directory listings report `path` as [`EntryKind::Unknown`].
    pub fn mark_unknown(&self, path: &str) -> &Self {
        for node in lock(&self.tree).nodes.iter_mut().filter(|n| n.path == path) {
            node.listed_as = EntryKind::Unknown;
        }
        self
    }

    /// Make reads from `path` fail after the header.
    pub fn fail_reads(&self, path: &str) -> &Self {
        lock(&self.tree).failing_reads.push(path.to_string());
        self
    }

    /// Remove an entry.
    pub fn remove(&self, path: &str) {
        lock(&self.tree).nodes.retain(|n| n.path != path);
    }

    /// Paths opened through [`MemStorage`], in order.
    pub fn opened(&self) -> Vec<String> {
        lock(&self.tree).opened.clone()
    }

    /// A [`Storage`] handle onto this card.
    pub fn storage(&self) -> MemStorage {
        MemStorage { fs: self.clone() }
    }

    /// A [`CatalogProvider`] handle onto this card.
    pub fn catalog(&self) -> MemCatalog {
        MemCatalog { fs: self.clone() }
    }
}

/// [`Storage`] over a [`MemFs`].
#[derive(Debug, Clone)]
pub struct MemStorage {
    fs: MemFs,
}

/// Open in-memory file.
#[derive(Debug)]
pub struct MemFile {
    data: Arc<Vec<u8>>,
    pos: usize,
    fail_after: Option<usize>,
}

impl File for MemFile {
    type Error = MemError;

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail_after.is_some_and(|limit| self.pos >= limit) {
            return Err(MemError::Io);
        }
        let rest = self.data.get(self.pos..).unwrap_or(&[]);
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl Storage for MemStorage {
    type Error = MemError;
    type File = MemFile;

    async fn open(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        let mut tree = lock(&self.fs.tree);
        let data = match tree.find(path).map(|n| n.data.clone()) {
            Some(NodeData::File(data)) => data,
            Some(NodeData::Dir) => return Err(MemError::IsDirectory),
            None => return Err(MemError::NotFound),
        };
        let fail_after = tree.failing_reads.iter().any(|p| p == path).then_some(44);
        tree.opened.push(path.to_string());
        Ok(MemFile {
            data,
            pos: 0,
            fail_after,
        })
    }

    async fn exists(&mut self, path: &str) -> Result<bool, Self::Error> {
        Ok(lock(&self.fs.tree).find(path).is_some())
    }
}

/// [`CatalogProvider`] over a [`MemFs`].
#[derive(Debug, Clone)]
pub struct MemCatalog {
    fs: MemFs,
}

impl CatalogProvider for MemCatalog {
    type Error = MemError;

    async fn read_dir<F>(&mut self, dir: &str, mut visit: F) -> Result<(), Self::Error>
    where
        F: FnMut(DirEntry<'_>) -> ControlFlow<()>,
    {
        let dir = dir.trim_end_matches('/');
        let entries: Vec<(String, EntryKind)> = {
            let tree = lock(&self.fs.tree);
            match tree.find(dir) {
                Some(Node {
                    data: NodeData::Dir,
                    ..
                }) => {}
                Some(_) => return Err(MemError::NotDirectory),
                None => return Err(MemError::NotFound),
            }
            tree.nodes
                .iter()
                .filter(|n| parent(&n.path) == Some(dir))
                .map(|n| (file_name(&n.path).to_string(), n.listed_as))
                .collect()
        };
        for (name, kind) in &entries {
            if visit(DirEntry { name, kind: *kind }).is_break() {
                break;
            }
        }
        Ok(())
    }

    async fn metadata(&mut self, path: &str) -> Result<EntryKind, Self::Error> {
        match lock(&self.fs.tree).find(path).map(|n| &n.data) {
            Some(NodeData::Dir) => Ok(EntryKind::Directory),
            Some(NodeData::File(_)) => Ok(EntryKind::File),
            None => Err(MemError::NotFound),
        }
    }

    async fn exists(&mut self, path: &str) -> bool {
        lock(&self.fs.tree).find(path).is_some()
    }
}

/// Build a canonical 44-byte-header PCM resource.
pub fn wav_bytes(sample_rate: u32, channels: u16, bits: u16, samples: &[i16]) -> Vec<u8> {
    let data_len = (samples.len() * 2) as u32;
    let block_align = channels * bits / 8;
    let mut out = Vec::with_capacity(44 + samples.len() * 2);
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&(sample_rate * u32::from(block_align)).to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    for s in samples {
        out.extend_from_slice(&s.to_le_bytes());
    }
    out
}

/// Mono 16-bit resource of `frames` samples all equal to `value`.
pub fn tone(frames: usize, value: i16) -> Vec<u8> {
    wav_bytes(16_000, 1, 16, &vec![value; frames])
}

// ── Audio output ─────────────────────────────────────────────────────────────

/// Errors injected by [`MockOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOutputError {
    /// `acquire` was told to fail
    Configure,
    /// `write` was told to fail, or called without an acquisition
    Write,
}

/// One acquire/release cycle seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Configuration passed to `acquire`
    pub config: AudioConfig,
    /// Every byte accepted while the session was open
    pub data: Vec<u8>,
    /// `true` once `release` ran
    pub released: bool,
}

impl Session {
    /// Accepted bytes decoded as little-endian samples.
    pub fn samples(&self) -> Vec<i16> {
        self.data
            .chunks_exact(2)
            .map(|b| i16::from_le_bytes([b[0], b[1]]))
            .collect()
    }
}

#[derive(Debug, Default)]
struct OutputState {
    sessions: Vec<Session>,
    open: usize,
    max_open: usize,
    acquisitions: usize,
    releases: usize,
    fail_acquire: bool,
    fail_writes: bool,
    stall_writes: bool,
    accept_limit: Option<usize>,
    write_delay: Option<Duration>,
}

/// Recording audio output.
#[derive(Debug, Clone, Default)]
pub struct MockOutput {
    state: Arc<Mutex<OutputState>>,
}

/// Read side of a [`MockOutput`].
#[derive(Debug, Clone)]
pub struct OutputProbe {
    state: Arc<Mutex<OutputState>>,
}

impl MockOutput {
    /// Output that accepts everything immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for inspecting the output after it moved into the engine.
    pub fn probe(&self) -> OutputProbe {
        OutputProbe {
            state: Arc::clone(&self.state),
        }
    }

    /// Sleep this long inside every write, simulating DMA back-pressure.
    pub fn with_write_delay(self, delay: Duration) -> Self {
        lock(&self.state).write_delay = Some(delay);
        self
    }

    /// Accept at most `bytes` per write call.
    pub fn with_accept_limit(self, bytes: usize) -> Self {
        lock(&self.state).accept_limit = Some(bytes);
        self
    }

    /// Fail every `acquire`.
    pub fn failing_acquire(self) -> Self {
        lock(&self.state).fail_acquire = true;
        self
    }

    /// Fail every `write`.
    pub fn failing_writes(self) -> Self {
        lock(&self.state).fail_writes = true;
        self
    }

    /// Never complete a write.
    pub fn stalled(self) -> Self {
        lock(&self.state).stall_writes = true;
        self
    }
}

impl AudioOutput for MockOutput {
    type Error = MockOutputError;

    async fn acquire(&mut self, config: AudioConfig) -> Result<(), Self::Error> {
        let mut st = lock(&self.state);
        if st.fail_acquire {
            return Err(MockOutputError::Configure);
        }
        st.open += 1;
        st.max_open = st.max_open.max(st.open);
        st.acquisitions += 1;
        st.sessions.push(Session {
            config,
            data: Vec::new(),
            released: false,
        });
        Ok(())
    }

    async fn write(&mut self, frames: &[u8]) -> Result<usize, Self::Error> {
        let (delay, stall) = {
            let st = lock(&self.state);
            (st.write_delay, st.stall_writes)
        };
        if stall {
            core::future::pending::<()>().await;
        }
        if let Some(delay) = delay {
            Timer::after(delay).await;
        }
        let mut st = lock(&self.state);
        if st.fail_writes || st.open == 0 {
            return Err(MockOutputError::Write);
        }
        let n = st.accept_limit.map_or(frames.len(), |l| l.min(frames.len()));
        if let Some(session) = st.sessions.last_mut() {
            session.data.extend_from_slice(&frames[..n]);
        }
        Ok(n)
    }

    fn release(&mut self) {
        let mut st = lock(&self.state);
        st.open = st.open.saturating_sub(1);
        st.releases += 1;
        if let Some(session) = st.sessions.last_mut() {
            session.released = true;
        }
    }
}

impl OutputProbe {
    /// All sessions so far.
    pub fn sessions(&self) -> Vec<Session> {
        lock(&self.state).sessions.clone()
    }

    /// Number of successful `acquire` calls.
    pub fn acquisitions(&self) -> usize {
        lock(&self.state).acquisitions
    }

    /// Number of `release` calls.
    pub fn releases(&self) -> usize {
        lock(&self.state).releases
    }

    /// Highest number of simultaneously open acquisitions observed.
    pub fn max_open(&self) -> usize {
        lock(&self.state).max_open
    }

    /// `true` while a session is open.
    pub fn is_open(&self) -> bool {
        lock(&self.state).open > 0
    }

    /// Bytes accepted in the most recent session.
    pub fn bytes_in_last_session(&self) -> usize {
        lock(&self.state)
            .sessions
            .last()
            .map_or(0, |s| s.data.len())
    }

    /// Wait until `cond` holds, polling every millisecond.
    pub async fn wait_until(&self, mut cond: impl FnMut(&Self) -> bool) {
        while !cond(self) {
            Timer::after_millis(1).await;
        }
    }
}

// ── Input ────────────────────────────────────────────────────────────────────

/// Mock input device
pub struct MockInput {
    events: heapless::Deque<EncoderEvent, 16>,
}

impl MockInput {
    /// Create new mock input
    pub fn new() -> Self {
        Self {
            events: heapless::Deque::new(),
        }
    }

    /// Add event to queue
    pub fn add_event(&mut self, event: EncoderEvent) -> Result<(), EncoderEvent> {
        self.events.push_back(event)
    }
}

impl Default for MockInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDevice for MockInput {
    async fn wait_for_event(&mut self) -> EncoderEvent {
        loop {
            if let Some(event) = self.events.pop_front() {
                return event;
            }
            Timer::after_millis(10).await;
        }
    }

    fn poll_event(&mut self) -> Option<EncoderEvent> {
        self.events.pop_front()
    }
}
