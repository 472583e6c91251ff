//! State shared between the control loop and the playback engine.
//!
//! One [`PlayerContext`] lives in a `static` and is passed by reference to the
//! long-lived tasks. Write ownership:
//!
//! | Field              | Written by                      | Read by          |
//! |--------------------|---------------------------------|------------------|
//! | announcement slot  | control loop (overwrite)        | engine (take)    |
//! | playback slot      | control loop (overwrite)        | engine (take)    |
//! | interrupt signal   | control loop (assert)           | engine (check, clear own generation) |
//! | pause flag         | control loop only               | engine, per chunk |
//! | volume             | control loop only               | engine, per chunk |
//! | active stream      | engine only                     | control loop, tests |
//! | reports            | engine (post)                   | control loop     |
//!
//! The slots sit behind a critical-section mutex and are only touched for a
//! copy in or out; flags are plain atomics.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use platform::config::VOLUME_DEFAULT;
use platform::{ResourcePath, VolumePercent};

use crate::interrupt::InterruptSignal;
use crate::request::{
    AnnouncementRequest, Generation, GenerationCounter, PlaybackRequest, StreamKind, StreamReport,
};

/// Reports buffered between the engine and the control loop.
pub const REPORT_DEPTH: usize = 8;

const KIND_IDLE: u8 = 0;
const KIND_PLAYBACK: u8 = 1;
const KIND_ANNOUNCEMENT: u8 = 2;

type Slot<T> = Mutex<CriticalSectionRawMutex, RefCell<Option<T>>>;

/// Shared player state.
pub struct PlayerContext {
    generations: GenerationCounter,
    announcement: Slot<AnnouncementRequest>,
    playback: Slot<PlaybackRequest>,
    pub(crate) interrupt: InterruptSignal,
    paused: AtomicBool,
    volume: AtomicU8,
    pub(crate) wake: Signal<CriticalSectionRawMutex, ()>,
    active_generation: AtomicU32,
    active_kind: AtomicU8,
    reports: Channel<CriticalSectionRawMutex, StreamReport, REPORT_DEPTH>,
}

impl PlayerContext {
    /// Idle context at default volume.
    pub const fn new() -> Self {
        Self {
            generations: GenerationCounter::new(),
            announcement: Mutex::new(RefCell::new(None)),
            playback: Mutex::new(RefCell::new(None)),
            interrupt: InterruptSignal::new(),
            paused: AtomicBool::new(false),
            volume: AtomicU8::new(VolumePercent::new(VOLUME_DEFAULT).get()),
            wake: Signal::new(),
            active_generation: AtomicU32::new(0),
            active_kind: AtomicU8::new(KIND_IDLE),
            reports: Channel::new(),
        }
    }

    /// Generation source shared by playback and announcement requests.
    pub fn generations(&self) -> &GenerationCounter {
        &self.generations
    }

    // ── Announcement mailbox ────────────────────────────────────────────────

    /// Post an announcement, replacing any pending one.
    ///
    /// Asserts interruption against whatever is streaming and wakes the
    /// engine. Returns the generation given to the announcement.
    pub fn request_announcement(&self, path: ResourcePath) -> Generation {
        let generation = self.generations.next();
        self.announcement.lock(|slot| {
            *slot.borrow_mut() = Some(AnnouncementRequest { path, generation });
        });
        self.interrupt.assert(self.active_generation());
        self.wake.signal(());
        generation
    }

    /// `true` while an announcement waits in the mailbox.
    pub fn announcement_pending(&self) -> bool {
        self.announcement.lock(|slot| slot.borrow().is_some())
    }

    pub(crate) fn take_announcement(&self) -> Option<AnnouncementRequest> {
        self.announcement.lock(|slot| slot.borrow_mut().take())
    }

    // ── Playback slot ───────────────────────────────────────────────────────

    /// Post a playback request, replacing any pending one, and clear pause.
    pub fn request_playback(&self, request: PlaybackRequest) {
        self.paused.store(false, Ordering::Release);
        self.playback.lock(|slot| {
            *slot.borrow_mut() = Some(request);
        });
        self.wake.signal(());
    }

    /// Stop the stream tagged `generation` at its next chunk boundary.
    ///
    /// A still-pending playback request with that generation (or older) is
    /// discarded instead.
    pub fn interrupt(&self, generation: Generation) {
        self.interrupt.assert(generation);
        self.playback.lock(|slot| {
            let mut slot = slot.borrow_mut();
            if slot.as_ref().is_some_and(|r| r.generation <= generation) {
                *slot = None;
            }
        });
        self.wake.signal(());
    }

    /// `true` while a playback request waits in the slot.
    pub fn playback_pending(&self) -> bool {
        self.playback.lock(|slot| slot.borrow().is_some())
    }

    pub(crate) fn take_playback(&self) -> Option<PlaybackRequest> {
        self.playback.lock(|slot| slot.borrow_mut().take())
    }

    /// `true` if the stream tagged `generation` must stop now: it was
    /// interrupted, or an announcement is waiting.
    pub fn is_preempted(&self, generation: Generation) -> bool {
        self.interrupt.is_asserted_for(generation) || self.announcement_pending()
    }

    /// `true` if a stream of `kind` tagged `generation` must stop now.
    ///
    /// Announcements yield only to a newer announcement; playback also
    /// yields to its interrupt signal.
    pub fn should_abandon(&self, kind: StreamKind, generation: Generation) -> bool {
        match kind {
            StreamKind::Playback => self.is_preempted(generation),
            StreamKind::Announcement => self.announcement_pending(),
        }
    }

    // ── Flags ───────────────────────────────────────────────────────────────

    /// Pause or resume playback streams. Announcements ignore the flag.
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
        self.wake.signal(());
    }

    /// Current pause flag.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Current software gain.
    pub fn volume(&self) -> VolumePercent {
        VolumePercent::new(self.volume.load(Ordering::Relaxed))
    }

    /// Replace the software gain.
    pub fn set_volume(&self, volume: VolumePercent) {
        self.volume.store(volume.get(), Ordering::Relaxed);
    }

    /// Step the gain by `delta` percent, clamped to 0–200.
    pub fn adjust_volume(&self, delta: i32) -> VolumePercent {
        let next = self.volume().step(delta);
        self.set_volume(next);
        next
    }

    // ── Engine status ───────────────────────────────────────────────────────

    /// Generation currently streaming, [`Generation::NONE`] when idle.
    pub fn active_generation(&self) -> Generation {
        Generation::from_raw(self.active_generation.load(Ordering::Acquire))
    }

    /// Kind and generation of the stream currently holding the output.
    pub fn active(&self) -> Option<(StreamKind, Generation)> {
        let kind = match self.active_kind.load(Ordering::Acquire) {
            KIND_PLAYBACK => StreamKind::Playback,
            KIND_ANNOUNCEMENT => StreamKind::Announcement,
            _ => return None,
        };
        Some((kind, self.active_generation()))
    }

    pub(crate) fn begin(&self, kind: StreamKind, generation: Generation) {
        let raw = match kind {
            StreamKind::Playback => KIND_PLAYBACK,
            StreamKind::Announcement => KIND_ANNOUNCEMENT,
        };
        self.active_generation
            .store(generation.get(), Ordering::Release);
        self.active_kind.store(raw, Ordering::Release);
    }

    pub(crate) fn finish(&self, generation: Generation) {
        self.active_kind.store(KIND_IDLE, Ordering::Release);
        self.active_generation.store(0, Ordering::Release);
        self.interrupt.clear_for(generation);
    }

    // ── Reports ─────────────────────────────────────────────────────────────

    /// Queue a report for the control loop; `false` if the queue was full
    /// and the report was dropped.
    pub(crate) fn publish(&self, report: StreamReport) -> bool {
        let queued = self.reports.try_send(report).is_ok();
        if !queued {
            warn!(
                "report queue full, dropped {} report {}",
                report.kind.label(),
                report.generation.get()
            );
        }
        queued
    }

    /// Next report from the engine, if any.
    pub fn try_next_report(&self) -> Option<StreamReport> {
        self.reports.try_receive().ok()
    }

    /// Wait for the next report from the engine.
    pub async fn next_report(&self) -> StreamReport {
        self.reports.receive().await
    }
}

impl Default for PlayerContext {
    fn default() -> Self {
        Self::new()
    }
}
