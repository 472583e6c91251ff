//! The audio engine: sole owner of the PCM output.
//!
//! The engine services one request at a time. A pending announcement always
//! goes first, then a pending playback request; with nothing pending it
//! sleeps on the context's wake signal.
//!
//! ```text
//!  idle ──wake──► take announcement? ──► stream ──► report ──► idle
//!                  └─ else take playback? ─┘
//! ```
//!
//! Streaming moves fixed-size chunks from storage to the output. Before
//! every chunk the engine checks whether it must abandon the stream
//! (interruption or a newer announcement) and, for playback, whether it is
//! paused. A paused stream keeps its file cursor and its output acquisition
//! and waits on the wake signal, re-checking every `PAUSE_POLL_MS`.
//!
//! The output is acquired through [`OutputSession`], whose `Drop` releases
//! it, so every exit path (completion, interruption, error, or the engine
//! future itself being dropped) pairs one acquire with one release.

use embassy_futures::select::select;
use embassy_time::{with_timeout, Duration, Timer};
use platform::config::{CHUNK_BYTES_MAX, CHUNK_FRAMES, PAUSE_POLL_MS, WRITE_TIMEOUT_MS};
use platform::{AudioConfig, AudioOutput, File, Storage};

use crate::context::PlayerContext;
use crate::decoder::{FormatError, PcmFormat, WAV_HEADER_LEN};
use crate::error::PlaybackError;
use crate::request::{Generation, StreamKind, StreamOutcome, StreamReport};
use crate::volume::apply_volume;

/// An acquired output. Released on drop.
struct OutputSession<'o, O: AudioOutput> {
    output: &'o mut O,
}

impl<'o, O: AudioOutput> OutputSession<'o, O> {
    async fn open(output: &'o mut O, config: AudioConfig) -> Result<Self, PlaybackError> {
        match output.acquire(config).await {
            Ok(()) => Ok(Self { output }),
            Err(_) => Err(PlaybackError::Hardware),
        }
    }

    /// Write the whole chunk, each write bounded by the write timeout.
    async fn write_all(&mut self, mut data: &[u8]) -> Result<(), PlaybackError> {
        while !data.is_empty() {
            let accepted = match with_timeout(
                Duration::from_millis(WRITE_TIMEOUT_MS),
                self.output.write(data),
            )
            .await
            {
                Err(_) => return Err(PlaybackError::Timeout),
                Ok(Err(_)) | Ok(Ok(0)) => return Err(PlaybackError::Hardware),
                Ok(Ok(n)) => n,
            };
            data = data.get(accepted..).unwrap_or(&[]);
        }
        Ok(())
    }
}

impl<O: AudioOutput> Drop for OutputSession<'_, O> {
    fn drop(&mut self) {
        self.output.release();
    }
}

/// Streams requests from a [`PlayerContext`] to one audio output.
pub struct AudioEngine<'a, S: Storage, O: AudioOutput> {
    ctx: &'a PlayerContext,
    storage: S,
    output: O,
    buf: [u8; CHUNK_BYTES_MAX],
}

impl<'a, S: Storage, O: AudioOutput> AudioEngine<'a, S, O> {
    /// Engine bound to `ctx`, reading from `storage` and writing to
    /// `output`.
    #[allow(clippy::large_stack_arrays)]
    pub fn new(ctx: &'a PlayerContext, storage: S, output: O) -> Self {
        Self {
            ctx,
            storage,
            output,
            buf: [0; CHUNK_BYTES_MAX],
        }
    }

    /// Service requests forever, publishing a report for each.
    pub async fn run(&mut self) -> ! {
        info!("audio engine started");
        loop {
            if self.service_next().await.is_none() {
                self.ctx.wake.wait().await;
            }
        }
    }

    /// Service the highest-priority pending request, if any.
    ///
    /// Returns `None` without touching the output when nothing is pending.
    /// The report is also published on the context.
    pub async fn service_next(&mut self) -> Option<StreamReport> {
        let (kind, path, generation) = if let Some(req) = self.ctx.take_announcement() {
            (StreamKind::Announcement, req.path, req.generation)
        } else if let Some(req) = self.ctx.take_playback() {
            (StreamKind::Playback, req.path, req.generation)
        } else {
            return None;
        };
        Some(self.service(kind, &path, generation).await)
    }

    async fn service(&mut self, kind: StreamKind, path: &str, generation: Generation) -> StreamReport {
        self.ctx.begin(kind, generation);
        info!("{} {} start: {}", kind.label(), generation.get(), path);

        let outcome = match self.stream(kind, path, generation).await {
            Ok(outcome) => outcome,
            Err(e) => {
                match e {
                    PlaybackError::Hardware | PlaybackError::Timeout => {
                        error!("{} {} output failure: {}", kind.label(), generation.get(), path);
                    }
                    _ => warn!("{} {} rejected: {}", kind.label(), generation.get(), path),
                }
                StreamOutcome::Failed(e)
            }
        };

        self.ctx.finish(generation);
        if outcome == StreamOutcome::Interrupted {
            info!("{} {} interrupted", kind.label(), generation.get());
        } else if outcome == StreamOutcome::Completed {
            info!("{} {} completed", kind.label(), generation.get());
        }

        let report = StreamReport {
            kind,
            generation,
            outcome,
        };
        self.ctx.publish(report);
        report
    }

    async fn stream(
        &mut self,
        kind: StreamKind,
        path: &str,
        generation: Generation,
    ) -> Result<StreamOutcome, PlaybackError> {
        if self.ctx.should_abandon(kind, generation) {
            return Ok(StreamOutcome::Interrupted);
        }
        if !self
            .storage
            .exists(path)
            .await
            .map_err(|_| PlaybackError::Storage)?
        {
            return Err(PlaybackError::NotFound);
        }
        let mut file = self
            .storage
            .open(path)
            .await
            .map_err(|_| PlaybackError::Storage)?;

        let mut header = [0u8; WAV_HEADER_LEN];
        let got = file
            .read_full(&mut header)
            .await
            .map_err(|_| PlaybackError::Storage)?;
        if got < WAV_HEADER_LEN {
            return Err(FormatError::Truncated.into());
        }
        let format = PcmFormat::parse(&header)?;
        let config = format.audio_config()?;
        let chunk = config.chunk_bytes(CHUNK_FRAMES).min(self.buf.len());
        let mut remaining = usize::try_from(format.data_size).unwrap_or(usize::MAX);
        debug!(
            "pcm {} Hz, {} ch, {} data bytes",
            config.sample_rate, config.channels, format.data_size
        );

        let ctx = self.ctx;
        let mut session = OutputSession::open(&mut self.output, config).await?;
        loop {
            if ctx.should_abandon(kind, generation) {
                return Ok(StreamOutcome::Interrupted);
            }
            if kind == StreamKind::Playback && ctx.is_paused() {
                select(ctx.wake.wait(), Timer::after_millis(PAUSE_POLL_MS)).await;
                continue;
            }

            let want = chunk.min(remaining);
            let Some(data) = self.buf.get_mut(..want).filter(|d| !d.is_empty()) else {
                return Ok(StreamOutcome::Completed);
            };
            let n = file
                .read_full(data)
                .await
                .map_err(|_| PlaybackError::Storage)?;
            let Some(data) = data.get_mut(..n).filter(|d| !d.is_empty()) else {
                return Ok(StreamOutcome::Completed);
            };
            remaining = remaining.saturating_sub(n);

            apply_volume(data, ctx.volume());
            session.write_all(data).await?;
        }
    }
}
