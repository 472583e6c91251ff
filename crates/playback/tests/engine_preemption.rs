//! Engine integration tests: one output, announcements first, bounded
//! interruption latency.
// Integration test file: expect/unwrap/panic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

use core::future::Future;

use embassy_futures::select::{select, Either};
use embassy_time::{with_timeout, Duration, Instant, Timer};
use platform::catalog::join_path;
use platform::mocks::{tone, wav_bytes, MemFs, MockOutput};
use platform::{ResourcePath, VolumePercent};
use playback::{
    AudioEngine, Generation, PlaybackError, PlaybackRequest, PlayerContext, StreamKind,
    StreamOutcome, StreamReport,
};

/// Bytes in one chunk of a 16 kHz mono resource.
const MONO_CHUNK: usize = 1024 * 2;

fn path(p: &str) -> ResourcePath {
    join_path("/sdcard", p).unwrap()
}

fn play(ctx: &PlayerContext, p: &str) -> Generation {
    let generation = ctx.generations().next();
    ctx.request_playback(PlaybackRequest {
        track_index: 0,
        path: path(p),
        generation,
    });
    generation
}

/// Run `script` while the engine services `ctx` in the background.
async fn with_engine<F: Future>(
    ctx: &PlayerContext,
    fs: &MemFs,
    output: MockOutput,
    script: F,
) -> F::Output {
    let mut engine = AudioEngine::new(ctx, fs.storage(), output);
    match select(engine.run(), script).await {
        Either::First(_) => panic!("engine loop returned"),
        Either::Second(out) => out,
    }
}

async fn next_report(ctx: &PlayerContext) -> StreamReport {
    with_timeout(Duration::from_secs(5), ctx.next_report())
        .await
        .expect("engine produced no report")
}

fn ramp(frames: usize) -> Vec<i16> {
    (0..frames).map(|i| (i % 30_000) as i16).collect()
}

#[tokio::test]
async fn home_announcement_stops_stream_within_one_chunk_and_nothing_resumes() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/01/S1.wav", tone(32 * 1024, 1000))
        .add_file("/sdcard/home.wav", tone(2 * 1024, 7));
    let output = MockOutput::new().with_write_delay(Duration::from_millis(3));
    let probe = output.probe();
    let ctx = PlayerContext::new();

    with_engine(&ctx, &fs, output, async {
        let track = play(&ctx, "01/S1.wav");
        probe
            .wait_until(|p| p.bytes_in_last_session() >= 2 * MONO_CHUNK)
            .await;
        let written_before = probe.bytes_in_last_session();
        let home = ctx.request_announcement(path("home.wav"));

        let first = next_report(&ctx).await;
        assert_eq!(first.kind, StreamKind::Playback);
        assert_eq!(first.generation, track);
        assert_eq!(first.outcome, StreamOutcome::Interrupted);

        let second = next_report(&ctx).await;
        assert_eq!(second.kind, StreamKind::Announcement);
        assert_eq!(second.generation, home);
        assert_eq!(second.outcome, StreamOutcome::Completed);

        let sessions = probe.sessions();
        assert_eq!(sessions.len(), 2);
        assert!(sessions[0].data.len() <= written_before + MONO_CHUNK);
        assert!(sessions[0].released);
        assert!(sessions[1].samples().iter().all(|&s| s == 7));
        assert_eq!(sessions[1].data.len(), 2 * 1024 * 2);

        // No auto-resume of the interrupted track.
        Timer::after_millis(50).await;
        assert_eq!(probe.acquisitions(), 2);
        assert_eq!(ctx.active(), None);
        assert!(ctx.try_next_report().is_none());
    })
    .await;

    assert_eq!(probe.max_open(), 1);
    assert_eq!(probe.releases(), 2);
}

#[tokio::test]
async fn announcement_while_idle_starts_promptly() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/welcome.wav", tone(1024, 3));
    let output = MockOutput::new();
    let probe = output.probe();
    let ctx = PlayerContext::new();

    with_engine(&ctx, &fs, output, async {
        Timer::after_millis(20).await;
        let asked = Instant::now();
        ctx.request_announcement(path("welcome.wav"));
        with_timeout(
            Duration::from_millis(50),
            probe.wait_until(|p| p.acquisitions() == 1),
        )
        .await
        .expect("announcement did not start");
        assert!(asked.elapsed() < Duration::from_millis(50));
        assert_eq!(next_report(&ctx).await.outcome, StreamOutcome::Completed);
    })
    .await;
}

#[tokio::test]
async fn newer_announcement_preempts_running_announcement() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/stories.wav", tone(32 * 1024, 11))
        .add_file("/sdcard/story2.wav", tone(1024, 22));
    let output = MockOutput::new().with_write_delay(Duration::from_millis(3));
    let probe = output.probe();
    let ctx = PlayerContext::new();

    with_engine(&ctx, &fs, output, async {
        let section = ctx.request_announcement(path("stories.wav"));
        probe.wait_until(|p| p.bytes_in_last_session() > 0).await;
        let story = ctx.request_announcement(path("story2.wav"));

        let first = next_report(&ctx).await;
        assert_eq!((first.generation, first.outcome), (section, StreamOutcome::Interrupted));
        let second = next_report(&ctx).await;
        assert_eq!((second.generation, second.outcome), (story, StreamOutcome::Completed));
    })
    .await;
    assert_eq!(probe.max_open(), 1);
}

#[tokio::test]
async fn pause_holds_output_and_resume_continues_at_cursor() {
    let samples = ramp(8 * 1024);
    let fs = MemFs::new();
    fs.add_file("/sdcard/01/S1.wav", wav_bytes(16_000, 1, 16, &samples));
    let output = MockOutput::new().with_write_delay(Duration::from_millis(2));
    let probe = output.probe();
    let ctx = PlayerContext::new();

    with_engine(&ctx, &fs, output, async {
        play(&ctx, "01/S1.wav");
        probe
            .wait_until(|p| p.bytes_in_last_session() >= 2 * MONO_CHUNK)
            .await;
        ctx.set_paused(true);

        Timer::after_millis(30).await;
        let held = probe.bytes_in_last_session();
        Timer::after_millis(80).await;
        assert_eq!(probe.bytes_in_last_session(), held);
        assert!(probe.is_open());
        assert!(held < samples.len() * 2);

        ctx.set_paused(false);
        assert_eq!(next_report(&ctx).await.outcome, StreamOutcome::Completed);
    })
    .await;

    let sessions = probe.sessions();
    assert_eq!(probe.acquisitions(), 1);
    assert_eq!(sessions[0].samples(), samples);
}

#[tokio::test]
async fn interrupt_while_paused_releases_output() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/01/S1.wav", tone(16 * 1024, 5));
    let output = MockOutput::new().with_write_delay(Duration::from_millis(2));
    let probe = output.probe();
    let ctx = PlayerContext::new();

    with_engine(&ctx, &fs, output, async {
        ctx.set_paused(true);
        let track = play(&ctx, "01/S1.wav");
        // A fresh request clears pause; pause again once it holds the output.
        probe.wait_until(|p| p.is_open()).await;
        ctx.set_paused(true);
        Timer::after_millis(20).await;
        ctx.interrupt(track);
        let report = next_report(&ctx).await;
        assert_eq!(report.outcome, StreamOutcome::Interrupted);
        assert!(!probe.is_open());
    })
    .await;
}

#[tokio::test]
async fn announcement_is_serviced_before_pending_playback() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/01/S1.wav", tone(1024, 1))
        .add_file("/sdcard/home.wav", tone(1024, 2));
    let output = MockOutput::new();
    let probe = output.probe();
    let ctx = PlayerContext::new();
    let track = play(&ctx, "01/S1.wav");
    let home = ctx.request_announcement(path("home.wav"));

    let mut engine = AudioEngine::new(&ctx, fs.storage(), output);
    let first = engine.service_next().await.unwrap();
    let second = engine.service_next().await.unwrap();
    assert!(engine.service_next().await.is_none());

    assert_eq!((first.kind, first.generation), (StreamKind::Announcement, home));
    assert_eq!((second.kind, second.generation), (StreamKind::Playback, track));
    assert_eq!(probe.sessions()[0].samples()[0], 2);
}

#[tokio::test]
async fn volume_is_applied_per_chunk() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/a.wav", tone(3000, 1000));
    let output = MockOutput::new();
    let probe = output.probe();
    let ctx = PlayerContext::new();
    ctx.set_volume(VolumePercent::new(50));
    play(&ctx, "a.wav");

    let mut engine = AudioEngine::new(&ctx, fs.storage(), output);
    let report = engine.service_next().await.unwrap();
    assert_eq!(report.outcome, StreamOutcome::Completed);
    let samples = probe.sessions()[0].samples();
    assert_eq!(samples.len(), 3000);
    assert!(samples.iter().all(|&s| s == 500));
}

#[tokio::test]
async fn streaming_stops_at_declared_data_size() {
    let mut bytes = tone(100, 9);
    bytes.extend_from_slice(&[0xAA; 64]);
    let fs = MemFs::new();
    fs.add_file("/sdcard/a.wav", bytes);
    let output = MockOutput::new().with_accept_limit(30);
    let probe = output.probe();
    let ctx = PlayerContext::new();
    play(&ctx, "a.wav");

    let mut engine = AudioEngine::new(&ctx, fs.storage(), output);
    assert_eq!(
        engine.service_next().await.unwrap().outcome,
        StreamOutcome::Completed
    );
    assert_eq!(probe.sessions()[0].samples(), vec![9; 100]);
}

#[tokio::test]
async fn missing_resource_fails_without_touching_output() {
    let fs = MemFs::new();
    let output = MockOutput::new();
    let probe = output.probe();
    let ctx = PlayerContext::new();
    ctx.request_announcement(path("home.wav"));

    let mut engine = AudioEngine::new(&ctx, fs.storage(), output);
    let report = engine.service_next().await.unwrap();
    assert_eq!(report.outcome, StreamOutcome::Failed(PlaybackError::NotFound));
    assert_eq!(probe.acquisitions(), 0);
    assert_eq!(ctx.active(), None);
}

#[tokio::test]
async fn non_16_bit_resource_is_rejected() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/a.wav", wav_bytes(16_000, 1, 8, &[0; 16]));
    let output = MockOutput::new();
    let probe = output.probe();
    let ctx = PlayerContext::new();
    play(&ctx, "a.wav");

    let mut engine = AudioEngine::new(&ctx, fs.storage(), output);
    let report = engine.service_next().await.unwrap();
    assert_eq!(
        report.outcome,
        StreamOutcome::Failed(PlaybackError::UnsupportedFormat { bits: 8 })
    );
    assert_eq!(probe.acquisitions(), 0);
}

#[tokio::test]
async fn failed_acquire_reports_hardware_error() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/a.wav", tone(64, 1));
    let output = MockOutput::new().failing_acquire();
    let probe = output.probe();
    let ctx = PlayerContext::new();
    play(&ctx, "a.wav");

    let mut engine = AudioEngine::new(&ctx, fs.storage(), output);
    let report = engine.service_next().await.unwrap();
    assert_eq!(report.outcome, StreamOutcome::Failed(PlaybackError::Hardware));
    assert_eq!(probe.releases(), 0);
}

#[tokio::test]
async fn failed_write_releases_output() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/a.wav", tone(64, 1));
    let output = MockOutput::new().failing_writes();
    let probe = output.probe();
    let ctx = PlayerContext::new();
    play(&ctx, "a.wav");

    let mut engine = AudioEngine::new(&ctx, fs.storage(), output);
    let report = engine.service_next().await.unwrap();
    assert_eq!(report.outcome, StreamOutcome::Failed(PlaybackError::Hardware));
    assert_eq!(probe.acquisitions(), 1);
    assert_eq!(probe.releases(), 1);
}

#[tokio::test]
async fn read_failure_mid_stream_releases_output() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/a.wav", tone(4096, 1)).fail_reads("/sdcard/a.wav");
    let output = MockOutput::new();
    let probe = output.probe();
    let ctx = PlayerContext::new();
    play(&ctx, "a.wav");

    let mut engine = AudioEngine::new(&ctx, fs.storage(), output);
    let report = engine.service_next().await.unwrap();
    assert_eq!(report.outcome, StreamOutcome::Failed(PlaybackError::Storage));
    assert_eq!(probe.releases(), 1);
}

#[tokio::test]
async fn stalled_output_times_out() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/a.wav", tone(64, 1));
    let output = MockOutput::new().stalled();
    let probe = output.probe();
    let ctx = PlayerContext::new();
    play(&ctx, "a.wav");

    let mut engine = AudioEngine::new(&ctx, fs.storage(), output);
    let report = engine.service_next().await.unwrap();
    assert_eq!(report.outcome, StreamOutcome::Failed(PlaybackError::Timeout));
    assert_eq!(probe.releases(), 1);
    assert!(!probe.is_open());
}

#[tokio::test]
async fn reports_are_published_on_the_context() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/a.wav", tone(64, 1));
    let ctx = PlayerContext::new();
    let generation = play(&ctx, "a.wav");

    let mut engine = AudioEngine::new(&ctx, fs.storage(), MockOutput::new());
    let returned = engine.service_next().await.unwrap();
    assert_eq!(ctx.try_next_report(), Some(returned));
    assert_eq!(returned.generation, generation);
}
