//! The main control loop.
//!
//! Owns the [`Navigator`] and the catalog provider. Each tick it waits up to
//! [`POLL_TICK_MS`] for a command from the input consumer, collects the
//! engine's stream reports, applies the command's effects to the
//! [`PlayerContext`] and samples the polled buttons. Reports are collected
//! before commands are handled, so a press never acts on a stream that has
//! already ended.
//!
//! It also plays the boot greeting: `welcome.wav`, then `home.wav` once the
//! welcome ends, each only if present. The first user command cancels
//! whatever part of the greeting has not been requested yet.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;
use embassy_time::{Instant, Timer};
use embedded_hal::digital::InputPin;
use navigation::{announce, Command, Effect, Navigator};
use platform::config::{POLL_TICK_MS, VOLUME_STEP};
use platform::{Button, CatalogProvider};
use playback::{Generation, PlayerContext, StreamKind, StreamReport};

use crate::input::ButtonPoller;

/// Progress of the boot greeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Greeting {
    /// Not started yet.
    Pending,
    /// Welcome requested with this generation; home follows when it ends.
    Welcome(Generation),
    /// Nothing left to announce.
    Done,
}

/// Navigation, buttons and greeting for one device.
pub struct ControlLoop<'a, C, P, const B: usize> {
    navigator: Navigator,
    provider: C,
    player: &'a PlayerContext,
    buttons: ButtonPoller<P, B>,
    greeting: Greeting,
}

impl<'a, C, P, const B: usize> ControlLoop<'a, C, P, B>
where
    C: CatalogProvider,
    P: InputPin,
{
    /// Control loop over `provider`; call [`start`](Self::start) before ticking.
    pub fn new(player: &'a PlayerContext, provider: C, buttons: ButtonPoller<P, B>) -> Self {
        Self {
            navigator: Navigator::new(),
            provider,
            player,
            buttons,
            greeting: Greeting::Pending,
        }
    }

    /// Load the card's folders and begin the greeting.
    pub async fn start(&mut self) {
        let folders = self.navigator.load_root(&mut self.provider).await;
        info!("storage ready, {} folders", folders);
        if self.greeting != Greeting::Pending {
            return;
        }
        if let Some(path) = announce::welcome(&mut self.provider).await {
            let generation = self.player.request_announcement(path);
            self.greeting = Greeting::Welcome(generation);
        } else {
            self.announce_home().await;
        }
    }

    /// Run forever.
    pub async fn run<M: RawMutex, const N: usize>(&mut self, commands: Receiver<'_, M, Command, N>) -> ! {
        self.start().await;
        loop {
            self.tick(&commands).await;
        }
    }

    /// One loop iteration.
    pub async fn tick<M: RawMutex, const N: usize>(&mut self, commands: &Receiver<'_, M, Command, N>) {
        let first = match select(commands.receive(), Timer::after_millis(POLL_TICK_MS)).await {
            Either::First(command) => Some(command),
            Either::Second(()) => None,
        };
        self.collect_reports().await;
        if let Some(command) = first {
            self.dispatch(command).await;
            while let Ok(command) = commands.try_receive() {
                self.dispatch(command).await;
            }
        }
        self.poll_buttons(Instant::now()).await;
    }

    /// Route one command through the navigator and apply its effects.
    pub async fn dispatch(&mut self, command: Command) {
        if self.greeting != Greeting::Done {
            debug!("greeting cancelled by {}", command.label());
            self.greeting = Greeting::Done;
        }
        let effects = self
            .navigator
            .handle(command, &mut self.provider, self.player.generations())
            .await;
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&self, effect: Effect) {
        match effect {
            Effect::Announce(path) => {
                let generation = self.player.request_announcement(path);
                debug!("announcement {} requested", generation.get());
            }
            Effect::Play(request) => {
                debug!(
                    "track {} requested as {}",
                    request.track_index,
                    request.generation.get()
                );
                self.player.request_playback(request);
            }
            Effect::Interrupt(generation) => self.player.interrupt(generation),
            Effect::SetPaused(paused) => self.player.set_paused(paused),
        }
    }

    async fn collect_reports(&mut self) {
        while let Some(report) = self.player.try_next_report() {
            if let Some(effect) = self.navigator.on_stream_finished(&report) {
                self.apply(effect);
            }
            self.advance_greeting(&report).await;
        }
    }

    async fn advance_greeting(&mut self, report: &StreamReport) {
        let Greeting::Welcome(welcome) = self.greeting else {
            return;
        };
        if report.kind == StreamKind::Announcement && report.generation == welcome {
            self.announce_home().await;
        }
    }

    async fn announce_home(&mut self) {
        self.greeting = Greeting::Done;
        if let Some(path) = announce::home(&mut self.provider).await {
            self.player.request_announcement(path);
        }
    }

    /// Sample the buttons once and act on new presses.
    pub async fn poll_buttons(&mut self, now: Instant) {
        for button in self.buttons.poll(now) {
            match button {
                Button::PlayPause => self.dispatch(Command::Primary).await,
                Button::Home => self.dispatch(Command::Secondary).await,
                Button::VolumeUp => self.change_volume(VOLUME_STEP),
                Button::VolumeDown => self.change_volume(VOLUME_STEP.saturating_neg()),
            }
        }
    }

    fn change_volume(&self, delta: i32) {
        let volume = self.player.adjust_volume(delta);
        info!("volume {}%", volume.get());
    }

    /// Navigation state.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Boot greeting progress.
    pub fn greeting(&self) -> Greeting {
        self.greeting
    }
}
