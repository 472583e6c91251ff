//! Navigation state machine.
//!
//! [`Navigator`] owns the screen, the selection indices and the catalog
//! snapshot. It never touches the audio engine directly: each command
//! yields a short list of [`Effect`]s that the control loop applies to the
//! player context in order.
//!
//! | Screen     | Command   | Effect                                                    |
//! |------------|-----------|-----------------------------------------------------------|
//! | Home       | Primary   | → FolderView if there are folders                         |
//! | Home       | Step      | move folder selection, section announcement if reserved   |
//! | FolderView | Step      | move folder selection, section announcement if reserved   |
//! | FolderView | Primary   | section announcement, load tracks, → FileView, story of first track |
//! | FolderView | Secondary | → Home, `home.wav`                                        |
//! | FileView   | Step      | move track selection, story announcement                  |
//! | FileView   | Primary   | play / toggle pause / switch track                        |
//! | FileView   | Secondary | stop playback, drop tracks, → FolderView                  |

use heapless::Vec;
use platform::{CatalogProvider, Direction, ResourcePath};
use playback::{Generation, GenerationCounter, PlaybackRequest, StreamKind, StreamReport};

use crate::announce;
use crate::catalog::{is_section_folder, Catalog};
use crate::command::Command;
use crate::screen::Screen;

/// Upper bound on effects produced by one command.
pub const MAX_EFFECTS: usize = 4;

/// Effects of one command, in the order they must be applied.
pub type Effects = Vec<Effect, MAX_EFFECTS>;

/// Something the control loop must do on the player context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Post an announcement.
    Announce(ResourcePath),
    /// Post a playback request.
    Play(PlaybackRequest),
    /// Stop the stream with this generation.
    Interrupt(Generation),
    /// Set the pause flag.
    SetPaused(bool),
}

/// Next index when stepping through `len` entries, wrapping at both ends.
///
/// An out-of-range `index` is treated as 0. Returns 0 for an empty list.
pub fn step_index(index: usize, len: usize, direction: Direction) -> usize {
    if len == 0 {
        return 0;
    }
    let index = if index < len { index } else { 0 };
    match direction {
        Direction::Clockwise => index.checked_add(1).filter(|&n| n < len).unwrap_or(0),
        Direction::CounterClockwise => index
            .checked_sub(1)
            .unwrap_or_else(|| len.saturating_sub(1)),
    }
}

fn push(effects: &mut Effects, effect: Effect) {
    if effects.push(effect).is_err() {
        warn!("effect list full");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Playing {
    track: usize,
    generation: Generation,
}

/// Screen, selection and playback bookkeeping.
#[derive(Debug, Default)]
pub struct Navigator {
    screen: Screen,
    catalog: Catalog,
    selected_folder: usize,
    current_track: usize,
    playing: Option<Playing>,
    paused: bool,
}

impl Navigator {
    /// Navigator at Home with an empty catalog.
    pub const fn new() -> Self {
        Self {
            screen: Screen::Home,
            catalog: Catalog::new(),
            selected_folder: 0,
            current_track: 0,
            playing: None,
            paused: false,
        }
    }

    /// Load the root folders and select the default folder.
    ///
    /// Returns to Home. An unreadable root leaves the catalog empty.
    pub async fn load_root<C: CatalogProvider>(&mut self, provider: &mut C) -> usize {
        self.screen = Screen::Home;
        self.current_track = 0;
        self.playing = None;
        self.paused = false;
        let count = match self.catalog.load_folders(provider).await {
            Ok(n) => n,
            Err(_) => {
                error!("card root unreadable");
                0
            }
        };
        self.selected_folder = self.catalog.default_folder_index();
        if let Some(name) = self.catalog.folder(self.selected_folder) {
            info!("default folder {}: {}", self.selected_folder, name);
        }
        count
    }

    /// Apply one command.
    pub async fn handle<C: CatalogProvider>(
        &mut self,
        command: Command,
        provider: &mut C,
        generations: &GenerationCounter,
    ) -> Effects {
        let mut effects = Effects::new();
        debug!("{} on {}", command.label(), self.screen.label());
        match (self.screen, command) {
            (Screen::Home | Screen::FolderView, Command::Step(direction)) => {
                self.step_folder(direction, provider, &mut effects).await;
            }
            (Screen::Home, Command::Primary) => {
                if self.catalog.folders().is_empty() {
                    info!("no folders to enter");
                } else {
                    self.screen = Screen::FolderView;
                }
            }
            (Screen::Home, Command::Secondary) => {}
            (Screen::FolderView, Command::Primary) => {
                self.open_folder(provider, &mut effects).await;
            }
            (Screen::FolderView, Command::Secondary) => {
                self.screen = Screen::Home;
                if let Some(path) = announce::home(provider).await {
                    push(&mut effects, Effect::Announce(path));
                }
            }
            (Screen::FileView, Command::Step(direction)) => {
                self.step_track(direction, provider, &mut effects).await;
            }
            (Screen::FileView, Command::Primary) => self.play_or_pause(generations, &mut effects),
            (Screen::FileView, Command::Secondary) => self.close_folder(&mut effects),
        }
        effects
    }

    /// Forget the playing track once the engine is done with it.
    ///
    /// Returns the effect needed to leave the player unpaused, if any.
    pub fn on_stream_finished(&mut self, report: &StreamReport) -> Option<Effect> {
        if report.kind != StreamKind::Playback {
            return None;
        }
        let playing = self.playing?;
        if playing.generation != report.generation {
            return None;
        }
        self.playing = None;
        if self.paused {
            self.paused = false;
            Some(Effect::SetPaused(false))
        } else {
            None
        }
    }

    async fn step_folder<C: CatalogProvider>(
        &mut self,
        direction: Direction,
        provider: &mut C,
        effects: &mut Effects,
    ) {
        let len = self.catalog.folders().len();
        if len == 0 {
            return;
        }
        self.selected_folder = step_index(self.selected_folder, len, direction);
        let Some(name) = self.catalog.folder(self.selected_folder) else {
            return;
        };
        info!("folder {}: {}", self.selected_folder, name);
        if !is_section_folder(name) {
            return;
        }
        if let Some(dir) = self.catalog.folder_path(self.selected_folder) {
            if let Some(path) = announce::section(provider, &dir).await {
                push(effects, Effect::Announce(path));
            }
        }
    }

    async fn open_folder<C: CatalogProvider>(&mut self, provider: &mut C, effects: &mut Effects) {
        let Some(dir) = self.catalog.folder_path(self.selected_folder) else {
            return;
        };
        if self.catalog.folder(self.selected_folder).is_some_and(is_section_folder) {
            if let Some(path) = announce::section(provider, &dir).await {
                push(effects, Effect::Announce(path));
            }
        }
        if self.catalog.load_tracks(provider, self.selected_folder).await.is_err() {
            warn!("cannot list {}", dir.as_str());
        }
        self.screen = Screen::FileView;
        self.current_track = 0;
        self.playing = None;
        self.paused = false;
        push(effects, Effect::SetPaused(false));
        info!("entered {} ({} tracks)", dir.as_str(), self.catalog.tracks().len());

        if let Some(first) = self.catalog.track(0) {
            if let Some(path) = announce::story(provider, &dir, first).await {
                push(effects, Effect::Announce(path));
            }
        }
    }

    async fn step_track<C: CatalogProvider>(
        &mut self,
        direction: Direction,
        provider: &mut C,
        effects: &mut Effects,
    ) {
        let len = self.catalog.tracks().len();
        if len == 0 {
            return;
        }
        self.current_track = step_index(self.current_track, len, direction);
        let (Some(name), Some(folder)) = (
            self.catalog.track(self.current_track),
            self.catalog.open_folder().and_then(|i| self.catalog.folder_path(i)),
        ) else {
            return;
        };
        info!("track {}: {}", self.current_track, name);
        if let Some(path) = announce::story(provider, &folder, name).await {
            push(effects, Effect::Announce(path));
        }
    }

    fn play_or_pause(&mut self, generations: &GenerationCounter, effects: &mut Effects) {
        if self.catalog.tracks().is_empty() {
            info!("no tracks to play");
            return;
        }
        match self.playing {
            Some(playing) if playing.track == self.current_track => {
                self.paused = !self.paused;
                info!("pause -> {}", self.paused);
                push(effects, Effect::SetPaused(self.paused));
            }
            Some(playing) => {
                push(effects, Effect::Interrupt(playing.generation));
                self.playing = None;
                self.start(generations, effects);
            }
            None => self.start(generations, effects),
        }
    }

    fn start(&mut self, generations: &GenerationCounter, effects: &mut Effects) {
        let Some(path) = self.catalog.track_path(self.current_track) else {
            return;
        };
        let generation = generations.next();
        info!("play track {} as {}", self.current_track, generation.get());
        push(
            effects,
            Effect::Play(PlaybackRequest {
                track_index: self.current_track,
                path,
                generation,
            }),
        );
        self.playing = Some(Playing {
            track: self.current_track,
            generation,
        });
        self.paused = false;
    }

    fn close_folder(&mut self, effects: &mut Effects) {
        if let Some(playing) = self.playing.take() {
            push(effects, Effect::Interrupt(playing.generation));
        }
        if self.paused {
            self.paused = false;
            push(effects, Effect::SetPaused(false));
        }
        self.catalog.clear_tracks();
        self.current_track = 0;
        self.screen = Screen::FolderView;
    }

    /// Current screen.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Catalog snapshot.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Selected root folder.
    pub fn selected_folder(&self) -> usize {
        self.selected_folder
    }

    /// Selected track in the open folder.
    pub fn current_track(&self) -> usize {
        self.current_track
    }

    /// Track index and generation of the requested playback, if any.
    pub fn playing(&self) -> Option<(usize, Generation)> {
        self.playing.map(|p| (p.track, p.generation))
    }

    /// Pause state as last requested.
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}
