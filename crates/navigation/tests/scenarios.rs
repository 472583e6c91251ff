//! Card layouts from the field: default selection and announcements.
#![allow(clippy::unwrap_used, clippy::panic, clippy::indexing_slicing)]

use navigation::{Command, Effect, Navigator, Screen};
use platform::mocks::{tone, MemFs};
use platform::Direction;
use playback::GenerationCounter;

fn card_with_folders(names: &[&str]) -> MemFs {
    let fs = MemFs::new();
    for name in names {
        fs.add_dir(&format!("/sdcard/{name}"));
    }
    fs
}

#[tokio::test]
async fn folder_named_01_is_selected_by_default() {
    let fs = card_with_folders(&["audios", "01", "music"]);
    let mut nav = Navigator::new();
    assert_eq!(nav.load_root(&mut fs.catalog()).await, 3);
    assert_eq!(nav.catalog().folder(nav.selected_folder()), Some("01"));
}

#[tokio::test]
async fn audios_is_selected_without_01() {
    let fs = card_with_folders(&["music", "audios"]);
    let mut nav = Navigator::new();
    nav.load_root(&mut fs.catalog()).await;
    assert_eq!(nav.catalog().folder(nav.selected_folder()), Some("audios"));
}

#[tokio::test]
async fn first_folder_is_the_last_resort() {
    let fs = card_with_folders(&["music", "podcasts"]);
    let mut nav = Navigator::new();
    nav.load_root(&mut fs.catalog()).await;
    assert_eq!(nav.selected_folder(), 0);
}

#[tokio::test]
async fn stepping_to_a_story_track_announces_root_story() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/01/S1.wav", tone(4, 0))
        .add_file("/sdcard/01/S2.wav", tone(4, 0))
        .add_file("/sdcard/story2.wav", tone(4, 0));
    let mut provider = fs.catalog();
    let gens = GenerationCounter::new();
    let mut nav = Navigator::new();
    nav.load_root(&mut provider).await;
    nav.handle(Command::Primary, &mut provider, &gens).await;
    nav.handle(Command::Primary, &mut provider, &gens).await;
    nav.handle(Command::Primary, &mut provider, &gens).await;
    assert!(nav.playing().is_some());

    let fx = nav
        .handle(Command::Step(Direction::Clockwise), &mut provider, &gens)
        .await;
    assert_eq!(nav.catalog().track(nav.current_track()), Some("S2.wav"));
    assert!(
        matches!(fx.as_slice(), [Effect::Announce(p)] if p.as_str() == "/sdcard/story2.wav"),
        "{fx:?}"
    );
}

#[tokio::test]
async fn entering_a_section_folder_announces_section_then_first_story() {
    let fs = MemFs::new();
    fs.add_file("/sdcard/stories.wav", tone(4, 0))
        .add_file("/sdcard/01/S1.wav", tone(4, 0))
        .add_file("/sdcard/01/story1.wav", tone(4, 0));
    let mut provider = fs.catalog();
    let gens = GenerationCounter::new();
    let mut nav = Navigator::new();
    nav.load_root(&mut provider).await;
    nav.handle(Command::Primary, &mut provider, &gens).await;
    let fx = nav.handle(Command::Primary, &mut provider, &gens).await;

    assert_eq!(nav.screen(), Screen::FileView);
    assert_eq!(nav.current_track(), 0);
    let announced: Vec<&str> = fx
        .iter()
        .filter_map(|e| match e {
            Effect::Announce(p) => Some(p.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(announced, vec!["/sdcard/stories.wav", "/sdcard/01/story1.wav"]);
    assert!(fx.contains(&Effect::SetPaused(false)));
}

#[tokio::test]
async fn stepping_onto_a_section_folder_announces_it() {
    let fs = card_with_folders(&["music", "Stories"]);
    fs.add_file("/sdcard/Stories/stories.wav", tone(4, 0));
    let mut provider = fs.catalog();
    let gens = GenerationCounter::new();
    let mut nav = Navigator::new();
    nav.load_root(&mut provider).await;
    assert_eq!(nav.selected_folder(), 0);

    let fx = nav
        .handle(Command::Step(Direction::CounterClockwise), &mut provider, &gens)
        .await;
    assert_eq!(nav.selected_folder(), 1);
    assert!(
        matches!(fx.as_slice(), [Effect::Announce(p)] if p.as_str() == "/sdcard/Stories/stories.wav")
    );
    let fx = nav
        .handle(Command::Step(Direction::Clockwise), &mut provider, &gens)
        .await;
    assert!(fx.is_empty());
}
