//! Announcement resource lookup.
//!
//! Announcements are optional files on the card. Each lookup builds its
//! candidate paths in priority order (card root first, then the relevant
//! folder) and returns the first one that exists, or `None` when the card
//! has no such resource.

use core::fmt::Write as _;

use heapless::String;
use platform::catalog::join_path;
use platform::config::{
    HOME_RESOURCE, SD_ROOT, SECTION_RESOURCE, STORY_RESOURCE_PREFIX, TRACK_EXTENSION,
    WELCOME_RESOURCE,
};
use platform::{CatalogProvider, ResourcePath};

/// `story<d>.wav` is at most this long.
const STORY_NAME_MAX: usize = 16;

/// Story number of a track named `S<d>...` or `s<d>...`.
///
/// Only the first digit counts: `S12.wav` is story 1.
pub fn story_number(track_name: &str) -> Option<u8> {
    let mut bytes = track_name.bytes();
    let (Some(b'S' | b's'), Some(digit)) = (bytes.next(), bytes.next()) else {
        return None;
    };
    digit.is_ascii_digit().then(|| digit.wrapping_sub(b'0'))
}

async fn first_existing<C: CatalogProvider>(
    provider: &mut C,
    dirs: &[Option<&str>],
    name: &str,
) -> Option<ResourcePath> {
    for dir in dirs.iter().flatten() {
        let Ok(candidate) = join_path(dir, name) else {
            continue;
        };
        if provider.exists(&candidate).await {
            return Some(candidate);
        }
    }
    None
}

/// Section resource for a reserved folder: card root, then the folder.
pub async fn section<C: CatalogProvider>(
    provider: &mut C,
    folder_path: &str,
) -> Option<ResourcePath> {
    first_existing(provider, &[Some(SD_ROOT), Some(folder_path)], SECTION_RESOURCE).await
}

/// Story resource for a track: card root, then the track's folder.
///
/// `None` if the name does not follow the story pattern or no resource
/// exists.
pub async fn story<C: CatalogProvider>(
    provider: &mut C,
    folder_path: &str,
    track_name: &str,
) -> Option<ResourcePath> {
    let n = story_number(track_name)?;
    let mut name: String<STORY_NAME_MAX> = String::new();
    write!(name, "{STORY_RESOURCE_PREFIX}{n}{TRACK_EXTENSION}").ok()?;
    first_existing(provider, &[Some(SD_ROOT), Some(folder_path)], &name).await
}

/// `home.wav` at the card root.
pub async fn home<C: CatalogProvider>(provider: &mut C) -> Option<ResourcePath> {
    first_existing(provider, &[Some(SD_ROOT)], HOME_RESOURCE).await
}

/// `welcome.wav` at the card root.
pub async fn welcome<C: CatalogProvider>(provider: &mut C) -> Option<ResourcePath> {
    first_existing(provider, &[Some(SD_ROOT)], WELCOME_RESOURCE).await
}
