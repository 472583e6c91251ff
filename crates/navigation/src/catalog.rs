//! Snapshot of the card: root folders and the tracks of the open folder.
//!
//! Both lists are bounded (`MAX_FOLDERS`, `MAX_TRACKS`); a card with more
//! entries is silently truncated in listing order. Entries the provider
//! reports as [`EntryKind::Unknown`] are resolved with a metadata lookup
//! before they count toward the bound.

use core::ops::ControlFlow;

use heapless::Vec;
use platform::catalog::{entry_name, join_path};
use platform::config::{
    FALLBACK_DEFAULT_FOLDER, MAX_FOLDERS, MAX_TRACKS, SD_ROOT, SECTION_FOLDERS, TRACK_EXTENSION,
};
use platform::{CatalogProvider, EntryKind, EntryName, ResourcePath};

/// `true` for a folder whose entry triggers the section announcement.
pub fn is_section_folder(name: &str) -> bool {
    SECTION_FOLDERS.iter().any(|s| s.eq_ignore_ascii_case(name))
}

/// `true` for a file name the player lists as a track.
///
/// The name must be longer than the extension itself and end in `.wav`,
/// compared case-insensitively.
pub fn is_track_name(name: &str) -> bool {
    let ext_len = TRACK_EXTENSION.len();
    if name.len() <= ext_len {
        return false;
    }
    name.len()
        .checked_sub(ext_len)
        .and_then(|at| name.get(at..))
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TRACK_EXTENSION))
}

fn is_dot_entry(name: &str) -> bool {
    name == "." || name == ".."
}

/// One pass over `dir`: skip the first `offset` entries passing `keep`, then
/// take up to `N` more with their listed kind.
///
/// Returns the page, the number of passing entries it consumed (over-long
/// names included) and whether the listing ended before the page filled.
async fn list_page<C, K, const N: usize>(
    provider: &mut C,
    dir: &str,
    keep: &K,
    offset: usize,
) -> Result<(Vec<(EntryName, EntryKind), N>, usize, bool), C::Error>
where
    C: CatalogProvider,
    K: Fn(&str, EntryKind) -> bool,
{
    let mut page: Vec<(EntryName, EntryKind), N> = Vec::new();
    let mut seen = 0usize;
    let mut consumed = 0usize;
    let mut filled = false;
    provider
        .read_dir(dir, |entry| {
            if is_dot_entry(entry.name) || !keep(entry.name, entry.kind) {
                return ControlFlow::Continue(());
            }
            seen = seen.saturating_add(1);
            if seen <= offset {
                return ControlFlow::Continue(());
            }
            consumed = consumed.saturating_add(1);
            match entry_name(entry.name) {
                Ok(name) => {
                    // Never full here: the visitor stops as soon as it fills.
                    let _ = page.push((name, entry.kind));
                }
                Err(_) => warn!("skipping entry with over-long name in {}", dir),
            }
            if page.is_full() {
                filled = true;
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .await?;
    Ok((page, consumed, !filled))
}

/// Listed kind, or the metadata kind for an `Unknown` entry.
async fn resolve_kind<C: CatalogProvider>(
    provider: &mut C,
    dir: &str,
    name: &str,
    listed: EntryKind,
) -> EntryKind {
    if listed != EntryKind::Unknown {
        return listed;
    }
    match join_path(dir, name) {
        Ok(path) => provider.metadata(&path).await.unwrap_or(EntryKind::Unknown),
        Err(_) => EntryKind::Unknown,
    }
}

/// Up to `N` entries of `dir` passing `keep` whose resolved kind is `wanted`,
/// in listing order.
///
/// Only confirmed entries count toward `N`: entries listed as `Unknown` are
/// resolved first, so files of unknown kind cannot crowd out directories.
async fn collect<C, const N: usize>(
    provider: &mut C,
    dir: &str,
    keep: impl Fn(&str, EntryKind) -> bool,
    wanted: EntryKind,
) -> Result<Vec<EntryName, N>, C::Error>
where
    C: CatalogProvider,
{
    let mut found: Vec<EntryName, N> = Vec::new();
    let mut offset = 0usize;
    while !found.is_full() {
        let (page, consumed, exhausted) = list_page::<C, _, N>(provider, dir, &keep, offset).await?;
        for (name, listed) in page {
            if found.is_full() {
                break;
            }
            if resolve_kind(provider, dir, &name, listed).await == wanted {
                // Checked not full above.
                let _ = found.push(name);
            }
        }
        if exhausted || consumed == 0 {
            break;
        }
        offset = offset.saturating_add(consumed);
    }
    Ok(found)
}

/// Folder and track lists.
#[derive(Debug, Default)]
pub struct Catalog {
    folders: Vec<EntryName, MAX_FOLDERS>,
    tracks: Vec<EntryName, MAX_TRACKS>,
    open_folder: Option<usize>,
}

impl Catalog {
    /// Empty catalog.
    pub const fn new() -> Self {
        Self {
            folders: Vec::new(),
            tracks: Vec::new(),
            open_folder: None,
        }
    }

    /// Replace the folder list with the directories at the card root.
    ///
    /// Also discards any loaded tracks. Returns the number of folders.
    pub async fn load_folders<C: CatalogProvider>(&mut self, provider: &mut C) -> Result<usize, C::Error> {
        self.folders.clear();
        self.clear_tracks();
        self.folders = collect(
            provider,
            SD_ROOT,
            |_, kind| matches!(kind, EntryKind::Directory | EntryKind::Unknown),
            EntryKind::Directory,
        )
        .await?;
        info!("{} folders on card", self.folders.len());
        Ok(self.folders.len())
    }

    /// Replace the track list with the tracks of folder `index`.
    ///
    /// An out-of-range index leaves the track list empty.
    pub async fn load_tracks<C: CatalogProvider>(
        &mut self,
        provider: &mut C,
        index: usize,
    ) -> Result<usize, C::Error> {
        self.clear_tracks();
        let Some(dir) = self.folder_path(index) else {
            return Ok(0);
        };
        self.tracks = collect(
            provider,
            &dir,
            |name, kind| matches!(kind, EntryKind::File | EntryKind::Unknown) && is_track_name(name),
            EntryKind::File,
        )
        .await?;
        self.open_folder = Some(index);
        info!("{} tracks in {}", self.tracks.len(), dir.as_str());
        Ok(self.tracks.len())
    }

    /// Forget the open folder's tracks.
    pub fn clear_tracks(&mut self) {
        self.tracks.clear();
        self.open_folder = None;
    }

    /// Root folder names in listing order.
    pub fn folders(&self) -> &[EntryName] {
        &self.folders
    }

    /// Track names of the open folder in listing order.
    pub fn tracks(&self) -> &[EntryName] {
        &self.tracks
    }

    /// Index of the folder whose tracks are loaded.
    pub fn open_folder(&self) -> Option<usize> {
        self.open_folder
    }

    /// Name of folder `index`.
    pub fn folder(&self, index: usize) -> Option<&str> {
        self.folders.get(index).map(EntryName::as_str)
    }

    /// Name of track `index`.
    pub fn track(&self, index: usize) -> Option<&str> {
        self.tracks.get(index).map(EntryName::as_str)
    }

    /// Absolute path of folder `index`.
    pub fn folder_path(&self, index: usize) -> Option<ResourcePath> {
        join_path(SD_ROOT, self.folder(index)?).ok()
    }

    /// Absolute path of track `index` in the open folder.
    pub fn track_path(&self, index: usize) -> Option<ResourcePath> {
        let dir = self.folder_path(self.open_folder?)?;
        join_path(&dir, self.track(index)?).ok()
    }

    /// Folder selected at boot: `01` if present, else `audios`, else the
    /// first folder. Names compare case-insensitively.
    pub fn default_folder_index(&self) -> usize {
        let position = |wanted: &str| {
            self.folders
                .iter()
                .position(|f| f.as_str().eq_ignore_ascii_case(wanted))
        };
        SECTION_FOLDERS
            .first()
            .and_then(|preferred| position(*preferred))
            .or_else(|| position(FALLBACK_DEFAULT_FOLDER))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::mocks::{tone, MemFs};

    #[test]
    fn track_filter_matches_extension_case_insensitively() {
        assert!(is_track_name("S1.wav"));
        assert!(is_track_name("story.WAV"));
        assert!(!is_track_name(".wav"));
        assert!(!is_track_name("a.mp3"));
        assert!(!is_track_name("wav"));
    }

    #[test]
    fn section_folders_are_case_insensitive() {
        assert!(is_section_folder("01"));
        assert!(is_section_folder("Stories"));
        assert!(!is_section_folder("music"));
    }

    #[tokio::test]
    async fn unknown_entries_are_resolved_by_metadata() {
        let fs = MemFs::new();
        fs.add_dir("/sdcard/01")
            .add_dir("/sdcard/music")
            .add_file("/sdcard/home.wav", tone(4, 0))
            .add_file("/sdcard/01/S1.wav", tone(4, 0))
            .add_file("/sdcard/01/notes.txt", b"x".to_vec())
            .add_dir("/sdcard/01/S9.wav")
            .add_file("/sdcard/01/S2.wav", tone(4, 0))
            .mark_unknown("/sdcard/music")
            .mark_unknown("/sdcard/home.wav")
            .mark_unknown("/sdcard/01/S2.wav");
        let mut provider = fs.catalog();
        let mut catalog = Catalog::new();

        assert_eq!(catalog.load_folders(&mut provider).await.unwrap(), 2);
        assert_eq!(catalog.folder(1), Some("music"));

        assert_eq!(catalog.load_tracks(&mut provider, 0).await.unwrap(), 2);
        assert_eq!(catalog.track(0), Some("S1.wav"));
        assert_eq!(catalog.track(1), Some("S2.wav"));
        assert_eq!(
            catalog.track_path(1).unwrap().as_str(),
            "/sdcard/01/S2.wav"
        );
    }

    #[tokio::test]
    async fn unknown_files_do_not_crowd_out_folders() {
        let fs = MemFs::new();
        for i in 0..40 {
            let path = format!("/sdcard/story{i}.wav");
            fs.add_file(&path, tone(4, 0)).mark_unknown(&path);
        }
        fs.add_dir("/sdcard/01").mark_unknown("/sdcard/01");
        let mut catalog = Catalog::new();
        assert_eq!(catalog.load_folders(&mut fs.catalog()).await.unwrap(), 1);
        assert_eq!(catalog.folder(0), Some("01"));
        assert_eq!(catalog.default_folder_index(), 0);
    }

    #[tokio::test]
    async fn unknown_entries_fill_to_capacity_with_confirmed_kinds() {
        let fs = MemFs::new();
        for i in 0..(MAX_FOLDERS + 3) {
            let file = format!("/sdcard/f{i:02}.wav");
            let dir = format!("/sdcard/d{i:02}");
            fs.add_file(&file, tone(4, 0))
                .mark_unknown(&file)
                .add_dir(&dir)
                .mark_unknown(&dir);
        }
        let mut catalog = Catalog::new();
        let n = catalog.load_folders(&mut fs.catalog()).await.unwrap();
        assert_eq!(n, MAX_FOLDERS);
        assert!(catalog.folders().iter().all(|f| f.starts_with('d')));
        assert_eq!(catalog.folder(MAX_FOLDERS - 1), Some("d31"));
    }

    #[tokio::test]
    async fn unknown_subfolders_do_not_crowd_out_tracks() {
        let fs = MemFs::new();
        for i in 0..(MAX_TRACKS + 2) {
            let dir = format!("/sdcard/01/x{i:02}.wav");
            fs.add_dir(&dir).mark_unknown(&dir);
        }
        fs.add_file("/sdcard/01/S1.wav", tone(4, 0))
            .mark_unknown("/sdcard/01/S1.wav");
        let mut provider = fs.catalog();
        let mut catalog = Catalog::new();
        catalog.load_folders(&mut provider).await.unwrap();
        assert_eq!(catalog.load_tracks(&mut provider, 0).await.unwrap(), 1);
        assert_eq!(catalog.track(0), Some("S1.wav"));
    }

    #[tokio::test]
    async fn folder_list_truncates_at_capacity() {
        let fs = MemFs::new();
        for i in 0..(MAX_FOLDERS + 5) {
            fs.add_dir(&format!("/sdcard/f{i:02}"));
        }
        let mut catalog = Catalog::new();
        let n = catalog.load_folders(&mut fs.catalog()).await.unwrap();
        assert_eq!(n, MAX_FOLDERS);
        assert_eq!(catalog.folder(0), Some("f00"));
    }

    #[tokio::test]
    async fn reloading_folders_discards_tracks() {
        let fs = MemFs::new();
        fs.add_file("/sdcard/01/S1.wav", tone(4, 0));
        let mut provider = fs.catalog();
        let mut catalog = Catalog::new();
        catalog.load_folders(&mut provider).await.unwrap();
        catalog.load_tracks(&mut provider, 0).await.unwrap();
        assert_eq!(catalog.open_folder(), Some(0));
        catalog.load_folders(&mut provider).await.unwrap();
        assert!(catalog.tracks().is_empty());
        assert_eq!(catalog.open_folder(), None);
    }

    #[test]
    fn default_folder_prefers_01_then_audios() {
        let mut catalog = Catalog::new();
        for name in ["music", "AUDIOS", "01"] {
            catalog.folders.push(entry_name(name).unwrap()).unwrap();
        }
        assert_eq!(catalog.default_folder_index(), 2);
        catalog.folders.pop();
        assert_eq!(catalog.default_folder_index(), 1);
        catalog.folders.pop();
        assert_eq!(catalog.default_folder_index(), 0);
    }
}
