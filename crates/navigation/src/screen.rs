//! Screen identifier enum: the three navigation levels of the device.

/// Where the user is in the folder/track hierarchy.
///
/// Transitions only ever move one level at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Top level; stepping moves the folder selection.
    #[default]
    Home,
    /// Browsing root folders.
    FolderView,
    /// Browsing the tracks of the open folder.
    FileView,
}

impl Screen {
    /// Short name for log lines.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::FolderView => "folders",
            Self::FileView => "files",
        }
    }
}
