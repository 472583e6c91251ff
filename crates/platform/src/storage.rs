//! Byte access to audio resources on the removable medium.
//!
//! Mounting the medium is the board's job; by the time a [`Storage`] exists
//! the card is ready and paths are absolute (`/sdcard/...`).

/// Read-only resource store.
pub trait Storage {
    /// Error type
    type Error: core::fmt::Debug;
    /// Open resource handle
    type File: File;

    /// Open a resource for sequential reading.
    fn open(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<Self::File, Self::Error>>;

    /// `Ok(true)` if a resource exists at `path`.
    fn exists(
        &mut self,
        path: &str,
    ) -> impl core::future::Future<Output = Result<bool, Self::Error>>;
}

/// An open resource with a read cursor.
pub trait File {
    /// Error type
    type Error: core::fmt::Debug;

    /// Read from the cursor. `Ok(0)` means end of data.
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;

    /// Total size in bytes.
    fn size(&self) -> u64;

    /// Read until `buf` is full or the resource ends.
    ///
    /// Returns the number of bytes placed in `buf`; a short count means the
    /// resource ended first.
    async fn read_full(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut filled = 0usize;
        while let Some(rest) = buf.get_mut(filled..) {
            if rest.is_empty() {
                break;
            }
            let n = self.read(rest).await?;
            if n == 0 {
                break;
            }
            filled = filled.saturating_add(n);
        }
        Ok(filled)
    }
}
