// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use rand::TryRngCore;
use std::io::SeekFrom;
use std::path::PathBuf;
use tokio::io::{AsyncSeek, AsyncSeekExt, AsyncWrite, AsyncWriteExt};

const CHUNK_SIZE: usize = 256 * 1024;

/// Creates scratch files.
pub trait ScratchFiles: std::fmt::Debug + Send + Sync {
    /// Returns a new file, without a name in the filesystem.
    ///
    /// The file supports reads, writes, and seeks. It is released when the
    /// returned handle is dropped.
    fn anonymous_file(&self) -> std::io::Result<tokio::fs::File>;
}

/// Creates anonymous files using [tempfile].
///
/// The files are unlinked as soon as they are created, the operating system
/// reclaims the space when the handle is closed.
#[derive(Clone, Debug, Default)]
pub struct AnonymousFiles {
    dir: Option<PathBuf>,
}

impl AnonymousFiles {
    /// Creates files in `dir`, or in the system's temporary directory if
    /// `dir` is `None`.
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }
}

impl ScratchFiles for AnonymousFiles {
    fn anonymous_file(&self) -> std::io::Result<tokio::fs::File> {
        let file = match &self.dir {
            None => tempfile::tempfile()?,
            Some(dir) => tempfile::tempfile_in(dir)?,
        };
        Ok(tokio::fs::File::from_std(file))
    }
}

/// Writes exactly `size` random bytes from `rng` into `dst`.
///
/// Returns the number of bytes written, which is always `size` on success.
pub async fn copy_random<R, W>(rng: &mut R, dst: &mut W, size: u64) -> std::io::Result<u64>
where
    R: TryRngCore + ?Sized,
    R::Error: std::error::Error + Send + Sync + 'static,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buffer = vec![0_u8; buffer_size(size)];
    let mut written = 0_u64;
    while written < size {
        let n = (size - written).min(buffer.len() as u64) as usize;
        let chunk = &mut buffer[..n];
        rng.try_fill_bytes(chunk).map_err(std::io::Error::other)?;
        dst.write_all(chunk).await?;
        written += n as u64;
    }
    dst.flush().await?;
    Ok(written)
}

/// The buffer size to copy `size` bytes, never larger than [CHUNK_SIZE].
fn buffer_size(size: u64) -> usize {
    usize::try_from(size).map_or(CHUNK_SIZE, |s| s.min(CHUNK_SIZE))
}

/// Moves the cursor in `file` back to the start.
///
/// Returns the new position, always zero on success.
pub async fn rewind<F>(file: &mut F) -> std::io::Result<u64>
where
    F: AsyncSeek + Unpin + ?Sized,
{
    file.seek(SeekFrom::Start(0)).await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::{OsRng, StdRng};
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use test_case::test_case;
    use tokio::io::AsyncReadExt;

    mockall::mock! {
        #[derive(Debug)]
        pub(crate) ScratchFiles {}
        impl ScratchFiles for ScratchFiles {
            fn anonymous_file(&self) -> std::io::Result<tokio::fs::File>;
        }
    }

    /// A writer that fails after accepting `limit` bytes.
    #[derive(Debug)]
    struct FailingWriter {
        limit: usize,
        written: usize,
    }

    impl FailingWriter {
        fn new(limit: usize) -> Self {
            Self { limit, written: 0 }
        }
    }

    impl AsyncWrite for FailingWriter {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            let available = self.limit - self.written;
            if available == 0 {
                return Poll::Ready(Err(std::io::Error::other("simulated disk full")));
            }
            let n = available.min(buf.len());
            self.written += n;
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    /// A random source that always fails.
    #[derive(Debug)]
    struct BrokenRng;

    impl TryRngCore for BrokenRng {
        type Error = std::io::Error;

        fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
            Err(std::io::Error::other("entropy source unavailable"))
        }

        fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
            Err(std::io::Error::other("entropy source unavailable"))
        }

        fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
            Err(std::io::Error::other("entropy source unavailable"))
        }
    }

    #[test_case(1)]
    #[test_case(1024)]
    #[test_case(CHUNK_SIZE as u64 - 1)]
    #[test_case(CHUNK_SIZE as u64)]
    #[test_case(3 * CHUNK_SIZE as u64 + 7)]
    #[tokio::test]
    async fn copy_exact_size(size: u64) -> anyhow::Result<()> {
        let mut dst = Vec::new();
        let written = copy_random(&mut OsRng, &mut dst, size).await?;
        assert_eq!(written, size);
        assert_eq!(dst.len() as u64, size);
        Ok(())
    }

    #[test_case(0, 0)]
    #[test_case(1024, 1024)]
    #[test_case(CHUNK_SIZE as u64 + 1, CHUNK_SIZE)]
    #[test_case(u32::MAX as u64 + 1, CHUNK_SIZE)]
    #[test_case(u64::MAX, CHUNK_SIZE)]
    fn buffer_size_is_bounded(size: u64, want: usize) {
        assert_eq!(buffer_size(size), want);
    }

    #[tokio::test]
    async fn copy_uses_rng() -> anyhow::Result<()> {
        let mut dst = Vec::new();
        copy_random(&mut StdRng::seed_from_u64(42), &mut dst, 4096).await?;

        let mut want = vec![0_u8; 4096];
        rand::RngCore::fill_bytes(&mut StdRng::seed_from_u64(42), &mut want);
        assert_eq!(dst, want);
        // Zeroes would compress too well, and give artificially good results.
        assert!(dst.iter().any(|b| *b != 0), "{dst:?}");
        Ok(())
    }

    #[tokio::test]
    async fn copy_into_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let mut file = AnonymousFiles::new(Some(dir.path().to_path_buf())).anonymous_file()?;
        let written = copy_random(&mut OsRng, &mut file, 1024).await?;
        assert_eq!(written, 1024);
        assert_eq!(file.metadata().await?.len(), 1024);
        Ok(())
    }

    #[tokio::test]
    async fn copy_write_error() {
        let mut dst = FailingWriter::new(1000);
        let got = copy_random(&mut OsRng, &mut dst, 4096).await;
        assert!(got.is_err(), "{got:?}");
        assert_eq!(dst.written, 1000);
    }

    #[tokio::test]
    async fn copy_rng_error() {
        let mut dst = Vec::new();
        let got = copy_random(&mut BrokenRng, &mut dst, 4096).await;
        let err = got.unwrap_err();
        assert!(err.to_string().contains("entropy"), "{err:?}");
        assert!(dst.is_empty(), "{dst:?}");
    }

    #[tokio::test]
    async fn rewind_to_start() -> anyhow::Result<()> {
        let mut file = AnonymousFiles::default().anonymous_file()?;
        copy_random(&mut OsRng, &mut file, 2048).await?;
        assert_eq!(file.stream_position().await?, 2048);

        let position = rewind(&mut file).await?;
        assert_eq!(position, 0);
        assert_eq!(file.stream_position().await?, 0);

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).await?;
        assert_eq!(contents.len(), 2048);
        Ok(())
    }

    #[tokio::test]
    async fn anonymous_file_is_not_visible() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let files = AnonymousFiles::new(Some(dir.path().to_path_buf()));
        let _file = files.anonymous_file()?;
        let entries = std::fs::read_dir(dir.path())?.count();
        assert_eq!(entries, 0);
        Ok(())
    }

    #[tokio::test]
    async fn anonymous_file_missing_dir() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let files = AnonymousFiles::new(Some(dir.path().join("missing")));
        let got = files.anonymous_file();
        assert!(got.is_err(), "{got:?}");
        Ok(())
    }
}
