use std::io::{self, Read, Seek, SeekFrom};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

pub struct ReadProgress<R> {
    inner: R,
    progress_bar: ProgressBar,
}

/// A progress bar that implements the `Read` and `Seek` traits.
///
/// This wrapper of `indicatif`'s `ProgressBar` updates progress based on the
/// current offset within the file.
impl<R> ReadProgress<R>
where
    R: Seek,
{
    pub fn new(mut read: R) -> io::Result<Self> {
        let len = read.seek(SeekFrom::End(0))? + 1;
        read.seek(SeekFrom::Start(0))?;
        let progress_bar = ProgressBar::new(len);
        progress_bar.set_style(
            ProgressStyle::with_template("{bar} {bytes}/{total_bytes}")
                .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?,
        );

        Ok(ReadProgress {
            inner: read,
            progress_bar,
        })
    }
}

impl<R> Read for ReadProgress<R>
where
    R: Read + Seek,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n_read = self.inner.read(buf)?;
        let pos = self.inner.stream_position()?;
        self.progress_bar.set_position(pos);
        Ok(n_read)
    }
}

impl<R> Drop for ReadProgress<R> {
    fn drop(&mut self) {
        self.progress_bar.finish();
    }
}

/// Measure the number of sentences processed per second.
///
/// An `ExtractSpeed` instance prints the processing speed to the log
/// when it is dropped.
pub struct ExtractSpeed {
    start: Instant,
    n_sentences: usize,
    n_samples: usize,
}

impl ExtractSpeed {
    pub fn new() -> Self {
        ExtractSpeed {
            start: Instant::now(),
            n_sentences: 0,
            n_samples: 0,
        }
    }

    /// Count a processed sentence and the samples extracted from it.
    pub fn count_sentence(&mut self, n_samples: usize) {
        self.n_sentences += 1;
        self.n_samples += n_samples;
    }
}

impl Default for ExtractSpeed {
    fn default() -> Self {
        ExtractSpeed::new()
    }
}

impl Drop for ExtractSpeed {
    fn drop(&mut self) {
        let elapsed_secs = self.start.elapsed().as_secs_f32();
        log::info!(
            "Extracted {} samples from {} sentences in {:.1}s ({:.1} sents/s)",
            self.n_samples,
            self.n_sentences,
            elapsed_secs,
            self.n_sentences as f32 / elapsed_secs
        );
    }
}
