use chrono::{Local, NaiveDateTime};
use std::{
    fs::{self, File},
    io::{self, BufWriter},
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::{
    context::{BatchContext, Overlay, DIRECTORY_FILE, FAT_FILE, MANAGEMENT_FILE},
    dir::DirectoryFile,
    error::Error,
    fat::write_fat,
    field::ascii_field,
    gps::GpsTags,
    mng::ManagementHeader,
    record::{
        description, picture_filename, DirectoryEntry, PhotoRecord, DESCRIPTION_LEN, MAX_SEQUENCE,
    },
};

/// Metadata read from a photo before it is shrunk
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PhotoMetadata {
    /// Capture time (EXIF `DateTimeOriginal`)
    pub taken: Option<NaiveDateTime>,
    /// GPS tags
    pub gps: Option<GpsTags>,
}

/// The image side of a batch: everything that needs to decode pixels
///
/// Errors returned from here only skip the photo in question.
pub trait PhotoProcessor {
    /// Reads the photo's metadata. A photo without any metadata is not an error.
    ///
    /// # Errors
    ///
    /// If the photo cannot be read at all
    fn metadata(&self, source: &Path) -> anyhow::Result<PhotoMetadata>;

    /// Writes a thumbnail of `source` to `dest`, drawing `overlay` onto it,
    /// and returns the byte size of the written file
    ///
    /// # Errors
    ///
    /// If the photo cannot be decoded or the thumbnail cannot be written
    fn write_thumbnail(
        &self,
        source: &Path,
        dest: &Path,
        overlay: Option<&Overlay>,
    ) -> anyhow::Result<u32>;
}

/// Source of the session time stamps
pub trait Clock {
    /// The current time
    fn now(&self) -> NaiveDateTime;
}

/// [`Clock`] reading the local wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// [`Clock`] that always returns the same time
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Where a [`Batch`] is in its run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Nothing processed yet
    #[default]
    Idle,
    /// Processing the single file input
    ProcessingSingleFile,
    /// Processing the photos of the input directory
    ProcessingDirectory,
    /// Writing the log files
    Finalizing,
    /// All log files written
    Done,
}

/// The outcome of a finished batch
#[derive(Debug)]
pub struct BatchSummary {
    /// Number of photos added to the directory by this run
    pub written: usize,
    /// Photos that could not be processed
    pub skipped: Vec<PathBuf>,
    /// The directory file as written to disk
    pub directory: DirectoryFile,
    /// Every state the batch went through after [`BatchState::Idle`], ending with
    /// [`BatchState::Done`]
    pub states: Vec<BatchState>,
}

/// Drives one run: photos in, log files out
pub struct Batch<'a, P, C = SystemClock> {
    ctx: &'a BatchContext,
    processor: P,
    clock: C,
    state: BatchState,
    visited: Vec<BatchState>,
    next_sequence: u32,
    directory: DirectoryFile,
    written: usize,
    skipped: Vec<PathBuf>,
}

/// Lists the photos directly inside `dir`, sorted by name.
///
/// Only files with an extension the `image` crate recognizes are returned.
///
/// # Errors
///
/// If `dir` itself cannot be read
pub fn list_photos(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("not a directory: {}", dir.display()),
        )
        .into());
    }
    let mut photos = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if image::ImageFormat::from_path(entry.path()).is_ok() {
            photos.push(entry.into_path());
        } else {
            debug!("Ignoring {}", entry.path().display());
        }
    }
    Ok(photos)
}

impl<'a, P: PhotoProcessor> Batch<'a, P> {
    /// Prepares a batch writing below [`BatchContext::output_dir`].
    ///
    /// The `QSOLOG` and `PHOTO` sub-directories are created if needed. In update mode an
    /// existing directory file is loaded and numbering continues after its last entry.
    ///
    /// # Errors
    ///
    /// - [`Error::NonAscii`] if the callsign or radio id cannot be encoded
    /// - [`Error::OutputDirMissing`] if the output directory does not exist
    /// - [`Error::MalformedDirectory`] if the directory file to update is corrupt
    pub fn new(ctx: &'a BatchContext, processor: P) -> Result<Self, Error> {
        ctx.validate()?;
        if !ctx.output_dir.is_dir() {
            return Err(Error::OutputDirMissing(ctx.output_dir.clone()));
        }
        fs::create_dir_all(ctx.log_dir())?;
        fs::create_dir_all(ctx.photo_dir())?;

        let existing = ctx.log_file(DIRECTORY_FILE);
        let directory = if ctx.update && existing.is_file() {
            let directory = DirectoryFile::from_file(&existing)?;
            info!("Updating {} existing entries", directory.len());
            directory
        } else {
            DirectoryFile::new()
        };
        let last = directory
            .last_sequence()
            .unwrap_or_else(|| u32::try_from(directory.len()).unwrap_or(u32::MAX));

        Ok(Self {
            ctx,
            processor,
            clock: SystemClock,
            state: BatchState::Idle,
            visited: Vec::new(),
            next_sequence: last.saturating_add(1),
            directory,
            written: 0,
            skipped: Vec::new(),
        })
    }
}

impl<'a, P: PhotoProcessor, C: Clock> Batch<'a, P, C> {
    /// Replaces the clock used for session time stamps
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Batch<'a, P, C2> {
        Batch {
            ctx: self.ctx,
            processor: self.processor,
            clock,
            state: self.state,
            visited: self.visited,
            next_sequence: self.next_sequence,
            directory: self.directory,
            written: self.written,
            skipped: self.skipped,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> BatchState {
        self.state
    }

    /// The sequence number the next photo will get
    #[must_use]
    pub const fn next_sequence(&self) -> u32 {
        self.next_sequence
    }

    fn transition(&mut self, next: BatchState) {
        debug!("Batch state {:?} -> {:?}", self.state, next);
        self.state = next;
        self.visited.push(next);
    }

    /// Processes the inputs and writes the three log files.
    ///
    /// `file` and `dir` are independent; if both are given the file is processed first.
    /// Photos that fail in the [`PhotoProcessor`] are logged and skipped.
    ///
    /// # Errors
    ///
    /// [`Error::NoInput`] if both inputs are [`None`], or any fatal encoding or i/o error
    pub fn run(mut self, file: Option<&Path>, dir: Option<&Path>) -> Result<BatchSummary, Error> {
        if file.is_none() && dir.is_none() {
            return Err(Error::NoInput);
        }
        if let Some(file) = file {
            self.transition(BatchState::ProcessingSingleFile);
            self.process(file)?;
        }
        if let Some(dir) = dir {
            self.transition(BatchState::ProcessingDirectory);
            let photos = list_photos(dir)?;
            info!("Found {} photos in {}", photos.len(), dir.display());
            for photo in &photos {
                self.process(photo)?;
            }
        }
        self.finalize()
    }

    /// Adds one photo to the directory.
    ///
    /// The sequence number is consumed even if the photo is skipped.
    ///
    /// # Errors
    ///
    /// Only fatal errors are returned; processor failures are recorded as skipped.
    /// [`Error::SequenceOverflow`] once the six digit sequence numbers run out
    #[instrument(skip(self), fields(seq = self.next_sequence))]
    pub fn process(&mut self, source: &Path) -> Result<(), Error> {
        let sequence = self.next_sequence;
        if sequence > MAX_SEQUENCE {
            return Err(Error::SequenceOverflow { sequence });
        }
        self.next_sequence = sequence + 1;

        ascii_field("description", &description(source), DESCRIPTION_LEN)?;
        let filename = picture_filename(&self.ctx.radio_id, sequence);
        let dest = self.ctx.photo_dir().join(&filename);

        let (metadata, thumbnail_size) = match self.shrink(source, &dest) {
            Ok(done) => done,
            Err(e) => {
                warn!("Skipping {}: {e:#}", source.display());
                self.skipped.push(source.to_path_buf());
                return Ok(());
            }
        };

        let record = PhotoRecord::builder()
            .source(source)
            .maybe_taken(metadata.taken)
            .maybe_gps(metadata.gps)
            .thumbnail_size(thumbnail_size)
            .sequence(sequence)
            .filename(filename)
            .build();
        let entry = DirectoryEntry::build(&record, self.ctx, self.clock.now())?;
        info!(
            "Added {} as {} ({} bytes)",
            source.display(),
            record.filename,
            thumbnail_size
        );
        self.directory.push(entry);
        self.written += 1;
        Ok(())
    }

    fn shrink(&self, source: &Path, dest: &Path) -> anyhow::Result<(PhotoMetadata, u32)> {
        let metadata = self.processor.metadata(source)?;
        let size = self
            .processor
            .write_thumbnail(source, dest, self.ctx.overlay.as_ref())?;
        Ok((metadata, size))
    }

    /// Writes the directory, FAT and management files
    ///
    /// # Errors
    ///
    /// Any error writing the files
    pub fn finalize(mut self) -> Result<BatchSummary, Error> {
        self.transition(BatchState::Finalizing);
        let count = self.directory.len();

        self.directory.into_file(self.ctx.log_file(DIRECTORY_FILE))?;

        let fat = File::create(self.ctx.log_file(FAT_FILE))?;
        write_fat(count, BufWriter::new(fat))?;
        debug!("Wrote {count} FAT slots");

        let photos = u16::try_from(count).unwrap_or_else(|_| {
            warn!("{count} photos do not fit the management header, writing {}", u16::MAX);
            u16::MAX
        });
        let mng = File::create(self.ctx.log_file(MANAGEMENT_FILE))?;
        ManagementHeader::builder()
            .photos(photos)
            .build()
            .write_to(BufWriter::new(mng))?;

        self.transition(BatchState::Done);
        info!(
            "Wrote {} entries ({} new, {} skipped)",
            count,
            self.written,
            self.skipped.len()
        );
        Ok(BatchSummary {
            written: self.written,
            skipped: self.skipped,
            directory: self.directory,
            states: self.visited,
        })
    }
}
