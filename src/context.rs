//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::{AwsCliLookup, LiveFileSystem, StderrNotifier};
use crate::adapters::recording::RecordingAwsLookup;
use crate::adapters::replaying::ReplayingAwsLookup;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::Settings;
use crate::ports::{AwsLookup, FileSystem, Notifier};

/// File name of the AWS lookup cassette inside a recording directory.
pub const AWS_CASSETTE_FILE: &str = "aws.cassette.yaml";

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter sets (live, recording, replaying);
/// the catalog only ever sees the traits.
pub struct ServiceContext {
    /// Filesystem holding catalog documents.
    pub fs: Box<dyn FileSystem>,
    /// Live AWS lookups.
    pub aws: Box<dyn AwsLookup>,
    /// User-visible warnings.
    pub notifier: Box<dyn Notifier>,
    /// Cassette recorder; written to disk on drop.
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a context from explicit port implementations.
    #[must_use]
    pub fn new(
        fs: Box<dyn FileSystem>,
        aws: Box<dyn AwsLookup>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self { fs, aws, notifier, recorder: None }
    }

    /// Creates a live context: real disk, the `aws` client, stderr warnings.
    #[must_use]
    pub fn live(settings: &Settings) -> Self {
        Self::new(
            Box::new(LiveFileSystem),
            Box::new(AwsCliLookup::new(settings)),
            Box::new(StderrNotifier),
        )
    }

    /// Creates a live context that also records AWS lookups.
    ///
    /// The cassette is written to `<dir>/aws.cassette.yaml` when the
    /// context is dropped.
    #[must_use]
    pub fn recording(settings: &Settings, dir: &Path) -> Self {
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            dir.join(AWS_CASSETTE_FILE),
            "awstools-session",
        )));
        let aws = RecordingAwsLookup::new(
            Box::new(AwsCliLookup::new(settings)),
            Arc::clone(&recorder),
        );
        Self {
            fs: Box::new(LiveFileSystem),
            aws: Box::new(aws),
            notifier: Box::new(StderrNotifier),
            recorder: Some(recorder),
        }
    }

    /// Creates a context whose AWS lookups are served from a cassette.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be read or parsed.
    pub fn replaying(cassette: &Path) -> Result<Self, String> {
        let replayer = CassetteReplayer::load(cassette)?;
        Ok(Self::new(
            Box::new(LiveFileSystem),
            Box::new(ReplayingAwsLookup::new(replayer)),
            Box::new(StderrNotifier),
        ))
    }

    /// Picks replaying, recording or live adapters, in that order of precedence.
    ///
    /// # Errors
    ///
    /// Returns an error if a replay cassette is configured but unusable.
    pub fn from_settings(settings: &Settings) -> Result<Self, String> {
        if let Some(cassette) = &settings.replay_cassette {
            return Self::replaying(cassette);
        }
        if let Some(dir) = &settings.record_dir {
            return Ok(Self::recording(settings, dir));
        }
        Ok(Self::live(settings))
    }
}

impl Drop for ServiceContext {
    fn drop(&mut self) {
        let Some(recorder) = self.recorder.take() else {
            return;
        };
        let Ok(recorder) = recorder.lock() else {
            tracing::error!("recorder lock poisoned; cassette not written");
            return;
        };
        match recorder.write() {
            Ok(path) => eprintln!("Recording saved to: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to write cassette: {e}"),
        }
    }
}
