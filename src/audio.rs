use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use log::warn;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use thiserror::Error;

const CHIME_WAV: &[u8] = include_bytes!("../assets/coin.wav");

/// Failures from the chime player.
#[derive(Debug, Error)]
pub enum ChimeError {
    #[error("failed to read chime asset {path}: {source}")]
    Asset {
        path: String,
        source: std::io::Error,
    },
    #[error("chime asset is not decodable: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// One-shot coin pickup sound.
///
/// Triggering while the chime is playing restarts it from the beginning;
/// playbacks are never layered. When no output device is available the
/// player stays silent and only counts triggers.
pub struct Chime {
    output: Option<Playback>,
    bytes: Arc<[u8]>,
    generation: u64,
}

struct Playback {
    // Held so the device stays open for the life of the player.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl Chime {
    /// Prepares the chime bytes and opens the default output device.
    ///
    /// With `dev_asset` set the sound is read from disk, otherwise the
    /// built-in copy is used. A missing or corrupt asset is an error; an
    /// unavailable audio device is not, the player just stays silent.
    pub fn new(dev_asset: Option<&Path>) -> Result<Self, ChimeError> {
        let bytes: Arc<[u8]> = match dev_asset {
            Some(path) => fs::read(path)
                .map_err(|source| ChimeError::Asset {
                    path: path.display().to_string(),
                    source,
                })?
                .into(),
            None => CHIME_WAV.into(),
        };
        // Decode once up front so a bad asset fails at startup, not on
        // the first pickup.
        Decoder::new(Cursor::new(Arc::clone(&bytes)))?;

        let output = match OutputStream::try_default() {
            Ok((stream, handle)) => Some(Playback {
                _stream: stream,
                handle,
                sink: None,
            }),
            Err(err) => {
                warn!("audio disabled: {err}");
                None
            }
        };
        Ok(Self {
            output,
            bytes,
            generation: 0,
        })
    }

    /// Plays the chime from the beginning, cutting off any playback still
    /// in progress.
    pub fn trigger(&mut self) {
        self.generation += 1;
        let Some(playback) = self.output.as_mut() else {
            return;
        };
        if let Some(previous) = playback.sink.take() {
            previous.stop();
        }
        let source = match Decoder::new(Cursor::new(Arc::clone(&self.bytes))) {
            Ok(source) => source,
            Err(err) => {
                warn!("chime decode failed: {err}");
                return;
            }
        };
        match Sink::try_new(&playback.handle) {
            Ok(sink) => {
                sink.append(source);
                playback.sink = Some(sink);
            }
            Err(err) => warn!("chime playback failed: {err}"),
        }
    }

    /// Number of times the chime has been started or restarted.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
