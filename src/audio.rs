use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rodio::source::Buffered;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Source};

type Sound = Buffered<Decoder<BufReader<File>>>;

/// One-shot sound playback. The output stream is opened once at startup;
/// when no audio device exists (CI, headless boxes) the manager stays usable
/// and every play is a no-op.
pub struct AudioManager {
    output: Option<(OutputStream, OutputStreamHandle)>,
    sounds: HashMap<i64, Sound>,
    next_id: i64,
    enabled: bool,
}

impl AudioManager {
    pub fn new() -> Self {
        let output = match OutputStream::try_default() {
            Ok(pair) => Some(pair),
            Err(err) => {
                eprintln!("[audio] output device unavailable: {err}");
                None
            }
        };
        Self { output, sounds: HashMap::new(), next_id: 1, enabled: true }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Decodes and buffers a sound file, returning its handle.
    pub fn load_sound(&mut self, path: impl AsRef<Path>) -> Result<i64> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Opening {}", path.display()))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("Decoding {}", path.display()))?
            .buffered();
        let id = self.next_id;
        self.next_id += 1;
        self.sounds.insert(id, source);
        Ok(id)
    }

    pub fn play_sound(&mut self, id: i64) -> Result<()> {
        let source = self.sounds.get(&id).ok_or_else(|| anyhow!("unknown sound id {id}"))?;
        if !self.enabled {
            return Ok(());
        }
        if let Some((_, handle)) = &self.output {
            handle
                .play_raw(source.clone().convert_samples())
                .map_err(|err| anyhow!("playback failed: {err}"))?;
        }
        Ok(())
    }

    pub fn unload_sound(&mut self, id: i64) -> bool {
        self.sounds.remove(&id).is_some()
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}
