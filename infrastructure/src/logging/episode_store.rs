//! Pick episodes as pretty-printed JSON files.

use chrono::Local;
use pilot_application::{EpisodeStore, EpisodeStoreError};
use pilot_domain::Episode;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes each episode to `<dir>/episode-%Y-%m-%d-%H-%M-%S.json`
pub struct JsonEpisodeStore {
    dir: PathBuf,
}

impl JsonEpisodeStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// First free file name for the current second.
    fn next_path(&self) -> PathBuf {
        let stem = Local::now().format("episode-%Y-%m-%d-%H-%M-%S").to_string();
        let first = self.dir.join(format!("{}.json", stem));
        if !first.exists() {
            return first;
        }
        (1..)
            .map(|n| self.dir.join(format!("{}-{}.json", stem, n)))
            .find(|path| !path.exists())
            .unwrap_or(first)
    }
}

impl EpisodeStore for JsonEpisodeStore {
    fn save(&self, episode: &Episode) -> Result<PathBuf, EpisodeStoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.next_path();
        write_episode(File::create(&path)?, episode)?;
        Ok(path)
    }
}

/// Serialize `episode` into `out`, surfacing errors from the final flush.
fn write_episode(out: impl Write, episode: &Episode) -> Result<(), EpisodeStoreError> {
    let mut writer = BufWriter::new(out);
    serde_json::to_writer_pretty(&mut writer, episode)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pilot_domain::{BoundingBoxObservation, RobotState, VisualServoController};
    use std::io;

    /// Accepts nothing, like a device with no space left.
    struct FullDevice;

    impl Write for FullDevice {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn two_step_episode() -> Episode {
        let mut controller = VisualServoController::default();
        let mut state = RobotState::new();
        let mut episode = Episode::new();
        for step in 0..2 {
            let obs = BoundingBoxObservation::centered_at(0.95, 0.72);
            let (features, decision) = controller.decide(&obs, &mut state);
            episode.record(step, features, &decision);
        }
        episode
    }

    #[test]
    fn test_save_writes_step_keyed_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonEpisodeStore::new(dir.path().join("episodes"));

        let path = store.save(&two_step_episode()).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("episode-"));
        assert!(name.ends_with(".json"));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["0"]["actions"]["action"], "right_move_fast");
        assert_eq!(value["1"]["features"]["prev_action"], "right_move_fast");
        assert_eq!(value["1"]["success"], false);
    }

    #[test]
    fn test_saves_in_the_same_second_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonEpisodeStore::new(dir.path());

        let first = store.save(&Episode::new()).unwrap();
        let second = store.save(&Episode::new()).unwrap();
        assert_ne!(first, second);
        assert!(first.exists() && second.exists());
    }

    #[test]
    fn test_buffered_write_failure_is_reported() {
        // The episode fits in the buffer, so the failure only shows on flush.
        let result = write_episode(FullDevice, &two_step_episode());
        assert!(matches!(result, Err(EpisodeStoreError::Io(_))));
    }
}
