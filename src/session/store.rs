//! File-backed session storage.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use uuid::Uuid;

use super::state::SessionState;
use crate::graph::{is_blank, TypeGraph};

const STATE_FILE_PREFIX: &str = "typedep-";
const STATE_FILE_EXTENSION: &str = "json";

/// Errors that can occur while reading or writing session state.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A required argument was empty.
    #[error("{0} cannot be null or empty.")]
    EmptyArgument(&'static str),

    /// No state file exists for the session.
    #[error("Session {0} does not exist.")]
    NotFound(String),

    /// Failed to read or write a state file.
    #[error("Session I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A state file could not be (de)serialized.
    #[error("Invalid session state: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Stores session state as `typedep-<id>.json` files in one directory.
///
/// Writes are not locked: callers sharing a directory must serialize
/// their writes to a given session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Creates a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates a store in the operating system's temporary directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir())
    }

    /// Returns the directory holding the state files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Starts a new, empty session and returns its identifier.
    pub fn initialize_session(&self) -> SessionResult<String> {
        fs::create_dir_all(&self.dir)?;
        let session_id = Uuid::new_v4().to_string();
        self.save(&SessionState::new(session_id.clone()))?;
        tracing::info!(session_id = %session_id, "initialized session");
        Ok(session_id)
    }

    /// Adds an input module path to a session.
    ///
    /// Paths already present, compared case-insensitively, are not added again.
    pub fn add_input_path(&self, session_id: &str, path: &str) -> SessionResult<()> {
        if is_blank(session_id) {
            return Err(SessionError::EmptyArgument("Session ID"));
        }
        if is_blank(path) {
            return Err(SessionError::EmptyArgument("Input path"));
        }

        let mut state = self.load(session_id)?;
        if state.add_input_path(path) {
            self.save(&state)?;
            tracing::debug!(session_id, path, "added input path");
        } else {
            tracing::debug!(session_id, path, "input path already present");
        }
        Ok(())
    }

    /// Returns the input module paths of a session.
    pub fn input_paths(&self, session_id: &str) -> SessionResult<Vec<String>> {
        if is_blank(session_id) {
            return Err(SessionError::EmptyArgument("Session ID"));
        }
        Ok(self.load(session_id)?.input_paths)
    }

    /// Stores a generated graph in the session, replacing any previous one.
    pub fn save_generated_graph(&self, session_id: &str, graph: &TypeGraph) -> SessionResult<()> {
        if is_blank(session_id) {
            return Err(SessionError::EmptyArgument("Session ID"));
        }

        let mut state = self.load(session_id)?;
        state.generated_graph = Some(graph.to_snapshot());
        self.save(&state)?;
        tracing::info!(session_id, types = graph.type_count(), "saved generated graph");
        Ok(())
    }

    /// Loads the generated graph of a session.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no graph has been generated yet.
    pub fn generated_graph(&self, session_id: &str) -> SessionResult<Option<TypeGraph>> {
        if is_blank(session_id) {
            return Err(SessionError::EmptyArgument("Session ID"));
        }
        Ok(self.load(session_id)?.graph())
    }

    /// Deletes a session's state file. Unknown sessions are ignored.
    pub fn clear_session(&self, session_id: &str) -> SessionResult<()> {
        if is_blank(session_id) {
            return Err(SessionError::EmptyArgument("Session ID"));
        }

        let path = self.state_file(session_id);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!(session_id, "cleared session");
        }
        Ok(())
    }

    /// Checks whether a state file exists for the session.
    pub fn session_exists(&self, session_id: &str) -> bool {
        !is_blank(session_id) && self.state_file(session_id).is_file()
    }

    /// Finds the session whose state file was modified most recently.
    pub fn find_current_session(&self) -> SessionResult<Option<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let mut newest: Option<(SystemTime, String)> = None;
        for entry in entries {
            let entry = entry?;
            let Some(session_id) = session_id_from_file_name(&entry.path()) else {
                continue;
            };
            let modified = entry.metadata()?.modified()?;
            if newest.as_ref().map_or(true, |(time, _)| modified > *time) {
                newest = Some((modified, session_id));
            }
        }

        Ok(newest.map(|(_, session_id)| session_id))
    }

    /// Loads a session's full state.
    pub fn load(&self, session_id: &str) -> SessionResult<SessionState> {
        let path = self.state_file(session_id);
        if !path.is_file() {
            return Err(SessionError::NotFound(session_id.to_string()));
        }

        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, state: &SessionState) -> SessionResult<()> {
        let json = serde_json::to_string_pretty(state)?;
        fs::write(self.state_file(&state.session_id), json)?;
        Ok(())
    }

    fn state_file(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!(
            "{}{}.{}",
            STATE_FILE_PREFIX, session_id, STATE_FILE_EXTENSION
        ))
    }
}

fn session_id_from_file_name(path: &Path) -> Option<String> {
    if path.extension()? != STATE_FILE_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    let prefix = stem.get(..STATE_FILE_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(STATE_FILE_PREFIX) {
        return None;
    }
    let session_id = &stem[STATE_FILE_PREFIX.len()..];
    (!session_id.is_empty()).then(|| session_id.to_string())
}
