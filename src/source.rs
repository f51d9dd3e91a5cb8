//! Beatmap content retrieval and the memoizing content cache.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{PfResult, PpForgeError};

/// Where raw `.osu` payloads come from. The payload is an opaque string
/// handed to the engine's parser.
pub trait BeatmapSource {
    fn fetch(&self, beatmap_id: u64) -> PfResult<String>;
}

impl BeatmapSource for Box<dyn BeatmapSource> {
    fn fetch(&self, beatmap_id: u64) -> PfResult<String> {
        (**self).fetch(beatmap_id)
    }
}

/// Default public endpoint serving raw beatmap files.
pub const OSU_FILE_ENDPOINT: &str = "https://osu.ppy.sh/osu/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches beatmap files over HTTP.
pub struct HttpSource {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpSource {
    pub fn new() -> Self {
        Self::with_base_url(OSU_FILE_ENDPOINT)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self {
            agent,
            base_url: base_url.into(),
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl BeatmapSource for HttpSource {
    fn fetch(&self, beatmap_id: u64) -> PfResult<String> {
        let url = format!("{}{}", self.base_url, beatmap_id);
        info!("Fetching beatmap file: {url}");
        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| PpForgeError::Fetch(e.to_string()))?;
        let mut body = response.into_body();
        body.read_to_string()
            .map_err(|e| PpForgeError::Fetch(e.to_string()))
    }
}

/// Reads `<root>/<id>.osu` from disk.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BeatmapSource for DirSource {
    fn fetch(&self, beatmap_id: u64) -> PfResult<String> {
        let path = self.root.join(format!("{beatmap_id}.osu"));
        std::fs::read_to_string(&path)
            .map_err(|e| PpForgeError::Fetch(format!("{}: {e}", path.display())))
    }
}

/// Serves one local file regardless of the requested id; used by the CLI's
/// `--map` flag.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BeatmapSource for FileSource {
    fn fetch(&self, _beatmap_id: u64) -> PfResult<String> {
        std::fs::read_to_string(&self.path)
            .map_err(|e| PpForgeError::Fetch(format!("{}: {e}", self.path.display())))
    }
}

/// Memoizes fetched beatmap content per beatmap id, so recalculating the
/// same map twice in one page session costs one network round-trip. No
/// eviction; a session touches tens of maps at most.
#[derive(Debug, Default)]
pub struct BeatmapCache {
    entries: HashMap<u64, Arc<str>>,
}

impl BeatmapCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached content for `beatmap_id`, fetching through `source` on a
    /// miss. A failed fetch caches nothing.
    pub fn get_or_fetch<S: BeatmapSource>(
        &mut self,
        beatmap_id: u64,
        source: &S,
    ) -> PfResult<Arc<str>> {
        if let Some(content) = self.entries.get(&beatmap_id) {
            debug!("Beatmap {beatmap_id} served from cache");
            return Ok(Arc::clone(content));
        }
        let content: Arc<str> = source.fetch(beatmap_id)?.into();
        self.entries.insert(beatmap_id, Arc::clone(&content));
        Ok(content)
    }
}
