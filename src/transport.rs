use crate::surface::{RenderingSurface, SurfaceError};

use std::time::Duration;
use thiserror::Error;

/// Addressing schemes for image bytes, in attempt order: a single-shot
/// fetch of the complete encoded object first, then one numbered frame
/// from the resource hierarchy as fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalScheme {
    Direct,
    Frame,
}

impl RetrievalScheme {
    fn url(&self, base_url: &str, path: &InstancePath) -> String {
        let InstancePath {
            study,
            series,
            instance,
        } = path;
        let resource = format!("{base_url}/studies/{study}/series/{series}/instances/{instance}");
        match self {
            Self::Direct => resource,
            Self::Frame => format!("{resource}/frames/1"),
        }
    }

    fn accept(&self) -> &'static str {
        match self {
            Self::Direct => "application/dicom",
            Self::Frame => "multipart/related; type=\"application/octet-stream\"",
        }
    }
}

/// Full address of one instance within the catalog hierarchy.
#[derive(Debug, Clone)]
pub struct InstancePath {
    pub study: String,
    pub series: String,
    pub instance: String,
}

/// One failed retrieval attempt.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status {0}")]
    Status(u16),

    #[error(transparent)]
    Decode(#[from] SurfaceError),
}

/// Both retrieval schemes failed for one instance. Non-fatal: the stack
/// stays navigable, this position is simply left unrendered.
#[derive(Debug, Error)]
#[error("instance {instance} unloadable (direct retrieval: {direct}; frame retrieval: {frame})")]
pub struct InstanceLoadError {
    pub instance: String,
    pub direct: AttemptError,
    pub frame: AttemptError,
}

/// Source of raw image bytes for one instance under a given scheme.
/// Abstracted from the HTTP client so the fallback policy is testable.
pub trait InstanceFetcher {
    fn fetch(
        &self,
        scheme: RetrievalScheme,
        path: &InstancePath,
    ) -> impl Future<Output = Result<Vec<u8>, AttemptError>>;
}

/// WADO HTTP implementation of [`InstanceFetcher`].
pub struct WadoTransport {
    http: reqwest::Client,
    base_url: String,
}

impl WadoTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl InstanceFetcher for WadoTransport {
    async fn fetch(
        &self,
        scheme: RetrievalScheme,
        path: &InstancePath,
    ) -> Result<Vec<u8>, AttemptError> {
        let url = scheme.url(&self.base_url, path);
        log::debug!("transport GET {url}");
        let response = self
            .http
            .get(&url)
            .header("Accept", scheme.accept())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AttemptError::Status(response.status().as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Load and decode image bytes for one instance: direct retrieval first,
/// frame retrieval on any failure, at most two attempts. Returns the decoded
/// image; displaying it is the caller's decision (the caller holds the
/// stale-response guard).
pub async fn load_instance<F, S>(
    fetcher: &F,
    surface: &S,
    path: &InstancePath,
) -> Result<S::Image, InstanceLoadError>
where
    F: InstanceFetcher,
    S: RenderingSurface,
{
    let direct = match attempt(fetcher, surface, RetrievalScheme::Direct, path).await {
        Ok(image) => return Ok(image),
        Err(error) => error,
    };
    let frame = match attempt(fetcher, surface, RetrievalScheme::Frame, path).await {
        Ok(image) => return Ok(image),
        Err(error) => error,
    };
    Err(InstanceLoadError {
        instance: path.instance.clone(),
        direct,
        frame,
    })
}

async fn attempt<F, S>(
    fetcher: &F,
    surface: &S,
    scheme: RetrievalScheme,
    path: &InstancePath,
) -> Result<S::Image, AttemptError>
where
    F: InstanceFetcher,
    S: RenderingSurface,
{
    let result = match fetcher.fetch(scheme, path).await {
        Ok(bytes) => surface.decode(&bytes).map_err(AttemptError::from),
        Err(error) => Err(error),
    };
    if let Err(error) = &result {
        log::warn!(
            "{scheme:?} retrieval failed for instance {}: {error}",
            path.instance
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct ScriptedFetcher {
        direct: Result<Vec<u8>, u16>,
        frame: Result<Vec<u8>, u16>,
        attempts: RefCell<Vec<RetrievalScheme>>,
    }

    impl InstanceFetcher for ScriptedFetcher {
        async fn fetch(
            &self,
            scheme: RetrievalScheme,
            _path: &InstancePath,
        ) -> Result<Vec<u8>, AttemptError> {
            self.attempts.borrow_mut().push(scheme);
            let outcome = match scheme {
                RetrievalScheme::Direct => &self.direct,
                RetrievalScheme::Frame => &self.frame,
            };
            outcome.clone().map_err(AttemptError::Status)
        }
    }

    struct ByteSurface;

    impl RenderingSurface for ByteSurface {
        type Image = Vec<u8>;

        fn enable(&mut self) {}

        fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, SurfaceError> {
            if bytes.is_empty() {
                return Err(SurfaceError("empty payload".into()));
            }
            Ok(bytes.to_vec())
        }

        fn display(&mut self, _image: Vec<u8>) {}

        fn reset_view(&mut self) {}

        fn set_position_indicator(&mut self, _current: usize, _total: usize) {}
    }

    fn path() -> InstancePath {
        InstancePath {
            study: "s".into(),
            series: "se".into(),
            instance: "i".into(),
        }
    }

    #[tokio::test]
    async fn direct_success_skips_frame_retrieval() {
        let fetcher = ScriptedFetcher {
            direct: Ok(vec![1, 2]),
            frame: Err(500),
            attempts: RefCell::new(Vec::new()),
        };
        let image = load_instance(&fetcher, &ByteSurface, &path()).await.unwrap();
        assert_eq!(image, vec![1, 2]);
        assert_eq!(*fetcher.attempts.borrow(), [RetrievalScheme::Direct]);
    }

    #[tokio::test]
    async fn direct_failure_falls_back_to_frame() {
        let fetcher = ScriptedFetcher {
            direct: Err(404),
            frame: Ok(vec![3]),
            attempts: RefCell::new(Vec::new()),
        };
        let image = load_instance(&fetcher, &ByteSurface, &path()).await.unwrap();
        assert_eq!(image, vec![3]);
        assert_eq!(
            *fetcher.attempts.borrow(),
            [RetrievalScheme::Direct, RetrievalScheme::Frame]
        );
    }

    #[tokio::test]
    async fn decode_failure_also_triggers_fallback() {
        // Direct fetch succeeds but decodes to nothing; frame must be tried.
        let fetcher = ScriptedFetcher {
            direct: Ok(Vec::new()),
            frame: Ok(vec![7]),
            attempts: RefCell::new(Vec::new()),
        };
        let image = load_instance(&fetcher, &ByteSurface, &path()).await.unwrap();
        assert_eq!(image, vec![7]);
    }

    #[tokio::test]
    async fn both_failures_report_instance_load_error() {
        let fetcher = ScriptedFetcher {
            direct: Err(404),
            frame: Err(500),
            attempts: RefCell::new(Vec::new()),
        };
        let error = load_instance(&fetcher, &ByteSurface, &path())
            .await
            .unwrap_err();
        assert_eq!(error.instance, "i");
        assert!(matches!(error.direct, AttemptError::Status(404)));
        assert!(matches!(error.frame, AttemptError::Status(500)));
    }
}
