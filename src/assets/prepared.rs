use std::path::Path;

use crate::assets::decode::{Picture, decode_picture};
use crate::assets::store::{FontRole, TextLayoutEngine};
use crate::config::LoadedJob;
use crate::foundation::error::{QuizError, QuizResult};

/// Fonts and pictures for one job, loaded and decoded before any frame is drawn.
pub struct PreparedAssets {
    /// Shaper with one font registered per [`FontRole`].
    pub text: TextLayoutEngine,
    /// Pictures in job order.
    pub pictures: Vec<Picture>,
}

impl PreparedAssets {
    /// Load every font and picture referenced by `job`.
    #[tracing::instrument(skip_all, fields(pictures = job.job.pictures.len()))]
    pub fn load(job: &LoadedJob) -> QuizResult<Self> {
        let mut text = TextLayoutEngine::new();
        for role in [FontRole::Title, FontRole::Question, FontRole::Answer] {
            let path = job.resolve(job.job.style.layout.fonts.for_role(role));
            let bytes = read_asset(&path, "font")?;
            let family = text.register_font(role, bytes)?;
            tracing::debug!(?role, %family, path = %path.display(), "font registered");
        }

        let pictures = job
            .job
            .pictures
            .iter()
            .map(|p| load_picture(&job.resolve(p)))
            .collect::<QuizResult<Vec<_>>>()?;

        Ok(Self { text, pictures })
    }

    /// Build from already decoded parts.
    pub fn from_parts(text: TextLayoutEngine, pictures: Vec<Picture>) -> Self {
        Self { text, pictures }
    }
}

fn read_asset(path: &Path, kind: &str) -> QuizResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| QuizError::asset(format!("failed to read {kind} '{}': {e}", path.display())))
}

fn load_picture(path: &Path) -> QuizResult<Picture> {
    let bytes = read_asset(path, "picture")?;
    let ext = path.extension().and_then(|e| e.to_str());
    let picture = decode_picture(&bytes, ext).map_err(|e| {
        QuizError::asset(format!("failed to decode picture '{}': {e}", path.display()))
    })?;
    if picture.aspect_ratio().is_none() {
        return Err(QuizError::asset(format!(
            "picture '{}' has no usable size",
            path.display()
        )));
    }
    Ok(picture)
}
