//! Firmware image catalog

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::errors::{BaoError, Result};
use crate::models::{Artifact, ArtifactRole, RawArtifact};
use crate::toolchain::{ToolOutput, Toolchain, args};

#[derive(Deserialize)]
#[serde(untagged)]
enum ArtifactsPayload {
    Wrapped { images: Vec<RawArtifact> },
    Bare(Vec<RawArtifact>),
}

/// Parse `bao.py artifacts --json` output (`{"images": [...]}` or a bare array)
pub fn parse_artifacts(stdout: &str) -> Result<Vec<Artifact>> {
    match ToolOutput::<ArtifactsPayload>::parse(stdout) {
        ToolOutput::Structured(ArtifactsPayload::Wrapped { images })
        | ToolOutput::Structured(ArtifactsPayload::Bare(images)) => {
            Ok(images.into_iter().map(Artifact::from).collect())
        }
        ToolOutput::FallbackText(text) => Err(BaoError::Toolchain(format!(
            "Could not parse artifact list: {}",
            crate::utils::text::truncate_diagnostic(&text, 120)
        ))),
    }
}

/// Built images reduced to one path per role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactCatalog {
    pub by_role: BTreeMap<ArtifactRole, PathBuf>,
    /// Present images in flash order: loader, operating system, application
    pub all: Vec<PathBuf>,
    /// Images reported without a recognizable role; never flashed
    pub unroled: Vec<PathBuf>,
}

impl ArtifactCatalog {
    /// First image reported for a role wins
    pub fn from_artifacts(images: Vec<Artifact>) -> Self {
        let mut by_role = BTreeMap::new();
        let mut unroled = Vec::new();

        for image in images {
            match image.role {
                Some(role) => {
                    by_role.entry(role).or_insert(image.path);
                }
                None => unroled.push(image.path),
            }
        }

        let all = ArtifactRole::FLASH_ORDER
            .iter()
            .filter_map(|role| by_role.get(role).cloned())
            .collect();

        Self {
            by_role,
            all,
            unroled,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn path(&self, role: ArtifactRole) -> Option<&PathBuf> {
        self.by_role.get(&role)
    }

    /// Files to copy: every role, or only the application image
    pub fn select(&self, update_all: bool) -> Vec<PathBuf> {
        if update_all {
            self.all.clone()
        } else {
            self.path(ArtifactRole::Application)
                .cloned()
                .into_iter()
                .collect()
        }
    }
}

/// Ask the toolchain for built images. Any failure is treated as "nothing built".
pub async fn gather_artifacts(toolchain: &dyn Toolchain) -> ArtifactCatalog {
    let images = match toolchain.run(&args(["artifacts", "--json"])).await {
        Ok(run) if run.success() => match parse_artifacts(&run.stdout) {
            Ok(images) => images,
            Err(e) => {
                log::warn!("{}", e);
                Vec::new()
            }
        },
        Ok(run) => {
            log::warn!("bao.py artifacts failed: {}", run.diagnostic());
            Vec::new()
        }
        Err(e) => {
            log::warn!("bao.py artifacts could not run: {}", e);
            Vec::new()
        }
    };

    let root = toolchain.root().to_path_buf();
    let images = images
        .into_iter()
        .map(|mut image| {
            if image.path.is_relative() {
                image.path = root.join(&image.path);
            }
            image
        })
        .collect();

    let catalog = ArtifactCatalog::from_artifacts(images);
    for path in &catalog.unroled {
        log::warn!(
            "Ignoring image without a known role: {}",
            path.display()
        );
    }
    log::debug!("Artifact catalog: {:?}", catalog.by_role);
    catalog
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(path: &str, role: Option<ArtifactRole>) -> Artifact {
        Artifact {
            path: PathBuf::from(path),
            role,
        }
    }

    #[test]
    fn test_parse_wrapped_and_bare() {
        let wrapped = parse_artifacts(
            r#"{"images": [{"path": "target/apps.uf2", "role": "apps"}, {"path": "x.uf2"}]}"#,
        )
        .unwrap();
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped[0].role, Some(ArtifactRole::Application));
        assert_eq!(wrapped[1].role, None);

        let bare = parse_artifacts(r#"[{"path": "loader.uf2", "role": "loader"}]"#).unwrap();
        assert_eq!(bare[0].role, Some(ArtifactRole::Loader));

        assert!(parse_artifacts("Traceback (most recent call last)").is_err());
    }

    #[test]
    fn test_all_follows_role_order() {
        let catalog = ArtifactCatalog::from_artifacts(vec![
            artifact("apps.uf2", Some(ArtifactRole::Application)),
            artifact("xous.uf2", Some(ArtifactRole::OperatingSystem)),
            artifact("loader.uf2", Some(ArtifactRole::Loader)),
        ]);
        assert_eq!(
            catalog.all,
            vec![
                PathBuf::from("loader.uf2"),
                PathBuf::from("xous.uf2"),
                PathBuf::from("apps.uf2")
            ]
        );
    }

    #[test]
    fn test_missing_roles_are_skipped() {
        let catalog = ArtifactCatalog::from_artifacts(vec![
            artifact("apps.uf2", Some(ArtifactRole::Application)),
            artifact("loader.uf2", Some(ArtifactRole::Loader)),
        ]);
        assert_eq!(
            catalog.all,
            vec![PathBuf::from("loader.uf2"), PathBuf::from("apps.uf2")]
        );
        assert_eq!(catalog.path(ArtifactRole::OperatingSystem), None);
    }

    #[test]
    fn test_unroled_images_are_excluded() {
        let catalog = ArtifactCatalog::from_artifacts(vec![
            artifact("mystery.uf2", None),
            artifact("xous.uf2", Some(ArtifactRole::OperatingSystem)),
        ]);
        assert_eq!(catalog.all, vec![PathBuf::from("xous.uf2")]);
        assert_eq!(catalog.unroled, vec![PathBuf::from("mystery.uf2")]);
    }

    #[test]
    fn test_first_image_per_role_wins() {
        let catalog = ArtifactCatalog::from_artifacts(vec![
            artifact("apps-a.uf2", Some(ArtifactRole::Application)),
            artifact("apps-b.uf2", Some(ArtifactRole::Application)),
        ]);
        assert_eq!(catalog.all, vec![PathBuf::from("apps-a.uf2")]);
    }

    #[test]
    fn test_select_partial_and_full() {
        let catalog = ArtifactCatalog::from_artifacts(vec![
            artifact("loader.uf2", Some(ArtifactRole::Loader)),
            artifact("xous.uf2", Some(ArtifactRole::OperatingSystem)),
            artifact("apps.uf2", Some(ArtifactRole::Application)),
        ]);
        assert_eq!(catalog.select(false), vec![PathBuf::from("apps.uf2")]);
        assert_eq!(catalog.select(true).len(), 3);

        let no_app = ArtifactCatalog::from_artifacts(vec![artifact(
            "loader.uf2",
            Some(ArtifactRole::Loader),
        )]);
        assert!(no_app.select(false).is_empty());
    }
}
