//! Workshop catalog - the versioned set of track definitions.
//!
//! The catalog is loaded once at startup, either from the embedded
//! `workshops/catalog.yaml` or from a configured file, and shared
//! read-only by every handler.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use super::WorkshopDefinition;
use crate::domain::foundation::{TrackId, ValidationError};

const BUILTIN_CATALOG_YAML: &str = include_str!("../../../workshops/catalog.yaml");

static BUILTIN_CATALOG: Lazy<WorkshopCatalog> = Lazy::new(|| {
    WorkshopCatalog::from_yaml_str(BUILTIN_CATALOG_YAML)
        .expect("embedded workshop catalog must be valid")
});

/// Errors raised while loading a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog document: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    version: u32,
    primary: TrackId,
    tracks: Vec<WorkshopDefinition>,
}

/// All known workshop tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkshopCatalog {
    version: u32,
    primary: TrackId,
    tracks: Vec<WorkshopDefinition>,
}

impl WorkshopCatalog {
    /// Builds a catalog from definitions, validating it.
    pub fn new(
        version: u32,
        primary: TrackId,
        tracks: Vec<WorkshopDefinition>,
    ) -> Result<Self, ValidationError> {
        if tracks.is_empty() {
            return Err(ValidationError::empty_field("tracks"));
        }

        let mut ids = HashSet::new();
        for track in &tracks {
            track.validate()?;
            if !ids.insert(track.id.clone()) {
                return Err(ValidationError::invalid_format(
                    "tracks",
                    format!("duplicate track '{}'", track.id),
                ));
            }
        }

        if !ids.contains(&primary) {
            return Err(ValidationError::invalid_format(
                "primary",
                format!("primary track '{}' is not defined", primary),
            ));
        }

        Ok(Self {
            version,
            primary,
            tracks,
        })
    }

    /// Parses and validates a YAML catalog document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_yaml::from_str(yaml)?;
        Ok(Self::new(doc.version, doc.primary, doc.tracks)?)
    }

    /// Reads a catalog document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// The catalog shipped with the service.
    pub fn builtin() -> &'static WorkshopCatalog {
        &BUILTIN_CATALOG
    }

    /// Document version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The track used when none can be inferred.
    pub fn primary(&self) -> &WorkshopDefinition {
        self.tracks
            .iter()
            .find(|t| t.id == self.primary)
            .unwrap_or(&self.tracks[0])
    }

    /// Looks up a track definition.
    pub fn get(&self, track_id: &TrackId) -> Option<&WorkshopDefinition> {
        self.tracks.iter().find(|t| &t.id == track_id)
    }

    /// Looks up a track by its raw identifier, as received from a client.
    pub fn lookup(&self, raw: &str) -> Option<&WorkshopDefinition> {
        let track_id = TrackId::new(raw).ok()?;
        self.get(&track_id)
    }

    /// Iterates over all definitions in document order.
    pub fn tracks(&self) -> impl Iterator<Item = &WorkshopDefinition> {
        self.tracks.iter()
    }

    /// Infers the track from step identifiers found in a client update.
    ///
    /// The first track whose step prefix matches any hint wins; without a
    /// match the primary track is returned.
    pub fn infer_track<'a, I>(&self, step_hints: I) -> &WorkshopDefinition
    where
        I: IntoIterator<Item = &'a str>,
    {
        let hints: Vec<&str> = step_hints.into_iter().collect();
        self.tracks
            .iter()
            .filter(|t| t.id != self.primary)
            .find(|t| hints.iter().any(|hint| t.owns_step(hint)))
            .unwrap_or_else(|| self.primary())
    }
}
