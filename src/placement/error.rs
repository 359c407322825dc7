use thiserror::Error;

/// Reasons a single placement can not be emitted.
///
/// These never abort a placement pass; the affected lane is skipped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    #[error("No prefab configured; at least one prefab must be added to the palette")]
    EmptyPalette,

    #[error("No prefab is active; at least one prefab must be active")]
    NoActivePrefab,
}
