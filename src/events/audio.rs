use serde::Serialize;

/// Requests for the host's audio backend, queued by
/// [`AudioAssets`](crate::resources::audioassets::AudioAssets).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AudioCmd {
    LoadFx { id: String },
    PlayFx { id: String },
    UnloadFx { id: String },
    LoadMusic { id: String },
    PlayMusic { id: String, looped: bool },
    StopMusic { id: String },
    PauseMusic { id: String },
    ResumeMusic { id: String },
    UnloadMusic { id: String },
    UnloadAll,
}
