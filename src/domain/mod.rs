mod artifact;
mod file_ref;
mod job_request;
mod job_state;
mod media_metadata;
mod path_reference;
mod supported_formats;
mod transcript;

pub use artifact::{ArtifactKind, GeneratedArtifact};
pub use file_ref::FileRef;
pub use job_request::{DEFAULT_OPERATION, JobRequest};
pub use job_state::{JobState, MarkerProbe};
pub use media_metadata::MediaMetadata;
pub use path_reference::PathReference;
pub use supported_formats::SupportedFormats;
pub use transcript::Transcript;
