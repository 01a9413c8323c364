//! Aggregate document assembler.
//!
//! Merges static metadata with the enumerated users into the single
//! document handed to renderers. Knows nothing about output formats.

use chrono::{DateTime, Utc};
use tracing::instrument;

use tildegen_shared::{AggregateDocument, Metadata, Reporter, UserRecord};

/// Assemble a document stamped with the current UTC time.
pub fn assemble_document(
    metadata: Metadata,
    users: Vec<UserRecord>,
    reporter: &dyn Reporter,
) -> AggregateDocument {
    assemble_document_at(metadata, users, Utc::now(), reporter)
}

/// Assemble a document stamped with `generated_at`.
///
/// Metadata keys are copied verbatim; `users`, `user_count` and
/// `last_generated` are added last and replace any metadata of the same name.
#[instrument(skip_all, fields(users = users.len(), metadata_keys = metadata.len()))]
pub fn assemble_document_at(
    metadata: Metadata,
    users: Vec<UserRecord>,
    generated_at: DateTime<Utc>,
    reporter: &dyn Reporter,
) -> AggregateDocument {
    reporter.phase("Assembling document");
    let document = AggregateDocument::new(metadata, users, generated_at);
    reporter.document_assembled(document.user_count());
    document
}
