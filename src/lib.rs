//! JSON front end of the transit catalogue: input documents, response
//! formatting and the two command line phases.

pub mod config;
pub mod document;
pub mod error;
pub mod loader;
pub mod response;

use std::io::{Read, Write};
use std::path::PathBuf;

use tracing::info;
use transit_catalogue_core::persistence::{SnapshotMode, load_snapshot, save_snapshot};
use transit_catalogue_core::{StatRequest, TransitDatabase};

pub use config::AppConfig;
pub use document::InputDocument;
pub use error::Error;

pub fn read_document(input: impl Read) -> Result<InputDocument, Error> {
    Ok(serde_json::from_reader(input)?)
}

/// Builds the catalogue and routing graph from a base document and writes
/// the snapshot named in its serialization settings
pub fn make_base(document: &InputDocument, mode: SnapshotMode) -> Result<PathBuf, Error> {
    let path = document.snapshot_path()?.to_path_buf();
    let catalogue = loader::build_catalogue(&document.base_requests)?;
    let database = TransitDatabase::build(
        catalogue,
        document.render_settings(),
        document.routing_settings()?,
    )?;

    let bytes = database.to_snapshot(mode)?;
    save_snapshot(&path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "snapshot saved");
    Ok(path)
}

/// Restores the snapshot named in a stat document and answers its requests
pub fn process_requests(document: &InputDocument) -> Result<serde_json::Value, Error> {
    let path = document.snapshot_path()?;
    let database = TransitDatabase::from_snapshot(&load_snapshot(path)?)?;

    let requests: Vec<StatRequest> = document
        .stat_requests
        .iter()
        .cloned()
        .map(StatRequest::from)
        .collect();
    let answers = database.answer_all(&requests)?;
    info!(requests = answers.len(), "requests answered");
    Ok(response::answers_to_json(&answers))
}

pub fn write_response(mut output: impl Write, response: &serde_json::Value) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut output, response)?;
    writeln!(output)?;
    Ok(())
}
