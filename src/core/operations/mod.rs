mod csv_io;
mod export;

pub use csv_io::{
    read_roster, read_roster_file, read_roster_str, write_records_string,
    write_stats_string,
};
pub use export::{
    write_artifacts, Artifact, ArtifactKind, CategoryEntry, Manifest, ManifestFile,
    MANIFEST_FILE_NAME,
};
