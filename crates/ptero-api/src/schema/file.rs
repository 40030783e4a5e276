use serde::{Deserialize, Serialize};

use super::common::Timestamp;
use super::Schema;

/// An entry in a server's file tree (`object: "file_object"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileObject {
    pub name: String,
    pub mode: String,
    pub mode_bits: String,
    pub size: u64,
    pub is_file: bool,
    pub is_symlink: bool,
    pub mimetype: String,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
}

impl FileObject {
    pub fn is_directory(&self) -> bool {
        !self.is_file
    }
}

impl Schema for FileObject {
    const OBJECT: &'static str = "file_object";
    type Entity = Self;
}
