//! Digital objects, structural maps and file references

pub mod digital_object;
pub mod file_references;
pub mod handle;
pub mod structural_map;

pub use digital_object::{DigitalObject, DigitalObjectStream};
pub use file_references::{FileGroup, FileMember, FileReferences};
pub use handle::DigitalObjectHandle;
pub use structural_map::{StructuralMap, StructuralMapDiv};
