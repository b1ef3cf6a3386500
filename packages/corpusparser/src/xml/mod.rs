//! XML adapters: COLMEP import, and reading and writing document trees.

mod import;
mod reader;
mod utils;
mod writer;

pub use import::{convert_basic_to_standard, import_colmep, import_colmep_basic, import_colmep_file};
pub use reader::{read_document, read_document_file, read_tree};
pub use utils::{collect_attributes, element_children, get_tag_name, non_blank};
pub use writer::{to_xml_string, write_tree, write_tree_file, WriteOptions};
