//! Jetpack Compose `ImageVector` generation for iconforge
//!
//! Turns [`iconforge_svg::Document`]s into Kotlin source, one file per icon, and
//! optionally an aggregate icon-pack object for a whole batch.
//!
//! # Example
//!
//! ```ignore
//! use iconforge_codegen::{convert_source, EmitOptions, IdentifierTable};
//!
//! let unit = convert_source(svg_text, Path::new("actions/edit.svg"), &EmitOptions::default())?;
//! let table = IdentifierTable::aggregate([(unit.identifier.as_str(), &unit.namespace)]);
//! ```

mod convert;
mod emit;
mod error;
mod format;
mod ident;
mod pack;
mod split;
mod transform;
mod writer;

pub use convert::{convert_file, convert_source, GeneratedUnit};
pub use emit::{emit_icon, instruction, EmitOptions};
pub use error::ConvertError;
pub use ident::{
    package_segment, to_identifier, IdentifierTable, Namespace, TableEntry, PACK_MEMBERS,
};
pub use pack::emit_icon_pack;
pub use split::{needs_split, split_commands, Chunk, DEFAULT_MAX_COMMANDS};
pub use transform::GroupTransform;
pub use writer::CodeWriter;
