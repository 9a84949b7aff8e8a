//! Collection catalogue for the site data migration.
//!
//! Describes every collection the public site and admin panel persist as flat
//! JSON documents: where its source file lives, which table it lands in, how it
//! is written, and how a source record is reshaped on the way.

pub mod collection;
pub mod normalize;

pub use collection::{
    Collection, CollectionParseError, SourceShape, WriteStrategy, department_page_record,
};
pub use normalize::{FIELD_NAME_MAP, Record, destination_name, is_unset, normalize};
