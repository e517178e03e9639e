//! dnspect: dump the public shape of a .NET type straight from
//! assembly metadata.
//!
//! Given an assembly name and a fully qualified type name, the tool
//! finds `<assembly>.dll` under a set of search roots, parses its
//! embedded ECMA-335 metadata, and prints the type's interfaces,
//! fields, properties, and methods.

pub mod cli;
pub mod locator;
pub mod meta;
pub mod report;
