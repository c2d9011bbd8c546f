//! Arrays, vectors, maps, references and structs.

pub mod arrays_slices;
pub mod maps;
pub mod pointers;
pub mod structs;
