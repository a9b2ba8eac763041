pub mod dependency_graph;
pub mod emitters;
pub mod error;
pub mod generator;
pub mod type_mapper;

pub use dependency_graph::{CycleGroups, DependencyGraph};
pub use error::GeneratorError;
pub use generator::{Compilation, ZodGenerator, compile};
pub use type_mapper::TypeConverter;
