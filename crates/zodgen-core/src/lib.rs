pub mod config;
pub mod error;
pub mod ir;
pub mod parse;
pub mod transform;

/// A generated artifact: an optional group directory, a file name and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub group: Option<String>,
    pub file_name: String,
    pub content: String,
}

impl GeneratedFile {
    /// Relative output path, `group/file_name` or just `file_name`.
    pub fn path(&self) -> String {
        match &self.group {
            Some(group) => format!("{group}/{}", self.file_name),
            None => self.file_name.clone(),
        }
    }
}

/// Trait for code generators that produce files from an IR spec.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(
        &self,
        ir: &ir::IrSpec,
        config: &Self::Config,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}
