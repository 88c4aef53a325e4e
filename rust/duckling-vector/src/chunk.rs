//! Column access over a whole chunk.

use duckling_common::{Result, verify_arg, verify_data};
use duckling_types::LogicalType;

use crate::{config::DecodeConfig, factory::VectorFactory, raw::RawChunk, vector::Vector};

/// A chunk seen as a list of typed columns.
pub struct DataChunkView<'a, C: RawChunk> {
    chunk: &'a C,
    factory: VectorFactory<'a, C>,
}

impl<'a, C: RawChunk> DataChunkView<'a, C> {
    /// Creates a view with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the chunk holds more rows than a standard vector.
    pub fn new(chunk: &'a C) -> Result<DataChunkView<'a, C>> {
        Self::with_config(chunk, DecodeConfig::default())
    }

    /// # Errors
    ///
    /// Returns an error if `config` is invalid or the chunk holds more than
    /// `config.vector_size` rows.
    pub fn with_config(chunk: &'a C, config: DecodeConfig) -> Result<DataChunkView<'a, C>> {
        let factory = VectorFactory::with_config(chunk, config)?;
        verify_data!(row_count, chunk.row_count() <= factory.config().vector_size);
        log::debug!(
            "chunk view over {} columns, {} rows",
            chunk.column_count(),
            chunk.row_count()
        );
        Ok(DataChunkView { chunk, factory })
    }

    pub fn column_count(&self) -> usize {
        self.chunk.column_count()
    }

    pub fn row_count(&self) -> usize {
        self.chunk.row_count()
    }

    pub fn factory(&self) -> &VectorFactory<'a, C> {
        &self.factory
    }

    /// Returns the logical type of column `index`.
    pub fn column_type(&self, index: usize) -> Result<LogicalType> {
        verify_arg!(index, index < self.column_count());
        self.chunk.vector_logical_type(self.chunk.column(index)?)
    }

    pub fn column_types(&self) -> Result<Vec<LogicalType>> {
        (0..self.column_count())
            .map(|i| self.column_type(i))
            .collect()
    }

    /// Returns the SQL type labels of all columns, e.g. `INTEGER[]`.
    pub fn column_labels(&self) -> Result<Vec<String>> {
        Ok(self
            .column_types()?
            .iter()
            .map(|t| t.to_string())
            .collect())
    }

    /// Decodes column `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds or the column cannot
    /// be decoded, see [`VectorFactory::create`].
    pub fn column(&self, index: usize) -> Result<Vector<'a>> {
        verify_arg!(index, index < self.column_count());
        let vector = self.chunk.column(index)?;
        log::debug!("decoding column {index} ({vector:?})");
        self.factory
            .create_from_engine_type(vector, self.chunk.row_count())
    }

    /// Decodes all columns.
    pub fn columns(&self) -> Result<Vec<Vector<'a>>> {
        (0..self.column_count()).map(|i| self.column(i)).collect()
    }
}
