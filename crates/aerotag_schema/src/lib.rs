//! Tag schema evolution and validation for aircraft community submissions.
//!
//! # Philosophy: the schema follows the data
//!
//! Contributors attach free-form key/value tags to aircraft submissions.
//! Tag names are never pre-declared, so the schema cannot be authored by
//! hand. It is inferred from the corpus and evolved in lockstep with it:
//!
//! 1. **Inference**: every observed tag value classifies as one of the
//!    seven JSON kinds
//! 2. **Registry**: the full corpus folds into one tag -> type mapping
//! 3. **Diff**: the registry is compared against the latest schema version
//! 4. **Generation**: new tags trigger the next version, declaring every
//!    known tag explicitly
//! 5. **Validation**: submissions validate against any stored version
//!
//! Schema versions are immutable and strictly monotonic. Once written, a
//! version is never edited, only superseded. A version never rejects a tag
//! merely for being new; it only rejects a wrong type once that tag is
//! explicitly declared.
//!
//! # Modules
//!
//! - [`registry`]: type inference and the corpus-wide tag registry
//! - [`document`]: versioned schema documents
//! - [`store`]: directory-backed, create-only schema persistence
//! - [`evolve`]: diffing and next-version generation
//! - [`validate`]: draft 2020-12 submission validation
//! - [`intake`]: best-effort payload extraction from intake form text

pub mod document;
pub mod evolve;
pub mod intake;
pub mod registry;
pub mod store;
pub mod validate;

pub use document::{SchemaDocument, SCHEMA_TITLE, TAG_NAME_PATTERN};
pub use evolve::{EvolutionOutcome, EvolutionPlan, EvolveError};
pub use registry::{Submission, TagRegistry, TagType, TypeConflict};
pub use store::{SchemaStore, StoreError};
pub use validate::ValidateError;
