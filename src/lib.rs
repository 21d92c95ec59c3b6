//! # DICOM-stack library
//!
//! This crate resolves a remote DICOM series into a correctly ordered,
//! navigable image stack.
//!
//! Series and instance metadata are queried from a DICOMweb catalog,
//! instances without pixel data are filtered out, the anatomical plane of
//! each slice is classified from its direction cosines and the stack is
//! ordered by the best available signal:
//!  - declared instance number
//!  - position projected onto the slice normal
//!  - raw depth coordinate
//!  - instance identifier (degraded, flagged with a warning)
//!
//! Image bytes are fetched per instance with a two-tier transport fallback
//! (whole-object retrieval first, single-frame retrieval second) and handed
//! to an external rendering collaborator behind the
//! [`RenderingSurface`](surface::RenderingSurface) trait; pixel decoding and
//! display are its business, not this crate's. A
//! [`ViewSession`](session::ViewSession) owns the resolved stack and the
//! rate-limited navigation state for the lifetime of one series selection.
//!
//! # Examples
//!
//! Resolve a series and print its display order:
//!
//! ```no_run
//! # use dicom_stack::catalog::CatalogClient;
//! # use dicom_stack::stack_resolver::{ResolveOptions, StackResolver};
//! # async fn run() {
//! let catalog = CatalogClient::new("https://pacs.example.org/dicomweb")
//!     .expect("should have built the catalog client");
//! let resolved = StackResolver::resolve(&catalog, "1.2.840.113619.2.1", "1.3.6.1.4.1.5", &ResolveOptions::default())
//!     .await
//!     .expect("should have resolved the series");
//! for id in resolved.stack.ids() {
//!     println!("{id}");
//! }
//! # }
//! ```

pub mod catalog;
pub mod enums;
pub mod geometry;
pub mod navigation;
pub mod ordering;
pub mod record;
pub mod session;
pub mod stack_resolver;
pub mod surface;
pub mod transport;
