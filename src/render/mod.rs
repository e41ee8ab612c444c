//! Markdown rendering for doc pages, endpoint reports, and file lists.
//!
//! Every renderer is a pure function of its input and iterates sorted
//! collections only, so the same findings always produce the same bytes.

pub mod doc_page;
pub mod endpoints;
pub mod lists;

pub use doc_page::{doc_page_path, is_substantial, DocPage};
pub use endpoints::{load_references, reference_key, render_endpoint_list, RouteReport};
pub use lists::{render_checklist, render_undocumented, ROOT_HEADING};
