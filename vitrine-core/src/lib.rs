//! Vitrine Core - Asset Resolution and Rewriting
//!
//! Pure pipeline pieces for serving tenant bundles under `/{tenant}/`:
//! path resolution, reference rewriting, HTML assembly, cache policy and
//! validators. Nothing here performs I/O directly; the assembler reaches
//! sub-resources through [`SubResourceLoader`].

pub mod assemble;
pub mod asset;
pub mod cache_policy;
pub mod content_type;
pub mod error;
pub mod etag;
pub mod fallback_map;
pub mod html;
pub mod path;
pub mod rewrite;

pub use assemble::{sub_resource_path, Assembler, RenderedDocument, SubResourceLoader};
pub use asset::{extension_of, AssetContent, AssetPath, LoadMode, Tenant};
pub use cache_policy::{builtin_directive, policy_for, CacheDirective, CachePolicy};
pub use content_type::ContentType;
pub use error::{StorageError, VitrineError, VitrineResult};
pub use etag::etag;
pub use fallback_map::FallbackMap;
pub use path::{resolve, Resolution};
pub use rewrite::{rewrite_css_urls, rewrite_fetch_calls};
