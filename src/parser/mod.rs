//! Parser module for modscope.
//!
//! Turns raw module documents into [`ModuleNode`] descriptors. Extraction
//! sits behind the [`ModuleExtractor`] trait so the heuristic
//! [`DecoratorExtractor`] can be swapped for a real parser without touching
//! the graph code.
//!
//! # Example
//!
//! ```
//! use modscope::parser::{extract_module, ModuleSource};
//!
//! let source = ModuleSource::new(
//!     "src/users/users.module.ts",
//!     "@Module({ imports: [AuthModule], controllers: [UsersController] })\n\
//!      export class UsersModule {}",
//! );
//!
//! let node = extract_module(&source).expect("module declaration");
//! assert_eq!(node.name, "UsersModule");
//! assert_eq!(node.imports, vec!["AuthModule"]);
//! assert_eq!(node.controllers, vec!["UsersController"]);
//! ```

pub mod module_decl;
pub mod types;

// Re-export commonly used types for convenience
pub use module_decl::{extract_module, DecoratorExtractor, ModuleExtractor, MODULE_MARKER};
pub use types::{ModuleNode, ModuleSource};
