//! Build-time template compiler: markup document in, Rust source out.
//!
//! The generated code builds a virtual tree and never touches a live toolkit.
//! Expression text from the markup is copied verbatim; mistakes in it surface
//! when the generated code is compiled, not here.

pub mod codegen;
pub mod directive;
pub mod error;
pub mod markup;
pub mod options;


pub use codegen::{GeneratedView, compile_file, compile_markup, string_lit};
pub use directive::{Classified, ClassifiedAttr, Directive, classify, parse_foreach};
pub use error::{CompileError, CompileResult, Diagnostic};
pub use markup::{Attribute, MarkupDocument, MarkupNode, ProcessingInstruction, parse_markup};
pub use options::CompileOptions;
