//! sw-sql - Dialect generator for Stepwise
//!
//! Each supported engine is described by a static [`DialectProfile`];
//! [`generate`] turns one schema expression into that engine's statements.

pub mod error;
pub mod generator;
pub mod literal;
pub mod profile;
mod profiles;

pub use error::{SqlError, SqlResult};
pub use generator::{generate, render_script};
pub use literal::render_literal;
pub use profile::{
    AlterColumnPolicy, DialectProfile, DropIndexStyle, IdentityStyle, LiteralStyle, QuotePolicy,
    RenameStyle, SizeRule, TypeRule,
};
