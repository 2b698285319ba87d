//! # Path Matchers
//!
//! | Matcher              | Syntax                                  | Feature   |
//! |----------------------|-----------------------------------------|-----------|
//! | `AntPathMatcher`     | `?`, `*`, `**`, `{name}`, `{name:regex}` | always    |
//! | `MatchitPathMatcher` | `{name}`, `{*rest}`                     | `matchit` |
//!
//! `AntPathMatcher` is the default for every registry.

pub mod ant;
#[cfg(feature = "matchit")]
pub mod matchit;

pub use ant::AntPathMatcher;
#[cfg(feature = "matchit")]
pub use self::matchit::MatchitPathMatcher;
