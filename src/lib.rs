//! Front-end of a compiler for a small statically typed C dialect: a
//! recursive-descent parser that binds symbols as it goes, a
//! value-semantic type algebra, and a tree-walking analyzer that stamps
//! every expression with a derived type.

pub mod driver;
pub mod front;
