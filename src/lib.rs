#![warn(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unit_bindings)]
#![warn(unused_qualifications)]

pub mod parsed_types;
pub mod parsers;
pub mod planning;

#[cfg(test)]
mod test_utils;
