//! File format parsers

pub mod pdb;
