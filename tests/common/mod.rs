#![allow(dead_code)]

pub mod seq;

pub use seq::Seq;
