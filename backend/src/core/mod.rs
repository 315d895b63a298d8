//! Core match bookkeeping

pub mod calendar;
