//! Command-line front end for the PhishGuard classifier.

pub mod cli;
