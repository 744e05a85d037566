/// Runs probe queries and rebuild plans against a live connection.
pub mod runner;
