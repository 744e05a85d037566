/// Column definition rendering and new-column specs.
pub mod column_def;
/// Non-null probe query assembly.
pub mod nonnull;
/// Column insertion ordering and table rebuild plans.
pub mod rebuild;
