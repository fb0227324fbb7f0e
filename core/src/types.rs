//! Shared primitive types used across the widget.

/// A stable, unique identifier for a catalog product (e.g. `"yale-doorman"`).
pub type ProductId = String;

/// Key under which durable state is stored.
pub type StorageKey = String;

/// Calendar month, 0-indexed (0 = January, 11 = December).
pub type Month0 = u32;
