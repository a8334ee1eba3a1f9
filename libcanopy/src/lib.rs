pub mod source;
pub mod vocab;
pub mod table;
pub mod hkt;
pub mod builder;
pub mod export;
pub mod errors;

/// Identifier of an input source document. Always positive.
pub type SourceId = u32;

/// Identifier of an interned word. Real words get positive ids; the refuge
/// sentinel is negative.
pub type WordId = i32;

/// Identifier of a cluster node, assigned from 1 in creation order.
pub type NodeId = u32;

/// Identifier of a knowledge tree, assigned from 1 in creation order.
pub type HktId = u32;
