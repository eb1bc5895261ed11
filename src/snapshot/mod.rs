mod load;
mod model;

pub use load::load_snapshot;
pub use model::{EdgeKind, EdgeRecord, NodeKind, NodeRecord, TopologySnapshot};
