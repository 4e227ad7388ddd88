//! `trk-group`: the set of cooperating simulation workers.
//!
//! Workers form a group of `size` ranks; rank 0 is the root that owns the
//! external network channels.  The control loop only sees the
//! [`DistributedGroup`] trait, so the transport can be swapped without
//! touching it.
//!
//! | Type             | Transport                                            |
//! |------------------|------------------------------------------------------|
//! | [`LocalGroup`]     | single rank; messages to self loop back            |
//! | [`InProcessGroup`] | `n` ranks in one process over crossbeam channels   |

pub mod error;
pub mod group;
pub mod in_process;
pub mod local;


pub use error::{GroupError, GroupResult};
pub use group::DistributedGroup;
pub use in_process::InProcessGroup;
pub use local::LocalGroup;
