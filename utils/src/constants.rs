// Names of the per-work-item local index globals emitted by the kernel
// front end.
pub const LOCAL_ID_X_GLOBAL: &str = "_local_id_x";
pub const LOCAL_ID_Y_GLOBAL: &str = "_local_id_y";
pub const LOCAL_ID_Z_GLOBAL: &str = "_local_id_z";

pub const FMULADD_INTRINSIC_PREFIX: &str = "llvm.fmuladd";

// Upper limit on condition nodes visited while decomposing an early exit
// guard. Real guards hold at most one comparison per dimension.
pub const MAX_CONDITION_NODES: usize = 64;
