pub(crate) mod competition;
pub(crate) mod diagnostics;
pub(crate) mod games;
pub(crate) mod players;
pub(crate) mod sync;
