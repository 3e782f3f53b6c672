pub(crate) mod collect;
pub(crate) mod decode;
pub(crate) mod keys;
pub(crate) mod plan;
pub(crate) mod remove;
pub(crate) mod sync;
pub(crate) mod validate;
