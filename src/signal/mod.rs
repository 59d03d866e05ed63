pub(crate) mod env;
pub(crate) mod pointer;
pub(crate) mod scroll;
pub(crate) mod value;
