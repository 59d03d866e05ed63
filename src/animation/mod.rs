pub(crate) mod ease;
pub(crate) mod range;
pub(crate) mod spring;
pub(crate) mod velocity;
