pub(crate) mod hover;
pub(crate) mod marquee;
pub(crate) mod presentation;
pub(crate) mod progress;
pub(crate) mod skew;
pub(crate) mod spotlight;
