pub(crate) mod background;
pub(crate) mod backend;
pub(crate) mod cpu;
