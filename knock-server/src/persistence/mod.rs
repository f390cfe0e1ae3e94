mod visit_record;
mod visit_recorder;
mod visit_writer;

pub use visit_record::*;
pub use visit_recorder::*;
pub use visit_writer::*;
